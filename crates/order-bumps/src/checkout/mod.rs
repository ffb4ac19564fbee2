//! Checkout-surface workflows.

pub mod bumps;
