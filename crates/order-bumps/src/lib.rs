pub mod checkout;
pub mod config;
pub mod error;
pub mod telemetry;
