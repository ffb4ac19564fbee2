use std::fmt;

use serde::{Deserialize, Serialize};

/// Monetary amount in integer minor units (cents).
///
/// Threshold comparisons must be exact at the boundary, so amounts never pass
/// through floating point: a cart total of 499.99 stays strictly below a
/// 500.00 threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}${}.{:02}", cents / 100, cents % 100)
    }
}

/// Identifier wrapper for catalog products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Snapshot of the cart and session state a display condition evaluates against.
///
/// Supplied fresh for every admission check; the engine never caches it.
/// Missing fields are rejected at the deserialization boundary rather than
/// defaulted, so a malformed payload can never evaluate to a quiet `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutContext {
    pub cart_total: Money,
    pub item_count: u32,
    pub is_logged_in: bool,
}

/// Catalog record for a product eligible to be offered as an order bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub image_url: Option<String>,
    pub purchasable: bool,
    pub in_stock: bool,
}

impl BumpProduct {
    /// Only purchasable, in-stock products may be surfaced at checkout.
    pub fn is_offerable(&self) -> bool {
        self.purchasable && self.in_stock
    }

    pub fn offer_view(&self) -> OfferView {
        OfferView {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            display_price: self.price.to_string(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Sanitized product representation returned to the checkout client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferView {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub display_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
