//! Order bump admission and offer listing for the checkout page.
//!
//! The heart of the module is a small composition engine: independent display
//! conditions (cart total, item count, login state, anything an integrator
//! registers) are combined under a single `AND`/`OR` mode into one admission
//! decision. Catalog lookup and cart mutation sit behind traits so the flow
//! can run against any commerce backend.

pub(crate) mod catalog;
pub mod composite;
pub mod conditions;
pub mod domain;
pub mod registry;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CartError, CartGateway, CatalogError, ProductCatalog};
pub use composite::{CompositeCondition, ConditionLogic, ParseConditionLogicError};
pub use conditions::{
    CartItemCountCondition, CartTotalCondition, DisplayCondition, UserLoggedInCondition,
};
pub use domain::{BumpProduct, CheckoutContext, Money, OfferView, ProductId};
pub use registry::ConditionRegistry;
pub use router::order_bump_router;
pub use service::{
    AdmissionDecision, ConditionHook, DenialReason, LogicResolver, OfferOutcome,
    OfferServiceError, OrderBumpService, ProductIdsHook,
};
