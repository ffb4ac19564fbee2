use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OfferSettings;

use super::catalog::{CartError, CartGateway, CatalogError, ProductCatalog};
use super::composite::{CompositeCondition, ConditionLogic};
use super::conditions::{CartItemCountCondition, CartTotalCondition, DisplayCondition};
use super::domain::{CheckoutContext, OfferView, ProductId};
use super::registry::ConditionRegistry;

/// Extension point allowing integrators to append conditions to the composite
/// before it is evaluated.
pub type ConditionHook = Box<dyn Fn(&mut CompositeCondition) + Send + Sync>;

/// Extension point choosing the logic mode, given the configured default.
pub type LogicResolver = Box<dyn Fn(ConditionLogic) -> ConditionLogic + Send + Sync>;

/// Extension point rewriting the candidate product id list before lookup.
pub type ProductIdsHook = Box<dyn Fn(Vec<ProductId>) -> Vec<ProductId> + Send + Sync>;

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionDecision {
    Admitted,
    Denied(DenialReason),
}

impl AdmissionDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionDecision::Admitted)
    }
}

/// Why order bumps were withheld for a checkout session. A denial is a normal
/// outcome, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenialReason {
    ConditionsNotMet,
    NoEligibleProducts,
}

impl DenialReason {
    pub const fn summary(self) -> &'static str {
        match self {
            DenialReason::ConditionsNotMet => "conditions not met for displaying order bumps",
            DenialReason::NoEligibleProducts => "no products available for order bumps",
        }
    }
}

/// Result of an offer listing request: either the offers to render, or the
/// reason they are withheld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferOutcome {
    Available(Vec<OfferView>),
    Withheld(DenialReason),
}

/// Service composing the condition registry, extension hooks, and catalog/cart
/// collaborators into the checkout offer flow.
pub struct OrderBumpService<C, G> {
    registry: ConditionRegistry,
    catalog: Arc<C>,
    cart: Arc<G>,
    settings: OfferSettings,
    condition_hooks: Vec<ConditionHook>,
    logic_resolver: Option<LogicResolver>,
    product_ids_hook: Option<ProductIdsHook>,
}

impl<C, G> OrderBumpService<C, G>
where
    C: ProductCatalog + 'static,
    G: CartGateway + 'static,
{
    /// Builds the service and seeds the registry with the baseline conditions
    /// derived from configuration: the cart-total threshold and the minimum
    /// item count.
    pub fn new(catalog: Arc<C>, cart: Arc<G>, settings: OfferSettings) -> Self {
        let mut registry = ConditionRegistry::new();
        registry.register(Arc::new(CartTotalCondition::new(
            settings.cart_total_threshold,
        )));
        registry.register(Arc::new(CartItemCountCondition::new(
            settings.item_count_threshold,
        )));

        Self {
            registry,
            catalog,
            cart,
            settings,
            condition_hooks: Vec::new(),
            logic_resolver: None,
            product_ids_hook: None,
        }
    }

    pub fn registry(&self) -> &ConditionRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &OfferSettings {
        &self.settings
    }

    /// Registers an additional baseline condition alongside the configured
    /// ones.
    pub fn register_condition(&mut self, condition: Arc<dyn DisplayCondition>) {
        self.registry.register(condition);
    }

    /// Registers a callback invoked with the composite before each evaluation,
    /// free to append arbitrary further conditions.
    pub fn add_condition_hook<F>(&mut self, hook: F)
    where
        F: Fn(&mut CompositeCondition) + Send + Sync + 'static,
    {
        self.condition_hooks.push(Box::new(hook));
    }

    /// Installs the logic-mode override, replacing any previous resolver.
    pub fn set_logic_resolver<F>(&mut self, resolver: F)
    where
        F: Fn(ConditionLogic) -> ConditionLogic + Send + Sync + 'static,
    {
        self.logic_resolver = Some(Box::new(resolver));
    }

    /// Installs the candidate product id override, replacing any previous
    /// hook.
    pub fn set_product_ids_hook<F>(&mut self, hook: F)
    where
        F: Fn(Vec<ProductId>) -> Vec<ProductId> + Send + Sync + 'static,
    {
        self.product_ids_hook = Some(Box::new(hook));
    }

    /// Runs one admission check against a fresh context.
    ///
    /// A new composite is assembled every time: registry members first, then
    /// hook contributions, then the resolved logic mode. The composite is
    /// dropped when the check completes.
    pub fn evaluate_admission(&self, context: &CheckoutContext) -> AdmissionDecision {
        let mut composite = CompositeCondition::new();
        composite.add_conditions(self.registry.conditions().iter().cloned());

        for hook in &self.condition_hooks {
            hook(&mut composite);
        }

        let default_logic = self.settings.condition_logic;
        let logic = match &self.logic_resolver {
            Some(resolver) => resolver(default_logic),
            None => default_logic,
        };
        composite.set_logic(logic);

        if composite.is_satisfied(context) {
            AdmissionDecision::Admitted
        } else {
            AdmissionDecision::Denied(DenialReason::ConditionsNotMet)
        }
    }

    /// Lists the offers to render for this checkout session.
    ///
    /// `excluded` carries the product ids already added during this page
    /// visit; the caller owns that state and passes it explicitly.
    pub fn offers(
        &self,
        context: &CheckoutContext,
        excluded: &[ProductId],
    ) -> Result<OfferOutcome, OfferServiceError> {
        if let AdmissionDecision::Denied(reason) = self.evaluate_admission(context) {
            debug!(reason = reason.summary(), "order bumps withheld");
            return Ok(OfferOutcome::Withheld(reason));
        }

        let mut offers = Vec::new();
        for id in self.candidate_product_ids() {
            if excluded.contains(&id) {
                continue;
            }
            let Some(product) = self.catalog.fetch(id)? else {
                continue;
            };
            if product.is_offerable() {
                offers.push(product.offer_view());
            }
        }

        if offers.is_empty() {
            debug!("no eligible order bump products");
            return Ok(OfferOutcome::Withheld(DenialReason::NoEligibleProducts));
        }

        Ok(OfferOutcome::Available(offers))
    }

    /// Adds a chosen offer to the cart through the gateway.
    pub fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), OfferServiceError> {
        self.cart.add(product_id, quantity)?;
        Ok(())
    }

    fn candidate_product_ids(&self) -> Vec<ProductId> {
        let defaults = self.settings.default_product_ids.clone();
        match &self.product_ids_hook {
            Some(hook) => hook(defaults),
            None => defaults,
        }
    }
}

/// Error raised by the offer service.
#[derive(Debug, thiserror::Error)]
pub enum OfferServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Cart(#[from] CartError),
}
