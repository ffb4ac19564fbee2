use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::checkout::bumps::catalog::{
    CartError, CartGateway, CatalogError, ProductCatalog,
};
use crate::checkout::bumps::domain::{BumpProduct, CheckoutContext, Money, ProductId};
use crate::checkout::bumps::{order_bump_router, OrderBumpService};
use crate::config::OfferSettings;

pub(super) fn context(cart_total: Money, item_count: u32, is_logged_in: bool) -> CheckoutContext {
    CheckoutContext {
        cart_total,
        item_count,
        is_logged_in,
    }
}

pub(super) fn offer_settings() -> OfferSettings {
    OfferSettings::default()
}

pub(super) fn product(id: u64, name: &str, cents: i64) -> BumpProduct {
    BumpProduct {
        id: ProductId(id),
        name: name.to_string(),
        price: Money::from_cents(cents),
        image_url: Some(format!("https://cdn.example.test/products/{id}.jpg")),
        purchasable: true,
        in_stock: true,
    }
}

#[derive(Default, Clone)]
pub(super) struct StaticCatalog {
    products: Arc<Mutex<HashMap<ProductId, BumpProduct>>>,
}

impl StaticCatalog {
    pub(super) fn with_default_products() -> Self {
        let catalog = Self::default();
        catalog.insert(product(187, "Gift wrap", 499));
        catalog.insert(product(36, "Extended warranty", 1999));
        catalog
    }

    pub(super) fn insert(&self, product: BumpProduct) {
        self.products
            .lock()
            .expect("catalog mutex poisoned")
            .insert(product.id, product);
    }
}

impl ProductCatalog for StaticCatalog {
    fn fetch(&self, id: ProductId) -> Result<Option<BumpProduct>, CatalogError> {
        let guard = self.products.lock().expect("catalog mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

pub(super) struct UnavailableCatalog;

impl ProductCatalog for UnavailableCatalog {
    fn fetch(&self, _id: ProductId) -> Result<Option<BumpProduct>, CatalogError> {
        Err(CatalogError::Unavailable("catalog offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCart {
    additions: Arc<Mutex<Vec<(ProductId, u32)>>>,
}

impl MemoryCart {
    pub(super) fn additions(&self) -> Vec<(ProductId, u32)> {
        self.additions.lock().expect("cart mutex poisoned").clone()
    }
}

impl CartGateway for MemoryCart {
    fn add(&self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        self.additions
            .lock()
            .expect("cart mutex poisoned")
            .push((product_id, quantity));
        Ok(())
    }
}

pub(super) struct RejectingCart;

impl CartGateway for RejectingCart {
    fn add(&self, product_id: ProductId, _quantity: u32) -> Result<(), CartError> {
        Err(CartError::Rejected(product_id))
    }
}

pub(super) struct OfflineCart;

impl CartGateway for OfflineCart {
    fn add(&self, _product_id: ProductId, _quantity: u32) -> Result<(), CartError> {
        Err(CartError::Unavailable("cart backend offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    OrderBumpService<StaticCatalog, MemoryCart>,
    Arc<StaticCatalog>,
    Arc<MemoryCart>,
) {
    let catalog = Arc::new(StaticCatalog::with_default_products());
    let cart = Arc::new(MemoryCart::default());
    let service = OrderBumpService::new(catalog.clone(), cart.clone(), offer_settings());
    (service, catalog, cart)
}

pub(super) fn router_with_service(
    service: OrderBumpService<StaticCatalog, MemoryCart>,
) -> axum::Router {
    order_bump_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
