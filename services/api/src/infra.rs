use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use order_bumps::checkout::bumps::{
    BumpProduct, CartError, CartGateway, CatalogError, Money, ProductCatalog, ProductId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog adapter holding products in memory, standing in for a real
/// commerce backend.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProductCatalog {
    products: Arc<Mutex<HashMap<ProductId, BumpProduct>>>,
}

impl InMemoryProductCatalog {
    pub(crate) fn with_demo_products() -> Self {
        let catalog = Self::default();
        catalog.insert(BumpProduct {
            id: ProductId(187),
            name: "Gift wrap".to_string(),
            price: Money::from_cents(499),
            image_url: Some("https://cdn.example.com/products/gift-wrap.jpg".to_string()),
            purchasable: true,
            in_stock: true,
        });
        catalog.insert(BumpProduct {
            id: ProductId(36),
            name: "Extended warranty".to_string(),
            price: Money::from_cents(1999),
            image_url: Some("https://cdn.example.com/products/warranty.jpg".to_string()),
            purchasable: true,
            in_stock: true,
        });
        catalog
    }

    pub(crate) fn insert(&self, product: BumpProduct) {
        self.products
            .lock()
            .expect("catalog mutex poisoned")
            .insert(product.id, product);
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn fetch(&self, id: ProductId) -> Result<Option<BumpProduct>, CatalogError> {
        let guard = self.products.lock().expect("catalog mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

/// Cart adapter recording additions in memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCartGateway {
    additions: Arc<Mutex<Vec<(ProductId, u32)>>>,
}

impl InMemoryCartGateway {
    pub(crate) fn additions(&self) -> Vec<(ProductId, u32)> {
        self.additions.lock().expect("cart mutex poisoned").clone()
    }
}

impl CartGateway for InMemoryCartGateway {
    fn add(&self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::Rejected(product_id));
        }
        self.additions
            .lock()
            .expect("cart mutex poisoned")
            .push((product_id, quantity));
        Ok(())
    }
}
