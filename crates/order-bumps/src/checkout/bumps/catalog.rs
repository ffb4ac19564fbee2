use super::domain::{BumpProduct, ProductId};

/// Read access to the product catalog so the offer service can be exercised
/// in isolation from any real commerce backend.
pub trait ProductCatalog: Send + Sync {
    fn fetch(&self, id: ProductId) -> Result<Option<BumpProduct>, CatalogError>;
}

/// Error enumeration for catalog failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing the outbound cart mutation boundary.
pub trait CartGateway: Send + Sync {
    fn add(&self, product_id: ProductId, quantity: u32) -> Result<(), CartError>;
}

/// Cart mutation error.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("product {0} could not be added to the cart")]
    Rejected(ProductId),
    #[error("cart unavailable: {0}")]
    Unavailable(String),
}
