use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::{CartError, CartGateway, ProductCatalog};
use super::domain::{CheckoutContext, ProductId};
use super::service::{OfferOutcome, OfferServiceError, OrderBumpService};

/// Router builder exposing the checkout offer endpoints.
pub fn order_bump_router<C, G>(service: Arc<OrderBumpService<C, G>>) -> Router
where
    C: ProductCatalog + 'static,
    G: CartGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/checkout/order-bumps/offers",
            post(offers_handler::<C, G>),
        )
        .route(
            "/api/v1/checkout/order-bumps/cart",
            post(add_to_cart_handler::<C, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct OfferRequest {
    pub(crate) context: CheckoutContext,
    #[serde(default)]
    pub(crate) excluded_product_ids: Vec<ProductId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartAdditionRequest {
    pub(crate) product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub(crate) quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

pub(crate) async fn offers_handler<C, G>(
    State(service): State<Arc<OrderBumpService<C, G>>>,
    axum::Json(request): axum::Json<OfferRequest>,
) -> Response
where
    C: ProductCatalog + 'static,
    G: CartGateway + 'static,
{
    match service.offers(&request.context, &request.excluded_product_ids) {
        Ok(OfferOutcome::Available(offers)) => {
            let payload = json!({ "offers": offers });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(OfferOutcome::Withheld(reason)) => {
            let payload = json!({ "error": reason.summary() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn add_to_cart_handler<C, G>(
    State(service): State<Arc<OrderBumpService<C, G>>>,
    axum::Json(request): axum::Json<CartAdditionRequest>,
) -> Response
where
    C: ProductCatalog + 'static,
    G: CartGateway + 'static,
{
    if request.quantity == 0 {
        let payload = json!({ "error": "quantity must be at least 1" });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match service.add_to_cart(request.product_id, request.quantity) {
        Ok(()) => {
            let payload = json!({
                "product_id": request.product_id,
                "quantity": request.quantity,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(OfferServiceError::Cart(CartError::Rejected(product_id))) => {
            let payload = json!({
                "error": format!("product {product_id} could not be added to the cart"),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
