use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use order_bumps::checkout::bumps::OrderBumpService;
use order_bumps::config::AppConfig;
use order_bumps::error::AppError;
use order_bumps::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCartGateway, InMemoryProductCatalog};
use crate::routes::with_offer_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(InMemoryProductCatalog::with_demo_products());
    let cart = Arc::new(InMemoryCartGateway::default());
    let offer_service = Arc::new(OrderBumpService::new(catalog, cart, config.offers.clone()));

    let app = with_offer_routes(offer_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "order bump service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
