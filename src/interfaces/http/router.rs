use super::handlers;
use crate::application::bootstrap::{ProxyHandle, ServicesHandle};
use crate::application::licensing::{LicenseService, WebhookProcessor};
use crate::application::market_feed::MarketFeed;
use crate::infrastructure::observability::Metrics;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Shared handler state; every field is cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub market_feed: Arc<MarketFeed>,
    pub license_service: Arc<LicenseService>,
    pub webhook: Arc<WebhookProcessor>,
    pub proxies: Arc<ProxyHandle>,
    pub metrics: Option<Metrics>,
}

impl AppState {
    pub fn new(services: ServicesHandle, metrics: Option<Metrics>) -> Self {
        Self {
            market_feed: services.market_feed,
            license_service: services.license_service,
            webhook: services.webhook,
            proxies: services.proxies,
            metrics,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/market-data", get(handlers::market_data))
        .route("/api/license/verify", post(handlers::verify_license))
        .route("/api/webhook/lemon", post(handlers::lemon_webhook))
        .route("/api/proxy/binance", get(handlers::proxy_binance))
        .route("/api/proxy/coingecko", get(handlers::proxy_coingecko))
        .route("/api/proxy/alternative", get(handlers::proxy_alternative));

    if state.metrics.is_some() {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router.with_state(state)
}
