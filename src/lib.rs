pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::Config;
use modules::bridge::{bridge_routes, interface::BridgeStore};
use modules::pages::page_routes;
use modules::waitlist::{interface::WaitlistStore, waitlist_routes};
use services::mailer::Mailer;
use services::rate_limit::RateLimiter;
use services::security::security_headers;

pub struct AppState {
    pub config: Config,
    pub waitlist_store: Arc<dyn WaitlistStore>,
    pub bridge_store: Arc<dyn BridgeStore>,
    pub mailer: Arc<dyn Mailer>,
    pub limiter: Arc<dyn RateLimiter>,
}

pub async fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(waitlist_routes())
        .merge(bridge_routes())
        .merge(page_routes())
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 16)) // 16KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Shifted"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
