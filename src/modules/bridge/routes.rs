use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn bridge_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recovery-bridge",
            post(controller::store_tokens).get(controller::retrieve_tokens),
        )
        .route("/auth/callback", get(controller::callback))
        .route("/reset-password", get(controller::reset_password))
        .route("/open", get(controller::open_fallback))
}
