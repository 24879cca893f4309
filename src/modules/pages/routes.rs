use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/privacy", get(controller::privacy))
        .route("/terms", get(controller::terms))
}
