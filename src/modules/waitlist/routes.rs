use axum::{routing::post, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn waitlist_routes() -> Router<Arc<AppState>> {
    Router::new().route("/waitlist", post(controller::join))
}
