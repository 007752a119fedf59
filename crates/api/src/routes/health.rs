//! Health check endpoint.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::AppState;

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "unifin",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates the health check route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
