//! Contains all the routes that this application can handle.

mod subscribe;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::AppState;

/// Never touches the database.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/subscribe", post(subscribe::subscribe))
        .with_state(app_state)
        .route("/health", get(health))
}
