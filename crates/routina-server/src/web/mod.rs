pub mod api;

use crate::state::AppState;
use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/user", api::build_user_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
