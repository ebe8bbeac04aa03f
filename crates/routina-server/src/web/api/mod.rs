pub mod middleware;
pub mod user;

use crate::state::AppState;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

pub fn build_user_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/signup", post(user::signup))
        .route("/login", post(user::login))
        .route("/me", get(user::me))
        .with_state(state)
}
