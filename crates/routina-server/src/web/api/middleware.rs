use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use routina_common::models::auth::AuthError;
use routina_db::UserRow;
use serde_json::json;
use std::sync::Arc;

/// Extractor that validates a JWT Bearer token and resolves its subject
/// against the user table. All failures are a uniform 401 carrying
/// `WWW-Authenticate: Bearer`.
#[derive(Debug)]
pub struct AuthUser(pub UserRow);

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(json!({"error": "Not authorized"})),
    )
        .into_response()
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header.and_then(|val| val.strip_prefix("Bearer ")) {
            Some(t) => t,
            None => return Err(unauthorized()),
        };

        match state.auth.resolve_current_user(token).await {
            Ok(user) => Ok(AuthUser(user)),
            Err(AuthError::Internal(e)) => {
                tracing::error!("DB error while resolving bearer token: {:#}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal server error"})),
                )
                    .into_response())
            }
            Err(_) => Err(unauthorized()),
        }
    }
}
