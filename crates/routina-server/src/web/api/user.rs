use crate::service::ProfileFields;
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use routina_common::models::auth::{AuthError, User};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub age: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /user/signup
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> impl IntoResponse {
    let profile = ProfileFields {
        name: req.name,
        age: req.age,
    };

    match state.auth.signup(&req.username, req.password, profile).await {
        Ok(()) => Json(json!({"message": "User created successfully"})).into_response(),
        Err(AuthError::DuplicateUsername) => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Username already exists"})),
        )
            .into_response(),
        Err(AuthError::InvalidUsername) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "Username must not be empty"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Signup failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// POST /user/login
#[tracing::instrument(skip(state, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    match state.auth.login(&form.username, form.password).await {
        Ok(access_token) => Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
        .into_response(),
        Err(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Incorrect username or password"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Login failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// GET /user/me
#[tracing::instrument(skip_all)]
pub async fn me(auth: AuthUser) -> impl IntoResponse {
    let user = auth.0;
    // Respond with the client-safe model; the hash never leaves the server
    Json(User {
        username: user.username,
        name: user.name,
        age: user.age,
        created_at: user.created_at,
        last_login_at: user.last_login_at,
    })
}
