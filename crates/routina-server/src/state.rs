use crate::auth::TokenCodec;
use crate::config::ServerConfig;
use crate::service::AuthService;
use anyhow::Result;
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub auth: AuthService,
}

impl AppState {
    /// Create a new app state. Fails if the auth config is invalid
    /// (placeholder secret, non-positive TTL, unusable algorithm).
    pub fn new(pool: PgPool, config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let tokens = TokenCodec::new(
            &config.auth.secret_key,
            config.auth.algorithm()?,
            Duration::minutes(config.auth.access_token_expire_minutes),
        );
        let auth = AuthService::new(pool.clone(), tokens);
        Ok(Self {
            pool,
            config: Arc::new(config),
            auth,
        })
    }
}
