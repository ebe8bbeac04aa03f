use crate::auth::{hash_password, verify_password, TokenCodec};
use anyhow::Context;
use routina_common::models::auth::AuthError;
use routina_db::{InsertUserError, UserRepo, UserRow};
use sqlx::PgPool;

/// Profile fields carried through signup. Opaque to authentication.
#[derive(Debug, Default, Clone)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub age: Option<i32>,
}

/// Orchestrates signup, login, and the bearer-token gate.
///
/// Stateless per call: the only durable state is the user table, and issued
/// tokens are never persisted server-side.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    tokens: TokenCodec,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: TokenCodec) -> Self {
        Self { pool, tokens }
    }

    /// Register a new user. The plaintext password exists only long enough
    /// to be hashed and is never logged.
    pub async fn signup(
        &self,
        username: &str,
        password: String,
        profile: ProfileFields,
    ) -> Result<(), AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::InvalidUsername);
        }

        // Fast path for the common conflict; the unique constraint below is
        // what actually closes the concurrent-signup race.
        if UserRepo::exists(&self.pool, username).await? {
            return Err(AuthError::DuplicateUsername);
        }

        // Argon2 is deliberately slow; keep it off the async dispatch path.
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        match UserRepo::insert(
            &self.pool,
            username,
            &password_hash,
            profile.name.as_deref(),
            profile.age,
        )
        .await
        {
            Ok(_) => Ok(()),
            Err(InsertUserError::DuplicateUsername) => Err(AuthError::DuplicateUsername),
            Err(InsertUserError::Database(e)) => {
                Err(anyhow::Error::new(e).context("Failed to insert user").into())
            }
        }
    }

    /// Authenticate and issue an access token.
    ///
    /// An unknown username and a wrong password return the same
    /// `InvalidCredentials` so responses carry no enumeration signal.
    pub async fn login(&self, username: &str, password: String) -> Result<String, AuthError> {
        let user = UserRepo::get_by_username(&self.pool, username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let stored_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .context("Password verification task panicked")?;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        // Best-effort; a failed timestamp update must not fail the login
        if let Err(e) = UserRepo::touch_last_login(&self.pool, &user.username).await {
            tracing::warn!("Failed to update last_login_at for {}: {:#}", user.username, e);
        }

        let token = self
            .tokens
            .encode(&user.username)
            .context("Failed to issue access token")?;
        Ok(token)
    }

    /// Resolve the user behind a bearer token.
    ///
    /// Every failure mode -- bad signature, expiry, malformed token, or a
    /// subject that no longer exists -- collapses into `Unauthorized`.
    pub async fn resolve_current_user(&self, token: &str) -> Result<UserRow, AuthError> {
        let claims = self
            .tokens
            .decode(token)
            .map_err(|_| AuthError::Unauthorized)?;

        UserRepo::get_by_username(&self.pool, &claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)
    }
}
