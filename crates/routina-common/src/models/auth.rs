use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User model (safe for client responses -- no password_hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token verification failures, in decreasing order of trust:
/// the signature is checked before any claim is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature verification failed")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token could not be parsed")]
    Malformed,
}

/// Authentication failures surfaced to the HTTP boundary.
///
/// `InvalidCredentials` is deliberately shared between "no such user" and
/// "wrong password" so login responses carry no user-enumeration signal.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("incorrect username or password")]
    InvalidCredentials,
    #[error("not authorized")]
    Unauthorized,
    #[error("username must not be empty")]
    InvalidUsername,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
