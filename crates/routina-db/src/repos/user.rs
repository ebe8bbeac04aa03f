use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Insert failure. The duplicate case is detected from the storage-level
/// unique violation, so concurrent inserts of the same username resolve
/// deterministically: exactly one wins, the other sees `DuplicateUsername`.
#[derive(Debug, thiserror::Error)]
pub enum InsertUserError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub struct UserRepo;

impl UserRepo {
    pub async fn insert(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
        name: Option<&str>,
        age: Option<i32>,
    ) -> Result<UserRow, InsertUserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"INSERT INTO "user" (username, password_hash, name, age) VALUES ($1, $2, $3, $4)
               RETURNING username, password_hash, name, age, created_at, last_login_at"#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(name)
        .bind(age)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                InsertUserError::DuplicateUsername
            } else {
                InsertUserError::Database(e)
            }
        })?;
        Ok(row)
    }

    pub async fn exists(pool: &PgPool, username: &str) -> Result<bool> {
        let found: Option<(i32,)> =
            sqlx::query_as(r#"SELECT 1 FROM "user" WHERE username = $1"#)
                .bind(username)
                .fetch_optional(pool)
                .await
                .context("Failed to check user existence")?;
        Ok(found.is_some())
    }

    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT username, password_hash, name, age, created_at, last_login_at FROM "user" WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by username")?;
        Ok(row)
    }

    pub async fn touch_last_login(pool: &PgPool, username: &str) -> Result<()> {
        sqlx::query(r#"UPDATE "user" SET last_login_at = NOW() WHERE username = $1"#)
            .bind(username)
            .execute(pool)
            .await
            .context("Failed to update last_login_at")?;
        Ok(())
    }
}
