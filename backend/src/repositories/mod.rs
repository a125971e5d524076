//! Credential store
//!
//! Durable identities and the single current refresh token per user.
//! [`CredentialStore`] is the seam; `PgCredentialStore` is the production
//! implementation and `MemoryCredentialStore` backs tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Row needed to check a login attempt
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Public view of an identity
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Statement deadline elapsed or no pooled connection became available
    #[error("storage operation timed out")]
    Timeout,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage operations used by the account and session services.
///
/// Lookups return `Ok(None)` for a miss. Every call is bounded by the
/// implementation's statement deadline.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Number of identities registered under `email`
    async fn count_by_email(&self, email: &str) -> Result<i64, StoreError>;

    /// Create an identity, returning its id
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<i64, StoreError>;

    async fn fetch_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;

    /// Remove an identity along with its session record
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    /// Insert or overwrite the user's session record in one atomic statement.
    ///
    /// Overwriting is what invalidates the previously issued refresh token.
    async fn upsert_session_token(
        &self,
        user_id: i64,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Current refresh token, if a non-expired session record exists
    async fn fetch_session_token(&self, user_id: i64) -> Result<Option<String>, StoreError>;

    /// Remove the session record; absence is not an error
    async fn delete_session_token(&self, user_id: i64) -> Result<(), StoreError>;

    /// Cheap round-trip used by the readiness probe
    async fn health_check(&self) -> Result<(), StoreError>;
}
