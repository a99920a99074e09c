/// Persistence contracts
///
/// The credential core owns no storage. User credentials and refresh token
/// records live behind these traits; `PgStore` backs them with Postgres and
/// `InMemoryStore` keeps them in process.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::{Credential, HashedPassword, RefreshToken};
use crate::error::StoreError;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Lookup and update of user credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when no user has this email
    async fn find_credential_by_email(&self, email: &str)
        -> Result<Option<Credential>, StoreError>;

    /// Replace the stored hash for `user_id`; `NotFound` if the user does not exist
    async fn replace_password_hash(
        &self,
        user_id: Uuid,
        hashed_password: &HashedPassword,
    ) -> Result<(), StoreError>;
}

/// Refresh token records, keyed by the opaque token string
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn store_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError>;

    /// `Ok(None)` when no record matches
    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Set `revoked_at` if it is not already set; `NotFound` if no record matches
    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
