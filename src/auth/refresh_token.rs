/// Refresh Token Management
///
/// Refresh tokens are:
/// - 32 random bytes from the OS RNG, hex encoded (64 characters)
/// - Owned by exactly one user, valid for 60 days by default
/// - Revoked by stamping `revoked_at`, never deleted
/// - Not rotated on use; each login creates an independent record

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::RefreshTokenError;
use crate::store::RefreshTokenStore;

/// Number of random bytes in a refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Default refresh token lifetime in days
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// A refresh token record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn new(token: String, user_id: Uuid, ttl: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            token,
            user_id,
            created_at,
            expires_at: created_at + ttl,
            revoked_at: None,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Generate a new cryptographically secure refresh token
pub fn generate_refresh_token() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RefreshTokenError::Entropy(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Issues, resolves and revokes refresh tokens against a [`RefreshTokenStore`]
#[derive(Clone)]
pub struct RefreshTokenManager {
    store: Arc<dyn RefreshTokenStore>,
    ttl: Duration,
}

impl RefreshTokenManager {
    pub fn new(store: Arc<dyn RefreshTokenStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Create and store a new refresh token for `user_id`
    ///
    /// Existing tokens for the same user are left untouched.
    pub async fn issue(&self, user_id: Uuid) -> Result<RefreshToken, RefreshTokenError> {
        let record = RefreshToken::new(generate_refresh_token()?, user_id, self.ttl);
        self.store.store_refresh_token(&record).await?;

        tracing::debug!(user_id = %user_id, expires_at = %record.expires_at, "Refresh token issued");
        Ok(record)
    }

    /// Resolve a refresh token to the user that owns it
    ///
    /// # Errors
    /// - `NotFound` if no record matches
    /// - `Revoked` if the record has been revoked
    /// - `Expired` if the record is past its expiry
    pub async fn resolve(&self, token: &str) -> Result<Uuid, RefreshTokenError> {
        let record = self
            .store
            .find_refresh_token(token)
            .await?
            .ok_or(RefreshTokenError::NotFound)?;

        if record.is_revoked() {
            return Err(RefreshTokenError::Revoked);
        }

        if record.is_expired_at(Utc::now()) {
            return Err(RefreshTokenError::Expired);
        }

        Ok(record.user_id)
    }

    /// Revoke a refresh token; revoking twice is not an error
    ///
    /// # Errors
    /// Returns `NotFound` if no record matches
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        self.store
            .mark_refresh_token_revoked(token, Utc::now())
            .await?;
        Ok(())
    }
}
