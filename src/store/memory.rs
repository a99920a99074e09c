use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{CredentialStore, RefreshTokenStore};
use crate::auth::{Credential, HashedPassword, RefreshToken};
use crate::error::StoreError;

#[derive(Default)]
struct Tables {
    // keyed by email
    credentials: HashMap<String, Credential>,
    // keyed by token string
    refresh_tokens: HashMap<String, RefreshToken>,
}

/// Process-local store for tests and local development
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    /// Create or overwrite the credential for `credential.email`
    pub fn insert_credential(&self, credential: Credential) -> Result<(), StoreError> {
        self.lock()?
            .credentials
            .insert(credential.email.clone(), credential);
        Ok(())
    }

    /// Every refresh token record held for `user_id`
    pub fn refresh_tokens_for(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, StoreError> {
        Ok(self
            .lock()?
            .refresh_tokens
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_credential_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credential>, StoreError> {
        Ok(self.lock()?.credentials.get(email).cloned())
    }

    async fn replace_password_hash(
        &self,
        user_id: Uuid,
        hashed_password: &HashedPassword,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let credential = tables
            .credentials
            .values_mut()
            .find(|credential| credential.user_id == user_id)
            .ok_or(StoreError::NotFound)?;

        credential.hashed_password = hashed_password.clone();
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn store_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError> {
        self.lock()?
            .refresh_tokens
            .insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.lock()?.refresh_tokens.get(token).cloned())
    }

    async fn mark_refresh_token_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        let record = tables
            .refresh_tokens
            .get_mut(token)
            .ok_or(StoreError::NotFound)?;

        record.revoked_at.get_or_insert(revoked_at);
        Ok(())
    }
}
