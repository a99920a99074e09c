/// Session orchestration
///
/// Composes password verification, access tokens and refresh tokens into the
/// login, refresh, revoke and authenticate flows used by request handlers.
/// Detailed failure reasons are logged here and collapsed into
/// `InvalidCredentials` / `Unauthorized` before leaving this module.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::{issue_access_token, verify_access_token};
use crate::auth::password::{hash_password, validate_new_password, verify_password, HashedPassword};
use crate::auth::refresh_token::RefreshTokenManager;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, PasswordError, RefreshTokenError, StoreError};
use crate::store::{CredentialStore, RefreshTokenStore};

const DUMMY_PASSWORD: &str = "chirpy-login-timing-equalizer";

/// Tokens handed out by a successful login
#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct SessionManager {
    credentials: Arc<dyn CredentialStore>,
    refresh_tokens: RefreshTokenManager,
    settings: AuthSettings,
    // Verified against when the email is unknown so both paths pay for bcrypt
    dummy_hash: HashedPassword,
}

impl SessionManager {
    /// # Errors
    /// Returns `HashingFailure` if the unknown-email dummy hash cannot be built
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        refresh_token_store: Arc<dyn RefreshTokenStore>,
        settings: AuthSettings,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD)?;
        let refresh_tokens =
            RefreshTokenManager::new(refresh_token_store, settings.refresh_token_ttl());
        Ok(Self {
            credentials,
            refresh_tokens,
            settings,
            dummy_hash,
        })
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Verify email and password, then issue an access token and a new refresh token
    ///
    /// # Errors
    /// `InvalidCredentials` whether the email is unknown or the password is wrong
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginTokens, AppError> {
        let Some(credential) = self.credentials.find_credential_by_email(email).await? else {
            let _ = verify_password(password, &self.dummy_hash);
            tracing::warn!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };
        let user_id = credential.user_id;

        match verify_password(password, &credential.hashed_password) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                tracing::warn!(user_id = %user_id, "Login rejected: wrong password");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e @ PasswordError::MalformedHash) => {
                tracing::error!(
                    user_id = %user_id,
                    class = ?e.class(),
                    "Login rejected: stored hash is malformed"
                );
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e @ PasswordError::HashingFailure(_)) => {
                return Err(AppError::Internal(e.to_string()));
            }
        }

        let access_token = self.mint_access_token(user_id)?;
        let refresh = self
            .refresh_tokens
            .issue(user_id)
            .await
            .map_err(refresh_failure)?;

        tracing::info!(user_id = %user_id, "User logged in");

        Ok(LoginTokens {
            user_id,
            access_token,
            refresh_token: refresh.token,
        })
    }

    /// Mint a new access token from a valid refresh token
    ///
    /// The refresh token itself is neither rotated nor extended.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let user_id = self
            .refresh_tokens
            .resolve(refresh_token)
            .await
            .map_err(refresh_failure)?;

        let access_token = self.mint_access_token(user_id)?;
        tracing::info!(user_id = %user_id, "Access token refreshed");

        Ok(access_token)
    }

    /// Revoke a refresh token
    ///
    /// Unknown tokens are accepted silently.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        match self.refresh_tokens.revoke(refresh_token).await {
            Ok(()) => {
                tracing::info!("Refresh token revoked");
                Ok(())
            }
            Err(RefreshTokenError::NotFound) => {
                tracing::debug!("Revoke called with unknown refresh token");
                Ok(())
            }
            Err(e) => Err(refresh_failure(e)),
        }
    }

    /// Validate an access token and return the user it was issued to
    pub fn authenticate(&self, access_token: &str) -> Result<Uuid, AppError> {
        verify_access_token(access_token, self.settings.secret.as_bytes()).map_err(|e| {
            tracing::warn!(reason = %e, class = ?e.class(), "Access token rejected");
            AppError::Auth(AuthError::Unauthorized)
        })
    }

    /// Replace the password of an authenticated user
    pub async fn change_password(&self, user_id: Uuid, new_password: &str) -> Result<(), AppError> {
        validate_new_password(new_password)?;
        let hashed = hash_password(new_password).map_err(|e| AppError::Internal(e.to_string()))?;

        match self.credentials.replace_password_hash(user_id, &hashed).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, "Password changed");
                Ok(())
            }
            Err(StoreError::NotFound) => {
                tracing::warn!(user_id = %user_id, "Password change for unknown user");
                Err(AuthError::Unauthorized.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn mint_access_token(&self, user_id: Uuid) -> Result<String, AppError> {
        issue_access_token(
            user_id,
            self.settings.secret.as_bytes(),
            self.settings.access_token_ttl(),
        )
        .map_err(|e| AppError::Internal(e.to_string()))
    }
}

/// Log the precise refresh token failure and collapse it for the caller
fn refresh_failure(err: RefreshTokenError) -> AppError {
    match err {
        RefreshTokenError::NotFound | RefreshTokenError::Revoked | RefreshTokenError::Expired => {
            tracing::warn!(reason = %err, "Refresh token rejected");
            AppError::Auth(AuthError::Unauthorized)
        }
        RefreshTokenError::Entropy(msg) => AppError::Internal(msg),
        RefreshTokenError::Store(e) => AppError::Store(e),
    }
}
