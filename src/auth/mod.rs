/// Authentication module
///
/// Handles password hashing, access token issuance/validation, refresh token
/// management, credential extraction from request headers, and the session
/// flows built on top of them.

mod claims;
mod extract;
mod jwt;
mod password;
mod refresh_token;
mod session;

use uuid::Uuid;

pub use claims::{Claims, EXPIRY_RESOLUTION_SECONDS, ISSUER};
pub use extract::{extract_api_key, extract_bearer, API_KEY_SCHEME, BEARER_SCHEME};
pub use jwt::{issue_access_token, validate_access_token, verify_access_token, CLOCK_SKEW_LEEWAY_SECONDS};
pub use password::{hash_password, validate_new_password, verify_password, HashedPassword, HASH_COST};
pub use refresh_token::{
    generate_refresh_token, RefreshToken, RefreshTokenManager, DEFAULT_REFRESH_TOKEN_TTL_DAYS,
};
pub use session::{LoginTokens, SessionManager};

/// A user's login identity as held by the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: HashedPassword,
}
