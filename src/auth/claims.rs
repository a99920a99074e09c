/// JWT Claims structure
///
/// Registered claims (RFC 7519) carried by every access token. All fields are
/// required; a token missing any of them fails to decode.
///
/// `iat` and `exp` are whole Unix seconds. Two tokens issued within the same
/// second share an `exp`; `jti` keeps them distinct.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TokenError;

/// The only issuer this service trusts
pub const ISSUER: &str = "chirpy";

/// Granularity of `iat` and `exp`, in seconds
pub const EXPIRY_RESOLUTION_SECONDS: i64 = 1;

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token id, unique per issued token
    pub jti: Uuid,
}

impl Claims {
    /// Create claims for `user_id` that expire `ttl` from now
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        Self::issued_at(user_id, ttl, chrono::Utc::now().timestamp())
    }

    /// Create claims issued at the Unix second `now`
    ///
    /// Any sub-second part of `ttl` is dropped. Callers reject negative
    /// lifetimes before getting here.
    pub fn issued_at(user_id: Uuid, ttl: Duration, now: i64) -> Self {
        Self {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl.num_seconds(),
            jti: Uuid::new_v4(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `MalformedSubject` if the subject is not a valid UUID
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::MalformedSubject)
    }

    /// Expired once `now` reaches `exp`, less the allowed leeway
    pub fn is_expired_at(&self, now: i64, leeway: i64) -> bool {
        now - leeway >= self.exp
    }
}
