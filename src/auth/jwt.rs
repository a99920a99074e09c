/// JWT Token Generation and Validation
///
/// Access tokens are HS256-signed JWTs (header.payload.signature, each
/// base64url) carrying the claims in [`Claims`]. Validation is stateless.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, EXPIRY_RESOLUTION_SECONDS, ISSUER};
use crate::error::TokenError;

/// Tolerated clock skew when checking `exp`, in seconds
pub const CLOCK_SKEW_LEEWAY_SECONDS: i64 = 0;

/// Issue a signed access token for `user_id` that expires after `ttl`
///
/// `ttl` is counted in whole seconds; see [`EXPIRY_RESOLUTION_SECONDS`].
///
/// # Errors
/// - `NegativeLifetime` if `ttl` is below zero
/// - `SigningFailure` if the token cannot be encoded
pub fn issue_access_token(
    user_id: Uuid,
    secret: &[u8],
    ttl: Duration,
) -> Result<String, TokenError> {
    if ttl < Duration::zero() {
        return Err(TokenError::NegativeLifetime);
    }
    let claims = Claims::new(user_id, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::SigningFailure(e.to_string()))
}

/// Validate an access token and return its claims
///
/// The signature is checked before anything else, so a forged token never
/// learns whether it would have been expired.
///
/// # Errors
/// - `SignatureInvalid` if the MAC does not verify against `secret`
/// - `InvalidIssuer` if the issuer is not [`ISSUER`]
/// - `Expired` if now >= `exp`
/// - `MalformedToken` for any structural failure
pub fn validate_access_token(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    // jsonwebtoken treats exp == now as valid; expiry is checked below instead
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::SignatureInvalid
            }
            ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
            _ => TokenError::MalformedToken,
        })?;

    let now = chrono::Utc::now().timestamp();
    if claims.is_expired_at(now, CLOCK_SKEW_LEEWAY_SECONDS) {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// Validate an access token and return the user it was issued to
pub fn verify_access_token(token: &str, secret: &[u8]) -> Result<Uuid, TokenError> {
    validate_access_token(token, secret)?.user_id()
}
