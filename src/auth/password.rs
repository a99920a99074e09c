/// Password Hashing and Verification
///
/// Handles one-way password hashing with bcrypt and verification against
/// stored hashes. Neither the plaintext nor the hash is ever logged.

use bcrypt::{hash, verify, BcryptError};
use std::fmt;

use crate::error::{PasswordError, ValidationError};

/// bcrypt work factor
pub const HASH_COST: u32 = 10;

/// bcrypt only consumes the first 72 bytes of its input
const MAX_PASSWORD_BYTES: usize = 72;

/// A salted bcrypt hash of a password
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a hash loaded from storage
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// Hash a password using bcrypt
///
/// Two calls with the same input yield different hashes (fresh salt each time).
///
/// # Errors
/// Returns `HashingFailure` if bcrypt cannot produce a hash
pub fn hash_password(password: &str) -> Result<HashedPassword, PasswordError> {
    hash(password, HASH_COST)
        .map(HashedPassword)
        .map_err(|e| PasswordError::HashingFailure(e.to_string()))
}

/// Verify a password against its hash
///
/// # Errors
/// - `Mismatch` if the candidate does not match
/// - `MalformedHash` if the stored hash is not a bcrypt hash
pub fn verify_password(candidate: &str, hashed: &HashedPassword) -> Result<(), PasswordError> {
    match verify(candidate, hashed.as_str()) {
        Ok(true) => Ok(()),
        Ok(false) => Err(PasswordError::Mismatch),
        Err(BcryptError::Io(e)) => Err(PasswordError::HashingFailure(e.to_string())),
        Err(_) => Err(PasswordError::MalformedHash),
    }
}

/// Validate a password chosen by the user before it is hashed
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_BYTES,
        ));
    }

    Ok(())
}
