/// Error Handling Module
///
/// Every failure in the credential core maps to one of three classes:
/// 1. Validation failures (malformed headers, tokens, new passwords)
/// 2. Authentication failures (inputs that parse but do not authorize)
/// 3. Resource failures (hashing entropy, storage unavailable)
///
/// Domain errors keep the precise reason for logging. At the HTTP boundary
/// they collapse into a generic signal so the reason never reaches the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// The three failure classes of the credential core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Authentication,
    Resource,
}

// ============================================================================
// DOMAIN-SPECIFIC ERROR TYPES
// ============================================================================

/// Password hashing and verification errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    HashingFailure(String),
    Mismatch,
    MalformedHash,
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordError::HashingFailure(msg) => write!(f, "Password hashing failed: {}", msg),
            PasswordError::Mismatch => write!(f, "Password does not match"),
            PasswordError::MalformedHash => write!(f, "Stored password hash is malformed"),
        }
    }
}

impl StdError for PasswordError {}

impl PasswordError {
    pub(crate) fn class(&self) -> ErrorClass {
        match self {
            PasswordError::HashingFailure(_) => ErrorClass::Resource,
            PasswordError::Mismatch | PasswordError::MalformedHash => ErrorClass::Authentication,
        }
    }
}

/// Access token errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    SignatureInvalid,
    Expired,
    InvalidIssuer,
    MalformedSubject,
    MalformedToken,
    NegativeLifetime,
    SigningFailure(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::SignatureInvalid => write!(f, "Token signature is invalid"),
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::InvalidIssuer => write!(f, "Token issuer is not trusted"),
            TokenError::MalformedSubject => write!(f, "Token subject is not a valid user id"),
            TokenError::MalformedToken => write!(f, "Token is malformed"),
            TokenError::NegativeLifetime => write!(f, "Token lifetime is negative"),
            TokenError::SigningFailure(msg) => write!(f, "Token signing failed: {}", msg),
        }
    }
}

impl StdError for TokenError {}

impl TokenError {
    pub(crate) fn class(&self) -> ErrorClass {
        match self {
            TokenError::MalformedToken
            | TokenError::MalformedSubject
            | TokenError::NegativeLifetime => ErrorClass::Validation,
            TokenError::SigningFailure(_) => ErrorClass::Resource,
            _ => ErrorClass::Authentication,
        }
    }
}

/// Persistence collaborator errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    Unavailable(String),
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "Record not found"),
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            StoreError::Query(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl StdError for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Refresh token resolution errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshTokenError {
    NotFound,
    Revoked,
    Expired,
    Entropy(String),
    Store(StoreError),
}

impl fmt::Display for RefreshTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshTokenError::NotFound => write!(f, "Refresh token not found"),
            RefreshTokenError::Revoked => write!(f, "Refresh token has been revoked"),
            RefreshTokenError::Expired => write!(f, "Refresh token has expired"),
            RefreshTokenError::Entropy(msg) => write!(f, "Entropy source failed: {}", msg),
            RefreshTokenError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for RefreshTokenError {}

impl From<StoreError> for RefreshTokenError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => RefreshTokenError::NotFound,
            other => RefreshTokenError::Store(other),
        }
    }
}

/// Authorization header parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    MissingAuthHeader,
    MalformedAuthHeader,
    WrongScheme,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::MissingAuthHeader => write!(f, "No authorization header found"),
            HeaderError::MalformedAuthHeader => {
                write!(f, "Authorization header must be '<scheme> <token>'")
            }
            HeaderError::WrongScheme => write!(f, "Authorization header has the wrong scheme"),
        }
    }
}

impl StdError for HeaderError {}

/// Validation errors for user-supplied input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(String),
    TooLong(String, usize),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} bytes)", field, max)
            }
        }
    }
}

impl StdError for ValidationError {}

/// Client-visible authentication outcomes
///
/// Deliberately coarse: which check failed is only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    Unauthorized,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Incorrect email or password"),
            AuthError::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl StdError for AuthError {}

// ============================================================================
// UNIFIED APPLICATION ERROR TYPE
// ============================================================================

/// Central error type returned by the session manager and HTTP handlers
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Header(HeaderError),
    Auth(AuthError),
    Store(StoreError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Header(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl AppError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::Validation(_) | AppError::Header(_) => ErrorClass::Validation,
            AppError::Auth(_) => ErrorClass::Authentication,
            AppError::Store(_) | AppError::Internal(_) => ErrorClass::Resource,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<HeaderError> for AppError {
    fn from(err: HeaderError) -> Self {
        AppError::Header(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

// ============================================================================
// HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for correlating with server logs
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, error_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, error_id: &str);
}

impl ErrorHandler for AppError {
    fn error_response(&self, error_id: &str) -> (StatusCode, ErrorResponse) {
        let (status, code, message) = match self {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                e.to_string(),
            ),

            // Header detail is never echoed back
            AppError::Header(_) | AppError::Auth(AuthError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Unauthorized".to_string(),
            ),

            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                AuthError::InvalidCredentials.to_string(),
            ),

            AppError::Store(StoreError::Unavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "Service temporarily unavailable".to_string(),
            ),

            AppError::Store(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let response = ErrorResponse::new(
            error_id.to_string(),
            message,
            code.to_string(),
            status.as_u16(),
        );

        (status, response)
    }

    fn log_error(&self, error_id: &str) {
        match self.class() {
            ErrorClass::Validation | ErrorClass::Authentication => {
                tracing::warn!(error_id = error_id, error = %self, "Request rejected");
            }
            ErrorClass::Resource => {
                tracing::error!(error_id = error_id, error = %self, "Request failed");
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&error_id);

        let (status, body) = <Self as ErrorHandler>::error_response(self, &error_id);

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Header(_) | AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
