/// Authentication Routes
///
/// Thin HTTP adapter over [`SessionManager`]: decode the request, pull the
/// presented token out of the headers, delegate, and encode the response.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{extract_bearer, SessionManager};
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change request
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

/// Login response with access and refresh tokens
#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Refresh response with a new access token
#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Current user response
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
}

/// POST /api/login
///
/// # Errors
/// - 401: Incorrect email or password (same response for both)
/// - 500/503: Hashing or storage failure
pub async fn login(
    form: web::Json<LoginRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let tokens = sessions.login(&form.email, &form.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user_id: tokens.user_id,
        token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: sessions.settings().access_token_ttl_seconds,
    }))
}

/// POST /api/refresh
///
/// Expects the refresh token as `Authorization: Bearer <refresh_token>`.
///
/// # Errors
/// - 401: Missing header, or unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = extract_bearer(req.headers())?;
    let token = sessions.refresh(&refresh_token).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: sessions.settings().access_token_ttl_seconds,
    }))
}

/// POST /api/revoke
///
/// Expects the refresh token as `Authorization: Bearer <refresh_token>`.
/// Responds 204 whether or not the token was known.
pub async fn revoke(
    req: HttpRequest,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = extract_bearer(req.headers())?;
    sessions.revoke(&refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/me
///
/// **Requires valid access token** (injected by `JwtMiddleware`).
pub async fn me(user: web::ReqData<AuthenticatedUser>) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse { user_id: user.0 })
}

/// PUT /api/users/password
///
/// **Requires valid access token** (injected by `JwtMiddleware`).
///
/// # Errors
/// - 400: Empty or over-long password
/// - 401: User behind the token no longer exists
pub async fn change_password(
    user: web::ReqData<AuthenticatedUser>,
    form: web::Json<ChangePasswordRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    sessions.change_password(user.0, &form.password).await?;

    Ok(HttpResponse::NoContent().finish())
}
