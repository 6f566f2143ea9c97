//! Authentication API handlers.
//!
//! Tokens never appear in response bodies; they travel as `HttpOnly` cookies set
//! by these handlers (see [`super::cookies`]).
//!
//! # Examples
//!
//! Register a new user:
//! ```bash
//! curl -i -X POST http://localhost:8000/auth/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "ada@example.com", "password": "hunter22", "confirmPassword": "hunter22"}'
//! ```
//!
//! Refresh (the refresh cookie is only sent to this path):
//! ```bash
//! curl -i -b cookies.txt http://localhost:8000/auth/refresh
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use vidshare::auth::{LoginRequest, PasswordResetConfirm, RegisterRequest, User};

use super::{
    AppState,
    cookies::REFRESH_TOKEN_COOKIE,
    error::ApiError,
    extract::{ValidatedJson, user_agent},
    middleware::access_token,
};
use crate::metrics;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(email, length(min = 1, max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email, length(min = 1, max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordPayload {
    #[validate(email, length(min = 1, max = 255))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, max = 255))]
    pub password: String,
    pub verification_code: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

fn parse_code(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid verification code"))
}

/// Register a new user account and log it in.
///
/// # Response
///
/// `201 Created` with the user (no password material) and both auth cookies.
///
/// # Errors
///
/// - `400 Bad Request`: malformed email, empty password or mismatched confirmation
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<RegisterPayload>,
) -> Result<(StatusCode, CookieJar, Json<User>), ApiError> {
    let request = RegisterRequest {
        email: payload.email,
        password: payload.password,
        user_agent: user_agent(&headers),
    };

    let result = state.auth_manager.register(request).await;
    metrics::auth_events_total("register", result.is_ok());
    let session = result?;

    Ok((
        StatusCode::CREATED,
        state.cookies.set_tokens(jar, session.tokens),
        Json(session.user),
    ))
}

/// Authenticate with email and password.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let request = LoginRequest {
        email: payload.email,
        password: payload.password,
        user_agent: user_agent(&headers),
    };

    let result = state.auth_manager.login(request).await;
    metrics::login_attempts_total(result.is_ok());
    let session = result?;

    Ok((
        state.cookies.set_tokens(jar, session.tokens),
        MessageResponse::new("Login successful"),
    ))
}

/// Rotate the session behind the refresh cookie.
///
/// Every other session of the user is revoked. On failure both cookies are expired.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<MessageResponse>), (CookieJar, ApiError)> {
    let Some(refresh_token) = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
    else {
        return Err((
            state.cookies.clear(jar),
            ApiError::unauthorized("Missing refresh token"),
        ));
    };

    let result = state
        .auth_manager
        .refresh(&refresh_token, user_agent(&headers))
        .await;
    metrics::auth_events_total("refresh", result.is_ok());

    match result {
        Ok(session) => Ok((
            state.cookies.set_tokens(jar, session.tokens),
            MessageResponse::new("Access token refreshed"),
        )),
        Err(err) => Err((state.cookies.clear(jar), err.into())),
    }
}

/// End the session behind the access token. Always succeeds.
///
/// A store failure leaves the session row in place; it is logged and the cookies
/// are still expired.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, Json<MessageResponse>) {
    let token = access_token(&jar, &headers);
    let result = state.auth_manager.logout(token.as_deref()).await;
    metrics::auth_events_total("logout", result.is_ok());
    if let Err(err) = result {
        tracing::error!(error = %err, "Failed to delete session on logout");
    }

    (state.cookies.clear(jar), MessageResponse::new("Logout successful"))
}

/// Consume an email verification code.
///
/// # Errors
///
/// - `404 Not Found`: code unknown, expired or already used
pub async fn verify_email(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let code = parse_code(&code)?;
    let result = state.auth_manager.verify_email(code).await;
    metrics::auth_events_total("verify_email", result.is_ok());
    result?;

    Ok(MessageResponse::new("Email successfully verified"))
}

/// Mail a password reset link.
///
/// # Errors
///
/// - `404 Not Found`: no account with that email
/// - `429 Too Many Requests`: two resets already requested in the last five minutes
/// - `500 Internal Server Error`: the mail could not be sent
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = state.auth_manager.request_password_reset(&payload.email).await;
    metrics::auth_events_total("password_forgot", result.is_ok());
    result?;

    Ok(MessageResponse::new("Password reset email sent"))
}

/// Set a new password with a reset code. Every session of the user is revoked.
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<ResetPasswordPayload>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let request = PasswordResetConfirm {
        code: parse_code(&payload.verification_code)?,
        password: payload.password,
    };

    let result = state.auth_manager.reset_password(request).await;
    metrics::auth_events_total("password_reset", result.is_ok());
    result?;

    Ok((
        state.cookies.clear(jar),
        MessageResponse::new("Password reset successful"),
    ))
}
