//! Authentication middleware for protected endpoints.
//!
//! The access token is read from the `accessToken` cookie, falling back to an
//! `Authorization: Bearer` header. A verified token must also resolve to a live
//! session row; the resulting [`AuthContext`] is injected into request extensions.
//!
//! # Extracting the identity
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use vidshare::auth::AuthContext;
//!
//! async fn protected_handler(Extension(auth): Extension<AuthContext>) -> String {
//!     format!("Authenticated as user {}", auth.user_id)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::{AppState, cookies::ACCESS_TOKEN_COOKIE, error::ApiError};
use crate::{logging, metrics};

/// Access token from the cookie jar or the bearer header
pub fn access_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_string)
        })
}

/// Authentication middleware that validates the access token and its session.
///
/// # Behavior
///
/// - **Success**: injects `AuthContext` into request extensions and calls the next handler
/// - **Missing, invalid or expired token**: `401 Unauthorized`
/// - **Session deleted or expired**: `401 Unauthorized`
///
/// Every rejection also expires both auth cookies.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = access_token(&jar, request.headers()) else {
        return reject(&state, jar, ApiError::unauthorized("Not authorized"));
    };

    match state.auth_manager.authenticate(&token).await {
        Ok(auth) => {
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        Err(err) => {
            logging::log_security_event("session_rejected", None, &err.to_string());
            reject(&state, jar, err.into())
        }
    }
}

fn reject(state: &AppState, jar: CookieJar, error: ApiError) -> Response {
    metrics::sessions_rejected_total();
    (state.cookies.clear(jar), error).into_response()
}
