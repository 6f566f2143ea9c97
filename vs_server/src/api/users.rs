//! Current user handlers.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Serialize;
use vidshare::auth::{AuthContext, User};

use super::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct UsernameAvailability {
    pub available: bool,
}

/// The authenticated user, without password material
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.auth_manager.current_user(auth.user_id).await?))
}

/// Whether a username is still free
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UsernameAvailability>, ApiError> {
    let available = state.auth_manager.username_available(&username).await?;
    Ok(Json(UsernameAvailability { available }))
}
