//! Session listing and revocation.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use vidshare::auth::{AuthContext, Session, SessionId};

use super::{AppState, auth::MessageResponse, error::ApiError};

/// Session as shown to its owner
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: SessionId,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_current: bool,
}

impl SessionView {
    fn new(session: Session, current: SessionId) -> Self {
        Self {
            is_current: session.id == current,
            id: session.id,
            user_agent: session.user_agent,
            created_at: session.created_at,
        }
    }
}

/// Live sessions of the caller, newest first
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<SessionView>>, ApiError> {
    let sessions = state.auth_manager.list_sessions(auth.user_id).await?;
    Ok(Json(
        sessions
            .into_iter()
            .map(|session| SessionView::new(session, auth.session_id))
            .collect(),
    ))
}

/// Revoke one of the caller's sessions
///
/// # Errors
///
/// - `404 Not Found`: no such session for this user
pub async fn delete_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let session_id =
        Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid session id"))?;
    state
        .auth_manager
        .revoke_session(auth.user_id, session_id)
        .await?;

    Ok(MessageResponse::new("Session removed"))
}
