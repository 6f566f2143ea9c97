//! Session lifecycle.
//!
//! Sessions are the revocation point for refresh tokens: a token is only honoured
//! while the session row it names is live.

use chrono::{Duration, Utc};
use std::sync::Arc;

use super::{
    errors::{AuthError, AuthResult},
    models::{Session, SessionId, UserId},
};
use crate::db::{
    SessionRepository, Store,
    repository::{NewSession, SessionRotation},
};

/// Default session lifetime in days, matching the refresh token lifetime
pub const SESSION_TTL_DAYS: i64 = 30;

/// Session manager
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn Store>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a session manager with the default 30-day lifetime
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            ttl: Duration::days(SESSION_TTL_DAYS),
        }
    }

    fn new_session(&self, user_id: UserId, user_agent: Option<String>) -> NewSession {
        NewSession {
            user_id,
            user_agent,
            expires_at: Utc::now() + self.ttl,
        }
    }

    /// Create a new session. Always inserts.
    pub async fn create_session(
        &self,
        user_id: UserId,
        user_agent: Option<String>,
    ) -> AuthResult<Session> {
        let session = self
            .store
            .create_session(&self.new_session(user_id, user_agent))
            .await?;

        log::debug!("Created session {} for user {}", session.id, user_id);
        Ok(session)
    }

    /// Look up a live session; expired rows count as absent
    pub async fn get_session(&self, session_id: SessionId) -> AuthResult<Option<Session>> {
        Ok(self.store.find_session(session_id, Utc::now()).await?)
    }

    /// Delete a session. Deleting a missing session is not an error.
    pub async fn invalidate_session(&self, session_id: SessionId) -> AuthResult<()> {
        if self.store.delete_session(session_id).await? {
            log::debug!("Invalidated session {}", session_id);
        }
        Ok(())
    }

    /// Delete every session of a user
    pub async fn invalidate_all_sessions(&self, user_id: UserId) -> AuthResult<u64> {
        let removed = self.store.delete_user_sessions(user_id).await?;
        log::info!("Invalidated {} sessions for user {}", removed, user_id);
        Ok(removed)
    }

    /// Replace the stale session with a fresh one, revoking all other sessions of
    /// the user. `None` if the stale session is no longer live.
    pub async fn rotate(
        &self,
        user_id: UserId,
        stale_session_id: SessionId,
        user_agent: Option<String>,
    ) -> AuthResult<Option<Session>> {
        let rotation = SessionRotation {
            user_id,
            stale_session_id,
            replacement: self.new_session(user_id, user_agent),
            now: Utc::now(),
        };

        Ok(self.store.rotate_sessions(&rotation).await?)
    }

    /// Live sessions of a user, newest first
    pub async fn list_sessions(&self, user_id: UserId) -> AuthResult<Vec<Session>> {
        Ok(self.store.list_sessions(user_id, Utc::now()).await?)
    }

    /// Delete one of the user's own sessions
    ///
    /// # Errors
    ///
    /// * `AuthError::SessionNotFound` - No session with that id belongs to the user
    pub async fn revoke_session(&self, user_id: UserId, session_id: SessionId) -> AuthResult<()> {
        if self.store.delete_user_session(user_id, session_id).await? {
            Ok(())
        } else {
            Err(AuthError::SessionNotFound)
        }
    }
}
