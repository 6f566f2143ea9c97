//! Repository trait definitions.
//!
//! Each persistence operation takes a typed parameter struct. Operations that
//! must be atomic (session rotation, code consumption, toggles, channel creation)
//! are single trait methods so every implementation runs them as one unit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::StoreResult;
use crate::auth::models::{
    CodeId, Credentials, Role, Session, SessionId, User, UserId, VerificationCode,
    VerificationCodeKind,
};
use crate::channels::models::{
    Channel, ChannelId, Comment, CommentId, NewChannel, NewComment, NewVideo, Video, VideoId,
};
use crate::engagement::models::{
    BookmarkToggle, EngagementKey, ReactionKind, ReactionOutcome, SubscriptionKey,
    SubscriptionToggled,
};

/// User insert parameters
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Session insert parameters
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: UserId,
    pub user_agent: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Session rotation parameters
#[derive(Debug, Clone)]
pub struct SessionRotation {
    pub user_id: UserId,
    /// Session the presented refresh token points at; must still be live
    pub stale_session_id: SessionId,
    pub replacement: NewSession,
    pub now: DateTime<Utc>,
}

/// Verification code insert parameters
#[derive(Debug, Clone)]
pub struct NewVerificationCode {
    pub user_id: UserId,
    pub kind: VerificationCodeKind,
    pub expires_at: DateTime<Utc>,
}

/// Code insert bounded by a per-user issuance window
#[derive(Debug, Clone)]
pub struct LimitedCode {
    pub code: NewVerificationCode,
    /// Start of the counting window
    pub since: DateTime<Utc>,
    /// Codes of the same kind allowed inside the window
    pub max_in_window: i64,
}

/// Live code lookup
#[derive(Debug, Clone)]
pub struct CodeLookup {
    pub id: CodeId,
    pub kind: VerificationCodeKind,
    pub now: DateTime<Utc>,
}

/// Password reset consumption parameters
#[derive(Debug, Clone)]
pub struct PasswordUpdate {
    pub code: CodeLookup,
    pub password_hash: String,
}

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. A duplicate email fails with a conflict on `users_email_key`.
    async fn create_user(&self, user: &NewUser) -> StoreResult<User>;

    /// Find user by ID
    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>>;

    /// Find user by email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Find user by username
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Find user and password hash by email
    async fn find_credentials(&self, email: &str) -> StoreResult<Option<Credentials>>;
}

/// Session persistence
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a session
    async fn create_session(&self, session: &NewSession) -> StoreResult<Session>;

    /// Find a session that is live at `now`
    async fn find_session(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Session>>;

    /// Live sessions of a user, newest first
    async fn list_sessions(&self, user_id: UserId, now: DateTime<Utc>)
    -> StoreResult<Vec<Session>>;

    /// Delete a session; returns whether a row was removed
    async fn delete_session(&self, session_id: SessionId) -> StoreResult<bool>;

    /// Delete a session only if it belongs to `user_id`
    async fn delete_user_session(&self, user_id: UserId, session_id: SessionId)
    -> StoreResult<bool>;

    /// Delete every session of a user; returns the number removed
    async fn delete_user_sessions(&self, user_id: UserId) -> StoreResult<u64>;

    /// Atomically require the stale session to be live, delete all of the user's
    /// sessions and insert the replacement. `None` if the stale session was gone.
    async fn rotate_sessions(&self, rotation: &SessionRotation) -> StoreResult<Option<Session>>;
}

/// Verification code persistence
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Insert a code
    async fn create_code(&self, code: &NewVerificationCode) -> StoreResult<VerificationCode>;

    /// Insert a code unless the owner already has `max_in_window` codes of the
    /// same kind since `since`. Count and insert are one atomic step; `None`
    /// when the limit is reached.
    async fn create_limited_code(
        &self,
        request: &LimitedCode,
    ) -> StoreResult<Option<VerificationCode>>;

    /// Atomically consume a live email verification code and mark its owner verified
    async fn consume_email_verification(&self, lookup: &CodeLookup) -> StoreResult<Option<User>>;

    /// Atomically consume a live password reset code, replace the owner's
    /// password hash and delete all of the owner's sessions
    async fn consume_password_reset(&self, update: &PasswordUpdate) -> StoreResult<Option<User>>;
}

/// Engagement persistence.
///
/// Toggles return `None` when the target does not exist.
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Apply a like/dislike toggle on a video and its counters in one transaction
    async fn toggle_video_reaction(
        &self,
        key: &EngagementKey,
        requested: ReactionKind,
    ) -> StoreResult<Option<ReactionOutcome>>;

    /// Apply a like/dislike toggle on a comment and its counters in one transaction
    async fn toggle_comment_reaction(
        &self,
        key: &EngagementKey,
        requested: ReactionKind,
    ) -> StoreResult<Option<ReactionOutcome>>;

    /// Current reaction of a user on a video
    async fn video_reaction(&self, key: &EngagementKey) -> StoreResult<Option<ReactionKind>>;

    /// Current reaction of a user on a comment
    async fn comment_reaction(&self, key: &EngagementKey) -> StoreResult<Option<ReactionKind>>;

    /// Toggle bookmark membership; returns whether the bookmark now exists
    async fn toggle_bookmark(&self, toggle: &BookmarkToggle) -> StoreResult<Option<bool>>;

    /// Toggle subscription membership and read the subscriber count in the same transaction
    async fn toggle_subscription(
        &self,
        key: &SubscriptionKey,
    ) -> StoreResult<Option<SubscriptionToggled>>;

    /// Whether the subscription exists
    async fn is_subscribed(&self, key: &SubscriptionKey) -> StoreResult<bool>;
}

/// Channel, video and comment persistence
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert a channel and promote its owner to creator in one transaction.
    /// `None` if the owner does not exist.
    async fn create_channel(&self, channel: &NewChannel) -> StoreResult<Option<Channel>>;

    /// Find channel by ID
    async fn find_channel(&self, channel_id: ChannelId) -> StoreResult<Option<Channel>>;

    /// Insert a video
    async fn create_video(&self, video: &NewVideo) -> StoreResult<Video>;

    /// Find video by ID
    async fn find_video(&self, video_id: VideoId) -> StoreResult<Option<Video>>;

    /// Insert a comment
    async fn create_comment(&self, comment: &NewComment) -> StoreResult<Comment>;

    /// Find comment by ID
    async fn find_comment(&self, comment_id: CommentId) -> StoreResult<Option<Comment>>;
}

/// Complete persistence backend
#[async_trait]
pub trait Store:
    UserRepository
    + SessionRepository
    + VerificationCodeRepository
    + EngagementRepository
    + ContentRepository
{
    /// Check that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
