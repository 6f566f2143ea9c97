//! In-process implementation of the repository traits.
//!
//! All state sits behind one async mutex and every trait method holds the lock
//! for its whole body, so each operation is a single critical section with the
//! same atomicity the PostgreSQL transactions provide.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult, constraints};
use super::repository::{
    CodeLookup, ContentRepository, EngagementRepository, LimitedCode, NewSession, NewUser,
    NewVerificationCode, PasswordUpdate, SessionRepository, SessionRotation, Store,
    UserRepository, VerificationCodeRepository,
};
use crate::auth::models::{
    CodeId, Credentials, Role, Session, SessionId, User, UserId, VerificationCode,
};
use crate::channels::models::{
    Channel, ChannelId, Comment, CommentId, NewChannel, NewComment, NewVideo, Video, VideoId,
};
use crate::engagement::models::{
    BookmarkToggle, CounterDelta, EngagementKey, ReactionKind, ReactionOutcome, SubscriptionKey,
    SubscriptionToggled, Transition,
};

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<UserId, Credentials>,
    sessions: HashMap<SessionId, Session>,
    codes: HashMap<CodeId, VerificationCode>,
    channels: BTreeMap<ChannelId, Channel>,
    videos: BTreeMap<VideoId, Video>,
    comments: BTreeMap<CommentId, Comment>,
    video_reactions: HashMap<(UserId, VideoId), ReactionKind>,
    comment_reactions: HashMap<(UserId, CommentId), ReactionKind>,
    /// (user, video) -> playback position
    bookmarks: HashMap<(UserId, VideoId), i32>,
    /// (subscriber, channel) -> subscription id
    subscriptions: HashMap<(UserId, ChannelId), i64>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_session(&mut self, session: &NewSession) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            user_id: session.user_id,
            user_agent: session.user_agent.clone(),
            created_at: Utc::now(),
            expires_at: session.expires_at,
        };
        self.sessions.insert(session.id, session.clone());
        session
    }

    fn delete_user_sessions(&mut self, user_id: UserId) -> u64 {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.user_id != user_id);
        (before - self.sessions.len()) as u64
    }

    fn insert_code(&mut self, code: &NewVerificationCode) -> VerificationCode {
        let created = VerificationCode {
            id: Uuid::new_v4(),
            user_id: code.user_id,
            kind: code.kind,
            created_at: Utc::now(),
            expires_at: code.expires_at,
        };
        self.codes.insert(created.id, created.clone());
        created
    }

    /// Remove a live code of the requested kind, returning its owner
    fn consume_code(&mut self, lookup: &CodeLookup) -> Option<UserId> {
        let valid = self
            .codes
            .get(&lookup.id)
            .is_some_and(|code| code.is_valid_for(lookup.kind, lookup.now));
        if !valid {
            return None;
        }
        self.codes.remove(&lookup.id).map(|code| code.user_id)
    }

    fn user_mut(&mut self, user_id: UserId) -> StoreResult<&mut User> {
        self.users
            .get_mut(&user_id)
            .map(|credentials| &mut credentials.user)
            .ok_or_else(|| StoreError::InvalidData(format!("dangling user id {user_id}")))
    }
}

fn apply_delta(likes: &mut i64, dislikes: &mut i64, delta: CounterDelta) {
    *likes += delta.likes;
    *dislikes += delta.dislikes;
}

fn toggle_reaction(
    reactions: &mut HashMap<(UserId, i64), ReactionKind>,
    key: &EngagementKey,
    requested: ReactionKind,
) -> Transition {
    let slot = (key.user_id, key.target_id);
    let transition = Transition::resolve(reactions.get(&slot).copied(), requested);
    match transition.next {
        Some(kind) => reactions.insert(slot, kind),
        None => reactions.remove(&slot),
    };
    transition
}

/// In-process store for tests and local development
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> StoreResult<User> {
        let mut state = self.state.lock().await;

        if state.users.values().any(|c| c.user.email == user.email) {
            return Err(StoreError::Conflict(constraints::USERS_EMAIL.to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: state.next_id(),
            email: user.email.clone(),
            username: None,
            verified: false,
            role: user.role,
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(
            created.id,
            Credentials {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.get(&user_id).map(|c| c.user.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|c| c.user.email == email)
            .map(|c| c.user.clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|c| c.user.username.as_deref() == Some(username))
            .map(|c| c.user.clone()))
    }

    async fn find_credentials(&self, email: &str) -> StoreResult<Option<Credentials>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|c| c.user.email == email).cloned())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create_session(&self, session: &NewSession) -> StoreResult<Session> {
        let mut state = self.state.lock().await;
        Ok(state.insert_session(session))
    }

    async fn find_session(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Session>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .get(&session_id)
            .filter(|session| session.is_live(now))
            .cloned())
    }

    async fn list_sessions(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Session>> {
        let state = self.state.lock().await;
        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|session| session.user_id == user_id && session.is_live(now))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn delete_session(&self, session_id: SessionId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        Ok(state.sessions.remove(&session_id).is_some())
    }

    async fn delete_user_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let owned = state
            .sessions
            .get(&session_id)
            .is_some_and(|session| session.user_id == user_id);
        if owned {
            state.sessions.remove(&session_id);
        }
        Ok(owned)
    }

    async fn delete_user_sessions(&self, user_id: UserId) -> StoreResult<u64> {
        let mut state = self.state.lock().await;
        Ok(state.delete_user_sessions(user_id))
    }

    async fn rotate_sessions(&self, rotation: &SessionRotation) -> StoreResult<Option<Session>> {
        let mut state = self.state.lock().await;

        let stale_is_live = state
            .sessions
            .get(&rotation.stale_session_id)
            .is_some_and(|s| s.user_id == rotation.user_id && s.is_live(rotation.now));
        if !stale_is_live {
            return Ok(None);
        }

        state.delete_user_sessions(rotation.user_id);
        Ok(Some(state.insert_session(&rotation.replacement)))
    }
}

#[async_trait]
impl VerificationCodeRepository for MemoryStore {
    async fn create_code(&self, code: &NewVerificationCode) -> StoreResult<VerificationCode> {
        let mut state = self.state.lock().await;
        Ok(state.insert_code(code))
    }

    async fn create_limited_code(
        &self,
        request: &LimitedCode,
    ) -> StoreResult<Option<VerificationCode>> {
        let mut state = self.state.lock().await;
        let code = &request.code;
        let recent = state
            .codes
            .values()
            .filter(|c| {
                c.user_id == code.user_id && c.kind == code.kind && c.created_at > request.since
            })
            .count() as i64;
        if recent >= request.max_in_window {
            return Ok(None);
        }

        Ok(Some(state.insert_code(code)))
    }

    async fn consume_email_verification(&self, lookup: &CodeLookup) -> StoreResult<Option<User>> {
        let mut state = self.state.lock().await;
        let Some(user_id) = state.consume_code(lookup) else {
            return Ok(None);
        };

        let user = state.user_mut(user_id)?;
        user.verified = true;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn consume_password_reset(&self, update: &PasswordUpdate) -> StoreResult<Option<User>> {
        let mut state = self.state.lock().await;
        let Some(user_id) = state.consume_code(&update.code) else {
            return Ok(None);
        };

        let credentials = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::InvalidData(format!("dangling user id {user_id}")))?;
        credentials.password_hash = update.password_hash.clone();
        credentials.user.updated_at = Utc::now();
        let user = credentials.user.clone();

        state.delete_user_sessions(user_id);
        Ok(Some(user))
    }
}

#[async_trait]
impl EngagementRepository for MemoryStore {
    async fn toggle_video_reaction(
        &self,
        key: &EngagementKey,
        requested: ReactionKind,
    ) -> StoreResult<Option<ReactionOutcome>> {
        let mut state = self.state.lock().await;
        let State {
            videos,
            video_reactions,
            ..
        } = &mut *state;

        let Some(video) = videos.get_mut(&key.target_id) else {
            return Ok(None);
        };

        let transition = toggle_reaction(video_reactions, key, requested);
        apply_delta(&mut video.likes, &mut video.dislikes, transition.delta);

        Ok(Some(ReactionOutcome {
            is_active: transition.is_active(),
            likes: video.likes,
            dislikes: video.dislikes,
        }))
    }

    async fn toggle_comment_reaction(
        &self,
        key: &EngagementKey,
        requested: ReactionKind,
    ) -> StoreResult<Option<ReactionOutcome>> {
        let mut state = self.state.lock().await;
        let State {
            comments,
            comment_reactions,
            ..
        } = &mut *state;

        let Some(comment) = comments.get_mut(&key.target_id) else {
            return Ok(None);
        };

        let transition = toggle_reaction(comment_reactions, key, requested);
        apply_delta(&mut comment.likes, &mut comment.dislikes, transition.delta);

        Ok(Some(ReactionOutcome {
            is_active: transition.is_active(),
            likes: comment.likes,
            dislikes: comment.dislikes,
        }))
    }

    async fn video_reaction(&self, key: &EngagementKey) -> StoreResult<Option<ReactionKind>> {
        let state = self.state.lock().await;
        Ok(state
            .video_reactions
            .get(&(key.user_id, key.target_id))
            .copied())
    }

    async fn comment_reaction(&self, key: &EngagementKey) -> StoreResult<Option<ReactionKind>> {
        let state = self.state.lock().await;
        Ok(state
            .comment_reactions
            .get(&(key.user_id, key.target_id))
            .copied())
    }

    async fn toggle_bookmark(&self, toggle: &BookmarkToggle) -> StoreResult<Option<bool>> {
        let mut state = self.state.lock().await;
        if !state.videos.contains_key(&toggle.key.target_id) {
            return Ok(None);
        }

        let slot = (toggle.key.user_id, toggle.key.target_id);
        if state.bookmarks.remove(&slot).is_some() {
            return Ok(Some(false));
        }
        state.bookmarks.insert(slot, toggle.time);
        Ok(Some(true))
    }

    async fn toggle_subscription(
        &self,
        key: &SubscriptionKey,
    ) -> StoreResult<Option<SubscriptionToggled>> {
        let mut state = self.state.lock().await;
        let Some(channel) = state.channels.get(&key.channel_id).cloned() else {
            return Ok(None);
        };

        let slot = (key.subscriber_id, key.channel_id);
        let subscription_id = if state.subscriptions.remove(&slot).is_some() {
            None
        } else {
            let id = state.next_id();
            state.subscriptions.insert(slot, id);
            Some(id)
        };

        let subscriber_count = state
            .subscriptions
            .keys()
            .filter(|(_, channel_id)| *channel_id == key.channel_id)
            .count() as i64;

        Ok(Some(SubscriptionToggled {
            subscription_id,
            channel_id: channel.id,
            channel_name: channel.name,
            channel_profile_image: channel.channel_profile_image,
            subscriber_count,
        }))
    }

    async fn is_subscribed(&self, key: &SubscriptionKey) -> StoreResult<bool> {
        let state = self.state.lock().await;
        Ok(state
            .subscriptions
            .contains_key(&(key.subscriber_id, key.channel_id)))
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn create_channel(&self, channel: &NewChannel) -> StoreResult<Option<Channel>> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&channel.owner_id) {
            return Ok(None);
        }

        for existing in state.channels.values() {
            let violated = if existing.owner_id == channel.owner_id {
                Some(constraints::CHANNELS_OWNER)
            } else if existing.name == channel.name {
                Some(constraints::CHANNELS_NAME)
            } else if existing.slug == channel.slug {
                Some(constraints::CHANNELS_SLUG)
            } else {
                None
            };
            if let Some(constraint) = violated {
                return Err(StoreError::Conflict(constraint.to_string()));
            }
        }

        let created = Channel {
            id: state.next_id(),
            owner_id: channel.owner_id,
            name: channel.name.clone(),
            slug: channel.slug.clone(),
            description: channel.description.clone(),
            channel_profile_image: channel.channel_profile_image.clone(),
            banner_image: channel.banner_image.clone(),
            created_at: Utc::now(),
        };
        state.channels.insert(created.id, created.clone());

        let owner = state.user_mut(channel.owner_id)?;
        if owner.role != Role::Admin {
            owner.role = Role::Creator;
        }
        owner.updated_at = Utc::now();

        Ok(Some(created))
    }

    async fn find_channel(&self, channel_id: ChannelId) -> StoreResult<Option<Channel>> {
        let state = self.state.lock().await;
        Ok(state.channels.get(&channel_id).cloned())
    }

    async fn create_video(&self, video: &NewVideo) -> StoreResult<Video> {
        let mut state = self.state.lock().await;
        if !state.channels.contains_key(&video.channel_id) {
            return Err(StoreError::InvalidData(format!(
                "unknown channel id {}",
                video.channel_id
            )));
        }

        let created = Video {
            id: state.next_id(),
            channel_id: video.channel_id,
            title: video.title.clone(),
            likes: 0,
            dislikes: 0,
            created_at: Utc::now(),
        };
        state.videos.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_video(&self, video_id: VideoId) -> StoreResult<Option<Video>> {
        let state = self.state.lock().await;
        Ok(state.videos.get(&video_id).cloned())
    }

    async fn create_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        let mut state = self.state.lock().await;
        if !state.videos.contains_key(&comment.video_id) {
            return Err(StoreError::InvalidData(format!(
                "unknown video id {}",
                comment.video_id
            )));
        }

        let created = Comment {
            id: state.next_id(),
            video_id: comment.video_id,
            user_id: comment.user_id,
            content: comment.content.clone(),
            likes: 0,
            dislikes: 0,
            created_at: Utc::now(),
        };
        state.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_comment(&self, comment_id: CommentId) -> StoreResult<Option<Comment>> {
        let state = self.state.lock().await;
        Ok(state.comments.get(&comment_id).cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
