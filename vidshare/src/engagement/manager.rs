//! Engagement toggle manager.

use std::sync::Arc;

use super::{
    errors::{EngagementError, EngagementResult},
    models::{
        BookmarkToggle, EngagementKey, ReactionKind, ReactionOutcome, SubscriptionKey,
        SubscriptionOutcome,
    },
};
use crate::auth::UserId;
use crate::channels::{ChannelId, CommentId, VideoId};
use crate::db::{EngagementRepository, Store};

/// Engagement manager
#[derive(Clone)]
pub struct EngagementManager {
    store: Arc<dyn Store>,
}

impl EngagementManager {
    /// Create a new engagement manager
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Toggle a like or dislike on a video
    ///
    /// # Errors
    ///
    /// * `EngagementError::VideoNotFound` - Video doesn't exist
    pub async fn toggle_video_reaction(
        &self,
        user_id: UserId,
        video_id: VideoId,
        kind: ReactionKind,
    ) -> EngagementResult<ReactionOutcome> {
        let outcome = self
            .store
            .toggle_video_reaction(&EngagementKey::video(user_id, video_id), kind)
            .await?
            .ok_or(EngagementError::VideoNotFound)?;

        log::debug!(
            "User {} toggled {:?} on video {}: active={}",
            user_id,
            kind,
            video_id,
            outcome.is_active
        );
        Ok(outcome)
    }

    /// Toggle a like or dislike on a comment
    ///
    /// # Errors
    ///
    /// * `EngagementError::CommentNotFound` - Comment doesn't exist
    pub async fn toggle_comment_reaction(
        &self,
        user_id: UserId,
        comment_id: CommentId,
        kind: ReactionKind,
    ) -> EngagementResult<ReactionOutcome> {
        self.store
            .toggle_comment_reaction(&EngagementKey::comment(user_id, comment_id), kind)
            .await?
            .ok_or(EngagementError::CommentNotFound)
    }

    /// Current reaction of a user on a video
    pub async fn video_reaction(
        &self,
        user_id: UserId,
        video_id: VideoId,
    ) -> EngagementResult<Option<ReactionKind>> {
        Ok(self
            .store
            .video_reaction(&EngagementKey::video(user_id, video_id))
            .await?)
    }

    /// Current reaction of a user on a comment
    pub async fn comment_reaction(
        &self,
        user_id: UserId,
        comment_id: CommentId,
    ) -> EngagementResult<Option<ReactionKind>> {
        Ok(self
            .store
            .comment_reaction(&EngagementKey::comment(user_id, comment_id))
            .await?)
    }

    /// Toggle a bookmark; returns whether the video is bookmarked afterwards
    ///
    /// # Errors
    ///
    /// * `EngagementError::InvalidInput` - Negative playback position
    /// * `EngagementError::VideoNotFound` - Video doesn't exist
    pub async fn toggle_bookmark(
        &self,
        user_id: UserId,
        video_id: VideoId,
        time: i32,
    ) -> EngagementResult<bool> {
        if time < 0 {
            return Err(EngagementError::InvalidInput(
                "Bookmark time must not be negative".to_string(),
            ));
        }

        let toggle = BookmarkToggle {
            key: EngagementKey::video(user_id, video_id),
            time,
        };

        self.store
            .toggle_bookmark(&toggle)
            .await?
            .ok_or(EngagementError::VideoNotFound)
    }

    /// Subscribe to or unsubscribe from a channel
    ///
    /// # Errors
    ///
    /// * `EngagementError::ChannelNotFound` - Channel doesn't exist
    pub async fn toggle_subscription(
        &self,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> EngagementResult<SubscriptionOutcome> {
        let key = SubscriptionKey {
            subscriber_id: user_id,
            channel_id,
        };

        let toggled = self
            .store
            .toggle_subscription(&key)
            .await?
            .ok_or(EngagementError::ChannelNotFound)?;

        Ok(toggled.into())
    }

    /// Whether the user is subscribed to a channel
    pub async fn subscription_status(
        &self,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> EngagementResult<bool> {
        let key = SubscriptionKey {
            subscriber_id: user_id,
            channel_id,
        };

        Ok(self.store.is_subscribed(&key).await?)
    }
}
