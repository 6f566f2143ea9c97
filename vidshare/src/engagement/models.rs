//! Engagement data models and the reaction decision table.

use serde::{Deserialize, Serialize};

use crate::auth::UserId;
use crate::channels::{ChannelId, CommentId, VideoId};

/// Reaction kind; like and dislike are mutually exclusive per (user, target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "LIKE",
            ReactionKind::Dislike => "DISLIKE",
        }
    }

    /// Parse the stored representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LIKE" => Some(ReactionKind::Like),
            "DISLIKE" => Some(ReactionKind::Dislike),
            _ => None,
        }
    }
}

/// Counter adjustment applied together with a reaction transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub likes: i64,
    pub dislikes: i64,
}

/// Resolved reaction transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Reaction left in place after the toggle, if any
    pub next: Option<ReactionKind>,
    pub delta: CounterDelta,
}

impl Transition {
    /// Resolve a toggle request against the current reaction.
    ///
    /// Requesting the current kind clears it. Requesting the other kind swaps.
    /// With no current reaction the requested kind is set.
    pub fn resolve(current: Option<ReactionKind>, requested: ReactionKind) -> Self {
        let next = if current == Some(requested) {
            None
        } else {
            Some(requested)
        };

        let mut delta = CounterDelta::default();
        for (kind, sign) in [(current, -1), (next, 1)] {
            match kind {
                Some(ReactionKind::Like) => delta.likes += sign,
                Some(ReactionKind::Dislike) => delta.dislikes += sign,
                None => {}
            }
        }

        Self { next, delta }
    }

    /// Whether the requested reaction is set after the toggle
    pub fn is_active(&self) -> bool {
        self.next.is_some()
    }
}

/// (user, target) pair addressed by a reaction or bookmark toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngagementKey {
    pub user_id: UserId,
    pub target_id: i64,
}

impl EngagementKey {
    pub fn video(user_id: UserId, video_id: VideoId) -> Self {
        Self {
            user_id,
            target_id: video_id,
        }
    }

    pub fn comment(user_id: UserId, comment_id: CommentId) -> Self {
        Self {
            user_id,
            target_id: comment_id,
        }
    }
}

/// Bookmark toggle parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkToggle {
    pub key: EngagementKey,
    /// Playback position in seconds
    pub time: i32,
}

/// Subscription toggle parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    pub subscriber_id: UserId,
    pub channel_id: ChannelId,
}

/// Result of a reaction toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionOutcome {
    pub is_active: bool,
    pub likes: i64,
    pub dislikes: i64,
}

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

/// Store-level result of a subscription toggle, read inside the same transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionToggled {
    /// Id of the created subscription; `None` after unsubscribing
    pub subscription_id: Option<i64>,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub channel_profile_image: Option<String>,
    pub subscriber_count: i64,
}

/// Result of a subscription toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionOutcome {
    #[serde(rename = "id")]
    pub subscription_id: Option<i64>,
    pub subscribed: bool,
    pub status: SubscriptionStatus,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub channel_profile_image: Option<String>,
    pub subscriber_count: i64,
    pub message: String,
}

impl From<SubscriptionToggled> for SubscriptionOutcome {
    fn from(toggled: SubscriptionToggled) -> Self {
        let subscribed = toggled.subscription_id.is_some();
        Self {
            subscription_id: toggled.subscription_id,
            subscribed,
            status: if subscribed {
                SubscriptionStatus::Active
            } else {
                SubscriptionStatus::Inactive
            },
            channel_id: toggled.channel_id,
            channel_name: toggled.channel_name,
            channel_profile_image: toggled.channel_profile_image,
            subscriber_count: toggled.subscriber_count,
            message: if subscribed {
                "Subscribed successfully".to_string()
            } else {
                "Unsubscribed successfully".to_string()
            },
        }
    }
}
