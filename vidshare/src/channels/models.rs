//! Channel, video and comment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

/// Channel ID type
pub type ChannelId = i64;

/// Video ID type
pub type VideoId = i64;

/// Comment ID type
pub type CommentId = i64;

/// Channel model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub owner_id: UserId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub channel_profile_image: Option<String>,
    pub banner_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Video model; only the fields engagement toggles touch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub channel_id: ChannelId,
    pub title: String,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
}

/// Comment model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub video_id: VideoId,
    pub user_id: UserId,
    pub content: String,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
}

/// Channel creation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub channel_profile_image: Option<String>,
    pub banner_image: Option<String>,
}

/// Channel insert parameters
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub owner_id: UserId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub channel_profile_image: Option<String>,
    pub banner_image: Option<String>,
}

/// Video insert parameters
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub channel_id: ChannelId,
    pub title: String,
}

/// Comment insert parameters
#[derive(Debug, Clone)]
pub struct NewComment {
    pub video_id: VideoId,
    pub user_id: UserId,
    pub content: String,
}
