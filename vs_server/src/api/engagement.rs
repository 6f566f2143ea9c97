//! Like, dislike, bookmark and subscription toggles.
//!
//! Each toggle is one atomic step in the store; handlers only shape the response.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidshare::auth::AuthContext;
use vidshare::engagement::{ReactionKind, ReactionOutcome, SubscriptionOutcome, SubscriptionStatus};

use super::{AppState, error::ApiError, extract::ValidatedJson};
use crate::metrics;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub outcome: ReactionOutcome,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookmarkPayload {
    /// Playback position in seconds
    #[serde(default)]
    #[validate(range(min = 0))]
    pub time: i32,
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub message: &'static str,
    pub bookmarked: bool,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionStatusResponse {
    pub subscribed: bool,
    pub status: SubscriptionStatus,
}

fn video_message(kind: ReactionKind, active: bool) -> &'static str {
    match (kind, active) {
        (ReactionKind::Like, true) => "Video liked successfully",
        (ReactionKind::Like, false) => "Video unliked successfully",
        (ReactionKind::Dislike, true) => "Video disliked successfully",
        (ReactionKind::Dislike, false) => "Video dislike removed successfully",
    }
}

fn comment_message(kind: ReactionKind, active: bool) -> &'static str {
    match (kind, active) {
        (ReactionKind::Like, true) => "Comment liked successfully",
        (ReactionKind::Like, false) => "Comment unliked successfully",
        (ReactionKind::Dislike, true) => "Comment disliked successfully",
        (ReactionKind::Dislike, false) => "Comment dislike removed successfully",
    }
}

async fn toggle_video(
    state: AppState,
    auth: AuthContext,
    video_id: i64,
    kind: ReactionKind,
) -> Result<Json<ReactionResponse>, ApiError> {
    let outcome = state
        .engagement_manager
        .toggle_video_reaction(auth.user_id, video_id, kind)
        .await?;
    metrics::engagement_toggles_total("video", outcome.is_active);

    Ok(Json(ReactionResponse {
        message: video_message(kind, outcome.is_active),
        outcome,
    }))
}

async fn toggle_comment(
    state: AppState,
    auth: AuthContext,
    comment_id: i64,
    kind: ReactionKind,
) -> Result<Json<ReactionResponse>, ApiError> {
    let outcome = state
        .engagement_manager
        .toggle_comment_reaction(auth.user_id, comment_id, kind)
        .await?;
    metrics::engagement_toggles_total("comment", outcome.is_active);

    Ok(Json(ReactionResponse {
        message: comment_message(kind, outcome.is_active),
        outcome,
    }))
}

pub async fn like_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(video_id): Path<i64>,
) -> Result<Json<ReactionResponse>, ApiError> {
    toggle_video(state, auth, video_id, ReactionKind::Like).await
}

pub async fn dislike_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(video_id): Path<i64>,
) -> Result<Json<ReactionResponse>, ApiError> {
    toggle_video(state, auth, video_id, ReactionKind::Dislike).await
}

pub async fn like_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<i64>,
) -> Result<Json<ReactionResponse>, ApiError> {
    toggle_comment(state, auth, comment_id, ReactionKind::Like).await
}

pub async fn dislike_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<i64>,
) -> Result<Json<ReactionResponse>, ApiError> {
    toggle_comment(state, auth, comment_id, ReactionKind::Dislike).await
}

/// Add or remove a bookmark at a playback position
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(video_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<BookmarkPayload>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    let bookmarked = state
        .engagement_manager
        .toggle_bookmark(auth.user_id, video_id, payload.time)
        .await?;
    metrics::engagement_toggles_total("bookmark", bookmarked);

    Ok(Json(BookmarkResponse {
        message: if bookmarked {
            "Video added to bookmarks"
        } else {
            "Video removed from bookmarks"
        },
        bookmarked,
    }))
}

/// Subscribe or unsubscribe; the subscriber count is read in the same step
pub async fn toggle_subscription(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(channel_id): Path<i64>,
) -> Result<Json<SubscriptionOutcome>, ApiError> {
    let outcome = state
        .engagement_manager
        .toggle_subscription(auth.user_id, channel_id)
        .await?;
    metrics::engagement_toggles_total("subscription", outcome.subscribed);

    Ok(Json(outcome))
}

pub async fn subscription_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(channel_id): Path<i64>,
) -> Result<Json<SubscriptionStatusResponse>, ApiError> {
    let subscribed = state
        .engagement_manager
        .subscription_status(auth.user_id, channel_id)
        .await?;

    Ok(Json(SubscriptionStatusResponse {
        subscribed,
        status: if subscribed {
            SubscriptionStatus::Active
        } else {
            SubscriptionStatus::Inactive
        },
    }))
}
