//! Channel creation.

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;
use vidshare::auth::AuthContext;
use vidshare::channels::{Channel, CreateChannelRequest};

use super::{AppState, error::ApiError, extract::ValidatedJson};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url)]
    pub channel_profile_image: Option<String>,
    #[validate(url)]
    pub banner_image: Option<String>,
}

/// Create the caller's channel; the caller becomes a creator.
///
/// # Errors
///
/// - `400 Bad Request`: invalid name, slug or image URL
/// - `409 Conflict`: caller already owns a channel, or name/slug taken
pub async fn create_channel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(payload): ValidatedJson<CreateChannelPayload>,
) -> Result<(StatusCode, Json<Channel>), ApiError> {
    let request = CreateChannelRequest {
        name: payload.name,
        slug: payload.slug,
        description: payload.description,
        channel_profile_image: payload.channel_profile_image,
        banner_image: payload.banner_image,
    };

    let channel = state
        .channel_manager
        .create_channel(auth.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(channel)))
}
