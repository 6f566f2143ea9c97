//! Channel manager.

use std::sync::Arc;

use super::{
    errors::{ChannelError, ChannelResult},
    models::{Channel, CreateChannelRequest, NewChannel},
};
use crate::auth::UserId;
use crate::db::{ContentRepository, Store, errors::constraints};

const MAX_NAME_LEN: usize = 255;
const MAX_SLUG_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Channel manager
#[derive(Clone)]
pub struct ChannelManager {
    store: Arc<dyn Store>,
}

impl ChannelManager {
    /// Create a new channel manager
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create the owner's channel and promote the owner to creator.
    ///
    /// Admins keep their role.
    ///
    /// # Errors
    ///
    /// * `ChannelError::InvalidInput` - Name, slug or description malformed
    /// * `ChannelError::AlreadyOwnsChannel` - Owner already has a channel
    /// * `ChannelError::NameTaken` - Name or slug in use
    /// * `ChannelError::OwnerNotFound` - Owner account doesn't exist
    pub async fn create_channel(
        &self,
        owner_id: UserId,
        request: CreateChannelRequest,
    ) -> ChannelResult<Channel> {
        let name = request.name.trim().to_string();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(ChannelError::InvalidInput(
                "Channel name must be 1-255 characters".to_string(),
            ));
        }
        let slug = request.slug.to_lowercase();
        validate_slug(&slug)?;
        if request
            .description
            .as_ref()
            .is_some_and(|d| d.len() > MAX_DESCRIPTION_LEN)
        {
            return Err(ChannelError::InvalidInput(
                "Description is too long (max 1000 characters)".to_string(),
            ));
        }

        let new_channel = NewChannel {
            owner_id,
            name,
            slug,
            description: request.description,
            channel_profile_image: request.channel_profile_image,
            banner_image: request.banner_image,
        };

        let channel = self
            .store
            .create_channel(&new_channel)
            .await
            .map_err(|err| {
                if err.is_conflict_on(constraints::CHANNELS_OWNER) {
                    ChannelError::AlreadyOwnsChannel
                } else if err.is_conflict_on(constraints::CHANNELS_NAME)
                    || err.is_conflict_on(constraints::CHANNELS_SLUG)
                {
                    ChannelError::NameTaken
                } else {
                    ChannelError::Store(err)
                }
            })?
            .ok_or(ChannelError::OwnerNotFound)?;

        log::info!("User {} created channel {}", owner_id, channel.id);
        Ok(channel)
    }
}

/// Slugs are lowercase alphanumeric words joined by single hyphens
fn validate_slug(slug: &str) -> ChannelResult<()> {
    let well_formed = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug.split('-').all(|word| {
            !word.is_empty()
                && word
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        });

    if !well_formed {
        return Err(ChannelError::InvalidInput(
            "Slug can only contain lowercase letters, numbers, and hyphens, and can't start or end with a hyphen"
                .to_string(),
        ));
    }
    Ok(())
}
