//! Channels and the content engagement targets.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{ChannelError, ChannelResult};
pub use manager::ChannelManager;
pub use models::{
    Channel, ChannelId, Comment, CommentId, CreateChannelRequest, Video, VideoId,
};
