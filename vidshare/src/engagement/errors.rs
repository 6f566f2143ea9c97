//! Engagement error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::errors::ErrorClass;

/// Engagement errors
#[derive(Debug, Error)]
pub enum EngagementError {
    /// Persistence error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Video not found
    #[error("Video not found")]
    VideoNotFound,

    /// Comment not found
    #[error("Comment not found")]
    CommentNotFound,

    /// Channel not found
    #[error("Channel not found")]
    ChannelNotFound,

    /// Malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngagementError {
    /// Failure class used by the transport layer
    pub fn class(&self) -> ErrorClass {
        match self {
            EngagementError::VideoNotFound
            | EngagementError::CommentNotFound
            | EngagementError::ChannelNotFound => ErrorClass::NotFound,
            EngagementError::InvalidInput(_) => ErrorClass::BadRequest,
            EngagementError::Store(_) => ErrorClass::Internal,
        }
    }

    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            EngagementError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for engagement operations
pub type EngagementResult<T> = Result<T, EngagementError>;
