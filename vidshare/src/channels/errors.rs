//! Channel error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::errors::ErrorClass;

/// Channel errors
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Persistence error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Owner already has a channel
    #[error("User can only create one channel")]
    AlreadyOwnsChannel,

    /// Name or slug already used by another channel
    #[error("Channel name or slug already taken")]
    NameTaken,

    /// Owner account does not exist
    #[error("User not found")]
    OwnerNotFound,

    /// Malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ChannelError {
    /// Failure class used by the transport layer
    pub fn class(&self) -> ErrorClass {
        match self {
            ChannelError::AlreadyOwnsChannel | ChannelError::NameTaken => ErrorClass::Conflict,
            ChannelError::OwnerNotFound => ErrorClass::NotFound,
            ChannelError::InvalidInput(_) => ErrorClass::BadRequest,
            ChannelError::Store(_) => ErrorClass::Internal,
        }
    }

    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            ChannelError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;
