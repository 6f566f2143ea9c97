//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::errors::ErrorClass;
use crate::mail::MailError;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Persistence error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Token signing failed
    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    /// Email already registered
    #[error("Email already in use")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Token expired, tampered, malformed or issued for another audience
    #[error("Invalid token")]
    InvalidToken,

    /// Access token refers to a session that no longer exists
    #[error("Session expired or invalid. Please log in again.")]
    SessionExpired,

    /// Session lookup by owner found nothing
    #[error("Session not found")]
    SessionNotFound,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Verification or reset code missing, expired, or of the wrong kind
    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    /// Too many password reset requests
    #[error("Too many requests, please try again later")]
    TooManyRequests,

    /// Malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Mail that the flow depends on could not be sent
    #[error("Mail delivery failed: {0}")]
    MailDelivery(#[from] MailError),
}

impl AuthError {
    /// Failure class used by the transport layer
    pub fn class(&self) -> ErrorClass {
        match self {
            AuthError::EmailTaken => ErrorClass::Conflict,
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::SessionExpired => {
                ErrorClass::Unauthorized
            }
            AuthError::SessionNotFound
            | AuthError::UserNotFound
            | AuthError::InvalidOrExpiredCode => ErrorClass::NotFound,
            AuthError::TooManyRequests => ErrorClass::TooManyRequests,
            AuthError::InvalidInput(_) => ErrorClass::BadRequest,
            AuthError::Store(StoreError::Conflict(_)) => ErrorClass::Conflict,
            AuthError::Store(_)
            | AuthError::HashingFailed
            | AuthError::JwtError(_)
            | AuthError::MailDelivery(_) => ErrorClass::Internal,
        }
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Store, JWT and mail errors are sanitized to prevent information disclosure
    /// about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Store(_) | AuthError::HashingFailed | AuthError::JwtError(_) => {
                "Internal server error".to_string()
            }
            AuthError::MailDelivery(_) => "Failed to send email".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
