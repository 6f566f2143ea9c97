//! Outbound mail dispatch.
//!
//! Flows send mail through the [`Mailer`] trait. Whether a failed send aborts the
//! flow is decided by the caller: registration logs and continues, password reset
//! requests propagate the failure.

pub mod resend;
pub mod templates;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use resend::ResendMailer;

/// Message handed to a mailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Provider acknowledgement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailReceipt {
    pub id: String,
}

/// Mail errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Provider could not be reached or rejected the request
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Message was malformed
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Mail dispatch interface
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a message, returning the provider's message id
    async fn send(&self, message: MailMessage) -> Result<MailReceipt, MailError>;
}

/// Mailer that only logs messages, for local development
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<MailReceipt, MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidMessage("missing recipient".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        log::info!(
            "Mail {} to {} ({}):\n{}",
            id,
            message.to,
            message.subject,
            message.text
        );
        Ok(MailReceipt { id })
    }
}
