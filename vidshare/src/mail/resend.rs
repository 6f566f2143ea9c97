//! Mail delivery through the Resend HTTP API.

use super::{MailError, MailMessage, MailReceipt, Mailer};
use async_trait::async_trait;
use resend_rs::{types::CreateEmailBaseOptions, Resend};

/// Resend-backed mailer
pub struct ResendMailer {
    client: Resend,
    from: String,
}

impl ResendMailer {
    /// Create a mailer
    ///
    /// # Arguments
    ///
    /// * `api_key` - Resend API key
    /// * `from` - Sender, e.g. `Vidshare <noreply@example.com>`
    pub fn new(api_key: &str, from: String) -> Self {
        Self {
            client: Resend::new(api_key),
            from,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: MailMessage) -> Result<MailReceipt, MailError> {
        let email = CreateEmailBaseOptions::new(&self.from, [message.to], &message.subject)
            .with_html(&message.html)
            .with_text(&message.text);

        let response = self
            .client
            .emails
            .send(email)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        Ok(MailReceipt {
            id: response.id.to_string(),
        })
    }
}
