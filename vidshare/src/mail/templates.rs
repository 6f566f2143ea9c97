//! Mail templates for verification and password reset.

use super::MailMessage;

/// Email verification message
pub fn verify_email(to: &str, url: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Verify Email Address".to_string(),
        text: format!("Click on the verification link: {url}"),
        html: format!(
            "<!doctype html><html><body>\
             <h1>Verify your email</h1>\
             <p>Click the link below to confirm your email address.</p>\
             <p><a href=\"{url}\">Verify email</a></p>\
             </body></html>"
        ),
    }
}

/// Password reset message
pub fn password_reset(to: &str, url: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        text: format!("You requested a password reset. Click on the link to reset your password: {url}"),
        html: format!(
            "<!doctype html><html><body>\
             <h1>Password reset</h1>\
             <p>You requested a password reset. The link expires in one hour.</p>\
             <p><a href=\"{url}\">Reset password</a></p>\
             </body></html>"
        ),
    }
}
