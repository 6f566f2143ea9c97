//! Authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User ID type
pub type UserId = i64;

/// Session ID type
pub type SessionId = Uuid;

/// Verification code ID type
pub type CodeId = Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Viewer,
    Creator,
    Admin,
}

impl Role {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "VIEWER",
            Role::Creator => "CREATOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse the stored representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "VIEWER" => Some(Role::Viewer),
            "CREATOR" => Some(Role::Creator),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model.
///
/// Carries no password material. The hash only exists inside [`Credentials`],
/// which is not serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: Option<String>,
    pub verified: bool,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User together with the stored password hash, used only for login
#[derive(Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Session model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is still usable at `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Verification code purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationCodeKind {
    EmailVerification,
    PasswordReset,
}

impl VerificationCodeKind {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationCodeKind::EmailVerification => "email_verification",
            VerificationCodeKind::PasswordReset => "password_reset",
        }
    }

    /// Parse the stored representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email_verification" => Some(VerificationCodeKind::EmailVerification),
            "password_reset" => Some(VerificationCodeKind::PasswordReset),
            _ => None,
        }
    }
}

/// Single-use verification code
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationCode {
    pub id: CodeId,
    pub user_id: UserId,
    pub kind: VerificationCodeKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// A code is usable only for its own kind and only before it expires
    pub fn is_valid_for(&self, kind: VerificationCodeKind, now: DateTime<Utc>) -> bool {
        self.kind == kind && now < self.expires_at
    }
}

/// Identity carried inside access and refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPayload {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub role: Role,
}

/// Access/refresh token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of register, login and refresh
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub session: Session,
    pub tokens: SessionTokens,
}

/// Authenticated request identity, resolved from a verified access token and a live session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub role: Role,
}

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub user_agent: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub user_agent: Option<String>,
}

/// Password reset confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfirm {
    pub code: CodeId,
    pub password: String,
}

/// Issued password reset, returned after the mail was accepted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetIssued {
    pub url: String,
    pub email_id: String,
    pub expires_at: DateTime<Utc>,
}
