//! Authentication module providing registration, login and session management.
//!
//! This module implements:
//! - Argon2id password hashing with server-side pepper
//! - HS256 access tokens (15-minute expiry) and refresh tokens (30-day expiry)
//!   signed with separate secrets
//! - Persisted sessions that refresh tokens are bound to, rotated on every refresh
//! - Single-use email verification and password reset codes
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vidshare::auth::{AuthManager, AuthSettings, RegisterRequest};
//! use vidshare::db::MemoryStore;
//! use vidshare::mail::LogMailer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthManager::new(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(LogMailer),
//!         AuthSettings {
//!             access_secret: "access_secret_at_least_32_characters".to_string(),
//!             refresh_secret: "refresh_secret_at_least_32_characters".to_string(),
//!             pepper: "pepper_of_16_chars".to_string(),
//!             app_origin: "http://localhost:5173".to_string(),
//!         },
//!     )?;
//!
//!     let session = auth
//!         .register(RegisterRequest {
//!             email: "viewer@example.com".to_string(),
//!             password: "hunter2".to_string(),
//!             user_agent: None,
//!         })
//!         .await?;
//!     println!("Registered user {}", session.user.id);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod password;
pub mod sessions;
pub mod tokens;

pub use errors::{AuthError, AuthResult};
pub use manager::{AuthManager, AuthSettings};
pub use password::CredentialHasher;
pub use models::{
    AuthContext, AuthSession, CodeId, Credentials, LoginRequest, PasswordResetConfirm,
    PasswordResetIssued, RegisterRequest, Role, Session, SessionId, SessionTokens, TokenPayload,
    User, UserId, VerificationCode, VerificationCodeKind,
};
pub use sessions::SessionManager;
pub use tokens::{TokenKind, TokenService};
