//! # Vidshare
//!
//! Account, session and engagement core for a video sharing platform.
//!
//! The crate owns the two parts of the platform that carry real invariants:
//!
//! - **Authentication & sessions**: registration, login, refresh-token rotation,
//!   logout, email verification and password reset. Every refresh token is bound to a
//!   persisted session row; deleting the row revokes the token immediately.
//! - **Engagement toggles**: like/dislike reactions on videos and comments (mutually
//!   exclusive, with aggregate counters), bookmarks and channel subscriptions.
//!
//! Everything else (upload orchestration, playlists, search) lives behind the
//! persistence layer and is not modelled here.
//!
//! ## Core Modules
//!
//! - [`auth`]: token service, session manager and the auth orchestrator
//! - [`engagement`]: reaction decision table and toggle manager
//! - [`channels`]: channel creation with creator promotion
//! - [`db`]: repository traits with PostgreSQL and in-process implementations
//! - [`mail`]: outbound mail dispatch
//!
//! ## Example
//!
//! ```
//! use vidshare::engagement::{ReactionKind, Transition};
//!
//! let transition = Transition::resolve(Some(ReactionKind::Like), ReactionKind::Dislike);
//! assert_eq!(transition.next, Some(ReactionKind::Dislike));
//! assert_eq!(transition.delta.likes, -1);
//! assert_eq!(transition.delta.dislikes, 1);
//! ```

/// Authentication, tokens and sessions.
pub mod auth;

/// Channel management.
pub mod channels;

/// Persistence layer.
pub mod db;

/// Error classification shared by every domain error.
pub mod errors;

/// Likes, dislikes, bookmarks and subscriptions.
pub mod engagement;

/// Outbound mail.
pub mod mail;

pub use auth::{AuthError, AuthManager, AuthResult};
pub use db::{Database, DatabaseConfig, MemoryStore, PgStore, Store};
pub use engagement::{EngagementError, EngagementManager};
pub use errors::ErrorClass;
