//! Error classification.
//!
//! Each domain error (auth, engagement, channels) maps itself onto one of these
//! classes. The HTTP layer turns a class into a status code; the library never
//! depends on HTTP types.

use serde::Serialize;

/// Externally visible failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    /// Duplicate unique field
    Conflict,
    /// Bad credentials, invalid or expired token, missing session
    Unauthorized,
    /// Missing code, session or resource
    NotFound,
    /// Rate limit exceeded
    TooManyRequests,
    /// Malformed input
    BadRequest,
    /// Unexpected dependency failure
    Internal,
}
