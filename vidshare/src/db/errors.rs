//! Persistence error types.

use thiserror::Error;

/// Unique constraint names shared by the PostgreSQL schema and the in-process store
pub mod constraints {
    pub const USERS_EMAIL: &str = "users_email_key";
    pub const CHANNELS_OWNER: &str = "channels_owner_id_key";
    pub const CHANNELS_NAME: &str = "channels_name_key";
    pub const CHANNELS_SLUG: &str = "channels_slug_key";
}

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Unique constraint violated; carries the constraint name
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// Row contents could not be mapped to a model
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Whether this is a unique violation of `constraint`
    pub fn is_conflict_on(&self, constraint: &str) -> bool {
        matches!(self, StoreError::Conflict(name) if name == constraint)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(db_err.constraint().unwrap_or_default().to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
