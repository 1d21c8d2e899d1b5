//! Error types shared by every Expense HUD crate.

use thiserror::Error;

/// Result alias used across the core, storage and sync crates.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Sync failed: {0}")]
    Sync(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid decimal value '{value}' for field '{field}'")]
    InvalidDecimal { field: String, value: String },
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Database(DatabaseError::NotFound(message.into()))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::InvalidInput(message.into()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Database(DatabaseError::NotFound(_)))
    }
}
