//! Error types for the cloud sync crate.

use expensehud_core::sync::{classify_http_status, SyncRetryClass};
use thiserror::Error;

use crate::translator::TranslateError;

/// Result type alias for cloud sync operations.
pub type Result<T> = std::result::Result<T, CloudSyncError>;

#[derive(Debug, Error)]
pub enum CloudSyncError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API error response from the remote backend
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request (missing required data, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Translation failed: {0}")]
    Translation(#[from] TranslateError),

    /// Local store failure
    #[error(transparent)]
    Store(#[from] expensehud_core::Error),

    #[error("Sync worker stopped before the job completed")]
    WorkerStopped,
}

impl CloudSyncError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify error for retry policy.
    pub fn retry_class(&self) -> SyncRetryClass {
        match self {
            Self::Api { status, .. } => classify_http_status(*status),
            Self::Http(_) => SyncRetryClass::Retryable,
            Self::Store(_) | Self::WorkerStopped => SyncRetryClass::Retryable,
            Self::Json(_)
            | Self::Config(_)
            | Self::InvalidRequest(_)
            | Self::Translation(_) => SyncRetryClass::Permanent,
        }
    }
}
