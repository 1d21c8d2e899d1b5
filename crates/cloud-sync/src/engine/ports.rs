//! Ports the sync engine talks through: the remote backend and the source of
//! the signed-in identity.

use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use expensehud_core::sync::{classify_http_status, SyncRetryClass};

use crate::error::CloudSyncError;

/// A row in remote shape: snake_case columns, owner in `user_id`.
pub type RemoteRow = Map<String, Value>;

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never got an answer (connection refused, timeout, DNS).
    #[error("Remote backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with an error status.
    #[error("Remote backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with a body that could not be read.
    #[error("Malformed response from remote backend: {0}")]
    Malformed(String),
}

impl RemoteError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub fn retry_class(&self) -> SyncRetryClass {
        match self {
            Self::Unavailable(_) => SyncRetryClass::Retryable,
            Self::Rejected { status, .. } => classify_http_status(*status),
            Self::Malformed(_) => SyncRetryClass::Permanent,
        }
    }
}

impl From<CloudSyncError> for RemoteError {
    fn from(err: CloudSyncError) -> Self {
        match err {
            CloudSyncError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                Self::Unavailable(e.to_string())
            }
            CloudSyncError::Http(e) => match e.status() {
                Some(status) => Self::rejected(status.as_u16(), e.to_string()),
                None => Self::Unavailable(e.to_string()),
            },
            CloudSyncError::Api { status, message } => Self::Rejected { status, message },
            other => Self::Malformed(other.to_string()),
        }
    }
}

/// Who the engine syncs for. All remote reads and writes are scoped to
/// `owner_id`.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncIdentity {
    pub owner_id: String,
    pub access_token: String,
}

impl SyncIdentity {
    pub fn new(owner_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for SyncIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncIdentity")
            .field("owner_id", &self.owner_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Remote table access. Every call that touches existing rows is scoped to
/// the identity's owner.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Inserts `row` and returns the id the backend assigned.
    async fn insert(
        &self,
        identity: &SyncIdentity,
        table: &str,
        row: &RemoteRow,
    ) -> RemoteResult<String>;

    async fn update(
        &self,
        identity: &SyncIdentity,
        table: &str,
        remote_id: &str,
        row: &RemoteRow,
    ) -> RemoteResult<()>;

    async fn delete(&self, identity: &SyncIdentity, table: &str, remote_id: &str)
        -> RemoteResult<()>;

    /// Every row of `table` owned by the identity.
    async fn select_owned(&self, identity: &SyncIdentity, table: &str)
        -> RemoteResult<Vec<RemoteRow>>;
}

/// Source of the signed-in identity. `None` means signed out.
pub trait AuthContext: Send + Sync {
    fn current_identity(&self) -> Option<SyncIdentity>;
}

/// In-memory session holder, updated by the host on sign-in and sign-out.
#[derive(Debug, Default)]
pub struct SessionAuthContext {
    identity: RwLock<Option<SyncIdentity>>,
}

impl SessionAuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, identity: SyncIdentity) {
        if let Ok(mut guard) = self.identity.write() {
            *guard = Some(identity);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.identity.write() {
            *guard = None;
        }
    }
}

impl AuthContext for SessionAuthContext {
    fn current_identity(&self) -> Option<SyncIdentity> {
        self.identity.read().ok().and_then(|guard| guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tracks_sign_in_and_out() {
        let session = SessionAuthContext::new();
        assert!(session.current_identity().is_none());

        session.sign_in(SyncIdentity::new("user-1", "token"));
        assert_eq!(
            session.current_identity().map(|identity| identity.owner_id),
            Some("user-1".to_string())
        );

        session.sign_out();
        assert!(session.current_identity().is_none());
    }

    #[test]
    fn debug_output_hides_access_token() {
        let rendered = format!("{:?}", SyncIdentity::new("user-1", "secret-token"));
        assert!(rendered.contains("user-1"));
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn api_errors_map_to_rejections() {
        let err: RemoteError = CloudSyncError::api(409, "duplicate key").into();
        assert_eq!(err, RemoteError::rejected(409, "duplicate key"));
        assert_eq!(err.retry_class(), SyncRetryClass::Retryable);
        assert!(!err.is_unavailable());
    }
}
