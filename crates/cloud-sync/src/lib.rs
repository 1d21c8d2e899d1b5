//! Cloud mirror for the Expense HUD local store.
//!
//! The [`translator`] maps local rows onto the remote schema, the
//! [`engine`] runs the push, pull and delete-flush pipelines against a
//! [`RemoteBackend`], and the [`orchestrator`] decides when they run.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod translator;

pub use client::RestBackendClient;
pub use config::RemoteConfig;
pub use engine::{
    AuthContext, FlushReport, PullReport, PushReport, RemoteBackend, RemoteCallStats, RemoteError,
    RemoteRow, SessionAuthContext, SyncEngine, SyncIdentity, SyncReport,
};
pub use error::{CloudSyncError, Result};
pub use orchestrator::{SyncJob, SyncOrchestrator, SyncRequest, SyncStatusSnapshot, SyncTicket};
pub use translator::{from_remote, to_remote, DateKind, LocalFragment, TranslateError};
