//! Core helpers for sync engine orchestration.

use serde::{Deserialize, Serialize};

use super::SyncCycleTrigger;

/// Retry policy classification for remote API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRetryClass {
    Retryable,
    Permanent,
    ReauthRequired,
}

/// Classify HTTP status into retry behavior.
pub fn classify_http_status(status: u16) -> SyncRetryClass {
    match status {
        401 | 403 => SyncRetryClass::ReauthRequired,
        408 | 409 | 423 | 425 | 429 => SyncRetryClass::Retryable,
        500..=599 => SyncRetryClass::Retryable,
        _ => SyncRetryClass::Permanent,
    }
}

/// Outcome of one sync job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncCycleStatus {
    Ok,
    /// No owner id available; nothing was done.
    NotAuthenticated,
    /// Connectivity is down; nothing was sent.
    Offline,
    /// Every remote call attempted during the job failed at transport level.
    Unreachable,
}

impl SyncCycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotAuthenticated => "not_authenticated",
            Self::Offline => "offline",
            Self::Unreachable => "unreachable",
        }
    }
}

/// Lightweight cycle metrics emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCycleResult {
    pub status: SyncCycleStatus,
    pub trigger: SyncCycleTrigger,
    pub pushed_count: usize,
    pub pulled_count: usize,
    pub flushed_count: usize,
    pub duration_ms: i64,
}

impl SyncCycleResult {
    pub fn skipped(status: SyncCycleStatus, trigger: SyncCycleTrigger) -> Self {
        Self {
            status,
            trigger,
            pushed_count: 0,
            pulled_count: 0,
            flushed_count: 0,
            duration_ms: 0,
        }
    }
}
