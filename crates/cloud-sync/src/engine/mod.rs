//! Push, pull and delete-flush pipelines.
//!
//! The engine holds no state of its own between calls: everything it needs to
//! resume lives in the local store (`syncStatus`, `remoteId`) and the delete
//! queue, so any call can be repeated safely.

mod deletes;
mod ports;
mod pull;
mod push;
mod references;
mod seeds;

use std::sync::Arc;

use expensehud_core::sync::{
    DeleteQueueEntry, DeleteQueueRepositoryTrait, LocalSyncStoreTrait, SyncEntity,
};

use crate::error::Result;

pub use ports::{
    AuthContext, RemoteBackend, RemoteError, RemoteResult, RemoteRow, SessionAuthContext,
    SyncIdentity,
};

/// Remote calls made during one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteCallStats {
    pub attempted: usize,
    /// Calls that failed at transport level.
    pub unavailable: usize,
}

impl RemoteCallStats {
    pub(crate) fn record<T>(&mut self, result: &RemoteResult<T>) {
        self.attempted += 1;
        if matches!(result, Err(err) if err.is_unavailable()) {
            self.unavailable += 1;
        }
    }

    pub fn merge(&mut self, other: RemoteCallStats) {
        self.attempted += other.attempted;
        self.unavailable += other.unavailable;
    }

    /// True when calls were made and none of them reached the backend.
    pub fn all_unavailable(&self) -> bool {
        self.attempted > 0 && self.attempted == self.unavailable
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub flushed: usize,
    pub failed: usize,
    pub calls: RemoteCallStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReport {
    pub pushed: usize,
    /// Rows left pending because a referenced row has no remote id yet.
    pub skipped: usize,
    pub failed: usize,
    /// Delete queue flush that ran after a full push.
    pub flush: FlushReport,
    /// Seeded defaults settled before a full push.
    pub seeds: PullReport,
    pub calls: RemoteCallStats,
}

impl PushReport {
    pub fn merge(&mut self, other: PushReport) {
        self.pushed += other.pushed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.flush.flushed += other.flush.flushed;
        self.flush.failed += other.flush.failed;
        self.seeds.merge(other.seeds);
        self.calls.merge(other.calls);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullReport {
    pub inserted: usize,
    pub updated: usize,
    /// Local rows matched to an existing remote row, either by origin id or
    /// as a seeded default.
    pub adopted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub calls: RemoteCallStats,
}

impl PullReport {
    /// Rows whose local state changed because of the pull.
    pub fn pulled(&self) -> usize {
        self.inserted + self.updated + self.adopted
    }

    pub fn merge(&mut self, other: PullReport) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.adopted += other.adopted;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.calls.merge(other.calls);
    }
}

/// Result of a full sync: push (with delete flush), then pull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub push: PushReport,
    pub pull: PullReport,
}

impl SyncReport {
    pub fn calls(&self) -> RemoteCallStats {
        let mut calls = self.push.calls;
        calls.merge(self.push.seeds.calls);
        calls.merge(self.push.flush.calls);
        calls.merge(self.pull.calls);
        calls
    }
}

pub struct SyncEngine {
    store: Arc<dyn LocalSyncStoreTrait>,
    delete_queue: Arc<dyn DeleteQueueRepositoryTrait>,
    backend: Arc<dyn RemoteBackend>,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn LocalSyncStoreTrait>,
        delete_queue: Arc<dyn DeleteQueueRepositoryTrait>,
        backend: Arc<dyn RemoteBackend>,
    ) -> Self {
        Self {
            store,
            delete_queue,
            backend,
        }
    }

    /// Pushes every entity in dependency order, then pulls every entity.
    pub async fn full_sync(&self, identity: &SyncIdentity) -> Result<SyncReport> {
        let push = self.push(identity).await?;
        let pull = self.pull(identity).await?;
        Ok(SyncReport { push, pull })
    }

    /// Records a remote delete to be sent by the next flush.
    pub async fn enqueue_delete(
        &self,
        entity: SyncEntity,
        remote_id: String,
    ) -> Result<DeleteQueueEntry> {
        Ok(self.delete_queue.enqueue_delete(entity, remote_id).await?)
    }
}
