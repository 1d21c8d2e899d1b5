//! Storage contracts used by the sync pipelines and the record service.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use super::{DeleteQueueEntry, LocalRecord, SyncEntity};
use crate::errors::Result;

/// Result of [`LocalSyncStoreTrait::mark_synced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkSyncedOutcome {
    /// Row is now `synced`.
    Synced,
    /// Row was edited while the push was in flight; it stays `pending`
    /// (a backfilled remote id is still stored).
    ChangedSincePush,
    /// Row was deleted while the push was in flight.
    Missing,
}

/// Local store operations needed by the sync engine and the collaborator API.
///
/// Reads are synchronous (pooled connections); writes go through the store's
/// single writer and are async.
#[async_trait]
pub trait LocalSyncStoreTrait: Send + Sync {
    fn list_records(&self, entity: SyncEntity) -> Result<Vec<LocalRecord>>;

    fn get_record(&self, entity: SyncEntity, local_id: i64) -> Result<Option<LocalRecord>>;

    /// Rows with `syncStatus = pending`, ordered by local id.
    fn list_pending(&self, entity: SyncEntity) -> Result<Vec<LocalRecord>>;

    fn find_by_remote_id(&self, entity: SyncEntity, remote_id: &str)
        -> Result<Option<LocalRecord>>;

    /// Records a successful push. `remote_id` is the id returned by a remote
    /// insert and is only written when the row has none yet. The status flips
    /// to `synced` only when the row's `updatedAt` still equals
    /// `pushed_updated_at`.
    async fn mark_synced(
        &self,
        entity: SyncEntity,
        local_id: i64,
        remote_id: Option<String>,
        pushed_updated_at: NaiveDateTime,
    ) -> Result<MarkSyncedOutcome>;

    /// Inserts a pulled row under a newly assigned local id.
    async fn insert_from_remote(&self, entity: SyncEntity, fields: Map<String, Value>)
        -> Result<i64>;

    /// Overwrites a synced row with pulled fields, keeping its local id.
    /// Returns false without writing if the row is missing or became pending.
    async fn overwrite_from_remote(
        &self,
        entity: SyncEntity,
        local_id: i64,
        fields: Map<String, Value>,
    ) -> Result<bool>;

    /// Attaches a remote id to a row that was pushed but never got its id
    /// backfilled. Returns false if the row is gone or already has a remote id.
    async fn adopt_remote_id(
        &self,
        entity: SyncEntity,
        local_id: i64,
        remote_id: String,
    ) -> Result<bool>;

    /// Replaces a `seeded` row with the remote row that holds the same
    /// default, keeping its local id and marking it `synced`. Returns false
    /// without writing if the row is gone or no longer `seeded`.
    async fn claim_seeded(
        &self,
        entity: SyncEntity,
        local_id: i64,
        fields: Map<String, Value>,
    ) -> Result<bool>;

    /// Marks every remaining `seeded` row of `entity` as `pending`. Returns the
    /// number of rows changed.
    async fn promote_seeded(&self, entity: SyncEntity) -> Result<usize>;

    /// Creates a row as `pending` with no remote id.
    async fn create_record(&self, entity: SyncEntity, fields: Map<String, Value>)
        -> Result<LocalRecord>;

    /// Applies `changes` on top of the stored row and marks it `pending`.
    async fn update_record(
        &self,
        entity: SyncEntity,
        local_id: i64,
        changes: Map<String, Value>,
    ) -> Result<LocalRecord>;

    /// Deletes a row. When it had a remote id, a delete queue entry is written
    /// in the same transaction. Returns the deleted row, if any.
    async fn delete_record(&self, entity: SyncEntity, local_id: i64)
        -> Result<Option<LocalRecord>>;
}

/// Durable queue of remote deletes.
#[async_trait]
pub trait DeleteQueueRepositoryTrait: Send + Sync {
    fn list_entries(&self) -> Result<Vec<DeleteQueueEntry>>;

    async fn enqueue_delete(&self, entity: SyncEntity, remote_id: String)
        -> Result<DeleteQueueEntry>;

    async fn remove_entry(&self, entry_id: i64) -> Result<usize>;
}
