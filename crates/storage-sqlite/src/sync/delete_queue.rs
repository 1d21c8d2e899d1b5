//! Durable queue of remote deletes.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use expensehud_core::errors::Result;
use expensehud_core::sync::{DeleteQueueEntry, DeleteQueueRepositoryTrait, SyncEntity};

use super::model::SyncDeleteQueueDB;
use super::now_millis;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::sync_delete_queue;

/// Appends a queue entry using the caller's connection, so it commits or
/// rolls back together with the surrounding write.
pub fn write_delete_queue_entry(
    conn: &mut SqliteConnection,
    entity: SyncEntity,
    remote_id: &str,
) -> Result<DeleteQueueEntry> {
    let row = SyncDeleteQueueDB {
        id: 0,
        entity_name: entity.remote_table().to_string(),
        remote_id: remote_id.to_string(),
        deleted_at: now_millis(),
    };
    let saved = diesel::insert_into(sync_delete_queue::table)
        .values(&row)
        .returning(SyncDeleteQueueDB::as_returning())
        .get_result::<SyncDeleteQueueDB>(conn)
        .map_err(StorageError::from)?;
    Ok(saved.into())
}

pub struct DeleteQueueRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DeleteQueueRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl DeleteQueueRepositoryTrait for DeleteQueueRepository {
    fn list_entries(&self) -> Result<Vec<DeleteQueueEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = sync_delete_queue::table
            .order(sync_delete_queue::id.asc())
            .select(SyncDeleteQueueDB::as_select())
            .load::<SyncDeleteQueueDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(DeleteQueueEntry::from).collect())
    }

    async fn enqueue_delete(
        &self,
        entity: SyncEntity,
        remote_id: String,
    ) -> Result<DeleteQueueEntry> {
        self.writer
            .exec(move |conn| write_delete_queue_entry(conn, entity, &remote_id))
            .await
    }

    async fn remove_entry(&self, entry_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                Ok(
                    diesel::delete(sync_delete_queue::table.find(entry_id))
                        .execute(conn)
                        .map_err(StorageError::from)?,
                )
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_db;

    #[tokio::test]
    async fn entries_are_listed_in_insertion_order_and_removed_by_id() {
        let (pool, writer) = setup_db();
        let queue = DeleteQueueRepository::new(pool, writer);

        let first = queue
            .enqueue_delete(SyncEntity::Transaction, "r-1".to_string())
            .await
            .expect("enqueue");
        queue
            .enqueue_delete(SyncEntity::NetWorthSnapshot, "r-2".to_string())
            .await
            .expect("enqueue");

        let entries = queue.list_entries().expect("list");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_name, "transactions");
        assert_eq!(entries[1].entity_name, "net_worth_snapshots");

        assert_eq!(queue.remove_entry(first.id).await.expect("remove"), 1);
        assert_eq!(queue.remove_entry(first.id).await.expect("remove"), 0);
        let remaining = queue.list_entries().expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].remote_id, "r-2");
    }
}
