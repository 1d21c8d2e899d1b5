//! Database models for sync bookkeeping tables.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use expensehud_core::sync::DeleteQueueEntry;

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = crate::schema::sync_delete_queue)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncDeleteQueueDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub entity_name: String,
    pub remote_id: String,
    pub deleted_at: NaiveDateTime,
}

impl From<SyncDeleteQueueDB> for DeleteQueueEntry {
    fn from(db: SyncDeleteQueueDB) -> Self {
        Self {
            id: db.id,
            entity_name: db.entity_name,
            remote_id: db.remote_id,
            deleted_at: db.deleted_at,
        }
    }
}
