//! SQLite storage for sync metadata: the local sync store and the delete queue.

mod delete_queue;
mod local_store;
mod model;
pub(crate) mod tables;

use chrono::{NaiveDateTime, SubsecRound, Utc};

pub use delete_queue::{write_delete_queue_entry, DeleteQueueRepository};
pub use local_store::LocalSyncRepository;
pub use model::SyncDeleteQueueDB;

/// Current UTC time at millisecond precision, the resolution timestamps keep
/// on the remote side.
pub(crate) fn now_millis() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(3)
}
