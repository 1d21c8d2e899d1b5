use log::{debug, warn};

use expensehud_core::sync::SyncEntity;

use super::{FlushReport, SyncEngine, SyncIdentity};
use crate::error::Result;

impl SyncEngine {
    /// Sends every queued delete. Entries are removed only after the backend
    /// confirmed the delete; anything else stays queued for the next flush.
    pub async fn flush_deletes(&self, identity: &SyncIdentity) -> Result<FlushReport> {
        let entries = self.delete_queue.list_entries()?;
        let mut report = FlushReport::default();

        for entry in entries {
            let Some(entity) = SyncEntity::from_remote_table(&entry.entity_name) else {
                warn!(
                    "[Sync] Delete queue entry {} names unknown table '{}'",
                    entry.id, entry.entity_name
                );
                report.failed += 1;
                continue;
            };

            let result = self
                .backend
                .delete(identity, entity.remote_table(), &entry.remote_id)
                .await;
            report.calls.record(&result);
            if let Err(err) = result {
                warn!(
                    "[Sync] Failed to delete {} {}: {}",
                    entity, entry.remote_id, err
                );
                report.failed += 1;
                continue;
            }

            match self.delete_queue.remove_entry(entry.id).await {
                Ok(_) => report.flushed += 1,
                Err(err) => {
                    warn!(
                        "[Sync] Deleted {} {} remotely but could not clear queue entry {}: {}",
                        entity, entry.remote_id, entry.id, err
                    );
                    report.failed += 1;
                }
            }
        }

        if report.flushed > 0 || report.failed > 0 {
            debug!(
                "[Sync] Flushed {} queued delete(s), {} left",
                report.flushed, report.failed
            );
        }
        Ok(report)
    }
}
