use log::{debug, warn};

use expensehud_core::sync::{LocalRecord, MarkSyncedOutcome, SyncEntity, SYNC_ORDER};

use super::references::{resolve_outbound, RowError};
use super::{PushReport, RemoteCallStats, SyncEngine, SyncIdentity};
use crate::error::Result;
use crate::translator::to_remote;

impl SyncEngine {
    /// Settles seeded defaults, pushes pending rows of every entity in
    /// dependency order, then flushes the delete queue.
    pub async fn push(&self, identity: &SyncIdentity) -> Result<PushReport> {
        let mut report = PushReport {
            seeds: self.reconcile_seeds(identity).await?,
            ..PushReport::default()
        };
        for entity in SYNC_ORDER {
            report.merge(self.push_entity(identity, entity).await?);
        }
        report.flush = self.flush_deletes(identity).await?;

        debug!(
            "[Sync] Push complete pushed={} skipped={} failed={} flushed={}",
            report.pushed, report.skipped, report.failed, report.flush.flushed
        );
        Ok(report)
    }

    /// Pushes pending rows of one entity. Rows that fail stay pending.
    pub async fn push_entity(
        &self,
        identity: &SyncIdentity,
        entity: SyncEntity,
    ) -> Result<PushReport> {
        let pending = self.store.list_pending(entity)?;
        let mut report = PushReport::default();
        if pending.is_empty() {
            return Ok(report);
        }

        for record in pending {
            let local_id = record.local_id;
            match self
                .push_row(identity, entity, record, &mut report.calls)
                .await
            {
                Ok(MarkSyncedOutcome::ChangedSincePush) => {
                    debug!(
                        "[Sync] {} row {} changed while being pushed; keeping it pending",
                        entity, local_id
                    );
                    report.pushed += 1;
                }
                Ok(_) => report.pushed += 1,
                Err(RowError::Unresolved(reference)) => {
                    debug!(
                        "[Sync] Deferring {} row {}: {}",
                        entity, local_id, reference
                    );
                    report.skipped += 1;
                }
                Err(err) => {
                    warn!("[Sync] Failed to push {} row {}: {}", entity, local_id, err);
                    report.failed += 1;
                }
            }
        }

        debug!(
            "[Sync] Pushed {} {} row(s), skipped={} failed={}",
            report.pushed, entity, report.skipped, report.failed
        );
        Ok(report)
    }

    async fn push_row(
        &self,
        identity: &SyncIdentity,
        entity: SyncEntity,
        mut record: LocalRecord,
        calls: &mut RemoteCallStats,
    ) -> std::result::Result<MarkSyncedOutcome, RowError> {
        resolve_outbound(self.store.as_ref(), entity, &mut record.fields)?;
        let row = to_remote(entity, &record, &identity.owner_id)?;
        let table = entity.remote_table();

        match record.remote_id.as_deref() {
            Some(remote_id) => {
                let result = self.backend.update(identity, table, remote_id, &row).await;
                calls.record(&result);
                result?;
                Ok(self
                    .store
                    .mark_synced(entity, record.local_id, None, record.updated_at)
                    .await?)
            }
            None => {
                let result = self.backend.insert(identity, table, &row).await;
                calls.record(&result);
                let remote_id = result?;
                let outcome = self
                    .store
                    .mark_synced(
                        entity,
                        record.local_id,
                        Some(remote_id.clone()),
                        record.updated_at,
                    )
                    .await?;
                if outcome == MarkSyncedOutcome::Missing {
                    // Deleted locally while the insert was in flight.
                    self.delete_queue.enqueue_delete(entity, remote_id).await?;
                }
                Ok(outcome)
            }
        }
    }
}
