use log::{debug, warn};
use serde_json::{Map, Value};

use expensehud_core::sync::{LocalRecord, SyncEntity, SyncStatus, SYNC_ORDER};

use super::{PullReport, SyncEngine, SyncIdentity};
use crate::error::Result;

impl SyncEngine {
    /// Settles locally seeded defaults before anything is pushed.
    ///
    /// For every seeded table that still has `seeded` rows, the owner's remote
    /// rows are fetched and merged: a seed whose default already exists
    /// remotely takes over that row. Seeds left over after a successful fetch
    /// become `pending` and go out with the push. When the fetch fails the
    /// seeds stay as they are.
    pub async fn reconcile_seeds(&self, identity: &SyncIdentity) -> Result<PullReport> {
        let mut report = PullReport::default();

        for entity in SYNC_ORDER {
            if entity.seed_key().is_none() || !self.has_seeded_rows(entity)? {
                continue;
            }

            let result = self
                .backend
                .select_owned(identity, entity.remote_table())
                .await;
            report.calls.record(&result);
            let rows = match result {
                Ok(rows) => rows,
                Err(err) => {
                    warn!(
                        "[Sync] Keeping seeded {} rows local, fetch failed: {}",
                        entity, err
                    );
                    continue;
                }
            };

            self.apply_remote_rows(entity, rows, &mut report).await;
            let promoted = self.store.promote_seeded(entity).await?;
            debug!(
                "[Sync] Reconciled seeded {}, {} row(s) left to push",
                entity, promoted
            );
        }

        Ok(report)
    }

    fn has_seeded_rows(&self, entity: SyncEntity) -> Result<bool> {
        Ok(self
            .store
            .list_records(entity)?
            .iter()
            .any(|record| record.sync_status == SyncStatus::Seeded))
    }

    /// Finds an unclaimed seeded row holding the same default as `fields`.
    pub(super) fn find_seed_twin(
        &self,
        entity: SyncEntity,
        fields: &Map<String, Value>,
    ) -> expensehud_core::Result<Option<LocalRecord>> {
        let Some(key) = entity.seed_key() else {
            return Ok(None);
        };
        Ok(self.store.list_records(entity)?.into_iter().find(|record| {
            record.sync_status == SyncStatus::Seeded
                && record.remote_id.is_none()
                && key.iter().all(|field| record.field(field) == fields.get(*field))
        }))
    }
}
