use chrono::{NaiveDateTime, SubsecRound, Utc};
use log::{debug, warn};
use serde_json::{Map, Value};

use expensehud_core::sync::{
    is_remote_newer, SyncEntity, SyncStatus, FIELD_CREATED_AT, FIELD_UPDATED_AT, SYNC_ORDER,
};

use super::references::{resolve_inbound, RowError};
use super::{PullReport, RemoteRow, SyncEngine, SyncIdentity};
use crate::error::Result;
use crate::translator::{from_remote, LocalFragment};

/// What happened to one pulled row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PullOutcome {
    Inserted,
    Updated,
    Adopted,
    Skipped(&'static str),
}

impl SyncEngine {
    /// Pulls every entity in dependency order.
    pub async fn pull(&self, identity: &SyncIdentity) -> Result<PullReport> {
        let mut report = PullReport::default();
        for entity in SYNC_ORDER {
            report.merge(self.pull_entity(identity, entity).await?);
        }

        debug!(
            "[Sync] Pull complete inserted={} updated={} adopted={} skipped={} failed={}",
            report.inserted, report.updated, report.adopted, report.skipped, report.failed
        );
        Ok(report)
    }

    /// Fetches all of the owner's rows of `entity` and merges them into the
    /// local store. A failed fetch counts zero rows.
    pub async fn pull_entity(
        &self,
        identity: &SyncIdentity,
        entity: SyncEntity,
    ) -> Result<PullReport> {
        let mut report = PullReport::default();

        let result = self
            .backend
            .select_owned(identity, entity.remote_table())
            .await;
        report.calls.record(&result);
        match result {
            Ok(rows) => self.apply_remote_rows(entity, rows, &mut report).await,
            Err(err) => warn!("[Sync] Failed to fetch {}: {}", entity, err),
        }
        Ok(report)
    }

    /// Merges fetched rows of one entity into the local store.
    pub(super) async fn apply_remote_rows(
        &self,
        entity: SyncEntity,
        rows: Vec<RemoteRow>,
        report: &mut PullReport,
    ) {
        let mut queue = Vec::with_capacity(rows.len());
        for row in rows {
            match from_remote(entity, row) {
                Ok(fragment) => queue.push(fragment),
                Err(err) => {
                    warn!("[Sync] Skipping unreadable {} row: {}", entity, err);
                    report.failed += 1;
                }
            }
        }

        // Rows referencing a parent of the same entity can arrive before the
        // parent. Retry them until a pass makes no progress.
        loop {
            let attempted = queue.len();
            let mut deferred = Vec::new();

            for fragment in queue {
                match self.pull_row(entity, &fragment).await {
                    Ok(PullOutcome::Inserted) => report.inserted += 1,
                    Ok(PullOutcome::Updated) => report.updated += 1,
                    Ok(PullOutcome::Adopted) => report.adopted += 1,
                    Ok(PullOutcome::Skipped(reason)) => {
                        debug!(
                            "[Sync] Skipping {} {}: {}",
                            entity, fragment.remote_id, reason
                        );
                        report.skipped += 1;
                    }
                    Err(RowError::Unresolved(reference)) if reference.target == entity => {
                        deferred.push((fragment, reference));
                    }
                    Err(RowError::Unresolved(reference)) => {
                        debug!(
                            "[Sync] Skipping {} {}: {}",
                            entity, fragment.remote_id, reference
                        );
                        report.skipped += 1;
                    }
                    Err(err) => {
                        warn!(
                            "[Sync] Failed to apply pulled {} {}: {}",
                            entity, fragment.remote_id, err
                        );
                        report.failed += 1;
                    }
                }
            }

            if deferred.is_empty() {
                break;
            }
            if deferred.len() == attempted {
                for (fragment, reference) in deferred {
                    debug!(
                        "[Sync] Skipping {} {}: {}",
                        entity, fragment.remote_id, reference
                    );
                    report.skipped += 1;
                }
                break;
            }
            queue = deferred.into_iter().map(|(fragment, _)| fragment).collect();
        }

        debug!(
            "[Sync] Pulled {} {} row(s), skipped={} failed={}",
            report.pulled(),
            entity,
            report.skipped,
            report.failed
        );
    }

    async fn pull_row(
        &self,
        entity: SyncEntity,
        fragment: &LocalFragment,
    ) -> std::result::Result<PullOutcome, RowError> {
        let mut fields = fragment.fields.clone();
        resolve_inbound(self.store.as_ref(), entity, &mut fields)?;

        let Some(local) = self.store.find_by_remote_id(entity, &fragment.remote_id)? else {
            fill_missing_timestamps(&mut fields, fragment)?;

            if let Some(seed) = self.find_seed_twin(entity, &fields)? {
                let claimed = self
                    .store
                    .claim_seeded(entity, seed.local_id, fields)
                    .await?;
                return Ok(if claimed {
                    PullOutcome::Adopted
                } else {
                    PullOutcome::Skipped("seeded row changed during pull")
                });
            }

            if let Some(origin_id) = fragment.origin_local_id {
                if let Some(origin) = self.store.get_record(entity, origin_id)? {
                    if origin.remote_id.is_none()
                        && origin.sync_status == SyncStatus::Pending
                        && same_millis(Some(origin.created_at), fragment.created_at)
                    {
                        // The push that created this remote row never got to
                        // record its id locally.
                        let adopted = self
                            .store
                            .adopt_remote_id(entity, origin_id, fragment.remote_id.clone())
                            .await?;
                        return Ok(if adopted {
                            PullOutcome::Adopted
                        } else {
                            PullOutcome::Skipped("origin row changed during pull")
                        });
                    }
                }
            }

            self.store.insert_from_remote(entity, fields).await?;
            return Ok(PullOutcome::Inserted);
        };

        if local.sync_status != SyncStatus::Synced {
            return Ok(PullOutcome::Skipped("local row has unpushed changes"));
        }
        if !is_remote_newer(local.updated_at, fragment.lww_timestamp()) {
            return Ok(PullOutcome::Skipped("local row is up to date"));
        }

        let applied = self
            .store
            .overwrite_from_remote(entity, local.local_id, fields)
            .await?;
        Ok(if applied {
            PullOutcome::Updated
        } else {
            PullOutcome::Skipped("local row changed during pull")
        })
    }
}

fn same_millis(local: Option<NaiveDateTime>, remote: Option<NaiveDateTime>) -> bool {
    match (local, remote) {
        (Some(local), Some(remote)) => local.trunc_subsecs(3) == remote.trunc_subsecs(3),
        _ => false,
    }
}

/// New local rows need both timestamps; fall back to the other one, then to
/// now.
fn fill_missing_timestamps(
    fields: &mut Map<String, Value>,
    fragment: &LocalFragment,
) -> std::result::Result<(), RowError> {
    let now = Utc::now().naive_utc().trunc_subsecs(3);
    let created_at = fragment.created_at.or(fragment.updated_at).unwrap_or(now);
    let updated_at = fragment.updated_at.unwrap_or(created_at);

    for (field, value) in [(FIELD_CREATED_AT, created_at), (FIELD_UPDATED_AT, updated_at)] {
        if matches!(fields.get(field), None | Some(Value::Null)) {
            let value = serde_json::to_value(value)
                .map_err(|err| RowError::Store(expensehud_core::Error::from(err)))?;
            fields.insert(field.to_string(), value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(ms: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2026, 1, 5).and_then(|d| d.and_hms_milli_opt(9, 0, 0, ms))
    }

    #[test]
    fn origin_match_compares_at_millisecond_precision() {
        let micro = NaiveDate::from_ymd_opt(2026, 1, 5)
            .and_then(|d| d.and_hms_micro_opt(9, 0, 0, 120_400));
        assert!(same_millis(micro, at(120)));
        assert!(!same_millis(at(121), at(120)));
        assert!(!same_millis(None, at(120)));
    }
}
