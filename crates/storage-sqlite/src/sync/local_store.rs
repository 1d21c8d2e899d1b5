//! Local store operations used by the sync pipelines and the record service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use diesel::sqlite::SqliteConnection;
use log::debug;
use serde_json::{Map, Value};

use expensehud_core::errors::{Error, Result};
use expensehud_core::sync::{
    LocalRecord, LocalSyncStoreTrait, MarkSyncedOutcome, SyncEntity, SyncStatus, FIELD_CREATED_AT,
    FIELD_ID, FIELD_REMOTE_ID, FIELD_SYNC_STATUS, FIELD_UPDATED_AT,
};

use super::delete_queue::write_delete_queue_entry;
use super::now_millis;
use super::tables::{with_table, EntityTable};
use crate::db::{get_connection, DbPool, WriteHandle};

/// Keys a collaborator update may not touch.
const PROTECTED_FIELDS: [&str; 5] = [
    FIELD_ID,
    FIELD_REMOTE_ID,
    FIELD_SYNC_STATUS,
    FIELD_CREATED_AT,
    FIELD_UPDATED_AT,
];

fn timestamp_value(value: NaiveDateTime) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn model_from_fields<T: EntityTable>(fields: Map<String, Value>) -> Result<T::Model> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

fn load_records<T: EntityTable>(models: Vec<T::Model>) -> Result<Vec<LocalRecord>> {
    models.iter().map(LocalRecord::from_model).collect()
}

fn find_record<T: EntityTable>(
    conn: &mut SqliteConnection,
    local_id: i64,
) -> Result<Option<LocalRecord>> {
    T::find(conn, local_id)?
        .map(|model| LocalRecord::from_model(&model))
        .transpose()
}

fn create_row<T: EntityTable>(
    conn: &mut SqliteConnection,
    mut fields: Map<String, Value>,
) -> Result<LocalRecord> {
    let now = timestamp_value(now_millis())?;
    fields.insert(FIELD_ID.to_string(), Value::from(0));
    fields.insert(FIELD_REMOTE_ID.to_string(), Value::Null);
    fields.insert(
        FIELD_SYNC_STATUS.to_string(),
        Value::from(SyncStatus::Pending.as_str()),
    );
    fields.insert(FIELD_CREATED_AT.to_string(), now.clone());
    fields.insert(FIELD_UPDATED_AT.to_string(), now);

    let saved = T::insert(conn, &model_from_fields::<T>(fields)?)?;
    LocalRecord::from_model(&saved)
}

fn update_row<T: EntityTable>(
    conn: &mut SqliteConnection,
    entity: SyncEntity,
    local_id: i64,
    changes: Map<String, Value>,
) -> Result<LocalRecord> {
    let current = find_record::<T>(conn, local_id)?
        .ok_or_else(|| Error::not_found(format!("{} row {} not found", entity, local_id)))?;
    // Strictly after the previous write, so a push that read the old
    // snapshot can never match this one in `mark_synced`.
    let updated_at = now_millis().max(current.updated_at + Duration::milliseconds(1));

    let mut fields = current.fields;
    for (key, value) in changes {
        if !PROTECTED_FIELDS.contains(&key.as_str()) {
            fields.insert(key, value);
        }
    }
    fields.insert(
        FIELD_SYNC_STATUS.to_string(),
        Value::from(SyncStatus::Pending.as_str()),
    );
    fields.insert(FIELD_UPDATED_AT.to_string(), timestamp_value(updated_at)?);

    let model = model_from_fields::<T>(fields)?;
    T::replace(conn, &model)?;
    LocalRecord::from_model(&model)
}

fn insert_remote_row<T: EntityTable>(
    conn: &mut SqliteConnection,
    entity: SyncEntity,
    mut fields: Map<String, Value>,
) -> Result<i64> {
    if !matches!(fields.get(FIELD_REMOTE_ID), Some(Value::String(_))) {
        return Err(Error::invalid_input(format!(
            "Pulled {} row has no remote id",
            entity
        )));
    }
    fields.insert(FIELD_ID.to_string(), Value::from(0));
    fields.insert(
        FIELD_SYNC_STATUS.to_string(),
        Value::from(SyncStatus::Synced.as_str()),
    );
    let saved = T::insert(conn, &model_from_fields::<T>(fields)?)?;
    Ok(LocalRecord::from_model(&saved)?.local_id)
}

fn overwrite_row<T: EntityTable>(
    conn: &mut SqliteConnection,
    entity: SyncEntity,
    local_id: i64,
    mut fields: Map<String, Value>,
) -> Result<bool> {
    let Some(current) = find_record::<T>(conn, local_id)? else {
        return Ok(false);
    };
    // A collaborator write may have landed after the caller's read.
    if current.sync_status != SyncStatus::Synced {
        return Ok(false);
    }
    let incoming = fields
        .get(FIELD_REMOTE_ID)
        .and_then(Value::as_str)
        .map(str::to_string);
    ensure_remote_id_unchanged(
        entity,
        local_id,
        current.remote_id.as_deref(),
        incoming.as_deref(),
    )?;

    fields.insert(FIELD_ID.to_string(), Value::from(local_id));
    fields.insert(
        FIELD_REMOTE_ID.to_string(),
        current
            .remote_id
            .or(incoming)
            .map(Value::from)
            .unwrap_or(Value::Null),
    );
    fields.insert(
        FIELD_SYNC_STATUS.to_string(),
        Value::from(SyncStatus::Synced.as_str()),
    );
    if !fields.contains_key(FIELD_CREATED_AT) {
        fields.insert(
            FIELD_CREATED_AT.to_string(),
            timestamp_value(current.created_at)?,
        );
    }
    if !fields.contains_key(FIELD_UPDATED_AT) {
        fields.insert(
            FIELD_UPDATED_AT.to_string(),
            timestamp_value(current.updated_at)?,
        );
    }

    T::replace(conn, &model_from_fields::<T>(fields)?)?;
    Ok(true)
}

fn mark_row_synced<T: EntityTable>(
    conn: &mut SqliteConnection,
    entity: SyncEntity,
    local_id: i64,
    remote_id: Option<String>,
    pushed_updated_at: NaiveDateTime,
) -> Result<MarkSyncedOutcome> {
    let Some(current) = find_record::<T>(conn, local_id)? else {
        return Ok(MarkSyncedOutcome::Missing);
    };
    ensure_remote_id_unchanged(
        entity,
        local_id,
        current.remote_id.as_deref(),
        remote_id.as_deref(),
    )?;

    let remote_id = current.remote_id.or(remote_id);
    if current.updated_at == pushed_updated_at {
        T::set_sync_meta(conn, local_id, remote_id.as_deref(), SyncStatus::Synced)?;
        Ok(MarkSyncedOutcome::Synced)
    } else {
        T::set_sync_meta(conn, local_id, remote_id.as_deref(), SyncStatus::Pending)?;
        Ok(MarkSyncedOutcome::ChangedSincePush)
    }
}

fn adopt_row_remote_id<T: EntityTable>(
    conn: &mut SqliteConnection,
    local_id: i64,
    remote_id: &str,
) -> Result<bool> {
    let Some(current) = find_record::<T>(conn, local_id)? else {
        return Ok(false);
    };
    if current.remote_id.is_some() {
        return Ok(false);
    }
    T::set_sync_meta(conn, local_id, Some(remote_id), current.sync_status)?;
    Ok(true)
}

fn claim_seeded_row<T: EntityTable>(
    conn: &mut SqliteConnection,
    entity: SyncEntity,
    local_id: i64,
    mut fields: Map<String, Value>,
) -> Result<bool> {
    let Some(current) = find_record::<T>(conn, local_id)? else {
        return Ok(false);
    };
    if current.sync_status != SyncStatus::Seeded || current.remote_id.is_some() {
        return Ok(false);
    }
    if !matches!(fields.get(FIELD_REMOTE_ID), Some(Value::String(_))) {
        return Err(Error::invalid_input(format!(
            "Pulled {} row has no remote id",
            entity
        )));
    }

    fields.insert(FIELD_ID.to_string(), Value::from(local_id));
    fields.insert(
        FIELD_SYNC_STATUS.to_string(),
        Value::from(SyncStatus::Synced.as_str()),
    );
    for (field, fallback) in [
        (FIELD_CREATED_AT, current.created_at),
        (FIELD_UPDATED_AT, current.updated_at),
    ] {
        if matches!(fields.get(field), None | Some(Value::Null)) {
            fields.insert(field.to_string(), timestamp_value(fallback)?);
        }
    }

    T::replace(conn, &model_from_fields::<T>(fields)?)?;
    Ok(true)
}

fn promote_seeded_rows<T: EntityTable>(conn: &mut SqliteConnection) -> Result<usize> {
    let mut promoted = 0;
    for record in load_records::<T>(T::load_all(conn)?)? {
        if record.sync_status == SyncStatus::Seeded {
            promoted += T::set_sync_meta(
                conn,
                record.local_id,
                record.remote_id.as_deref(),
                SyncStatus::Pending,
            )?;
        }
    }
    Ok(promoted)
}

fn delete_row<T: EntityTable>(
    conn: &mut SqliteConnection,
    entity: SyncEntity,
    local_id: i64,
) -> Result<Option<LocalRecord>> {
    let Some(current) = find_record::<T>(conn, local_id)? else {
        return Ok(None);
    };
    T::delete(conn, local_id)?;
    if let Some(remote_id) = current.remote_id.as_deref() {
        write_delete_queue_entry(conn, entity, remote_id)?;
    }
    Ok(Some(current))
}

/// A remote id never changes once assigned.
fn ensure_remote_id_unchanged(
    entity: SyncEntity,
    local_id: i64,
    current: Option<&str>,
    incoming: Option<&str>,
) -> Result<()> {
    match (current, incoming) {
        (Some(current), Some(incoming)) if current != incoming => Err(Error::invalid_input(
            format!(
                "{} row {} already has remote id '{}', refusing '{}'",
                entity, local_id, current, incoming
            ),
        )),
        _ => Ok(()),
    }
}

pub struct LocalSyncRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LocalSyncRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl LocalSyncStoreTrait for LocalSyncRepository {
    fn list_records(&self, entity: SyncEntity) -> Result<Vec<LocalRecord>> {
        let mut conn = get_connection(&self.pool)?;
        with_table!(entity, Table => load_records::<Table>(Table::load_all(&mut conn)?))
    }

    fn get_record(&self, entity: SyncEntity, local_id: i64) -> Result<Option<LocalRecord>> {
        let mut conn = get_connection(&self.pool)?;
        with_table!(entity, Table => find_record::<Table>(&mut conn, local_id))
    }

    fn list_pending(&self, entity: SyncEntity) -> Result<Vec<LocalRecord>> {
        let mut conn = get_connection(&self.pool)?;
        with_table!(entity, Table => load_records::<Table>(Table::load_pending(&mut conn)?))
    }

    fn find_by_remote_id(
        &self,
        entity: SyncEntity,
        remote_id: &str,
    ) -> Result<Option<LocalRecord>> {
        let mut conn = get_connection(&self.pool)?;
        with_table!(entity, Table => Table::find_by_remote_id(&mut conn, remote_id)?
            .map(|model| LocalRecord::from_model(&model))
            .transpose())
    }

    async fn mark_synced(
        &self,
        entity: SyncEntity,
        local_id: i64,
        remote_id: Option<String>,
        pushed_updated_at: NaiveDateTime,
    ) -> Result<MarkSyncedOutcome> {
        self.writer
            .exec(move |conn| {
                with_table!(entity, Table => mark_row_synced::<Table>(
                    conn,
                    entity,
                    local_id,
                    remote_id,
                    pushed_updated_at,
                ))
            })
            .await
    }

    async fn insert_from_remote(
        &self,
        entity: SyncEntity,
        fields: Map<String, Value>,
    ) -> Result<i64> {
        let local_id = self
            .writer
            .exec(move |conn| {
                with_table!(entity, Table => insert_remote_row::<Table>(conn, entity, fields))
            })
            .await?;
        debug!("Inserted pulled {} row as {}", entity, local_id);
        Ok(local_id)
    }

    async fn overwrite_from_remote(
        &self,
        entity: SyncEntity,
        local_id: i64,
        fields: Map<String, Value>,
    ) -> Result<bool> {
        self.writer
            .exec(move |conn| {
                with_table!(entity, Table => overwrite_row::<Table>(conn, entity, local_id, fields))
            })
            .await
    }

    async fn adopt_remote_id(
        &self,
        entity: SyncEntity,
        local_id: i64,
        remote_id: String,
    ) -> Result<bool> {
        self.writer
            .exec(move |conn| {
                with_table!(entity, Table => adopt_row_remote_id::<Table>(conn, local_id, &remote_id))
            })
            .await
    }

    async fn claim_seeded(
        &self,
        entity: SyncEntity,
        local_id: i64,
        fields: Map<String, Value>,
    ) -> Result<bool> {
        self.writer
            .exec(move |conn| {
                with_table!(entity, Table => claim_seeded_row::<Table>(conn, entity, local_id, fields))
            })
            .await
    }

    async fn promote_seeded(&self, entity: SyncEntity) -> Result<usize> {
        let promoted = self
            .writer
            .exec(move |conn| with_table!(entity, Table => promote_seeded_rows::<Table>(conn)))
            .await?;
        if promoted > 0 {
            debug!("Marked {} seeded {} row(s) for push", promoted, entity);
        }
        Ok(promoted)
    }

    async fn create_record(
        &self,
        entity: SyncEntity,
        fields: Map<String, Value>,
    ) -> Result<LocalRecord> {
        self.writer
            .exec(move |conn| with_table!(entity, Table => create_row::<Table>(conn, fields)))
            .await
    }

    async fn update_record(
        &self,
        entity: SyncEntity,
        local_id: i64,
        changes: Map<String, Value>,
    ) -> Result<LocalRecord> {
        self.writer
            .exec(move |conn| {
                with_table!(entity, Table => update_row::<Table>(conn, entity, local_id, changes))
            })
            .await
    }

    async fn delete_record(
        &self,
        entity: SyncEntity,
        local_id: i64,
    ) -> Result<Option<LocalRecord>> {
        self.writer
            .exec(move |conn| {
                with_table!(entity, Table => delete_row::<Table>(conn, entity, local_id))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::DeleteQueueRepository;
    use crate::test_support::setup_db;
    use expensehud_core::sync::DeleteQueueRepositoryTrait;
    use expensehud_core::transactions::Transaction;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn groceries() -> Map<String, Value> {
        object(json!({
            "name": "Groceries",
            "icon": "shopping-cart",
            "color": "#22c55e",
            "type": "expense",
            "keywords": ["woolworths", "coles"],
            "isDefault": false,
            "sortOrder": 1
        }))
    }

    fn remote_fields(remote_id: &str, name: &str, updated_at: &str) -> Map<String, Value> {
        let mut fields = groceries();
        fields.insert("name".into(), json!(name));
        fields.insert(FIELD_REMOTE_ID.into(), json!(remote_id));
        fields.insert(FIELD_CREATED_AT.into(), json!("2026-01-05T09:00:00"));
        fields.insert(FIELD_UPDATED_AT.into(), json!(updated_at));
        fields
    }

    fn setup_store() -> (LocalSyncRepository, DeleteQueueRepository) {
        let (pool, writer) = setup_db();
        (
            LocalSyncRepository::new(pool.clone(), writer.clone()),
            DeleteQueueRepository::new(pool, writer),
        )
    }

    #[tokio::test]
    async fn create_assigns_id_and_pending_status() {
        let (store, _) = setup_store();

        let created = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");

        assert!(created.local_id > 0);
        assert_eq!(created.remote_id, None);
        assert_eq!(created.sync_status, SyncStatus::Pending);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(
            store.list_pending(SyncEntity::Category).expect("pending").len(),
            1
        );
    }

    #[tokio::test]
    async fn create_ignores_caller_sync_metadata() {
        let (store, _) = setup_store();
        let mut fields = groceries();
        fields.insert(FIELD_ID.into(), json!(99));
        fields.insert(FIELD_REMOTE_ID.into(), json!("forged"));
        fields.insert(FIELD_SYNC_STATUS.into(), json!("synced"));

        let created = store
            .create_record(SyncEntity::Category, fields)
            .await
            .expect("create");

        assert_ne!(created.local_id, 99);
        assert_eq!(created.remote_id, None);
        assert_eq!(created.sync_status, SyncStatus::Pending);
    }

    #[tokio::test]
    async fn update_marks_pending_and_keeps_remote_id() {
        let (store, _) = setup_store();
        let created = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");
        store
            .mark_synced(
                SyncEntity::Category,
                created.local_id,
                Some("r-cat".into()),
                created.updated_at,
            )
            .await
            .expect("mark synced");

        let updated = store
            .update_record(
                SyncEntity::Category,
                created.local_id,
                object(json!({ "name": "Food", "remoteId": "other" })),
            )
            .await
            .expect("update");

        assert_eq!(updated.field("name"), Some(&json!("Food")));
        assert_eq!(updated.remote_id.as_deref(), Some("r-cat"));
        assert_eq!(updated.sync_status, SyncStatus::Pending);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let (store, _) = setup_store();
        let err = store
            .update_record(SyncEntity::Goal, 404, Map::new())
            .await
            .expect_err("missing row");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn mark_synced_backfills_remote_id() {
        let (store, _) = setup_store();
        let created = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");

        let outcome = store
            .mark_synced(
                SyncEntity::Category,
                created.local_id,
                Some("r-1".into()),
                created.updated_at,
            )
            .await
            .expect("mark synced");

        assert_eq!(outcome, MarkSyncedOutcome::Synced);
        let stored = store
            .find_by_remote_id(SyncEntity::Category, "r-1")
            .expect("lookup")
            .expect("row");
        assert_eq!(stored.local_id, created.local_id);
        assert_eq!(stored.sync_status, SyncStatus::Synced);
        assert!(store
            .list_pending(SyncEntity::Category)
            .expect("pending")
            .is_empty());
    }

    #[tokio::test]
    async fn edit_during_push_keeps_row_pending() {
        let (store, _) = setup_store();
        let created = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");
        store
            .update_record(
                SyncEntity::Category,
                created.local_id,
                object(json!({ "color": "#000000" })),
            )
            .await
            .expect("edit");

        let outcome = store
            .mark_synced(
                SyncEntity::Category,
                created.local_id,
                Some("r-1".into()),
                created.updated_at,
            )
            .await
            .expect("mark synced");

        assert_eq!(outcome, MarkSyncedOutcome::ChangedSincePush);
        let stored = store
            .get_record(SyncEntity::Category, created.local_id)
            .expect("get")
            .expect("row");
        assert_eq!(stored.sync_status, SyncStatus::Pending);
        assert_eq!(stored.remote_id.as_deref(), Some("r-1"));
    }

    #[tokio::test]
    async fn edits_in_the_same_millisecond_are_never_marked_synced() {
        let (store, _) = setup_store();

        for _ in 0..50 {
            let created = store
                .create_record(SyncEntity::Category, groceries())
                .await
                .expect("create");
            let edited = store
                .update_record(
                    SyncEntity::Category,
                    created.local_id,
                    object(json!({ "color": "#000000" })),
                )
                .await
                .expect("edit");
            assert!(edited.updated_at > created.updated_at);

            let outcome = store
                .mark_synced(SyncEntity::Category, created.local_id, None, created.updated_at)
                .await
                .expect("mark synced");

            assert_eq!(outcome, MarkSyncedOutcome::ChangedSincePush);
        }
        assert_eq!(
            store.list_pending(SyncEntity::Category).expect("pending").len(),
            50
        );
    }

    #[tokio::test]
    async fn consecutive_edits_have_increasing_timestamps() {
        let (store, _) = setup_store();
        let created = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");

        let mut previous = created.updated_at;
        for n in 0..20 {
            let edited = store
                .update_record(
                    SyncEntity::Category,
                    created.local_id,
                    object(json!({ "sortOrder": n })),
                )
                .await
                .expect("edit");
            assert!(edited.updated_at > previous);
            previous = edited.updated_at;
        }
    }

    #[tokio::test]
    async fn seeded_rows_are_not_pending_until_promoted() {
        let (pool, writer) = setup_db();
        crate::seed::seed_defaults(&writer).await.expect("seed");
        let store = LocalSyncRepository::new(pool, writer);

        assert!(store
            .list_pending(SyncEntity::Category)
            .expect("pending")
            .is_empty());

        let promoted = store
            .promote_seeded(SyncEntity::Category)
            .await
            .expect("promote");

        let pending = store.list_pending(SyncEntity::Category).expect("pending");
        assert!(promoted > 0);
        assert_eq!(pending.len(), promoted);
        assert_eq!(
            store
                .promote_seeded(SyncEntity::Category)
                .await
                .expect("promote again"),
            0
        );
    }

    #[tokio::test]
    async fn claim_replaces_seeded_row_with_remote_values() {
        let (pool, writer) = setup_db();
        crate::seed::seed_defaults(&writer).await.expect("seed");
        let store = LocalSyncRepository::new(pool, writer);
        let settings = store
            .list_records(SyncEntity::Settings)
            .expect("settings")
            .remove(0);
        assert_eq!(settings.sync_status, SyncStatus::Seeded);

        let mut remote = settings.fields.clone();
        remote.insert("currency".into(), json!("NZD"));
        remote.insert(FIELD_REMOTE_ID.into(), json!("r-settings"));
        remote.insert(FIELD_UPDATED_AT.into(), json!("2026-02-01T00:00:00"));
        let claimed = store
            .claim_seeded(SyncEntity::Settings, settings.local_id, remote.clone())
            .await
            .expect("claim");

        assert!(claimed);
        let stored = store
            .get_record(SyncEntity::Settings, settings.local_id)
            .expect("get")
            .expect("row");
        assert_eq!(stored.sync_status, SyncStatus::Synced);
        assert_eq!(stored.remote_id.as_deref(), Some("r-settings"));
        assert_eq!(stored.field("currency"), Some(&json!("NZD")));

        let again = store
            .claim_seeded(SyncEntity::Settings, settings.local_id, remote)
            .await
            .expect("claim again");
        assert!(!again);
    }

    #[tokio::test]
    async fn edited_seed_row_is_no_longer_claimable() {
        let (pool, writer) = setup_db();
        crate::seed::seed_defaults(&writer).await.expect("seed");
        let store = LocalSyncRepository::new(pool, writer);
        let settings = store
            .list_records(SyncEntity::Settings)
            .expect("settings")
            .remove(0);

        store
            .update_record(
                SyncEntity::Settings,
                settings.local_id,
                object(json!({ "theme": "dark" })),
            )
            .await
            .expect("edit");
        let mut remote = settings.fields.clone();
        remote.insert(FIELD_REMOTE_ID.into(), json!("r-settings"));
        let claimed = store
            .claim_seeded(SyncEntity::Settings, settings.local_id, remote)
            .await
            .expect("claim");

        assert!(!claimed);
        let stored = store
            .get_record(SyncEntity::Settings, settings.local_id)
            .expect("get")
            .expect("row");
        assert_eq!(stored.sync_status, SyncStatus::Pending);
        assert_eq!(stored.field("theme"), Some(&json!("dark")));
    }

    #[tokio::test]
    async fn remote_id_cannot_be_replaced() {
        let (store, _) = setup_store();
        let created = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");
        store
            .mark_synced(
                SyncEntity::Category,
                created.local_id,
                Some("r-1".into()),
                created.updated_at,
            )
            .await
            .expect("mark synced");

        let result = store
            .mark_synced(
                SyncEntity::Category,
                created.local_id,
                Some("r-2".into()),
                created.updated_at,
            )
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn mark_synced_on_deleted_row_reports_missing() {
        let (store, _) = setup_store();
        let outcome = store
            .mark_synced(
                SyncEntity::Budget,
                7,
                Some("r-7".into()),
                now_millis(),
            )
            .await
            .expect("mark synced");
        assert_eq!(outcome, MarkSyncedOutcome::Missing);
    }

    #[tokio::test]
    async fn insert_from_remote_stores_synced_row() {
        let (store, _) = setup_store();

        let local_id = store
            .insert_from_remote(
                SyncEntity::Category,
                remote_fields("r-9", "Transport", "2026-01-05T09:30:00"),
            )
            .await
            .expect("insert");

        let stored = store
            .get_record(SyncEntity::Category, local_id)
            .expect("get")
            .expect("row");
        assert_eq!(stored.remote_id.as_deref(), Some("r-9"));
        assert_eq!(stored.sync_status, SyncStatus::Synced);
        assert_eq!(stored.field("name"), Some(&json!("Transport")));
    }

    #[tokio::test]
    async fn duplicate_remote_id_is_rejected() {
        let (store, _) = setup_store();
        store
            .insert_from_remote(
                SyncEntity::Category,
                remote_fields("r-9", "Transport", "2026-01-05T09:30:00"),
            )
            .await
            .expect("insert");

        let err = store
            .insert_from_remote(
                SyncEntity::Category,
                remote_fields("r-9", "Transport", "2026-01-05T09:30:00"),
            )
            .await
            .expect_err("unique remote id");
        assert!(matches!(
            err,
            Error::Database(expensehud_core::errors::DatabaseError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn overwrite_replaces_synced_row_and_keeps_local_id() {
        let (store, _) = setup_store();
        let local_id = store
            .insert_from_remote(
                SyncEntity::Category,
                remote_fields("r-9", "Transport", "2026-01-05T09:30:00"),
            )
            .await
            .expect("insert");

        let applied = store
            .overwrite_from_remote(
                SyncEntity::Category,
                local_id,
                remote_fields("r-9", "Travel", "2026-01-06T08:00:00"),
            )
            .await
            .expect("overwrite");

        assert!(applied);
        let stored = store
            .get_record(SyncEntity::Category, local_id)
            .expect("get")
            .expect("row");
        assert_eq!(stored.field("name"), Some(&json!("Travel")));
        assert_eq!(stored.sync_status, SyncStatus::Synced);
        assert_eq!(store.list_records(SyncEntity::Category).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn overwrite_skips_rows_that_became_pending() {
        let (store, _) = setup_store();
        let local_id = store
            .insert_from_remote(
                SyncEntity::Category,
                remote_fields("r-9", "Transport", "2026-01-05T09:30:00"),
            )
            .await
            .expect("insert");
        store
            .update_record(
                SyncEntity::Category,
                local_id,
                object(json!({ "name": "Local edit" })),
            )
            .await
            .expect("edit");

        let applied = store
            .overwrite_from_remote(
                SyncEntity::Category,
                local_id,
                remote_fields("r-9", "Remote edit", "2030-01-01T00:00:00"),
            )
            .await
            .expect("overwrite");

        assert!(!applied);
        let stored = store
            .get_record(SyncEntity::Category, local_id)
            .expect("get")
            .expect("row");
        assert_eq!(stored.field("name"), Some(&json!("Local edit")));
    }

    #[tokio::test]
    async fn adopt_remote_id_only_fills_missing_ids() {
        let (store, _) = setup_store();
        let created = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");

        assert!(store
            .adopt_remote_id(SyncEntity::Category, created.local_id, "r-1".into())
            .await
            .expect("adopt"));
        assert!(!store
            .adopt_remote_id(SyncEntity::Category, created.local_id, "r-2".into())
            .await
            .expect("adopt again"));

        let stored = store
            .get_record(SyncEntity::Category, created.local_id)
            .expect("get")
            .expect("row");
        assert_eq!(stored.remote_id.as_deref(), Some("r-1"));
        assert_eq!(stored.sync_status, SyncStatus::Pending);
    }

    #[tokio::test]
    async fn delete_enqueues_remote_delete_only_for_pushed_rows() {
        let (store, queue) = setup_store();
        let never_pushed = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");
        let pushed = store
            .create_record(SyncEntity::Category, groceries())
            .await
            .expect("create");
        store
            .mark_synced(
                SyncEntity::Category,
                pushed.local_id,
                Some("r-pushed".into()),
                pushed.updated_at,
            )
            .await
            .expect("mark synced");

        store
            .delete_record(SyncEntity::Category, never_pushed.local_id)
            .await
            .expect("delete");
        let deleted = store
            .delete_record(SyncEntity::Category, pushed.local_id)
            .await
            .expect("delete")
            .expect("row existed");

        assert_eq!(deleted.remote_id.as_deref(), Some("r-pushed"));
        let entries = queue.list_entries().expect("entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_name, "categories");
        assert_eq!(entries[0].remote_id, "r-pushed");
        assert!(store
            .list_records(SyncEntity::Category)
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn delete_of_missing_row_returns_none() {
        let (store, queue) = setup_store();
        assert!(store
            .delete_record(SyncEntity::Asset, 1)
            .await
            .expect("delete")
            .is_none());
        assert!(queue.list_entries().expect("entries").is_empty());
    }

    #[tokio::test]
    async fn money_survives_storage_round_trip() {
        let (store, _) = setup_store();
        let created = store
            .create_record(
                SyncEntity::Transaction,
                object(json!({
                    "date": "2026-03-01",
                    "description": "WOOLWORTHS 1234",
                    "amount": -42.50,
                    "categoryId": 1,
                    "bankAccount": "Everyday",
                    "tags": ["food"]
                })),
            )
            .await
            .expect("create");

        let transaction: Transaction = store
            .get_record(SyncEntity::Transaction, created.local_id)
            .expect("get")
            .expect("row")
            .into_model()
            .expect("model");
        assert_eq!(transaction.amount, dec!(-42.50));
        assert_eq!(transaction.tags, vec!["food".to_string()]);
        assert!(transaction.is_outflow());
    }
}
