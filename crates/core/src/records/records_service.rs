use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::sync::{LocalRecord, LocalSyncStoreTrait, SyncEntity, SyncRecord};

/// Writes domain rows into the local store and announces every mutation.
///
/// Rows written here are always `pending`; the event sink is how the sync
/// orchestrator learns that there is something to push.
pub struct RecordService {
    store: Arc<dyn LocalSyncStoreTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl RecordService {
    pub fn new(store: Arc<dyn LocalSyncStoreTrait>) -> Self {
        Self {
            store,
            event_sink: Arc::new(NoOpDomainEventSink),
        }
    }

    /// Sets the domain event sink notified after each write.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub async fn create(
        &self,
        entity: SyncEntity,
        fields: Map<String, Value>,
    ) -> Result<LocalRecord> {
        let record = self.store.create_record(entity, fields).await?;
        debug!("Created {} row {}", entity, record.local_id);
        self.event_sink
            .emit(DomainEvent::records_changed(entity, vec![record.local_id]));
        Ok(record)
    }

    pub async fn update(
        &self,
        entity: SyncEntity,
        local_id: i64,
        changes: Map<String, Value>,
    ) -> Result<LocalRecord> {
        let record = self.store.update_record(entity, local_id, changes).await?;
        self.event_sink
            .emit(DomainEvent::records_changed(entity, vec![local_id]));
        Ok(record)
    }

    /// Deletes a row. Returns false when no row had that id.
    pub async fn delete(&self, entity: SyncEntity, local_id: i64) -> Result<bool> {
        let Some(deleted) = self.store.delete_record(entity, local_id).await? else {
            return Ok(false);
        };
        self.event_sink.emit(DomainEvent::record_deleted(
            entity,
            local_id,
            deleted.remote_id.is_some(),
        ));
        Ok(true)
    }

    pub fn get<R: SyncRecord>(&self, local_id: i64) -> Result<Option<R>> {
        self.store
            .get_record(R::ENTITY, local_id)?
            .map(LocalRecord::into_model)
            .transpose()
    }

    pub fn list<R: SyncRecord>(&self) -> Result<Vec<R>> {
        self.store
            .list_records(R::ENTITY)?
            .into_iter()
            .map(LocalRecord::into_model)
            .collect()
    }

    /// Creates a row from a typed model. Its id and sync metadata are ignored.
    pub async fn create_typed<R: SyncRecord>(&self, model: &R) -> Result<R> {
        let fields = match serde_json::to_value(model)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(Error::invalid_input(format!(
                    "{} record did not serialize to an object",
                    R::ENTITY
                )))
            }
        };
        self.create(R::ENTITY, fields).await?.into_model()
    }

    /// Replaces the domain fields of an existing row with the typed model's.
    pub async fn update_typed<R: SyncRecord>(&self, local_id: i64, model: &R) -> Result<R> {
        let fields = match serde_json::to_value(model)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(Error::invalid_input(format!(
                    "{} record did not serialize to an object",
                    R::ENTITY
                )))
            }
        };
        self.update(R::ENTITY, local_id, fields).await?.into_model()
    }
}
