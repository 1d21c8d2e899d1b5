//! Domain events emitted after local mutations.
//!
//! Runtime bridges implement [`DomainEventSink`] to react to writes. The sync
//! orchestrator uses these events as its post-write trigger.

use crate::sync::SyncEntity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// Rows of `entity` were created or updated locally.
    RecordsChanged { entity: SyncEntity, local_ids: Vec<i64> },
    /// A row was deleted locally. `queued_remote_delete` is true when the row
    /// had been pushed before and a remote delete is now waiting in the queue.
    RecordDeleted {
        entity: SyncEntity,
        local_id: i64,
        queued_remote_delete: bool,
    },
}

impl DomainEvent {
    pub fn records_changed(entity: SyncEntity, local_ids: Vec<i64>) -> Self {
        Self::RecordsChanged { entity, local_ids }
    }

    pub fn record_deleted(entity: SyncEntity, local_id: i64, queued_remote_delete: bool) -> Self {
        Self::RecordDeleted {
            entity,
            local_id,
            queued_remote_delete,
        }
    }

    pub fn entity(&self) -> SyncEntity {
        match self {
            Self::RecordsChanged { entity, .. } | Self::RecordDeleted { entity, .. } => *entity,
        }
    }
}

/// Receives domain events. Implementations must not block.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);
}

/// Sink that drops every event. Default for services built without a runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {}
}
