//! Sync domain models shared by the local store and the cloud sync engine.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Error, Result, ValidationError};

pub const FIELD_ID: &str = "id";
pub const FIELD_REMOTE_ID: &str = "remoteId";
pub const FIELD_SYNC_STATUS: &str = "syncStatus";
pub const FIELD_CREATED_AT: &str = "createdAt";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

/// Entities processed by the sync pipelines, in dependency order: an entity
/// only references entities that appear before it (or itself).
pub const SYNC_ORDER: [SyncEntity; 10] = [
    SyncEntity::Category,
    SyncEntity::ImportBatch,
    SyncEntity::Property,
    SyncEntity::Transaction,
    SyncEntity::Budget,
    SyncEntity::Settings,
    SyncEntity::Goal,
    SyncEntity::Asset,
    SyncEntity::Liability,
    SyncEntity::NetWorthSnapshot,
];

/// Domain tables that participate in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEntity {
    Transaction,
    Category,
    ImportBatch,
    Budget,
    Settings,
    Goal,
    Asset,
    Liability,
    Property,
    NetWorthSnapshot,
}

/// A local foreign key: `field` on the owning entity holds the local id of a
/// `target` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityReference {
    pub field: &'static str,
    pub target: SyncEntity,
}

const TRANSACTION_REFS: &[EntityReference] = &[
    EntityReference {
        field: "categoryId",
        target: SyncEntity::Category,
    },
    EntityReference {
        field: "importBatchId",
        target: SyncEntity::ImportBatch,
    },
];
const CATEGORY_REFS: &[EntityReference] = &[EntityReference {
    field: "parentId",
    target: SyncEntity::Category,
}];
const CATEGORY_ID_REFS: &[EntityReference] = &[EntityReference {
    field: "categoryId",
    target: SyncEntity::Category,
}];
const PROPERTY_ID_REFS: &[EntityReference] = &[EntityReference {
    field: "propertyId",
    target: SyncEntity::Property,
}];

impl SyncEntity {
    /// Table name in the local SQLite store.
    pub fn local_table(&self) -> &'static str {
        match self {
            Self::Transaction => "transactions",
            Self::Category => "categories",
            Self::ImportBatch => "import_batches",
            Self::Budget => "budgets",
            Self::Settings => "settings",
            Self::Goal => "goals",
            Self::Asset => "assets",
            Self::Liability => "liabilities",
            Self::Property => "properties",
            Self::NetWorthSnapshot => "net_worth_snapshots",
        }
    }

    /// Table name on the remote backend. Also used as the delete queue's
    /// entity name.
    pub fn remote_table(&self) -> &'static str {
        // Both sides currently share snake_case table names.
        self.local_table()
    }

    pub fn from_remote_table(table: &str) -> Option<Self> {
        SYNC_ORDER
            .iter()
            .copied()
            .find(|entity| entity.remote_table() == table)
    }

    pub fn references(&self) -> &'static [EntityReference] {
        match self {
            Self::Transaction => TRANSACTION_REFS,
            Self::Category => CATEGORY_REFS,
            Self::Budget | Self::Goal => CATEGORY_ID_REFS,
            Self::Asset | Self::Liability => PROPERTY_ID_REFS,
            Self::ImportBatch | Self::Settings | Self::Property | Self::NetWorthSnapshot => &[],
        }
    }

    /// Fields that identify a default seed row across devices. `None` for
    /// entities that are never seeded; an empty list means the table holds a
    /// single row.
    pub fn seed_key(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Category => Some(&["name", "type", "isDefault"]),
            Self::Settings => Some(&[]),
            _ => None,
        }
    }

    /// Position in [`SYNC_ORDER`].
    pub fn sync_rank(&self) -> usize {
        SYNC_ORDER
            .iter()
            .position(|entity| entity == self)
            .unwrap_or(SYNC_ORDER.len())
    }
}

impl std::fmt::Display for SyncEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.local_table())
    }
}

/// Per-row sync state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Local state may differ from remote and must be pushed.
    #[default]
    Pending,
    /// Local state matches the last known remote state.
    Synced,
    /// Default row created on this device. It is not pushed until a sync has
    /// read the remote table and found no twin for it.
    Seeded,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Seeded => "seeded",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            "seeded" => Ok(Self::Seeded),
            other => Err(Error::invalid_input(format!(
                "Unknown sync status '{}'",
                other
            ))),
        }
    }
}

/// Implemented by every domain model stored in a synced table.
pub trait SyncRecord: Serialize + DeserializeOwned + Send + Sync {
    const ENTITY: SyncEntity;
}

/// Entity-agnostic view of one local row, used by the sync pipelines.
///
/// `fields` holds the full camelCase record, including the sync metadata
/// keys, exactly as the typed domain model serializes it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalRecord {
    pub entity: SyncEntity,
    pub local_id: i64,
    pub remote_id: Option<String>,
    pub sync_status: SyncStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub fields: Map<String, Value>,
}

impl LocalRecord {
    pub fn from_model<R: SyncRecord>(model: &R) -> Result<Self> {
        match serde_json::to_value(model)? {
            Value::Object(fields) => Self::from_fields(R::ENTITY, fields),
            _ => Err(Error::invalid_input(format!(
                "{} record did not serialize to an object",
                R::ENTITY
            ))),
        }
    }

    pub fn from_fields(entity: SyncEntity, fields: Map<String, Value>) -> Result<Self> {
        let local_id = fields
            .get(FIELD_ID)
            .and_then(Value::as_i64)
            .ok_or_else(|| ValidationError::MissingField(FIELD_ID.to_string()))?;
        let remote_id = match fields.get(FIELD_REMOTE_ID) {
            Some(Value::String(value)) => Some(value.clone()),
            _ => None,
        };
        let sync_status = match fields.get(FIELD_SYNC_STATUS) {
            Some(Value::String(value)) => SyncStatus::parse(value)?,
            _ => SyncStatus::Pending,
        };
        let created_at = timestamp_field(&fields, FIELD_CREATED_AT)?;
        let updated_at = timestamp_field(&fields, FIELD_UPDATED_AT)?;

        Ok(Self {
            entity,
            local_id,
            remote_id,
            sync_status,
            created_at,
            updated_at,
            fields,
        })
    }

    pub fn into_model<R: SyncRecord>(self) -> Result<R> {
        if self.entity != R::ENTITY {
            return Err(Error::invalid_input(format!(
                "Cannot read {} record as {}",
                self.entity,
                R::ENTITY
            )));
        }
        Ok(serde_json::from_value(Value::Object(self.fields))?)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

fn timestamp_field(fields: &Map<String, Value>, name: &str) -> Result<NaiveDateTime> {
    let value = fields
        .get(name)
        .cloned()
        .ok_or_else(|| ValidationError::MissingField(name.to_string()))?;
    Ok(serde_json::from_value(value)?)
}

/// A remote delete that still has to be propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQueueEntry {
    pub id: i64,
    /// Remote table name of the deleted row.
    pub entity_name: String,
    pub remote_id: String,
    pub deleted_at: NaiveDateTime,
}

/// Global sync state exposed to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    #[default]
    Idle,
    Syncing,
    Offline,
    Error,
}

/// Trigger source for sync jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncCycleTrigger {
    SignedIn,
    Periodic,
    ConnectivityRestored,
    LocalMutation,
    Manual,
}

/// Determines whether an incoming remote row should overwrite a synced local
/// row: only a strictly newer remote timestamp wins.
pub fn is_remote_newer(local_updated_at: NaiveDateTime, remote_updated_at: Option<NaiveDateTime>) -> bool {
    match remote_updated_at {
        Some(remote) => remote > local_updated_at,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn remote_newer_timestamp_wins() {
        assert!(is_remote_newer(ts(10, 0), Some(ts(10, 1))));
    }

    #[test]
    fn equal_or_older_remote_keeps_local() {
        assert!(!is_remote_newer(ts(10, 0), Some(ts(10, 0))));
        assert!(!is_remote_newer(ts(10, 0), Some(ts(9, 59))));
        assert!(!is_remote_newer(ts(10, 0), None));
    }

    #[test]
    fn sync_order_lists_referenced_entities_first() {
        for entity in SYNC_ORDER {
            for reference in entity.references() {
                assert!(
                    reference.target.sync_rank() <= entity.sync_rank(),
                    "{} references {} which syncs later",
                    entity,
                    reference.target
                );
            }
        }
    }

    #[test]
    fn only_seeded_tables_have_a_seed_key() {
        assert_eq!(
            SyncEntity::Category.seed_key(),
            Some(&["name", "type", "isDefault"][..])
        );
        assert_eq!(SyncEntity::Settings.seed_key(), Some(&[][..]));
        assert_eq!(SyncEntity::Transaction.seed_key(), None);
        assert_eq!(SyncStatus::parse("seeded").expect("status"), SyncStatus::Seeded);
    }

    #[test]
    fn remote_table_names_round_trip() {
        for entity in SYNC_ORDER {
            assert_eq!(SyncEntity::from_remote_table(entity.remote_table()), Some(entity));
        }
        assert_eq!(SyncEntity::from_remote_table("accounts"), None);
    }

    #[test]
    fn sync_entity_serialization_is_snake_case() {
        let actual = serde_json::to_string(&SyncEntity::NetWorthSnapshot).expect("serialize");
        assert_eq!(actual, "\"net_worth_snapshot\"");
    }

    #[test]
    fn local_record_reads_metadata_from_fields() {
        let fields = serde_json::json!({
            "id": 7,
            "remoteId": "r-7",
            "syncStatus": "synced",
            "createdAt": "2026-01-01T10:00:00",
            "updatedAt": "2026-01-01T10:01:00",
            "name": "Groceries"
        });
        let Value::Object(fields) = fields else {
            unreachable!()
        };
        let record = LocalRecord::from_fields(SyncEntity::Category, fields).expect("record");
        assert_eq!(record.local_id, 7);
        assert_eq!(record.remote_id.as_deref(), Some("r-7"));
        assert_eq!(record.sync_status, SyncStatus::Synced);
        assert_eq!(record.updated_at, ts(10, 1));
    }

    #[test]
    fn local_record_without_id_is_rejected() {
        let Value::Object(fields) = serde_json::json!({ "name": "x" }) else {
            unreachable!()
        };
        assert!(LocalRecord::from_fields(SyncEntity::Category, fields).is_err());
    }
}
