#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tempfile::tempdir;

use expensehud_cloud_sync::{
    RemoteBackend, RemoteError, RemoteRow, SessionAuthContext, SyncEngine, SyncIdentity,
};
use expensehud_core::records::RecordService;
use expensehud_core::sync::{LocalSyncStoreTrait, SyncEntity};
use expensehud_storage_sqlite::{
    create_pool, init, run_migrations, seed_defaults, spawn_writer, DeleteQueueRepository,
    LocalSyncRepository, SeedSummary, WriteHandle,
};

pub const OWNER: &str = "user-1";

type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Columns that must point at an existing row owned by the same user.
const FOREIGN_KEYS: &[(&str, &str, &str)] = &[
    ("transactions", "category_id", "categories"),
    ("transactions", "import_batch_id", "import_batches"),
    ("categories", "parent_id", "categories"),
    ("budgets", "category_id", "categories"),
    ("goals", "category_id", "categories"),
    ("assets", "property_id", "properties"),
    ("liabilities", "property_id", "properties"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    pub op: &'static str,
    pub table: String,
}

/// In-memory remote backend that scopes every call to the caller's owner id
/// and rejects rows whose foreign keys do not name an existing row.
#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, Vec<RemoteRow>>>,
    calls: Mutex<Vec<RemoteCall>>,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> Vec<RemoteCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.op != "select")
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn rows(&self, table: &str) -> Vec<RemoteRow> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn row(&self, table: &str, id: &str) -> Option<RemoteRow> {
        self.rows(table)
            .into_iter()
            .find(|row| row.get("id") == Some(&json!(id)))
    }

    /// Writes a row directly, as another device would.
    pub fn seed_row(&self, table: &str, row: Value) -> String {
        let mut row = object(row);
        let id = row
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        row.insert("id".to_string(), json!(id));
        row.entry("user_id".to_string()).or_insert(json!(OWNER));
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
        id
    }

    /// Changes columns of an existing row directly.
    pub fn patch_row(&self, table: &str, id: &str, changes: Value) {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row.get("id") == Some(&json!(id))))
            .expect("row to patch");
        for (column, value) in object(changes) {
            row.insert(column, value);
        }
    }

    fn record(&self, op: &'static str, table: &str) -> RemoteResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("connection refused".to_string()));
        }
        self.calls.lock().unwrap().push(RemoteCall {
            op,
            table: table.to_string(),
        });
        Ok(())
    }

    fn check_foreign_keys(
        tables: &HashMap<String, Vec<RemoteRow>>,
        table: &str,
        owner: &str,
        row: &RemoteRow,
    ) -> RemoteResult<()> {
        for (fk_table, column, target) in FOREIGN_KEYS {
            if *fk_table != table {
                continue;
            }
            let Some(value) = row.get(*column).filter(|value| !value.is_null()) else {
                continue;
            };
            let exists = tables.get(*target).is_some_and(|rows| {
                rows.iter().any(|candidate| {
                    candidate.get("id") == Some(value)
                        && candidate.get("user_id") == Some(&json!(owner))
                })
            });
            if !exists {
                return Err(RemoteError::rejected(
                    409,
                    format!(
                        "insert or update on table \"{}\" violates foreign key constraint on {}",
                        table, column
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for MemoryBackend {
    async fn insert(
        &self,
        identity: &SyncIdentity,
        table: &str,
        row: &RemoteRow,
    ) -> RemoteResult<String> {
        self.record("insert", table)?;
        if row.get("user_id") != Some(&json!(identity.owner_id)) {
            return Err(RemoteError::rejected(403, "row owner does not match caller"));
        }
        let mut tables = self.tables.lock().unwrap();
        Self::check_foreign_keys(&tables, table, &identity.owner_id, row)?;

        let id = uuid::Uuid::new_v4().to_string();
        let mut stored = row.clone();
        stored.insert("id".to_string(), json!(id));
        tables.entry(table.to_string()).or_default().push(stored);
        Ok(id)
    }

    async fn update(
        &self,
        identity: &SyncIdentity,
        table: &str,
        remote_id: &str,
        row: &RemoteRow,
    ) -> RemoteResult<()> {
        self.record("update", table)?;
        let mut tables = self.tables.lock().unwrap();
        Self::check_foreign_keys(&tables, table, &identity.owner_id, row)?;

        if let Some(stored) = tables.get_mut(table).and_then(|rows| {
            rows.iter_mut().find(|stored| {
                stored.get("id") == Some(&json!(remote_id))
                    && stored.get("user_id") == Some(&json!(identity.owner_id))
            })
        }) {
            for (column, value) in row {
                if column != "id" {
                    stored.insert(column.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(
        &self,
        identity: &SyncIdentity,
        table: &str,
        remote_id: &str,
    ) -> RemoteResult<()> {
        self.record("delete", table)?;
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|stored| {
                !(stored.get("id") == Some(&json!(remote_id))
                    && stored.get("user_id") == Some(&json!(identity.owner_id)))
            });
        }
        Ok(())
    }

    async fn select_owned(
        &self,
        identity: &SyncIdentity,
        table: &str,
    ) -> RemoteResult<Vec<RemoteRow>> {
        self.record("select", table)?;
        Ok(self
            .rows(table)
            .into_iter()
            .filter(|row| row.get("user_id") == Some(&json!(identity.owner_id)))
            .collect())
    }
}

/// One device: a local SQLite store plus the engine that syncs it.
pub struct Device {
    pub store: Arc<LocalSyncRepository>,
    pub queue: Arc<DeleteQueueRepository>,
    pub engine: Arc<SyncEngine>,
    pub records: RecordService,
    pub writer: WriteHandle,
}

impl Device {
    pub fn new(backend: Arc<MemoryBackend>) -> Self {
        let app_data = tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        run_migrations(&db_path).expect("migrate db");
        let pool = create_pool(&db_path).expect("create pool");
        let writer = spawn_writer(pool.as_ref().clone());

        let store = Arc::new(LocalSyncRepository::new(pool.clone(), writer.clone()));
        let queue = Arc::new(DeleteQueueRepository::new(pool, writer.clone()));
        let engine = Arc::new(SyncEngine::new(store.clone(), queue.clone(), backend));
        let records = RecordService::new(store.clone());

        Self {
            store,
            queue,
            engine,
            records,
            writer,
        }
    }

    /// A fresh device with the default categories and settings seeded.
    pub async fn with_defaults(backend: Arc<MemoryBackend>) -> (Self, SeedSummary) {
        let device = Self::new(backend);
        let summary = seed_defaults(&device.writer).await.expect("seed defaults");
        (device, summary)
    }

    pub fn record(&self, entity: SyncEntity, local_id: i64) -> expensehud_core::sync::LocalRecord {
        self.store
            .get_record(entity, local_id)
            .expect("get record")
            .expect("record exists")
    }
}

pub fn identity() -> SyncIdentity {
    SyncIdentity::new(OWNER, "access-token")
}

pub fn signed_in() -> Arc<SessionAuthContext> {
    let session = Arc::new(SessionAuthContext::new());
    session.sign_in(identity());
    session
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

pub fn category(name: &str) -> Map<String, Value> {
    object(json!({
        "name": name,
        "icon": "shopping-cart",
        "color": "#22c55e",
        "type": "expense",
        "keywords": [name.to_lowercase()],
        "isDefault": false,
        "sortOrder": 1
    }))
}

pub fn transaction(category_id: i64, description: &str, amount: f64) -> Map<String, Value> {
    object(json!({
        "date": "2026-03-01",
        "description": description,
        "amount": amount,
        "categoryId": category_id,
        "bankAccount": "Everyday",
        "isRecurring": false,
        "tags": []
    }))
}
