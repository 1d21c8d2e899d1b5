use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

/// Bank statement layouts understood by the importers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankFormat {
    #[default]
    Commbank,
    Nab,
    Anz,
    Westpac,
    Up,
    Ing,
    Generic,
}

/// One CSV file imported into the transactions table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatch {
    #[serde(default)]
    pub id: i64,
    pub filename: String,
    pub bank_format: BankFormat,
    pub transaction_count: i32,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub imported_at: NaiveDateTime,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl SyncRecord for ImportBatch {
    const ENTITY: SyncEntity = SyncEntity::ImportBatch;
}
