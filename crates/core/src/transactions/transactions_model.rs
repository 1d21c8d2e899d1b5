use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

/// A single bank statement line. Negative amounts are outflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub balance: Option<Decimal>,
    pub category_id: i64,
    pub bank_account: String,
    #[serde(default)]
    pub import_batch_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    pub fn is_outflow(&self) -> bool {
        self.amount.is_sign_negative()
    }
}

impl SyncRecord for Transaction {
    const ENTITY: SyncEntity = SyncEntity::Transaction;
}
