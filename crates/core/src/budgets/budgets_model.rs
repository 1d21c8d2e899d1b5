use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub id: i64,
    pub category_id: i64,
    pub monthly_limit: Decimal,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl SyncRecord for Budget {
    const ENTITY: SyncEntity = SyncEntity::Budget;
}
