use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Expense,
    Income,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Lowercase description fragments used by the auto-categoriser.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl SyncRecord for Category {
    const ENTITY: SyncEntity = SyncEntity::Category;
}
