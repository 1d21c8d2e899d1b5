use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Save,
    SpendLimit,
    CategoryLimit,
    IncomeTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub title: String,
    pub target_amount: Decimal,
    /// Only meaningful for `category_limit` goals.
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl SyncRecord for Goal {
    const ENTITY: SyncEntity = SyncEntity::Goal;
}
