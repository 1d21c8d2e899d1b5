use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Cash,
    Offset,
    Shares,
    Super,
    Property,
    Crypto,
    Business,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub value: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    /// Set when the asset is tied to an investment property (offset account,
    /// equity).
    #[serde(default)]
    pub property_id: Option<i64>,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl SyncRecord for Asset {
    const ENTITY: SyncEntity = SyncEntity::Asset;
}
