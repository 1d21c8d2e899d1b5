use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::imports::BankFormat;
use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub id: i64,
    pub currency: String,
    pub date_format: String,
    pub default_bank_format: BankFormat,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl Settings {
    /// Settings row seeded into an empty database.
    pub fn defaults(now: NaiveDateTime) -> Self {
        Self {
            id: 0,
            currency: "AUD".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            default_bank_format: BankFormat::Commbank,
            theme: Theme::System,
            remote_id: None,
            sync_status: SyncStatus::Seeded,
            created_at: now,
            updated_at: now,
        }
    }
}

impl SyncRecord for Settings {
    const ENTITY: SyncEntity = SyncEntity::Settings;
}
