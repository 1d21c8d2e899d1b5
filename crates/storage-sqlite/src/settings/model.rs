use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use expensehud_core::errors::{Error, Result};
use expensehud_core::settings::Settings;

use crate::utils::{enum_from_db, enum_to_db, status_from_db};

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = crate::schema::settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SettingsDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub currency: String,
    pub date_format: String,
    pub default_bank_format: String,
    pub theme: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<SettingsDB> for Settings {
    type Error = Error;

    fn try_from(db: SettingsDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            currency: db.currency,
            date_format: db.date_format,
            default_bank_format: enum_from_db(&db.default_bank_format)?,
            theme: enum_from_db(&db.theme)?,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&Settings> for SettingsDB {
    type Error = Error;

    fn try_from(domain: &Settings) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            currency: domain.currency.clone(),
            date_format: domain.date_format.clone(),
            default_bank_format: enum_to_db(&domain.default_bank_format)?,
            theme: enum_to_db(&domain.theme)?,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}
