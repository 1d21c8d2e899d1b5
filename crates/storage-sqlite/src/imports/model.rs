use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use expensehud_core::errors::{Error, Result};
use expensehud_core::imports::ImportBatch;

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
#[diesel(table_name = crate::schema::import_batches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct ImportBatchDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub filename: String,
    pub bank_format: String,
    pub transaction_count: i32,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub imported_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<ImportBatchDB> for ImportBatch {
    type Error = Error;

    fn try_from(db: ImportBatchDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            filename: db.filename,
            bank_format: enum_from_db(&db.bank_format)?,
            transaction_count: db.transaction_count,
            date_from: db.date_from,
            date_to: db.date_to,
            imported_at: db.imported_at,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&ImportBatch> for ImportBatchDB {
    type Error = Error;

    fn try_from(domain: &ImportBatch) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            filename: domain.filename.clone(),
            bank_format: enum_to_db(&domain.bank_format)?,
            transaction_count: domain.transaction_count,
            date_from: domain.date_from,
            date_to: domain.date_to,
            imported_at: domain.imported_at,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}
