use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use expensehud_core::errors::{Error, Result};
use expensehud_core::transactions::Transaction;

use crate::utils::{
    decimal_from_db, decimal_to_db, list_from_db, list_to_db, optional_decimal_from_db,
    status_from_db,
};

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
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: String,
    pub balance: Option<String>,
    pub category_id: i64,
    pub bank_account: String,
    pub import_batch_id: Option<i64>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub tags: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            date: db.date,
            description: db.description,
            amount: decimal_from_db("amount", &db.amount)?,
            balance: optional_decimal_from_db("balance", db.balance.as_deref())?,
            category_id: db.category_id,
            bank_account: db.bank_account,
            import_batch_id: db.import_batch_id,
            notes: db.notes,
            is_recurring: db.is_recurring,
            tags: list_from_db(&db.tags)?,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&Transaction> for TransactionDB {
    type Error = Error;

    fn try_from(domain: &Transaction) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            date: domain.date,
            description: domain.description.clone(),
            amount: decimal_to_db(&domain.amount),
            balance: domain.balance.as_ref().map(decimal_to_db),
            category_id: domain.category_id,
            bank_account: domain.bank_account.clone(),
            import_batch_id: domain.import_batch_id,
            notes: domain.notes.clone(),
            is_recurring: domain.is_recurring,
            tags: list_to_db(&domain.tags)?,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}
