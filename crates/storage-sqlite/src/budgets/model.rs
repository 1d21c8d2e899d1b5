use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use expensehud_core::budgets::Budget;
use expensehud_core::errors::{Error, Result};

use crate::utils::{decimal_from_db, decimal_to_db, status_from_db};

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
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct BudgetDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub category_id: i64,
    pub monthly_limit: String,
    pub effective_from: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<BudgetDB> for Budget {
    type Error = Error;

    fn try_from(db: BudgetDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            category_id: db.category_id,
            monthly_limit: decimal_from_db("monthly_limit", &db.monthly_limit)?,
            effective_from: db.effective_from,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&Budget> for BudgetDB {
    type Error = Error;

    fn try_from(domain: &Budget) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            category_id: domain.category_id,
            monthly_limit: decimal_to_db(&domain.monthly_limit),
            effective_from: domain.effective_from,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}
