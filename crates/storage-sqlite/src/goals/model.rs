use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use expensehud_core::errors::{Error, Result};
use expensehud_core::goals::Goal;

use crate::utils::{decimal_from_db, decimal_to_db, enum_from_db, enum_to_db, status_from_db};

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
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct GoalDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub goal_type: String,
    pub title: String,
    pub target_amount: String,
    pub category_id: Option<i64>,
    pub deadline: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<GoalDB> for Goal {
    type Error = Error;

    fn try_from(db: GoalDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            goal_type: enum_from_db(&db.goal_type)?,
            title: db.title,
            target_amount: decimal_from_db("target_amount", &db.target_amount)?,
            category_id: db.category_id,
            deadline: db.deadline,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&Goal> for GoalDB {
    type Error = Error;

    fn try_from(domain: &Goal) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            goal_type: enum_to_db(&domain.goal_type)?,
            title: domain.title.clone(),
            target_amount: decimal_to_db(&domain.target_amount),
            category_id: domain.category_id,
            deadline: domain.deadline,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}
