use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use expensehud_core::categories::Category;
use expensehud_core::errors::{Error, Result};

use crate::utils::{
    decimal_to_db, enum_from_db, enum_to_db, list_from_db, list_to_db, optional_decimal_from_db,
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
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct CategoryDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub category_type: String,
    pub parent_id: Option<i64>,
    pub keywords: String,
    pub budget: Option<String>,
    pub is_default: bool,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<CategoryDB> for Category {
    type Error = Error;

    fn try_from(db: CategoryDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            name: db.name,
            icon: db.icon,
            color: db.color,
            category_type: enum_from_db(&db.category_type)?,
            parent_id: db.parent_id,
            keywords: list_from_db(&db.keywords)?,
            budget: optional_decimal_from_db("budget", db.budget.as_deref())?,
            is_default: db.is_default,
            sort_order: db.sort_order,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&Category> for CategoryDB {
    type Error = Error;

    fn try_from(domain: &Category) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            name: domain.name.clone(),
            icon: domain.icon.clone(),
            color: domain.color.clone(),
            category_type: enum_to_db(&domain.category_type)?,
            parent_id: domain.parent_id,
            keywords: list_to_db(&domain.keywords)?,
            budget: domain.budget.as_ref().map(decimal_to_db),
            is_default: domain.is_default,
            sort_order: domain.sort_order,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}
