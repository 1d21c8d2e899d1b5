use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use expensehud_core::errors::{Error, Result};
use expensehud_core::wealth::{Asset, Liability, NetWorthSnapshot, Property};

use crate::utils::{
    decimal_from_db, decimal_to_db, enum_from_db, enum_to_db, optional_decimal_from_db,
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
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct AssetDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub name: String,
    pub asset_type: String,
    pub value: String,
    pub notes: Option<String>,
    pub property_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<AssetDB> for Asset {
    type Error = Error;

    fn try_from(db: AssetDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            name: db.name,
            asset_type: enum_from_db(&db.asset_type)?,
            value: decimal_from_db("value", &db.value)?,
            notes: db.notes,
            property_id: db.property_id,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&Asset> for AssetDB {
    type Error = Error;

    fn try_from(domain: &Asset) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            name: domain.name.clone(),
            asset_type: enum_to_db(&domain.asset_type)?,
            value: decimal_to_db(&domain.value),
            notes: domain.notes.clone(),
            property_id: domain.property_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}

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
#[diesel(table_name = crate::schema::liabilities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct LiabilityDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub name: String,
    pub liability_type: String,
    pub balance: String,
    pub interest_rate: Option<String>,
    pub min_payment: Option<String>,
    pub notes: Option<String>,
    pub property_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<LiabilityDB> for Liability {
    type Error = Error;

    fn try_from(db: LiabilityDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            name: db.name,
            liability_type: enum_from_db(&db.liability_type)?,
            balance: decimal_from_db("balance", &db.balance)?,
            interest_rate: optional_decimal_from_db("interest_rate", db.interest_rate.as_deref())?,
            min_payment: optional_decimal_from_db("min_payment", db.min_payment.as_deref())?,
            notes: db.notes,
            property_id: db.property_id,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&Liability> for LiabilityDB {
    type Error = Error;

    fn try_from(domain: &Liability) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            name: domain.name.clone(),
            liability_type: enum_to_db(&domain.liability_type)?,
            balance: decimal_to_db(&domain.balance),
            interest_rate: domain.interest_rate.as_ref().map(decimal_to_db),
            min_payment: domain.min_payment.as_ref().map(decimal_to_db),
            notes: domain.notes.clone(),
            property_id: domain.property_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}

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
#[diesel(table_name = crate::schema::properties)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct PropertyDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub nickname: String,
    pub address: Option<String>,
    pub purchase_price: String,
    pub current_value: String,
    pub loan_amount: String,
    pub interest_rate: String,
    pub loan_type: String,
    pub offset_balance: String,
    pub weekly_rent: String,
    pub vacancy_rate: String,
    pub monthly_running_costs: String,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<PropertyDB> for Property {
    type Error = Error;

    fn try_from(db: PropertyDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            nickname: db.nickname,
            address: db.address,
            purchase_price: decimal_from_db("purchase_price", &db.purchase_price)?,
            current_value: decimal_from_db("current_value", &db.current_value)?,
            loan_amount: decimal_from_db("loan_amount", &db.loan_amount)?,
            interest_rate: decimal_from_db("interest_rate", &db.interest_rate)?,
            loan_type: enum_from_db(&db.loan_type)?,
            offset_balance: decimal_from_db("offset_balance", &db.offset_balance)?,
            weekly_rent: decimal_from_db("weekly_rent", &db.weekly_rent)?,
            vacancy_rate: decimal_from_db("vacancy_rate", &db.vacancy_rate)?,
            monthly_running_costs: decimal_from_db(
                "monthly_running_costs",
                &db.monthly_running_costs,
            )?,
            purchase_date: db.purchase_date,
            notes: db.notes,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&Property> for PropertyDB {
    type Error = Error;

    fn try_from(domain: &Property) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            nickname: domain.nickname.clone(),
            address: domain.address.clone(),
            purchase_price: decimal_to_db(&domain.purchase_price),
            current_value: decimal_to_db(&domain.current_value),
            loan_amount: decimal_to_db(&domain.loan_amount),
            interest_rate: decimal_to_db(&domain.interest_rate),
            loan_type: enum_to_db(&domain.loan_type)?,
            offset_balance: decimal_to_db(&domain.offset_balance),
            weekly_rent: decimal_to_db(&domain.weekly_rent),
            vacancy_rate: decimal_to_db(&domain.vacancy_rate),
            monthly_running_costs: decimal_to_db(&domain.monthly_running_costs),
            purchase_date: domain.purchase_date,
            notes: domain.notes.clone(),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}

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
#[diesel(table_name = crate::schema::net_worth_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct NetWorthSnapshotDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub date: NaiveDate,
    pub total_assets: String,
    pub total_liabilities: String,
    pub net_worth: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remote_id: Option<String>,
    pub sync_status: String,
}

impl TryFrom<NetWorthSnapshotDB> for NetWorthSnapshot {
    type Error = Error;

    fn try_from(db: NetWorthSnapshotDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            date: db.date,
            total_assets: decimal_from_db("total_assets", &db.total_assets)?,
            total_liabilities: decimal_from_db("total_liabilities", &db.total_liabilities)?,
            net_worth: decimal_from_db("net_worth", &db.net_worth)?,
            remote_id: db.remote_id,
            sync_status: status_from_db(&db.sync_status)?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<&NetWorthSnapshot> for NetWorthSnapshotDB {
    type Error = Error;

    fn try_from(domain: &NetWorthSnapshot) -> Result<Self> {
        Ok(Self {
            id: domain.id,
            date: domain.date,
            total_assets: decimal_to_db(&domain.total_assets),
            total_liabilities: decimal_to_db(&domain.total_liabilities),
            net_worth: decimal_to_db(&domain.net_worth),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            remote_id: domain.remote_id.clone(),
            sync_status: domain.sync_status.as_str().to_string(),
        })
    }
}
