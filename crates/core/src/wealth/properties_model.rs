use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    /// Interest only.
    #[default]
    #[serde(rename = "io")]
    InterestOnly,
    #[serde(rename = "p&i")]
    PrincipalAndInterest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default)]
    pub id: i64,
    pub nickname: String,
    #[serde(default)]
    pub address: Option<String>,
    pub purchase_price: Decimal,
    pub current_value: Decimal,
    pub loan_amount: Decimal,
    pub interest_rate: Decimal,
    #[serde(default)]
    pub loan_type: LoanType,
    #[serde(default)]
    pub offset_balance: Decimal,
    #[serde(default)]
    pub weekly_rent: Decimal,
    /// Fraction of the year the property is expected to sit empty, as a
    /// percentage.
    #[serde(default)]
    pub vacancy_rate: Decimal,
    #[serde(default)]
    pub monthly_running_costs: Decimal,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl Property {
    pub fn equity(&self) -> Decimal {
        self.current_value - self.loan_amount
    }
}

impl SyncRecord for Property {
    const ENTITY: SyncEntity = SyncEntity::Property;
}
