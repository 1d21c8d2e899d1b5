use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEntity, SyncRecord, SyncStatus};

/// Month-end net worth figures. `date` is always the first day of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSnapshot {
    #[serde(default)]
    pub id: i64,
    pub date: NaiveDate,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: NaiveDateTime,
}

impl NetWorthSnapshot {
    /// Builds a snapshot for the month containing `day`.
    pub fn for_month(day: NaiveDate, total_assets: Decimal, total_liabilities: Decimal) -> Self {
        let date = day.with_day(1).unwrap_or(day);
        Self {
            id: 0,
            date,
            total_assets,
            total_liabilities,
            net_worth: total_assets - total_liabilities,
            remote_id: None,
            sync_status: SyncStatus::Pending,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }
}

impl SyncRecord for NetWorthSnapshot {
    const ENTITY: SyncEntity = SyncEntity::NetWorthSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn snapshot_is_pinned_to_first_of_month() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();
        let snapshot = NetWorthSnapshot::for_month(day, dec!(250000), dec!(180000.50));
        assert_eq!(snapshot.date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(snapshot.net_worth, dec!(69999.50));
    }

    #[test]
    fn loan_type_uses_short_wire_names() {
        use crate::wealth::LoanType;
        assert_eq!(
            serde_json::to_string(&LoanType::PrincipalAndInterest).unwrap(),
            "\"p&i\""
        );
        assert_eq!(
            serde_json::from_str::<LoanType>("\"io\"").unwrap(),
            LoanType::InterestOnly
        );
    }
}
