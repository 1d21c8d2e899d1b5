//! Maps local rows onto remote rows and back.
//!
//! Local rows use camelCase field names and naive UTC timestamps; remote rows
//! use snake_case columns, RFC 3339 timestamps and carry the owner in
//! `user_id`. Every translation is pure: reference fields are left as they are
//! and resolved by the pipelines.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound};
use serde_json::{Map, Value};
use thiserror::Error;

use expensehud_core::sync::{
    LocalRecord, SyncEntity, SyncStatus, FIELD_CREATED_AT, FIELD_ID, FIELD_REMOTE_ID,
    FIELD_SYNC_STATUS, FIELD_UPDATED_AT,
};

use crate::engine::RemoteRow;

/// Remote primary key column.
pub const REMOTE_ID_COLUMN: &str = "id";
/// Remote column holding the owning user.
pub const OWNER_COLUMN: &str = "user_id";
/// Remote column carrying the local id the row was pushed from.
pub const ORIGIN_LOCAL_ID_COLUMN: &str = "local_id";

const REMOTE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("{entity} field '{field}' has an unreadable date value: {value}")]
    InvalidDate {
        entity: SyncEntity,
        field: String,
        value: String,
    },

    #[error("{entity} row from the backend has no id")]
    MissingRemoteId { entity: SyncEntity },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// Calendar date, `YYYY-MM-DD` on both sides.
    Date,
    /// Naive UTC timestamp locally, RFC 3339 with a `Z` suffix remotely.
    Timestamp,
}

const SHARED_RENAMES: &[(&str, &str)] = &[
    (FIELD_CREATED_AT, "created_at"),
    (FIELD_UPDATED_AT, "updated_at"),
];

const SHARED_DATES: &[(&str, DateKind)] = &[
    (FIELD_CREATED_AT, DateKind::Timestamp),
    (FIELD_UPDATED_AT, DateKind::Timestamp),
];

fn entity_renames(entity: SyncEntity) -> &'static [(&'static str, &'static str)] {
    match entity {
        SyncEntity::Transaction => &[
            ("categoryId", "category_id"),
            ("bankAccount", "bank_account"),
            ("importBatchId", "import_batch_id"),
            ("isRecurring", "is_recurring"),
        ],
        SyncEntity::Category => &[
            ("parentId", "parent_id"),
            ("isDefault", "is_default"),
            ("sortOrder", "sort_order"),
        ],
        SyncEntity::ImportBatch => &[
            ("bankFormat", "bank_format"),
            ("transactionCount", "transaction_count"),
            ("dateFrom", "date_from"),
            ("dateTo", "date_to"),
            ("importedAt", "imported_at"),
        ],
        SyncEntity::Budget => &[
            ("categoryId", "category_id"),
            ("monthlyLimit", "monthly_limit"),
            ("effectiveFrom", "effective_from"),
        ],
        SyncEntity::Settings => &[
            ("dateFormat", "date_format"),
            ("defaultBankFormat", "default_bank_format"),
        ],
        SyncEntity::Goal => &[
            ("targetAmount", "target_amount"),
            ("categoryId", "category_id"),
        ],
        SyncEntity::Asset => &[("propertyId", "property_id")],
        SyncEntity::Liability => &[
            ("interestRate", "interest_rate"),
            ("minPayment", "min_payment"),
            ("propertyId", "property_id"),
        ],
        SyncEntity::Property => &[
            ("purchasePrice", "purchase_price"),
            ("currentValue", "current_value"),
            ("loanAmount", "loan_amount"),
            ("interestRate", "interest_rate"),
            ("loanType", "loan_type"),
            ("offsetBalance", "offset_balance"),
            ("weeklyRent", "weekly_rent"),
            ("vacancyRate", "vacancy_rate"),
            ("monthlyRunningCosts", "monthly_running_costs"),
            ("purchaseDate", "purchase_date"),
        ],
        SyncEntity::NetWorthSnapshot => &[
            ("totalAssets", "total_assets"),
            ("totalLiabilities", "total_liabilities"),
            ("netWorth", "net_worth"),
        ],
    }
}

fn entity_dates(entity: SyncEntity) -> &'static [(&'static str, DateKind)] {
    match entity {
        SyncEntity::Transaction | SyncEntity::NetWorthSnapshot => &[("date", DateKind::Date)],
        SyncEntity::ImportBatch => &[
            ("dateFrom", DateKind::Date),
            ("dateTo", DateKind::Date),
            ("importedAt", DateKind::Timestamp),
        ],
        SyncEntity::Budget => &[("effectiveFrom", DateKind::Date)],
        SyncEntity::Goal => &[("deadline", DateKind::Date)],
        SyncEntity::Property => &[("purchaseDate", DateKind::Date)],
        SyncEntity::Category
        | SyncEntity::Settings
        | SyncEntity::Asset
        | SyncEntity::Liability => &[],
    }
}

/// Remote column name for a local field. Unmapped fields keep their name.
pub fn remote_field_name(entity: SyncEntity, local: &str) -> &str {
    SHARED_RENAMES
        .iter()
        .chain(entity_renames(entity))
        .find(|(from, _)| *from == local)
        .map(|(_, to)| *to)
        .unwrap_or(local)
}

/// Local field name for a remote column. Unmapped columns keep their name.
pub fn local_field_name(entity: SyncEntity, remote: &str) -> &str {
    SHARED_RENAMES
        .iter()
        .chain(entity_renames(entity))
        .find(|(_, to)| *to == remote)
        .map(|(from, _)| *from)
        .unwrap_or(remote)
}

/// Date kind of a local field, if it carries a date.
pub fn date_kind(entity: SyncEntity, local: &str) -> Option<DateKind> {
    SHARED_DATES
        .iter()
        .chain(entity_dates(entity))
        .find(|(field, _)| *field == local)
        .map(|(_, kind)| *kind)
}

/// A pulled row in local shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFragment {
    /// Local fields with `remoteId` and `syncStatus = synced` set. Carries no
    /// local `id`.
    pub fields: Map<String, Value>,
    pub remote_id: String,
    /// Local id the row was originally pushed from, if the backend kept it.
    pub origin_local_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl LocalFragment {
    /// Timestamp used for last-write-wins: `updatedAt`, falling back to
    /// `createdAt`.
    pub fn lww_timestamp(&self) -> Option<NaiveDateTime> {
        self.updated_at.or(self.created_at)
    }
}

/// Translates a local row into the remote shape for `owner_id`.
pub fn to_remote(
    entity: SyncEntity,
    record: &LocalRecord,
    owner_id: &str,
) -> Result<RemoteRow, TranslateError> {
    let mut row = RemoteRow::new();
    row.insert(OWNER_COLUMN.to_string(), Value::from(owner_id));

    for (key, value) in &record.fields {
        match key.as_str() {
            FIELD_REMOTE_ID | FIELD_SYNC_STATUS => continue,
            FIELD_ID => {
                row.insert(ORIGIN_LOCAL_ID_COLUMN.to_string(), value.clone());
            }
            _ => {
                let value = match date_kind(entity, key) {
                    Some(kind) => date_to_remote(entity, key, kind, value)?,
                    None => value.clone(),
                };
                row.insert(remote_field_name(entity, key).to_string(), value);
            }
        }
    }

    Ok(row)
}

/// Translates a remote row into local shape.
pub fn from_remote(entity: SyncEntity, row: RemoteRow) -> Result<LocalFragment, TranslateError> {
    let mut fields = Map::new();
    let mut remote_id = None;
    let mut origin_local_id = None;

    for (column, value) in row {
        match column.as_str() {
            REMOTE_ID_COLUMN => remote_id = id_string(&value),
            OWNER_COLUMN => continue,
            ORIGIN_LOCAL_ID_COLUMN => origin_local_id = id_integer(&value),
            _ => {
                let local = local_field_name(entity, &column).to_string();
                let value = match date_kind(entity, &local) {
                    Some(kind) => date_from_remote(entity, &local, kind, &value)?,
                    None => value,
                };
                fields.insert(local, value);
            }
        }
    }

    let remote_id = remote_id.ok_or(TranslateError::MissingRemoteId { entity })?;
    fields.insert(FIELD_REMOTE_ID.to_string(), Value::from(remote_id.as_str()));
    fields.insert(
        FIELD_SYNC_STATUS.to_string(),
        Value::from(SyncStatus::Synced.as_str()),
    );

    let created_at = local_timestamp(&fields, FIELD_CREATED_AT);
    let updated_at = local_timestamp(&fields, FIELD_UPDATED_AT);

    Ok(LocalFragment {
        fields,
        remote_id,
        origin_local_id,
        created_at,
        updated_at,
    })
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn id_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(id) => id.as_i64(),
        Value::String(id) => id.parse().ok(),
        _ => None,
    }
}

fn local_timestamp(fields: &Map<String, Value>, field: &str) -> Option<NaiveDateTime> {
    fields
        .get(field)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

fn date_to_remote(
    entity: SyncEntity,
    field: &str,
    kind: DateKind,
    value: &Value,
) -> Result<Value, TranslateError> {
    let Some(raw) = value.as_str() else {
        return Ok(value.clone());
    };
    let parsed = parse_date_value(raw).ok_or_else(|| invalid_date(entity, field, raw))?;
    Ok(Value::from(match kind {
        DateKind::Timestamp => parsed.format(REMOTE_TIMESTAMP_FORMAT).to_string(),
        DateKind::Date => parsed.date().format(DATE_FORMAT).to_string(),
    }))
}

fn date_from_remote(
    entity: SyncEntity,
    field: &str,
    kind: DateKind,
    value: &Value,
) -> Result<Value, TranslateError> {
    let raw = match value {
        Value::Null => return Ok(Value::Null),
        Value::String(raw) => raw,
        other => return Err(invalid_date(entity, field, &other.to_string())),
    };
    let parsed = parse_date_value(raw).ok_or_else(|| invalid_date(entity, field, raw))?;
    let local = match kind {
        DateKind::Timestamp => serde_json::to_value(parsed.trunc_subsecs(3)),
        DateKind::Date => serde_json::to_value(parsed.date()),
    };
    local.map_err(|_| invalid_date(entity, field, raw))
}

/// Accepts RFC 3339 (any offset, normalized to UTC), naive ISO-8601
/// timestamps with `T` or space separator, and plain dates.
fn parse_date_value(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(parsed.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn invalid_date(entity: SyncEntity, field: &str, value: &str) -> TranslateError {
    TranslateError::InvalidDate {
        entity,
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn local_transaction() -> LocalRecord {
        LocalRecord::from_fields(
            SyncEntity::Transaction,
            object(json!({
                "id": 12,
                "date": "2026-03-01",
                "description": "WOOLWORTHS 1234",
                "amount": -42.5,
                "categoryId": "r-cat",
                "bankAccount": "Everyday",
                "importBatchId": null,
                "isRecurring": false,
                "tags": [],
                "remoteId": "r-12",
                "syncStatus": "pending",
                "createdAt": "2026-03-01T10:15:00.120",
                "updatedAt": "2026-03-02T08:00:00"
            })),
        )
        .expect("record")
    }

    #[test]
    fn to_remote_renames_columns_and_injects_owner() {
        let row = to_remote(SyncEntity::Transaction, &local_transaction(), "user-1").expect("row");

        assert_eq!(row.get("user_id"), Some(&json!("user-1")));
        assert_eq!(row.get("local_id"), Some(&json!(12)));
        assert_eq!(row.get("category_id"), Some(&json!("r-cat")));
        assert_eq!(row.get("bank_account"), Some(&json!("Everyday")));
        assert_eq!(row.get("is_recurring"), Some(&json!(false)));
        assert_eq!(row.get("amount"), Some(&json!(-42.5)));
        assert_eq!(row.get("description"), Some(&json!("WOOLWORTHS 1234")));
        assert!(!row.contains_key("id"));
        assert!(!row.contains_key("remoteId"));
        assert!(!row.contains_key("syncStatus"));
        assert!(!row.contains_key("categoryId"));
    }

    #[test]
    fn to_remote_formats_dates_and_timestamps() {
        let row = to_remote(SyncEntity::Transaction, &local_transaction(), "user-1").expect("row");

        assert_eq!(row.get("date"), Some(&json!("2026-03-01")));
        assert_eq!(row.get("created_at"), Some(&json!("2026-03-01T10:15:00.120Z")));
        assert_eq!(row.get("updated_at"), Some(&json!("2026-03-02T08:00:00.000Z")));
    }

    #[test]
    fn from_remote_restores_local_shape() {
        let fragment = from_remote(
            SyncEntity::Transaction,
            object(json!({
                "id": "r-12",
                "user_id": "user-1",
                "local_id": 12,
                "date": "2026-03-01",
                "description": "WOOLWORTHS 1234",
                "amount": -42.5,
                "category_id": "r-cat",
                "bank_account": "Everyday",
                "is_recurring": false,
                "tags": ["food"],
                "created_at": "2026-03-01T10:15:00.120+00:00",
                "updated_at": "2026-03-02T18:00:00+10:00"
            })),
        )
        .expect("fragment");

        assert_eq!(fragment.remote_id, "r-12");
        assert_eq!(fragment.origin_local_id, Some(12));
        assert_eq!(fragment.fields.get("remoteId"), Some(&json!("r-12")));
        assert_eq!(fragment.fields.get("syncStatus"), Some(&json!("synced")));
        assert_eq!(fragment.fields.get("categoryId"), Some(&json!("r-cat")));
        assert_eq!(fragment.fields.get("bankAccount"), Some(&json!("Everyday")));
        assert_eq!(fragment.fields.get("date"), Some(&json!("2026-03-01")));
        assert_eq!(
            fragment.fields.get("createdAt"),
            Some(&json!("2026-03-01T10:15:00.120"))
        );
        assert_eq!(
            fragment.fields.get("updatedAt"),
            Some(&json!("2026-03-02T08:00:00"))
        );
        assert!(!fragment.fields.contains_key("id"));
        assert!(!fragment.fields.contains_key("user_id"));
        assert!(!fragment.fields.contains_key("local_id"));
        assert_eq!(
            fragment.lww_timestamp(),
            NaiveDate::from_ymd_opt(2026, 3, 2).and_then(|d| d.and_hms_opt(8, 0, 0))
        );
    }

    #[test]
    fn from_remote_accepts_postgres_timestamp_text() {
        let fragment = from_remote(
            SyncEntity::ImportBatch,
            object(json!({
                "id": 7,
                "filename": "march.csv",
                "date_from": "2026-03-01T00:00:00Z",
                "date_to": "2026-03-31",
                "imported_at": "2026-04-01 09:30:00.5+00",
                "created_at": "2026-04-01T09:30:00Z",
                "updated_at": null
            })),
        )
        .expect("fragment");

        assert_eq!(fragment.remote_id, "7");
        assert_eq!(fragment.origin_local_id, None);
        assert_eq!(fragment.fields.get("dateFrom"), Some(&json!("2026-03-01")));
        assert_eq!(fragment.fields.get("dateTo"), Some(&json!("2026-03-31")));
        assert_eq!(
            fragment.fields.get("importedAt"),
            Some(&json!("2026-04-01T09:30:00.500"))
        );
        assert_eq!(fragment.updated_at, None);
        assert_eq!(fragment.lww_timestamp(), fragment.created_at);
    }

    #[test]
    fn unparseable_dates_are_rejected() {
        let err = from_remote(
            SyncEntity::Goal,
            object(json!({ "id": "g-1", "deadline": "next tuesday" })),
        )
        .expect_err("invalid date");
        assert!(matches!(err, TranslateError::InvalidDate { field, .. } if field == "deadline"));
    }

    #[test]
    fn rows_without_id_are_rejected() {
        let err = from_remote(SyncEntity::Category, object(json!({ "name": "Groceries" })))
            .expect_err("missing id");
        assert_eq!(
            err,
            TranslateError::MissingRemoteId {
                entity: SyncEntity::Category
            }
        );
    }

    #[test]
    fn unmapped_fields_pass_through() {
        assert_eq!(remote_field_name(SyncEntity::Category, "keywords"), "keywords");
        assert_eq!(local_field_name(SyncEntity::Category, "type"), "type");
        assert_eq!(remote_field_name(SyncEntity::Property, "loanType"), "loan_type");
        assert_eq!(local_field_name(SyncEntity::Property, "loan_type"), "loanType");
        assert_eq!(date_kind(SyncEntity::Property, "purchaseDate"), Some(DateKind::Date));
        assert_eq!(date_kind(SyncEntity::Asset, "value"), None);
    }
}
