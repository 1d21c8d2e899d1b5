//! Column conversions shared by the table models.

use std::str::FromStr;

use rust_decimal::Decimal;

use expensehud_core::errors::{Result, ValidationError};
use expensehud_core::sync::SyncStatus;

/// Stores a unit-variant enum as its serde name.
pub(crate) fn enum_to_db<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}

pub(crate) fn enum_from_db<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_str(&format!("\"{}\"", value))?)
}

pub(crate) fn decimal_to_db(value: &Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) fn decimal_from_db(field: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|_| {
        ValidationError::InvalidDecimal {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

pub(crate) fn optional_decimal_from_db(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Decimal>> {
    value.map(|v| decimal_from_db(field, v)).transpose()
}

/// String lists are stored as a JSON array.
pub(crate) fn list_to_db(values: &[String]) -> Result<String> {
    Ok(serde_json::to_string(values)?)
}

pub(crate) fn list_from_db(value: &str) -> Result<Vec<String>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(value)?)
}

pub(crate) fn status_from_db(value: &str) -> Result<SyncStatus> {
    SyncStatus::parse(value)
}
