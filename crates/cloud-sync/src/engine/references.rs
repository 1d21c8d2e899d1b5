//! Rewrites reference fields between local ids and remote ids.

use std::fmt;

use serde_json::{Map, Value};

use expensehud_core::sync::{LocalSyncStoreTrait, SyncEntity};

use super::RemoteError;
use crate::translator::TranslateError;

/// A reference whose target has no counterpart on the other side yet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UnresolvedReference {
    pub field: &'static str,
    pub target: SyncEntity,
    pub value: Value,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} referenced by '{}' is not resolvable yet",
            self.target, self.value, self.field
        )
    }
}

/// Why a single row could not be processed. The pipelines log it and move on.
#[derive(Debug)]
pub(crate) enum RowError {
    Unresolved(UnresolvedReference),
    Translate(TranslateError),
    Remote(RemoteError),
    Store(expensehud_core::Error),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved(reference) => write!(f, "{}", reference),
            Self::Translate(err) => write!(f, "{}", err),
            Self::Remote(err) => write!(f, "{}", err),
            Self::Store(err) => write!(f, "{}", err),
        }
    }
}

impl From<TranslateError> for RowError {
    fn from(err: TranslateError) -> Self {
        Self::Translate(err)
    }
}

impl From<RemoteError> for RowError {
    fn from(err: RemoteError) -> Self {
        Self::Remote(err)
    }
}

impl From<expensehud_core::Error> for RowError {
    fn from(err: expensehud_core::Error) -> Self {
        Self::Store(err)
    }
}

/// Replaces local ids in reference fields with the referenced rows' remote
/// ids.
pub(crate) fn resolve_outbound(
    store: &dyn LocalSyncStoreTrait,
    entity: SyncEntity,
    fields: &mut Map<String, Value>,
) -> Result<(), RowError> {
    for reference in entity.references() {
        let value = match fields.get(reference.field) {
            None | Some(Value::Null) => continue,
            Some(value) => value.clone(),
        };
        let unresolved = || {
            RowError::Unresolved(UnresolvedReference {
                field: reference.field,
                target: reference.target,
                value: value.clone(),
            })
        };

        let local_id = value.as_i64().ok_or_else(unresolved)?;
        let remote_id = store
            .get_record(reference.target, local_id)?
            .and_then(|target| target.remote_id)
            .ok_or_else(unresolved)?;
        fields.insert(reference.field.to_string(), Value::from(remote_id));
    }
    Ok(())
}

/// Replaces remote ids in reference fields with local ids.
pub(crate) fn resolve_inbound(
    store: &dyn LocalSyncStoreTrait,
    entity: SyncEntity,
    fields: &mut Map<String, Value>,
) -> Result<(), RowError> {
    for reference in entity.references() {
        let value = match fields.get(reference.field) {
            None | Some(Value::Null) => continue,
            Some(value) => value.clone(),
        };
        let unresolved = || {
            RowError::Unresolved(UnresolvedReference {
                field: reference.field,
                target: reference.target,
                value: value.clone(),
            })
        };

        let remote_id = match &value {
            Value::String(id) => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return Err(unresolved()),
        };
        let local_id = store
            .find_by_remote_id(reference.target, &remote_id)?
            .map(|target| target.local_id)
            .ok_or_else(unresolved)?;
        fields.insert(reference.field.to_string(), Value::from(local_id));
    }
    Ok(())
}
