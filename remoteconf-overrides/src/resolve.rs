//! Resolution of effective values: template defaults merged with one
//! identifier's overrides.

use indexmap::IndexMap;
use remoteconf_fields::{get_default_value, Template};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::record::OverrideRecord;

/// The effective value set for one identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Every template key, in template order. Fields without a default and
    /// without an override resolve to `null`.
    pub values: IndexMap<String, Value>,
    /// The identifier whose record was applied, or `None` for pure defaults.
    pub applied_identifier: Option<String>,
}

impl Resolution {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_applied(&self) -> bool {
        self.applied_identifier.is_some()
    }
}

/// Treat a missing or empty identifier as "no identifier".
pub fn normalize_identifier(identifier: Option<&str>) -> Option<&str> {
    identifier.filter(|id| !id.is_empty())
}

/// Merge `template` defaults with `record`.
///
/// The record is applied only when it belongs to `identifier` and to the
/// template's type. An applied record with no keys still sets
/// `applied_identifier`; it is the record's presence that counts, not its
/// contents. Override keys the template no longer declares are ignored.
pub fn resolve(
    template: &Template,
    record: Option<&OverrideRecord>,
    identifier: Option<&str>,
) -> Resolution {
    let identifier = normalize_identifier(identifier);
    let applied = match (identifier, record) {
        (Some(id), Some(record))
            if record.identifier == id && record.template_type == template.template_type =>
        {
            Some(record)
        }
        (Some(id), Some(record)) => {
            debug!(
                requested = %id,
                record = %record.key(),
                "override record does not match request, using defaults"
            );
            None
        }
        _ => None,
    };

    let values = template
        .schema
        .iter()
        .map(|field| {
            let value = applied
                .and_then(|r| r.values.get(&field.key).cloned())
                .or_else(|| get_default_value(field))
                .unwrap_or(Value::Null);
            (field.key.clone(), value)
        })
        .collect();

    Resolution {
        values,
        applied_identifier: applied.map(|r| r.identifier.clone()),
    }
}
