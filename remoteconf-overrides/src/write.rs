//! The per-cell write rule.
//!
//! A cell is one (identifier, field) pair. A write validates the new value
//! first and only then touches the record:
//!
//! - invalid value: `ValidationFailed`, record unchanged
//! - empty value, or a value equal to the field default: the key is removed
//! - anything else: the key is set to the coerced value
//!
//! Removing the last key never removes the record. Deleting an identifier
//! is a separate, explicit operation.

use remoteconf_common::Pretty;
use remoteconf_fields::{is_default_value, prepare_value, Template, TemplateField};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{OverridesError, Result};
use crate::record::OverrideRecord;

/// State of a cell after a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value")]
pub enum CellState {
    /// The key is absent; the field resolves to its default.
    NoOverride,
    /// The key holds this coerced value.
    Overridden(Value),
}

impl CellState {
    pub fn is_overridden(&self) -> bool {
        matches!(self, CellState::Overridden(_))
    }
}

/// Apply a raw value to one field of `record`.
pub fn write_cell(
    field: &TemplateField,
    record: &mut OverrideRecord,
    raw: &Value,
) -> Result<CellState> {
    let prepared = prepare_value(field, raw)
        .map_err(|reason| OverridesError::validation_failed(&field.key, reason))?;

    match prepared {
        Some(value) if !is_default_value(field, &value) => {
            debug!(
                identifier = %record.identifier,
                field = %field.key,
                "override set: {}",
                Pretty(&value)
            );
            record.values.insert(field.key.clone(), value.clone());
            Ok(CellState::Overridden(value))
        }
        _ => {
            if record.values.remove(&field.key).is_some() {
                debug!(
                    identifier = %record.identifier,
                    field = %field.key,
                    remaining = record.values.len(),
                    "override cleared"
                );
            }
            Ok(CellState::NoOverride)
        }
    }
}

/// Look up `key` in `template` and apply a raw value to it.
pub fn write_field(
    template: &Template,
    record: &mut OverrideRecord,
    key: &str,
    raw: &Value,
) -> Result<CellState> {
    let field = template
        .field(key)
        .ok_or_else(|| OverridesError::UnknownField {
            key: key.to_string(),
        })?;
    write_cell(field, record, raw)
}

/// Drop the override for `key`, leaving the record registered.
pub fn clear_cell(record: &mut OverrideRecord, key: &str) -> CellState {
    record.values.remove(key);
    CellState::NoOverride
}
