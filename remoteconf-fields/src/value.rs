//! Field values: defaults, coercion of raw input, and typed comparison.
//!
//! Raw values arrive as JSON, often as strings from a form input. They are
//! coerced to the field's native representation before validation so that
//! `"10"`, `10` and `10.0` all mean the same thing to a Number field.

use serde_json::Value;

use crate::error::ConstraintError;
use crate::types::{FieldKind, TemplateField};
use crate::validation::{check_length, check_number};

/// The field's default, or `None` when it has none (or its type is unknown).
pub fn get_default_value(field: &TemplateField) -> Option<Value> {
    match &field.kind {
        FieldKind::String(s) => s.default_value.clone().map(Value::String),
        FieldKind::Number(n) => Some(Value::from(n.default_value)),
        FieldKind::Boolean(b) => Some(Value::Bool(b.default_value)),
        FieldKind::Enum(e) => e.default_value.clone().map(Value::String),
        FieldKind::Unknown { .. } => None,
    }
}

/// Whether a raw value means "no value".
///
/// `null` and `""` are empty for every field. Whitespace-only strings are
/// also empty for non-String fields.
pub fn is_empty_value(field: &TemplateField, raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) if s.is_empty() => true,
        Value::String(s) => !matches!(field.kind, FieldKind::String(_)) && s.trim().is_empty(),
        _ => false,
    }
}

/// Convert raw input to the field's native JSON representation.
///
/// Returns `Ok(None)` for empty input. Number strings must parse to a
/// finite number; Boolean strings are `true` only when they equal `"true"`
/// ignoring ASCII case.
pub fn coerce_value(field: &TemplateField, raw: &Value) -> Result<Option<Value>, ConstraintError> {
    if is_empty_value(field, raw) {
        return Ok(None);
    }

    let typed = match (&field.kind, raw) {
        (FieldKind::Number(_), Value::Number(n)) => {
            let number = n
                .as_f64()
                .filter(|f| f.is_finite())
                .ok_or_else(|| ConstraintError::NotANumber {
                    input: n.to_string(),
                })?;
            Value::from(number)
        }
        (FieldKind::Number(_), Value::String(s)) => {
            let number = s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| ConstraintError::NotANumber { input: s.clone() })?;
            Value::from(number)
        }
        (FieldKind::Boolean(_), Value::Bool(b)) => Value::Bool(*b),
        (FieldKind::Boolean(_), Value::String(s)) => {
            Value::Bool(s.trim().eq_ignore_ascii_case("true"))
        }
        (FieldKind::String(_) | FieldKind::Enum(_), Value::String(s)) => Value::String(s.clone()),
        (FieldKind::String(_) | FieldKind::Enum(_), Value::Number(n)) => {
            Value::String(n.to_string())
        }
        (FieldKind::String(_) | FieldKind::Enum(_), Value::Bool(b)) => {
            Value::String(b.to_string())
        }
        (kind, other) => {
            return Err(ConstraintError::type_mismatch(&expected_for(kind), other));
        }
    };
    Ok(Some(typed))
}

/// Check an already-coerced value against the field's constraints.
pub fn validate_value(field: &TemplateField, value: &Value) -> Result<(), ConstraintError> {
    match (&field.kind, value) {
        (FieldKind::String(s), Value::String(v)) => check_length(v, s.min_length, s.max_length),
        (FieldKind::Number(n), Value::Number(v)) => {
            let number = v.as_f64().ok_or_else(|| ConstraintError::NotANumber {
                input: v.to_string(),
            })?;
            check_number(number, n.min_value, n.max_value, n.increment_amount)
        }
        (FieldKind::Boolean(_), Value::Bool(_)) => Ok(()),
        (FieldKind::Enum(e), Value::String(v)) => {
            if e.options.iter().any(|o| o == v) {
                Ok(())
            } else {
                Err(ConstraintError::NotAnOption { value: v.clone() })
            }
        }
        (kind, other) => Err(ConstraintError::type_mismatch(&expected_for(kind), other)),
    }
}

/// Coerce then validate. `Ok(None)` means the input was empty.
pub fn prepare_value(field: &TemplateField, raw: &Value) -> Result<Option<Value>, ConstraintError> {
    let Some(value) = coerce_value(field, raw)? else {
        return Ok(None);
    };
    validate_value(field, &value)?;
    Ok(Some(value))
}

/// Field-typed equality: numbers compare as `f64`, everything else structurally.
pub fn values_equal(field: &TemplateField, a: &Value, b: &Value) -> bool {
    match (&field.kind, a, b) {
        (FieldKind::Number(_), Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Whether `value` equals the field's default. A field without a default
/// matches nothing.
pub fn is_default_value(field: &TemplateField, value: &Value) -> bool {
    get_default_value(field).is_some_and(|default| values_equal(field, value, &default))
}

fn expected_for(kind: &FieldKind) -> String {
    match kind {
        FieldKind::String(_) => "string".into(),
        FieldKind::Number(_) => "number".into(),
        FieldKind::Boolean(_) => "boolean".into(),
        FieldKind::Enum(_) => "one of the enum options".into(),
        FieldKind::Unknown { .. } => "a known field type".into(),
    }
}
