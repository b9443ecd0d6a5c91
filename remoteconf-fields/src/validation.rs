//! Constraint validation for field definitions.
//!
//! Each validator is a pure function returning the first violation it finds.
//! [`validate_field`] combines key and variant checks and attaches the field
//! key to the failure.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConstraintError, FieldsError, Result};
use crate::types::{EnumField, FieldKind, NumberField, StringField, TemplateField};

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("invalid key pattern"));

/// Relative tolerance applied to increment alignment checks.
pub const INCREMENT_TOLERANCE: f64 = 1e-9;

/// Check a field key is an identifier not already used in the template.
pub fn validate_key<S: AsRef<str>>(
    key: &str,
    existing_keys: &[S],
) -> std::result::Result<(), ConstraintError> {
    if key.is_empty() || !KEY_PATTERN.is_match(key) {
        return Err(ConstraintError::InvalidKey {
            key: key.to_string(),
        });
    }
    if existing_keys.iter().any(|k| k.as_ref() == key) {
        return Err(ConstraintError::DuplicateKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Check a String field's length window and, if given, that the default fits it.
pub fn validate_string_constraints(
    min_length: i64,
    max_length: i64,
    default_value: Option<&str>,
) -> std::result::Result<(), ConstraintError> {
    if min_length < 0 {
        return Err(ConstraintError::NegativeMinLength { min_length });
    }
    if max_length <= 0 {
        return Err(ConstraintError::NonPositiveMaxLength { max_length });
    }
    if min_length > max_length {
        return Err(ConstraintError::MinExceedsMax {
            min: min_length as f64,
            max: max_length as f64,
        });
    }
    if let Some(value) = default_value {
        check_length(value, min_length, max_length)?;
    }
    Ok(())
}

/// Check a Number field's range and increment and, if given, the default against both.
pub fn validate_number_constraints(
    min_value: f64,
    max_value: f64,
    increment: f64,
    default_value: Option<f64>,
) -> std::result::Result<(), ConstraintError> {
    for bound in [min_value, max_value, increment] {
        if !bound.is_finite() {
            return Err(ConstraintError::NotANumber {
                input: bound.to_string(),
            });
        }
    }
    if min_value > max_value {
        return Err(ConstraintError::MinExceedsMax {
            min: min_value,
            max: max_value,
        });
    }
    if increment <= 0.0 {
        return Err(ConstraintError::NonPositiveIncrement { increment });
    }
    if let Some(value) = default_value {
        check_number(value, min_value, max_value, increment)?;
    }
    Ok(())
}

/// Check an Enum field has at least one option, none blank and none repeated.
pub fn validate_enum_options<S: AsRef<str>>(
    options: &[S],
) -> std::result::Result<(), ConstraintError> {
    if options.is_empty() {
        return Err(ConstraintError::EmptyOptions);
    }
    if let Some(index) = options.iter().position(|o| o.as_ref().trim().is_empty()) {
        return Err(ConstraintError::BlankOption { index });
    }
    for (index, option) in options.iter().enumerate().skip(1) {
        let option = option.as_ref();
        if options[..index].iter().any(|o| o.as_ref() == option) {
            return Err(ConstraintError::DuplicateOption {
                value: option.to_string(),
                index,
            });
        }
    }
    Ok(())
}

/// Check an Enum default, when set, is one of the options.
pub fn validate_enum_default<S: AsRef<str>>(
    options: &[S],
    default_value: Option<&str>,
) -> std::result::Result<(), ConstraintError> {
    match default_value {
        Some(value) if !options.iter().any(|o| o.as_ref() == value) => {
            Err(ConstraintError::NotAnOption {
                value: value.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Whether `value` is reachable from `min_value` in whole steps of `increment`.
///
/// The remainder is compared against both 0 and `increment` within
/// `increment * 1e-9`, so `0.3` is aligned to a step of `0.1`.
pub fn is_increment_aligned(value: f64, min_value: f64, increment: f64) -> bool {
    let remainder = (value - min_value) % increment;
    let tolerance = increment * INCREMENT_TOLERANCE;
    remainder.abs() < tolerance || (increment - remainder.abs()).abs() < tolerance
}

/// Validate a complete field definition against the keys already in its template.
pub fn validate_field<S: AsRef<str>>(field: &TemplateField, existing_keys: &[S]) -> Result<()> {
    validate_key(&field.key, existing_keys)
        .and_then(|_| validate_kind(&field.kind))
        .map_err(|source| FieldsError::invalid_field(&field.key, source))
}

/// Validate the constraints carried by a field variant.
pub fn validate_kind(kind: &FieldKind) -> std::result::Result<(), ConstraintError> {
    match kind {
        FieldKind::String(StringField {
            default_value,
            min_length,
            max_length,
        }) => validate_string_constraints(*min_length, *max_length, default_value.as_deref()),
        FieldKind::Number(NumberField {
            default_value,
            min_value,
            max_value,
            increment_amount,
        }) => validate_number_constraints(
            *min_value,
            *max_value,
            *increment_amount,
            Some(*default_value),
        ),
        FieldKind::Boolean(_) => Ok(()),
        FieldKind::Enum(EnumField {
            default_value,
            options,
        }) => {
            validate_enum_options(options)?;
            validate_enum_default(options, default_value.as_deref())
        }
        FieldKind::Unknown { .. } => Ok(()),
    }
}

pub(crate) fn check_length(
    value: &str,
    min_length: i64,
    max_length: i64,
) -> std::result::Result<(), ConstraintError> {
    let length = value.chars().count();
    if (length as i64) < min_length {
        return Err(ConstraintError::DefaultTooShort { length, min_length });
    }
    if (length as i64) > max_length {
        return Err(ConstraintError::DefaultTooLong { length, max_length });
    }
    Ok(())
}

pub(crate) fn check_number(
    value: f64,
    min_value: f64,
    max_value: f64,
    increment: f64,
) -> std::result::Result<(), ConstraintError> {
    if !value.is_finite() {
        return Err(ConstraintError::NotANumber {
            input: value.to_string(),
        });
    }
    if value < min_value || value > max_value {
        return Err(ConstraintError::DefaultOutOfRange {
            value,
            min: min_value,
            max: max_value,
        });
    }
    if !is_increment_aligned(value, min_value, increment) {
        return Err(ConstraintError::IncrementMisaligned {
            value,
            min: min_value,
            increment,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BooleanField;
    use rstest::rstest;

    const NO_KEYS: &[&str] = &[];

    #[rstest]
    #[case("feature_flag")]
    #[case("A")]
    #[case("apiUrl2")]
    #[case("x_1_y")]
    fn valid_keys(#[case] key: &str) {
        assert_eq!(validate_key(key, NO_KEYS), Ok(()));
    }

    #[rstest]
    #[case("")]
    #[case("1abc")]
    #[case("_private")]
    #[case("api-url")]
    #[case("has space")]
    #[case("ünicode")]
    fn invalid_keys(#[case] key: &str) {
        assert_eq!(
            validate_key(key, NO_KEYS),
            Err(ConstraintError::InvalidKey { key: key.into() })
        );
    }

    #[test]
    fn duplicate_key() {
        let existing = vec!["api_url".to_string(), "region".to_string()];
        assert_eq!(
            validate_key("region", &existing),
            Err(ConstraintError::DuplicateKey {
                key: "region".into()
            })
        );
        assert_eq!(validate_key("timeout", &existing), Ok(()));
    }

    #[test]
    fn string_constraint_order() {
        assert_eq!(
            validate_string_constraints(-1, 0, None),
            Err(ConstraintError::NegativeMinLength { min_length: -1 })
        );
        assert_eq!(
            validate_string_constraints(0, 0, None),
            Err(ConstraintError::NonPositiveMaxLength { max_length: 0 })
        );
        assert_eq!(
            validate_string_constraints(5, 3, None),
            Err(ConstraintError::MinExceedsMax { min: 5.0, max: 3.0 })
        );
        assert_eq!(validate_string_constraints(3, 3, Some("abc")), Ok(()));
    }

    #[test]
    fn string_default_length() {
        assert_eq!(
            validate_string_constraints(3, 20, Some("ab")),
            Err(ConstraintError::DefaultTooShort {
                length: 2,
                min_length: 3
            })
        );
        assert_eq!(
            validate_string_constraints(0, 4, Some("hello")),
            Err(ConstraintError::DefaultTooLong {
                length: 5,
                max_length: 4
            })
        );
        // counted in characters, not bytes
        assert_eq!(validate_string_constraints(0, 4, Some("café")), Ok(()));
    }

    #[test]
    fn number_constraint_order() {
        assert_eq!(
            validate_number_constraints(10.0, 1.0, 0.0, None),
            Err(ConstraintError::MinExceedsMax {
                min: 10.0,
                max: 1.0
            })
        );
        assert_eq!(
            validate_number_constraints(0.0, 1.0, 0.0, None),
            Err(ConstraintError::NonPositiveIncrement { increment: 0.0 })
        );
        assert_eq!(
            validate_number_constraints(0.0, 1.0, -0.5, None),
            Err(ConstraintError::NonPositiveIncrement { increment: -0.5 })
        );
        assert_eq!(validate_number_constraints(5.0, 5.0, 1.0, Some(5.0)), Ok(()));
    }

    #[test]
    fn number_bounds_must_be_finite() {
        assert!(matches!(
            validate_number_constraints(f64::NAN, 1.0, 1.0, None),
            Err(ConstraintError::NotANumber { .. })
        ));
    }

    #[rstest]
    #[case(10.00, None)]
    #[case(100.00, None)]
    #[case(0.0, None)]
    #[case(0.3, None)]
    #[case(99.99, None)]
    #[case(10.005, Some("IncrementMisaligned"))]
    #[case(100.01, Some("DefaultOutOfRange"))]
    #[case(-0.01, Some("DefaultOutOfRange"))]
    fn increment_alignment_boundary(#[case] value: f64, #[case] expected: Option<&str>) {
        let result = validate_number_constraints(0.0, 100.0, 0.01, Some(value));
        assert_eq!(result.err().map(|e| e.kind()), expected, "value {value}");
    }

    #[test]
    fn alignment_tolerates_binary_rounding() {
        assert!(is_increment_aligned(0.1 + 0.2, 0.0, 0.1));
        assert!(is_increment_aligned(0.3, 0.0, 0.1));
        assert!(is_increment_aligned(1000.0, 0.0, 0.01));
        assert!(is_increment_aligned(7.0, 1.0, 2.0));
        assert!(!is_increment_aligned(6.0, 1.0, 2.0));
        assert!(!is_increment_aligned(0.15, 0.0, 0.1));
    }

    #[test]
    fn enum_options() {
        let none: Vec<String> = Vec::new();
        assert_eq!(validate_enum_options(&none), Err(ConstraintError::EmptyOptions));
        assert_eq!(
            validate_enum_options(&["free", "  ", "premium"]),
            Err(ConstraintError::BlankOption { index: 1 })
        );
        assert_eq!(validate_enum_options(&["free", "premium", "enterprise"]), Ok(()));
    }

    #[rstest]
    #[case(vec!["free", "free"], "free", 1)]
    #[case(vec!["free", "free", "premium"], "free", 1)]
    #[case(vec!["free", "premium", "enterprise", "premium"], "premium", 3)]
    fn enum_options_must_be_unique(
        #[case] options: Vec<&str>,
        #[case] value: &str,
        #[case] index: usize,
    ) {
        assert_eq!(
            validate_enum_options(&options),
            Err(ConstraintError::DuplicateOption {
                value: value.into(),
                index
            })
        );
    }

    #[test]
    fn enum_options_compare_exactly() {
        assert_eq!(validate_enum_options(&["free", "Free", "free "]), Ok(()));
    }

    #[test]
    fn enum_default_membership() {
        let options = ["free", "premium", "enterprise"];
        assert_eq!(validate_enum_default(&options, Some("free")), Ok(()));
        assert_eq!(validate_enum_default(&options, None), Ok(()));
        assert_eq!(
            validate_enum_default(&options, Some("gold")),
            Err(ConstraintError::NotAnOption {
                value: "gold".into()
            })
        );
    }

    #[test]
    fn validate_field_attaches_key() {
        let field = TemplateField::new(
            "plan",
            FieldKind::Enum(EnumField {
                default_value: Some("gold".into()),
                options: vec!["free".into(), "premium".into(), "enterprise".into()],
            }),
        );
        let err = validate_field(&field, NO_KEYS).unwrap_err();
        match err {
            FieldsError::InvalidField { key, source } => {
                assert_eq!(key, "plan");
                assert_eq!(source.kind(), "NotAnOption");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_field_accepts_boolean_and_unknown() {
        let flag = TemplateField::new("beta", FieldKind::Boolean(BooleanField::default()));
        assert!(validate_field(&flag, NO_KEYS).is_ok());
        let unknown = TemplateField::new("later", FieldKind::unknown("DateTime"));
        assert!(validate_field(&unknown, NO_KEYS).is_ok());
    }
}
