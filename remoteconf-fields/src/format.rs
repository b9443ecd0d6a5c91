//! Short human-readable constraint summaries for display next to a field.

use crate::types::{FieldKind, TemplateField};

/// Summarize a field's constraints, e.g. `"min 3, max 20 chars"` or `"0–100, step 0.01"`.
pub fn format_constraints(field: &TemplateField) -> String {
    match &field.kind {
        FieldKind::String(s) => format!("min {}, max {} chars", s.min_length, s.max_length),
        FieldKind::Number(n) => format!(
            "{}–{}, step {}",
            n.min_value, n.max_value, n.increment_amount
        ),
        FieldKind::Boolean(_) => "true or false".to_string(),
        FieldKind::Enum(e) => e.options.join(", "),
        FieldKind::Unknown { .. } => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BooleanField, EnumField, NumberField, StringField};

    #[test]
    fn string_summary() {
        let field = TemplateField::new(
            "username",
            FieldKind::String(StringField {
                default_value: None,
                min_length: 3,
                max_length: 20,
            }),
        );
        assert_eq!(format_constraints(&field), "min 3, max 20 chars");
    }

    #[test]
    fn number_summary_drops_trailing_zeros() {
        let field = TemplateField::new(
            "price",
            FieldKind::Number(NumberField {
                default_value: 0.0,
                min_value: 0.0,
                max_value: 100.0,
                increment_amount: 0.01,
            }),
        );
        assert_eq!(format_constraints(&field), "0–100, step 0.01");
    }

    #[test]
    fn enum_and_boolean_summary() {
        let plan = TemplateField::new(
            "plan",
            FieldKind::Enum(EnumField {
                default_value: None,
                options: vec!["free".into(), "premium".into(), "enterprise".into()],
            }),
        );
        assert_eq!(format_constraints(&plan), "free, premium, enterprise");

        let flag = TemplateField::new("beta", FieldKind::Boolean(BooleanField::default()));
        assert_eq!(format_constraints(&flag), "true or false");
        assert_eq!(
            format_constraints(&TemplateField::new("later", FieldKind::unknown("DateTime"))),
            ""
        );
    }
}
