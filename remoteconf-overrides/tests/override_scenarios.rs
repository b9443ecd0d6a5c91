//! End-to-end scenarios over the pure override rules

use remoteconf_fields::{
    FieldKind, NumberField, Template, TemplateBuilder, TemplateField, TemplateType,
};
use remoteconf_overrides::{
    copy_overrides, resolve, write_field, CellState, EnvironmentOverrides, OverrideRecord,
    OverridesError,
};
use rstest::rstest;
use serde_json::{json, Value};

fn user_template() -> Template {
    TemplateBuilder::new(TemplateType::User)
        .boolean("feature_flag")
        .string("api_url")
        .enumeration("plan", ["free", "premium", "enterprise"])
        .build()
        .unwrap()
}

fn price_template() -> Template {
    TemplateBuilder::new(TemplateType::User)
        .field(TemplateField::new(
            "price",
            FieldKind::Number(NumberField {
                default_value: 10.0,
                min_value: 0.0,
                max_value: 1000.0,
                increment_amount: 0.01,
            }),
        ))
        .build()
        .unwrap()
}

#[test]
fn feature_flag_on_and_back_off() {
    let _ = tracing_subscriber::fmt::try_init();
    let template = user_template();
    let mut prod = EnvironmentOverrides::new("prod", TemplateType::User);

    prod.write(&template, "user-001", "feature_flag", &json!(true))
        .unwrap();
    let resolution = prod.resolve(&template, Some("user-001")).unwrap();
    assert_eq!(resolution.get("feature_flag"), Some(&json!(true)));
    assert_eq!(resolution.applied_identifier.as_deref(), Some("user-001"));

    let state = prod
        .write(&template, "user-001", "feature_flag", &json!(false))
        .unwrap();
    assert_eq!(state, CellState::NoOverride);

    let resolution = prod.resolve(&template, Some("user-001")).unwrap();
    assert_eq!(resolution.get("feature_flag"), Some(&json!(false)));
    assert_eq!(resolution.applied_identifier.as_deref(), Some("user-001"));
    assert!(!prod.record("user-001").unwrap().is_overridden("feature_flag"));
}

#[test]
fn copy_region_into_fresh_target_then_refuse() {
    let source = OverrideRecord::empty(TemplateType::System, "prod", "region-eu")
        .with_value("api_url", json!("https://eu.api.com"));

    let copied = copy_overrides("region-eu", &source, None, "staging", false).unwrap();
    assert_eq!(copied.values.len(), 1);
    assert_eq!(copied.values["api_url"], json!("https://eu.api.com"));

    let existing = OverrideRecord::empty(TemplateType::System, "staging", "region-eu")
        .with_value("api_url", json!("https://staging.api.com"));
    let before = existing.clone();
    let err = copy_overrides("region-eu", &source, Some(&existing), "staging", false).unwrap_err();
    assert!(matches!(err, OverridesError::TargetExists { .. }));
    assert_eq!(existing, before);
}

#[rstest]
#[case(json!(1000), true)]
#[case(json!("1000"), true)]
#[case(json!(0), true)]
#[case(json!(999.99), true)]
#[case(json!("1000.01"), false)]
#[case(json!(-0.01), false)]
fn price_range_is_inclusive(#[case] raw: Value, #[case] accepted: bool) {
    let template = price_template();
    let mut record = OverrideRecord::empty(TemplateType::User, "prod", "user-001");
    let result = write_field(&template, &mut record, "price", &raw);
    assert_eq!(result.is_ok(), accepted, "{raw}");
    if !accepted {
        let err = result.unwrap_err();
        assert_eq!(err.reason().map(|r| r.kind()), Some("DefaultOutOfRange"));
    }
}

#[rstest]
#[case(json!(10.005), "IncrementMisaligned")]
#[case(json!("ten"), "NotANumber")]
#[case(json!("NaN"), "NotANumber")]
#[case(json!(true), "TypeMismatch")]
fn price_rejections(#[case] raw: Value, #[case] kind: &str) {
    let template = price_template();
    let mut record = OverrideRecord::empty(TemplateType::User, "prod", "user-001");
    let err = write_field(&template, &mut record, "price", &raw).unwrap_err();
    assert_eq!(err.reason().map(|r| r.kind()), Some(kind));
    assert!(record.values.is_empty());
}

#[test]
fn defaulting_is_idempotent() {
    let template = user_template();
    let empty = OverrideRecord::empty(TemplateType::User, "prod", "user-007");

    let without = resolve(&template, None, Some("user-007"));
    let with = resolve(&template, Some(&empty), Some("user-007"));
    assert_eq!(without.values, with.values);
    assert_eq!(without.applied_identifier, None);
    assert_eq!(with.applied_identifier.as_deref(), Some("user-007"));
}

#[test]
fn enum_write_must_be_an_option() {
    let template = user_template();
    let mut prod = EnvironmentOverrides::new("prod", TemplateType::User);

    prod.write(&template, "user-001", "plan", &json!("premium"))
        .unwrap();
    let err = prod
        .write(&template, "user-001", "plan", &json!("gold"))
        .unwrap_err();
    assert_eq!(err.reason().map(|r| r.kind()), Some("NotAnOption"));

    let resolution = prod.resolve(&template, Some("user-001")).unwrap();
    assert_eq!(resolution.get("plan"), Some(&json!("premium")));
}

#[test]
fn removed_field_leaves_stale_key_ignored() {
    let template = user_template();
    let mut prod = EnvironmentOverrides::new("prod", TemplateType::User);
    prod.write(&template, "user-001", "api_url", &json!("https://eu.api.com"))
        .unwrap();

    let trimmed = template.without_field("api_url");
    let resolution = prod.resolve(&trimmed, Some("user-001")).unwrap();
    assert!(resolution.get("api_url").is_none());
    assert!(prod.record("user-001").unwrap().is_overridden("api_url"));
}
