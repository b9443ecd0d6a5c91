//! Cross-environment copy of one identifier's overrides.

use tracing::debug;

use crate::error::{OverridesError, Result};
use crate::record::OverrideRecord;

/// Build the target record for copying `source` into `target_environment`.
///
/// The copy is a snapshot: the returned record holds exactly the source's
/// values, whatever `target` held before. When `target` exists and
/// `overwrite` is false the copy is refused with `TargetExists`.
///
/// This only computes the new record. Persisting it is up to the caller.
pub fn copy_overrides(
    identifier: &str,
    source: &OverrideRecord,
    target: Option<&OverrideRecord>,
    target_environment: &str,
    overwrite: bool,
) -> Result<OverrideRecord> {
    if identifier.is_empty() {
        return Err(OverridesError::EmptyIdentifier);
    }
    if source.identifier != identifier {
        return Err(OverridesError::IdentifierNotFound {
            identifier: identifier.to_string(),
        });
    }
    if let Some(target) = target {
        if target.template_type != source.template_type {
            return Err(OverridesError::TemplateTypeMismatch {
                expected: source.template_type,
                found: target.template_type,
            });
        }
        if !overwrite {
            return Err(OverridesError::TargetExists {
                identifier: identifier.to_string(),
                template_type: source.template_type,
                environment_id: target_environment.to_string(),
            });
        }
    }

    debug!(
        identifier,
        template_type = %source.template_type,
        from = %source.environment_id,
        to = target_environment,
        values = source.values.len(),
        replaced = target.is_some(),
        "copying overrides"
    );

    Ok(OverrideRecord {
        template_type: source.template_type,
        environment_id: target_environment.to_string(),
        identifier: identifier.to_string(),
        values: source.values.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use remoteconf_fields::TemplateType;
    use serde_json::json;

    fn source() -> OverrideRecord {
        OverrideRecord::empty(TemplateType::System, "prod", "region-eu")
            .with_value("api_url", json!("https://eu.api.com"))
    }

    #[test]
    fn copies_into_empty_target() {
        let copied = copy_overrides("region-eu", &source(), None, "staging", false).unwrap();
        assert_eq!(copied.environment_id, "staging");
        assert_eq!(copied.identifier, "region-eu");
        assert_eq!(copied.template_type, TemplateType::System);
        assert_eq!(copied.values, source().values);
    }

    #[test]
    fn existing_target_without_overwrite_is_refused() {
        let target = OverrideRecord::empty(TemplateType::System, "staging", "region-eu")
            .with_value("timeout", json!(30));
        let err = copy_overrides("region-eu", &source(), Some(&target), "staging", false)
            .unwrap_err();
        assert_eq!(err.kind(), "TargetExists");
    }

    #[test]
    fn existing_empty_target_still_counts() {
        let target = OverrideRecord::empty(TemplateType::System, "staging", "region-eu");
        let err = copy_overrides("region-eu", &source(), Some(&target), "staging", false)
            .unwrap_err();
        assert_eq!(err.kind(), "TargetExists");
    }

    #[test]
    fn overwrite_replaces_wholesale() {
        let target = OverrideRecord::empty(TemplateType::System, "staging", "region-eu")
            .with_value("timeout", json!(30))
            .with_value("api_url", json!("https://old.api.com"));
        let copied =
            copy_overrides("region-eu", &source(), Some(&target), "staging", true).unwrap();
        assert_eq!(copied.values.len(), 1);
        assert!(!copied.is_overridden("timeout"));
        assert_eq!(copied.values["api_url"], json!("https://eu.api.com"));
    }

    #[test]
    fn empty_source_copies_registration() {
        let source = OverrideRecord::empty(TemplateType::User, "prod", "user-001");
        let copied = copy_overrides("user-001", &source, None, "staging", false).unwrap();
        assert!(copied.values.is_empty());
    }

    #[test]
    fn identifier_must_match_source() {
        let err = copy_overrides("region-us", &source(), None, "staging", false).unwrap_err();
        assert_eq!(err.kind(), "IdentifierNotFound");
        let err = copy_overrides("", &source(), None, "staging", false).unwrap_err();
        assert_eq!(err, OverridesError::EmptyIdentifier);
    }
}
