//! Override records: the sparse per-identifier value maps.
//!
//! Three states must stay distinct:
//!
//! - no record: the identifier is unknown in this environment
//! - a record with an empty value map: the identifier is registered but
//!   every field uses its default
//! - a record with values: only non-default keys are present

use std::collections::BTreeMap;

use remoteconf_fields::TemplateType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field key → raw value, holding only keys that differ from the default.
pub type OverrideValues = BTreeMap<String, Value>;

/// Identity of an override record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideKey {
    pub environment_id: String,
    pub template_type: TemplateType,
    pub identifier: String,
}

impl OverrideKey {
    pub fn new(
        environment_id: impl Into<String>,
        template_type: TemplateType,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            template_type,
            identifier: identifier.into(),
        }
    }
}

impl std::fmt::Display for OverrideKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.environment_id, self.template_type, self.identifier
        )
    }
}

/// The overrides of one identifier, for one template type, in one environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRecord {
    pub template_type: TemplateType,
    pub environment_id: String,
    pub identifier: String,
    #[serde(default)]
    pub values: OverrideValues,
}

impl OverrideRecord {
    /// A registered identifier with no overridden fields.
    pub fn empty(
        template_type: TemplateType,
        environment_id: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            template_type,
            environment_id: environment_id.into(),
            identifier: identifier.into(),
            values: OverrideValues::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn key(&self) -> OverrideKey {
        OverrideKey::new(
            self.environment_id.clone(),
            self.template_type,
            self.identifier.clone(),
        )
    }

    /// Whether `key` is overridden.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}
