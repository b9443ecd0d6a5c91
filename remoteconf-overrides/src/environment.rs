//! The override records of one environment and template type.

use std::collections::BTreeMap;

use remoteconf_fields::{Template, TemplateType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::copy::copy_overrides;
use crate::error::{OverridesError, Result};
use crate::record::OverrideRecord;
use crate::resolve::{resolve, Resolution};
use crate::write::{write_field, CellState};

/// In-memory override set for one `(environment, template type)` pair.
///
/// Records are keyed by identifier. A record exists from the moment its
/// identifier is registered or first written, and only `delete_identifier`
/// removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentOverrides {
    pub environment_id: String,
    pub template_type: TemplateType,
    #[serde(default)]
    records: BTreeMap<String, OverrideRecord>,
}

impl EnvironmentOverrides {
    pub fn new(environment_id: impl Into<String>, template_type: TemplateType) -> Self {
        Self {
            environment_id: environment_id.into(),
            template_type,
            records: BTreeMap::new(),
        }
    }

    /// Build a set from existing records, skipping any that belong elsewhere.
    pub fn from_records(
        environment_id: impl Into<String>,
        template_type: TemplateType,
        records: impl IntoIterator<Item = OverrideRecord>,
    ) -> Self {
        let mut set = Self::new(environment_id, template_type);
        for record in records {
            if record.environment_id == set.environment_id
                && record.template_type == set.template_type
            {
                set.records.insert(record.identifier.clone(), record);
            } else {
                debug!(record = %record.key(), "skipping record from another set");
            }
        }
        set
    }

    /// Register `identifier` with no overrides. Existing records are kept.
    pub fn register_identifier(&mut self, identifier: &str) -> Result<&OverrideRecord> {
        if identifier.is_empty() {
            return Err(OverridesError::EmptyIdentifier);
        }
        let environment_id = &self.environment_id;
        let template_type = self.template_type;
        Ok(self
            .records
            .entry(identifier.to_string())
            .or_insert_with(|| {
                OverrideRecord::empty(template_type, environment_id.clone(), identifier)
            }))
    }

    pub fn record(&self, identifier: &str) -> Option<&OverrideRecord> {
        self.records.get(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &OverrideRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write one cell. The identifier's record is created on first write;
    /// a failed write leaves the set exactly as it was.
    pub fn write(
        &mut self,
        template: &Template,
        identifier: &str,
        key: &str,
        raw: &Value,
    ) -> Result<CellState> {
        self.check_template(template)?;
        if identifier.is_empty() {
            return Err(OverridesError::EmptyIdentifier);
        }

        let mut record = self.records.get(identifier).cloned().unwrap_or_else(|| {
            OverrideRecord::empty(self.template_type, self.environment_id.clone(), identifier)
        });
        let state = write_field(template, &mut record, key, raw)?;
        self.records.insert(identifier.to_string(), record);
        Ok(state)
    }

    /// Effective values for `identifier`, or pure defaults when it has no record.
    pub fn resolve(&self, template: &Template, identifier: Option<&str>) -> Result<Resolution> {
        self.check_template(template)?;
        let record = identifier.and_then(|id| self.records.get(id));
        Ok(resolve(template, record, identifier))
    }

    /// Drop the record for `identifier`.
    pub fn delete_identifier(&mut self, identifier: &str) -> Result<OverrideRecord> {
        let removed =
            self.records
                .remove(identifier)
                .ok_or_else(|| OverridesError::IdentifierNotFound {
                    identifier: identifier.to_string(),
                })?;
        info!(
            environment = %self.environment_id,
            template_type = %self.template_type,
            identifier,
            "identifier deleted"
        );
        Ok(removed)
    }

    /// Copy `identifier`'s record from this set into `target`.
    pub fn copy_identifier_into(
        &self,
        identifier: &str,
        target: &mut EnvironmentOverrides,
        overwrite: bool,
    ) -> Result<&OverrideRecord> {
        if target.template_type != self.template_type {
            return Err(OverridesError::TemplateTypeMismatch {
                expected: self.template_type,
                found: target.template_type,
            });
        }
        let source =
            self.records
                .get(identifier)
                .ok_or_else(|| OverridesError::IdentifierNotFound {
                    identifier: identifier.to_string(),
                })?;
        let copied = copy_overrides(
            identifier,
            source,
            target.records.get(identifier),
            &target.environment_id,
            overwrite,
        )?;
        target.records.insert(identifier.to_string(), copied);
        Ok(source)
    }

    fn check_template(&self, template: &Template) -> Result<()> {
        if template.template_type != self.template_type {
            return Err(OverridesError::TemplateTypeMismatch {
                expected: self.template_type,
                found: template.template_type,
            });
        }
        Ok(())
    }
}
