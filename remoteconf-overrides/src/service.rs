//! Override operations over an [`OverrideStore`].
//!
//! The service loads what it needs, runs the pure rules from this crate
//! and persists the result. Validation always happens before the store is
//! written, so a rejected value never reaches persistence.

use remoteconf_common::{ErrorSeverity, Pretty, Severity};
use remoteconf_fields::{Template, TemplateType};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::copy::copy_overrides;
use crate::error::{OverridesError, Result};
use crate::record::{OverrideKey, OverrideRecord};
use crate::resolve::{normalize_identifier, resolve, Resolution};
use crate::store::OverrideStore;
use crate::write::{write_field, CellState};

/// Override operations for one application, backed by `S`.
pub struct OverrideService<S> {
    store: S,
}

impl<S: OverrideStore> OverrideService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Load a template, failing if the environment has none of this type.
    pub async fn template(
        &self,
        environment_id: &str,
        template_type: TemplateType,
    ) -> Result<Template> {
        self.store
            .load_template(environment_id, template_type)
            .await?
            .ok_or_else(|| OverridesError::TemplateNotFound {
                environment_id: environment_id.to_string(),
                template_type,
            })
    }

    /// Validate and persist one cell write.
    ///
    /// The identifier's record is saved even when the write leaves it with
    /// no keys. A default or empty write to an identifier with no record
    /// therefore registers it with an empty map.
    pub async fn write_cell(
        &self,
        environment_id: &str,
        template_type: TemplateType,
        identifier: &str,
        key: &str,
        raw: &Value,
    ) -> Result<CellState> {
        let result = self
            .try_write_cell(environment_id, template_type, identifier, key, raw)
            .await;
        if let Err(e) = &result {
            log_failure("write_cell", e);
        }
        result
    }

    async fn try_write_cell(
        &self,
        environment_id: &str,
        template_type: TemplateType,
        identifier: &str,
        key: &str,
        raw: &Value,
    ) -> Result<CellState> {
        if identifier.is_empty() {
            return Err(OverridesError::EmptyIdentifier);
        }
        let template = self.template(environment_id, template_type).await?;
        let record_key = OverrideKey::new(environment_id, template_type, identifier);
        let mut record = self
            .store
            .load_record(&record_key)
            .await?
            .unwrap_or_else(|| OverrideRecord::empty(template_type, environment_id, identifier));

        let state = write_field(&template, &mut record, key, raw)?;
        self.store.save_record(&record).await?;
        debug!(record = %record_key, field = key, "cell written: {}", Pretty(&state));
        Ok(state)
    }

    /// Register `identifier` with no overrides, keeping any existing record.
    pub async fn register_identifier(
        &self,
        environment_id: &str,
        template_type: TemplateType,
        identifier: &str,
    ) -> Result<OverrideRecord> {
        if identifier.is_empty() {
            return Err(OverridesError::EmptyIdentifier);
        }
        let key = OverrideKey::new(environment_id, template_type, identifier);
        if let Some(existing) = self.store.load_record(&key).await? {
            return Ok(existing);
        }
        let record = OverrideRecord::empty(template_type, environment_id, identifier);
        self.store.save_record(&record).await?;
        info!(record = %key, "identifier registered");
        Ok(record)
    }

    /// Effective values for `identifier`, or pure defaults without one.
    pub async fn resolve(
        &self,
        environment_id: &str,
        template_type: TemplateType,
        identifier: Option<&str>,
    ) -> Result<Resolution> {
        let template = self.template(environment_id, template_type).await?;
        let record = match normalize_identifier(identifier) {
            Some(id) => {
                self.store
                    .load_record(&OverrideKey::new(environment_id, template_type, id))
                    .await?
            }
            None => None,
        };
        Ok(resolve(&template, record.as_ref(), identifier))
    }

    /// Remove `identifier`'s record.
    pub async fn delete_identifier(
        &self,
        environment_id: &str,
        template_type: TemplateType,
        identifier: &str,
    ) -> Result<()> {
        let key = OverrideKey::new(environment_id, template_type, identifier);
        if !self.store.delete_record(&key).await? {
            let err = OverridesError::IdentifierNotFound {
                identifier: identifier.to_string(),
            };
            log_failure("delete_identifier", &err);
            return Err(err);
        }
        info!(record = %key, "identifier deleted");
        Ok(())
    }

    pub async fn list_identifiers(
        &self,
        environment_id: &str,
        template_type: TemplateType,
    ) -> Result<Vec<String>> {
        self.store
            .list_identifiers(environment_id, template_type)
            .await
    }

    /// Copy `identifier`'s overrides between environments, once per type.
    ///
    /// Types where the source has no record are skipped. Without
    /// `overwrite`, every target is checked before anything is written, so
    /// a `TargetExists` on one type leaves all targets untouched.
    pub async fn copy_overrides(
        &self,
        identifier: &str,
        source_environment: &str,
        target_environment: &str,
        template_types: &[TemplateType],
        overwrite: bool,
    ) -> Result<Vec<OverrideRecord>> {
        let result = self
            .try_copy_overrides(
                identifier,
                source_environment,
                target_environment,
                template_types,
                overwrite,
            )
            .await;
        if let Err(e) = &result {
            log_failure("copy_overrides", e);
        }
        result
    }

    async fn try_copy_overrides(
        &self,
        identifier: &str,
        source_environment: &str,
        target_environment: &str,
        template_types: &[TemplateType],
        overwrite: bool,
    ) -> Result<Vec<OverrideRecord>> {
        if identifier.is_empty() {
            return Err(OverridesError::EmptyIdentifier);
        }

        let mut planned = Vec::new();
        for &template_type in template_types {
            let source_key = OverrideKey::new(source_environment, template_type, identifier);
            let Some(source) = self.store.load_record(&source_key).await? else {
                debug!(record = %source_key, "no source record, skipping type");
                continue;
            };
            let target_key = OverrideKey::new(target_environment, template_type, identifier);
            let target = self.store.load_record(&target_key).await?;
            let copied = copy_overrides(
                identifier,
                &source,
                target.as_ref(),
                target_environment,
                overwrite,
            )?;
            planned.push(copied);
        }

        if planned.is_empty() {
            return Err(OverridesError::IdentifierNotFound {
                identifier: identifier.to_string(),
            });
        }

        for record in &planned {
            self.store.save_record(record).await?;
        }
        info!(
            identifier,
            from = source_environment,
            to = target_environment,
            types = planned.len(),
            "overrides copied"
        );
        Ok(planned)
    }
}

fn log_failure(operation: &str, err: &OverridesError) {
    match err.severity() {
        ErrorSeverity::Critical => error!(operation, kind = err.kind(), "{err}"),
        ErrorSeverity::Error => warn!(operation, kind = err.kind(), "{err}"),
        ErrorSeverity::Warning => debug!(operation, kind = err.kind(), "{err}"),
    }
}
