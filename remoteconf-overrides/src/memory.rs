//! In-memory [`OverrideStore`] for tests and embedders.

use std::collections::BTreeMap;

use async_trait::async_trait;
use remoteconf_fields::{Template, TemplateType};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::record::{OverrideKey, OverrideRecord};
use crate::store::OverrideStore;

#[derive(Debug, Default)]
pub struct MemoryOverrideStore {
    templates: RwLock<BTreeMap<(String, TemplateType), Template>>,
    records: RwLock<BTreeMap<OverrideKey, OverrideRecord>>,
}

impl MemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a template for an environment.
    pub fn with_template(mut self, environment_id: impl Into<String>, template: Template) -> Self {
        self.templates
            .get_mut()
            .insert((environment_id.into(), template.template_type), template);
        self
    }

    /// Seed an override record.
    pub fn with_record(mut self, record: OverrideRecord) -> Self {
        self.records.get_mut().insert(record.key(), record);
        self
    }

    /// Replace the template for an environment.
    pub async fn put_template(&self, environment_id: impl Into<String>, template: Template) {
        self.templates
            .write()
            .await
            .insert((environment_id.into(), template.template_type), template);
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl OverrideStore for MemoryOverrideStore {
    async fn load_template(
        &self,
        environment_id: &str,
        template_type: TemplateType,
    ) -> Result<Option<Template>> {
        let templates = self.templates.read().await;
        Ok(templates
            .get(&(environment_id.to_string(), template_type))
            .cloned())
    }

    async fn load_record(&self, key: &OverrideKey) -> Result<Option<OverrideRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn save_record(&self, record: &OverrideRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.key(), record.clone());
        Ok(())
    }

    async fn delete_record(&self, key: &OverrideKey) -> Result<bool> {
        Ok(self.records.write().await.remove(key).is_some())
    }

    async fn list_identifiers(
        &self,
        environment_id: &str,
        template_type: TemplateType,
    ) -> Result<Vec<String>> {
        let records = self.records.read().await;
        Ok(records
            .keys()
            .filter(|k| k.environment_id == environment_id && k.template_type == template_type)
            .map(|k| k.identifier.clone())
            .collect())
    }
}
