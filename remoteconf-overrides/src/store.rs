//! Persistence abstraction for templates and override records

use async_trait::async_trait;
use remoteconf_fields::{Template, TemplateType};

use crate::error::Result;
use crate::record::{OverrideKey, OverrideRecord};

/// Storage abstraction the service reads from and writes to.
///
/// Implementations own I/O and retries. Failures surface as
/// `OverridesError::Store`.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// Get the template of `template_type` in an environment
    async fn load_template(
        &self,
        environment_id: &str,
        template_type: TemplateType,
    ) -> Result<Option<Template>>;

    /// Get an override record
    async fn load_record(&self, key: &OverrideKey) -> Result<Option<OverrideRecord>>;

    /// Create or replace an override record
    async fn save_record(&self, record: &OverrideRecord) -> Result<()>;

    /// Delete an override record, returning whether it existed
    async fn delete_record(&self, key: &OverrideKey) -> Result<bool>;

    /// List the identifiers with a record for this environment and type
    async fn list_identifiers(
        &self,
        environment_id: &str,
        template_type: TemplateType,
    ) -> Result<Vec<String>>;
}
