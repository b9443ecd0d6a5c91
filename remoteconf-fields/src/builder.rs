//! Assemble and validate templates from catalog-seeded fields.

use tracing::debug;

use crate::defaults::FieldDefaults;
use crate::error::{FieldsError, Result};
use crate::types::{Template, TemplateField, TemplateType};

/// Builder for [`Template`].
///
/// ```rust
/// use remoteconf_fields::{FieldDefaults, TemplateBuilder, TemplateType};
///
/// let template = TemplateBuilder::new(TemplateType::User)
///     .with_defaults(FieldDefaults::default())
///     .boolean("feature_flag")
///     .string("api_url")
///     .enumeration("plan", ["free", "premium", "enterprise"])
///     .build()?;
///
/// assert_eq!(template.schema.len(), 3);
/// # Ok::<(), remoteconf_fields::FieldsError>(())
/// ```
pub struct TemplateBuilder {
    template_type: TemplateType,
    defaults: FieldDefaults,
    fields: Vec<TemplateField>,
}

impl TemplateBuilder {
    pub fn new(template_type: TemplateType) -> Self {
        Self {
            template_type,
            defaults: FieldDefaults::default(),
            fields: Vec::new(),
        }
    }

    /// Start from an existing template, e.g. to add a field to it.
    pub fn from_template(template: &Template) -> Self {
        Self {
            template_type: template.template_type,
            defaults: FieldDefaults::default(),
            fields: template.schema.clone(),
        }
    }

    /// Use this catalog for fields added with the shorthand methods.
    pub fn with_defaults(mut self, defaults: FieldDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a fully specified field.
    pub fn field(mut self, field: TemplateField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn string(self, key: impl Into<String>) -> Self {
        let field = self.defaults.string_field(key);
        self.field(field)
    }

    pub fn number(self, key: impl Into<String>) -> Self {
        let field = self.defaults.number_field(key);
        self.field(field)
    }

    pub fn boolean(self, key: impl Into<String>) -> Self {
        let field = self.defaults.boolean_field(key);
        self.field(field)
    }

    pub fn enumeration<I, S>(self, key: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = self.defaults.enum_field(key, options);
        self.field(field)
    }

    /// Remove a field by key. Fails with `FieldNotFound` right away if no
    /// field has that key.
    pub fn remove(mut self, key: &str) -> Result<Self> {
        let before = self.fields.len();
        self.fields.retain(|f| f.key != key);
        if self.fields.len() == before {
            return Err(FieldsError::FieldNotFound {
                key: key.to_string(),
            });
        }
        Ok(self)
    }

    /// Validate every field and produce the template.
    pub fn build(self) -> Result<Template> {
        let template = Template::new(self.template_type, self.fields);
        template.validate()?;
        debug!(
            template_type = %template.template_type,
            fields = template.schema.len(),
            "template built"
        );
        Ok(template)
    }
}
