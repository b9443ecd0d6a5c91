//! The catalog of constraint values new fields start from.
//!
//! The "add field" and "edit field" flows both seed a new field from the
//! same catalog. It is an explicit value handed to [`TemplateBuilder`]
//! rather than a shared constant, so each caller can load its own.
//!
//! Loading layers sources with figment, lowest precedence first:
//!
//! 1. Built-in values ([`FieldDefaults::default`])
//! 2. An optional TOML, YAML or JSON file
//! 3. Environment variables prefixed `REMOTECONF_FIELDS_`, nested with `__`
//!    (e.g. `REMOTECONF_FIELDS_STRING__MAX_LENGTH=64`)
//!
//! [`TemplateBuilder`]: crate::builder::TemplateBuilder

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::types::{BooleanField, EnumField, FieldKind, NumberField, StringField, TemplateField};
use crate::validation::{validate_number_constraints, validate_string_constraints};

/// Environment variable prefix for catalog overrides.
pub const ENV_PREFIX: &str = "REMOTECONF_FIELDS_";

/// Starting constraints for new String fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringDefaults {
    pub min_length: i64,
    pub max_length: i64,
}

impl Default for StringDefaults {
    fn default() -> Self {
        Self {
            min_length: 0,
            max_length: 255,
        }
    }
}

/// Starting constraints for new Number fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberDefaults {
    pub min_value: f64,
    pub max_value: f64,
    pub increment_amount: f64,
    pub default_value: f64,
}

impl Default for NumberDefaults {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 100.0,
            increment_amount: 1.0,
            default_value: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanDefaults {
    pub default_value: bool,
}

/// The complete catalog, one section per field type that has tunable constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub string: StringDefaults,
    pub number: NumberDefaults,
    pub boolean: BooleanDefaults,
}

impl FieldDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the catalog from built-ins, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(path)?)
    }

    /// Build the layered figment without extracting it.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(FieldDefaults::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(FieldsError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => {
                    return Err(FieldsError::UnsupportedFormat {
                        path: path.to_path_buf(),
                    })
                }
            };
            debug!(path = %path.display(), "layered field defaults file");
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract and validate a catalog from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let defaults: FieldDefaults = figment.extract()?;
        defaults.validate()?;
        debug!(?defaults, "field defaults loaded");
        Ok(defaults)
    }

    /// Check that every section would produce a valid field.
    pub fn validate(&self) -> Result<()> {
        validate_string_constraints(self.string.min_length, self.string.max_length, None).map_err(
            |source| FieldsError::InvalidDefaults {
                section: "string",
                source,
            },
        )?;
        validate_number_constraints(
            self.number.min_value,
            self.number.max_value,
            self.number.increment_amount,
            Some(self.number.default_value),
        )
        .map_err(|source| FieldsError::InvalidDefaults {
            section: "number",
            source,
        })?;
        Ok(())
    }

    /// A new String field with catalog constraints and no default.
    pub fn string_field(&self, key: impl Into<String>) -> TemplateField {
        TemplateField::new(
            key,
            FieldKind::String(StringField {
                default_value: None,
                min_length: self.string.min_length,
                max_length: self.string.max_length,
            }),
        )
    }

    /// A new Number field with catalog range, increment and default.
    pub fn number_field(&self, key: impl Into<String>) -> TemplateField {
        TemplateField::new(
            key,
            FieldKind::Number(NumberField {
                default_value: self.number.default_value,
                min_value: self.number.min_value,
                max_value: self.number.max_value,
                increment_amount: self.number.increment_amount,
            }),
        )
    }

    pub fn boolean_field(&self, key: impl Into<String>) -> TemplateField {
        TemplateField::new(
            key,
            FieldKind::Boolean(BooleanField {
                default_value: self.boolean.default_value,
            }),
        )
    }

    /// A new Enum field defaulting to its first option.
    pub fn enum_field<I, S>(&self, key: impl Into<String>, options: I) -> TemplateField
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        TemplateField::new(
            key,
            FieldKind::Enum(EnumField {
                default_value: options.first().cloned(),
                options,
            }),
        )
    }
}
