//! Core template and field types.
//!
//! A template is an ordered sequence of typed fields. Each field variant
//! carries only its own constraints, so a String field can never be asked
//! for an increment and a Number field can never have options.
//!
//! All types serialize to/from the camelCase JSON shape the REST API uses.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::validation::validate_field;

/// Which namespace a template belongs to.
///
/// SYSTEM and USER templates are independent per application/environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateType {
    System,
    User,
}

impl TemplateType {
    /// Both namespaces, SYSTEM first.
    pub const ALL: [TemplateType; 2] = [TemplateType::System, TemplateType::User];
}

impl std::fmt::Display for TemplateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateType::System => write!(f, "SYSTEM"),
            TemplateType::User => write!(f, "USER"),
        }
    }
}

/// Constraints of a String field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub min_length: i64,
    pub max_length: i64,
}

/// Constraints of a Number field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberField {
    pub default_value: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub increment_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanField {
    #[serde(default)]
    pub default_value: bool,
}

/// Constraints of an Enum field. Options keep their declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub options: Vec<String>,
}

/// The type of a field, discriminated by `type` on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String(StringField),
    Number(NumberField),
    Boolean(BooleanField),
    Enum(EnumField),
    /// A `type` this version does not know. Has no default and accepts no
    /// writes. The wire type and attributes are kept so the field survives
    /// a template being read, edited and saved again.
    Unknown {
        type_name: String,
        attributes: Map<String, Value>,
    },
}

impl FieldKind {
    /// An unknown kind with no attributes.
    pub fn unknown(type_name: impl Into<String>) -> Self {
        FieldKind::Unknown {
            type_name: type_name.into(),
            attributes: Map::new(),
        }
    }

    /// Variant name. Every unrecognized type reports `"Unknown"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String(_) => "String",
            FieldKind::Number(_) => "Number",
            FieldKind::Boolean(_) => "Boolean",
            FieldKind::Enum(_) => "Enum",
            FieldKind::Unknown { .. } => "Unknown",
        }
    }

    /// The `type` value written on the wire.
    pub fn wire_type(&self) -> &str {
        match self {
            FieldKind::Unknown { type_name, .. } => type_name,
            known => known.type_name(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum KnownKindRef<'a> {
    String(&'a StringField),
    Number(&'a NumberField),
    Boolean(&'a BooleanField),
    Enum(&'a EnumField),
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownKind {
    String(StringField),
    Number(NumberField),
    Boolean(BooleanField),
    Enum(EnumField),
}

impl From<KnownKind> for FieldKind {
    fn from(kind: KnownKind) -> Self {
        match kind {
            KnownKind::String(f) => FieldKind::String(f),
            KnownKind::Number(f) => FieldKind::Number(f),
            KnownKind::Boolean(f) => FieldKind::Boolean(f),
            KnownKind::Enum(f) => FieldKind::Enum(f),
        }
    }
}

const KNOWN_TYPES: [&str; 4] = ["String", "Number", "Boolean", "Enum"];

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let known = match self {
            FieldKind::String(f) => KnownKindRef::String(f),
            FieldKind::Number(f) => KnownKindRef::Number(f),
            FieldKind::Boolean(f) => KnownKindRef::Boolean(f),
            FieldKind::Enum(f) => KnownKindRef::Enum(f),
            FieldKind::Unknown {
                type_name,
                attributes,
            } => {
                let mut map = serializer.serialize_map(Some(attributes.len() + 1))?;
                map.serialize_entry("type", type_name)?;
                for (name, value) in attributes {
                    map.serialize_entry(name, value)?;
                }
                return map.end();
            }
        };
        known.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut attributes = Map::<String, Value>::deserialize(deserializer)?;
        let type_name = match attributes.get("type") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "field type must be a string, got {other}"
                )))
            }
            None => return Err(de::Error::missing_field("type")),
        };

        if KNOWN_TYPES.contains(&type_name.as_str()) {
            return serde_json::from_value::<KnownKind>(Value::Object(attributes))
                .map(FieldKind::from)
                .map_err(de::Error::custom);
        }

        attributes.remove("type");
        Ok(FieldKind::Unknown {
            type_name,
            attributes,
        })
    }
}

/// A single configuration key within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateField {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub editable: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl TemplateField {
    /// Create an editable field with no description.
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            description: None,
            editable: true,
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }
}

/// A typed schema: a template type plus an ordered sequence of fields.
///
/// Templates are replaced wholesale. [`Template::with_field`] and
/// [`Template::without_field`] build a new template rather than patching
/// one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTemplate")]
pub struct Template {
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    #[serde(default)]
    pub schema: Vec<TemplateField>,
}

/// Wire shape of a template before SYSTEM fields are locked.
#[derive(Deserialize)]
struct RawTemplate {
    #[serde(rename = "type")]
    template_type: TemplateType,
    #[serde(default)]
    schema: Vec<TemplateField>,
}

impl From<RawTemplate> for Template {
    fn from(raw: RawTemplate) -> Self {
        Template::new(raw.template_type, raw.schema)
    }
}

impl Template {
    /// Create a template. Every field of a SYSTEM template is made read-only.
    pub fn new(template_type: TemplateType, schema: Vec<TemplateField>) -> Self {
        let mut template = Self {
            template_type,
            schema,
        };
        template.normalize();
        template
    }

    /// Force `editable = false` on SYSTEM templates, whatever the caller sent.
    pub fn normalize(&mut self) {
        if self.template_type == TemplateType::System {
            for field in &mut self.schema {
                field.editable = false;
            }
        }
    }

    /// Look up a field by key.
    pub fn field(&self, key: &str) -> Option<&TemplateField> {
        self.schema.iter().find(|f| f.key == key)
    }

    /// All field keys, in template order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schema.iter().map(|f| f.key.as_str())
    }

    /// Validate every field, in order, against the keys declared before it.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.schema.len());
        for field in &self.schema {
            validate_field(field, &seen)?;
            seen.push(&field.key);
        }
        Ok(())
    }

    /// A new template with `field` appended, or replacing the field with the same key.
    pub fn with_field(&self, field: TemplateField) -> Template {
        let mut schema = self.schema.clone();
        match schema.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => schema.push(field),
        }
        Template::new(self.template_type, schema)
    }

    /// A new template with the field `key` omitted.
    pub fn without_field(&self, key: &str) -> Template {
        let schema = self
            .schema
            .iter()
            .filter(|f| f.key != key)
            .cloned()
            .collect();
        Template::new(self.template_type, schema)
    }
}
