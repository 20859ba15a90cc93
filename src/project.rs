//! Custom type definitions from a Tiled project file (`.tiled-project`).
//!
//! Only the `propertyTypes` array is read. Classes and enums are converted to
//! [`CustomTypeDefinition`]s with their member defaults fully typed, so the
//! resulting registry can be handed straight to
//! [`TmxReader::with_custom_types`](crate::tmx::TmxReader::with_custom_types).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::document::lookup_token;
use crate::model::{
    CustomClassDefinition, CustomEnumDefinition, CustomTypeRegistry, EnumStorageType, Properties,
    Property, PropertyValue, UseAs,
};
use crate::util::{Color, Error, Result};

/// Nested class members deeper than this are treated as a cycle.
const MAX_CLASS_DEPTH: usize = 32;

// ============================================================================
// JSON shape
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    #[serde(default)]
    property_types: Vec<RawPropertyType>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawPropertyType {
    Class(RawClass),
    Enum(RawEnum),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClass {
    #[serde(default)]
    id: u32,
    name: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    draw_fill: bool,
    #[serde(default)]
    use_as: Vec<String>,
    #[serde(default)]
    members: Vec<RawMember>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnum {
    #[serde(default)]
    id: u32,
    name: String,
    #[serde(default = "default_storage_type")]
    storage_type: String,
    #[serde(default)]
    values: Vec<String>,
    #[serde(default)]
    values_as_flags: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMember {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    property_type: Option<String>,
    #[serde(default)]
    value: Value,
}

fn default_storage_type() -> String {
    "string".to_string()
}

// ============================================================================
// Loading
// ============================================================================

/// Load the custom types of a project file on disk.
pub fn load_project(path: impl AsRef<Path>) -> Result<CustomTypeRegistry> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading project custom types");
    let json = std::fs::read_to_string(path)?;
    load_project_str(&json)
}

/// Load the custom types of a project JSON document.
pub fn load_project_str(json: &str) -> Result<CustomTypeRegistry> {
    let project: ProjectFile = serde_json::from_str(json)?;

    let mut classes = HashMap::new();
    let mut enums = HashMap::new();
    for raw in &project.property_types {
        match raw {
            RawPropertyType::Class(class) => {
                classes.insert(class.name.as_str(), class);
            }
            RawPropertyType::Enum(raw_enum) => {
                enums.insert(raw_enum.name.as_str(), convert_enum(raw_enum)?);
            }
        }
    }

    let builder = Builder { classes, enums };
    let mut registry = CustomTypeRegistry::new();
    for raw in &project.property_types {
        match raw {
            RawPropertyType::Class(class) => registry.insert(builder.class(class, 0)?),
            RawPropertyType::Enum(raw_enum) => {
                if let Some(def) = builder.enums.get(raw_enum.name.as_str()) {
                    registry.insert(def.clone());
                }
            }
        }
    }

    debug!(types = registry.len(), "loaded custom types");
    Ok(registry)
}

fn convert_enum(raw: &RawEnum) -> Result<CustomEnumDefinition> {
    let storage_type = lookup_token(EnumStorageType::TOKENS, &raw.storage_type).ok_or_else(|| {
        Error::UnknownEnumToken {
            name: "storageType".to_string(),
            value: raw.storage_type.clone(),
        }
    })?;
    let mut def = CustomEnumDefinition::new(
        raw.name.clone(),
        storage_type,
        raw.values.clone(),
        raw.values_as_flags,
    );
    def.id = raw.id;
    Ok(def)
}

struct Builder<'a> {
    classes: HashMap<&'a str, &'a RawClass>,
    enums: HashMap<&'a str, CustomEnumDefinition>,
}

impl Builder<'_> {
    fn class(&self, raw: &RawClass, depth: usize) -> Result<CustomClassDefinition> {
        if depth > MAX_CLASS_DEPTH {
            return Err(Error::other(format!(
                "class '{}' nests deeper than {MAX_CLASS_DEPTH} levels",
                raw.name
            )));
        }

        let members = raw
            .members
            .iter()
            .map(|m| {
                let value = self.value(&m.ty, m.property_type.as_deref(), &m.value, depth)?;
                Ok(Property::new(m.name.clone(), value))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut def = CustomClassDefinition::new(raw.name.clone(), members);
        def.id = raw.id;
        def.color = raw.color.as_deref().and_then(Color::parse).unwrap_or(Color::TRANSPARENT);
        def.draw_fill = raw.draw_fill;
        def.use_as = raw
            .use_as
            .iter()
            .filter_map(|token| lookup_token(UseAs::TOKENS, token))
            .fold(UseAs::NONE, |acc, flag| acc | flag);
        Ok(def)
    }

    /// Typed value of a member or of a nested class override.
    fn value(
        &self,
        ty: &str,
        property_type: Option<&str>,
        value: &Value,
        depth: usize,
    ) -> Result<PropertyValue> {
        match property_type {
            Some(name) if ty == "class" => {
                let properties = match self.classes.get(name) {
                    Some(nested) => {
                        let defaults = self.class(nested, depth + 1)?.instantiate();
                        defaults.merge(&self.overrides(nested, value, depth + 1)?)
                    }
                    None => Properties::new(),
                };
                Ok(PropertyValue::Class { property_type: name.to_string(), properties })
            }
            Some(name) => match self.enums.get(name) {
                Some(def) => {
                    let values = match value {
                        Value::String(s) => def.decode_str(s)?,
                        Value::Number(n) => def.decode_int(json_i32(n.as_i64()))?,
                        _ => Default::default(),
                    };
                    Ok(PropertyValue::Enum { property_type: name.to_string(), values })
                }
                None => scalar(ty, value),
            },
            None => scalar(ty, value),
        }
    }

    /// JSON object of member overrides for a nested class value.
    fn overrides(&self, class: &RawClass, value: &Value, depth: usize) -> Result<Properties> {
        let Value::Object(fields) = value else {
            return Ok(Properties::new());
        };
        let mut properties = Properties::new();
        for member in &class.members {
            if let Some(field) = fields.get(&member.name) {
                let value = self.value(&member.ty, member.property_type.as_deref(), field, depth)?;
                properties.insert(Property::new(member.name.clone(), value));
            }
        }
        Ok(properties)
    }
}

fn json_i32(n: Option<i64>) -> i32 {
    n.and_then(|n| i32::try_from(n).ok()).unwrap_or(0)
}

fn scalar(ty: &str, value: &Value) -> Result<PropertyValue> {
    Ok(match ty {
        "string" => PropertyValue::String(value.as_str().unwrap_or_default().to_string()),
        "int" => PropertyValue::Int(json_i32(value.as_i64())),
        "float" => PropertyValue::Float(value.as_f64().unwrap_or(0.0) as f32),
        "bool" => PropertyValue::Bool(value.as_bool().unwrap_or(false)),
        "color" => PropertyValue::Color(
            value.as_str().and_then(Color::parse).unwrap_or(Color::TRANSPARENT),
        ),
        "file" => PropertyValue::File(value.as_str().unwrap_or_default().to_string()),
        "object" => PropertyValue::Object(
            value.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        ),
        other => {
            return Err(Error::UnknownEnumToken {
                name: "type".to_string(),
                value: other.to_string(),
            })
        }
    })
}
