//! Custom class and enum schemas.
//!
//! Schemas are supplied by the caller (see [`crate::project`]) and looked up
//! by name while decoding; nothing here is global.

use std::collections::{BTreeSet, HashMap};
use std::ops::BitOr;

use super::{Properties, Property};
use crate::util::{Color, Error, Result};

/// Element kinds a custom class may be attached to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UseAs(u16);

impl UseAs {
    pub const NONE: Self = Self(0);
    pub const PROPERTY: Self = Self(1 << 0);
    pub const MAP: Self = Self(1 << 1);
    pub const LAYER: Self = Self(1 << 2);
    pub const OBJECT: Self = Self(1 << 3);
    pub const TILE: Self = Self(1 << 4);
    pub const TILESET: Self = Self(1 << 5);
    pub const WANGCOLOR: Self = Self(1 << 6);
    pub const WANGSET: Self = Self(1 << 7);
    pub const PROJECT: Self = Self(1 << 8);
    pub const ALL: Self = Self(0x1FF);

    pub const TOKENS: &'static [(&'static str, Self)] = &[
        ("property", Self::PROPERTY),
        ("map", Self::MAP),
        ("layer", Self::LAYER),
        ("object", Self::OBJECT),
        ("tile", Self::TILE),
        ("tileset", Self::TILESET),
        ("wangcolor", Self::WANGCOLOR),
        ("wangset", Self::WANGSET),
        ("project", Self::PROJECT),
    ];

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for UseAs {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Schema of a custom class: its members with their default values.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomClassDefinition {
    pub id: u32,
    pub name: String,
    pub color: Color,
    pub draw_fill: bool,
    pub use_as: UseAs,
    pub members: Vec<Property>,
}

impl CustomClassDefinition {
    pub fn new(name: impl Into<String>, members: Vec<Property>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            color: Color::TRANSPARENT,
            draw_fill: false,
            use_as: UseAs::ALL,
            members,
        }
    }

    /// A fresh property set holding every member at its default value.
    pub fn instantiate(&self) -> Properties {
        self.members.iter().cloned().collect()
    }
}

/// How an enum value is written to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnumStorageType {
    /// Symbol names (comma-separated when flags).
    #[default]
    String,
    /// Symbol index, or a bitmask over symbol positions when flags.
    Int,
}

impl EnumStorageType {
    pub const TOKENS: &'static [(&'static str, Self)] = &[("string", Self::String), ("int", Self::Int)];
}

/// Schema of a custom enum.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomEnumDefinition {
    pub id: u32,
    pub name: String,
    pub storage_type: EnumStorageType,
    pub values: Vec<String>,
    pub value_as_flags: bool,
}

impl CustomEnumDefinition {
    pub fn new(
        name: impl Into<String>,
        storage_type: EnumStorageType,
        values: Vec<String>,
        value_as_flags: bool,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            storage_type,
            values,
            value_as_flags,
        }
    }

    /// Decode a string-stored value.
    pub fn decode_str(&self, raw: &str) -> Result<BTreeSet<String>> {
        if self.value_as_flags {
            return Ok(raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect());
        }
        if raw.contains(',') {
            return Err(Error::malformed(&self.name, raw, "single enum symbol"));
        }
        Ok(BTreeSet::from([raw.to_string()]))
    }

    /// Decode an int-stored value: a bitmask over symbol positions in flag
    /// mode, otherwise an index into the symbol list.
    pub fn decode_int(&self, raw: i32) -> Result<BTreeSet<String>> {
        if self.value_as_flags {
            return Ok(self
                .values
                .iter()
                .take(32)
                .enumerate()
                .filter(|(bit, _)| (raw as u32) & (1u32 << bit) != 0)
                .map(|(_, symbol)| symbol.clone())
                .collect());
        }
        usize::try_from(raw)
            .ok()
            .and_then(|i| self.values.get(i))
            .map(|symbol| BTreeSet::from([symbol.clone()]))
            .ok_or_else(|| Error::malformed(&self.name, raw.to_string(), "enum symbol index"))
    }
}

/// Either kind of custom type.
#[derive(Clone, Debug, PartialEq)]
pub enum CustomTypeDefinition {
    Class(CustomClassDefinition),
    Enum(CustomEnumDefinition),
}

impl CustomTypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::Class(c) => &c.name,
            Self::Enum(e) => &e.name,
        }
    }

    /// Kind name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Enum(_) => "enum",
        }
    }
}

impl From<CustomClassDefinition> for CustomTypeDefinition {
    fn from(def: CustomClassDefinition) -> Self {
        Self::Class(def)
    }
}

impl From<CustomEnumDefinition> for CustomTypeDefinition {
    fn from(def: CustomEnumDefinition) -> Self {
        Self::Enum(def)
    }
}

/// Name-keyed collection of custom type definitions.
#[derive(Clone, Debug, Default)]
pub struct CustomTypeRegistry {
    types: HashMap<String, CustomTypeDefinition>,
}

impl CustomTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, replacing any previous one with the same name.
    pub fn insert(&mut self, def: impl Into<CustomTypeDefinition>) {
        let def = def.into();
        self.types.insert(def.name().to_string(), def);
    }

    /// Look a definition up by name.
    pub fn resolve(&self, name: &str) -> Option<&CustomTypeDefinition> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomTypeDefinition> {
        self.types.values()
    }
}

impl<D: Into<CustomTypeDefinition>> FromIterator<D> for CustomTypeRegistry {
    fn from_iter<T: IntoIterator<Item = D>>(iter: T) -> Self {
        let mut registry = Self::new();
        for def in iter {
            registry.insert(def);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;

    fn abc(storage: EnumStorageType, flags: bool) -> CustomEnumDefinition {
        CustomEnumDefinition::new("E", storage, vec!["a".into(), "b".into(), "c".into()], flags)
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_int_flags_bitmask() {
        let e = abc(EnumStorageType::Int, true);
        assert_eq!(e.decode_int(5).unwrap(), set(&["a", "c"]));
        assert_eq!(e.decode_int(0).unwrap(), set(&[]));
        assert_eq!(e.decode_int(7).unwrap(), set(&["a", "b", "c"]));
    }

    #[test]
    fn test_int_single_index() {
        let e = abc(EnumStorageType::Int, false);
        assert_eq!(e.decode_int(1).unwrap(), set(&["b"]));
        assert!(e.decode_int(3).is_err());
        assert!(e.decode_int(-1).is_err());
    }

    #[test]
    fn test_string_flags_trimmed() {
        let e = abc(EnumStorageType::String, true);
        assert_eq!(e.decode_str("a, c").unwrap(), set(&["a", "c"]));
        assert_eq!(e.decode_str("").unwrap(), set(&[]));
    }

    #[test]
    fn test_string_single_rejects_comma() {
        let e = abc(EnumStorageType::String, false);
        assert_eq!(e.decode_str("b").unwrap(), set(&["b"]));
        assert!(matches!(e.decode_str("a,b"), Err(Error::MalformedValue { .. })));
    }

    #[test]
    fn test_instantiate_class() {
        let def = CustomClassDefinition::new(
            "Spawn",
            vec![
                Property::new("hp", PropertyValue::Int(10)),
                Property::new("name", PropertyValue::String("goblin".into())),
            ],
        );
        let props = def.instantiate();
        assert_eq!(props.names().collect::<Vec<_>>(), ["hp", "name"]);
        assert_eq!(props.get_int("hp"), Some(10));
    }

    #[test]
    fn test_registry() {
        let registry: CustomTypeRegistry = [
            CustomTypeDefinition::from(CustomClassDefinition::new("C", vec![])),
            abc(EnumStorageType::String, false).into(),
        ]
        .into_iter()
        .collect();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("C").map(|d| d.kind_name()), Some("class"));
        assert_eq!(registry.resolve("E").map(|d| d.kind_name()), Some("enum"));
        assert!(registry.resolve("X").is_none());
    }

    #[test]
    fn test_use_as() {
        let u = UseAs::MAP | UseAs::OBJECT;
        assert!(u.contains(UseAs::MAP));
        assert!(!u.contains(UseAs::TILE));
        assert!(UseAs::ALL.contains(UseAs::PROJECT));
    }
}
