//! Typed custom properties.
//!
//! A [`Properties`] set keeps document order but also indexes entries by
//! name, so merges and lookups stay O(1) amortized per entry.

use std::collections::{BTreeSet, HashMap};

use crate::util::Color;

/// Built-in property type tokens (`type` attribute).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PropertyType {
    #[default]
    String,
    Int,
    Float,
    Bool,
    Color,
    File,
    Object,
    Class,
}

impl PropertyType {
    pub const TOKENS: &'static [(&'static str, Self)] = &[
        ("string", Self::String),
        ("int", Self::Int),
        ("float", Self::Float),
        ("bool", Self::Bool),
        ("color", Self::Color),
        ("file", Self::File),
        ("object", Self::Object),
        ("class", Self::Class),
    ];
}

/// Value of a single property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    String(String),
    Int(i32),
    Float(f32),
    Bool(bool),
    Color(Color),
    File(String),
    /// Reference to an object by id (0 = none).
    Object(u32),
    /// Instance of a custom class.
    Class {
        property_type: String,
        properties: Properties,
    },
    /// Selected symbols of a custom enum.
    Enum {
        property_type: String,
        values: BTreeSet<String>,
    },
}

impl PropertyValue {
    /// Name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Color(_) => "color",
            Self::File(_) => "file",
            Self::Object(_) => "object",
            Self::Class { .. } => "class",
            Self::Enum { .. } => "enum",
        }
    }
}

/// A named property.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self { name: name.into(), value }
    }
}

/// Ordered, uniquely named set of properties.
#[derive(Clone, Debug, Default)]
pub struct Properties {
    entries: Vec<Property>,
    index: HashMap<String, usize>,
}

impl Properties {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property. An existing entry with the same name is replaced
    /// in place; otherwise the property is appended.
    pub fn insert(&mut self, property: Property) {
        match self.index.get(&property.name) {
            Some(&pos) => self.entries[pos] = property,
            None => {
                self.index.insert(property.name.clone(), self.entries.len());
                self.entries.push(property);
            }
        }
    }

    /// Get a property by name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    /// Get a property value by name.
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name).map(|p| &p.value)
    }

    /// Check if a name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.entries.iter()
    }

    /// Names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.name.as_str())
    }

    /// Right-biased, order-stable merge.
    ///
    /// Entries of `self` keep their position; an entry of `overlay` with the
    /// same name replaces it there. Names only in `overlay` are appended in
    /// `overlay`'s order.
    pub fn merge(&self, overlay: &Properties) -> Properties {
        let mut merged = self.clone();
        merged.merge_from(overlay.iter().cloned());
        merged
    }

    /// In-place form of [`merge`](Self::merge).
    pub fn merge_from(&mut self, overlay: impl IntoIterator<Item = Property>) {
        for property in overlay {
            self.insert(property);
        }
    }

    // === Typed accessors ===

    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.value(name)? {
            PropertyValue::String(s) | PropertyValue::File(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.value(name)? {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.value(name)? {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_class(&self, name: &str) -> Option<&Properties> {
        match self.value(name)? {
            PropertyValue::Class { properties, .. } => Some(properties),
            _ => None,
        }
    }

    pub fn get_enum(&self, name: &str) -> Option<&BTreeSet<String>> {
        match self.value(name)? {
            PropertyValue::Enum { values, .. } => Some(values),
            _ => None,
        }
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<Property> for Properties {
    fn from_iter<T: IntoIterator<Item = Property>>(iter: T) -> Self {
        let mut props = Self::new();
        props.merge_from(iter);
        props
    }
}

impl IntoIterator for Properties {
    type Item = Property;
    type IntoIter = std::vec::IntoIter<Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(name: &str, v: i32) -> Property {
        Property::new(name, PropertyValue::Int(v))
    }

    fn props(items: &[(&str, i32)]) -> Properties {
        items.iter().map(|(n, v)| int(n, *v)).collect()
    }

    fn pairs(p: &Properties) -> Vec<(String, i32)> {
        p.iter()
            .map(|p| match p.value {
                PropertyValue::Int(v) => (p.name.clone(), v),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_merge_right_biased_order_stable() {
        let base = props(&[("a", 1), ("b", 2), ("c", 3)]);
        let overlay = props(&[("d", 40), ("b", 20)]);
        let merged = base.merge(&overlay);
        assert_eq!(
            pairs(&merged),
            vec![("a".into(), 1), ("b".into(), 20), ("c".into(), 3), ("d".into(), 40)]
        );
        assert_eq!(merged.get_int("b"), Some(20));
    }

    #[test]
    fn test_merge_with_empty() {
        let base = props(&[("a", 1)]);
        assert_eq!(base.merge(&Properties::new()), base);
        assert_eq!(Properties::new().merge(&base), base);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut p = props(&[("x", 1), ("y", 2)]);
        p.insert(int("x", 9));
        assert_eq!(p.names().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(p.get_int("x"), Some(9));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_typed_accessors() {
        let p: Properties = [
            Property::new("s", PropertyValue::String("hi".into())),
            Property::new("f", PropertyValue::Float(1.5)),
            Property::new("b", PropertyValue::Bool(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(p.get_string("s"), Some("hi"));
        assert_eq!(p.get_float("f"), Some(1.5));
        assert_eq!(p.get_bool("b"), Some(true));
        assert_eq!(p.get_int("s"), None);
        assert!(p.get("missing").is_none());
    }
}
