//! `properties` / `property` decoding, including custom classes and enums.

use crate::document::{process_children, read_list, skip, AtMostOnce, Attributes, Element};
use crate::model::{
    CustomTypeDefinition, EnumStorageType, Properties, Property, PropertyType, PropertyValue,
};
use crate::util::{Color, Error, Result};

use super::TmxReader;

impl TmxReader<'_> {
    /// Decode a `properties` element.
    pub(crate) fn read_properties<E: Element>(&self, element: E) -> Result<Properties> {
        let list = read_list(element, "property", |p| self.read_property(p))?;
        Ok(list.into_iter().collect())
    }

    /// Decode a `properties` child into an element's property slot, merging
    /// it on top of any class defaults already there.
    pub(crate) fn merge_properties_section<E: Element>(
        &self,
        slot: &mut AtMostOnce<Properties>,
        element: E,
    ) -> Result<()> {
        slot.update(|current| {
            let explicit = self.read_properties(element)?;
            Ok(current.unwrap_or_default().merge(&explicit))
        })
    }

    fn read_property<E: Element>(&self, element: E) -> Result<Property> {
        let name: String = element.required("name")?;
        let ty = element.optional_enum_or("type", PropertyType::TOKENS, PropertyType::String)?;

        if let Some(property_type) = element.attr("propertytype") {
            let value = if ty == PropertyType::Class {
                self.read_class_value(element, property_type)?
            } else {
                self.read_enum_value(element, ty, property_type)?
            };
            return Ok(Property::new(name, value));
        }

        let value = match ty {
            PropertyType::String => PropertyValue::String(read_string_value(element)),
            PropertyType::Int => PropertyValue::Int(element.required("value")?),
            PropertyType::Float => PropertyValue::Float(element.required("value")?),
            PropertyType::Bool => PropertyValue::Bool(element.required("value")?),
            PropertyType::Color => PropertyValue::Color(read_color_value(element)?),
            PropertyType::File => PropertyValue::File(element.required("value")?),
            PropertyType::Object => PropertyValue::Object(element.required("value")?),
            PropertyType::Class => {
                return Err(Error::grammar(format!(
                    "class property '{name}' has no propertytype"
                )))
            }
        };
        Ok(Property::new(name, value))
    }

    fn read_class_value<E: Element>(&self, element: E, property_type: &str) -> Result<PropertyValue> {
        let mut explicit = AtMostOnce::new("properties");
        process_children(element, |child, tag| match tag {
            "properties" => explicit.set(self.read_properties(child)?),
            _ => skip(child),
        })?;
        let explicit = explicit.into_inner().unwrap_or_default();

        let properties = match self.resolve_custom_type(property_type) {
            // Unknown schema: keep exactly what was written.
            None => explicit,
            Some(CustomTypeDefinition::Class(def)) => def.instantiate().merge(&explicit),
            Some(other) => {
                return Err(Error::SchemaMismatch {
                    name: property_type.to_string(),
                    expected: "class",
                    actual: other.kind_name(),
                })
            }
        };

        Ok(PropertyValue::Class {
            property_type: property_type.to_string(),
            properties,
        })
    }

    fn read_enum_value<E: Element>(
        &self,
        element: E,
        ty: PropertyType,
        property_type: &str,
    ) -> Result<PropertyValue> {
        if !matches!(ty, PropertyType::String | PropertyType::Int) {
            return Err(Error::UnknownEnumToken {
                name: "type".to_string(),
                value: element.attr("type").unwrap_or_default().to_string(),
            });
        }

        let def = match self.resolve_custom_type(property_type) {
            Some(CustomTypeDefinition::Enum(def)) => def,
            Some(other) => {
                return Err(Error::SchemaMismatch {
                    name: property_type.to_string(),
                    expected: "enum",
                    actual: other.kind_name(),
                })
            }
            // Unknown schema: fall back to the plain stored value.
            None => {
                return Ok(match ty {
                    PropertyType::Int => PropertyValue::Int(element.required("value")?),
                    _ => PropertyValue::String(element.required("value")?),
                })
            }
        };

        let values = match def.storage_type {
            EnumStorageType::String => def.decode_str(&element.required::<String>("value")?)?,
            EnumStorageType::Int => def.decode_int(element.required("value")?)?,
        };

        Ok(PropertyValue::Enum {
            property_type: property_type.to_string(),
            values,
        })
    }
}

/// String values come from `value`, or from the element text for multi-line
/// strings, and default to empty.
fn read_string_value<E: Element>(element: E) -> String {
    match element.attr("value") {
        Some(value) => value.to_string(),
        None => element.text_content().into_owned(),
    }
}

/// An empty color value means "unset" and decodes to transparent black.
fn read_color_value<E: Element>(element: E) -> Result<Color> {
    let raw: String = element.required("value")?;
    if raw.is_empty() {
        return Ok(Color::TRANSPARENT);
    }
    Color::parse(&raw).ok_or_else(|| Error::malformed("value", raw, "color"))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::{
        CustomClassDefinition, CustomEnumDefinition, CustomTypeRegistry,
    };

    fn read(reader: &TmxReader, xml: &str) -> Result<Properties> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        reader.read_properties(doc.root_element())
    }

    fn registry() -> CustomTypeRegistry {
        let mut r = CustomTypeRegistry::new();
        r.insert(CustomClassDefinition::new(
            "Stats",
            vec![
                Property::new("hp", PropertyValue::Int(10)),
                Property::new("speed", PropertyValue::Float(1.5)),
                Property::new("tag", PropertyValue::String("none".into())),
            ],
        ));
        r.insert(CustomEnumDefinition::new(
            "Flags",
            EnumStorageType::Int,
            vec!["a".into(), "b".into(), "c".into()],
            true,
        ));
        r.insert(CustomEnumDefinition::new(
            "Kind",
            EnumStorageType::String,
            vec!["goblin".into(), "orc".into()],
            false,
        ));
        r
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scalar_types() {
        let xml = r##"<properties>
            <property name="b" type="bool" value="true"/>
            <property name="c" type="color" value="#ff55ffff"/>
            <property name="e" type="color" value=""/>
            <property name="f" type="file" value="file.txt"/>
            <property name="fl" type="float" value="4.2"/>
            <property name="i" type="int" value="-8"/>
            <property name="o" type="object" value="5"/>
            <property name="s" value="hello"/>
        </properties>"##;
        let p = read(&TmxReader::new(), xml).unwrap();
        assert_eq!(p.len(), 8);
        assert_eq!(p.get_bool("b"), Some(true));
        assert_eq!(p.value("c"), Some(&PropertyValue::Color(Color::rgba(0x55, 0xff, 0xff, 0xff))));
        assert_eq!(p.value("e"), Some(&PropertyValue::Color(Color::TRANSPARENT)));
        assert_eq!(p.value("f"), Some(&PropertyValue::File("file.txt".into())));
        assert_eq!(p.get_float("fl"), Some(4.2));
        assert_eq!(p.get_int("i"), Some(-8));
        assert_eq!(p.value("o"), Some(&PropertyValue::Object(5)));
        assert_eq!(p.get_string("s"), Some("hello"));
    }

    #[test]
    fn test_string_from_text_and_empty() {
        let xml = "<properties><property name=\"m\">one\ntwo</property><property name=\"e\"/></properties>";
        let p = read(&TmxReader::new(), xml).unwrap();
        assert_eq!(p.get_string("m"), Some("one\ntwo"));
        assert_eq!(p.get_string("e"), Some(""));
    }

    #[test]
    fn test_malformed_int() {
        let xml = r#"<properties><property name="i" type="int" value="4.5"/></properties>"#;
        assert!(matches!(read(&TmxReader::new(), xml), Err(Error::MalformedValue { .. })));
    }

    #[test]
    fn test_class_without_propertytype() {
        let xml = r#"<properties><property name="c" type="class"/></properties>"#;
        assert!(matches!(read(&TmxReader::new(), xml), Err(Error::GrammarViolation(_))));
    }

    #[test]
    fn test_known_class_defaults_then_overrides() {
        let reader = TmxReader::new().with_custom_types(registry());
        let xml = r#"<properties>
            <property name="stats" type="class" propertytype="Stats">
                <properties>
                    <property name="extra" type="bool" value="true"/>
                    <property name="hp" type="int" value="99"/>
                </properties>
            </property>
        </properties>"#;
        let p = read(&reader, xml).unwrap();
        let stats = p.get_class("stats").unwrap();
        assert_eq!(stats.names().collect::<Vec<_>>(), ["hp", "speed", "tag", "extra"]);
        assert_eq!(stats.get_int("hp"), Some(99));
        assert_eq!(stats.get_float("speed"), Some(1.5));
    }

    #[test]
    fn test_known_class_empty_element() {
        let reader = TmxReader::new().with_custom_types(registry());
        let xml = r#"<properties><property name="s" type="class" propertytype="Stats"/></properties>"#;
        let p = read(&reader, xml).unwrap();
        assert_eq!(p.get_class("s").unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_class_verbatim() {
        let xml = r#"<properties>
            <property name="x" type="class" propertytype="Nope">
                <properties><property name="only" type="int" value="1"/></properties>
            </property>
        </properties>"#;
        let p = read(&TmxReader::new(), xml).unwrap();
        let inner = p.get_class("x").unwrap();
        assert_eq!(inner.names().collect::<Vec<_>>(), ["only"]);
    }

    #[test]
    fn test_int_flag_enum() {
        let reader = TmxReader::new().with_custom_types(registry());
        let xml = r#"<properties><property name="f" type="int" propertytype="Flags" value="5"/></properties>"#;
        let p = read(&reader, xml).unwrap();
        assert_eq!(p.get_enum("f"), Some(&set(&["a", "c"])));
    }

    #[test]
    fn test_string_enum_rejects_comma_without_flags() {
        let reader = TmxReader::new().with_custom_types(registry());
        let ok = r#"<properties><property name="k" propertytype="Kind" value="orc"/></properties>"#;
        assert_eq!(read(&reader, ok).unwrap().get_enum("k"), Some(&set(&["orc"])));

        let bad = r#"<properties><property name="k" propertytype="Kind" value="orc,goblin"/></properties>"#;
        assert!(matches!(read(&reader, bad), Err(Error::MalformedValue { .. })));
    }

    #[test]
    fn test_unknown_enum_falls_back_to_plain() {
        let xml = r#"<properties>
            <property name="a" propertytype="Missing" value="x"/>
            <property name="b" type="int" propertytype="Missing" value="3"/>
        </properties>"#;
        let p = read(&TmxReader::new(), xml).unwrap();
        assert_eq!(p.get_string("a"), Some("x"));
        assert_eq!(p.get_int("b"), Some(3));
    }

    #[test]
    fn test_schema_mismatch() {
        let reader = TmxReader::new().with_custom_types(registry());
        let enum_as_class = r#"<properties><property name="x" type="class" propertytype="Kind"/></properties>"#;
        assert!(matches!(
            read(&reader, enum_as_class),
            Err(Error::SchemaMismatch { expected: "class", actual: "enum", .. })
        ));

        let class_as_enum = r#"<properties><property name="x" propertytype="Stats" value="a"/></properties>"#;
        assert!(matches!(
            read(&reader, class_as_enum),
            Err(Error::SchemaMismatch { expected: "enum", actual: "class", .. })
        ));
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let xml = r#"<properties>
            <property name="a" type="int" value="1"/>
            <property name="a" type="int" value="2"/>
        </properties>"#;
        let p = read(&TmxReader::new(), xml).unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.get_int("a"), Some(2));
    }
}
