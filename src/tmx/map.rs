//! The `map` root element.

use tracing::debug;

use crate::document::{process_children, skip, AtMostOnce, Attributes, Element};
use crate::model::{Map, Orientation, RenderOrder, StaggerAxis, StaggerIndex};
use crate::util::{Color, Result};

use super::{expect_tag, TmxReader};

impl TmxReader<'_> {
    /// Decode a map document (`.tmx`).
    pub fn read_map<E: Element>(&self, element: E) -> Result<Map> {
        expect_tag(element, "map")?;

        let version: String = element.required("version")?;
        let tiled_version: Option<String> = element.optional("tiledversion")?;
        let class: String = element.optional_or("class", String::new())?;
        let orientation = element.required_enum("orientation", Orientation::TOKENS)?;
        let render_order = element.optional_enum_or("renderorder", RenderOrder::TOKENS, RenderOrder::RightDown)?;
        let compression_level = element.optional_or("compressionlevel", -1)?;
        let width: u32 = element.required("width")?;
        let height: u32 = element.required("height")?;
        let tile_width = element.required("tilewidth")?;
        let tile_height = element.required("tileheight")?;
        let hex_side_length = element.optional("hexsidelength")?;
        let stagger_axis = element.optional_enum("staggeraxis", StaggerAxis::TOKENS)?;
        let stagger_index = element.optional_enum("staggerindex", StaggerIndex::TOKENS)?;
        let parallax_origin_x = element.optional_or("parallaxoriginx", 0.0)?;
        let parallax_origin_y = element.optional_or("parallaxoriginy", 0.0)?;
        let background_color = element.optional_or("backgroundcolor", Color::TRANSPARENT)?;
        let next_layer_id = element.required("nextlayerid")?;
        let next_object_id = element.required("nextobjectid")?;
        let infinite: bool = element.optional_or("infinite", false)?;

        let mut properties =
            AtMostOnce::with_default("properties", self.class_properties(&class).unwrap_or_default());
        let mut tilesets = Vec::new();
        let mut layers = Vec::new();

        process_children(element, |child, tag| {
            match tag {
                "properties" => self.merge_properties_section(&mut properties, child)?,
                "tileset" => tilesets.push(self.read_tileset_element(
                    child,
                    Some(version.as_str()),
                    tiled_version.as_deref(),
                )?),
                _ => match self.read_layer(child, tag, infinite)? {
                    Some(layer) => layers.push(layer),
                    None => skip(child)?,
                },
            }
            Ok(())
        })?;

        debug!(
            version = %version,
            width,
            height,
            infinite,
            tilesets = tilesets.len(),
            layers = layers.len(),
            "decoded map"
        );

        Ok(Map {
            version,
            tiled_version,
            class,
            orientation,
            render_order,
            compression_level,
            width,
            height,
            tile_width,
            tile_height,
            hex_side_length,
            stagger_axis,
            stagger_index,
            parallax_origin_x,
            parallax_origin_y,
            background_color,
            next_layer_id,
            next_object_id,
            infinite,
            properties: properties.into_inner().unwrap_or_default(),
            tilesets,
            layers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomClassDefinition, CustomTypeRegistry, Property, PropertyValue};
    use crate::util::Error;

    const MINIMAL: &str = r#"<map version="1.10" orientation="orthogonal" width="2" height="2"
        tilewidth="16" tileheight="16" nextlayerid="2" nextobjectid="1">
        <layer id="1" name="l" width="2" height="2"><data encoding="csv">0,0,0,0</data></layer>
    </map>"#;

    #[test]
    fn test_defaults() {
        let map = TmxReader::new().read_map_str(MINIMAL).unwrap();
        assert_eq!(map.render_order, RenderOrder::RightDown);
        assert_eq!(map.compression_level, -1);
        assert_eq!(map.background_color, Color::TRANSPARENT);
        assert!(!map.infinite);
        assert_eq!(map.tiled_version, None);
        assert_eq!(map.layers.len(), 1);
        assert!(map.properties.is_empty());
    }

    #[test]
    fn test_wrong_root() {
        let err = TmxReader::new().read_map_str("<tileset/>").unwrap_err();
        assert!(matches!(err, Error::GrammarViolation(_)));
    }

    #[test]
    fn test_invalid_xml() {
        assert!(matches!(TmxReader::new().read_map_str("<map"), Err(Error::Xml(_))));
    }

    #[test]
    fn test_unknown_orientation() {
        let xml = MINIMAL.replace("orthogonal", "spherical");
        let err = TmxReader::new().read_map_str(&xml).unwrap_err();
        assert!(matches!(err, Error::UnknownEnumToken { ref value, .. } if value == "spherical"));
    }

    #[test]
    fn test_hexagonal_attributes() {
        let xml = MINIMAL
            .replace("orthogonal", "hexagonal")
            .replace("nextlayerid", r#"hexsidelength="8" staggeraxis="y" staggerindex="odd" nextlayerid"#);
        let map = TmxReader::new().read_map_str(&xml).unwrap();
        assert_eq!(map.orientation, Orientation::Hexagonal);
        assert_eq!(map.hex_side_length, Some(8));
        assert_eq!(map.stagger_axis, Some(StaggerAxis::Y));
        assert_eq!(map.stagger_index, Some(StaggerIndex::Odd));
    }

    #[test]
    fn test_duplicate_properties() {
        let xml = MINIMAL.replace(
            "<layer",
            "<properties/><properties/><layer",
        );
        let err = TmxReader::new().read_map_str(&xml).unwrap_err();
        assert!(matches!(err, Error::DuplicateElement(ref s) if s == "properties"));
    }

    #[test]
    fn test_class_defaults_merged() {
        let registry: CustomTypeRegistry = [CustomClassDefinition::new(
            "Level",
            vec![
                Property::new("music", PropertyValue::File("theme.ogg".into())),
                Property::new("dark", PropertyValue::Bool(false)),
            ],
        )]
        .into_iter()
        .collect();
        let xml = MINIMAL.replace("<map ", r#"<map class="Level" "#).replace(
            "<layer",
            r#"<properties><property name="dark" type="bool" value="true"/></properties><layer"#,
        );
        let map = TmxReader::new().with_custom_types(registry).read_map_str(&xml).unwrap();
        assert_eq!(map.class, "Level");
        assert_eq!(map.properties.names().collect::<Vec<_>>(), ["music", "dark"]);
        assert_eq!(map.properties.get_bool("dark"), Some(true));
    }
}
