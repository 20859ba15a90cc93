//! Layer elements: `layer`, `objectgroup`, `imagelayer` and `group`.

use crate::document::{collect_children, process_children, skip, AtMostOnce, Attributes, Element};
use crate::model::{
    DrawOrder, GroupLayer, ImageLayer, Layer, LayerBase, ObjectLayer, Properties, TileLayer,
};
use crate::util::{Color, Result};

use super::data::read_data;
use super::tileset::read_image;
use super::TmxReader;

impl TmxReader<'_> {
    /// Decode a child element if its tag names a layer kind.
    pub(crate) fn read_layer<E: Element>(&self, element: E, tag: &str, infinite: bool) -> Result<Option<Layer>> {
        let layer = match tag {
            "layer" => Layer::Tile(self.read_tile_layer(element, infinite)?),
            "objectgroup" => Layer::Object(self.read_object_layer(element)?),
            "imagelayer" => Layer::Image(self.read_image_layer(element)?),
            "group" => Layer::Group(self.read_group(element, infinite)?),
            _ => return Ok(None),
        };
        Ok(Some(layer))
    }

    /// Shared layer attributes. `properties` holds the class defaults only.
    fn read_layer_base<E: Element>(&self, element: E) -> Result<LayerBase> {
        let defaults = LayerBase::default();
        let class: String = element.optional_or("class", String::new())?;
        Ok(LayerBase {
            id: element.required("id")?,
            name: element.optional_or("name", String::new())?,
            properties: self.class_properties(&class).unwrap_or_default(),
            class,
            opacity: element.optional_or("opacity", defaults.opacity)?,
            visible: element.optional_or("visible", defaults.visible)?,
            tint_color: element.optional::<Color>("tintcolor")?,
            offset_x: element.optional_or("offsetx", defaults.offset_x)?,
            offset_y: element.optional_or("offsety", defaults.offset_y)?,
            parallax_x: element.optional_or("parallaxx", defaults.parallax_x)?,
            parallax_y: element.optional_or("parallaxy", defaults.parallax_y)?,
        })
    }

    fn properties_slot(base: &mut LayerBase) -> AtMostOnce<Properties> {
        AtMostOnce::with_default("properties", std::mem::take(&mut base.properties))
    }

    fn read_tile_layer<E: Element>(&self, element: E, infinite: bool) -> Result<TileLayer> {
        let mut base = self.read_layer_base(element)?;
        let x = element.optional_or("x", 0)?;
        let y = element.optional_or("y", 0)?;
        let width = element.required("width")?;
        let height = element.required("height")?;

        let mut properties = Self::properties_slot(&mut base);
        let mut data = AtMostOnce::new("data");
        process_children(element, |child, tag| match tag {
            "properties" => self.merge_properties_section(&mut properties, child),
            "data" => data.set(read_data(child, infinite, width, height)?),
            _ => skip(child),
        })?;
        base.properties = properties.into_inner().unwrap_or_default();

        Ok(TileLayer { base, x, y, width, height, data: data.into_inner() })
    }

    /// Decode an `objectgroup`, either as a layer or as a tile's collision
    /// shapes.
    pub(crate) fn read_object_layer<E: Element>(&self, element: E) -> Result<ObjectLayer> {
        let mut base = self.read_layer_base(element)?;
        let x = element.optional_or("x", 0)?;
        let y = element.optional_or("y", 0)?;
        let width = element.optional_or("width", 0)?;
        let height = element.optional_or("height", 0)?;
        let color = element.optional::<Color>("color")?;
        let draw_order = element.optional_enum_or("draworder", DrawOrder::TOKENS, DrawOrder::TopDown)?;

        let mut properties = Self::properties_slot(&mut base);
        let mut objects = Vec::new();
        process_children(element, |child, tag| match tag {
            "properties" => self.merge_properties_section(&mut properties, child),
            "object" => {
                objects.push(self.read_object(child)?);
                Ok(())
            }
            _ => skip(child),
        })?;
        base.properties = properties.into_inner().unwrap_or_default();

        Ok(ObjectLayer { base, x, y, width, height, color, draw_order, objects })
    }

    fn read_image_layer<E: Element>(&self, element: E) -> Result<ImageLayer> {
        let mut base = self.read_layer_base(element)?;
        let x = element.optional_or("x", 0)?;
        let y = element.optional_or("y", 0)?;
        let repeat_x = element.optional_or("repeatx", false)?;
        let repeat_y = element.optional_or("repeaty", false)?;

        let mut properties = Self::properties_slot(&mut base);
        let mut image = AtMostOnce::new("image");
        process_children(element, |child, tag| match tag {
            "properties" => self.merge_properties_section(&mut properties, child),
            "image" => image.set(read_image(child)?),
            _ => skip(child),
        })?;
        base.properties = properties.into_inner().unwrap_or_default();

        Ok(ImageLayer { base, x, y, repeat_x, repeat_y, image: image.into_inner() })
    }

    /// Nested tile layers decode their data with the map's `infinite` flag.
    fn read_group<E: Element>(&self, element: E, infinite: bool) -> Result<GroupLayer> {
        let mut base = self.read_layer_base(element)?;

        let mut properties = Self::properties_slot(&mut base);
        let layers = collect_children(element, |child, tag| {
            if tag == "properties" {
                self.merge_properties_section(&mut properties, child)?;
                return Ok(None);
            }
            let layer = self.read_layer(child, tag, infinite)?;
            if layer.is_none() {
                skip(child)?;
            }
            Ok(layer)
        })?;
        base.properties = properties.into_inner().unwrap_or_default();

        Ok(GroupLayer { base, layers })
    }
}
