//! Objects, their shape markers, and object templates.

use glam::Vec2;

use crate::codec::{combine_gid, split_gid};
use crate::document::{process_children, skip, AtMostOnce, Attributes, Element};
use crate::model::{
    Object, ObjectKind, Template, Text, TextHorizontalAlignment, TextVerticalAlignment,
};
use crate::util::{Error, Result};

use super::{expect_tag, TmxReader};

impl TmxReader<'_> {
    /// Decode a template document (`.tx`).
    pub fn read_template<E: Element>(&self, element: E) -> Result<Template> {
        expect_tag(element, "template")?;

        let mut tileset = AtMostOnce::new("tileset");
        let mut object = AtMostOnce::new("object");
        process_children(element, |child, tag| match tag {
            "tileset" => tileset.set(self.read_tileset_element(child, None, None)?),
            "object" => object.set(self.read_object(child)?),
            _ => skip(child),
        })?;

        let object = object
            .into_inner()
            .ok_or_else(|| Error::grammar("template has no object"))?;
        Ok(Template { tileset: tileset.into_inner(), object })
    }

    /// Decode an `object` element.
    ///
    /// When the object names a template, the template's object supplies the
    /// defaults for every absent attribute and the result is the template
    /// object overridden by the decoded one.
    pub(crate) fn read_object<E: Element>(&self, element: E) -> Result<Object> {
        let template_path: Option<String> = element.optional("template")?;
        let template = match template_path.as_deref() {
            Some(path) => Some(self.resolve_template(path)?.object),
            None => None,
        };
        let defaults = template.clone().unwrap_or_default();

        let template_gid = match defaults.kind {
            ObjectKind::Tile { gid, flip } => Some(combine_gid(gid, flip)),
            _ => None,
        };
        let class = match element.optional::<String>("type")? {
            Some(class) => class,
            None => element.optional_or("class", defaults.class)?,
        };

        let id = element.optional_or("id", defaults.id)?;
        let name = element.optional_or("name", defaults.name)?;
        let x = element.optional_or("x", defaults.x)?;
        let y = element.optional_or("y", defaults.y)?;
        let width = element.optional_or("width", defaults.width)?;
        let height = element.optional_or("height", defaults.height)?;
        let rotation = element.optional_or("rotation", defaults.rotation)?;
        let gid = element.optional::<u32>("gid")?.or(template_gid);
        let visible = element.optional_or("visible", defaults.visible)?;

        let initial = self.class_properties(&class).unwrap_or(defaults.properties);
        let mut properties = AtMostOnce::with_default("properties", initial);
        let mut marker = AtMostOnce::new("object marker");

        process_children(element, |child, tag| match tag {
            "properties" => self.merge_properties_section(&mut properties, child),
            "ellipse" => marker.set(ObjectKind::Ellipse),
            "point" => marker.set(ObjectKind::Point),
            "polygon" => marker.set(ObjectKind::Polygon { points: read_points(child)? }),
            "polyline" => marker.set(ObjectKind::Polyline { points: read_points(child)? }),
            "text" => marker.set(ObjectKind::Text(read_text(child)?)),
            other => Err(Error::UnknownMarker(other.to_string())),
        })?;

        let kind = match (marker.into_inner(), gid) {
            (Some(kind), _) => kind,
            (None, Some(raw)) => {
                let (gid, flip) = split_gid(raw);
                ObjectKind::Tile { gid, flip }
            }
            (None, None) => ObjectKind::Rectangle,
        };

        let placed = Object {
            id,
            name,
            class,
            x,
            y,
            width,
            height,
            rotation,
            visible,
            template: template_path,
            properties: properties.into_inner().unwrap_or_default(),
            kind,
        };

        Ok(match template {
            Some(template) => template.override_with(placed),
            None => placed,
        })
    }
}

/// `points="x1,y1 x2,y2 ..."`
fn read_points<E: Element>(element: E) -> Result<Vec<Vec2>> {
    element.required_with("points", "point list", parse_points)
}

fn parse_points(raw: &str) -> Option<Vec<Vec2>> {
    raw.split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',')?;
            Some(Vec2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
        })
        .collect()
}

fn read_text<E: Element>(element: E) -> Result<Text> {
    let defaults = Text::default();
    Ok(Text {
        font_family: element.optional_or("fontfamily", defaults.font_family)?,
        pixel_size: element.optional_or("pixelsize", defaults.pixel_size)?,
        wrap: element.optional_or("wrap", defaults.wrap)?,
        color: element.optional_or("color", defaults.color)?,
        bold: element.optional_or("bold", defaults.bold)?,
        italic: element.optional_or("italic", defaults.italic)?,
        underline: element.optional_or("underline", defaults.underline)?,
        strikeout: element.optional_or("strikeout", defaults.strikeout)?,
        kerning: element.optional_or("kerning", defaults.kerning)?,
        horizontal_alignment: element.optional_enum_or(
            "halign",
            TextHorizontalAlignment::TOKENS,
            defaults.horizontal_alignment,
        )?,
        vertical_alignment: element.optional_enum_or(
            "valign",
            TextVerticalAlignment::TOKENS,
            defaults.vertical_alignment,
        )?,
        text: element.text_content().into_owned(),
    })
}
