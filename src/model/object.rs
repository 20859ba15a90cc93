//! Map objects and templates.

use glam::Vec2;

use super::{Properties, Tileset};
use crate::codec::FlipFlags;
use crate::util::Color;

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextHorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextHorizontalAlignment {
    pub const TOKENS: &'static [(&'static str, Self)] = &[
        ("left", Self::Left),
        ("center", Self::Center),
        ("right", Self::Right),
        ("justify", Self::Justify),
    ];
}

/// Vertical text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextVerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

impl TextVerticalAlignment {
    pub const TOKENS: &'static [(&'static str, Self)] =
        &[("top", Self::Top), ("center", Self::Center), ("bottom", Self::Bottom)];
}

/// Payload of a text object.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub font_family: String,
    pub pixel_size: i32,
    pub wrap: bool,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub kerning: bool,
    pub horizontal_alignment: TextHorizontalAlignment,
    pub vertical_alignment: TextVerticalAlignment,
    pub text: String,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            pixel_size: 16,
            wrap: false,
            color: Color::BLACK,
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            kerning: true,
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Top,
            text: String::new(),
        }
    }
}

/// Shape or kind of an object, selected by its marker child.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ObjectKind {
    #[default]
    Rectangle,
    Ellipse,
    Point,
    Polygon { points: Vec<Vec2> },
    Polyline { points: Vec<Vec2> },
    Text(Text),
    /// Tile object; `gid` has its flip bits cleared.
    Tile { gid: u32, flip: FlipFlags },
}

impl ObjectKind {
    /// Marker tag this kind is written as (`None` for implicit kinds).
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Self::Rectangle | Self::Tile { .. } => None,
            Self::Ellipse => Some("ellipse"),
            Self::Point => Some("point"),
            Self::Polygon { .. } => Some("polygon"),
            Self::Polyline { .. } => Some("polyline"),
            Self::Text(_) => Some("text"),
        }
    }

    /// Whether both kinds are the same variant, ignoring payload.
    pub fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A placed object.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub id: u32,
    pub name: String,
    /// Class name (`type` attribute).
    pub class: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub visible: bool,
    /// Template this object was instantiated from.
    pub template: Option<String>,
    pub properties: Properties,
    pub kind: ObjectKind,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            class: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            visible: true,
            template: None,
            properties: Properties::new(),
            kind: ObjectKind::Rectangle,
        }
    }
}

impl Object {
    /// Apply a freshly decoded object on top of the template object it
    /// references.
    ///
    /// Common fields come from `placed`; properties are merged with
    /// `placed` winning. The kind payload comes from `placed` only when both
    /// share a variant, otherwise the template's kind is kept.
    pub fn override_with(mut self, placed: Object) -> Object {
        self.id = placed.id;
        self.name = placed.name;
        self.class = placed.class;
        self.x = placed.x;
        self.y = placed.y;
        self.width = placed.width;
        self.height = placed.height;
        self.rotation = placed.rotation;
        self.visible = placed.visible;
        self.properties = self.properties.merge(&placed.properties);
        self.template = placed.template;

        if self.kind.same_variant(&placed.kind) {
            self.kind = placed.kind;
        }
        self
    }
}

/// Reusable object definition stored outside the map (`.tx`).
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub tileset: Option<Tileset>,
    pub object: Object,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Property, PropertyValue};

    fn polygon() -> ObjectKind {
        ObjectKind::Polygon { points: vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)] }
    }

    #[test]
    fn test_override_same_variant_takes_payload() {
        let template = Object { kind: polygon(), width: 5.0, ..Default::default() };
        let placed = Object {
            id: 3,
            kind: ObjectKind::Polygon { points: vec![Vec2::ONE] },
            ..Default::default()
        };
        let result = template.override_with(placed);
        assert_eq!(result.id, 3);
        assert_eq!(result.width, 0.0);
        assert_eq!(result.kind, ObjectKind::Polygon { points: vec![Vec2::ONE] });
    }

    #[test]
    fn test_override_different_variant_keeps_template_kind() {
        // A rectangle placement of a polygon template keeps the polygon.
        let template = Object { kind: polygon(), ..Default::default() };
        let placed = Object { id: 7, x: 10.0, kind: ObjectKind::Rectangle, ..Default::default() };
        let result = template.override_with(placed);
        assert_eq!(result.id, 7);
        assert_eq!(result.x, 10.0);
        assert_eq!(result.kind, polygon());
    }

    #[test]
    fn test_override_merges_properties() {
        let template = Object {
            properties: [
                Property::new("a", PropertyValue::Int(1)),
                Property::new("b", PropertyValue::Int(2)),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        let placed = Object {
            properties: [Property::new("b", PropertyValue::Int(20))].into_iter().collect(),
            ..Default::default()
        };
        let result = template.override_with(placed);
        assert_eq!(result.properties.get_int("a"), Some(1));
        assert_eq!(result.properties.get_int("b"), Some(20));
    }

    #[test]
    fn test_marker_names() {
        assert_eq!(ObjectKind::Rectangle.marker(), None);
        assert_eq!(ObjectKind::Text(Text::default()).marker(), Some("text"));
        assert!(ObjectKind::Ellipse.same_variant(&ObjectKind::Ellipse));
        assert!(!ObjectKind::Ellipse.same_variant(&ObjectKind::Point));
    }
}
