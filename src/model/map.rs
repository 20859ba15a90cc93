//! The map root.

use super::{Layer, Properties, Tileset};
use crate::util::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

impl Orientation {
    pub const TOKENS: &'static [(&'static str, Self)] = &[
        ("orthogonal", Self::Orthogonal),
        ("isometric", Self::Isometric),
        ("staggered", Self::Staggered),
        ("hexagonal", Self::Hexagonal),
    ];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

impl RenderOrder {
    pub const TOKENS: &'static [(&'static str, Self)] = &[
        ("right-down", Self::RightDown),
        ("right-up", Self::RightUp),
        ("left-down", Self::LeftDown),
        ("left-up", Self::LeftUp),
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StaggerAxis {
    X,
    Y,
}

impl StaggerAxis {
    pub const TOKENS: &'static [(&'static str, Self)] = &[("x", Self::X), ("y", Self::Y)];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StaggerIndex {
    Odd,
    Even,
}

impl StaggerIndex {
    pub const TOKENS: &'static [(&'static str, Self)] = &[("odd", Self::Odd), ("even", Self::Even)];
}

/// A decoded map.
///
/// `next_layer_id` and `next_object_id` are stored as written; they are not
/// checked against the ids actually present.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    pub version: String,
    pub tiled_version: Option<String>,
    pub class: String,
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    /// -1 means the format default.
    pub compression_level: i32,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub hex_side_length: Option<i32>,
    pub stagger_axis: Option<StaggerAxis>,
    pub stagger_index: Option<StaggerIndex>,
    pub parallax_origin_x: f32,
    pub parallax_origin_y: f32,
    pub background_color: Color,
    pub next_layer_id: u32,
    pub next_object_id: u32,
    pub infinite: bool,
    pub properties: Properties,
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<Layer>,
}

impl Map {
    /// Tileset a global id (flip bits cleared) belongs to: the one with the
    /// greatest `first_gid` not exceeding it.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .filter(|ts| ts.first_gid.is_some_and(|first| first <= gid))
            .max_by_key(|ts| ts.first_gid)
    }

    /// Every layer including nested ones, depth first in document order.
    pub fn all_layers(&self) -> Vec<&Layer> {
        self.layers.iter().flat_map(|l| l.walk()).collect()
    }

    /// Find a layer (at any depth) by name.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.all_layers().into_iter().find(|l| l.name() == name)
    }
}
