//! Layers: tile, object, image and group.

use super::{Image, Object, Properties};
use crate::codec::{DataCompression, DataEncoding, TileRef};
use crate::util::Color;

/// Fields shared by every layer kind.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerBase {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub opacity: f32,
    pub visible: bool,
    pub tint_color: Option<Color>,
    pub offset_x: f32,
    pub offset_y: f32,
    pub parallax_x: f32,
    pub parallax_y: f32,
    pub properties: Properties,
}

impl Default for LayerBase {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            class: String::new(),
            opacity: 1.0,
            visible: true,
            tint_color: None,
            offset_x: 0.0,
            offset_y: 0.0,
            parallax_x: 1.0,
            parallax_y: 1.0,
            properties: Properties::new(),
        }
    }
}

/// Rectangular block of an infinite map's tile data.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Row-major; always `width * height` entries.
    pub tiles: Vec<TileRef>,
}

impl Chunk {
    /// Tile at chunk-local coordinates.
    pub fn get(&self, x: u32, y: u32) -> Option<TileRef> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize).copied()
    }
}

/// Decoded cells of a tile layer.
#[derive(Clone, Debug, PartialEq)]
pub enum DataContent {
    /// Row-major grid covering the whole layer.
    Tiles(Vec<TileRef>),
    /// Independently positioned chunks (infinite maps).
    Chunks(Vec<Chunk>),
}

/// The `data` element of a tile layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Data {
    /// None when the data was written as `tile` children.
    pub encoding: Option<DataEncoding>,
    pub compression: Option<DataCompression>,
    pub content: DataContent,
}

impl Data {
    /// Whole-layer grid, if the data is not chunked.
    pub fn tiles(&self) -> Option<&[TileRef]> {
        match &self.content {
            DataContent::Tiles(tiles) => Some(tiles),
            DataContent::Chunks(_) => None,
        }
    }

    /// Chunks, if the data is chunked.
    pub fn chunks(&self) -> Option<&[Chunk]> {
        match &self.content {
            DataContent::Chunks(chunks) => Some(chunks),
            DataContent::Tiles(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    pub base: LayerBase,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub data: Option<Data>,
}

impl TileLayer {
    /// Tile at layer coordinates (finite maps only).
    pub fn get(&self, x: u32, y: u32) -> Option<TileRef> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let tiles = self.data.as_ref()?.tiles()?;
        tiles.get((y * self.width + x) as usize).copied()
    }
}

/// Rendering order of objects in an object layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawOrder {
    #[default]
    TopDown,
    Index,
}

impl DrawOrder {
    pub const TOKENS: &'static [(&'static str, Self)] = &[("topdown", Self::TopDown), ("index", Self::Index)];
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectLayer {
    pub base: LayerBase,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color: Option<Color>,
    pub draw_order: DrawOrder,
    pub objects: Vec<Object>,
}

impl ObjectLayer {
    /// Find an object by id.
    pub fn object(&self, id: u32) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageLayer {
    pub base: LayerBase,
    pub x: i32,
    pub y: i32,
    pub repeat_x: bool,
    pub repeat_y: bool,
    pub image: Option<Image>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupLayer {
    pub base: LayerBase,
    pub layers: Vec<Layer>,
}

/// Any layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Tile(TileLayer),
    Object(ObjectLayer),
    Image(ImageLayer),
    Group(GroupLayer),
}

impl Layer {
    /// Shared fields.
    pub fn base(&self) -> &LayerBase {
        match self {
            Self::Tile(l) => &l.base,
            Self::Object(l) => &l.base,
            Self::Image(l) => &l.base,
            Self::Group(l) => &l.base,
        }
    }

    pub fn id(&self) -> u32 {
        self.base().id
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn properties(&self) -> &Properties {
        &self.base().properties
    }

    /// This layer and every nested layer, depth first in document order.
    pub fn walk(&self) -> Vec<&Layer> {
        let mut out = vec![self];
        if let Self::Group(group) = self {
            for child in &group.layers {
                out.extend(child.walk());
            }
        }
        out
    }

    pub fn as_tile_layer(&self) -> Option<&TileLayer> {
        match self {
            Self::Tile(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_object_layer(&self) -> Option<&ObjectLayer> {
        match self {
            Self::Object(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_image_layer(&self) -> Option<&ImageLayer> {
        match self {
            Self::Image(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupLayer> {
        match self {
            Self::Group(l) => Some(l),
            _ => None,
        }
    }
}
