//! Tilesets and everything they contain.

use smallvec::SmallVec;

use super::{ObjectLayer, Properties};
use crate::util::Color;

/// Image file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpg,
    Bmp,
    Gif,
}

impl ImageFormat {
    pub const TOKENS: &'static [(&'static str, Self)] =
        &[("png", Self::Png), ("jpg", Self::Jpg), ("bmp", Self::Bmp), ("gif", Self::Gif)];

    /// Guess the format from a file name's extension.
    pub fn from_source(source: &str) -> Option<Self> {
        let ext = source.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

/// Image reference (or embedded image bytes).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    pub format: Option<ImageFormat>,
    pub source: Option<String>,
    pub transparent_color: Option<Color>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Decoded bytes of an embedded `data` child.
    pub data: Option<Vec<u8>>,
}

/// Drawing offset applied to every tile of a tileset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TileOffset {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GridOrientation {
    #[default]
    Orthogonal,
    Isometric,
}

impl GridOrientation {
    pub const TOKENS: &'static [(&'static str, Self)] =
        &[("orthogonal", Self::Orthogonal), ("isometric", Self::Isometric)];
}

/// Grid used for tile-object snapping in a tileset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub orientation: GridOrientation,
    pub width: u32,
    pub height: u32,
}

/// Transformations allowed when painting with the tileset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transformations {
    pub hflip: bool,
    pub vflip: bool,
    pub rotate: bool,
    pub prefer_untransformed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObjectAlignment {
    #[default]
    Unspecified,
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl ObjectAlignment {
    pub const TOKENS: &'static [(&'static str, Self)] = &[
        ("unspecified", Self::Unspecified),
        ("topleft", Self::TopLeft),
        ("top", Self::Top),
        ("topright", Self::TopRight),
        ("left", Self::Left),
        ("center", Self::Center),
        ("right", Self::Right),
        ("bottomleft", Self::BottomLeft),
        ("bottom", Self::Bottom),
        ("bottomright", Self::BottomRight),
    ];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileRenderSize {
    #[default]
    Tile,
    Grid,
}

impl TileRenderSize {
    pub const TOKENS: &'static [(&'static str, Self)] = &[("tile", Self::Tile), ("grid", Self::Grid)];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillMode {
    #[default]
    Stretch,
    PreserveAspectFit,
}

impl FillMode {
    pub const TOKENS: &'static [(&'static str, Self)] =
        &[("stretch", Self::Stretch), ("preserve-aspect-fit", Self::PreserveAspectFit)];
}

/// One animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Local tile id within the tileset.
    pub tile_id: u32,
    /// Milliseconds.
    pub duration: u32,
}

/// Per-tile data inside a tileset.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub id: u32,
    pub class: String,
    pub probability: f32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub properties: Properties,
    pub image: Option<Image>,
    /// Collision shapes.
    pub object_layer: Option<ObjectLayer>,
    pub animation: Vec<Frame>,
}

/// Up to 8 color indices: top, top-right, right, ... clockwise.
pub type WangId = SmallVec<[u8; 8]>;

/// Maximum number of colors in one Wang set.
pub const MAX_WANG_COLORS: usize = 254;

#[derive(Clone, Debug, PartialEq)]
pub struct WangColor {
    pub name: String,
    pub class: String,
    pub color: Color,
    pub tile: i32,
    pub probability: f32,
    pub properties: Properties,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WangTile {
    pub tile_id: u32,
    pub wang_id: WangId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wangset {
    pub name: String,
    pub class: String,
    pub tile: i32,
    pub properties: Properties,
    pub colors: Vec<WangColor>,
    pub tiles: Vec<WangTile>,
}

/// A tileset, either defined inline or loaded from an external source.
#[derive(Clone, Debug, PartialEq)]
pub struct Tileset {
    pub version: Option<String>,
    pub tiled_version: Option<String>,
    /// First global id, when referenced from a map.
    pub first_gid: Option<u32>,
    /// External source path, when loaded by reference.
    pub source: Option<String>,
    pub name: String,
    pub class: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub tile_count: u32,
    pub columns: u32,
    pub object_alignment: ObjectAlignment,
    pub render_size: TileRenderSize,
    pub fill_mode: FillMode,
    pub image: Option<Image>,
    pub tile_offset: Option<TileOffset>,
    pub grid: Option<Grid>,
    pub properties: Properties,
    pub wangsets: Vec<Wangset>,
    pub transformations: Option<Transformations>,
    pub tiles: Vec<Tile>,
}

impl Tileset {
    /// Per-tile data for a local id.
    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Whether a global id (flip bits cleared) falls inside this tileset.
    pub fn contains_gid(&self, gid: u32) -> bool {
        match self.first_gid {
            Some(first) => gid >= first && gid - first < self.tile_count,
            None => false,
        }
    }
}
