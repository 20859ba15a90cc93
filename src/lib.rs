//! # tmx
//!
//! Reader for Tiled map editor documents: maps (`.tmx`), tilesets (`.tsx`)
//! and object templates (`.tx`), decoded into an owned in-memory model.
//!
//! ## Modules
//!
//! - [`util`] - Errors and colors
//! - [`document`] - Structured reader boundary, attribute decoding, child traversal
//! - [`codec`] - Tile data: GID flip flags, CSV / base64, gzip / zlib / zstd
//! - [`model`] - Map, layers, tilesets, objects, properties, custom types
//! - [`tmx`] - The readers ([`TmxReader`])
//! - [`project`] - Custom types from a Tiled project file
//!
//! ## Example
//!
//! ```ignore
//! use tmx::prelude::*;
//!
//! let registry = tmx::project::load_project("game.tiled-project")?;
//! let reader = TmxReader::new()
//!     .with_custom_types(registry)
//!     .with_tileset_resolver(|source| {
//!         TmxReader::new().read_tileset_str(&std::fs::read_to_string(source)?)
//!     });
//!
//! let map = reader.read_map_str(&std::fs::read_to_string("level.tmx")?)?;
//! for layer in map.all_layers() {
//!     println!("{} {}", layer.id(), layer.name());
//! }
//! ```

pub mod util;
pub mod document;
pub mod codec;
pub mod model;
pub mod tmx;
pub mod project;

// Re-export commonly used types
pub use util::{Color, Error, Result};
pub use tmx::TmxReader;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Color, Error, Result};
    pub use crate::codec::{DataCompression, DataEncoding, FlipFlags, TileRef};
    pub use crate::model::*;
    pub use crate::tmx::TmxReader;
}
