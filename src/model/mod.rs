//! In-memory object model of maps, tilesets and templates.
//!
//! Everything here is plain data produced once by the readers in
//! [`crate::tmx`]:
//! - [`Map`] - the root, owning [`Layer`]s and [`Tileset`]s
//! - [`Layer`] - tile / object / image / group layers
//! - [`Object`] / [`ObjectKind`] / [`Template`] - placed objects
//! - [`Properties`] - ordered, name-indexed custom properties
//! - [`CustomTypeDefinition`] - class and enum schemas

mod custom_types;
mod layer;
mod map;
mod object;
mod property;
mod tileset;

pub use custom_types::*;
pub use layer::*;
pub use map::*;
pub use object::*;
pub use property::*;
pub use tileset::*;
