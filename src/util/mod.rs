//! Utility types shared by every layer of the reader.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`Color`] - RGBA colors as written in TMX attributes

mod color;
mod error;

pub use color::*;
pub use error::*;
