//! Low-level document access.
//!
//! This layer knows nothing about maps. It provides:
//! - [`Element`] - the structured-reader capability (implemented for roxmltree)
//! - [`Attributes`] - typed required/optional attribute decoding
//! - [`process_children`] / [`collect_children`] / [`read_list`] - traversal
//! - [`AtMostOnce`] - "at most once" section slots

mod attributes;
mod element;
mod traverse;

pub use attributes::*;
pub use element::*;
pub use traverse::*;
