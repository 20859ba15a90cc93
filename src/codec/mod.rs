//! Tile data codec.
//!
//! - [`gid`] - flip-flag bit layout, [`split_gid`] / [`combine_gid`], [`TileRef`]
//! - [`tile_data`] - CSV / base64 framings and gzip / zlib / zstd compression

pub mod gid;
pub mod tile_data;

pub use gid::*;
pub use tile_data::{
    base64_bytes, check_len, decode_csv, decode_raw, decompress, split_all, DataCompression,
    DataEncoding,
};
