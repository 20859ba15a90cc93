//! Tile data decoding.
//!
//! A layer's tile references are stored either as CSV text or as a base64
//! blob of little-endian `u32`s, the latter optionally compressed with
//! gzip, zlib or zstd. Decoding always ends with the GID split from
//! [`super::gid`].

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use byteorder::{ByteOrder, LittleEndian};
use flate2::read::{GzDecoder, ZlibDecoder};

use super::TileRef;
use crate::util::{Error, Result};

/// Text framing of a `data` element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataEncoding {
    Csv,
    Base64,
}

impl DataEncoding {
    pub const TOKENS: &'static [(&'static str, Self)] = &[("csv", Self::Csv), ("base64", Self::Base64)];
}

/// Compression applied to base64-framed data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataCompression {
    Gzip,
    Zlib,
    Zstd,
}

impl DataCompression {
    pub const TOKENS: &'static [(&'static str, Self)] =
        &[("gzip", Self::Gzip), ("zlib", Self::Zlib), ("zstd", Self::Zstd)];
}

// ============================================================================
// Text framings
// ============================================================================

/// Parse comma-separated decimal references. Whitespace and line breaks
/// around values are ignored, as is a trailing comma.
pub fn decode_csv(text: &str) -> Result<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u32>()
                .map_err(|_| Error::corrupt(format!("invalid CSV tile reference '{token}'")))
        })
        .collect()
}

/// Decode base64 text, ignoring embedded whitespace.
pub fn base64_bytes(text: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}

/// Decompress a byte blob.
pub fn decompress(data: &[u8], compression: DataCompression) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 4);
    match compression {
        DataCompression::Gzip => {
            GzDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| Error::corrupt(format!("gzip: {e}")))?;
        }
        DataCompression::Zlib => {
            ZlibDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| Error::corrupt(format!("zlib: {e}")))?;
        }
        DataCompression::Zstd => {
            out = decompress_zstd(data)?;
        }
    }
    Ok(out)
}

#[cfg(feature = "zstd")]
fn decompress_zstd(data: &[u8]) -> Result<Vec<u8>> {
    zstd::stream::decode_all(data).map_err(|e| Error::corrupt(format!("zstd: {e}")))
}

#[cfg(not(feature = "zstd"))]
fn decompress_zstd(_data: &[u8]) -> Result<Vec<u8>> {
    Err(Error::corrupt("zstd compressed data requires the `zstd` feature"))
}

/// Reinterpret a byte blob as little-endian `u32` references.
pub fn bytes_to_gids(bytes: &[u8]) -> Result<Vec<u32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::corrupt(format!(
            "binary tile data length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    let mut gids = vec![0u32; bytes.len() / 4];
    LittleEndian::read_u32_into(bytes, &mut gids);
    Ok(gids)
}

// ============================================================================
// Entry points
// ============================================================================

/// Decode the text body of a `data` or `chunk` element into raw references.
pub fn decode_raw(
    text: &str,
    encoding: DataEncoding,
    compression: Option<DataCompression>,
) -> Result<Vec<u32>> {
    match (encoding, compression) {
        (DataEncoding::Csv, None) => decode_csv(text),
        (DataEncoding::Csv, Some(c)) => Err(Error::corrupt(format!(
            "{c:?} compression cannot be combined with CSV encoding"
        ))),
        (DataEncoding::Base64, compression) => {
            let bytes = base64_bytes(text).map_err(|e| Error::corrupt(format!("base64: {e}")))?;
            match compression {
                Some(c) => bytes_to_gids(&decompress(&bytes, c)?),
                None => bytes_to_gids(&bytes),
            }
        }
    }
}

/// Split every raw reference into id and flags.
pub fn split_all(raw: &[u32]) -> Vec<TileRef> {
    raw.iter().copied().map(TileRef::from_raw).collect()
}

/// Check a decoded grid against its declared dimensions.
pub fn check_len(tiles: &[TileRef], width: u32, height: u32) -> Result<()> {
    let expected = width as u64 * height as u64;
    if tiles.len() as u64 != expected {
        return Err(Error::corrupt(format!(
            "expected {width}x{height} = {expected} tile references, found {}",
            tiles.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FlipFlags;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    fn le_bytes(gids: &[u32]) -> Vec<u8> {
        gids.iter().flat_map(|g| g.to_le_bytes()).collect()
    }

    #[test]
    fn test_csv_with_line_breaks() {
        let text = "\n1,2,3,\n4,5,6\n";
        assert_eq!(decode_csv(text).unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_csv_rejects_garbage() {
        assert!(matches!(decode_csv("1,x,3"), Err(Error::CorruptTileData(_))));
    }

    #[test]
    fn test_base64_uncompressed() {
        let gids = [1u32, 0x8000_0002, 3, 0];
        let text = format!("\n   {}\n  ", STANDARD.encode(le_bytes(&gids)));
        let raw = decode_raw(&text, DataEncoding::Base64, None).unwrap();
        assert_eq!(raw, gids);
        let tiles = split_all(&raw);
        assert_eq!(tiles[1], TileRef { gid: 2, flip: FlipFlags::HORIZONTAL });
    }

    #[test]
    fn test_base64_zlib_and_gzip() {
        let gids: Vec<u32> = (0..64).collect();
        let bytes = le_bytes(&gids);

        let mut z = ZlibEncoder::new(Vec::new(), Compression::default());
        z.write_all(&bytes).unwrap();
        let zlib = STANDARD.encode(z.finish().unwrap());
        assert_eq!(decode_raw(&zlib, DataEncoding::Base64, Some(DataCompression::Zlib)).unwrap(), gids);

        let mut g = GzEncoder::new(Vec::new(), Compression::default());
        g.write_all(&bytes).unwrap();
        let gzip = STANDARD.encode(g.finish().unwrap());
        assert_eq!(decode_raw(&gzip, DataEncoding::Base64, Some(DataCompression::Gzip)).unwrap(), gids);
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn test_base64_zstd() {
        let gids: Vec<u32> = (100..140).collect();
        let compressed = zstd::stream::encode_all(&le_bytes(&gids)[..], 3).unwrap();
        let text = STANDARD.encode(compressed);
        assert_eq!(decode_raw(&text, DataEncoding::Base64, Some(DataCompression::Zstd)).unwrap(), gids);
    }

    #[test]
    fn test_corrupt_compressed_stream() {
        let text = STANDARD.encode(b"definitely not zlib");
        let err = decode_raw(&text, DataEncoding::Base64, Some(DataCompression::Zlib)).unwrap_err();
        assert!(matches!(err, Error::CorruptTileData(_)));
    }

    #[test]
    fn test_truncated_binary() {
        let text = STANDARD.encode([1u8, 0, 0]);
        assert!(matches!(
            decode_raw(&text, DataEncoding::Base64, None),
            Err(Error::CorruptTileData(_))
        ));
    }

    #[test]
    fn test_csv_with_compression_rejected() {
        assert!(decode_raw("1,2", DataEncoding::Csv, Some(DataCompression::Gzip)).is_err());
    }

    #[test]
    fn test_check_len() {
        let tiles = vec![TileRef::EMPTY; 6];
        assert!(check_len(&tiles, 3, 2).is_ok());
        assert!(matches!(check_len(&tiles, 3, 3), Err(Error::CorruptTileData(_))));
    }
}
