//! Tile layer `data` and `chunk` elements.

use crate::codec::{check_len, decode_raw, split_all, DataCompression, DataEncoding, TileRef};
use crate::document::{read_list, Attributes, Element};
use crate::model::{Chunk, Data, DataContent};
use crate::util::Result;

/// Decode a layer's `data` element. Infinite maps store chunks, finite maps
/// a single grid of exactly `width * height` cells.
pub(crate) fn read_data<E: Element>(element: E, infinite: bool, width: u32, height: u32) -> Result<Data> {
    let encoding = element.optional_enum("encoding", DataEncoding::TOKENS)?;
    let compression = element.optional_enum("compression", DataCompression::TOKENS)?;

    let content = if infinite {
        DataContent::Chunks(read_list(element, "chunk", |c| read_chunk(c, encoding, compression))?)
    } else {
        let tiles = read_cells(element, encoding, compression)?;
        check_len(&tiles, width, height)?;
        DataContent::Tiles(tiles)
    };

    Ok(Data { encoding, compression, content })
}

fn read_chunk<E: Element>(
    element: E,
    encoding: Option<DataEncoding>,
    compression: Option<DataCompression>,
) -> Result<Chunk> {
    let x = element.required("x")?;
    let y = element.required("y")?;
    let width = element.required("width")?;
    let height = element.required("height")?;
    let tiles = read_cells(element, encoding, compression)?;
    check_len(&tiles, width, height)?;
    Ok(Chunk { x, y, width, height, tiles })
}

/// Cells from encoded text, or from `tile` children when unencoded.
fn read_cells<E: Element>(
    element: E,
    encoding: Option<DataEncoding>,
    compression: Option<DataCompression>,
) -> Result<Vec<TileRef>> {
    let raw = match encoding {
        Some(encoding) => decode_raw(&element.text_content(), encoding, compression)?,
        None => read_list(element, "tile", |t| t.optional_or::<u32>("gid", 0))?,
    };
    Ok(split_all(&raw))
}
