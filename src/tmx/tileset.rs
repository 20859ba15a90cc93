//! `tileset` elements and their children.

use tracing::debug;

use crate::codec::{base64_bytes, DataEncoding};
use crate::document::{process_children, read_list, skip, AtMostOnce, Attributes, Element};
use crate::model::{
    FillMode, Frame, Grid, GridOrientation, Image, ImageFormat, ObjectAlignment, Tile,
    TileOffset, TileRenderSize, Tileset, Transformations, WangColor, WangId, WangTile, Wangset,
    MAX_WANG_COLORS,
};
use crate::util::{Color, Error, Result};

use super::{expect_tag, TmxReader};

impl TmxReader<'_> {
    /// Decode a standalone tileset document (`.tsx`).
    pub fn read_tileset<E: Element>(&self, element: E) -> Result<Tileset> {
        expect_tag(element, "tileset")?;
        self.read_tileset_element(element, None, None)
    }

    /// Decode a `tileset` element. Version fields missing on the element are
    /// inherited from the enclosing document.
    ///
    /// A reference (`firstgid` plus `source`) is handed to the tileset
    /// resolver; its children are ignored.
    pub(crate) fn read_tileset_element<E: Element>(
        &self,
        element: E,
        parent_version: Option<&str>,
        parent_tiled_version: Option<&str>,
    ) -> Result<Tileset> {
        let first_gid = element.optional::<u32>("firstgid")?;
        let source = element.optional::<String>("source")?;

        if let (Some(first_gid), Some(source)) = (first_gid, source.as_deref()) {
            let mut tileset = self.resolve_tileset(source)?;
            tileset.first_gid = Some(first_gid);
            tileset.source = Some(source.to_string());
            return Ok(tileset);
        }

        let version = element
            .optional::<String>("version")?
            .or_else(|| parent_version.map(str::to_string));
        let tiled_version = element
            .optional::<String>("tiledversion")?
            .or_else(|| parent_tiled_version.map(str::to_string));
        let name: String = element.required("name")?;
        let class: String = element.optional_or("class", String::new())?;
        let tile_width = element.required("tilewidth")?;
        let tile_height = element.required("tileheight")?;
        let spacing = element.optional_or("spacing", 0)?;
        let margin = element.optional_or("margin", 0)?;
        let tile_count = element.required("tilecount")?;
        let columns = element.required("columns")?;
        let object_alignment =
            element.optional_enum_or("objectalignment", ObjectAlignment::TOKENS, ObjectAlignment::Unspecified)?;
        let render_size = element.optional_enum_or("tilerendersize", TileRenderSize::TOKENS, TileRenderSize::Tile)?;
        let fill_mode = element.optional_enum_or("fillmode", FillMode::TOKENS, FillMode::Stretch)?;

        let mut image = AtMostOnce::new("image");
        let mut tile_offset = AtMostOnce::new("tileoffset");
        let mut grid = AtMostOnce::new("grid");
        let mut properties =
            AtMostOnce::with_default("properties", self.class_properties(&class).unwrap_or_default());
        let mut wangsets = AtMostOnce::new("wangsets");
        let mut transformations = AtMostOnce::new("transformations");
        let mut tiles = Vec::new();

        process_children(element, |child, tag| match tag {
            "image" => image.set(read_image(child)?),
            "tileoffset" => tile_offset.set(TileOffset {
                x: child.optional_or("x", 0.0)?,
                y: child.optional_or("y", 0.0)?,
            }),
            "grid" => grid.set(Grid {
                orientation: child.optional_enum_or("orientation", GridOrientation::TOKENS, GridOrientation::Orthogonal)?,
                width: child.required("width")?,
                height: child.required("height")?,
            }),
            "properties" => self.merge_properties_section(&mut properties, child),
            "wangsets" => wangsets.set(read_list(child, "wangset", |w| self.read_wangset(w))?),
            "transformations" => transformations.set(Transformations {
                hflip: child.optional_or("hflip", false)?,
                vflip: child.optional_or("vflip", false)?,
                rotate: child.optional_or("rotate", false)?,
                prefer_untransformed: child.optional_or("preferuntransformed", false)?,
            }),
            "tile" => {
                tiles.push(self.read_tile(child)?);
                Ok(())
            }
            _ => skip(child),
        })?;

        debug!(name = %name, tiles = tiles.len(), "decoded tileset");

        Ok(Tileset {
            version,
            tiled_version,
            first_gid,
            source,
            name,
            class,
            tile_width,
            tile_height,
            spacing,
            margin,
            tile_count,
            columns,
            object_alignment,
            render_size,
            fill_mode,
            image: image.into_inner(),
            tile_offset: tile_offset.into_inner(),
            grid: grid.into_inner(),
            properties: properties.into_inner().unwrap_or_default(),
            wangsets: wangsets.into_inner().unwrap_or_default(),
            transformations: transformations.into_inner(),
            tiles,
        })
    }

    fn read_tile<E: Element>(&self, element: E) -> Result<Tile> {
        let id = element.required("id")?;
        let class: String = element.optional_or("type", String::new())?;
        let probability = element.optional_or("probability", 0.0)?;
        let x = element.optional_or("x", 0)?;
        let y = element.optional_or("y", 0)?;
        let width = element.optional::<u32>("width")?;
        let height = element.optional::<u32>("height")?;

        let mut properties =
            AtMostOnce::with_default("properties", self.class_properties(&class).unwrap_or_default());
        let mut image = AtMostOnce::new("image");
        let mut object_layer = AtMostOnce::new("objectgroup");
        let mut animation = AtMostOnce::new("animation");

        process_children(element, |child, tag| match tag {
            "properties" => self.merge_properties_section(&mut properties, child),
            "image" => image.set(read_image(child)?),
            "objectgroup" => object_layer.set(self.read_object_layer(child)?),
            "animation" => animation.set(read_list(child, "frame", |f| {
                Ok(Frame {
                    tile_id: f.required("tileid")?,
                    duration: f.required("duration")?,
                })
            })?),
            _ => skip(child),
        })?;

        let image: Option<Image> = image.into_inner();
        // Image collection tiles default to the size of their own image.
        let width = width.or_else(|| image.as_ref().and_then(|i| i.width)).unwrap_or(0);
        let height = height.or_else(|| image.as_ref().and_then(|i| i.height)).unwrap_or(0);

        Ok(Tile {
            id,
            class,
            probability,
            x,
            y,
            width,
            height,
            properties: properties.into_inner().unwrap_or_default(),
            image,
            object_layer: object_layer.into_inner(),
            animation: animation.into_inner().unwrap_or_default(),
        })
    }

    fn read_wangset<E: Element>(&self, element: E) -> Result<Wangset> {
        let name: String = element.required("name")?;
        let class: String = element.optional_or("class", String::new())?;
        let tile = element.optional_or("tile", -1)?;

        let mut properties =
            AtMostOnce::with_default("properties", self.class_properties(&class).unwrap_or_default());
        let mut colors = Vec::new();
        let mut tiles = Vec::new();

        process_children(element, |child, tag| match tag {
            "properties" => self.merge_properties_section(&mut properties, child),
            "wangcolor" => {
                colors.push(self.read_wang_color(child)?);
                Ok(())
            }
            "wangtile" => {
                tiles.push(WangTile {
                    tile_id: child.required("tileid")?,
                    wang_id: child.required_with("wangid", "wang id", parse_wang_id)?,
                });
                Ok(())
            }
            _ => skip(child),
        })?;

        if colors.len() > MAX_WANG_COLORS {
            return Err(Error::grammar(format!(
                "wangset '{name}' has {} colors, at most {MAX_WANG_COLORS} allowed",
                colors.len()
            )));
        }

        Ok(Wangset {
            name,
            class,
            tile,
            properties: properties.into_inner().unwrap_or_default(),
            colors,
            tiles,
        })
    }

    fn read_wang_color<E: Element>(&self, element: E) -> Result<WangColor> {
        let name: String = element.required("name")?;
        let class: String = element.optional_or("class", String::new())?;
        let color = element.required("color")?;
        let tile = element.required("tile")?;
        let probability = element.optional_or("probability", 0.0)?;

        let mut properties =
            AtMostOnce::with_default("properties", self.class_properties(&class).unwrap_or_default());
        process_children(element, |child, tag| match tag {
            "properties" => self.merge_properties_section(&mut properties, child),
            _ => skip(child),
        })?;

        Ok(WangColor {
            name,
            class,
            color,
            tile,
            probability,
            properties: properties.into_inner().unwrap_or_default(),
        })
    }
}

/// Comma-separated color indices, at most eight.
fn parse_wang_id(raw: &str) -> Option<WangId> {
    let id = raw
        .split(',')
        .map(|index| index.trim().parse::<u8>().ok())
        .collect::<Option<WangId>>()?;
    (id.len() <= 8).then_some(id)
}

/// Decode an `image` element, inferring the format from the source's
/// extension when not given.
pub(crate) fn read_image<E: Element>(element: E) -> Result<Image> {
    let source: Option<String> = element.optional("source")?;
    let format = match element.optional_enum("format", ImageFormat::TOKENS)? {
        Some(format) => Some(format),
        None => source.as_deref().and_then(ImageFormat::from_source),
    };
    let transparent_color = element.optional::<Color>("trans")?;
    let width = element.optional("width")?;
    let height = element.optional("height")?;

    let mut data = AtMostOnce::new("data");
    process_children(element, |child, tag| match tag {
        "data" => data.set(read_image_data(child)?),
        _ => skip(child),
    })?;

    Ok(Image { format, source, transparent_color, width, height, data: data.into_inner() })
}

fn read_image_data<E: Element>(element: E) -> Result<Vec<u8>> {
    match element.optional_enum("encoding", DataEncoding::TOKENS)? {
        Some(DataEncoding::Base64) => base64_bytes(&element.text_content())
            .map_err(|e| Error::malformed("data", e.to_string(), "base64 image data")),
        _ => Err(Error::grammar("embedded image data must be base64 encoded")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tileset(reader: &TmxReader, xml: &str) -> Result<Tileset> {
        reader.read_tileset_str(xml)
    }

    #[test]
    fn test_inline_tileset() {
        let xml = r##"<tileset version="1.10" tiledversion="1.11.0" name="terrain" tilewidth="32" tileheight="32"
                tilecount="24" columns="8" spacing="1" margin="2" objectalignment="bottom">
            <tileoffset x="0" y="-4"/>
            <grid orientation="isometric" width="32" height="16"/>
            <image source="terrain.png" width="265" height="100" trans="ff00ff"/>
            <transformations hflip="1" vflip="0" rotate="0" preferuntransformed="1"/>
            <tile id="3" type="Wall" probability="0.5">
                <animation>
                    <frame tileid="3" duration="100"/>
                    <frame tileid="4" duration="150"/>
                </animation>
            </tile>
        </tileset>"##;
        let ts = tileset(&TmxReader::new(), xml).unwrap();
        assert_eq!(ts.name, "terrain");
        assert_eq!((ts.spacing, ts.margin, ts.tile_count, ts.columns), (1, 2, 24, 8));
        assert_eq!(ts.object_alignment, ObjectAlignment::Bottom);
        assert_eq!(ts.tile_offset, Some(TileOffset { x: 0.0, y: -4.0 }));
        assert_eq!(ts.grid.unwrap().orientation, GridOrientation::Isometric);
        let image = ts.image.as_ref().unwrap();
        assert_eq!(image.format, Some(ImageFormat::Png));
        assert_eq!(image.transparent_color, Some(Color::rgb(0xff, 0x00, 0xff)));
        assert!(ts.transformations.unwrap().hflip);
        assert!(ts.transformations.unwrap().prefer_untransformed);

        let tile = ts.tile(3).unwrap();
        assert_eq!(tile.class, "Wall");
        assert_eq!(tile.animation, [Frame { tile_id: 3, duration: 100 }, Frame { tile_id: 4, duration: 150 }]);
        assert_eq!(ts.first_gid, None);
    }

    #[test]
    fn test_tile_size_from_image() {
        let xml = r#"<tileset name="objs" tilewidth="64" tileheight="64" tilecount="1" columns="0">
            <tile id="0"><image source="tree.png" width="48" height="80"/></tile>
        </tileset>"#;
        let ts = tileset(&TmxReader::new(), xml).unwrap();
        let tile = ts.tile(0).unwrap();
        assert_eq!((tile.width, tile.height), (48, 80));
    }

    #[test]
    fn test_embedded_image_data() {
        let xml = r#"<tileset name="e" tilewidth="8" tileheight="8" tilecount="1" columns="1">
            <image format="png" width="8" height="8"><data encoding="base64">iVBORw==</data></image>
        </tileset>"#;
        let ts = tileset(&TmxReader::new(), xml).unwrap();
        let image = ts.image.unwrap();
        assert_eq!(image.source, None);
        assert_eq!(image.data.as_deref(), Some(&[0x89, b'P', b'N', b'G'][..]));
    }

    #[test]
    fn test_duplicate_image() {
        let xml = r#"<tileset name="d" tilewidth="8" tileheight="8" tilecount="1" columns="1">
            <image source="a.png"/><image source="b.png"/>
        </tileset>"#;
        assert!(matches!(tileset(&TmxReader::new(), xml), Err(Error::DuplicateElement(_))));
    }

    #[test]
    fn test_wangsets() {
        let xml = r##"<tileset name="w" tilewidth="8" tileheight="8" tilecount="4" columns="2">
            <wangsets>
                <wangset name="ground" type="corner" tile="-1">
                    <wangcolor name="grass" color="#00ff00" tile="0" probability="1"/>
                    <wangcolor name="dirt" color="#804000" tile="1" probability="1"/>
                    <wangtile tileid="0" wangid="0,1,0,1,0,1,0,1"/>
                </wangset>
            </wangsets>
        </tileset>"##;
        let ts = tileset(&TmxReader::new(), xml).unwrap();
        let ws = &ts.wangsets[0];
        assert_eq!(ws.colors.len(), 2);
        assert_eq!(ws.colors[1].color, Color::rgb(0x80, 0x40, 0x00));
        assert_eq!(ws.tiles[0].wang_id.as_slice(), &[0, 1, 0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_wang_id_limits() {
        assert!(parse_wang_id("1,2,3,4,5,6,7,8").is_some());
        assert!(parse_wang_id("1,2,3,4,5,6,7,8,9").is_none());
        assert!(parse_wang_id("1,256").is_none());
    }

    #[test]
    fn test_external_reference_ignores_children() {
        let reader = TmxReader::new().with_tileset_resolver(|source| {
            assert_eq!(source, "ext.tsx");
            TmxReader::new().read_tileset_str(
                r#"<tileset name="ext" tilewidth="16" tileheight="16" tilecount="4" columns="2"/>"#,
            )
        });
        let doc = roxmltree::Document::parse(
            r#"<tileset firstgid="10" source="ext.tsx"><image source="ignored.png"/></tileset>"#,
        )
        .unwrap();
        let ts = reader.read_tileset_element(doc.root_element(), Some("1.10"), None).unwrap();
        assert_eq!(ts.name, "ext");
        assert_eq!(ts.first_gid, Some(10));
        assert_eq!(ts.source.as_deref(), Some("ext.tsx"));
        assert!(ts.image.is_none());
    }

    #[test]
    fn test_version_inherited() {
        let doc = roxmltree::Document::parse(
            r#"<tileset firstgid="1" name="i" tilewidth="8" tileheight="8" tilecount="1" columns="1"/>"#,
        )
        .unwrap();
        let ts = TmxReader::new()
            .read_tileset_element(doc.root_element(), Some("1.10"), Some("1.11.0"))
            .unwrap();
        assert_eq!(ts.version.as_deref(), Some("1.10"));
        assert_eq!(ts.tiled_version.as_deref(), Some("1.11.0"));
        assert_eq!(ts.first_gid, Some(1));
    }
}
