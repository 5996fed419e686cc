use crate::error::Error;
use macroquad::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the layer whose non-zero cells are solid geometry.
pub const COLLISION_LAYER_NAME: &str = "collision";

#[derive(Deserialize)]
struct JsonMap {
    width: usize,
    height: usize,
    tilewidth: u32,
    tileheight: u32,
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" or "objectgroup"
    #[serde(default)]
    objects: Vec<JsonObject>,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
}

/// Either an external reference (`source`) or an embedded tileset.
#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    tilecount: u32,
    #[serde(default)]
    columns: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
}

#[derive(Deserialize)]
struct ExternalTileset {
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    columns: u32,
    image: String,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
}

fn default_true() -> bool {
    true
}

/// A row-major grid of tile gids. Gid 0 means the cell is empty.
#[derive(Debug, Clone)]
pub struct TileGrid {
    /// Grid width in tiles.
    pub width: usize,
    /// Grid height in tiles.
    pub height: usize,
    data: Vec<u32>,
}

impl TileGrid {
    /// Builds a grid from raw row-major gids.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<u32>) -> Self {
        assert_eq!(data.len(), width * height, "grid data/dimension mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    /// Gid at grid cell `(x, y)`. Out-of-range cells read as empty.
    #[inline]
    pub fn gid(&self, x: usize, y: usize) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y * self.width + x]
    }

    /// Whether the cell at `(x, y)` is solid (any non-zero gid).
    #[inline]
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.gid(x, y) != 0
    }
}

/// A rectangle placed on an object layer.
#[derive(Debug, Clone)]
pub struct MapObject {
    /// Tiled object id.
    pub id: u32,
    /// Object name, may be empty.
    pub name: String,
    /// World position and size in pixels.
    pub rect: Rect,
}

/// Layer payload, discriminated once at decode time.
#[derive(Debug)]
pub enum LayerKind {
    /// A grid of tile gids.
    Tiles(TileGrid),
    /// Free-standing rectangles (spawn points, triggers).
    Objects(Vec<MapObject>),
}

/// One map layer, in declared draw order.
#[derive(Debug)]
pub struct Layer {
    /// Layer name, may be empty.
    pub name: String,
    /// Invisible layers are skipped by rendering and collision lookup.
    pub visible: bool,
    /// Decoded payload.
    pub kind: LayerKind,
}

impl Layer {
    /// The tile grid, if this is a tile layer.
    pub fn tiles(&self) -> Option<&TileGrid> {
        match &self.kind {
            LayerKind::Tiles(grid) => Some(grid),
            LayerKind::Objects(_) => None,
        }
    }
}

/// Geometry of one tileset atlas; the texture itself is loaded separately.
#[derive(Debug, Clone)]
pub struct TilesetDef {
    /// First gid covered by this tileset.
    pub first_gid: u32,
    /// Path to the atlas image, relative paths already joined with the map dir.
    pub image: PathBuf,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Number of tiles in the atlas.
    pub tilecount: u32,
    /// Atlas columns.
    pub columns: u32,
    /// Pixels between tiles, 0 if not used.
    pub spacing: u32,
    /// Pixels around the atlas edge, 0 if not used.
    pub margin: u32,
}

/// Decoded level geometry, immutable after load.
#[derive(Debug)]
pub struct TileMap {
    /// Map width in tiles.
    pub width: usize,
    /// Map height in tiles.
    pub height: usize,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Layers in draw order (back to front).
    pub layers: Vec<Layer>,
    /// Tileset geometry, sorted by first gid.
    pub tilesets: Vec<TilesetDef>,
    collision: Option<usize>,
}

impl TileMap {
    /// Decode a map from a Tiled JSON string.
    ///
    /// External tileset references (`"source"`) are skipped here since there
    /// is no base directory to resolve them against; use
    /// [`TileMap::load_from_file`] for maps that use them.
    pub fn load_from_str(json: &str) -> Result<Self, Error> {
        Self::decode(json, None)
    }

    /// Load a map from a file path, only supporting JSON for now.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path_ref = path.as_ref();
        let path_str = path_ref.display().to_string();

        match path_ref.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path_ref)?;
                let map_dir = path_ref
                    .parent()
                    .map(|d| d.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("./"));
                Self::decode(&content, Some(&map_dir))
            }
            // Any other extension (or none) is unsupported
            _ => Err(Error::UnsupportedFormat(path_str)),
        }
    }

    fn decode(json: &str, map_dir: Option<&Path>) -> Result<Self, Error> {
        let raw: JsonMap = serde_json::from_str(json)?;

        if raw.layers.is_empty() {
            return Err(Error::NoLayer);
        }

        let mut layers = Vec::with_capacity(raw.layers.len());
        for jl in raw.layers {
            let kind = match jl.kind.as_deref() {
                Some("objectgroup") => LayerKind::Objects(
                    jl.objects
                        .into_iter()
                        .map(|o| MapObject {
                            id: o.id,
                            name: o.name,
                            rect: Rect::new(o.x, o.y, o.width, o.height),
                        })
                        .collect(),
                ),
                // Tiled writes "tilelayer"; hand-written fixtures may omit it
                _ => {
                    let width = if jl.width != 0 { jl.width } else { raw.width };
                    let height = if jl.height != 0 { jl.height } else { raw.height };
                    if width != raw.width
                        || height != raw.height
                        || jl.data.len() != width * height
                    {
                        return Err(Error::InvalidLayerSize(jl.name));
                    }
                    LayerKind::Tiles(TileGrid {
                        width,
                        height,
                        data: jl.data,
                    })
                }
            };
            layers.push(Layer {
                name: jl.name,
                visible: jl.visible,
                kind,
            });
        }

        // First visible tile layer named "collision" wins
        let collision = layers.iter().position(|l| {
            l.visible && l.name == COLLISION_LAYER_NAME && matches!(l.kind, LayerKind::Tiles(_))
        });

        let mut tilesets = Vec::with_capacity(raw.tilesets.len());
        for ts in raw.tilesets {
            if let Some(def) = Self::resolve_tileset(ts, map_dir)? {
                tilesets.push(def);
            }
        }
        tilesets.sort_unstable_by_key(|t| t.first_gid);

        Ok(Self {
            width: raw.width,
            height: raw.height,
            tile_w: raw.tilewidth,
            tile_h: raw.tileheight,
            layers,
            tilesets,
            collision,
        })
    }

    fn resolve_tileset(
        ts: JsonTilesetRef,
        map_dir: Option<&Path>,
    ) -> Result<Option<TilesetDef>, Error> {
        match (&ts.source, map_dir) {
            (Some(source), Some(dir)) => {
                if !source.ends_with(".json") {
                    return Err(Error::UnsupportedFormat(source.clone()));
                }
                let ext_txt = fs::read_to_string(dir.join(source))?;
                let ext: ExternalTileset = serde_json::from_str(&ext_txt)?;
                Ok(Some(TilesetDef {
                    first_gid: ts.firstgid,
                    image: dir.join(&ext.image),
                    tile_w: ext.tilewidth,
                    tile_h: ext.tileheight,
                    tilecount: ext.tilecount,
                    columns: ext.columns,
                    spacing: ext.spacing,
                    margin: ext.margin,
                }))
            }
            // External reference with nowhere to resolve it from
            (Some(_), None) => Ok(None),
            (None, _) => match ts.image {
                Some(image) => Ok(Some(TilesetDef {
                    first_gid: ts.firstgid,
                    image: match map_dir {
                        Some(dir) => dir.join(&image),
                        None => PathBuf::from(image),
                    },
                    tile_w: ts.tilewidth,
                    tile_h: ts.tileheight,
                    tilecount: ts.tilecount,
                    columns: ts.columns,
                    spacing: ts.spacing,
                    margin: ts.margin,
                })),
                None => Ok(None),
            },
        }
    }

    /// The solid-geometry grid, if the map declared one.
    pub fn collision_grid(&self) -> Option<&TileGrid> {
        self.layers.get(self.collision?).and_then(Layer::tiles)
    }

    /// Tile size in pixels.
    pub fn tile_size(&self) -> Vec2 {
        vec2(self.tile_w as f32, self.tile_h as f32)
    }

    /// Full map extent in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        vec2(
            (self.width as u32 * self.tile_w) as f32,
            (self.height as u32 * self.tile_h) as f32,
        )
    }
}
