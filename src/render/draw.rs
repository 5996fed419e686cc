//! Frame composition: layered tile drawing with viewport culling, then the
//! actor sprite on top.

use crate::map::{LayerKind, TileMap};
use crate::player::{ClipLengths, Facing};
use crate::sim::Simulation;
use anyhow::Context;
use macroquad::prelude::*;
use std::ops::Range;

struct AtlasSet {
    first_gid: u32,
    cols: u32,
    tile_w: u32,
    tile_h: u32,
    spacing: u32,
    margin: u32,
    tex: Texture2D,
}

/// Tileset textures plus a gid -> tileset lookup table.
pub struct TileAtlas {
    sets: Vec<AtlasSet>,
    gid_lut: Vec<u16>,
}

impl TileAtlas {
    /// Loads every tileset texture referenced by the map.
    pub async fn load(map: &TileMap) -> anyhow::Result<Self> {
        let max_gid = map
            .tilesets
            .iter()
            .map(|t| t.first_gid + t.tilecount.saturating_sub(1))
            .max()
            .unwrap_or(0);

        let mut gid_lut = vec![u16::MAX; (max_gid + 1) as usize];
        let mut sets = Vec::with_capacity(map.tilesets.len());

        for (i, def) in map.tilesets.iter().enumerate() {
            anyhow::ensure!(def.columns > 0, "Tileset {} has zero columns", def.image.display());

            let tex = load_texture(def.image.to_string_lossy().as_ref())
                .await
                .with_context(|| format!("Loading texture {}", def.image.display()))?;
            tex.set_filter(FilterMode::Nearest);

            sets.push(AtlasSet {
                first_gid: def.first_gid,
                cols: def.columns,
                tile_w: def.tile_w,
                tile_h: def.tile_h,
                spacing: def.spacing,
                margin: def.margin,
                tex,
            });

            for gid in def.first_gid..(def.first_gid + def.tilecount) {
                gid_lut[gid as usize] = i as u16;
            }
        }

        Ok(Self { sets, gid_lut })
    }

    #[inline]
    fn set_for_gid(&self, gid: u32) -> Option<(&AtlasSet, u32)> {
        let idx = *self.gid_lut.get(gid as usize)?;
        if idx == u16::MAX {
            return None;
        }
        let set = &self.sets[idx as usize];
        Some((set, gid - set.first_gid))
    }

    /// Draws the tile image for `gid` with its top-left at `dest`.
    /// Unknown gids draw nothing.
    pub fn draw_tile(&self, gid: u32, dest: Vec2) {
        if let Some((set, local)) = self.set_for_gid(gid) {
            let col = local % set.cols;
            let row = local / set.cols;
            let sx = set.margin + col * (set.tile_w + set.spacing);
            let sy = set.margin + row * (set.tile_h + set.spacing);

            draw_texture_ex(
                &set.tex,
                dest.x,
                dest.y,
                WHITE,
                DrawTextureParams {
                    source: Some(Rect::new(
                        sx as f32,
                        sy as f32,
                        set.tile_w as f32,
                        set.tile_h as f32,
                    )),
                    ..Default::default()
                },
            );
        }
    }
}

/// Actor animation clips, one texture per frame, keyed by facing.
pub struct PlayerSprites {
    right: Vec<Texture2D>,
    left: Vec<Texture2D>,
    idle: Vec<Texture2D>,
}

async fn load_clip(dir: &str, stem: &str, count: usize) -> anyhow::Result<Vec<Texture2D>> {
    anyhow::ensure!(count > 0, "Animation clip '{}' must have at least one frame", stem);
    let mut frames = Vec::with_capacity(count);
    for i in 1..=count {
        let path = format!("{}/{} ({}).png", dir, stem, i);
        let tex = load_texture(&path)
            .await
            .with_context(|| format!("Loading animation frame {}", path))?;
        tex.set_filter(FilterMode::Nearest);
        frames.push(tex);
    }
    Ok(frames)
}

impl PlayerSprites {
    /// Loads the fixed clip set from `dir`: `walk right (1..n).png`,
    /// `walk left (1..n).png` and `idle (1..n).png`.
    pub async fn load(dir: &str, clips: &ClipLengths) -> anyhow::Result<Self> {
        Ok(Self {
            right: load_clip(dir, "walk right", clips.right).await?,
            left: load_clip(dir, "walk left", clips.left).await?,
            idle: load_clip(dir, "idle", clips.idle).await?,
        })
    }

    fn clip(&self, facing: Facing) -> &[Texture2D] {
        match facing {
            Facing::Right => &self.right,
            Facing::Left => &self.left,
            Facing::Idle => &self.idle,
        }
    }

    /// Frame count of the clip for `facing`.
    pub fn frames(&self, facing: Facing) -> usize {
        self.clip(facing).len()
    }

    /// Texture for the given facing and frame index. Clips are non-empty by
    /// construction, so the modulo lookup is total.
    pub fn frame(&self, facing: Facing, index: usize) -> &Texture2D {
        let clip = self.clip(facing);
        &clip[index % clip.len()]
    }
}

/// Grid-cell ranges overlapping the viewport at the given camera offset.
///
/// Culling only; cells outside the ranges could be drawn harmlessly, just
/// off screen.
pub fn visible_cells(
    offset: Vec2,
    viewport: Vec2,
    tile: Vec2,
    map_w: usize,
    map_h: usize,
) -> (Range<usize>, Range<usize>) {
    let x0 = ((offset.x / tile.x).floor().max(0.0) as usize).min(map_w);
    let y0 = ((offset.y / tile.y).floor().max(0.0) as usize).min(map_h);
    let x1 = ((((offset.x + viewport.x) / tile.x).ceil().max(0.0)) as usize).min(map_w);
    let y1 = ((((offset.y + viewport.y) / tile.y).ceil().max(0.0)) as usize).min(map_h);
    (x0..x1, y0..y1)
}

/// Composes one frame: every visible tile layer in declared order, then the
/// actor's current animation frame, all shifted by the camera offset.
pub fn draw_frame(sim: &Simulation, atlas: &TileAtlas, sprites: &PlayerSprites) {
    let offset = sim.camera.offset;
    let viewport = sim.viewport();
    let tile = sim.map.tile_size();

    for layer in &sim.map.layers {
        if !layer.visible {
            continue;
        }
        // Object layers carry no tile images
        let LayerKind::Tiles(grid) = &layer.kind else {
            continue;
        };

        let (cols, rows) = visible_cells(offset, viewport, tile, grid.width, grid.height);
        for y in rows {
            for x in cols.clone() {
                let gid = grid.gid(x, y);
                if gid == 0 {
                    continue;
                }
                let world = vec2(x as f32 * tile.x, y as f32 * tile.y);
                atlas.draw_tile(gid, world - offset);
            }
        }
    }

    // The actor draws after all layers, always in front
    let tex = sprites.frame(sim.player.facing, sim.player.current_frame());
    draw_texture(
        tex,
        sim.player.pos.x - offset.x,
        sim.player.pos.y - offset.y,
        WHITE,
    );
}
