//! Per-tick simulation state: map, player, camera and zoom, driven by the
//! frame loop. Configuration is injected once at construction.

use crate::camera::Camera;
use crate::error::Error;
use crate::map::TileMap;
use crate::player::{Player, TickInput};
use macroquad::prelude::*;

/// Display and zoom configuration, fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Logical viewport width in pixels.
    pub screen_width: f32,
    /// Logical viewport height in pixels.
    pub screen_height: f32,
    /// Lower zoom bound.
    pub zoom_min: f32,
    /// Upper zoom bound.
    pub zoom_max: f32,
    /// Zoom change applied per key poll.
    pub zoom_step: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            zoom_min: 0.5,
            zoom_max: 2.0,
            zoom_step: 0.1,
        }
    }
}

/// Everything one tick reads and writes, owned in one place.
pub struct Simulation {
    /// Injected configuration.
    pub config: SimConfig,
    /// The loaded level, read-only after construction.
    pub map: TileMap,
    /// The single dynamic actor.
    pub player: Player,
    /// Viewport origin, recomputed every tick.
    pub camera: Camera,
    zoom: f32,
}

impl Simulation {
    /// Builds the simulation, failing fast if the map carries no collision
    /// layer; the core is never entered without one.
    pub fn new(config: SimConfig, map: TileMap, player: Player) -> Result<Self, Error> {
        if map.collision_grid().is_none() {
            return Err(Error::MissingCollisionLayer);
        }
        Ok(Self {
            config,
            map,
            player,
            camera: Camera::default(),
            zoom: 1.0,
        })
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Nudges the zoom level, clamped to the configured bounds.
    pub fn adjust_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).clamp(self.config.zoom_min, self.config.zoom_max);
    }

    /// Logical viewport size.
    pub fn viewport(&self) -> Vec2 {
        vec2(self.config.screen_width, self.config.screen_height)
    }

    /// One simulation step: player update (input, gravity, collision),
    /// then camera follow.
    pub fn tick(&mut self, input: &TickInput) {
        let ground_y = self.config.screen_height - self.player.config().collision_size.y;
        let tile = self.map.tile_size();
        if let Some(grid) = self.map.collision_grid() {
            self.player.tick(input, grid, tile, ground_y);
        }

        self.camera.update(
            self.player.collision_box().point(),
            self.viewport(),
            self.map.pixel_size(),
        );
    }
}
