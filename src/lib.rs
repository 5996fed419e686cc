#![warn(missing_docs)]

//! Minimal Tiled JSON platformer simulation for Macroquad.
//!
//! Loads a tile-based level, drives a single keyboard-controlled player
//! with gravity, jumping and tile collision, and renders a scrolling,
//! clamped camera view. See `demos/platformer.rs` for the frame loop.

mod camera;
mod collision;
mod error;
mod map;
mod player;
mod render {
    pub mod draw;
}
mod sim;

pub use camera::Camera;
pub use collision::{resolve, Resolved};
pub use error::Error;
pub use map::{
    Layer, LayerKind, MapObject, TileGrid, TileMap, TilesetDef, COLLISION_LAYER_NAME,
};
pub use player::{ClipLengths, Facing, Player, PlayerConfig, TickInput};
pub use render::draw::{draw_frame, visible_cells, PlayerSprites, TileAtlas};
pub use sim::{SimConfig, Simulation};
