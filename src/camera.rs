//! Viewport origin derived from the actor position, clamped to map bounds.

use macroquad::prelude::*;

/// World-space offset of the viewport's top-left corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    /// Current offset, recomputed every tick.
    pub offset: Vec2,
}

#[inline]
fn clamp_axis(v: f32, max: f32) -> f32 {
    // When the map is narrower than the viewport `max` goes negative and the
    // clamp collapses to 0.
    v.min(max).max(0.0)
}

impl Camera {
    /// Centers the viewport on `focus` and clamps it to the map extent.
    pub fn update(&mut self, focus: Vec2, viewport: Vec2, map_px: Vec2) {
        let raw = focus - viewport / 2.0;
        self.offset = vec2(
            clamp_axis(raw.x, map_px.x - viewport.x),
            clamp_axis(raw.y, map_px.y - viewport.y),
        );
    }
}
