//! Axis-aligned collision resolution against the map's collision layer.
//!
//! The caller applies the proposed displacement first; `resolve` corrects the
//! resulting box so it does not overlap solid tiles, per axis, and clamps it
//! to the ground plane at the bottom of the viewport.

use crate::map::TileGrid;
use macroquad::prelude::*;

/// Outcome of one resolution pass.
pub struct Resolved {
    /// Corrected collision box.
    pub rect: Rect,
    /// Corrected vertical velocity, zeroed on any vertical contact.
    pub velocity_y: f32,
    /// True when the box came to rest on a tile top or the ground plane.
    pub landed: bool,
}

// Shared edges do not count as overlap; a box resting exactly on a tile top
// must not re-collide with it.
#[inline]
fn overlaps_strict(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Visits the rect of every solid cell strictly overlapping `probe`, in
/// row-major order. Only the grid-cell neighborhood of the probe is scanned.
fn for_each_solid_overlap(grid: &TileGrid, tile: Vec2, probe: Rect, mut f: impl FnMut(Rect)) {
    let x0 = (probe.x / tile.x).floor().max(0.0) as usize;
    let y0 = (probe.y / tile.y).floor().max(0.0) as usize;
    let x1 = (((probe.x + probe.w) / tile.x).ceil().max(0.0) as usize).min(grid.width);
    let y1 = (((probe.y + probe.h) / tile.y).ceil().max(0.0) as usize).min(grid.height);

    for y in y0..y1 {
        for x in x0..x1 {
            if !grid.is_solid(x, y) {
                continue;
            }
            let rect = Rect::new(x as f32 * tile.x, y as f32 * tile.y, tile.x, tile.y);
            if overlaps_strict(&rect, &probe) {
                f(rect);
            }
        }
    }
}

/// Corrects `moved` so it does not overlap solid tiles.
///
/// `moved` must already reflect the proposed displacement for this tick;
/// `dx` is the horizontal part of that displacement (its sign picks which
/// tile edge the box snaps against) and `velocity_y` the vertical one.
/// `ground_y` is the synthetic ground plane: `viewport height - box height`.
pub fn resolve(
    grid: &TileGrid,
    tile: Vec2,
    moved: Rect,
    dx: f32,
    velocity_y: f32,
    ground_y: f32,
) -> Resolved {
    let mut new_x = moved.x;
    let mut new_y = moved.y;
    let mut vy = velocity_y;
    let mut landed = false;

    // Corrections accumulate against the unmoved box. Vertical contact zeroes
    // vy, so only the first overlapping row snaps the box vertically;
    // horizontal snapping stays live for every overlap, last one wins.
    for_each_solid_overlap(grid, tile, moved, |t| {
        if vy > 0.0 {
            new_y = t.y - moved.h;
            vy = 0.0;
            landed = true;
        } else if vy < 0.0 {
            new_y = t.y + t.h;
            vy = 0.0;
        }

        if dx > 0.0 {
            new_x = t.x - moved.w;
        } else if dx < 0.0 {
            new_x = t.x + t.w;
        }
    });

    // Re-test the horizontal-only move at the box's incoming y. Any overlap
    // discards the horizontal correction; this keeps walking over a row of
    // solid tiles from snagging on their side edges.
    let probe = Rect::new(new_x, moved.y, moved.w, moved.h);
    let mut x_collision = false;
    for_each_solid_overlap(grid, tile, probe, |_| x_collision = true);

    let mut rect = Rect::new(
        if x_collision { moved.x } else { new_x },
        new_y,
        moved.w,
        moved.h,
    );

    if rect.y > ground_y {
        rect.y = ground_y;
        vy = 0.0;
        landed = true;
    }

    Resolved {
        rect,
        velocity_y: vy,
        landed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND_FAR: f32 = 10_000.0;

    fn tile() -> Vec2 {
        vec2(16.0, 16.0)
    }

    fn grid_from(cells: &[(usize, usize)], w: usize, h: usize) -> TileGrid {
        let mut data = vec![0u32; w * h];
        for &(x, y) in cells {
            data[y * w + x] = 1;
        }
        TileGrid::new(w, h, data)
    }

    #[test]
    fn falling_box_lands_on_tile_top() {
        // Solid row at y = 2 (pixels 32..48)
        let grid = grid_from(&[(0, 2), (1, 2), (2, 2), (3, 2)], 4, 4);
        let moved = Rect::new(4.0, 25.0, 10.0, 10.0);

        let out = resolve(&grid, tile(), moved, 0.0, 2.0, GROUND_FAR);
        assert_eq!(out.rect.y, 32.0 - 10.0);
        assert_eq!(out.velocity_y, 0.0);
        assert!(out.landed);
    }

    #[test]
    fn rising_box_snaps_below_ceiling() {
        let grid = grid_from(&[(0, 0), (1, 0)], 4, 4);
        let moved = Rect::new(2.0, 12.0, 10.0, 10.0);

        let out = resolve(&grid, tile(), moved, 0.0, -3.0, GROUND_FAR);
        assert_eq!(out.rect.y, 16.0);
        assert_eq!(out.velocity_y, 0.0);
        assert!(!out.landed);
    }

    #[test]
    fn rightward_box_stops_at_wall_left_edge() {
        // Wall column at x = 2 (pixels 32..48)
        let grid = grid_from(&[(2, 1)], 4, 4);
        let moved = Rect::new(26.0, 18.0, 10.0, 10.0);

        let out = resolve(&grid, tile(), moved, 2.0, 0.0, GROUND_FAR);
        assert_eq!(out.rect.x, 32.0 - 10.0);
        assert_eq!(out.rect.x + out.rect.w, 32.0);
    }

    #[test]
    fn leftward_box_stops_at_wall_right_edge() {
        let grid = grid_from(&[(2, 1)], 4, 4);
        let moved = Rect::new(42.0, 18.0, 10.0, 10.0);

        let out = resolve(&grid, tile(), moved, -2.0, 0.0, GROUND_FAR);
        assert_eq!(out.rect.x, 48.0);
    }

    #[test]
    fn blocked_horizontal_correction_is_discarded() {
        // Snapping out of the right wall would land the box inside the left
        // one, so the correction is dropped and the incoming x kept.
        let grid = grid_from(&[(1, 1), (3, 1)], 5, 3);
        let moved = Rect::new(44.0, 20.0, 20.0, 8.0); // overlaps tile (3,1)

        let out = resolve(&grid, tile(), moved, 2.0, 0.0, GROUND_FAR);
        assert_eq!(out.rect.x, 44.0);
    }

    #[test]
    fn box_below_ground_plane_is_clamped() {
        let grid = grid_from(&[], 4, 4);
        let moved = Rect::new(0.0, 500.0, 10.0, 10.0);

        let out = resolve(&grid, tile(), moved, 0.0, 3.0, 100.0);
        assert_eq!(out.rect.y, 100.0);
        assert_eq!(out.velocity_y, 0.0);
        assert!(out.landed);
    }

    #[test]
    fn resting_contact_is_untouched() {
        let grid = grid_from(&[(0, 2), (1, 2)], 4, 4);
        // Bottom edge exactly on the tile tops
        let moved = Rect::new(4.0, 32.0 - 10.0, 10.0, 10.0);

        let out = resolve(&grid, tile(), moved, 0.0, 0.0, GROUND_FAR);
        assert_eq!(out.rect, moved);
        assert_eq!(out.velocity_y, 0.0);
        assert!(!out.landed);
    }

    #[test]
    fn first_overlapping_row_wins_vertical_snap() {
        // A tall falling box overlapping two stacked tiles snaps to the top
        // of the upper one; the zeroed velocity skips the lower tile.
        let grid = grid_from(&[(1, 1), (1, 2)], 4, 4);
        let moved = Rect::new(18.0, 10.0, 10.0, 30.0);

        let out = resolve(&grid, tile(), moved, 0.0, 1.0, GROUND_FAR);
        assert_eq!(out.rect.y, 16.0 - 30.0);
        assert_eq!(out.velocity_y, 0.0);
    }
}
