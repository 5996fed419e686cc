// tests/sim_tests.rs
//
// End-to-end simulation scenarios: rest, landing, jump arc, wall stops,
// camera clamping. The map is 40x30 tiles of 16px (640x480 world) viewed
// through a 320x240 screen, so the ground plane for the 46x32 collision box
// sits at y = 240 - 32 = 208.

use macroquad::prelude::*;
use tilerunner::{Player, PlayerConfig, SimConfig, Simulation, TickInput, TileMap};

const TILE: f32 = 16.0;
const GROUND_Y: f32 = 240.0 - 32.0;
const WALL_COL: usize = 8; // world pixels 128..144

fn map_json(w: usize, h: usize, solid: impl Fn(usize, usize) -> bool) -> String {
    let collision: Vec<&str> = (0..w * h)
        .map(|i| if solid(i % w, i / w) { "1" } else { "0" })
        .collect();
    let zeros = vec!["0"; w * h].join(",");
    format!(
        r#"{{"width":{w},"height":{h},"tilewidth":16,"tileheight":16,"layers":[
            {{"name":"background","type":"tilelayer","data":[{zeros}]}},
            {{"name":"collision","type":"tilelayer","data":[{collision}]}}]}}"#,
        collision = collision.join(",")
    )
}

fn sim_with(solid: impl Fn(usize, usize) -> bool) -> Simulation {
    let map = TileMap::load_from_str(&map_json(40, 30, solid)).expect("test map should decode");
    let config = SimConfig {
        screen_width: 320.0,
        screen_height: 240.0,
        ..Default::default()
    };
    let player = Player::new(vec2(0.0, 0.0), PlayerConfig::default());
    Simulation::new(config, map, player).expect("test map carries a collision layer")
}

/// Puts the collision box's top-left at `(x, y)` by back-computing the
/// visual position (box is centered horizontally, bottom aligned).
fn place_box(sim: &mut Simulation, x: f32, y: f32) {
    sim.player.pos = vec2(x - 9.0, y - 32.0);
}

fn box_overlaps_solid(sim: &Simulation) -> bool {
    let b = sim.player.collision_box();
    let grid = sim.map.collision_grid().unwrap();
    for y in 0..grid.height {
        for x in 0..grid.width {
            if !grid.is_solid(x, y) {
                continue;
            }
            let (tx, ty) = (x as f32 * TILE, y as f32 * TILE);
            if b.x < tx + TILE && b.x + b.w > tx && b.y < ty + TILE && b.y + b.h > ty {
                return true;
            }
        }
    }
    false
}

const NO_INPUT: TickInput = TickInput {
    left: false,
    right: false,
    jump: false,
};

const RIGHT: TickInput = TickInput {
    left: false,
    right: true,
    jump: false,
};

const LEFT: TickInput = TickInput {
    left: true,
    right: false,
    jump: false,
};

#[test]
fn rest_on_ground_plane_is_idempotent() {
    let mut sim = sim_with(|_, _| false);
    place_box(&mut sim, 100.0, GROUND_Y);

    for _ in 0..5 {
        sim.tick(&NO_INPUT);
        let b = sim.player.collision_box();
        assert_eq!(b.x, 100.0);
        assert_eq!(b.y, GROUND_Y);
        assert_eq!(sim.player.velocity_y, 0.0);
    }
}

#[test]
fn rest_on_tile_top_is_idempotent() {
    // Solid row 10, tile tops at y = 160
    let mut sim = sim_with(|_, y| y == 10);
    place_box(&mut sim, 100.0, 160.0 - 32.0);

    for _ in 0..5 {
        sim.tick(&NO_INPUT);
        let b = sim.player.collision_box();
        assert_eq!(b.y, 160.0 - 32.0);
        assert_eq!(sim.player.velocity_y, 0.0);
    }
}

#[test]
fn falling_lands_exactly_on_the_ground_plane() {
    let mut sim = sim_with(|_, _| false);
    place_box(&mut sim, 100.0, 100.0);

    let mut landed_at = None;
    for t in 0..500 {
        sim.tick(&NO_INPUT);
        let b = sim.player.collision_box();
        assert!(b.y <= GROUND_Y, "box never overshoots below the ground");
        if b.y == GROUND_Y {
            assert_eq!(sim.player.velocity_y, 0.0, "velocity resets on the landing tick");
            landed_at = Some(t);
            break;
        }
        assert!(sim.player.velocity_y > 0.0);
    }
    assert!(landed_at.is_some(), "gravity must bring the box to the ground");
}

#[test]
fn jump_arc_rises_then_falls_under_constant_gravity() {
    let mut sim = sim_with(|_, _| false);
    place_box(&mut sim, 100.0, GROUND_Y);
    sim.tick(&NO_INPUT); // settle

    sim.tick(&TickInput {
        jump: true,
        ..NO_INPUT
    });
    assert!(sim.player.jumping);
    // jump_strength plus the tick's gravity
    assert!((sim.player.velocity_y - (-5.0 + 0.1)).abs() < 1e-5);

    let mut prev = sim.player.velocity_y;
    let mut landed = false;
    for _ in 0..500 {
        sim.tick(&NO_INPUT);
        if !sim.player.jumping && sim.player.collision_box().y == GROUND_Y {
            assert_eq!(sim.player.velocity_y, 0.0);
            landed = true;
            break;
        }
        assert!(
            sim.player.velocity_y > prev,
            "velocity climbs monotonically through the arc"
        );
        prev = sim.player.velocity_y;
    }
    assert!(landed, "the jump must come back down");
}

#[test]
fn walking_right_stops_at_the_wall_left_edge() {
    let mut sim = sim_with(|x, _| x == WALL_COL);
    place_box(&mut sim, 60.0, GROUND_Y);

    let wall_left = WALL_COL as f32 * TILE;
    for _ in 0..15 {
        sim.tick(&RIGHT);
        let b = sim.player.collision_box();
        assert!(b.x + b.w <= wall_left);
        assert!(!box_overlaps_solid(&sim));
    }
    let b = sim.player.collision_box();
    assert_eq!(b.x + b.w, wall_left);
}

#[test]
fn walking_left_stops_at_the_wall_right_edge() {
    let mut sim = sim_with(|x, _| x == WALL_COL);
    place_box(&mut sim, 200.0, GROUND_Y);

    let wall_right = (WALL_COL + 1) as f32 * TILE;
    for _ in 0..40 {
        sim.tick(&LEFT);
        let b = sim.player.collision_box();
        assert!(b.x >= wall_right);
        assert!(!box_overlaps_solid(&sim));
    }
    assert_eq!(sim.player.collision_box().x, wall_right);
}

#[test]
fn no_tick_ends_with_the_box_inside_a_tile() {
    let mut sim = sim_with(|x, _| x == WALL_COL);
    place_box(&mut sim, 60.0, GROUND_Y);

    // Push into the wall from both sides, on the ground and mid-jump
    for t in 0..160 {
        let input = TickInput {
            right: t < 80,
            left: t >= 80,
            jump: t % 20 == 0,
        };
        sim.tick(&input);
        assert!(!box_overlaps_solid(&sim), "tick {}: box inside a wall", t);
    }
}

#[test]
fn camera_clamps_at_map_corners_and_tracks_in_between() {
    let mut sim = sim_with(|_, _| false);
    let max_offset = vec2(640.0 - 320.0, 480.0 - 240.0);

    place_box(&mut sim, 5.0, 5.0);
    sim.tick(&NO_INPUT);
    assert_eq!(sim.camera.offset, vec2(0.0, 0.0));

    // The ground plane pins the box at y = 208, so the vertical offset tops
    // out at 208 - 120; the horizontal clamp is reached in full.
    place_box(&mut sim, 600.0, 400.0);
    sim.tick(&NO_INPUT);
    assert_eq!(sim.camera.offset, vec2(max_offset.x, GROUND_Y - 120.0));

    place_box(&mut sim, 300.0, 150.0);
    sim.tick(&NO_INPUT);
    assert_eq!(sim.camera.offset.x, 300.0 - 160.0);
    assert!((sim.camera.offset.y - (150.1 - 120.0)).abs() < 1e-3);

    assert!(sim.camera.offset.x >= 0.0 && sim.camera.offset.x <= max_offset.x);
    assert!(sim.camera.offset.y >= 0.0 && sim.camera.offset.y <= max_offset.y);
}

#[test]
fn zoom_is_clamped_to_configured_bounds() {
    let mut sim = sim_with(|_, _| false);
    assert_eq!(sim.zoom(), 1.0);

    for _ in 0..50 {
        sim.adjust_zoom(sim.config.zoom_step);
    }
    assert_eq!(sim.zoom(), sim.config.zoom_max);

    for _ in 0..50 {
        sim.adjust_zoom(-sim.config.zoom_step);
    }
    assert_eq!(sim.zoom(), sim.config.zoom_min);
}
