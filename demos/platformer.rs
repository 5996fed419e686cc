use macroquad::prelude::*;
use tilerunner::{
    draw_frame, Player, PlayerConfig, PlayerSprites, SimConfig, Simulation, TickInput, TileAtlas,
    TileMap,
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Tiled Map Example".into(),
        window_width: 1920,
        window_height: 1080,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let map = TileMap::load_from_file("assets/map.json").expect("Failed to load map");
    let atlas = TileAtlas::load(&map)
        .await
        .expect("Failed to load tileset textures");

    let player_config = PlayerConfig::default();
    let sprites = PlayerSprites::load("assets/player", &player_config.clips)
        .await
        .expect("Failed to load player animation");

    let player = Player::new(vec2(0.0, 250.0), player_config);
    let mut sim = Simulation::new(SimConfig::default(), map, player)
        .expect("Map is missing a collision layer");

    loop {
        // Quit is checked once per iteration
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if is_key_down(KeyCode::KpAdd) || is_key_down(KeyCode::Equal) {
            sim.adjust_zoom(sim.config.zoom_step);
        }
        if is_key_down(KeyCode::KpSubtract) || is_key_down(KeyCode::Minus) {
            sim.adjust_zoom(-sim.config.zoom_step);
        }

        let input = TickInput {
            left: is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::D),
            jump: is_key_down(KeyCode::Space),
        };
        sim.tick(&input);

        clear_background(BLACK);

        // Project the logical viewport through the zoom level, y-down
        let view_w = screen_width() / sim.zoom();
        let view_h = screen_height() / sim.zoom();
        set_camera(&Camera2D::from_display_rect(Rect::new(
            0.0, view_h, view_w, -view_h,
        )));

        draw_frame(&sim, &atlas, &sprites);

        set_default_camera();
        draw_text(&format!("FPS: {}", get_fps()), 20.0, 40.0, 30.0, RED);

        next_frame().await;
    }
}
