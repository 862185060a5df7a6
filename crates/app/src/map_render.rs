//! Direct rendering of a detail map: roads, nodes, decorations, the
//! player marker, and the event overlay.

use app::app_loop::AppState;
use app::{format_fingerprint, format_seed};
use game_core::geom::Vec2;
use game_core::map::MapEvent;
use macroquad::prelude::*;

const ROAD_COLOR: Color = Color { r: 0.45, g: 0.35, b: 0.25, a: 1.0 };
const NODE_RADIUS: f32 = 5.0;
const PLAYER_RADIUS: f32 = 3.5;
const PLAYER_COLOR: Color = Color { r: 0.95, g: 0.9, b: 0.3, a: 1.0 };
const COMPLETED_ALPHA: f32 = 0.35;
const OVERLAY_BG: Color = Color { r: 0.05, g: 0.05, b: 0.08, a: 0.85 };
const HUD_FONT_SIZE: f32 = 18.0;
const WORLD_SCALE: f32 = 3.0;

pub fn draw_frame(state: &AppState, seed: u64) {
    let camera = state.player_pos() + state.map.cam_pos_offset;

    for decoration in state.map.decorations.iter().chain(&state.map.animated_decorations) {
        let color = decoration_color(&decoration.texture);
        for &(pos, scale) in &decoration.instances {
            let screen = world_to_screen(pos, camera);
            draw_rectangle(
                screen.x,
                screen.y,
                decoration.base_width * scale * WORLD_SCALE,
                decoration.base_height * scale * WORLD_SCALE,
                color,
            );
        }
    }

    for &(a, b) in &state.map.unique_edges() {
        let from = world_to_screen(state.map.graph.node(a).pos, camera);
        let to = world_to_screen(state.map.graph.node(b).pos, camera);
        draw_line(from.x, from.y, to.x, to.y, 2.0, ROAD_COLOR);
    }

    for node in state.map.graph.nodes() {
        let mut color = event_color(&node.event);
        if state.save.is_completed(node.index) {
            color.a = COMPLETED_ALPHA;
        }
        let screen = world_to_screen(node.pos, camera);
        draw_circle(screen.x, screen.y, NODE_RADIUS, color);
    }

    let player = world_to_screen(state.player_pos(), camera);
    draw_circle(player.x, player.y, PLAYER_RADIUS, PLAYER_COLOR);

    draw_hud(state, seed);
    draw_overlay(state);
}

fn draw_hud(state: &AppState, seed: u64) {
    let line = format!(
        "{} [{}]  seed {}  map {}",
        state.map.name,
        state.map.biome,
        format_seed(seed),
        format_fingerprint(state.map.fingerprint()),
    );
    draw_text(&line, 12.0, 24.0, HUD_FONT_SIZE, LIGHTGRAY);
    draw_text(
        "arrows: travel   space: confirm   r: reroll   m: next biome",
        12.0,
        44.0,
        HUD_FONT_SIZE,
        GRAY,
    );
}

fn draw_overlay(state: &AppState) {
    let lines = state.overlay_lines();
    if lines.is_empty() {
        return;
    }
    let width = screen_width() * 0.5;
    let height = 40.0 + lines.len() as f32 * 24.0;
    let x = (screen_width() - width) / 2.0;
    let y = screen_height() - height - 30.0;
    draw_rectangle(x, y, width, height, OVERLAY_BG);
    for (index, line) in lines.iter().enumerate() {
        draw_text(line, x + 16.0, y + 28.0 + index as f32 * 24.0, 20.0, WHITE);
    }
}

fn world_to_screen(pos: Vec2, camera: Vec2) -> Vec2 {
    Vec2::new(
        screen_width() / 2.0 + (pos.x - camera.x) * WORLD_SCALE,
        screen_height() / 2.0 - (pos.y - camera.y) * WORLD_SCALE,
    )
}

fn event_color(event: &MapEvent) -> Color {
    match event {
        MapEvent::Empty => GRAY,
        MapEvent::Encounter { .. } => RED,
        MapEvent::EnterMap { .. } => SKYBLUE,
        MapEvent::Dialog { .. } => ORANGE,
        MapEvent::Shop { .. } => GOLD,
        MapEvent::Heal { .. } => GREEN,
        MapEvent::ChooseCard { .. } => PURPLE,
    }
}

/// Stable pseudo-color per decoration handle.
fn decoration_color(texture: &str) -> Color {
    let hash = texture.bytes().fold(0u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u32));
    Color {
        r: 0.2 + (hash % 64) as f32 / 160.0,
        g: 0.35 + ((hash >> 6) % 64) as f32 / 160.0,
        b: 0.2 + ((hash >> 12) % 64) as f32 / 200.0,
        a: 1.0,
    }
}
