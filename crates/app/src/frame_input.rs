//! Keyboard input collection for one rendered frame.

use app::app_loop::FrameInput;
use game_core::map::Direction;
use macroquad::prelude::{KeyCode, is_key_pressed};

pub fn capture_frame_input() -> FrameInput {
    let direction = if is_key_pressed(KeyCode::Up) {
        Some(Direction::Up)
    } else if is_key_pressed(KeyCode::Right) {
        Some(Direction::Right)
    } else if is_key_pressed(KeyCode::Down) {
        Some(Direction::Down)
    } else if is_key_pressed(KeyCode::Left) {
        Some(Direction::Left)
    } else {
        None
    };

    FrameInput {
        direction,
        confirm: is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::Enter),
        regenerate: is_key_pressed(KeyCode::R),
        next_biome: is_key_pressed(KeyCode::M),
    }
}
