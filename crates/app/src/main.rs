mod frame_input;
mod map_render;
mod window_config;

use std::path::Path;
use std::process;

use app::app_loop::AppState;
use app::presets::{self, BIOMES};
use app::save_location::default_save_path;
use app::seed;
use game_core::mapgen::generate;
use game_core::save::{self, SaveState};
use macroquad::prelude::*;

#[macroquad::main(build_conf)]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let seed_choice = match seed::resolve_seed(&args, seed::runtime_seed()) {
        Ok(choice) => choice,
        Err(message) => {
            eprintln!("{message}");
            process::exit(2);
        }
    };

    let mut run_seed = seed_choice.value();
    let mut biome_index = 0;
    let save_path = default_save_path();

    let mut state = build_state(BIOMES[biome_index], run_seed, save_path.as_deref());

    loop {
        let input = frame_input::capture_frame_input();

        if input.regenerate {
            run_seed = seed::runtime_seed();
            state = build_state(BIOMES[biome_index], run_seed, save_path.as_deref());
        } else if input.next_biome {
            biome_index = (biome_index + 1) % BIOMES.len();
            state = build_state(BIOMES[biome_index], run_seed, save_path.as_deref());
        } else {
            let save_before = state.save.clone();
            state.tick(&input);
            if state.save != save_before
                && let Some(path) = &save_path
                && let Err(error) = save::write_save(&state.save, path)
            {
                eprintln!("failed to write save: {error}");
            }
        }

        clear_background(Color { r: 0.08, g: 0.07, b: 0.06, a: 1.0 });
        map_render::draw_frame(&state, run_seed);
        next_frame().await
    }
}

fn build_conf() -> Conf {
    window_config::build_window_conf()
}

/// Generates the biome's map and restores the save when it still
/// matches; config or generation failures are fatal at startup.
fn build_state(biome: &str, run_seed: u64, save_path: Option<&Path>) -> AppState {
    let config = presets::preset(biome, run_seed).unwrap_or_else(|message| {
        eprintln!("{message}");
        process::exit(2);
    });
    let generated = generate(biome, &config).unwrap_or_else(|error| {
        eprintln!("map generation failed: {error}");
        process::exit(2);
    });
    for warning in &generated.warnings {
        eprintln!("warning: {warning}");
    }

    let map = generated.map;
    let restored = save_path
        .and_then(|path| save::load_save(path).ok())
        .filter(|saved| saved.current_map == map.name && saved.current_node < map.graph.len());
    let save = restored.unwrap_or_else(|| SaveState::new(map.name.clone(), map.start_node));
    AppState::new(map, save)
}
