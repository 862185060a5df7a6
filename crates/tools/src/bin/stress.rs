use anyhow::Result;
use clap::Parser;
use game_core::geom::Rect;
use game_core::map::MapEvent;
use game_core::mapgen::{
    CommonGeneratorData, DecorationSpec, Distribution, EventStamp, GeneratorConfig, RadialConfig,
    ThreeLineConfig, generate,
};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the sweep itself
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of maps to generate per generator kind
    #[arg(short, long, default_value_t = 500)]
    runs: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("Sweeping {} maps per generator on sweep seed {}...", args.runs, args.seed);

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for run in 0..args.runs {
        let map_seed = rng.next_u64();
        // Keep room for the alt lines under worst-case paddings.
        let main_line_nodes = 5 + (rng.next_u64() % 4) as usize;

        let three_line = GeneratorConfig::ThreeLine(three_line_config(map_seed, main_line_nodes));
        check_invariants("three_line", &three_line);

        let radial = GeneratorConfig::Radial(radial_config(map_seed));
        check_invariants("radial", &radial);

        if (run + 1) % 100 == 0 {
            println!("{} / {}", run + 1, args.runs);
        }
    }

    println!("Sweep completed successfully.");
    Ok(())
}

fn check_invariants(name: &str, config: &GeneratorConfig) {
    let generated = generate(name, config)
        .unwrap_or_else(|error| panic!("{name}: generation failed: {error}"));
    let map = &generated.map;

    for node in map.graph.nodes() {
        assert!(
            node.edges.len() <= 4,
            "{name}: node {} has {} edges",
            node.index,
            node.edges.len()
        );
    }

    let reachable = map.unique_nodes();
    assert_eq!(reachable.len(), map.graph.len(), "{name}: orphaned nodes");
    assert!(reachable.contains(&map.end_node), "{name}: end node unreachable");

    let common = config.common();
    let bounds = game_core::geom::bounds_of(map.graph.nodes().iter().map(|node| node.pos))
        .expect("generated maps have nodes");
    let bounds = game_core::geom::extend_bounds(
        bounds,
        common.horizontal_extension,
        common.vertical_extension,
    );
    for (spec, decoration) in
        common.decorations.iter().zip(map.decorations.iter().chain(&map.animated_decorations))
    {
        let target = (spec.density * bounds.area()) as usize;
        assert!(
            decoration.instances.len() <= target,
            "{name}: decoration '{}' over target",
            decoration.texture
        );
        if !spec.check_node_collisions || spec.only_check_collisions_at_spawn_points {
            continue;
        }
        for node in map.graph.nodes() {
            let area = Rect::centered_square(node.pos, common.node_protected_area);
            for &(pos, scale) in &decoration.instances {
                let rect = Rect::new(
                    pos.x,
                    pos.y,
                    decoration.base_width * scale,
                    decoration.base_height * scale,
                );
                assert!(
                    !area.overlaps(rect),
                    "{name}: decoration '{}' at {pos:?} inside a protected area",
                    decoration.texture
                );
            }
        }
    }
}

fn decorations() -> Vec<DecorationSpec> {
    vec![DecorationSpec {
        distribution: Distribution::Random,
        decoration: "cactus".to_string(),
        base_width: 2.5,
        base_height: 4.0,
        density: 0.002,
        check_node_collisions: true,
        check_line_collisions: true,
        check_decoration_collisions: true,
        generate_decoration_collisions: true,
        only_check_collisions_at_spawn_points: false,
        scale: [0.8, 1.3],
        shrink_bounds_width: 0.0,
        shrink_bounds_height: 0.0,
        sort_by_y: true,
        animated: false,
    }]
}

fn common(seed: u64, biome: &str) -> CommonGeneratorData {
    CommonGeneratorData {
        seed,
        biome: biome.to_string(),
        node_protected_area: 7.0,
        horizontal_extension: 15.0,
        vertical_extension: 15.0,
        progress: [0.0, 10.0],
        decorations: decorations(),
    }
}

fn three_line_config(seed: u64, main_line_nodes: usize) -> ThreeLineConfig {
    ThreeLineConfig {
        common: common(seed, "wasteland"),
        road_length: 230.0,
        main_line_nodes,
        alt_lines_padding: [0, 1],
        alt_lines_offset: 24.0,
        variance_x: 4.0,
        variance_y: 4.0,
        start_area: "aqua_balle".to_string(),
        end_area: "salem".to_string(),
        exit_node_texture: "map_node_exit".to_string(),
        location_sign_protected_area_width: 24.0,
        location_sign_protected_area_height: 12.0,
        main_event: EventStamp {
            node_texture: "map_node_fight".to_string(),
            event: MapEvent::Encounter { completed: false },
        },
        events: vec![
            game_core::mapgen::ThreeLineEventSpawner {
                event: MapEvent::Shop { trader: "maravilla".to_string() },
                node_texture: "map_node_shop".to_string(),
                offset: [2, 4],
                line: -1,
            },
            game_core::mapgen::ThreeLineEventSpawner {
                event: MapEvent::Heal { amount: 20 },
                node_texture: "map_node_heal".to_string(),
                offset: [3, 5],
                line: 0,
            },
        ],
    }
}

fn radial_config(seed: u64) -> RadialConfig {
    RadialConfig {
        common: common(seed, "bewitched_forest"),
        radii: vec![30.0, 80.0, 150.0],
        branch_angle: [0.2, 0.5],
        events: vec![game_core::mapgen::RadialEventSpawner {
            event: MapEvent::Encounter { completed: false },
            node_texture: "map_node_fight".to_string(),
            ring: None,
            weight: 2,
            fixed_amount: None,
        }],
    }
}
