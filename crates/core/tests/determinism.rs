//! Cross-generator invariants: determinism, degree bounds,
//! connectivity, and decoration placement rules.

use proptest::prelude::*;

use game_core::geom::Rect;
use game_core::map::MapEvent;
use game_core::mapgen::{
    CommonGeneratorData, DecorationSpec, Distribution, EventStamp, GeneratorConfig, RadialConfig,
    ThreeLineConfig, generate,
};

fn decoration_specs() -> Vec<DecorationSpec> {
    vec![
        DecorationSpec {
            distribution: Distribution::Random,
            decoration: "cactus".to_string(),
            base_width: 2.0,
            base_height: 3.0,
            density: 0.003,
            check_node_collisions: true,
            check_line_collisions: true,
            check_decoration_collisions: false,
            generate_decoration_collisions: true,
            only_check_collisions_at_spawn_points: false,
            scale: [0.8, 1.4],
            shrink_bounds_width: 0.0,
            shrink_bounds_height: 0.0,
            sort_by_y: true,
            animated: false,
        },
        DecorationSpec {
            distribution: Distribution::FadeX {
                start: -20.0,
                end: 120.0,
                easing: game_core::Easing::SmoothStep,
            },
            decoration: "tumbleweed".to_string(),
            base_width: 1.0,
            base_height: 1.0,
            density: 0.001,
            check_node_collisions: false,
            check_line_collisions: false,
            check_decoration_collisions: false,
            generate_decoration_collisions: false,
            only_check_collisions_at_spawn_points: false,
            scale: [1.0, 1.0],
            shrink_bounds_width: 0.0,
            shrink_bounds_height: 0.0,
            sort_by_y: false,
            animated: true,
        },
    ]
}

fn common(seed: u64, biome: &str) -> CommonGeneratorData {
    CommonGeneratorData {
        seed,
        biome: biome.to_string(),
        node_protected_area: 6.0,
        horizontal_extension: 12.0,
        vertical_extension: 12.0,
        progress: [0.0, 10.0],
        decorations: decoration_specs(),
    }
}

fn three_line_config(seed: u64) -> GeneratorConfig {
    GeneratorConfig::ThreeLine(ThreeLineConfig {
        common: common(seed, "wasteland"),
        road_length: 220.0,
        main_line_nodes: 6,
        alt_lines_padding: [0, 1],
        alt_lines_offset: 25.0,
        variance_x: 4.0,
        variance_y: 4.0,
        start_area: "aqua_balle".to_string(),
        end_area: "salem".to_string(),
        exit_node_texture: "map_node_exit".to_string(),
        location_sign_protected_area_width: 25.0,
        location_sign_protected_area_height: 12.0,
        main_event: EventStamp {
            node_texture: "map_node_fight".to_string(),
            event: MapEvent::Encounter { completed: false },
        },
        events: Vec::new(),
    })
}

fn radial_config(seed: u64) -> GeneratorConfig {
    GeneratorConfig::Radial(RadialConfig {
        common: common(seed, "magenta_mountains"),
        radii: vec![30.0, 80.0, 150.0],
        branch_angle: [0.2, 0.45],
        events: Vec::new(),
    })
}

fn all_configs(seed: u64) -> Vec<(&'static str, GeneratorConfig)> {
    vec![("three_line", three_line_config(seed)), ("radial", radial_config(seed))]
}

#[test]
fn generating_twice_with_the_same_inputs_is_bit_identical() {
    for seed in [0_u64, 1, 42, 99_999, u64::MAX] {
        for (name, config) in all_configs(seed) {
            let a = generate(name, &config).expect("generate");
            let b = generate(name, &config).expect("generate");
            assert_eq!(
                a.map.canonical_bytes(),
                b.map.canonical_bytes(),
                "{name} with seed {seed} must be reproducible"
            );
            assert_eq!(a.map.fingerprint(), b.map.fingerprint());
            assert_eq!(a.warnings, b.warnings);
        }
    }
}

#[test]
fn different_seeds_change_the_fingerprint() {
    for (name, config) in all_configs(7) {
        let baseline = generate(name, &config).expect("generate");
        let other = match name {
            "three_line" => generate(name, &three_line_config(8)).expect("generate"),
            _ => generate(name, &radial_config(8)).expect("generate"),
        };
        assert_ne!(baseline.map.fingerprint(), other.map.fingerprint());
    }
}

#[test]
fn every_generated_node_respects_the_degree_bound() {
    for seed in 0_u64..25 {
        for (name, config) in all_configs(seed) {
            let generated = generate(name, &config).expect("generate");
            for node in generated.map.graph.nodes() {
                assert!(
                    node.edges.len() <= 4,
                    "{name} seed {seed}: node {} has {} edges",
                    node.index,
                    node.edges.len()
                );
            }
        }
    }
}

#[test]
fn the_start_node_always_reaches_the_end_node() {
    for seed in 0_u64..25 {
        for (name, config) in all_configs(seed) {
            let generated = generate(name, &config).expect("generate");
            let reachable = generated.map.unique_nodes();
            assert!(
                reachable.contains(&generated.map.end_node),
                "{name} seed {seed}: end node unreachable"
            );
            assert_eq!(
                reachable.len(),
                generated.map.graph.len(),
                "{name} seed {seed}: orphaned nodes"
            );
        }
    }
}

#[test]
fn decoration_counts_never_exceed_the_density_target() {
    for seed in [3_u64, 17, 4_242] {
        for (name, config) in all_configs(seed) {
            let generated = generate(name, &config).expect("generate");
            let bounds = map_bounds(&generated.map, &config);
            for (spec, decoration) in decoration_specs()
                .iter()
                .zip(generated.map.decorations.iter().chain(&generated.map.animated_decorations))
            {
                let target = (spec.density * bounds.area()) as usize;
                assert!(
                    decoration.instances.len() <= target,
                    "{name} seed {seed}: {} instances over target {target}",
                    decoration.instances.len()
                );
            }
        }
    }
}

#[test]
fn node_checked_decorations_avoid_every_protected_area() {
    for seed in [3_u64, 17, 4_242] {
        for (name, config) in all_configs(seed) {
            let generated = generate(name, &config).expect("generate");
            let protected = config.common().node_protected_area;
            // The cactus spec checks node collisions and is the only
            // static decoration.
            let cactus = &generated.map.decorations[0];
            for node in generated.map.graph.nodes() {
                let area = Rect::centered_square(node.pos, protected);
                for &(pos, scale) in &cactus.instances {
                    let rect = Rect::new(
                        pos.x,
                        pos.y,
                        cactus.base_width * scale,
                        cactus.base_height * scale,
                    );
                    assert!(
                        !area.overlaps(rect),
                        "{name} seed {seed}: decoration at {pos:?} inside protected area of \
                         node {}",
                        node.index
                    );
                }
            }
        }
    }
}

fn map_bounds(map: &game_core::DetailMap, config: &GeneratorConfig) -> Rect {
    let common = config.common();
    let bounds = game_core::geom::bounds_of(map.graph.nodes().iter().map(|node| node.pos))
        .expect("generated maps have nodes");
    game_core::geom::extend_bounds(bounds, common.horizontal_extension, common.vertical_extension)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_seeds_keep_three_line_maps_connected(seed in any::<u64>()) {
        let generated = generate("prop", &three_line_config(seed)).expect("generate");
        let reachable = generated.map.unique_nodes();
        prop_assert_eq!(reachable.len(), generated.map.graph.len());
        prop_assert!(reachable.contains(&generated.map.end_node));
    }

    #[test]
    fn arbitrary_seeds_keep_radial_maps_perfect_trees(seed in any::<u64>()) {
        let generated = generate("prop", &radial_config(seed)).expect("generate");
        prop_assert_eq!(generated.map.graph.len(), 15);
        prop_assert_eq!(generated.map.unique_edges().len(), 14);
    }
}
