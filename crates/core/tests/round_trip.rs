//! Persistence round-trips: generated maps survive the JSON map
//! format, and generator configs parse from their external form.

use game_core::map::map_file;
use game_core::mapgen::{GeneratorConfig, generate};

const THREE_LINE_CONFIG: &str = r#"{
    "generator": "threeLine",
    "seed": 42,
    "biome": "wasteland",
    "nodeProtectedArea": 6.0,
    "horizontalExtension": 12.0,
    "verticalExtension": 12.0,
    "progress": [0.0, 10.0],
    "decorations": [
        {
            "distribution": { "kind": "random" },
            "decoration": "cactus",
            "baseWidth": 2.0,
            "baseHeight": 3.0,
            "density": 0.002,
            "checkNodeCollisions": true,
            "checkLineCollisions": true,
            "checkDecorationCollisions": false,
            "generateDecorationCollisions": true,
            "onlyCheckCollisionsAtSpawnPoints": false,
            "scale": [0.8, 1.3],
            "sortByY": true,
            "animated": false
        },
        {
            "distribution": { "kind": "fadeX", "start": -10.0, "end": 100.0, "easing": "circleOut" },
            "decoration": "dust_cloud",
            "baseWidth": 4.0,
            "baseHeight": 2.0,
            "density": 0.0005,
            "checkNodeCollisions": false,
            "checkLineCollisions": false,
            "checkDecorationCollisions": false,
            "generateDecorationCollisions": false,
            "onlyCheckCollisionsAtSpawnPoints": false,
            "scale": [1.0, 1.0],
            "sortByY": false,
            "animated": true
        }
    ],
    "roadLength": 200.0,
    "mainLineNodes": 5,
    "altLinesPadding": [0, 1],
    "altLinesOffset": 20.0,
    "varianceX": 3.0,
    "varianceY": 3.0,
    "startArea": "aqua_balle",
    "endArea": "salem",
    "exitNodeTexture": "map_node_exit",
    "locationSignProtectedAreaWidth": 25.0,
    "locationSignProtectedAreaHeight": 12.0,
    "mainEvent": {
        "nodeTexture": "map_node_fight",
        "event": { "kind": "encounter" }
    },
    "events": [
        {
            "event": { "kind": "shop", "trader": "maravilla" },
            "nodeTexture": "map_node_shop",
            "offset": [2, 4],
            "line": -1
        },
        {
            "event": { "kind": "heal", "amount": 20 },
            "nodeTexture": "map_node_heal",
            "offset": [3, 5],
            "line": 0
        }
    ]
}"#;

const RADIAL_CONFIG: &str = r#"{
    "generator": "radial",
    "seed": 7,
    "biome": "magenta_mountains",
    "nodeProtectedArea": 6.0,
    "horizontalExtension": 15.0,
    "verticalExtension": 15.0,
    "progress": [3.0, 7.0],
    "radii": [30.0, 80.0, 150.0],
    "branchAngle": [0.2, 0.45],
    "events": [
        {
            "event": { "kind": "encounter" },
            "nodeTexture": "map_node_fight",
            "weight": 3
        },
        {
            "event": { "kind": "chooseCard", "groups": ["bullet", "silver"] },
            "nodeTexture": "map_node_card",
            "ring": 2,
            "weight": 1,
            "fixedAmount": 2
        }
    ]
}"#;

#[test]
fn three_line_config_parses_from_external_json() {
    let config: GeneratorConfig =
        serde_json::from_str(THREE_LINE_CONFIG).expect("config must parse");
    let GeneratorConfig::ThreeLine(three_line) = &config else {
        panic!("wrong generator variant");
    };
    assert_eq!(three_line.common.seed, 42);
    assert_eq!(three_line.main_line_nodes, 5);
    assert_eq!(three_line.events.len(), 2);
    assert_eq!(three_line.common.decorations.len(), 2);
}

#[test]
fn radial_config_parses_from_external_json() {
    let config: GeneratorConfig = serde_json::from_str(RADIAL_CONFIG).expect("config must parse");
    let GeneratorConfig::Radial(radial) = &config else {
        panic!("wrong generator variant");
    };
    assert_eq!(radial.radii, vec![30.0, 80.0, 150.0]);
    assert_eq!(radial.events[1].fixed_amount, Some(2));
    assert_eq!(radial.events[1].ring, Some(2));
}

#[test]
fn unknown_generator_name_is_a_fatal_config_error() {
    let broken = THREE_LINE_CONFIG.replace("\"threeLine\"", "\"spiral\"");
    let parsed: Result<GeneratorConfig, _> = serde_json::from_str(&broken);
    assert!(parsed.is_err());
}

#[test]
fn unknown_distribution_name_is_a_fatal_config_error() {
    let broken = THREE_LINE_CONFIG.replace("\"random\"", "\"poisson\"");
    let parsed: Result<GeneratorConfig, _> = serde_json::from_str(&broken);
    assert!(parsed.is_err());
}

#[test]
fn generated_three_line_maps_survive_the_map_file_format() {
    let config: GeneratorConfig = serde_json::from_str(THREE_LINE_CONFIG).expect("parse");
    let generated = generate("roads_to_salem", &config).expect("generate");

    let json = map_file::to_json(&generated.map).expect("serialize");
    let loaded = map_file::from_json(&json).expect("reparse");

    assert_eq!(loaded.graph.len(), generated.map.graph.len());
    assert_eq!(loaded.unique_edges().len(), generated.map.unique_edges().len());
    let loaded_instances: usize = loaded
        .decorations
        .iter()
        .chain(&loaded.animated_decorations)
        .map(|decoration| decoration.instances.len())
        .sum();
    let generated_instances: usize = generated
        .map
        .decorations
        .iter()
        .chain(&generated.map.animated_decorations)
        .map(|decoration| decoration.instances.len())
        .sum();
    assert_eq!(loaded_instances, generated_instances);
    assert_eq!(loaded, generated.map, "round trip must be lossless");
}

#[test]
fn generated_radial_maps_survive_the_map_file_format() {
    let config: GeneratorConfig = serde_json::from_str(RADIAL_CONFIG).expect("parse");
    let generated = generate("the_bewitched_forest", &config).expect("generate");

    let json = map_file::to_json(&generated.map).expect("serialize");
    let loaded = map_file::from_json(&json).expect("reparse");
    assert_eq!(loaded, generated.map);
    assert_eq!(loaded.fingerprint(), generated.map.fingerprint());
}
