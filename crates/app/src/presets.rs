//! Built-in generator configs, one per biome.
//!
//! These are the same JSON documents the `mapgen` tool accepts; a
//! parse failure here is a fatal startup error.

use game_core::mapgen::GeneratorConfig;

pub const BIOMES: [&str; 2] = ["wasteland", "bewitched_forest"];

const WASTELAND: &str = r#"{
    "generator": "threeLine",
    "seed": 42,
    "biome": "wasteland",
    "nodeProtectedArea": 8.0,
    "horizontalExtension": 20.0,
    "verticalExtension": 18.0,
    "progress": [0.0, 10.0],
    "decorations": [
        {
            "distribution": { "kind": "random" },
            "decoration": "cactus",
            "baseWidth": 3.0,
            "baseHeight": 5.0,
            "density": 0.0025,
            "checkNodeCollisions": true,
            "checkLineCollisions": true,
            "checkDecorationCollisions": true,
            "generateDecorationCollisions": true,
            "onlyCheckCollisionsAtSpawnPoints": false,
            "scale": [0.7, 1.3],
            "sortByY": true,
            "animated": false
        },
        {
            "distribution": { "kind": "random" },
            "decoration": "bone_pile",
            "baseWidth": 2.0,
            "baseHeight": 1.5,
            "density": 0.0008,
            "checkNodeCollisions": true,
            "checkLineCollisions": false,
            "checkDecorationCollisions": false,
            "generateDecorationCollisions": false,
            "onlyCheckCollisionsAtSpawnPoints": true,
            "scale": [0.8, 1.1],
            "sortByY": true,
            "animated": false
        },
        {
            "distribution": { "kind": "fadeX", "start": 0.0, "end": 240.0, "easing": "circleOut" },
            "decoration": "tumbleweed",
            "baseWidth": 1.5,
            "baseHeight": 1.5,
            "density": 0.0004,
            "checkNodeCollisions": false,
            "checkLineCollisions": false,
            "checkDecorationCollisions": false,
            "generateDecorationCollisions": false,
            "onlyCheckCollisionsAtSpawnPoints": false,
            "scale": [0.9, 1.2],
            "sortByY": false,
            "animated": true
        }
    ],
    "roadLength": 240.0,
    "mainLineNodes": 6,
    "altLinesPadding": [0, 1],
    "altLinesOffset": 26.0,
    "varianceX": 4.0,
    "varianceY": 4.0,
    "startArea": "aqua_balle",
    "endArea": "salem",
    "exitNodeTexture": "map_node_exit",
    "locationSignProtectedAreaWidth": 28.0,
    "locationSignProtectedAreaHeight": 14.0,
    "mainEvent": {
        "nodeTexture": "map_node_fight",
        "event": { "kind": "encounter" }
    },
    "events": [
        {
            "event": { "kind": "shop", "trader": "maravilla" },
            "nodeTexture": "map_node_shop",
            "offset": [3, 5],
            "line": -1
        },
        {
            "event": { "kind": "heal", "amount": 25 },
            "nodeTexture": "map_node_heal",
            "offset": [2, 4],
            "line": 1
        },
        {
            "event": { "kind": "chooseCard", "groups": ["bullet"] },
            "nodeTexture": "map_node_card",
            "offset": [2, 4],
            "line": 2
        }
    ]
}"#;

const BEWITCHED_FOREST: &str = r#"{
    "generator": "radial",
    "seed": 42,
    "biome": "bewitched_forest",
    "nodeProtectedArea": 8.0,
    "horizontalExtension": 25.0,
    "verticalExtension": 25.0,
    "progress": [10.0, 20.0],
    "decorations": [
        {
            "distribution": { "kind": "random" },
            "decoration": "spruce",
            "baseWidth": 3.0,
            "baseHeight": 7.0,
            "density": 0.003,
            "checkNodeCollisions": true,
            "checkLineCollisions": true,
            "checkDecorationCollisions": true,
            "generateDecorationCollisions": true,
            "onlyCheckCollisionsAtSpawnPoints": false,
            "scale": [0.8, 1.4],
            "sortByY": true,
            "animated": false
        },
        {
            "distribution": { "kind": "random" },
            "decoration": "will_o_wisp",
            "baseWidth": 1.0,
            "baseHeight": 1.0,
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
    "radii": [30.0, 80.0, 150.0],
    "branchAngle": [0.25, 0.5],
    "events": [
        {
            "event": { "kind": "encounter" },
            "nodeTexture": "map_node_fight",
            "weight": 3
        },
        {
            "event": { "kind": "dialog", "npc": "hermit" },
            "nodeTexture": "map_node_dialog",
            "weight": 1
        },
        {
            "event": { "kind": "shop", "trader": "crone" },
            "nodeTexture": "map_node_shop",
            "ring": 1,
            "weight": 1,
            "fixedAmount": 1
        }
    ]
}"#;

/// The embedded config for a biome, with the run seed applied.
pub fn preset(biome: &str, seed: u64) -> Result<GeneratorConfig, String> {
    let text = match biome {
        "wasteland" => WASTELAND,
        "bewitched_forest" => BEWITCHED_FOREST,
        _ => return Err(format!("unknown biome preset: {biome}")),
    };
    let mut config: GeneratorConfig =
        serde_json::from_str(text).map_err(|e| format!("invalid preset '{biome}': {e}"))?;
    config.set_seed(seed);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use game_core::mapgen::generate;

    use super::*;

    #[test]
    fn every_preset_parses_and_generates() {
        for biome in BIOMES {
            let config = preset(biome, 123).expect("preset parses");
            assert_eq!(config.common().seed, 123, "seed override applies");
            let generated = generate(biome, &config).expect("preset generates");
            assert!(generated.map.graph.len() > 1);
        }
    }

    #[test]
    fn unknown_biome_is_an_error() {
        assert!(preset("moon_base", 1).is_err());
    }
}
