//! Radial topology: binary branching outward from an origin across a
//! fixed list of concentric radii.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;
use crate::map::event::MapEvent;
use crate::map::graph::NodeKey;
use crate::map::model::DetailMap;

use super::base::{CommonGeneratorData, GenerationWarning, GeneratorScaffold};
use super::{GeneratedMap, GenerateError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadialConfig {
    #[serde(flatten)]
    pub common: CommonGeneratorData,
    /// Distances of the rings from the origin, innermost first.
    pub radii: Vec<f32>,
    /// Inclusive range (radians) of the branch angle offset drawn once
    /// per parent.
    pub branch_angle: [f32; 2],
    #[serde(default)]
    pub events: Vec<RadialEventSpawner>,
}

/// Event assignment rule for radial maps.
///
/// Spawners without `fixed_amount` compete by weight for every node of
/// their rings; `fixed_amount` spawners then claim that many distinct
/// nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadialEventSpawner {
    pub event: MapEvent,
    pub node_texture: String,
    /// Restricts the spawner to one ring (0 = innermost); `None` means
    /// every ring.
    #[serde(default)]
    pub ring: Option<usize>,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub fixed_amount: Option<usize>,
}

fn default_weight() -> u32 {
    1
}

pub(super) fn generate(name: &str, config: &RadialConfig) -> Result<GeneratedMap, GenerateError> {
    if config.radii.is_empty() {
        return Err(GenerateError::EmptyRadiusList);
    }
    for spawner in &config.events {
        if let Some(ring) = spawner.ring
            && ring >= config.radii.len()
        {
            return Err(GenerateError::UnknownRing { ring, rings: config.radii.len() });
        }
    }

    let mut scaffold =
        GeneratorScaffold::new(name, config.common.seed, config.common.node_protected_area);

    let origin = scaffold.new_node(Vec2::ZERO);
    let initial_angle = scaffold.rng().f32_in(0.0..=TAU);

    // Every parent branches into two children on the next ring, so the
    // graph is a perfect binary tree of depth radii.len().
    let mut rings: Vec<Vec<NodeKey>> = Vec::with_capacity(config.radii.len());
    let mut parents = vec![(origin, initial_angle)];
    for &radius in &config.radii {
        let mut ring = Vec::with_capacity(parents.len() * 2);
        let mut next_parents = Vec::with_capacity(parents.len() * 2);
        for &(parent, parent_angle) in &parents {
            let offset = scaffold.rng().f32_in(config.branch_angle[0]..=config.branch_angle[1]);
            for angle in [parent_angle - offset, parent_angle + offset] {
                let node =
                    scaffold.new_node(Vec2::new(angle.cos() * radius, angle.sin() * radius));
                scaffold.connect_nodes(parent, node)?;
                ring.push(node);
                next_parents.push((node, angle));
            }
        }
        rings.push(ring);
        parents = next_parents;
    }

    scaffold
        .compute_bounds(config.common.horizontal_extension, config.common.vertical_extension)?;

    assign_events(&mut scaffold, config, &rings);

    let (decorations, animated_decorations) =
        scaffold.generate_decorations(&config.common.decorations);
    let graph = scaffold.finish_graph();

    let end = *rings
        .last()
        .and_then(|ring| ring.last())
        .expect("radius list is non-empty, so the outer ring has nodes");

    Ok(GeneratedMap {
        map: DetailMap {
            name: name.to_string(),
            graph,
            start_node: scaffold.index_of(origin),
            end_node: scaffold.index_of(end),
            decorations,
            animated_decorations,
            is_area: false,
            biome: config.common.biome.clone(),
            progress: (config.common.progress[0], config.common.progress[1]),
            scrollable: true,
            cam_pos_offset: Vec2::ZERO,
        },
        warnings: scaffold.take_warnings(),
    })
}

fn assign_events(
    scaffold: &mut GeneratorScaffold,
    config: &RadialConfig,
    rings: &[Vec<NodeKey>],
) {
    for (ring_index, ring) in rings.iter().enumerate() {
        let candidates: Vec<&RadialEventSpawner> = config
            .events
            .iter()
            .filter(|spawner| spawner.fixed_amount.is_none())
            .filter(|spawner| spawner.ring.is_none() || spawner.ring == Some(ring_index))
            .collect();
        if candidates.is_empty() {
            continue;
        }
        let weights: Vec<u32> = candidates.iter().map(|spawner| spawner.weight).collect();
        for &node in ring {
            let chosen = candidates[scaffold.rng().weighted_index(&weights)];
            scaffold.set_event(node, chosen.event.clone());
            scaffold.set_node_texture(node, chosen.node_texture.clone());
        }
    }

    let mut claimed: Vec<NodeKey> = Vec::new();
    for spawner in &config.events {
        let Some(amount) = spawner.fixed_amount else {
            continue;
        };
        let pool: Vec<NodeKey> = match spawner.ring {
            Some(ring) => rings[ring].clone(),
            None => rings.iter().flatten().copied().collect(),
        };
        let mut placed = 0;
        while placed < amount {
            let free: Vec<NodeKey> =
                pool.iter().copied().filter(|node| !claimed.contains(node)).collect();
            if free.is_empty() {
                scaffold.warn(GenerationWarning::EventNodesExhausted {
                    event: spawner.event.display_name(),
                    requested: amount,
                    placed,
                });
                break;
            }
            let chosen = free[scaffold.rng().usize_in(0..=free.len() - 1)];
            scaffold.set_event(chosen, spawner.event.clone());
            scaffold.set_node_texture(chosen, spawner.node_texture.clone());
            claimed.push(chosen);
            placed += 1;
        }
    }
}
