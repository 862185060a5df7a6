//! Road-style topology: a main line of nodes between two exits, with
//! two parallel alternative lines.

use serde::{Deserialize, Serialize};

use crate::geom::{Rect, Vec2};
use crate::map::event::MapEvent;
use crate::map::graph::NodeKey;
use crate::map::model::DetailMap;

use super::base::{CommonGeneratorData, GeneratorScaffold};
use super::{GeneratedMap, GenerateError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeLineConfig {
    #[serde(flatten)]
    pub common: CommonGeneratorData,
    /// Distance between the start and end exits.
    pub road_length: f32,
    pub main_line_nodes: usize,
    /// Inclusive range of main-line nodes skipped before an alt line
    /// starts and after it ends.
    pub alt_lines_padding: [usize; 2],
    /// Vertical offset of the two alt lines.
    pub alt_lines_offset: f32,
    pub variance_x: f32,
    pub variance_y: f32,
    pub start_area: String,
    pub end_area: String,
    pub exit_node_texture: String,
    pub location_sign_protected_area_width: f32,
    pub location_sign_protected_area_height: f32,
    /// Event stamped on every node no spawner claims.
    pub main_event: EventStamp,
    #[serde(default)]
    pub events: Vec<ThreeLineEventSpawner>,
}

/// An event plus the node texture marking it on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStamp {
    pub node_texture: String,
    pub event: MapEvent,
}

/// Stamps an event onto line nodes at randomized intervals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeLineEventSpawner {
    pub event: MapEvent,
    pub node_texture: String,
    /// Inclusive range the node cursor advances by per stamp.
    pub offset: [usize; 2],
    /// Target line: -1 for all lines, 0 main, 1 and 2 for the alts.
    pub line: i32,
}

pub(super) fn generate(
    name: &str,
    config: &ThreeLineConfig,
) -> Result<GeneratedMap, GenerateError> {
    if config.main_line_nodes == 0 {
        return Err(GenerateError::EmptyMainLine);
    }
    validate_spawners(config)?;

    let mut scaffold =
        GeneratorScaffold::new(name, config.common.seed, config.common.node_protected_area);

    let sign_width = config.location_sign_protected_area_width;
    let sign_height = config.location_sign_protected_area_height;

    let start = scaffold.new_node(Vec2::ZERO);
    scaffold.setup_exit_node(start, &config.start_area, &config.exit_node_texture);
    scaffold.add_protected_rect(Rect::new(-sign_width, -sign_height / 2.0, sign_width, sign_height));

    let end = scaffold.new_node(Vec2::new(config.road_length, 0.0));
    scaffold.setup_exit_node(end, &config.end_area, &config.exit_node_texture);
    scaffold.add_protected_rect(Rect::new(
        config.road_length,
        -sign_height / 2.0,
        sign_width,
        sign_height,
    ));

    let main_line =
        generate_line(&mut scaffold, config, start, end, config.main_line_nodes, 0.0)?;
    let alt_line_1 = add_alt_line(&mut scaffold, config, &main_line, config.alt_lines_offset)?;
    let alt_line_2 = add_alt_line(&mut scaffold, config, &main_line, -config.alt_lines_offset)?;

    scaffold
        .compute_bounds(config.common.horizontal_extension, config.common.vertical_extension)?;

    // Shared spawners stamp first so line-specific ones can overwrite
    // at the same index; that order is part of the map format.
    for (line_index, line) in [&main_line, &alt_line_1, &alt_line_2].into_iter().enumerate() {
        let spawners: Vec<&ThreeLineEventSpawner> = config
            .events
            .iter()
            .filter(|spawner| spawner.line == -1)
            .chain(config.events.iter().filter(|spawner| spawner.line == line_index as i32))
            .collect();
        assign_events(&mut scaffold, line, &spawners, &config.main_event);
    }

    let (decorations, animated_decorations) =
        scaffold.generate_decorations(&config.common.decorations);
    let graph = scaffold.finish_graph();

    Ok(GeneratedMap {
        map: DetailMap {
            name: name.to_string(),
            graph,
            start_node: scaffold.index_of(start),
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

/// Evenly spaced, jittered nodes chained between two anchors.
///
/// Returns only the newly created intermediate nodes; the anchors keep
/// their own identity.
fn generate_line(
    scaffold: &mut GeneratorScaffold,
    config: &ThreeLineConfig,
    start: NodeKey,
    end: NodeKey,
    node_count: usize,
    offset_y: f32,
) -> Result<Vec<NodeKey>, GenerateError> {
    let start_pos = scaffold.pos_of(start);
    let end_pos = scaffold.pos_of(end);
    let distance_per_node = (end_pos.x - start_pos.x) / (node_count as f32 + 1.0);
    let average_y = (end_pos.y + start_pos.y) / 2.0;

    let mut nodes = Vec::with_capacity(node_count);
    let mut current_x = start_pos.x + distance_per_node;
    for _ in 0..node_count {
        let jitter_x = scaffold.rng().f32_in(-config.variance_x..=config.variance_x);
        let jitter_y = scaffold.rng().f32_in(-config.variance_y..=config.variance_y);
        let node =
            scaffold.new_node(Vec2::new(current_x + jitter_x, average_y + jitter_y + offset_y));
        current_x += distance_per_node;
        if let Some(&previous) = nodes.last() {
            scaffold.connect_nodes(previous, node)?;
        }
        nodes.push(node);
    }

    let first = *nodes.first().expect("line has at least one node");
    let last = *nodes.last().expect("line has at least one node");
    scaffold.connect_nodes(first, start)?;
    scaffold.connect_nodes(last, end)?;
    Ok(nodes)
}

/// A parallel line spanning a random sub-range of the main line.
fn add_alt_line(
    scaffold: &mut GeneratorScaffold,
    config: &ThreeLineConfig,
    main_line: &[NodeKey],
    offset_y: f32,
) -> Result<Vec<NodeKey>, GenerateError> {
    let [padding_lo, padding_hi] = config.alt_lines_padding;
    let start_padding = scaffold.rng().usize_in(padding_lo..=padding_hi);
    let end_padding = scaffold.rng().usize_in(padding_lo..=padding_hi);

    let room = main_line.len() as i64 - end_padding as i64 - start_padding as i64 - 2;
    if room < 1 {
        return Err(GenerateError::AltLineHasNoRoom {
            main_line_nodes: main_line.len(),
            start_padding,
            end_padding,
        });
    }

    let start_anchor = main_line[start_padding];
    let end_anchor = main_line[main_line.len() - end_padding - 1];
    generate_line(scaffold, config, start_anchor, end_anchor, room as usize, offset_y)
}

/// Default-stamps every node, then walks each spawner's cursor across
/// the line. Later spawners overwrite earlier stamps at the same index.
fn assign_events(
    scaffold: &mut GeneratorScaffold,
    line: &[NodeKey],
    spawners: &[&ThreeLineEventSpawner],
    main_event: &EventStamp,
) {
    let mut stamps: Vec<(&str, &MapEvent)> =
        vec![(main_event.node_texture.as_str(), &main_event.event); line.len()];

    for spawner in spawners {
        let [offset_lo, offset_hi] = spawner.offset;
        let mut cursor = 0usize;
        loop {
            cursor += scaffold.rng().usize_in(offset_lo..=offset_hi);
            if cursor >= stamps.len() {
                break;
            }
            stamps[cursor] = (spawner.node_texture.as_str(), &spawner.event);
        }
    }

    for (&node, (texture, event)) in line.iter().zip(stamps) {
        scaffold.set_event(node, event.clone());
        scaffold.set_node_texture(node, texture);
    }
}

fn validate_spawners(config: &ThreeLineConfig) -> Result<(), GenerateError> {
    for spawner in &config.events {
        let [lo, hi] = spawner.offset;
        if hi == 0 || lo > hi {
            return Err(GenerateError::InvalidEventOffset {
                event: spawner.event.display_name(),
                offset: spawner.offset,
            });
        }
    }
    Ok(())
}
