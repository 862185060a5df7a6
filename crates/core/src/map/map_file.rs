//! On-disk JSON representation of a [`DetailMap`].
//!
//! The file stores the node list with indices as edge references, so a
//! loaded map reconstructs the exact graph that was written. Loading
//! validates the format version and the structural invariants of the
//! graph; any violation is a fatal error, there is no partial load.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;
use crate::map::event::MapEvent;
use crate::map::graph::{GraphError, MapGraph, MapNode};
use crate::map::model::{DetailMap, MapDecoration};

pub const MAP_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapFile {
    version: u32,
    name: String,
    nodes: Vec<NodeRecord>,
    start_node: usize,
    end_node: usize,
    decorations: Vec<DecorationRecord>,
    animated_decorations: Vec<DecorationRecord>,
    is_area: bool,
    biome: String,
    progress: [f32; 2],
    scrollable: bool,
    cam_pos_offset: [f32; 2],
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    x: f32,
    y: f32,
    edges_to: Vec<usize>,
    event: MapEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node_texture: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecorationRecord {
    texture: String,
    base_width: f32,
    base_height: f32,
    draw_in_background: bool,
    /// `[x, y, scale]` per instance.
    positions: Vec<[f32; 3]>,
}

#[derive(Debug)]
pub enum MapFileError {
    Io(io::Error),
    Parse(serde_json::Error),
    VersionMismatch { found: u32, expected: u32 },
    StartNodeOutOfRange { index: usize, len: usize },
    EndNodeOutOfRange { index: usize, len: usize },
    Graph(GraphError),
}

impl fmt::Display for MapFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "map file I/O error: {e}"),
            Self::Parse(e) => write!(f, "invalid map file: {e}"),
            Self::VersionMismatch { found, expected } => {
                write!(f, "map version mismatch: found {found}, expected {expected}")
            }
            Self::StartNodeOutOfRange { index, len } => {
                write!(f, "start node {index} out of range for {len} nodes")
            }
            Self::EndNodeOutOfRange { index, len } => {
                write!(f, "end node {index} out of range for {len} nodes")
            }
            Self::Graph(e) => write!(f, "invalid map graph: {e}"),
        }
    }
}

impl From<io::Error> for MapFileError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for MapFileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<GraphError> for MapFileError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

pub fn to_json(map: &DetailMap) -> Result<String, MapFileError> {
    let file = MapFile {
        version: MAP_FORMAT_VERSION,
        name: map.name.clone(),
        nodes: map
            .graph
            .nodes()
            .iter()
            .map(|node| NodeRecord {
                x: node.pos.x,
                y: node.pos.y,
                edges_to: node.edges.clone(),
                event: node.event.clone(),
                node_texture: node.node_texture.clone(),
            })
            .collect(),
        start_node: map.start_node,
        end_node: map.end_node,
        decorations: map.decorations.iter().map(decoration_record).collect(),
        animated_decorations: map.animated_decorations.iter().map(decoration_record).collect(),
        is_area: map.is_area,
        biome: map.biome.clone(),
        progress: [map.progress.0, map.progress.1],
        scrollable: map.scrollable,
        cam_pos_offset: [map.cam_pos_offset.x, map.cam_pos_offset.y],
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

pub fn from_json(text: &str) -> Result<DetailMap, MapFileError> {
    let file: MapFile = serde_json::from_str(text)?;
    if file.version != MAP_FORMAT_VERSION {
        return Err(MapFileError::VersionMismatch {
            found: file.version,
            expected: MAP_FORMAT_VERSION,
        });
    }

    let len = file.nodes.len();
    if file.start_node >= len {
        return Err(MapFileError::StartNodeOutOfRange { index: file.start_node, len });
    }
    if file.end_node >= len {
        return Err(MapFileError::EndNodeOutOfRange { index: file.end_node, len });
    }

    let nodes = file
        .nodes
        .into_iter()
        .enumerate()
        .map(|(index, record)| MapNode {
            index,
            pos: Vec2::new(record.x, record.y),
            edges: record.edges_to,
            event: record.event,
            node_texture: record.node_texture,
        })
        .collect();
    let graph = MapGraph::from_nodes(nodes)?;

    Ok(DetailMap {
        name: file.name,
        graph,
        start_node: file.start_node,
        end_node: file.end_node,
        decorations: file.decorations.into_iter().map(decoration_from_record).collect(),
        animated_decorations: file
            .animated_decorations
            .into_iter()
            .map(decoration_from_record)
            .collect(),
        is_area: file.is_area,
        biome: file.biome,
        progress: (file.progress[0], file.progress[1]),
        scrollable: file.scrollable,
        cam_pos_offset: Vec2::new(file.cam_pos_offset[0], file.cam_pos_offset[1]),
    })
}

/// Writes via a temp file and rename so readers never see a half map.
pub fn write_to_path(map: &DetailMap, path: &Path) -> Result<(), MapFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = to_json(map)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<DetailMap, MapFileError> {
    let text = fs::read_to_string(path)?;
    from_json(&text)
}

fn decoration_record(decoration: &MapDecoration) -> DecorationRecord {
    DecorationRecord {
        texture: decoration.texture.clone(),
        base_width: decoration.base_width,
        base_height: decoration.base_height,
        draw_in_background: decoration.draw_in_background,
        positions: decoration
            .instances
            .iter()
            .map(|(pos, scale)| [pos.x, pos.y, *scale])
            .collect(),
    }
}

fn decoration_from_record(record: DecorationRecord) -> MapDecoration {
    MapDecoration {
        texture: record.texture,
        base_width: record.base_width,
        base_height: record.base_height,
        draw_in_background: record.draw_in_background,
        instances: record
            .positions
            .into_iter()
            .map(|[x, y, scale]| (Vec2::new(x, y), scale))
            .collect(),
    }
}
