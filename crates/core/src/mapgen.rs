//! Procedural map generation: biome topology generators built on a
//! shared placement scaffold.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::map::graph::GraphError;
use crate::map::model::DetailMap;

pub mod base;
pub mod decoration;

mod radial;
mod three_line;

pub use base::{CommonGeneratorData, GenerationWarning, GeneratorScaffold};
pub use decoration::{DecorationSpec, Distribution};
pub use radial::{RadialConfig, RadialEventSpawner};
pub use three_line::{EventStamp, ThreeLineConfig, ThreeLineEventSpawner};

/// Generator selection plus its parameters.
///
/// Tagged by `generator`; an unknown tag fails deserialization, which
/// is the fatal-config-error path for unknown generator names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "generator", rename_all = "camelCase")]
pub enum GeneratorConfig {
    ThreeLine(ThreeLineConfig),
    Radial(RadialConfig),
}

impl GeneratorConfig {
    pub fn common(&self) -> &CommonGeneratorData {
        match self {
            Self::ThreeLine(config) => &config.common,
            Self::Radial(config) => &config.common,
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        match self {
            Self::ThreeLine(config) => config.common.seed = seed,
            Self::Radial(config) => config.common.seed = seed,
        }
    }
}

/// A generated map plus the warnings its run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMap {
    pub map: DetailMap,
    pub warnings: Vec<GenerationWarning>,
}

/// Runs the generator the config selects.
///
/// Same name + config (seed included) always produces a bit-identical
/// map.
pub fn generate(name: &str, config: &GeneratorConfig) -> Result<GeneratedMap, GenerateError> {
    match config {
        GeneratorConfig::ThreeLine(config) => three_line::generate(name, config),
        GeneratorConfig::Radial(config) => radial::generate(name, config),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    Graph(GraphError),
    /// Bounds requested for a map without nodes.
    NoNodes,
    /// The radial generator needs at least one radius.
    EmptyRadiusList,
    /// An event spawner references a ring the radius list doesn't have.
    UnknownRing { ring: usize, rings: usize },
    /// A three-line map needs at least one main-line node.
    EmptyMainLine,
    /// Alt-line paddings leave no room for intermediate nodes.
    AltLineHasNoRoom { main_line_nodes: usize, start_padding: usize, end_padding: usize },
    /// An event spawner offset range that can never advance the cursor.
    InvalidEventOffset { event: String, offset: [usize; 2] },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph(e) => write!(f, "map generation broke a graph invariant: {e}"),
            Self::NoNodes => write!(f, "cannot compute bounds of a map without nodes"),
            Self::EmptyRadiusList => write!(f, "radial generator requires at least one radius"),
            Self::UnknownRing { ring, rings } => {
                write!(f, "event spawner references ring {ring}, but only {rings} rings exist")
            }
            Self::EmptyMainLine => {
                write!(f, "three-line generator requires at least one main-line node")
            }
            Self::AltLineHasNoRoom { main_line_nodes, start_padding, end_padding } => write!(
                f,
                "alt line paddings {start_padding}/{end_padding} leave no room on a main line \
                 of {main_line_nodes} nodes"
            ),
            Self::InvalidEventOffset { event, offset } => write!(
                f,
                "event spawner '{event}' has offset range {offset:?}, which can never advance"
            ),
        }
    }
}

impl From<GraphError> for GenerateError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}
