//! Builder arena for map nodes and the immutable graph it freezes into.
//!
//! During generation nodes live in a slotmap arena and edges are wired
//! between keys. [`GraphBuilder::build`] then produces an index-addressed
//! read-only [`MapGraph`] in a single pass, which sidesteps the
//! reference-cycle problems a pointer-linked graph would have.

use std::collections::BTreeSet;
use std::f32::consts::{PI, TAU};
use std::fmt;

use slotmap::{SlotMap, new_key_type};

use crate::geom::Vec2;
use crate::map::event::MapEvent;

/// Nodes never exceed four edges; layouts rely on it.
pub const MAX_NODE_EDGES: usize = 4;

new_key_type! {
    pub struct NodeKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Angle of the direction measured counterclockwise from +X.
    pub fn angle(self) -> f32 {
        match self {
            Self::Right => 0.0,
            Self::Up => PI / 2.0,
            Self::Left => PI,
            Self::Down => PI * 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Connecting would push a node past [`MAX_NODE_EDGES`].
    DegreeExceeded { index: usize },
    /// An edge references a node index outside the graph.
    EdgeOutOfRange { index: usize, len: usize },
    /// Node `a` lists an edge to `b`, but not the other way around.
    AsymmetricEdge { a: usize, b: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegreeExceeded { index } => {
                write!(f, "node {index} already has {MAX_NODE_EDGES} edges")
            }
            Self::EdgeOutOfRange { index, len } => {
                write!(f, "edge references node {index}, but the graph has {len} nodes")
            }
            Self::AsymmetricEdge { a, b } => {
                write!(f, "edge {a} -> {b} has no matching reverse edge")
            }
        }
    }
}

#[derive(Clone, Debug)]
struct BuilderNode {
    index: usize,
    pos: Vec2,
    edges: Vec<NodeKey>,
    event: MapEvent,
    node_texture: Option<String>,
}

/// Mutable node arena used while a map is being generated.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: SlotMap<NodeKey, BuilderNode>,
    order: Vec<NodeKey>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn add_node(&mut self, pos: Vec2) -> NodeKey {
        let index = self.order.len();
        let key = self.nodes.insert(BuilderNode {
            index,
            pos,
            edges: Vec::new(),
            event: MapEvent::Empty,
            node_texture: None,
        });
        self.order.push(key);
        key
    }

    pub fn index_of(&self, key: NodeKey) -> usize {
        self.nodes[key].index
    }

    pub fn pos_of(&self, key: NodeKey) -> Vec2 {
        self.nodes[key].pos
    }

    /// Node positions in creation order.
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.order.iter().map(|&key| self.nodes[key].pos)
    }

    pub fn set_event(&mut self, key: NodeKey, event: MapEvent) {
        self.nodes[key].event = event;
    }

    pub fn set_node_texture(&mut self, key: NodeKey, texture: impl Into<String>) {
        self.nodes[key].node_texture = Some(texture.into());
    }

    /// Adds a bidirectional edge between two nodes.
    ///
    /// Returns `Ok(false)` without touching the graph when the nodes are
    /// identical or already connected; errors when either endpoint is
    /// already at the edge limit.
    pub fn connect(&mut self, a: NodeKey, b: NodeKey) -> Result<bool, GraphError> {
        if a == b || self.nodes[a].edges.contains(&b) {
            return Ok(false);
        }
        if self.nodes[a].edges.len() >= MAX_NODE_EDGES {
            return Err(GraphError::DegreeExceeded { index: self.nodes[a].index });
        }
        if self.nodes[b].edges.len() >= MAX_NODE_EDGES {
            return Err(GraphError::DegreeExceeded { index: self.nodes[b].index });
        }
        self.nodes[a].edges.push(b);
        self.nodes[b].edges.push(a);
        Ok(true)
    }

    /// Freezes the arena into an immutable graph.
    ///
    /// A single pass over the arena; cyclic connections need no special
    /// handling because nodes are resolved through indices, not through
    /// each other.
    pub fn build(&self) -> MapGraph {
        let nodes = self
            .order
            .iter()
            .map(|&key| {
                let node = &self.nodes[key];
                MapNode {
                    index: node.index,
                    pos: node.pos,
                    edges: node.edges.iter().map(|&edge| self.nodes[edge].index).collect(),
                    event: node.event.clone(),
                    node_texture: node.node_texture.clone(),
                }
            })
            .collect();
        MapGraph { nodes }
    }
}

/// A finalized map node. Identity is the index within the owning graph.
#[derive(Clone, Debug, PartialEq)]
pub struct MapNode {
    pub index: usize,
    pub pos: Vec2,
    pub edges: Vec<usize>,
    pub event: MapEvent,
    pub node_texture: Option<String>,
}

impl MapNode {
    pub fn is_linked_to(&self, other: usize) -> bool {
        self.edges.contains(&other)
    }
}

/// Immutable graph of map nodes addressed by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapGraph {
    nodes: Vec<MapNode>,
}

impl MapGraph {
    /// Validates edge indices, symmetry, and the degree bound.
    pub fn from_nodes(nodes: Vec<MapNode>) -> Result<Self, GraphError> {
        let len = nodes.len();
        for node in &nodes {
            if node.edges.len() > MAX_NODE_EDGES {
                return Err(GraphError::DegreeExceeded { index: node.index });
            }
            for &edge in &node.edges {
                if edge >= len {
                    return Err(GraphError::EdgeOutOfRange { index: edge, len });
                }
                if !nodes[edge].edges.contains(&node.index) {
                    return Err(GraphError::AsymmetricEdge { a: node.index, b: edge });
                }
            }
        }
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &MapNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    /// All nodes reachable from `start` in depth-first preorder,
    /// `start` first.
    pub fn unique_nodes_from(&self, start: usize) -> Vec<usize> {
        let mut visited = vec![false; self.nodes.len()];
        let mut out = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(index) = stack.pop() {
            out.push(index);
            // Reversed so the first edge is visited first.
            for &edge in self.nodes[index].edges.iter().rev() {
                if !visited[edge] {
                    visited[edge] = true;
                    stack.push(edge);
                }
            }
        }
        out
    }

    /// Undirected edges between the given nodes; (a, b) and (b, a)
    /// count once.
    pub fn unique_edges(&self, nodes: &[usize]) -> Vec<(usize, usize)> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for &index in nodes {
            for &edge in &self.nodes[index].edges {
                let normalized = (index.min(edge), index.max(edge));
                if seen.insert(normalized) {
                    out.push(normalized);
                }
            }
        }
        out
    }

    /// The neighbor lying in the given compass direction, if any.
    ///
    /// Each edge is assigned to the compass direction nearest its angle;
    /// when two edges compete for a direction the angularly closer one
    /// wins. A direction nothing points toward returns `None`.
    pub fn edge_in_direction(&self, index: usize, direction: Direction) -> Option<usize> {
        let node = &self.nodes[index];
        let mut best: Option<(usize, f32)> = None;
        for &edge in &node.edges {
            let to = self.nodes[edge].pos - node.pos;
            let angle = to.y.atan2(to.x).rem_euclid(TAU);
            let (nearest_dir, distance) = Direction::ALL
                .into_iter()
                .map(|dir| (dir, angular_distance(angle, dir.angle())))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .expect("Direction::ALL is non-empty");
            if nearest_dir != direction {
                continue;
            }
            let closer = best.is_none_or(|(_, best_distance)| distance < best_distance);
            if closer {
                best = Some((edge, distance));
            }
        }
        best.map(|(edge, _)| edge)
    }
}

fn angular_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(TAU);
    diff.min(TAU - diff)
}
