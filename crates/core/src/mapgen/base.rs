//! Shared node- and decoration-placement machinery for all topology
//! generators.

use std::fmt;
use std::mem;

use serde::{Deserialize, Serialize};

use crate::geom::{self, Rect, Segment, Vec2};
use crate::map::event::MapEvent;
use crate::map::graph::{GraphBuilder, MapGraph, NodeKey};
use crate::map::model::MapDecoration;
use crate::random::GenRng;

use super::GenerateError;
use super::decoration::DecorationSpec;

/// Placement attempts per decoration are capped at three times the
/// target so generation terminates even with impossible constraints.
const DECORATION_ITERATION_FACTOR: usize = 3;

/// Parameters every generator family shares.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonGeneratorData {
    pub seed: u64,
    pub biome: String,
    /// Side length of the square protected area around each node.
    pub node_protected_area: f32,
    pub horizontal_extension: f32,
    pub vertical_extension: f32,
    /// Story progress range the map covers.
    pub progress: [f32; 2],
    #[serde(default)]
    pub decorations: Vec<DecorationSpec>,
}

/// Non-fatal conditions recorded during a generation run.
///
/// Drained by the caller once generation finishes; the map itself is
/// still valid, just smaller than requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationWarning {
    /// The placement budget ran out before the density target was met.
    DecorationBudgetExhausted { decoration: String, map: String, placed: usize, target: usize },
    /// A fixed-amount event spawner ran out of unclaimed nodes.
    EventNodesExhausted { event: String, requested: usize, placed: usize },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecorationBudgetExhausted { decoration, map, placed, target } => write!(
                f,
                "placement budget exhausted for decoration '{decoration}' in map '{map}': \
                 placed {placed} of {target}"
            ),
            Self::EventNodesExhausted { event, requested, placed } => write!(
                f,
                "ran out of nodes for event '{event}': placed {placed} of {requested}"
            ),
        }
    }
}

/// State owned by one generation run: the node arena, the collider
/// lists decoration placement must respect, and the warning journal.
///
/// Not re-entrant; one scaffold serves exactly one `generate` call.
pub struct GeneratorScaffold {
    name: String,
    rng: GenRng,
    graph: GraphBuilder,
    bounds: Option<Rect>,
    node_protected_area: f32,
    node_colliders: Vec<Rect>,
    line_colliders: Vec<Segment>,
    decoration_colliders: Vec<Rect>,
    warnings: Vec<GenerationWarning>,
}

impl GeneratorScaffold {
    pub fn new(name: &str, seed: u64, node_protected_area: f32) -> Self {
        Self {
            name: name.to_string(),
            rng: GenRng::from_seed(seed),
            graph: GraphBuilder::new(),
            bounds: None,
            node_protected_area,
            node_colliders: Vec::new(),
            line_colliders: Vec::new(),
            decoration_colliders: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rng(&mut self) -> &mut GenRng {
        &mut self.rng
    }

    /// Registers a node together with its square protected area.
    pub fn new_node(&mut self, pos: Vec2) -> NodeKey {
        let key = self.graph.add_node(pos);
        self.node_colliders.push(Rect::centered_square(pos, self.node_protected_area));
        key
    }

    pub fn index_of(&self, key: NodeKey) -> usize {
        self.graph.index_of(key)
    }

    pub fn pos_of(&self, key: NodeKey) -> Vec2 {
        self.graph.pos_of(key)
    }

    pub fn set_event(&mut self, key: NodeKey, event: MapEvent) {
        self.graph.set_event(key, event);
    }

    pub fn set_node_texture(&mut self, key: NodeKey, texture: impl Into<String>) {
        self.graph.set_node_texture(key, texture);
    }

    /// Marks an extra rectangle (e.g. around a location sign) as
    /// off-limits for decorations.
    pub fn add_protected_rect(&mut self, rect: Rect) {
        self.node_colliders.push(rect);
    }

    /// Connects two nodes and shields the connecting road segment from
    /// decorations.
    pub fn connect_nodes(&mut self, a: NodeKey, b: NodeKey) -> Result<(), GenerateError> {
        self.graph.connect(a, b)?;
        self.line_colliders.push(Segment::new(self.graph.pos_of(a), self.graph.pos_of(b)));
        Ok(())
    }

    /// Stamps a node as an exit leading to another map.
    pub fn setup_exit_node(&mut self, key: NodeKey, area: &str, texture: &str) {
        self.graph.set_event(
            key,
            MapEvent::EnterMap { target_map: area.to_string(), place_at_end: false },
        );
        self.graph.set_node_texture(key, texture);
    }

    /// Node bounding box padded per axis; must run after all nodes are
    /// placed and before decorations are generated.
    pub fn compute_bounds(
        &mut self,
        horizontal_extension: f32,
        vertical_extension: f32,
    ) -> Result<(), GenerateError> {
        let bounds = geom::bounds_of(self.graph.positions()).ok_or(GenerateError::NoNodes)?;
        self.bounds = Some(geom::extend_bounds(bounds, horizontal_extension, vertical_extension));
        Ok(())
    }

    pub fn bounds(&self) -> Rect {
        self.bounds.expect("bounds computed before use")
    }

    /// Generates every spec against the current colliders, splitting
    /// the results into static and animated decorations.
    pub fn generate_decorations(
        &mut self,
        specs: &[DecorationSpec],
    ) -> (Vec<MapDecoration>, Vec<MapDecoration>) {
        let mut statics = Vec::new();
        let mut animated = Vec::new();
        for spec in specs {
            let decoration = self.generate_decoration(spec);
            if spec.animated {
                animated.push(decoration);
            } else {
                statics.push(decoration);
            }
        }
        (statics, animated)
    }

    /// Rejection-sampling placement of one decoration kind.
    ///
    /// Stops at `density * area` accepted instances or after three
    /// times that many candidates, whichever comes first; the second
    /// case records a warning and keeps the smaller result.
    pub fn generate_decoration(&mut self, spec: &DecorationSpec) -> MapDecoration {
        let bounds = self.bounds();
        let target = (spec.density * bounds.area()) as usize;
        let max_iterations = target * DECORATION_ITERATION_FACTOR;

        let mut instances: Vec<(Vec2, f32)> = Vec::new();
        let mut iteration = 0;
        while instances.len() < target {
            if iteration >= max_iterations {
                self.warnings.push(GenerationWarning::DecorationBudgetExhausted {
                    decoration: spec.decoration.clone(),
                    map: self.name.clone(),
                    placed: instances.len(),
                    target,
                });
                break;
            }
            iteration += 1;

            let pos = spec.distribution.sample(bounds, &mut self.rng);
            let scale = self.rng.f32_in(spec.scale[0]..=spec.scale[1]);
            let shrink_width = spec.base_width * scale * spec.shrink_bounds_width;
            let shrink_height = spec.base_height * scale * spec.shrink_bounds_height;
            let collision = Rect::new(
                pos.x + shrink_width / 2.0,
                pos.y + shrink_height / 2.0,
                spec.base_width * scale - shrink_width,
                spec.base_height * scale - shrink_height,
            );

            if spec.check_node_collisions
                && self.node_colliders.iter().any(|other| rect_collides(spec, collision, *other))
            {
                continue;
            }
            if spec.check_decoration_collisions
                && self
                    .decoration_colliders
                    .iter()
                    .any(|other| rect_collides(spec, collision, *other))
            {
                continue;
            }
            if spec.check_line_collisions
                && self.line_colliders.iter().any(|line| line_collides(spec, collision, *line))
            {
                continue;
            }

            if spec.generate_decoration_collisions {
                self.decoration_colliders.push(collision);
            }
            instances.push((pos, scale));
        }

        if spec.sort_by_y {
            instances.sort_by(|a, b| b.0.y.total_cmp(&a.0.y));
        }

        MapDecoration {
            texture: spec.decoration.clone(),
            base_width: spec.base_width,
            base_height: spec.base_height,
            draw_in_background: false,
            instances,
        }
    }

    pub fn warn(&mut self, warning: GenerationWarning) {
        self.warnings.push(warning);
    }

    pub fn take_warnings(&mut self) -> Vec<GenerationWarning> {
        mem::take(&mut self.warnings)
    }

    /// Freezes the node arena into the final immutable graph.
    pub fn finish_graph(&self) -> MapGraph {
        self.graph.build()
    }
}

fn rect_collides(spec: &DecorationSpec, collision: Rect, other: Rect) -> bool {
    if spec.only_check_collisions_at_spawn_points {
        other.contains(Vec2::new(collision.x, collision.y))
    } else {
        other.overlaps(collision)
    }
}

fn line_collides(spec: &DecorationSpec, collision: Rect, line: Segment) -> bool {
    if spec.only_check_collisions_at_spawn_points {
        false
    } else {
        line.intersects_rect(collision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::decoration::Distribution;

    fn spec(density: f32, check_node_collisions: bool) -> DecorationSpec {
        DecorationSpec {
            distribution: Distribution::Random,
            decoration: "cactus".to_string(),
            base_width: 2.0,
            base_height: 2.0,
            density,
            check_node_collisions,
            check_line_collisions: false,
            check_decoration_collisions: false,
            generate_decoration_collisions: false,
            only_check_collisions_at_spawn_points: false,
            scale: [1.0, 1.0],
            shrink_bounds_width: 0.0,
            shrink_bounds_height: 0.0,
            sort_by_y: false,
            animated: false,
        }
    }

    #[test]
    fn unconstrained_decoration_reaches_its_density_target() {
        let mut scaffold = GeneratorScaffold::new("test", 1, 4.0);
        scaffold.new_node(Vec2::ZERO);
        scaffold.compute_bounds(50.0, 50.0).expect("one node suffices");

        let bounds = scaffold.bounds();
        let spec = spec(0.005, false);
        let decoration = scaffold.generate_decoration(&spec);
        let target = (spec.density * bounds.area()) as usize;
        assert_eq!(decoration.instances.len(), target);
        assert!(scaffold.take_warnings().is_empty());
    }

    #[test]
    fn impossible_constraints_stop_at_the_iteration_budget_with_a_warning() {
        // The single protected area covers the entire bounds, so no
        // candidate can ever be accepted.
        let mut scaffold = GeneratorScaffold::new("test", 1, 1_000.0);
        scaffold.new_node(Vec2::ZERO);
        scaffold.compute_bounds(20.0, 20.0).expect("one node suffices");

        let decoration = scaffold.generate_decoration(&spec(0.01, true));
        assert!(decoration.instances.is_empty());

        let warnings = scaffold.take_warnings();
        assert!(matches!(
            warnings.as_slice(),
            [GenerationWarning::DecorationBudgetExhausted { placed: 0, .. }]
        ));
    }

    #[test]
    fn bounds_of_an_empty_scaffold_is_an_error() {
        let mut scaffold = GeneratorScaffold::new("test", 1, 4.0);
        assert_eq!(scaffold.compute_bounds(5.0, 5.0), Err(GenerateError::NoNodes));
    }
}
