//! The generated map artifact handed to the render layer.

use xxhash_rust::xxh3::xxh3_64;

use crate::geom::Vec2;
use crate::map::event::MapEvent;
use crate::map::graph::MapGraph;

/// A fully generated (or loaded) map.
///
/// Replaced wholesale on map switch, never patched in place.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailMap {
    pub name: String,
    pub graph: MapGraph,
    pub start_node: usize,
    pub end_node: usize,
    pub decorations: Vec<MapDecoration>,
    pub animated_decorations: Vec<MapDecoration>,
    pub is_area: bool,
    pub biome: String,
    pub progress: (f32, f32),
    pub scrollable: bool,
    pub cam_pos_offset: Vec2,
}

impl DetailMap {
    pub fn unique_nodes(&self) -> Vec<usize> {
        self.graph.unique_nodes_from(self.start_node)
    }

    pub fn unique_edges(&self) -> Vec<(usize, usize)> {
        self.graph.unique_edges(&self.unique_nodes())
    }

    /// Stable byte encoding of everything generation decides.
    ///
    /// Two maps with equal canonical bytes are the same map; used by the
    /// determinism fingerprint tests and the `check` tool.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        push_str(&mut bytes, &self.name);
        push_str(&mut bytes, &self.biome);
        bytes.push(u8::from(self.is_area));
        bytes.push(u8::from(self.scrollable));
        bytes.extend(self.progress.0.to_le_bytes());
        bytes.extend(self.progress.1.to_le_bytes());
        bytes.extend(self.cam_pos_offset.x.to_le_bytes());
        bytes.extend(self.cam_pos_offset.y.to_le_bytes());
        bytes.extend((self.start_node as u32).to_le_bytes());
        bytes.extend((self.end_node as u32).to_le_bytes());

        bytes.extend((self.graph.len() as u32).to_le_bytes());
        for node in self.graph.nodes() {
            bytes.extend(node.pos.x.to_le_bytes());
            bytes.extend(node.pos.y.to_le_bytes());
            bytes.extend((node.edges.len() as u32).to_le_bytes());
            for &edge in &node.edges {
                bytes.extend((edge as u32).to_le_bytes());
            }
            push_event(&mut bytes, &node.event);
            push_str(&mut bytes, node.node_texture.as_deref().unwrap_or(""));
        }

        for decorations in [&self.decorations, &self.animated_decorations] {
            bytes.extend((decorations.len() as u32).to_le_bytes());
            for decoration in decorations.iter() {
                push_str(&mut bytes, &decoration.texture);
                bytes.extend(decoration.base_width.to_le_bytes());
                bytes.extend(decoration.base_height.to_le_bytes());
                bytes.push(u8::from(decoration.draw_in_background));
                bytes.extend((decoration.instances.len() as u32).to_le_bytes());
                for (pos, scale) in &decoration.instances {
                    bytes.extend(pos.x.to_le_bytes());
                    bytes.extend(pos.y.to_le_bytes());
                    bytes.extend(scale.to_le_bytes());
                }
            }
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

/// One kind of decoration and all its placed instances.
#[derive(Clone, Debug, PartialEq)]
pub struct MapDecoration {
    /// Drawable handle, or the animation name for animated decorations.
    pub texture: String,
    pub base_width: f32,
    pub base_height: f32,
    pub draw_in_background: bool,
    /// Position and scale per placed instance.
    pub instances: Vec<(Vec2, f32)>,
}

fn push_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend((value.len() as u32).to_le_bytes());
    bytes.extend(value.as_bytes());
}

fn push_event(bytes: &mut Vec<u8>, event: &MapEvent) {
    match event {
        MapEvent::Empty => bytes.push(0),
        MapEvent::Encounter { completed } => {
            bytes.push(1);
            bytes.push(u8::from(*completed));
        }
        MapEvent::EnterMap { target_map, place_at_end } => {
            bytes.push(2);
            push_str(bytes, target_map);
            bytes.push(u8::from(*place_at_end));
        }
        MapEvent::Dialog { npc, completed } => {
            bytes.push(3);
            push_str(bytes, npc);
            bytes.push(u8::from(*completed));
        }
        MapEvent::Shop { trader } => {
            bytes.push(4);
            push_str(bytes, trader);
        }
        MapEvent::Heal { amount } => {
            bytes.push(5);
            bytes.extend(amount.to_le_bytes());
        }
        MapEvent::ChooseCard { groups } => {
            bytes.push(6);
            bytes.extend((groups.len() as u32).to_le_bytes());
            for group in groups {
                push_str(bytes, group);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vec2;
    use crate::map::graph::GraphBuilder;

    fn small_map() -> DetailMap {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(Vec2::ZERO);
        let b = builder.add_node(Vec2::new(5.0, 0.0));
        builder.connect(a, b).unwrap();
        DetailMap {
            name: "test".to_string(),
            graph: builder.build(),
            start_node: 0,
            end_node: 1,
            decorations: vec![MapDecoration {
                texture: "cactus".to_string(),
                base_width: 2.0,
                base_height: 3.0,
                draw_in_background: false,
                instances: vec![(Vec2::new(1.0, 1.0), 1.5)],
            }],
            animated_decorations: Vec::new(),
            is_area: false,
            biome: "wasteland".to_string(),
            progress: (0.0, 10.0),
            scrollable: true,
            cam_pos_offset: Vec2::ZERO,
        }
    }

    #[test]
    fn canonical_bytes_are_stable_for_equal_maps() {
        assert_eq!(small_map().canonical_bytes(), small_map().canonical_bytes());
        assert_eq!(small_map().fingerprint(), small_map().fingerprint());
    }

    #[test]
    fn canonical_bytes_react_to_any_change() {
        let base = small_map();
        let mut renamed = small_map();
        renamed.name = "other".to_string();
        assert_ne!(base.canonical_bytes(), renamed.canonical_bytes());

        let mut fewer_instances = small_map();
        fewer_instances.decorations[0].instances.clear();
        assert_ne!(base.canonical_bytes(), fewer_instances.canonical_bytes());
    }
}
