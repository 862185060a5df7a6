pub mod animation;
pub mod ease;
pub mod geom;
pub mod map;
pub mod mapgen;
pub mod random;
pub mod save;
pub mod timeline;

pub use ease::Easing;
pub use geom::{Rect, Segment, Vec2};
pub use map::{DetailMap, Direction, MapDecoration, MapEvent, MapGraph, MapNode};
pub use mapgen::{GeneratedMap, GenerateError, GenerationWarning, GeneratorConfig, generate};
pub use random::GenRng;
pub use save::SaveState;
pub use timeline::{Timeline, TimelineAction, TimelineCtx};
