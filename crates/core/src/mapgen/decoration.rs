//! Decoration placement specs and candidate-position distributions.

use serde::{Deserialize, Serialize};

use crate::ease::Easing;
use crate::geom::{Rect, Vec2};
use crate::random::GenRng;

/// Config for one decoration kind: how candidates are drawn, how dense
/// the result should be, and which colliders placement must respect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationSpec {
    pub distribution: Distribution,
    /// Drawable handle of the decoration.
    pub decoration: String,
    pub base_width: f32,
    pub base_height: f32,
    /// Target instances per unit of map area.
    pub density: f32,
    pub check_node_collisions: bool,
    pub check_line_collisions: bool,
    pub check_decoration_collisions: bool,
    /// Accepted instances become colliders for later candidates.
    pub generate_decoration_collisions: bool,
    /// Collide only on the spawn point instead of the full rectangle.
    pub only_check_collisions_at_spawn_points: bool,
    /// Inclusive scale range, drawn per instance.
    pub scale: [f32; 2],
    /// Shrinks the collision rectangle relative to the drawn size.
    #[serde(default)]
    pub shrink_bounds_width: f32,
    #[serde(default)]
    pub shrink_bounds_height: f32,
    /// Sort instances back to front for painter's-algorithm rendering.
    pub sort_by_y: bool,
    pub animated: bool,
}

/// How candidate positions are drawn from the map bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Distribution {
    /// Uniform over the bounds.
    Random,
    /// X interpolated between two bounds through an easing curve, Y
    /// uniform. Denser toward whichever bound the curve favors.
    FadeX { start: f32, end: f32, easing: Easing },
}

impl Distribution {
    pub fn sample(&self, bounds: Rect, rng: &mut GenRng) -> Vec2 {
        match self {
            Self::Random => Vec2::new(
                rng.f32_in(bounds.x..=bounds.right()),
                rng.f32_in(bounds.y..=bounds.top()),
            ),
            Self::FadeX { start, end, easing } => {
                let x = easing.interpolate(*start, *end, rng.next_f32());
                let y = rng.f32_in(bounds.y..=bounds.top());
                Vec2::new(x, y)
            }
        }
    }
}
