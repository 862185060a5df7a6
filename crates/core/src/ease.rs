//! Easing curves used by decoration distributions and property tweens.

use serde::{Deserialize, Serialize};

/// A fixed set of easing curves; unknown names in config fail to parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    SmoothStep,
    CircleIn,
    CircleOut,
}

impl Easing {
    /// Maps a progress value in `[0, 1]` through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::CircleIn => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Self::CircleOut => {
                let inv = 1.0 - t;
                (1.0 - inv * inv).max(0.0).sqrt()
            }
        }
    }

    pub fn interpolate(self, start: f32, end: f32, t: f32) -> f32 {
        start + (end - start) * self.apply(t)
    }
}
