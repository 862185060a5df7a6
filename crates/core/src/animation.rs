//! Frame-based sprite animation and numeric property tweening, driven
//! by the render loop's wall clock.

use std::fmt;

pub mod deferred;
pub mod drawable;
pub mod property;
pub mod script;

pub use deferred::{DeferredFramePart, LoadedFrames, MAX_CONCURRENT_LOADS, ResourceLoader};
pub use drawable::{AnimationDrawable, AnimationPart, Frame, FrameStrip, ResourceHandle,
    StillFramePart};
pub use property::{AnimState, Interpolator, InterpolatorRegistry, PropertyAnimation,
    SharedProperty};
pub use script::{AnimationScript, ScriptCursor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// An animation needs at least one part.
    NoParts,
    /// Per-frame time of zero would make frame indexing meaningless.
    InvalidFrameTime,
    /// No interpolator registered for the property's value type and
    /// none was supplied.
    NoInterpolator { type_name: &'static str },
    /// `to_state` was asked for a state the animation doesn't define.
    UnknownState(String),
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParts => write!(f, "an animation needs at least one part"),
            Self::InvalidFrameTime => write!(f, "frame time must be at least one millisecond"),
            Self::NoInterpolator { type_name } => {
                write!(f, "no interpolator registered for type {type_name} and none supplied")
            }
            Self::UnknownState(name) => write!(f, "unknown animation state: {name}"),
        }
    }
}
