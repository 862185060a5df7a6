//! Two-phase frame animation loading: a cheap preview frame now, the
//! full atlas when the resource manager gets around to it.

use crate::animation::AnimationError;
use crate::animation::drawable::{AnimationPart, Frame, FrameStrip, ResourceHandle};

/// A new atlas load is deferred while more than this many resource
/// loads are already in flight, to avoid load-spike stalls.
pub const MAX_CONCURRENT_LOADS: usize = 3;

/// What the loader reports once an atlas has resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedFrames {
    pub frame_count: usize,
}

/// Borrow/poll/release interface to the render layer's resource
/// manager. Handles are opaque string keys; the loader keeps the
/// texture memory.
pub trait ResourceLoader {
    /// Number of resource loads currently in flight.
    fn loads_in_flight(&self) -> usize;

    /// Begins loading the frame atlas behind the handle.
    fn request_frames(&mut self, handle: &str);

    /// `Some` once a previously requested atlas has resolved.
    fn poll_frames(&mut self, handle: &str) -> Option<LoadedFrames>;

    /// Returns a borrowed resource.
    fn release(&mut self, handle: &str);
}

enum LoadState {
    NotRequested,
    Requested,
    Loaded(FrameStrip),
}

/// Animation part that shows a preview frame until its atlas resolves.
///
/// Callers never see the swap: `frame` transparently switches from the
/// preview to real per-index frames once the load completes.
pub struct DeferredFramePart {
    preview: ResourceHandle,
    atlas: ResourceHandle,
    frame_time_ms: u64,
    state: LoadState,
}

impl DeferredFramePart {
    pub fn new(
        preview: ResourceHandle,
        atlas: ResourceHandle,
        frame_time_ms: u64,
    ) -> Result<Self, AnimationError> {
        if frame_time_ms == 0 {
            return Err(AnimationError::InvalidFrameTime);
        }
        Ok(Self { preview, atlas, frame_time_ms, state: LoadState::NotRequested })
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }
}

impl AnimationPart for DeferredFramePart {
    /// Unbounded until the atlas resolves, so playback holds on the
    /// preview instead of skipping ahead.
    fn duration_ms(&self) -> u64 {
        match &self.state {
            LoadState::Loaded(strip) => strip.duration_ms(),
            _ => u64::MAX,
        }
    }

    fn frame(&self, progress_ms: u64) -> Frame {
        match &self.state {
            LoadState::Loaded(strip) => strip.frame(progress_ms),
            _ => Frame::Still(self.preview.clone()),
        }
    }

    fn update(&mut self, loader: &mut dyn ResourceLoader) {
        match self.state {
            LoadState::NotRequested => {
                if loader.loads_in_flight() <= MAX_CONCURRENT_LOADS {
                    loader.request_frames(&self.atlas);
                    self.state = LoadState::Requested;
                }
            }
            LoadState::Requested => {
                if let Some(loaded) = loader.poll_frames(&self.atlas) {
                    let strip = FrameStrip::new(
                        self.atlas.clone(),
                        loaded.frame_count.max(1),
                        self.frame_time_ms,
                        0,
                    )
                    .expect("frame time validated at construction");
                    self.state = LoadState::Loaded(strip);
                }
            }
            LoadState::Loaded(_) => {}
        }
    }

    fn release(&mut self, loader: &mut dyn ResourceLoader) {
        if !matches!(self.state, LoadState::NotRequested) {
            loader.release(&self.atlas);
        }
        self.state = LoadState::NotRequested;
    }
}
