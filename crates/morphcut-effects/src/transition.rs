//! The transition trait every effect implements.

use crate::params::{EffectDescriptor, ParamValues};
use morphcut_core::{Frame, MorphcutError, Result};

/// Per-frame rendering context handed to an effect by the processor.
///
/// `progress` is `frame_index / (frame_count - 1)` for multi-frame jobs and
/// `1.0` for a single-frame job: 0 = pure source A, 1 = pure source B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCtx {
    pub progress: f32,
    pub frame_index: usize,
    pub frame_count: usize,
}

impl FrameCtx {
    /// Build the context for one frame of a `frame_count`-frame window.
    pub fn new(frame_index: usize, frame_count: usize) -> Self {
        let progress = if frame_count > 1 {
            frame_index as f32 / (frame_count - 1) as f32
        } else {
            1.0
        };
        Self {
            progress,
            frame_index,
            frame_count,
        }
    }
}

/// A stateless transition algorithm blending two frames at a progress value.
///
/// Implementations must be pure: the same inputs (including the `seed`
/// parameter for the randomized effects) always produce the same output
/// frame, and parameters are never mutated mid-run.
pub trait Transition: Send + Sync {
    /// The effect's registry descriptor: unique name plus parameter schema.
    fn descriptor(&self) -> EffectDescriptor;

    /// Blend `a` and `b` into one output frame. Inputs are guaranteed to
    /// share one resolution; [`Transition::apply`] enforces this.
    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame>;

    /// Entry point used by the processor: checks frame dimensions, then
    /// delegates to [`Transition::render`].
    fn apply(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        if !a.same_size(b) {
            return Err(MorphcutError::DimensionMismatch {
                expected_width: a.width,
                expected_height: a.height,
                actual_width: b.width,
                actual_height: b.height,
            });
        }
        self.render(a, b, ctx, params)
    }
}
