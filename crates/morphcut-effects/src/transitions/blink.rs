//! Blink: hard alternation between the full A and full B frames at a
//! caller-controlled flicker frequency. No intermediate blending; the last
//! frame always lands on B.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::transition::{FrameCtx, Transition};
use morphcut_core::{Frame, Result};

pub struct Blink;

impl Transition for Blink {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "blink",
            vec![ParamSpec::int(
                "flicker_count",
                6,
                1,
                60,
                "Number of A/B alternations across the transition",
            )],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let flickers = params.i64("flicker_count")? as f32;
        let p = ctx.progress.clamp(0.0, 1.0);

        // 2 * flickers half-periods; the final half-period is always B.
        let segments = 2.0 * flickers;
        let segment = ((p * segments).floor() as i64).min(segments as i64 - 1);
        let show_b = segment % 2 == 1;

        Ok(if show_b { b.clone() } else { a.clone() })
    }
}
