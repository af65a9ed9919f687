//! Blinds: reveals B through parallel slats whose open band grows linearly
//! with progress. Horizontal, vertical and diagonal layouts.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::transition::{FrameCtx, Transition};
use morphcut_core::{Frame, Result};

pub struct Blinds;

impl Transition for Blinds {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "blinds",
            vec![
                ParamSpec::choice(
                    "direction",
                    "horizontal",
                    &["horizontal", "vertical", "diagonal"],
                    "Slat orientation",
                ),
                ParamSpec::int("slat_count", 10, 1, 64, "Number of slats"),
            ],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let slats = params.i64("slat_count")? as f32;
        let direction = params.str("direction")?;
        let p = ctx.progress.clamp(0.0, 1.0);

        if p >= 1.0 {
            return Ok(b.clone());
        }

        let w = a.width as f32;
        let h = a.height as f32;
        let mut out = Frame::new(a.width, a.height);

        for y in 0..a.height {
            for x in 0..a.width {
                // Position within the slat, in [0, 1).
                let slat_pos = match direction {
                    "vertical" => x as f32 / w * slats,
                    "diagonal" => (x + y) as f32 / (w + h) * slats,
                    _ => y as f32 / h * slats,
                };
                let frac = slat_pos - slat_pos.floor();
                let px = if frac < p { b.pixel(x, y) } else { a.pixel(x, y) };
                out.set_pixel(x, y, px);
            }
        }
        Ok(out)
    }
}
