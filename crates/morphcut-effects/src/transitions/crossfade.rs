//! Crossfade: alpha dissolve between the two sources, with a handful of
//! blend modes beyond the plain linear fade.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::raster;
use crate::transition::{FrameCtx, Transition};
use morphcut_core::{Frame, Result};

pub struct Crossfade;

impl Transition for Crossfade {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "crossfade",
            vec![
                ParamSpec::choice(
                    "mode",
                    "crossfade",
                    &[
                        "crossfade",
                        "fade_to_black",
                        "fade_to_white",
                        "fade_to_custom",
                        "additive",
                        "chromatic",
                    ],
                    "Dissolve mode",
                ),
                ParamSpec::string(
                    "color",
                    "#000000",
                    "Intermediate color for fade_to_custom",
                ),
            ],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let p = ctx.progress.clamp(0.0, 1.0);
        match params.str("mode")? {
            "fade_to_black" => Ok(fade_through(a, b, p, [0, 0, 0, 255])),
            "fade_to_white" => Ok(fade_through(a, b, p, [255, 255, 255, 255])),
            "fade_to_custom" => {
                let color = raster::parse_color(params.str("color")?)?;
                Ok(fade_through(a, b, p, color))
            }
            "additive" => Ok(additive(a, b, p)),
            "chromatic" => Ok(chromatic(a, b, p)),
            _ => Ok(raster::blend(a, b, p)),
        }
    }
}

/// First half fades A into the color, second half fades the color into B.
fn fade_through(a: &Frame, b: &Frame, p: f32, color: [u8; 4]) -> Frame {
    let solid = Frame::solid(a.width, a.height, color);
    if p < 0.5 {
        raster::blend(a, &solid, p * 2.0)
    } else {
        raster::blend(&solid, b, (p - 0.5) * 2.0)
    }
}

/// Additive dissolve: both sources at full weight mid-transition, clipped,
/// with the weights ramping so the endpoints are the pure sources.
fn additive(a: &Frame, b: &Frame, p: f32) -> Frame {
    let wa = (2.0 * (1.0 - p)).min(1.0);
    let wb = (2.0 * p).min(1.0);
    let mut out = Frame::new(a.width, a.height);
    for ((o, pa), pb) in out.data.iter_mut().zip(a.data.iter()).zip(b.data.iter()) {
        *o = (*pa as f32 * wa + *pb as f32 * wb).round().min(255.0) as u8;
    }
    out
}

/// Channel-shifted dissolve: B's red and blue channels are offset
/// horizontally in opposite directions while fading in. The offset follows
/// sin(pi * p) so both endpoints stay untouched.
fn chromatic(a: &Frame, b: &Frame, p: f32) -> Frame {
    let max_shift = 10.0 * (a.width as f32 / 640.0).max(0.5);
    let shift = (std::f32::consts::PI * p).sin() * max_shift;
    let mut out = Frame::new(a.width, a.height);

    for y in 0..a.height {
        for x in 0..a.width {
            let pa = a.pixel(x, y);
            let mut pb = b.pixel(x, y);
            // Red shifted left, blue shifted right, green in place.
            pb[0] = b.pixel_clamped(x as i64 - shift.round() as i64, y as i64)[0];
            pb[2] = b.pixel_clamped(x as i64 + shift.round() as i64, y as i64)[2];
            out.set_pixel(x, y, raster::mix_pixel(pa, pb, p));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Factory;
    use crate::registry::Registry;
    use serde_json::Map;

    fn build(raw: serde_json::Value) -> ParamValues {
        let reg = Registry::builtin().unwrap();
        let map = raw.as_object().cloned().unwrap_or_else(Map::new);
        Factory::build(&reg, "crossfade", &map).unwrap().1
    }

    #[test]
    fn test_endpoints_pixel_exact() {
        let a = Frame::test_pattern(32, 16);
        let b = Frame::solid(32, 16, [40, 80, 120, 255]);
        let params = build(serde_json::json!({}));

        let start = Crossfade
            .apply(&a, &b, &FrameCtx::new(0, 10), &params)
            .unwrap();
        let end = Crossfade
            .apply(&a, &b, &FrameCtx::new(9, 10), &params)
            .unwrap();
        assert_eq!(start, a);
        assert_eq!(end, b);
    }

    #[test]
    fn test_symmetry() {
        let a = Frame::test_pattern(16, 16);
        let b = Frame::solid(16, 16, [200, 10, 60, 255]);
        let params = build(serde_json::json!({}));

        for (i, j) in [(1usize, 3usize), (2, 2), (3, 1)] {
            let fwd = Crossfade
                .apply(&a, &b, &FrameCtx::new(i, 5), &params)
                .unwrap();
            let rev = Crossfade
                .apply(&b, &a, &FrameCtx::new(j, 5), &params)
                .unwrap();
            assert_eq!(fwd, rev, "progress {i}/4 vs {j}/4");
        }
    }

    #[test]
    fn test_midpoint_half_blend() {
        let a = Frame::solid(8, 8, [100, 100, 100, 255]);
        let b = Frame::solid(8, 8, [200, 200, 200, 255]);
        let params = build(serde_json::json!({}));
        let mid = Crossfade
            .apply(&a, &b, &FrameCtx::new(5, 11), &params)
            .unwrap();
        assert_eq!(mid.pixel(4, 4), [150, 150, 150, 255]);
    }

    #[test]
    fn test_fade_to_black_midpoint_is_black() {
        let a = Frame::solid(8, 8, [250, 250, 250, 255]);
        let b = Frame::solid(8, 8, [10, 200, 30, 255]);
        let params = build(serde_json::json!({"mode": "fade_to_black"}));
        let mid = Crossfade
            .apply(&a, &b, &FrameCtx::new(5, 11), &params)
            .unwrap();
        assert_eq!(mid.pixel(0, 0)[..3], [0, 0, 0]);
    }

    #[test]
    fn test_modes_keep_endpoints() {
        let a = Frame::test_pattern(16, 8);
        let b = Frame::solid(16, 8, [1, 2, 3, 255]);
        for mode in ["additive", "chromatic", "fade_to_custom"] {
            let params = build(serde_json::json!({"mode": mode}));
            let start = Crossfade
                .apply(&a, &b, &FrameCtx::new(0, 8), &params)
                .unwrap();
            let end = Crossfade
                .apply(&a, &b, &FrameCtx::new(7, 8), &params)
                .unwrap();
            assert_eq!(start, a, "mode {mode} at progress 0");
            assert_eq!(end, b, "mode {mode} at progress 1");
        }
    }
}
