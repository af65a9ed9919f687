//! Shake: seeded camera jitter applied to both sources while they
//! crossfade. The jitter amplitude follows sin(pi * progress) so the first
//! and last frames are untouched.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::raster;
use crate::transition::{FrameCtx, Transition};
use glam::Vec2;
use morphcut_core::{Frame, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct Shake;

impl Transition for Shake {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "shake",
            vec![
                ParamSpec::choice(
                    "shake_type",
                    "random",
                    &["random", "horizontal", "vertical", "rotation", "zoom"],
                    "Jitter style",
                ),
                ParamSpec::float("intensity", 1.0, 0.1, 3.0, "Jitter intensity"),
                ParamSpec::int("seed", 0, 0, i32::MAX as i64, "Random seed"),
            ],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let shake_type = params.str("shake_type")?;
        let intensity = params.f64("intensity")? as f32;
        let seed = params.i64("seed")? as u64;
        let p = ctx.progress.clamp(0.0, 1.0);

        let envelope = (std::f32::consts::PI * p).sin();
        if envelope < 1e-3 {
            // Endpoints: no jitter, just the pure source.
            return Ok(if p < 0.5 { a.clone() } else { b.clone() });
        }

        let jitter = FrameJitter::seeded(seed, ctx.frame_index, shake_type, intensity, envelope, a);
        let shaken_a = raster::warp_similarity(a, jitter.angle, jitter.scale, jitter.translate);
        let shaken_b = raster::warp_similarity(b, jitter.angle, jitter.scale, jitter.translate);
        Ok(raster::blend(&shaken_a, &shaken_b, p))
    }
}

struct FrameJitter {
    translate: Vec2,
    angle: f32,
    scale: f32,
}

impl FrameJitter {
    /// All randomness derives from `(seed, frame_index)`.
    fn seeded(
        seed: u64,
        frame_index: usize,
        shake_type: &str,
        intensity: f32,
        envelope: f32,
        frame: &Frame,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(
            seed ^ (frame_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
        );
        // Scale-free amplitudes: translation relative to width, rotation in
        // radians, zoom around 1.
        let shift = frame.width as f32 * 0.02 * intensity * envelope;
        let tilt = 0.06 * intensity * envelope;
        let zoom = 0.08 * intensity * envelope;

        let unit = |rng: &mut StdRng| rng.random_range(-1.0f32..1.0);

        match shake_type {
            "horizontal" => Self {
                translate: Vec2::new(unit(&mut rng) * shift, 0.0),
                angle: 0.0,
                scale: 1.0,
            },
            "vertical" => Self {
                translate: Vec2::new(0.0, unit(&mut rng) * shift),
                angle: 0.0,
                scale: 1.0,
            },
            "rotation" => Self {
                translate: Vec2::ZERO,
                angle: unit(&mut rng) * tilt,
                scale: 1.0,
            },
            "zoom" => Self {
                translate: Vec2::ZERO,
                angle: 0.0,
                // Zoom in only, so replicate borders never show.
                scale: 1.0 + unit(&mut rng).abs() * zoom,
            },
            _ => Self {
                translate: Vec2::new(unit(&mut rng) * shift, unit(&mut rng) * shift),
                angle: unit(&mut rng) * tilt,
                scale: 1.0 + unit(&mut rng).abs() * zoom,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Factory;
    use crate::registry::Registry;

    fn params(raw: serde_json::Value) -> ParamValues {
        let reg = Registry::builtin().unwrap();
        let map = raw.as_object().cloned().unwrap_or_default();
        Factory::build(&reg, "shake", &map).unwrap().1
    }

    #[test]
    fn test_endpoints_are_pure_sources() {
        let a = Frame::test_pattern(32, 24);
        let b = Frame::solid(32, 24, [9, 8, 7, 255]);
        let values = params(serde_json::json!({}));

        let start = Shake.apply(&a, &b, &FrameCtx::new(0, 20), &values).unwrap();
        let end = Shake.apply(&a, &b, &FrameCtx::new(19, 20), &values).unwrap();
        assert_eq!(start, a);
        assert_eq!(end, b);
    }

    #[test]
    fn test_determinism_per_seed() {
        let a = Frame::test_pattern(32, 24);
        let b = Frame::solid(32, 24, [64, 64, 64, 255]);
        let values = params(serde_json::json!({"seed": 7}));

        let once = Shake.apply(&a, &b, &FrameCtx::new(6, 20), &values).unwrap();
        let again = Shake.apply(&a, &b, &FrameCtx::new(6, 20), &values).unwrap();
        assert_eq!(once.data, again.data);

        let other = params(serde_json::json!({"seed": 8}));
        let different = Shake.apply(&a, &b, &FrameCtx::new(6, 20), &other).unwrap();
        assert_ne!(once.data, different.data);
    }

    #[test]
    fn test_frames_vary_over_time() {
        let a = Frame::test_pattern(32, 24);
        let b = Frame::solid(32, 24, [64, 64, 64, 255]);
        let values = params(serde_json::json!({}));

        let mid_one = Shake.apply(&a, &b, &FrameCtx::new(9, 20), &values).unwrap();
        let mid_two = Shake.apply(&a, &b, &FrameCtx::new(10, 20), &values).unwrap();
        assert_ne!(mid_one.data, mid_two.data, "jitter should differ per frame");
    }

    #[test]
    fn test_horizontal_type_keeps_rows() {
        // With vertical-only content and horizontal-only jitter, rows keep
        // their colors.
        let mut a = Frame::new(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                a.set_pixel(x, y, [y as u8 * 16, 0, 0, 255]);
            }
        }
        let b = a.clone();
        let values = params(serde_json::json!({"shake_type": "horizontal"}));
        let out = Shake.apply(&a, &b, &FrameCtx::new(8, 17), &values).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(out.pixel(x, y), a.pixel(0, y), "row {y} changed");
            }
        }
    }
}
