//! Warp: parametric geometric distortion morphing A's geometry toward B's.
//! A is warped forward with growing strength while B is warped backward
//! with shrinking strength, and the two are blended on a smoothstep curve.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::raster;
use crate::transition::{FrameCtx, Transition};
use glam::Vec2;
use morphcut_core::{Frame, Result};
use std::f32::consts::{PI, TAU};

pub struct Warp;

impl Transition for Warp {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "warp",
            vec![
                ParamSpec::choice(
                    "warp_type",
                    "swirl",
                    &["swirl", "squeeze_h", "squeeze_v", "liquid", "wave"],
                    "Displacement field",
                ),
                ParamSpec::float("intensity", 0.5, 0.1, 2.0, "Distortion intensity"),
                ParamSpec::float("speed", 1.0, 0.1, 3.0, "Animation speed"),
            ],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let field = DisplacementField {
            warp_type: params.str("warp_type")?.to_string(),
            intensity: params.f64("intensity")? as f32,
            time: ctx.progress * params.f64("speed")? as f32 * TAU,
            width: a.width as f32,
            height: a.height as f32,
        };
        let p = ctx.progress.clamp(0.0, 1.0);

        // A distorts as it leaves, B un-distorts as it arrives.
        let warped_a = warp_frame(a, &field, p, 1.0);
        let warped_b = warp_frame(b, &field, 1.0 - p, -1.0);
        Ok(raster::blend(&warped_a, &warped_b, raster::smoothstep(p)))
    }
}

/// Gather-sample `src` through the field at the given strength factor.
fn warp_frame(src: &Frame, field: &DisplacementField, factor: f32, sign: f32) -> Frame {
    let mut out = Frame::new(src.width, src.height);
    for y in 0..src.height {
        for x in 0..src.width {
            let pos = Vec2::new(x as f32, y as f32);
            let offset = field.offset(pos, factor, sign);
            let px = raster::sample_bilinear(src, pos.x + offset.x, pos.y + offset.y);
            out.set_pixel(x, y, px);
        }
    }
    out
}

struct DisplacementField {
    warp_type: String,
    intensity: f32,
    time: f32,
    width: f32,
    height: f32,
}

impl DisplacementField {
    fn offset(&self, pos: Vec2, factor: f32, sign: f32) -> Vec2 {
        match self.warp_type.as_str() {
            "squeeze_h" => self.squeeze(pos, factor, true),
            "squeeze_v" => self.squeeze(pos, factor, false),
            "liquid" => self.liquid(pos, factor),
            "wave" => self.wave(pos, factor),
            _ => self.swirl(pos, factor, sign),
        }
    }

    /// Rotation about the frame center that falls off toward the edges.
    fn swirl(&self, pos: Vec2, factor: f32, sign: f32) -> Vec2 {
        let center = Vec2::new(self.width * 0.5, self.height * 0.5);
        let rel = pos - center;
        let max_radius = center.length().max(1.0);
        let dist = rel.length();

        let influence = raster::smoothstep((1.0 - dist / max_radius).clamp(0.0, 1.0));
        let twist = (dist / max_radius) * self.intensity * TAU * influence * factor * sign;
        let (sin, cos) = twist.sin_cos();
        let rotated = Vec2::new(rel.x * cos - rel.y * sin, rel.x * sin + rel.y * cos);
        rotated - rel
    }

    /// Sinusoidal compression along one axis.
    fn squeeze(&self, pos: Vec2, factor: f32, horizontal: bool) -> Vec2 {
        let amplitude = self.intensity * factor * 0.09;
        if horizontal {
            let phase = (pos.x - self.width * 0.5) / self.width * 3.0 * PI;
            Vec2::new(phase.sin() * amplitude * self.width, 0.0)
        } else {
            let phase = (pos.y - self.height * 0.5) / self.height * 3.0 * PI;
            Vec2::new(0.0, phase.sin() * amplitude * self.height)
        }
    }

    /// Layered drifting sines in both axes.
    fn liquid(&self, pos: Vec2, factor: f32) -> Vec2 {
        let k = self.intensity * factor * 0.047 * self.width;
        let t = self.time;
        let x = (pos.x / self.width * 12.8 + t).sin() * k
            + (pos.x / self.width * 19.2 + t * 1.3).sin() * k * 0.4;
        let y = (pos.y / self.height * 12.8 + t * 0.7).cos() * k * 0.8
            + (pos.y / self.height * 19.2 + t * 0.5).cos() * k * 0.3;
        Vec2::new(x, y)
    }

    /// Horizontal traveling waves displacing rows, plus a gentle column sway.
    fn wave(&self, pos: Vec2, factor: f32) -> Vec2 {
        let k = self.intensity * factor * 0.0625 * self.width;
        let t = self.time;
        let x = (pos.y / self.height * 12.8 + t * 0.8).sin() * k * 0.4;
        let y = (pos.x / self.width * 19.2 + t).sin() * k
            + (pos.x / self.width * 32.0 + t * 1.5).sin() * k * 0.6;
        Vec2::new(x, y)
    }
}
