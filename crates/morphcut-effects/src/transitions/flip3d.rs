//! Flip 3D: A and B sit on opposite faces of a plane that rotates 0→180°
//! with progress. The visible face is perspective-projected onto a
//! trapezoid: the receding edge shrinks, the approaching edge grows.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::raster::{self, QuadMap};
use crate::transition::{FrameCtx, Transition};
use glam::Vec2;
use morphcut_core::{Frame, Result};
use std::f32::consts::PI;

pub struct Flip3d;

impl Transition for Flip3d {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "flip3d",
            vec![
                ParamSpec::choice(
                    "direction",
                    "horizontal",
                    &["horizontal", "vertical"],
                    "Rotation axis orientation",
                ),
                ParamSpec::float("perspective", 1.0, 0.5, 2.0, "Perspective strength"),
            ],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let horizontal = params.str("direction")? == "horizontal";
        let perspective = params.f64("perspective")? as f32;
        let p = ctx.progress.clamp(0.0, 1.0);

        if p <= 0.0 {
            return Ok(a.clone());
        }
        if p >= 1.0 {
            return Ok(b.clone());
        }

        let angle = p * PI;
        // Front face for the first half, back face for the second.
        let (face, mirrored) = if angle <= PI * 0.5 {
            (a, false)
        } else {
            (b, true)
        };

        let quad = face_quad(a.width, a.height, angle, perspective, horizontal);
        let mut out = Frame::new(a.width, a.height);
        let map = QuadMap::new(quad);

        let w = a.width as f32 - 1.0;
        let h = a.height as f32 - 1.0;
        for y in 0..a.height {
            for x in 0..a.width {
                let px = match &map {
                    Some(map) => match map.uv(x as f32, y as f32) {
                        Some(mut uv) => {
                            // The back face enters mirrored, un-mirroring as
                            // the plane completes its half turn.
                            if mirrored {
                                if horizontal {
                                    uv.x = 1.0 - uv.x;
                                } else {
                                    uv.y = 1.0 - uv.y;
                                }
                            }
                            raster::sample_bilinear(face, uv.x * w, uv.y * h)
                        }
                        None => [0, 0, 0, 255],
                    },
                    // Plane edge-on: nothing visible.
                    None => [0, 0, 0, 255],
                };
                out.set_pixel(x, y, px);
            }
        }
        Ok(out)
    }
}

/// Projected corner quad of the visible face at the given rotation angle.
fn face_quad(width: u32, height: u32, angle: f32, perspective: f32, horizontal: bool) -> [Vec2; 4] {
    let w = width as f32;
    let h = height as f32;
    let cx = w * 0.5;
    let cy = h * 0.5;

    // Width of the projected face and depth of the receding edge.
    let spread = angle.cos().abs();
    let depth = angle.sin() * 0.18 * perspective;

    // The edge with positive rotation direction comes toward the viewer
    // (grows); the opposite edge recedes (shrinks). After the half turn the
    // roles swap, which the mirrored UV compensates for.
    let near = 1.0 / (1.0 - depth).max(0.35);
    let far = 1.0 / (1.0 + depth);

    if horizontal {
        let half_l = cx * spread;
        [
            Vec2::new(cx - half_l, cy - cy * far),
            Vec2::new(cx + half_l, cy - cy * near),
            Vec2::new(cx + half_l, cy + cy * near),
            Vec2::new(cx - half_l, cy + cy * far),
        ]
    } else {
        let half_t = cy * spread;
        [
            Vec2::new(cx - cx * far, cy - half_t),
            Vec2::new(cx + cx * far, cy - half_t),
            Vec2::new(cx + cx * near, cy + half_t),
            Vec2::new(cx - cx * near, cy + half_t),
        ]
    }
}
