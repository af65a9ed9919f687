//! Explosion: A's pixels fly outward along a seeded velocity field while B
//! is composited underneath.
//!
//! The field lives on a coarse 16-px cell grid. Each cell gets a unit
//! direction (radial from the frame center, rotated by a seeded jitter), a
//! seeded magnitude and a seeded survival threshold; once progress passes a
//! cell's threshold the cell has fully dissolved into B. Per-frame scatter
//! comes from a generator seeded with `seed ^ frame_index`, so re-running a
//! job reproduces the output byte for byte.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::raster;
use crate::transition::{FrameCtx, Transition};
use glam::Vec2;
use morphcut_core::{Frame, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CELL: u32 = 16;

pub struct Explosion;

impl Transition for Explosion {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "explosion",
            vec![
                ParamSpec::float("strength", 1.0, 0.25, 3.0, "Displacement strength"),
                ParamSpec::int("seed", 0, 0, i32::MAX as i64, "Random seed"),
            ],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let strength = params.f64("strength")? as f32;
        let seed = params.i64("seed")? as u64;
        let p = ctx.progress.clamp(0.0, 1.0);

        if p <= 0.0 {
            return Ok(a.clone());
        }
        if p >= 1.0 {
            return Ok(b.clone());
        }

        let w = a.width;
        let h = a.height;
        let cells_x = w.div_ceil(CELL);
        let cells_y = h.div_ceil(CELL);
        let field = VelocityField::seeded(seed, cells_x, cells_y, w, h);

        // Whole-frame scatter jitter, re-derived per frame.
        let mut frame_rng = StdRng::seed_from_u64(seed ^ (ctx.frame_index as u64).wrapping_mul(
            0x9E37_79B9_7F4A_7C15,
        ));
        let jitter_scale: f32 = frame_rng.random_range(0.92..1.08);

        let diagonal = ((w * w + h * h) as f32).sqrt();
        let reach = 0.35 * diagonal * strength * p * p * jitter_scale;
        let fade = 1.0 - p;

        let mut out = Frame::new(w, h);
        for y in 0..h {
            let cy = (y / CELL).min(cells_y - 1);
            for x in 0..w {
                let cx = (x / CELL).min(cells_x - 1);
                let cell = field.cell(cx, cy);

                let under = b.pixel(x, y);
                if p > cell.survival {
                    out.set_pixel(x, y, under);
                    continue;
                }

                let disp = cell.direction * cell.magnitude * reach;
                let src = Vec2::new(x as f32, y as f32) - disp;
                let moved = raster::sample_bilinear(a, src.x, src.y);
                out.set_pixel(x, y, raster::mix_pixel(under, moved, fade));
            }
        }
        Ok(out)
    }
}

struct FieldCell {
    direction: Vec2,
    magnitude: f32,
    survival: f32,
}

struct VelocityField {
    cells: Vec<FieldCell>,
    cells_x: u32,
}

impl VelocityField {
    /// Derive the per-cell velocities from the job seed alone, so every
    /// frame of a job shares one field.
    fn seeded(seed: u64, cells_x: u32, cells_y: u32, w: u32, h: u32) -> Self {
        let center = Vec2::new(w as f32 * 0.5, h as f32 * 0.5);
        let mut cells = Vec::with_capacity((cells_x * cells_y) as usize);
        for cy in 0..cells_y {
            for cx in 0..cells_x {
                let cell_seed = seed
                    ^ (cx as u64).wrapping_mul(73_856_093)
                    ^ (cy as u64).wrapping_mul(19_349_663);
                let mut rng = StdRng::seed_from_u64(cell_seed);

                let pos = Vec2::new(
                    (cx * CELL) as f32 + CELL as f32 * 0.5,
                    (cy * CELL) as f32 + CELL as f32 * 0.5,
                );
                let radial = (pos - center).normalize_or(Vec2::X);
                let jitter: f32 = rng.random_range(-0.5..0.5);
                let (sin, cos) = jitter.sin_cos();
                let direction = Vec2::new(
                    radial.x * cos - radial.y * sin,
                    radial.x * sin + radial.y * cos,
                );

                cells.push(FieldCell {
                    direction,
                    magnitude: rng.random_range(0.5..1.5),
                    survival: rng.random_range(0.0..0.9),
                });
            }
        }
        Self { cells, cells_x }
    }

    #[inline]
    fn cell(&self, cx: u32, cy: u32) -> &FieldCell {
        &self.cells[(cy * self.cells_x + cx) as usize]
    }
}
