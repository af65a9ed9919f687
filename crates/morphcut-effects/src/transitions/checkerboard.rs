//! Checkerboard: reveals B through a grid of cells flipped in a diagonal
//! wave. Cells are ordered by `row + col` ascending (ties by row), so the
//! reveal sweeps from the top-left corner to the bottom-right.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::transition::{FrameCtx, Transition};
use morphcut_core::{Frame, Result};

pub struct Checkerboard;

impl Transition for Checkerboard {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "checkerboard",
            vec![ParamSpec::int(
                "grid_size",
                8,
                2,
                64,
                "Cells per side of the grid",
            )],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let grid = params.i64("grid_size")? as u32;
        let p = ctx.progress.clamp(0.0, 1.0);

        let cells = (grid * grid) as f32;
        let revealed = (p * cells).round() as u32;
        if revealed == 0 {
            return Ok(a.clone());
        }
        if revealed >= grid * grid {
            return Ok(b.clone());
        }

        let ranks = reveal_ranks(grid);
        let mut out = Frame::new(a.width, a.height);
        for y in 0..a.height {
            let row = (y * grid / a.height).min(grid - 1);
            for x in 0..a.width {
                let col = (x * grid / a.width).min(grid - 1);
                let rank = ranks[(row * grid + col) as usize];
                let px = if rank < revealed {
                    b.pixel(x, y)
                } else {
                    a.pixel(x, y)
                };
                out.set_pixel(x, y, px);
            }
        }
        Ok(out)
    }
}

/// Reveal order per cell: position in the diagonal wave.
fn reveal_ranks(grid: u32) -> Vec<u32> {
    let mut ranks = vec![0u32; (grid * grid) as usize];
    let mut next = 0u32;
    for diagonal in 0..(2 * grid - 1) {
        for row in 0..grid {
            let col = diagonal as i64 - row as i64;
            if (0..grid as i64).contains(&col) {
                ranks[(row * grid + col as u32) as usize] = next;
                next += 1;
            }
        }
    }
    ranks
}
