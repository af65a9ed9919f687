//! Page turn: A peels away like a book page, revealing B. The fold line
//! sweeps across the frame; the part of A already lifted folds back over
//! the fold and shows its shaded backside, with a shadow cast on the
//! revealed side.

use crate::params::{EffectDescriptor, ParamSpec, ParamValues};
use crate::raster;
use crate::transition::{FrameCtx, Transition};
use morphcut_core::{Frame, Result};
use std::f32::consts::PI;

pub struct PageTurn;

impl Transition for PageTurn {
    fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor::new(
            "page_turn",
            vec![
                ParamSpec::choice(
                    "direction",
                    "right",
                    &["right", "left", "up", "down"],
                    "Edge the page lifts from",
                ),
                ParamSpec::float("curl", 1.0, 0.5, 2.0, "Backside curl shading strength"),
                ParamSpec::float("shadow", 0.6, 0.0, 1.0, "Fold shadow intensity"),
            ],
        )
    }

    fn render(&self, a: &Frame, b: &Frame, ctx: &FrameCtx, params: &ParamValues) -> Result<Frame> {
        let direction = params.str("direction")?;
        let curl = params.f64("curl")? as f32;
        let shadow = params.f64("shadow")? as f32;
        let p = ctx.progress.clamp(0.0, 1.0);

        if p <= 0.0 {
            return Ok(a.clone());
        }
        if p >= 1.0 {
            return Ok(b.clone());
        }

        let lift = (p * PI).sin();
        let mut out = Frame::new(a.width, a.height);

        for y in 0..a.height {
            for x in 0..a.width {
                // Work on the axis the fold travels along, with the lifted
                // edge mapped to the high end.
                let (along, extent) = match direction {
                    "left" => ((a.width - 1 - x) as f32, a.width as f32),
                    "up" => ((a.height - 1 - y) as f32, a.height as f32),
                    "down" => (y as f32, a.height as f32),
                    _ => (x as f32, a.width as f32),
                };
                // Fold position sweeps from the lifted edge to the far one.
                let fold = extent * (1.0 - p);

                let px = if along > fold {
                    // Already peeled: B, with the fold's drop shadow.
                    let mut px = b.pixel(x, y);
                    if shadow > 0.0 {
                        let reach = extent * 0.06;
                        let dist = along - fold;
                        if dist < reach {
                            let strength = shadow * lift * (1.0 - dist / reach) * 0.55;
                            px = raster::shade_pixel(px, 1.0 - strength);
                        }
                    }
                    px
                } else {
                    // The lifted page folds back over the fold line: output
                    // position `along` shows the backside of A's content at
                    // the mirrored position `2 * fold - along`.
                    let mirrored = 2.0 * fold - along;
                    if mirrored < extent {
                        let (sx, sy) = match direction {
                            "left" => (a.width as f32 - 1.0 - mirrored, y as f32),
                            "up" => (x as f32, a.height as f32 - 1.0 - mirrored),
                            "down" => (x as f32, mirrored),
                            _ => (mirrored, y as f32),
                        };
                        let px = raster::sample_bilinear(a, sx, sy);
                        // Paper backside: washed out, darkest at the fold.
                        let depth = ((mirrored - along) / extent).clamp(0.0, 1.0);
                        let tone = 1.0 - (0.12 + 0.25 * (1.0 - depth)) * curl.min(2.0) * 0.7;
                        raster::shade_pixel(px, tone)
                    } else {
                        // Not yet covered by the folded-back page.
                        a.pixel(x, y)
                    }
                };
                out.set_pixel(x, y, px);
            }
        }
        Ok(out)
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
        Factory::build(&reg, "page_turn", &map).unwrap().1
    }

    #[test]
    fn test_endpoints_exact_for_all_directions() {
        let a = Frame::test_pattern(40, 30);
        let b = Frame::solid(40, 30, [10, 120, 240, 255]);
        for dir in ["right", "left", "up", "down"] {
            let values = params(serde_json::json!({"direction": dir}));
            let start = PageTurn.apply(&a, &b, &FrameCtx::new(0, 16), &values).unwrap();
            let end = PageTurn.apply(&a, &b, &FrameCtx::new(15, 16), &values).unwrap();
            assert_eq!(start, a, "direction {dir}");
            assert_eq!(end, b, "direction {dir}");
        }
    }

    #[test]
    fn test_reveal_sweeps_from_the_lifted_edge() {
        let a = Frame::solid(40, 40, [255, 0, 0, 255]);
        let b = Frame::solid(40, 40, [0, 0, 255, 255]);
        let values = params(serde_json::json!({"direction": "right", "shadow": 0.0}));

        // Early: the right edge already shows B, the left edge is still A.
        let early = PageTurn.apply(&a, &b, &FrameCtx::new(2, 21), &values).unwrap();
        assert_eq!(early.pixel(39, 20), [0, 0, 255, 255]);
        assert_eq!(early.pixel(0, 20), [255, 0, 0, 255]);

        // Late: nearly everything shows B.
        let late = PageTurn.apply(&a, &b, &FrameCtx::new(19, 21), &values).unwrap();
        assert_eq!(late.pixel(39, 20), [0, 0, 255, 255]);
        assert_eq!(late.pixel(20, 20), [0, 0, 255, 255]);
    }

    #[test]
    fn test_revealed_area_is_monotonic() {
        let a = Frame::solid(32, 32, [255, 0, 0, 255]);
        let b = Frame::solid(32, 32, [0, 0, 255, 255]);
        let values = params(serde_json::json!({"shadow": 0.0}));

        let count_b = |frame: &Frame| {
            frame
                .data
                .chunks_exact(4)
                .filter(|px| px[2] == 255 && px[0] == 0)
                .count()
        };

        let mut prev = 0;
        for i in 0..16 {
            let out = PageTurn.apply(&a, &b, &FrameCtx::new(i, 16), &values).unwrap();
            let revealed = count_b(&out);
            assert!(revealed >= prev, "reveal shrank at frame {i}");
            prev = revealed;
        }
        assert_eq!(prev, 32 * 32);
    }

    #[test]
    fn test_backside_is_shaded_a_content() {
        let a = Frame::solid(40, 40, [200, 200, 200, 255]);
        let b = Frame::solid(40, 40, [0, 0, 255, 255]);
        let values = params(serde_json::json!({"direction": "right", "shadow": 0.0}));

        // Midway, the region just left of the fold shows the folded-back
        // page: A's gray, darkened, not pure A and not B.
        let mid = PageTurn.apply(&a, &b, &FrameCtx::new(10, 21), &values).unwrap();
        let px = mid.pixel(18, 20);
        assert!(px[0] < 200 && px[0] > 80, "unexpected backside tone {px:?}");
        assert_eq!(px[0], px[1]);
    }
}
