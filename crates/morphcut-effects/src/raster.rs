//! Shared pixel helpers for the built-in transitions: blending, bilinear
//! sampling, affine and perspective-quad inverse-mapped warps, and color
//! parsing.

use glam::{Mat2, Mat3, Vec2, Vec3};
use morphcut_core::{Frame, MorphcutError, Result};

/// Linear blend of two frames: `out = a * (1 - t) + b * t`.
pub fn blend(a: &Frame, b: &Frame, t: f32) -> Frame {
    let t = t.clamp(0.0, 1.0);
    let mut out = Frame::new(a.width, a.height);
    for ((o, pa), pb) in out.data.iter_mut().zip(a.data.iter()).zip(b.data.iter()) {
        *o = (*pa as f32 * (1.0 - t) + *pb as f32 * t).round() as u8;
    }
    out
}

/// Per-channel linear mix of two pixels.
#[inline]
pub fn mix_pixel(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for c in 0..4 {
        out[c] = (a[c] as f32 * (1.0 - t) + b[c] as f32 * t)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
    out
}

/// Hermite smoothstep on [0, 1].
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bilinear sample with clamp-to-edge borders.
pub fn sample_bilinear(frame: &Frame, x: f32, y: f32) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = x - x0;
    let ty = y - y0;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let p00 = frame.pixel_clamped(x0, y0);
    let p10 = frame.pixel_clamped(x0 + 1, y0);
    let p01 = frame.pixel_clamped(x0, y0 + 1);
    let p11 = frame.pixel_clamped(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
        let bot = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
        out[c] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Multiply a pixel's color channels by `factor`, leaving alpha alone.
#[inline]
pub fn shade_pixel(px: [u8; 4], factor: f32) -> [u8; 4] {
    let f = factor.clamp(0.0, 1.0);
    [
        (px[0] as f32 * f).round() as u8,
        (px[1] as f32 * f).round() as u8,
        (px[2] as f32 * f).round() as u8,
        px[3],
    ]
}

/// Similarity transform about the frame center: rotate by `angle` radians,
/// scale by `scale`, then translate. Sampling is inverse-mapped with
/// replicate borders, so the output has no uncovered pixels.
pub fn warp_similarity(src: &Frame, angle: f32, scale: f32, translate: Vec2) -> Frame {
    let mut out = Frame::new(src.width, src.height);
    let center = Vec2::new(
        (src.width as f32 - 1.0) * 0.5,
        (src.height as f32 - 1.0) * 0.5,
    );
    let inv_rot = Mat2::from_angle(-angle);
    let inv_scale = 1.0 / scale.max(1e-3);

    for y in 0..src.height {
        for x in 0..src.width {
            let p = Vec2::new(x as f32, y as f32);
            let q = center + inv_rot * ((p - center - translate) * inv_scale);
            out.set_pixel(x, y, sample_bilinear(src, q.x, q.y));
        }
    }
    out
}

/// Perspective mapping of the unit square onto an arbitrary quad, used
/// inverse: given an output pixel, recover the source UV inside the quad.
///
/// Corners are ordered top-left, top-right, bottom-right, bottom-left,
/// matching UV (0,0), (1,0), (1,1), (0,1).
pub struct QuadMap {
    inverse: Mat3,
}

impl QuadMap {
    /// Build the map for a destination quad. Returns `None` when the quad
    /// is degenerate (collinear corners).
    pub fn new(quad: [Vec2; 4]) -> Option<Self> {
        let [p0, p1, p2, p3] = quad;

        let dx1 = p1 - p2;
        let dx2 = p3 - p2;
        let sum = p0 - p1 + p2 - p3;

        let den = dx1.x * dx2.y - dx1.y * dx2.x;
        if den.abs() < 1e-6 {
            return None;
        }

        let g = (sum.x * dx2.y - sum.y * dx2.x) / den;
        let h = (dx1.x * sum.y - dx1.y * sum.x) / den;

        let a = p1.x - p0.x + g * p1.x;
        let b = p3.x - p0.x + h * p3.x;
        let c = p0.x;
        let d = p1.y - p0.y + g * p1.y;
        let e = p3.y - p0.y + h * p3.y;
        let f = p0.y;

        let forward = Mat3::from_cols(
            Vec3::new(a, d, g),
            Vec3::new(b, e, h),
            Vec3::new(c, f, 1.0),
        );
        if forward.determinant().abs() < 1e-9 {
            return None;
        }
        Some(Self {
            inverse: forward.inverse(),
        })
    }

    /// UV of the output point inside the quad, or `None` when it falls
    /// outside the unit square.
    pub fn uv(&self, x: f32, y: f32) -> Option<Vec2> {
        let v = self.inverse * Vec3::new(x, y, 1.0);
        if v.z.abs() < 1e-9 {
            return None;
        }
        let uv = Vec2::new(v.x / v.z, v.y / v.z);
        const EPS: f32 = 1e-4;
        if uv.x < -EPS || uv.x > 1.0 + EPS || uv.y < -EPS || uv.y > 1.0 + EPS {
            return None;
        }
        Some(uv.clamp(Vec2::ZERO, Vec2::ONE))
    }
}

/// Parse a `#rrggbb` hex string or a basic color name into opaque RGBA.
pub fn parse_color(input: &str) -> Result<[u8; 4]> {
    let named = match input.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0, 255]),
        "white" => Some([255, 255, 255, 255]),
        "red" => Some([255, 0, 0, 255]),
        "green" => Some([0, 255, 0, 255]),
        "blue" => Some([0, 0, 255, 255]),
        "gray" | "grey" => Some([128, 128, 128, 255]),
        _ => None,
    };
    if let Some(rgba) = named {
        return Ok(rgba);
    }

    let hex = input.strip_prefix('#').unwrap_or(input);
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16);
        let g = u8::from_str_radix(&hex[2..4], 16);
        let b = u8::from_str_radix(&hex[4..6], 16);
        if let (Ok(r), Ok(g), Ok(b)) = (r, g, b) {
            return Ok([r, g, b, 255]);
        }
    }
    Err(MorphcutError::Validation(format!(
        "unrecognized color '{input}'"
    )))
}
