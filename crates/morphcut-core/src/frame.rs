//! Frame buffer type for video frames in CPU memory.
//!
//! Every frame in a transition job is tightly packed RGBA8. Source clips
//! that disagree on resolution are resized at job entry, so effects can
//! assume both inputs share one geometry.

use serde::{Deserialize, Serialize};

/// A video frame in CPU memory, tightly packed RGBA8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel data, `width * height * 4` bytes, row-major
    pub data: Vec<u8>,
}

impl Frame {
    /// Number of channels per pixel (RGBA).
    pub const CHANNELS: usize = 4;

    /// Create a black, fully opaque frame.
    pub fn new(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * Self::CHANNELS];
        for px in data.chunks_exact_mut(Self::CHANNELS) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * Self::CHANNELS);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap an existing RGBA8 buffer. The buffer length must be
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> crate::Result<Self> {
        let expected = width as usize * height as usize * Self::CHANNELS;
        if data.len() != expected {
            return Err(crate::MorphcutError::Internal(format!(
                "RGBA buffer length {} does not match {}x{} ({} bytes)",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Total memory usage of this frame in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }

    /// Byte offset of the pixel at (x, y).
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * Self::CHANNELS
    }

    /// Get the pixel at (x, y). Coordinates must be in bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Set the pixel at (x, y). Coordinates must be in bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Get the pixel at (x, y), clamping coordinates to the frame edges.
    #[inline]
    pub fn pixel_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.pixel(cx, cy)
    }

    /// True if `other` has the same resolution.
    #[inline]
    pub fn same_size(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Bilinearly resample into a new resolution. Returns a clone when the
    /// target matches the current size.
    pub fn resized(&self, width: u32, height: u32) -> Frame {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = Frame::new(width, height);
        let sx = self.width as f32 / width as f32;
        let sy = self.height as f32 / height as f32;
        for y in 0..height {
            // Sample at pixel centers of the source grid.
            let fy = ((y as f32 + 0.5) * sy - 0.5).max(0.0);
            let y0 = fy.floor() as u32;
            let y1 = (y0 + 1).min(self.height - 1);
            let ty = fy - y0 as f32;
            for x in 0..width {
                let fx = ((x as f32 + 0.5) * sx - 0.5).max(0.0);
                let x0 = fx.floor() as u32;
                let x1 = (x0 + 1).min(self.width - 1);
                let tx = fx - x0 as f32;

                let p00 = self.pixel(x0, y0);
                let p10 = self.pixel(x1, y0);
                let p01 = self.pixel(x0, y1);
                let p11 = self.pixel(x1, y1);

                let mut px = [0u8; 4];
                for c in 0..4 {
                    let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
                    let bot = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
                    px[c] = (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8;
                }
                out.set_pixel(x, y, px);
            }
        }
        out
    }

    /// Create a test pattern frame (color bars).
    pub fn test_pattern(width: u32, height: u32) -> Self {
        let colors: [[u8; 4]; 8] = [
            [255, 255, 255, 255], // White
            [255, 255, 0, 255],   // Yellow
            [0, 255, 255, 255],   // Cyan
            [0, 255, 0, 255],     // Green
            [255, 0, 255, 255],   // Magenta
            [255, 0, 0, 255],     // Red
            [0, 0, 255, 255],     // Blue
            [0, 0, 0, 255],       // Black
        ];
        let mut frame = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let bar = (x * 8 / width).min(7) as usize;
                frame.set_pixel(x, y, colors[bar]);
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_is_opaque_black() {
        let frame = Frame::new(4, 4);
        assert_eq!(frame.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(frame.memory_size(), 4 * 4 * 4);
    }

    #[test]
    fn test_solid_fill() {
        let frame = Frame::solid(3, 2, [10, 20, 30, 255]);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(frame.pixel(x, y), [10, 20, 30, 255]);
            }
        }
    }

    #[test]
    fn test_from_rgba_rejects_bad_length() {
        assert!(Frame::from_rgba(2, 2, vec![0u8; 15]).is_err());
        assert!(Frame::from_rgba(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn test_resize_identity() {
        let frame = Frame::test_pattern(16, 8);
        let same = frame.resized(16, 8);
        assert_eq!(same, frame);
    }

    #[test]
    fn test_resize_solid_stays_solid() {
        let frame = Frame::solid(8, 8, [100, 150, 200, 255]);
        let small = frame.resized(4, 4);
        assert_eq!(small.width, 4);
        assert_eq!(small.height, 4);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(small.pixel(x, y), [100, 150, 200, 255]);
            }
        }
    }

    #[test]
    fn test_pixel_clamped_edges() {
        let frame = Frame::test_pattern(8, 8);
        assert_eq!(frame.pixel_clamped(-5, -5), frame.pixel(0, 0));
        assert_eq!(frame.pixel_clamped(100, 100), frame.pixel(7, 7));
    }
}
