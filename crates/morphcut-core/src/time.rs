//! Frame rate representation and duration-to-frame arithmetic.
//!
//! Rates are rational to stay exact for broadcast rates like 30000/1001.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A frame rate as a rational number of frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
    /// NTSC 29.97
    pub const FPS_29_97: Self = Self::new(30000, 1001);

    /// Create a frame rate. The denominator must be non-zero.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Create an integer frame rate.
    #[inline]
    pub const fn from_fps(fps: u32) -> Self {
        Self::new(fps, 1)
    }

    /// Frames per second as a float.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Number of frames covering `seconds` of playback, rounded up and
    /// clamped to at least one frame.
    pub fn frames_for_duration(self, seconds: f64) -> usize {
        // Go through a rational so 1.0s at 29.97 lands on 30 frames, not 29.
        const PRECISION: i64 = 1_000_000;
        let duration = Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION);
        let rate = Rational64::new(self.numerator as i64, self.denominator as i64);
        let frames = duration * rate;
        let whole = frames.ceil().to_integer();
        whole.max(1) as usize
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{} fps", self.numerator)
        } else {
            write!(f, "{:.3} fps", self.to_fps_f64())
        }
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}
