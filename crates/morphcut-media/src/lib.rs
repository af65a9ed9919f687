//! MorphCut Media - FFmpeg integration for clip I/O
//!
//! This crate is the engine's media boundary:
//! - Decoding videos and still images into RGBA frame sequences
//! - Encoding frame sequences back into video files
//!
//! FFmpeg runs as a sidecar subprocess, so no development headers are
//! needed at build time.

pub mod decoder;
pub mod encoder;

pub use decoder::decode_clip;
pub use encoder::encode_clip;

use morphcut_core::{Frame, FrameRate, Result};
use std::path::Path;

/// A decoded clip: ordered frames plus the source frame rate.
///
/// Frames are RGBA8 and share one resolution.
pub struct DecodedClip {
    pub frames: Vec<Frame>,
    pub fps: FrameRate,
}

impl DecodedClip {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resolution of the clip, `(width, height)`.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| (f.width, f.height))
    }
}

/// The media I/O collaborator consumed by the processor.
///
/// Implementations surface failures as `Decode`/`Encode` errors. Retry
/// policy, if any, belongs to the implementation; the engine never retries.
pub trait MediaService: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedClip>;
    fn encode(&self, frames: &[Frame], fps: FrameRate, path: &Path) -> Result<()>;
}

/// [`MediaService`] backed by an FFmpeg sidecar process.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegMedia;

impl MediaService for FfmpegMedia {
    fn decode(&self, path: &Path) -> Result<DecodedClip> {
        decode_clip(path)
    }

    fn encode(&self, frames: &[Frame], fps: FrameRate, path: &Path) -> Result<()> {
        encode_clip(frames, fps, path)
    }
}

/// Initialize the media subsystem (call once at startup).
pub fn init() {
    tracing::info!("MorphCut media initialized (FFmpeg sidecar)");
}
