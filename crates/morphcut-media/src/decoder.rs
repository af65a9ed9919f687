//! Clip decoding via the FFmpeg sidecar.
//!
//! The sidecar emits rawvideo RGBA on stdout; a reader thread pumps frames
//! and stream metadata through a bounded channel while the caller collects
//! them in order. Still images (`.png`, `.jpg`, `.jpeg`) come out as
//! single-frame clips.

use crate::DecodedClip;
use crossbeam_channel::{bounded, Sender};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, StreamTypeSpecificData};
use morphcut_core::{Frame, FrameRate, MorphcutError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Frames buffered between the reader thread and the collector.
const DECODE_QUEUE: usize = 32;

enum DecodeEvent {
    Frame {
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    SourceFps(f32),
    Fatal(String),
}

/// Decode a video or still image into an RGBA frame sequence.
pub fn decode_clip(path: &Path) -> Result<DecodedClip> {
    if !path.is_file() {
        return Err(MorphcutError::Decode(format!(
            "no such file: {}",
            path.display()
        )));
    }

    info!("decoding {}", path.display());
    let path_str = path.to_string_lossy().to_string();
    let (tx, rx) = bounded(DECODE_QUEUE);
    let reader = std::thread::spawn(move || decode_worker(&path_str, &tx));

    let mut frames = Vec::new();
    let mut fps = None;
    let mut failure = None;
    for event in rx {
        match event {
            DecodeEvent::Frame {
                width,
                height,
                data,
            } => frames.push(Frame::from_rgba(width, height, data)?),
            DecodeEvent::SourceFps(value) => fps = Some(value),
            DecodeEvent::Fatal(reason) => failure = Some(reason),
        }
    }
    reader
        .join()
        .map_err(|_| MorphcutError::Decode("decode thread panicked".into()))?;

    if let Some(reason) = failure {
        return Err(MorphcutError::Decode(format!(
            "{}: {reason}",
            path.display()
        )));
    }
    if frames.is_empty() {
        return Err(MorphcutError::Decode(format!(
            "{}: no video frames found",
            path.display()
        )));
    }

    let fps = fps
        .filter(|f| *f > 0.0)
        .map(frame_rate_from_fps)
        .unwrap_or_else(|| {
            // Stills and rate-less sources fall back to the project default.
            debug!("no source frame rate, assuming {}", FrameRate::default());
            FrameRate::default()
        });

    debug!(
        "decoded {} frames at {} from {}",
        frames.len(),
        fps,
        path.display()
    );
    Ok(DecodedClip { frames, fps })
}

/// Owns the sidecar process; runs on its own thread so the channel
/// backpressures the pipe instead of buffering the whole clip twice.
fn decode_worker(path: &str, tx: &Sender<DecodeEvent>) {
    let spawned = FfmpegCommand::new()
        .hide_banner()
        .input(path)
        .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
        .output("-")
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            let _ = tx.send(DecodeEvent::Fatal(format!("failed to spawn ffmpeg: {e}")));
            return;
        }
    };
    let iter = match child.iter() {
        Ok(iter) => iter,
        Err(e) => {
            let _ = tx.send(DecodeEvent::Fatal(format!("ffmpeg gave no output: {e}")));
            let _ = child.wait();
            return;
        }
    };

    for event in iter {
        let message = match event {
            FfmpegEvent::OutputFrame(frame) => Some(DecodeEvent::Frame {
                width: frame.width,
                height: frame.height,
                data: frame.data,
            }),
            FfmpegEvent::ParsedInputStream(stream) => match stream.type_specific_data {
                StreamTypeSpecificData::Video(video) => Some(DecodeEvent::SourceFps(video.fps)),
                _ => None,
            },
            FfmpegEvent::Error(e) | FfmpegEvent::Log(LogLevel::Fatal, e) => {
                Some(DecodeEvent::Fatal(e))
            }
            _ => None,
        };
        if let Some(message) = message {
            if tx.send(message).is_err() {
                break;
            }
        }
    }
    let _ = child.wait();
}

/// Snap a parsed float rate onto an exact rational one.
fn frame_rate_from_fps(fps: f32) -> FrameRate {
    // NTSC family rates come out of FFmpeg as truncated floats.
    const NTSC: [(f32, FrameRate); 3] = [
        (23.976, FrameRate::new(24000, 1001)),
        (29.97, FrameRate::FPS_29_97),
        (59.94, FrameRate::new(60000, 1001)),
    ];
    for (value, rate) in NTSC {
        if (fps - value).abs() < 0.01 {
            return rate;
        }
    }
    FrameRate::from_fps(fps.round().max(1.0) as u32)
}
