//! Clip encoding via the FFmpeg sidecar.
//!
//! Frames stream into the sidecar's stdin as rawvideo RGBA and come out as
//! an H.264 yuv420p file. The caller owns cleanup of partial files on
//! failure.

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use morphcut_core::{Frame, FrameRate, MorphcutError, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Encode an RGBA frame sequence to a video file at the given rate.
pub fn encode_clip(frames: &[Frame], fps: FrameRate, path: &Path) -> Result<()> {
    let Some(first) = frames.first() else {
        return Err(MorphcutError::Encode("no frames to encode".into()));
    };
    let (width, height) = (first.width, first.height);
    if let Some(bad) = frames.iter().find(|f| !f.same_size(first)) {
        return Err(MorphcutError::Encode(format!(
            "frame resolution changed mid-sequence: {}x{} then {}x{}",
            width, height, bad.width, bad.height
        )));
    }

    info!(
        "encoding {} frames at {} to {}",
        frames.len(),
        fps,
        path.display()
    );

    let mut child = FfmpegCommand::new()
        .hide_banner()
        .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
        .args(["-s", &format!("{width}x{height}")])
        .args(["-r", &format!("{}/{}", fps.numerator, fps.denominator)])
        .input("-")
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .overwrite()
        .output(path.to_string_lossy())
        .spawn()
        .map_err(|e| MorphcutError::Encode(format!("failed to spawn ffmpeg: {e}")))?;

    let mut stdin = child
        .take_stdin()
        .ok_or_else(|| MorphcutError::Encode("ffmpeg stdin unavailable".into()))?;
    let events = child
        .iter()
        .map_err(|e| MorphcutError::Encode(format!("ffmpeg gave no output: {e}")))?;

    let mut failure = None;
    std::thread::scope(|scope| {
        scope.spawn(move || {
            for frame in frames {
                if stdin.write_all(&frame.data).is_err() {
                    // Encoder died; its error event carries the reason.
                    break;
                }
            }
            // stdin drops here, closing the pipe so the encoder flushes.
        });
        for event in events {
            if let FfmpegEvent::Error(e) | FfmpegEvent::Log(LogLevel::Fatal, e) = event {
                failure = Some(e);
            }
        }
    });

    let status = child
        .wait()
        .map_err(|e| MorphcutError::Encode(format!("ffmpeg did not exit: {e}")))?;
    if let Some(reason) = failure {
        return Err(MorphcutError::Encode(format!(
            "{}: {reason}",
            path.display()
        )));
    }
    if !status.success() {
        return Err(MorphcutError::Encode(format!(
            "ffmpeg exited with {status} writing {}",
            path.display()
        )));
    }

    debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_is_an_encode_error() {
        let err = encode_clip(&[], FrameRate::FPS_30, Path::new("/tmp/out.mp4")).unwrap_err();
        assert!(matches!(err, MorphcutError::Encode(_)));
    }

    #[test]
    fn test_mixed_resolutions_are_rejected() {
        let frames = vec![Frame::new(8, 8), Frame::new(4, 4)];
        let err = encode_clip(&frames, FrameRate::FPS_30, Path::new("/tmp/out.mp4")).unwrap_err();
        assert!(matches!(err, MorphcutError::Encode(_)));
    }
}
