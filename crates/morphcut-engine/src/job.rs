//! Transition job description, normalization policy, identity and
//! cancellation primitives.

use morphcut_core::{Frame, FrameRate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// One request to blend two clips via one effect over a frame window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionJob {
    pub clip_a: PathBuf,
    pub clip_b: PathBuf,
    /// Registered effect name.
    pub effect: String,
    /// Raw effect parameters; validated by the factory before any work.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Transition length in seconds; converted to whole frames at the
    /// job's rate.
    pub duration_seconds: f64,
    /// Output frame rate. Defaults to clip A's decoded rate.
    #[serde(default)]
    pub fps: Option<FrameRate>,
    pub output: PathBuf,
}

/// How clips with differing resolutions are reconciled at job entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Scale everything down to the smallest participating resolution.
    #[default]
    Smallest,
    /// Scale everything up to the largest participating resolution.
    Largest,
    /// Scale everything to a fixed resolution.
    Exact { width: u32, height: u32 },
}

impl ResizePolicy {
    /// Fold a clip resolution into the current target.
    pub fn combine(self, target: (u32, u32), next: (u32, u32)) -> (u32, u32) {
        match self {
            ResizePolicy::Smallest => (target.0.min(next.0), target.1.min(next.1)),
            ResizePolicy::Largest => (target.0.max(next.0), target.1.max(next.1)),
            ResizePolicy::Exact { width, height } => (width, height),
        }
    }

    /// Resize a clip's frames in place to the target resolution.
    pub fn apply(self, frames: &mut Vec<Frame>, target: (u32, u32)) {
        let needs_resize = frames
            .first()
            .is_some_and(|f| (f.width, f.height) != target);
        if needs_resize {
            for frame in frames.iter_mut() {
                *frame = frame.resized(target.0, target.1);
            }
        }
    }
}

/// Unique job identity carried through logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short prefix is enough to correlate log lines.
        write!(f, "{}", &self.0.as_simple().to_string()[..8])
    }
}

/// Job lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Loading,
    Scheduling,
    Rendering,
    Stitching,
    Encoding,
    Done,
    Failed,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::Loading => "loading",
            JobPhase::Scheduling => "scheduling",
            JobPhase::Rendering => "rendering",
            JobPhase::Stitching => "stitching",
            JobPhase::Encoding => "encoding",
            JobPhase::Done => "done",
            JobPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Cooperative cancellation flag, checked at every frame boundary.
///
/// Cancellation after encoding has begun is best-effort; a job cancelled
/// mid-encode may leave a partial file behind for the caller to discard.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Summary of a finished transition job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub id: JobId,
    pub output: PathBuf,
    /// Total frames written: untouched head + transition + untouched tail.
    pub total_frames: usize,
    /// Frames rendered by the effect.
    pub transition_frames: usize,
    pub fps: FrameRate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_policy_combine() {
        let smallest = ResizePolicy::Smallest;
        assert_eq!(smallest.combine((640, 480), (320, 640)), (320, 480));

        let largest = ResizePolicy::Largest;
        assert_eq!(largest.combine((640, 480), (320, 640)), (640, 640));

        let exact = ResizePolicy::Exact {
            width: 100,
            height: 50,
        };
        assert_eq!(exact.combine((640, 480), (320, 640)), (100, 50));
    }

    #[test]
    fn test_resize_policy_apply() {
        let mut frames = vec![Frame::new(8, 8), Frame::new(8, 8)];
        ResizePolicy::Smallest.apply(&mut frames, (4, 4));
        assert!(frames.iter().all(|f| f.width == 4 && f.height == 4));
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
    }
}
