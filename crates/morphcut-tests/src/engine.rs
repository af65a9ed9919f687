//! End-to-end engine scenarios against an in-memory media service.

use morphcut_core::{Frame, FrameRate, MorphcutError, Result};
use morphcut_engine::{BatchMode, BatchPlan, BatchStep, Engine, EngineConfig, TransitionJob};
use morphcut_media::{DecodedClip, MediaService};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

struct MemoryMedia {
    clips: HashMap<PathBuf, Vec<Frame>>,
    fps: FrameRate,
    encoded: Mutex<HashMap<PathBuf, (Vec<Frame>, FrameRate)>>,
}

impl MemoryMedia {
    fn new(fps: FrameRate) -> Self {
        Self {
            clips: HashMap::new(),
            fps,
            encoded: Mutex::new(HashMap::new()),
        }
    }

    fn with_clip(mut self, path: &str, frames: Vec<Frame>) -> Self {
        self.clips.insert(PathBuf::from(path), frames);
        self
    }

    fn encoded_file(&self, path: &str) -> Option<(Vec<Frame>, FrameRate)> {
        self.encoded.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl MediaService for MemoryMedia {
    fn decode(&self, path: &Path) -> Result<DecodedClip> {
        self.clips
            .get(path)
            .map(|frames| DecodedClip {
                frames: frames.clone(),
                fps: self.fps,
            })
            .ok_or_else(|| MorphcutError::Decode(format!("no such clip: {}", path.display())))
    }

    fn encode(&self, frames: &[Frame], fps: FrameRate, path: &Path) -> Result<()> {
        self.encoded
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), (frames.to_vec(), fps));
        Ok(())
    }
}

fn solid_clip(frames: usize, rgba: [u8; 4]) -> Vec<Frame> {
    (0..frames).map(|_| Frame::solid(100, 100, rgba)).collect()
}

fn engine(media: MemoryMedia) -> Engine<MemoryMedia> {
    Engine::with_media(
        media,
        EngineConfig {
            worker_threads: Some(2),
            ..Default::default()
        },
    )
    .unwrap()
}

/// Two 10-frame 100x100 clips, crossfade, 1 second at 10 fps: 10 rendered
/// frames, endpoints pixel-equal to the sources, midpoint half-blended.
#[test]
fn crossfade_end_to_end() {
    let media = MemoryMedia::new(FrameRate::from_fps(10))
        .with_clip("a.mp4", solid_clip(10, [200, 40, 0, 255]))
        .with_clip("b.mp4", solid_clip(10, [0, 40, 200, 255]));
    let engine = engine(media);

    let job = TransitionJob {
        clip_a: "a.mp4".into(),
        clip_b: "b.mp4".into(),
        effect: "crossfade".into(),
        params: Default::default(),
        duration_seconds: 1.0,
        fps: None,
        output: "out.mp4".into(),
    };
    let report = engine.apply_transition(&job).unwrap();
    assert_eq!(report.transition_frames, 10);
    assert_eq!(report.total_frames, 10);

    let (frames, fps) = engine.media().encoded_file("out.mp4").unwrap();
    assert_eq!(fps, FrameRate::from_fps(10));
    assert_eq!(frames.len(), 10);
    assert_eq!(frames[0].pixel(10, 10), [200, 40, 0, 255]);
    assert_eq!(frames[9].pixel(10, 10), [0, 40, 200, 255]);

    // Frames 4 and 5 straddle the midpoint: roughly 50/50 blends.
    for index in [4usize, 5] {
        let px = frames[index].pixel(10, 10);
        assert!(px[0] > 60 && px[0] < 140, "frame {index}: {px:?}");
        assert!(px[2] > 60 && px[2] < 140, "frame {index}: {px:?}");
    }
}

/// Three clips chained with crossfade + an invalid effect name: the batch
/// fails at pair 1 and writes nothing.
#[test]
fn batch_failure_reports_pair_index_and_writes_nothing() {
    let media = MemoryMedia::new(FrameRate::from_fps(10))
        .with_clip("a.mp4", solid_clip(10, [255, 0, 0, 255]))
        .with_clip("b.mp4", solid_clip(10, [0, 255, 0, 255]))
        .with_clip("c.mp4", solid_clip(10, [0, 0, 255, 255]));
    let engine = engine(media);

    let plan = BatchPlan {
        clips: vec!["a.mp4".into(), "b.mp4".into(), "c.mp4".into()],
        steps: vec![
            BatchStep::Transition {
                effect: "crossfade".into(),
                params: Default::default(),
                duration_seconds: 0.3,
            },
            BatchStep::Transition {
                effect: "definitely_not_registered".into(),
                params: Default::default(),
                duration_seconds: 0.3,
            },
        ],
        fps: None,
    };
    let err = engine
        .apply_batch(&plan, Path::new("chain.mp4"), BatchMode::AllOrNothing)
        .unwrap_err();
    assert!(matches!(err, MorphcutError::Batch { pair: 1, .. }));
    assert!(engine.media().encoded_file("chain.mp4").is_none());
}

/// A full three-clip chain with two different effects renders in plan
/// order with contiguous frame counts.
#[test]
fn batch_chain_with_two_effects() {
    let media = MemoryMedia::new(FrameRate::from_fps(10))
        .with_clip("a.mp4", solid_clip(10, [255, 0, 0, 255]))
        .with_clip("b.mp4", solid_clip(10, [0, 255, 0, 255]))
        .with_clip("c.mp4", solid_clip(10, [0, 0, 255, 255]));
    let engine = engine(media);

    let plan = BatchPlan {
        clips: vec!["a.mp4".into(), "b.mp4".into(), "c.mp4".into()],
        steps: vec![
            BatchStep::Transition {
                effect: "crossfade".into(),
                params: Default::default(),
                duration_seconds: 0.3,
            },
            BatchStep::Transition {
                effect: "blinds".into(),
                params: Default::default(),
                duration_seconds: 0.3,
            },
        ],
        fps: None,
    };
    let report = engine
        .apply_batch(&plan, Path::new("chain.mp4"), BatchMode::AllOrNothing)
        .unwrap();
    assert_eq!(report.pairs_completed, 2);
    assert!(!report.truncated);

    // 3-frame windows: (10-3) + 3 + (10-6) + 3 + (10-3) = 24 frames.
    assert_eq!(report.total_frames, 24);
    let (frames, _) = engine.media().encoded_file("chain.mp4").unwrap();
    assert_eq!(frames[0].pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(frames[23].pixel(0, 0), [0, 0, 255, 255]);
}

/// Parameters flow from raw JSON through the factory into the render.
#[test]
fn effect_params_reach_the_render() {
    let media = MemoryMedia::new(FrameRate::from_fps(10))
        .with_clip("a.mp4", solid_clip(6, [250, 250, 250, 255]))
        .with_clip("b.mp4", solid_clip(6, [10, 10, 10, 255]));
    let engine = engine(media);

    let params = serde_json::json!({"mode": "fade_to_black"})
        .as_object()
        .cloned()
        .unwrap();
    let job = TransitionJob {
        clip_a: "a.mp4".into(),
        clip_b: "b.mp4".into(),
        effect: "crossfade".into(),
        params,
        duration_seconds: 0.6,
        fps: None,
        output: "fade.mp4".into(),
    };
    engine.apply_transition(&job).unwrap();

    let (frames, _) = engine.media().encoded_file("fade.mp4").unwrap();
    // Midpoint of a fade-through-black is black, which a plain crossfade
    // of these sources never produces.
    let mid = frames[3].pixel(50, 50);
    assert!(mid[0] < 60, "expected near-black midpoint, got {mid:?}");
}

/// Best-effort mode truncates at the failing clip instead of failing.
#[test]
fn batch_best_effort_truncates() {
    let media = MemoryMedia::new(FrameRate::from_fps(10))
        .with_clip("a.mp4", solid_clip(10, [255, 0, 0, 255]))
        .with_clip("b.mp4", solid_clip(10, [0, 255, 0, 255]));
    let engine = engine(media);

    let plan = BatchPlan {
        clips: vec!["a.mp4".into(), "b.mp4".into(), "missing.mp4".into()],
        steps: vec![
            BatchStep::Transition {
                effect: "crossfade".into(),
                params: Default::default(),
                duration_seconds: 0.3,
            },
            BatchStep::Cut,
        ],
        fps: None,
    };
    let report = engine
        .apply_batch(&plan, Path::new("partial.mp4"), BatchMode::BestEffort)
        .unwrap();
    assert!(report.truncated);
    assert_eq!(report.pairs_completed, 1);
    // a (7) + window (3) + b (7): the missing clip contributed nothing.
    assert_eq!(report.total_frames, 17);
}
