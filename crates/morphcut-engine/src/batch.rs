//! Batch runner: chains clips with a transition (or hard cut) between each
//! adjacent pair, encoding one concatenated output.
//!
//! Pairwise jobs run serialized because each job's output feeds the final
//! stitch. Parameter validation for every step happens before any decode or
//! render. By default the batch is all-or-nothing; best-effort mode instead
//! emits a truncated video up to the last successful pair and says so in
//! the report.

use crate::job::{CancelToken, JobPhase, ResizePolicy};
use crate::processor::{remove_partial_output, render_window};
use morphcut_core::{Frame, FrameRate, MorphcutError, Result};
use morphcut_effects::{Factory, ParamValues, Registry, Transition};
use morphcut_media::MediaService;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ordered clip chain with a step between each adjacent pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    pub clips: Vec<PathBuf>,
    /// One step per adjacent clip pair: `steps.len() == clips.len() - 1`.
    pub steps: Vec<BatchStep>,
    /// Output frame rate. Defaults to the first clip's decoded rate.
    #[serde(default)]
    pub fps: Option<FrameRate>,
}

/// What happens between two adjacent clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchStep {
    /// Hard cut: zero transition frames.
    Cut,
    Transition {
        effect: String,
        #[serde(default)]
        params: Map<String, Value>,
        duration_seconds: f64,
    },
}

/// Failure policy for the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Any pairwise failure fails the batch; no output is written.
    #[default]
    AllOrNothing,
    /// Emit a truncated video up to the last successful pair.
    BestEffort,
}

/// Summary of a finished batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub output: PathBuf,
    pub pairs_completed: usize,
    pub total_pairs: usize,
    /// True when best-effort mode dropped trailing pairs.
    pub truncated: bool,
    pub total_frames: usize,
    pub fps: FrameRate,
}

pub struct BatchRunner<'a> {
    registry: &'a Registry,
    media: &'a dyn MediaService,
    pool: &'a rayon::ThreadPool,
    resize_policy: ResizePolicy,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        registry: &'a Registry,
        media: &'a dyn MediaService,
        pool: &'a rayon::ThreadPool,
        resize_policy: ResizePolicy,
    ) -> Self {
        Self {
            registry,
            media,
            pool,
            resize_policy,
        }
    }

    /// Consume a plan and produce one concatenated video.
    pub fn run(
        &self,
        plan: &BatchPlan,
        output: &Path,
        mode: BatchMode,
        cancel: &CancelToken,
    ) -> Result<BatchReport> {
        match self.run_inner(plan, output, mode, cancel) {
            Ok(report) => Ok(report),
            Err(e) => {
                warn!(phase = %JobPhase::Failed, "batch: {e}");
                remove_partial_output(output);
                Err(e)
            }
        }
    }

    fn run_inner(
        &self,
        plan: &BatchPlan,
        output: &Path,
        mode: BatchMode,
        cancel: &CancelToken,
    ) -> Result<BatchReport> {
        if plan.clips.is_empty() {
            return Err(MorphcutError::Validation("batch plan has no clips".into()));
        }
        if plan.steps.len() + 1 != plan.clips.len() {
            return Err(MorphcutError::Validation(format!(
                "batch plan needs exactly one step per adjacent pair: {} clips, {} steps",
                plan.clips.len(),
                plan.steps.len()
            )));
        }
        let total_pairs = plan.steps.len();
        info!(
            "batch: {} clips, {} pairs -> {}",
            plan.clips.len(),
            total_pairs,
            output.display()
        );

        // Validate every step up front; a bad effect name or parameter
        // fails the whole batch before any decode, in either mode.
        let mut builds: Vec<Option<(Arc<dyn Transition>, ParamValues)>> = Vec::new();
        for (pair, step) in plan.steps.iter().enumerate() {
            builds.push(match step {
                BatchStep::Cut => None,
                BatchStep::Transition { effect, params, .. } => {
                    Some(Factory::build(self.registry, effect, params).map_err(|e| {
                        MorphcutError::Batch {
                            pair,
                            reason: e.to_string(),
                        }
                    })?)
                }
            });
        }

        // Load every clip. In best-effort mode a failed decode truncates
        // the chain to the clips before it.
        let mut clips: Vec<Vec<Frame>> = Vec::new();
        let mut fps = plan.fps;
        let mut truncated = false;
        for (index, path) in plan.clips.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(MorphcutError::Cancelled);
            }
            let decoded = self.media.decode(path).and_then(|clip| {
                if clip.frames.is_empty() {
                    Err(MorphcutError::Decode(format!(
                        "{}: no video frames found",
                        path.display()
                    )))
                } else {
                    Ok(clip)
                }
            });
            match decoded {
                Ok(clip) => {
                    fps = fps.or(Some(clip.fps));
                    clips.push(clip.frames);
                }
                Err(e) => match mode {
                    BatchMode::BestEffort if index > 0 => {
                        warn!("batch: truncating at clip {index}: {e}");
                        truncated = true;
                        break;
                    }
                    _ => {
                        return Err(MorphcutError::Batch {
                            pair: index.saturating_sub(1),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }
        let fps = fps.unwrap_or_default();
        let usable_pairs = clips.len() - 1;

        // One resolution for the whole timeline.
        let mut target = {
            let first = &clips[0][0];
            (first.width, first.height)
        };
        for clip in &clips[1..] {
            if let Some(first) = clip.first() {
                target = self.resize_policy.combine(target, (first.width, first.height));
            }
        }
        for clip in clips.iter_mut() {
            self.resize_policy.apply(clip, target);
        }

        // Frame windows per pair, clamped to what the clips can donate.
        let mut windows_len = vec![0usize; usable_pairs];
        for (pair, step) in plan.steps.iter().take(usable_pairs).enumerate() {
            if let BatchStep::Transition {
                duration_seconds, ..
            } = step
            {
                windows_len[pair] = fps
                    .frames_for_duration(*duration_seconds)
                    .min(clips[pair].len())
                    .min(clips[pair + 1].len());
            }
        }
        // A middle clip must cover both its neighbors' windows; claiming
        // the same frames twice would double-play them.
        for index in 1..usable_pairs {
            if windows_len[index - 1] + windows_len[index] > clips[index].len() {
                return Err(MorphcutError::Batch {
                    pair: index,
                    reason: format!(
                        "clip {index} is too short ({} frames) for adjacent transition windows {} + {}",
                        clips[index].len(),
                        windows_len[index - 1],
                        windows_len[index],
                    ),
                });
            }
        }

        // Render each pair's window in plan order.
        let mut windows: Vec<Vec<Frame>> = Vec::new();
        for pair in 0..usable_pairs {
            if cancel.is_cancelled() {
                return Err(MorphcutError::Cancelled);
            }
            let count = windows_len[pair];
            let rendered = match &builds[pair] {
                None => Vec::new(),
                Some((effect, values)) => {
                    let left = &clips[pair];
                    let window_a = &left[left.len() - count..];
                    let window_b = &clips[pair + 1][..count];
                    debug!("batch: rendering pair {pair} ({count} frames)");
                    let result = self.pool.install(|| {
                        render_window(effect.as_ref(), values, window_a, window_b, cancel)
                    });
                    match result {
                        Ok(frames) => frames,
                        Err(MorphcutError::Cancelled) => return Err(MorphcutError::Cancelled),
                        Err(e) => match mode {
                            BatchMode::BestEffort => {
                                warn!("batch: truncating at pair {pair}: {e}");
                                truncated = true;
                                break;
                            }
                            BatchMode::AllOrNothing => {
                                return Err(MorphcutError::Batch {
                                    pair,
                                    reason: e.to_string(),
                                });
                            }
                        },
                    }
                }
            };
            windows.push(rendered);
        }
        let completed = windows.len();

        // Stitch: each clip minus the frames its transitions consumed,
        // interleaved with the rendered windows, contiguous and gapless.
        let mut timeline: Vec<Frame> = Vec::new();
        for (index, clip) in clips.into_iter().take(completed + 1).enumerate() {
            let head_consumed = if index == 0 { 0 } else { windows_len[index - 1] };
            let tail_consumed = if index < completed {
                windows_len[index]
            } else {
                0
            };
            let end = clip.len() - tail_consumed;
            timeline.extend(clip.into_iter().take(end).skip(head_consumed));
            if index < completed {
                timeline.extend(windows[index].drain(..));
            }
        }
        let total_frames = timeline.len();

        if cancel.is_cancelled() {
            return Err(MorphcutError::Cancelled);
        }
        debug!(phase = %JobPhase::Encoding, "batch: {total_frames} frames");
        self.media.encode(&timeline, fps, output)?;

        info!(
            "batch done: {completed}/{total_pairs} pairs, {total_frames} frames -> {}",
            output.display()
        );
        Ok(BatchReport {
            output: output.to_path_buf(),
            pairs_completed: completed,
            total_pairs,
            truncated: truncated || completed < total_pairs,
            total_frames,
            fps,
        })
    }
}
