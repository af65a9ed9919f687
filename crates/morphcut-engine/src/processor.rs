//! The transition job processor.
//!
//! One job walks Loading → Scheduling → Rendering → Stitching → Encoding.
//! Parameter validation happens before anything else so bad input never
//! costs a decode. The per-frame render loop is data-parallel across frame
//! indices; output order is frame-index ascending regardless of worker
//! completion order. On failure the partial output file is removed.

use crate::job::{CancelToken, JobId, JobPhase, JobReport, ResizePolicy, TransitionJob};
use morphcut_core::{Frame, MorphcutError, Result};
use morphcut_effects::{Factory, FrameCtx, ParamValues, Registry, Transition};
use morphcut_media::MediaService;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct Processor<'a> {
    registry: &'a Registry,
    media: &'a dyn MediaService,
    pool: &'a rayon::ThreadPool,
    resize_policy: ResizePolicy,
}

impl<'a> Processor<'a> {
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

    /// Run one transition job to completion.
    pub fn run(&self, job: &TransitionJob, cancel: &CancelToken) -> Result<JobReport> {
        let id = JobId::new();
        info!(
            job = %id,
            "transition '{}': {} + {} -> {}",
            job.effect,
            job.clip_a.display(),
            job.clip_b.display(),
            job.output.display(),
        );
        match self.run_inner(&id, job, cancel) {
            Ok(report) => Ok(report),
            Err(e) => {
                warn!(job = %id, phase = %JobPhase::Failed, "{e}");
                remove_partial_output(&job.output);
                Err(e)
            }
        }
    }

    fn run_inner(
        &self,
        id: &JobId,
        job: &TransitionJob,
        cancel: &CancelToken,
    ) -> Result<JobReport> {
        // Fail fast: resolve the effect and validate parameters before any
        // decode or render work.
        let (effect, values) = Factory::build(self.registry, &job.effect, &job.params)?;
        if cancel.is_cancelled() {
            return Err(MorphcutError::Cancelled);
        }

        debug!(job = %id, phase = %JobPhase::Loading);
        let clip_a = self.media.decode(&job.clip_a)?;
        let clip_b = self.media.decode(&job.clip_b)?;
        let fps = job.fps.unwrap_or(clip_a.fps);

        let res_a = clip_a
            .resolution()
            .ok_or_else(|| MorphcutError::Decode("clip A has no frames".into()))?;
        let res_b = clip_b
            .resolution()
            .ok_or_else(|| MorphcutError::Decode("clip B has no frames".into()))?;
        let target = self.resize_policy.combine(res_a, res_b);
        let mut frames_a = clip_a.frames;
        let mut frames_b = clip_b.frames;
        self.resize_policy.apply(&mut frames_a, target);
        self.resize_policy.apply(&mut frames_b, target);

        debug!(job = %id, phase = %JobPhase::Scheduling);
        let window = fps
            .frames_for_duration(job.duration_seconds)
            .min(frames_a.len())
            .min(frames_b.len());

        // Untouched head of A, transition windows, untouched tail of B.
        let window_a = frames_a.split_off(frames_a.len() - window);
        let head = frames_a;
        let tail = frames_b.split_off(window);
        let window_b = frames_b;

        debug!(
            job = %id,
            phase = %JobPhase::Rendering,
            "{} head + {} transition + {} tail frames at {}",
            head.len(),
            window,
            tail.len(),
            fps,
        );
        let rendered = self.pool.install(|| {
            render_window(effect.as_ref(), &values, &window_a, &window_b, cancel)
        })?;

        debug!(job = %id, phase = %JobPhase::Stitching);
        let mut timeline = head;
        timeline.reserve(rendered.len() + tail.len());
        timeline.extend(rendered);
        timeline.extend(tail);
        let total_frames = timeline.len();

        if cancel.is_cancelled() {
            return Err(MorphcutError::Cancelled);
        }
        debug!(job = %id, phase = %JobPhase::Encoding);
        self.media.encode(&timeline, fps, &job.output)?;

        info!(job = %id, phase = %JobPhase::Done, "{total_frames} frames -> {}", job.output.display());
        Ok(JobReport {
            id: *id,
            output: job.output.clone(),
            total_frames,
            transition_frames: window,
            fps,
        })
    }
}

/// Render one transition window, data-parallel across frame indices.
///
/// Each worker renders a disjoint subset of indices; the ordered collect
/// guarantees ascending frame order in the result.
pub(crate) fn render_window(
    effect: &dyn Transition,
    values: &ParamValues,
    window_a: &[Frame],
    window_b: &[Frame],
    cancel: &CancelToken,
) -> Result<Vec<Frame>> {
    debug_assert_eq!(window_a.len(), window_b.len());
    let count = window_a.len();
    (0..count)
        .into_par_iter()
        .map(|index| {
            if cancel.is_cancelled() {
                return Err(MorphcutError::Cancelled);
            }
            let ctx = FrameCtx::new(index, count);
            effect.apply(&window_a[index], &window_b[index], &ctx, values)
        })
        .collect()
}

/// Best-effort cleanup so failed jobs leave no orphaned artifacts.
pub(crate) fn remove_partial_output(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("could not remove partial output {}: {e}", path.display());
        } else {
            debug!("removed partial output {}", path.display());
        }
    }
}
