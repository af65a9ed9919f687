//! MorphCut Engine - transition jobs from request to finished file
//!
//! Bundles the effect registry, a media service and a bounded worker pool
//! behind one invocation surface:
//! - `list_effects` / `effect_params` for discovery
//! - `apply_transition` for one pairwise job
//! - `apply_batch` for a clip chain

pub mod batch;
pub mod job;
pub mod processor;

pub use batch::{BatchMode, BatchPlan, BatchReport, BatchRunner, BatchStep};
pub use job::{CancelToken, JobId, JobPhase, JobReport, ResizePolicy, TransitionJob};
pub use processor::Processor;

use morphcut_core::{MorphcutError, Result};
use morphcut_effects::{EffectDescriptor, Registry};
use morphcut_media::{FfmpegMedia, MediaService};
use std::path::Path;

/// Engine-wide knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// How clips of differing resolutions are reconciled.
    pub resize_policy: ResizePolicy,
    /// Render workers; defaults to the number of CPU cores.
    pub worker_threads: Option<usize>,
}

/// The transition engine: registry + media service + worker pool.
///
/// The registry is built once and read-only afterward; an `Engine` shared
/// by reference can serve any number of concurrent jobs.
pub struct Engine<M: MediaService> {
    registry: Registry,
    media: M,
    pool: rayon::ThreadPool,
    config: EngineConfig,
}

impl Engine<FfmpegMedia> {
    /// Engine with the built-in effects and the FFmpeg media service.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_media(FfmpegMedia, config)
    }
}

impl<M: MediaService> Engine<M> {
    /// Engine with the built-in effects and a caller-supplied media service.
    pub fn with_media(media: M, config: EngineConfig) -> Result<Self> {
        let threads = config.worker_threads.unwrap_or_else(num_cpus::get);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| MorphcutError::Internal(format!("worker pool: {e}")))?;
        Ok(Self {
            registry: Registry::builtin()?,
            media,
            pool,
            config,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// All registered effects with their parameter schemas, for discovery.
    pub fn list_effects(&self) -> Vec<&EffectDescriptor> {
        self.registry.descriptors()
    }

    /// Parameter schema of one effect.
    pub fn effect_params(&self, name: &str) -> Result<EffectDescriptor> {
        self.registry.lookup(name).map(|(d, _)| d.clone())
    }

    /// Run one transition job to completion.
    pub fn apply_transition(&self, job: &TransitionJob) -> Result<JobReport> {
        self.apply_transition_with_cancel(job, &CancelToken::new())
    }

    /// Run one transition job with cooperative cancellation.
    pub fn apply_transition_with_cancel(
        &self,
        job: &TransitionJob,
        cancel: &CancelToken,
    ) -> Result<JobReport> {
        Processor::new(&self.registry, &self.media, &self.pool, self.config.resize_policy)
            .run(job, cancel)
    }

    /// Run a batch plan into one concatenated output file.
    pub fn apply_batch(
        &self,
        plan: &BatchPlan,
        output: &Path,
        mode: BatchMode,
    ) -> Result<BatchReport> {
        self.apply_batch_with_cancel(plan, output, mode, &CancelToken::new())
    }

    pub fn apply_batch_with_cancel(
        &self,
        plan: &BatchPlan,
        output: &Path,
        mode: BatchMode,
        cancel: &CancelToken,
    ) -> Result<BatchReport> {
        BatchRunner::new(&self.registry, &self.media, &self.pool, self.config.resize_policy)
            .run(plan, output, mode, cancel)
    }
}
