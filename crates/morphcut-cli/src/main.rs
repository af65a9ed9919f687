//! MorphCut - video transition renderer
//!
//! Entry point: renders a single transition between two clips, runs a
//! batch plan, or lists the available effects.

use anyhow::{bail, Context, Result};
use morphcut_core::FrameRate;
use morphcut_engine::{BatchMode, BatchPlan, Engine, EngineConfig, TransitionJob};
use serde_json::{Map, Value};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "usage:
  morphcut effects
  morphcut transition <clip_a> <clip_b> <effect> <output> [duration_s] [fps] [name=value ...]
  morphcut batch <plan.json> <output> [--best-effort]";

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    morphcut_media::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("effects") => list_effects(),
        Some("transition") => run_transition(&args[1..]),
        Some("batch") => run_batch(&args[1..]),
        _ => bail!("{USAGE}"),
    }
}

fn engine() -> Result<Engine<morphcut_media::FfmpegMedia>> {
    Ok(Engine::new(EngineConfig::default())?)
}

fn list_effects() -> Result<()> {
    let engine = engine()?;
    let listing = serde_json::to_string_pretty(&engine.list_effects())?;
    println!("{listing}");
    Ok(())
}

fn run_transition(args: &[String]) -> Result<()> {
    let [clip_a, clip_b, effect, output, rest @ ..] = args else {
        bail!("{USAGE}");
    };

    let mut rest = rest.iter().peekable();
    let duration_seconds = match rest.peek() {
        Some(arg) if !arg.contains('=') => {
            let value = arg.parse::<f64>().context("bad duration")?;
            rest.next();
            value
        }
        _ => 1.0,
    };
    let fps = match rest.peek() {
        Some(arg) if !arg.contains('=') => {
            let value = arg.parse::<u32>().context("bad fps")?;
            rest.next();
            Some(FrameRate::from_fps(value))
        }
        _ => None,
    };
    // Remaining arguments are effect parameters as name=value; the factory
    // coerces the string values to their declared kinds.
    let mut params = Map::new();
    for arg in rest {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("expected name=value, got '{arg}'");
        };
        params.insert(name.to_string(), Value::String(value.to_string()));
    }

    let job = TransitionJob {
        clip_a: clip_a.into(),
        clip_b: clip_b.into(),
        effect: effect.clone(),
        params,
        duration_seconds,
        fps,
        output: output.into(),
    };
    let report = engine()?.apply_transition(&job)?;
    info!(
        "wrote {} ({} frames, {} in transition)",
        report.output.display(),
        report.total_frames,
        report.transition_frames,
    );
    Ok(())
}

fn run_batch(args: &[String]) -> Result<()> {
    let [plan_path, output, flags @ ..] = args else {
        bail!("{USAGE}");
    };
    let mode = match flags {
        [] => BatchMode::AllOrNothing,
        [flag] if flag == "--best-effort" => BatchMode::BestEffort,
        _ => bail!("{USAGE}"),
    };

    let plan_json = std::fs::read_to_string(plan_path)
        .with_context(|| format!("reading plan {plan_path}"))?;
    let plan: BatchPlan =
        serde_json::from_str(&plan_json).with_context(|| format!("parsing plan {plan_path}"))?;

    let report = engine()?.apply_batch(&plan, output.as_ref(), mode)?;
    if report.truncated {
        info!(
            "wrote truncated {} ({}/{} pairs, {} frames)",
            report.output.display(),
            report.pairs_completed,
            report.total_pairs,
            report.total_frames,
        );
    } else {
        info!(
            "wrote {} ({} pairs, {} frames)",
            report.output.display(),
            report.pairs_completed,
            report.total_frames,
        );
    }
    Ok(())
}
