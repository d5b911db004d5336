//! Infer the bounce timeline for a match result.

use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;
use rallytrace_common::AppConfig;
use rallytrace_event_inference::{EventInferenceEngine, InferenceConfig};
use rallytrace_match_model::{serialize_bounces, MatchResult};

/// How the inferred timeline is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The input match result with `bounces` replaced by the timeline.
    Json,
    /// One bounce event per line.
    Jsonl,
}

pub struct InferArgs {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_swing_bounces: bool,
    pub no_trajectory: bool,
    pub audio: bool,
    pub midline: Option<f64>,
    pub format: OutputFormat,
}

pub fn run(app_config: &AppConfig, args: InferArgs) -> anyhow::Result<()> {
    let mut result = MatchResult::load(&args.path)
        .with_context(|| format!("Failed to load match result: {}", args.path.display()))?;

    for issue in result.validate() {
        tracing::warn!("{issue}");
    }
    if !result.samples_are_ordered() {
        tracing::warn!("sorting ball samples by timestamp");
        result.sort_samples();
    }

    let config = build_config(app_config, &args)?;
    let engine = EventInferenceEngine::new(config);
    let (events, report) = engine.infer_match(&result);

    let rendered = match args.format {
        OutputFormat::Jsonl => serialize_bounces(&events)?,
        OutputFormat::Json => {
            result.bounces = events;
            result.stamp_generated();
            serde_json::to_string_pretty(&result)?
        }
    };

    match &args.output {
        Some(output) => {
            std::fs::write(output, rendered)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(path = %output.display(), "timeline written");
        }
        None => println!("{}", rendered.trim_end()),
    }

    // Keep stdout clean for piping; the summary goes to stderr.
    eprintln!("Inference complete for '{}':", result.match_id);
    eprintln!("  Authoritative: {}", report.authoritative);
    eprintln!(
        "  Swing bounces: {} ({} swing(s) without measured speed)",
        report.synthesized, report.skipped_unmeasured_swings
    );
    eprintln!(
        "  Trajectory bounces: {} (velocity: {}, angle: {})",
        report.detected(),
        report.detected_by_velocity,
        report.detected_by_angle
    );
    eprintln!("  Reclassified as inferred swing: {}", report.reclassified);
    eprintln!("  Total events: {}", report.total);

    Ok(())
}

/// Engine configuration from `--config` or app defaults, with flags applied last.
fn build_config(app_config: &AppConfig, args: &InferArgs) -> anyhow::Result<InferenceConfig> {
    let mut config = match &args.config {
        Some(path) => InferenceConfig::from_json_file(path)
            .with_context(|| format!("Failed to load engine config: {}", path.display()))?,
        None => InferenceConfig::from_defaults(&app_config.detection),
    };

    if args.no_swing_bounces {
        config.toggles.synthesize_swing_bounces = false;
    }
    if args.no_trajectory {
        config.toggles.detect_trajectory_bounces = false;
    }
    if args.audio {
        config.toggles.detect_audio_bounces = true;
    }
    if let Some(midline) = args.midline {
        config.midline_y = midline;
    }

    config.validate()?;
    Ok(config)
}
