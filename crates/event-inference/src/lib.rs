//! Rallytrace Event Inference
//!
//! Derives a reconciled bounce timeline for a recorded rally:
//! - **Swing synthesis:** Place measured swing contacts on the ball trajectory
//! - **Trajectory detection:** Find floor and side-wall bounces in the samples
//! - **Merge:** Combine upstream and derived events in time order
//! - **Reclassification:** Relabel bounces that would have the ball cross the
//!   net without a hit
//!
//! This crate is pure computation: no I/O, no shared state.
//! All inputs are data; all outputs are data.

pub mod config;
pub mod geometry;
pub mod merge;
pub mod reclassify;
pub mod synthesizer;
pub mod trajectory;

pub use config::{DetectorToggles, InferenceConfig, SwingThresholds, TrajectoryThresholds};
pub use trajectory::{DetectionMethod, TrajectoryDetector};

use rallytrace_match_model::{BallSample, BounceEvent, BounceKind, MatchResult, SwingEvent};

use crate::trajectory::Detection;

/// Counts describing one inference run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceReport {
    /// Upstream events passed through.
    pub authoritative: usize,
    /// `swing` events placed on the trajectory.
    pub synthesized: usize,
    /// Swings skipped because no ball speed was measured.
    pub skipped_unmeasured_swings: usize,
    /// Trajectory bounces found by the velocity test.
    pub detected_by_velocity: usize,
    /// Trajectory bounces found by the angle fallback.
    pub detected_by_angle: usize,
    /// Trajectory bounces relabelled as `inferred_swing`.
    pub reclassified: usize,
    /// Events in the final timeline.
    pub total: usize,
}

impl InferenceReport {
    /// All trajectory bounces, before reclassification.
    pub fn detected(&self) -> usize {
        self.detected_by_velocity + self.detected_by_angle
    }
}

/// Infer the full bounce timeline.
///
/// `samples` must be sorted by timestamp; they are never reordered here.
/// Only entries of kind `authoritative` in `authoritative` are used as upstream
/// events. Deterministic for identical inputs.
pub fn infer_events(
    samples: &[BallSample],
    swings: &[SwingEvent],
    authoritative: &[BounceEvent],
    config: &InferenceConfig,
) -> Vec<BounceEvent> {
    infer_events_with_report(samples, swings, authoritative, config).0
}

/// Like [`infer_events`], also returning per-stage counts.
pub fn infer_events_with_report(
    samples: &[BallSample],
    swings: &[SwingEvent],
    authoritative: &[BounceEvent],
    config: &InferenceConfig,
) -> (Vec<BounceEvent>, InferenceReport) {
    let toggles = config.toggles;
    let upstream: Vec<BounceEvent> = authoritative
        .iter()
        .filter(|e| e.kind == BounceKind::Authoritative)
        .copied()
        .collect();

    let mut report = InferenceReport {
        authoritative: upstream.len(),
        ..Default::default()
    };

    let synthesized = if toggles.synthesize_swing_bounces {
        report.skipped_unmeasured_swings =
            swings.iter().filter(|s| !s.has_measured_speed()).count();
        synthesizer::synthesize_swing_bounces(samples, swings, &upstream, &config.swing)
    } else {
        Vec::new()
    };
    report.synthesized = synthesized.len();

    let detections: Vec<Detection> = if toggles.detect_trajectory_bounces {
        let known: Vec<f64> = upstream
            .iter()
            .chain(&synthesized)
            .map(|e| e.timestamp)
            .collect();
        TrajectoryDetector::new(config.trajectory).detect_with_diagnostics(samples, &known)
    } else {
        Vec::new()
    };
    for detection in &detections {
        match detection.method {
            DetectionMethod::VelocityReversal => report.detected_by_velocity += 1,
            DetectionMethod::SharpAngle => report.detected_by_angle += 1,
        }
    }
    let detected: Vec<BounceEvent> = detections.iter().map(|d| d.event).collect();

    if toggles.detect_audio_bounces {
        tracing::warn!("audio bounce detection requested but no audio onset source is available");
    }

    let merged = merge::merge_events([&upstream[..], &synthesized[..], &detected[..]]);
    let timeline = reclassify::reclassify(&merged, swings, config.midline_y);

    report.reclassified = reclassify::count_relabelled(&merged, &timeline);
    report.total = timeline.len();

    tracing::debug!(
        authoritative = report.authoritative,
        synthesized = report.synthesized,
        detected = report.detected(),
        reclassified = report.reclassified,
        total = report.total,
        "event inference complete"
    );

    (timeline, report)
}

/// Inference engine bound to one configuration.
pub struct EventInferenceEngine {
    config: InferenceConfig,
}

impl EventInferenceEngine {
    /// Create a new engine with the given configuration.
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(InferenceConfig::default())
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn infer(
        &self,
        samples: &[BallSample],
        swings: &[SwingEvent],
        authoritative: &[BounceEvent],
    ) -> (Vec<BounceEvent>, InferenceReport) {
        infer_events_with_report(samples, swings, authoritative, &self.config)
    }

    /// Run on a loaded match result, using its authoritative bounces.
    pub fn infer_match(&self, result: &MatchResult) -> (Vec<BounceEvent>, InferenceReport) {
        self.infer(&result.ball_samples, &result.swings, &result.bounces)
    }
}
