//! Match-result bundle.
//!
//! A match result is the single JSON document the upstream analysis
//! produces for one recorded rally set: ball samples, swing detections,
//! and whatever bounce events were already known. The inference engine
//! reads the first three and writes its reconciled timeline back into
//! `bounces`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bounce::{BounceEvent, BounceKind};
use crate::sample::{BallSample, SwingEvent};

/// Current on-disk schema version.
pub const MATCH_RESULT_VERSION: &str = "1.0";

/// Top-level match-result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Identifier assigned by the upstream pipeline.
    #[serde(default)]
    pub match_id: String,

    /// When the bounce timeline was last generated (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    /// Ball positions, expected in ascending timestamp order.
    #[serde(default)]
    pub ball_samples: Vec<BallSample>,

    /// Detected swings.
    #[serde(default)]
    pub swings: Vec<SwingEvent>,

    /// Known bounce events. On input these are the upstream authoritative
    /// events; after inference this is the full reconciled timeline.
    #[serde(default)]
    pub bounces: Vec<BounceEvent>,
}

fn default_version() -> String {
    MATCH_RESULT_VERSION.to_string()
}

impl MatchResult {
    /// Create an empty match result.
    pub fn new(match_id: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            match_id: match_id.into(),
            generated_at: None,
            ball_samples: vec![],
            swings: vec![],
            bounces: vec![],
        }
    }

    /// Load a match result from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MatchResultError> {
        let path = path.as_ref().to_path_buf();

        let json = std::fs::read_to_string(&path).map_err(|e| MatchResultError::IoError {
            path: path.clone(),
            source: e,
        })?;

        serde_json::from_str(&json).map_err(|e| MatchResultError::ParseError { path, source: e })
    }

    /// Save the match result as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MatchResultError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| MatchResultError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| MatchResultError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| MatchResultError::IoError { path, source: e })
    }

    /// Record the current wall-clock time as the generation time.
    pub fn stamp_generated(&mut self) {
        self.generated_at = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Bounce events that came from the upstream pipeline.
    pub fn authoritative_bounces(&self) -> Vec<BounceEvent> {
        self.bounces
            .iter()
            .filter(|b| b.kind == BounceKind::Authoritative)
            .copied()
            .collect()
    }

    /// Stable-sort samples by timestamp.
    ///
    /// The inference engine never reorders samples itself; call this at
    /// the boundary when the upstream ordering is not trusted.
    pub fn sort_samples(&mut self) {
        self.ball_samples
            .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    }

    /// Whether sample timestamps are non-decreasing.
    pub fn samples_are_ordered(&self) -> bool {
        self.ball_samples
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    /// Time span covered by the samples, in seconds.
    pub fn sample_span_secs(&self) -> f64 {
        match (self.ball_samples.first(), self.ball_samples.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).max(0.0),
            _ => 0.0,
        }
    }

    /// Check the bundle against the engine's input preconditions.
    ///
    /// Returns human-readable issues; an empty list means the bundle is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = vec![];

        for (i, sample) in self.ball_samples.iter().enumerate() {
            if !sample.timestamp.is_finite() {
                issues.push(format!("Sample {i} has a non-finite timestamp"));
            }
            if !sample.position().is_in_frame() {
                issues.push(format!(
                    "Sample {i} at t={:.3}s lies outside the frame: ({}, {})",
                    sample.timestamp, sample.x, sample.y
                ));
            }
        }

        if let Some(i) = self
            .ball_samples
            .windows(2)
            .position(|w| w[1].timestamp < w[0].timestamp)
        {
            issues.push(format!(
                "Samples are not ordered by timestamp (first regression at index {})",
                i + 1
            ));
        }

        for (i, swing) in self.swings.iter().enumerate() {
            if !swing.hit_timestamp.is_finite() {
                issues.push(format!("Swing {i} has a non-finite hit timestamp"));
            }
            if swing.ball_speed < 0.0 || !swing.ball_speed.is_finite() {
                issues.push(format!(
                    "Swing {i} has an invalid ball speed: {}",
                    swing.ball_speed
                ));
            }
        }

        for (i, bounce) in self.bounces.iter().enumerate() {
            if !bounce.timestamp.is_finite() {
                issues.push(format!("Bounce {i} has a non-finite timestamp"));
            }
            if !bounce.position.is_in_frame() {
                issues.push(format!(
                    "Bounce {i} ({}) lies outside the frame: ({}, {})",
                    bounce.kind, bounce.position.x, bounce.position.y
                ));
            }
        }

        issues
    }
}

/// Errors that can occur when reading or writing match results.
#[derive(Debug, thiserror::Error)]
pub enum MatchResultError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}
