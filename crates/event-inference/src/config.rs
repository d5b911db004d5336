//! Detector switches and tuning thresholds.
//!
//! Every threshold here is an empirically chosen default, not a physical
//! constant. All of them can be overridden from a JSON file.

use std::path::Path;

use rallytrace_common::{DetectionDefaults, RallyError, RallyResult};
use serde::{Deserialize, Serialize};

/// Independent on/off switches for each detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorToggles {
    /// Emit `swing` bounces at swing contacts with a measured ball speed.
    pub synthesize_swing_bounces: bool,

    /// Scan the trajectory for `floor` and `wall` bounces.
    pub detect_trajectory_bounces: bool,

    /// Reserved. Accepted but inert until an audio onset source exists.
    pub detect_audio_bounces: bool,
}

impl Default for DetectorToggles {
    fn default() -> Self {
        Self {
            synthesize_swing_bounces: true,
            detect_trajectory_bounces: true,
            detect_audio_bounces: false,
        }
    }
}

/// Thresholds for placing swing contacts on the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingThresholds {
    /// A swing within this many seconds of a known event is not re-synthesized.
    pub duplicate_window_secs: f64,

    /// Maximum gap between hit time and the matched sample.
    pub match_tolerance_secs: f64,

    /// Stop scanning once samples are this far past the hit.
    pub search_horizon_secs: f64,
}

impl Default for SwingThresholds {
    fn default() -> Self {
        Self {
            duplicate_window_secs: 0.15,
            match_tolerance_secs: 0.15,
            search_horizon_secs: 0.2,
        }
    }
}

/// Thresholds for trajectory bounce classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryThresholds {
    /// Candidates within this many seconds of a known event are skipped.
    pub known_event_window_secs: f64,

    /// Minimum downward velocity before a floor bounce (units/s).
    pub floor_velocity: f64,

    /// Fraction of `floor_velocity` the upward velocity must exceed after it.
    pub floor_reversal_fraction: f64,

    /// Floor bounces must satisfy `floor_y_min < y < floor_y_max`.
    pub floor_y_min: f64,
    pub floor_y_max: f64,

    /// Minimum horizontal speed before a wall bounce (units/s).
    pub wall_velocity: f64,

    /// Fraction of `wall_velocity` the reversed speed must exceed.
    pub wall_reversal_fraction: f64,

    /// Wall bounces happen at `x < wall_x_min` or `x > wall_x_max`.
    pub wall_x_min: f64,
    pub wall_x_max: f64,

    /// Direction change (degrees) that counts as a bounce when the
    /// velocity tests do not fire.
    pub sharp_angle_deg: f64,

    /// Samples skipped after a detection.
    pub cooldown_samples: usize,

    /// Two detections closer than this are treated as one bounce when
    /// their positions are also close.
    pub min_separation_secs: f64,

    /// Per-axis distance under which two detections are at the same spot.
    pub duplicate_position_tolerance: f64,
}

impl Default for TrajectoryThresholds {
    fn default() -> Self {
        Self {
            known_event_window_secs: 0.2,
            floor_velocity: 0.5,
            floor_reversal_fraction: 0.3,
            floor_y_min: 0.1,
            floor_y_max: 0.95,
            wall_velocity: 0.3,
            wall_reversal_fraction: 0.5,
            wall_x_min: 0.15,
            wall_x_max: 0.85,
            sharp_angle_deg: 55.0,
            cooldown_samples: 3,
            min_separation_secs: 0.15,
            duplicate_position_tolerance: 0.1,
        }
    }
}

impl TrajectoryThresholds {
    /// Whether `x` lies in one of the side-wall bands.
    pub fn is_near_side_wall(&self, x: f64) -> bool {
        x < self.wall_x_min || x > self.wall_x_max
    }

    /// Whether `y` lies in the band where floor bounces are plausible.
    pub fn is_floor_band(&self, y: f64) -> bool {
        y > self.floor_y_min && y < self.floor_y_max
    }
}

/// Full configuration for one inference run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub toggles: DetectorToggles,

    /// Normalized y-coordinate of the net after upstream rectification.
    pub midline_y: f64,

    pub swing: SwingThresholds,

    pub trajectory: TrajectoryThresholds,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            toggles: DetectorToggles::default(),
            midline_y: 0.5,
            swing: SwingThresholds::default(),
            trajectory: TrajectoryThresholds::default(),
        }
    }
}

impl InferenceConfig {
    /// Default thresholds with switches and midline taken from app config.
    pub fn from_defaults(defaults: &DetectionDefaults) -> Self {
        Self {
            toggles: DetectorToggles {
                synthesize_swing_bounces: defaults.synthesize_swing_bounces,
                detect_trajectory_bounces: defaults.detect_trajectory_bounces,
                detect_audio_bounces: defaults.detect_audio_bounces,
            },
            midline_y: defaults.midline_y,
            ..Self::default()
        }
    }

    /// Load a configuration from JSON. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> RallyResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RallyError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the detectors cannot work with.
    pub fn validate(&self) -> RallyResult<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        let fraction = |v: f64| v.is_finite() && v > 0.0 && v <= 1.0;

        if !(self.midline_y.is_finite() && self.midline_y > 0.0 && self.midline_y < 1.0) {
            return Err(RallyError::config(format!(
                "midline_y must be inside (0, 1), got {}",
                self.midline_y
            )));
        }

        let s = &self.swing;
        for (name, value) in [
            ("swing.duplicate_window_secs", s.duplicate_window_secs),
            ("swing.match_tolerance_secs", s.match_tolerance_secs),
            ("swing.search_horizon_secs", s.search_horizon_secs),
        ] {
            if !non_negative(value) {
                return Err(RallyError::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let t = &self.trajectory;
        for (name, value) in [
            ("trajectory.known_event_window_secs", t.known_event_window_secs),
            ("trajectory.floor_velocity", t.floor_velocity),
            ("trajectory.wall_velocity", t.wall_velocity),
            ("trajectory.min_separation_secs", t.min_separation_secs),
            (
                "trajectory.duplicate_position_tolerance",
                t.duplicate_position_tolerance,
            ),
        ] {
            if !non_negative(value) {
                return Err(RallyError::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("trajectory.floor_reversal_fraction", t.floor_reversal_fraction),
            ("trajectory.wall_reversal_fraction", t.wall_reversal_fraction),
        ] {
            if !fraction(value) {
                return Err(RallyError::config(format!(
                    "{name} must be inside (0, 1], got {value}"
                )));
            }
        }

        for (name, lo, hi) in [
            ("floor band", t.floor_y_min, t.floor_y_max),
            ("wall bands", t.wall_x_min, t.wall_x_max),
        ] {
            if !(in_unit(lo) && in_unit(hi) && lo < hi) {
                return Err(RallyError::config(format!(
                    "{name} must satisfy 0 <= min < max <= 1, got [{lo}, {hi}]"
                )));
            }
        }

        if !(t.sharp_angle_deg.is_finite() && (0.0..=180.0).contains(&t.sharp_angle_deg)) {
            return Err(RallyError::config(format!(
                "trajectory.sharp_angle_deg must be inside [0, 180], got {}",
                t.sharp_angle_deg
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(InferenceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_audio_detection_off_by_default() {
        assert!(!InferenceConfig::default().toggles.detect_audio_bounces);
    }

    #[test]
    fn test_rejects_midline_on_frame_edge() {
        let config = InferenceConfig {
            midline_y: 1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("midline_y"));
    }

    #[test]
    fn test_rejects_inverted_wall_band() {
        let mut config = InferenceConfig::default();
        config.trajectory.wall_x_min = 0.9;
        config.trajectory.wall_x_max = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_reversal_fraction() {
        let mut config = InferenceConfig::default();
        config.trajectory.floor_reversal_fraction = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let raw = r#"{
            "midline_y": 0.42,
            "toggles": { "detect_trajectory_bounces": false },
            "trajectory": { "sharp_angle_deg": 70.0 }
        }"#;
        let config: InferenceConfig = serde_json::from_str(raw).unwrap();
        assert!((config.midline_y - 0.42).abs() < 1e-9);
        assert!(!config.toggles.detect_trajectory_bounces);
        assert!(config.toggles.synthesize_swing_bounces);
        assert!((config.trajectory.sharp_angle_deg - 70.0).abs() < 1e-9);
        assert!((config.trajectory.floor_velocity - 0.5).abs() < 1e-9);
        assert!((config.swing.match_tolerance_secs - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_from_json_file_missing_is_file_not_found() {
        let path = std::env::temp_dir().join("rallytrace_no_such_config.json");
        let err = InferenceConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, RallyError::FileNotFound { .. }));
    }

    #[test]
    fn test_from_json_file_validates() {
        let dir = std::env::temp_dir().join("rallytrace_test_inference_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("inference.json");
        std::fs::write(&path, r#"{ "midline_y": -0.5 }"#).unwrap();

        let err = InferenceConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, RallyError::Config { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_app_defaults() {
        let defaults = DetectionDefaults {
            synthesize_swing_bounces: false,
            midline_y: 0.47,
            ..Default::default()
        };
        let config = InferenceConfig::from_defaults(&defaults);
        assert!(!config.toggles.synthesize_swing_bounces);
        assert!(config.toggles.detect_trajectory_bounces);
        assert!((config.midline_y - 0.47).abs() < 1e-9);
    }
}
