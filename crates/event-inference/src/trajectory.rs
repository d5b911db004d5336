//! Trajectory anomaly detection: floor and side-wall bounces.
//!
//! # Algorithm
//!
//! For every interior sample `i` (with two samples of context on each side):
//!
//! 1. **Skip** samples close in time to an event another detector already found.
//! 2. **Velocity test:** a downward-then-upward y velocity inside the floor band
//!    is a floor bounce; a horizontal reversal inside a side band is a wall bounce.
//! 3. **Angle fallback:** when the velocity test is silent, a direction change
//!    sharper than the configured angle is a bounce, classified by position.
//! 4. **Cooldown:** after a detection the next few samples are consumed so one
//!    physical bounce is not reported from adjacent samples.

use rallytrace_match_model::{BallSample, BounceEvent, BounceKind, Position};

use crate::config::TrajectoryThresholds;
use crate::geometry::{angle_between, Vec2};

/// Which test classified a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Per-axis velocity reversal.
    VelocityReversal,
    /// Sharp direction change over the three-sample window.
    SharpAngle,
}

/// A trajectory bounce together with where and how it was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Index of the bounce sample in the input.
    pub index: usize,
    pub method: DetectionMethod,
    pub event: BounceEvent,
}

/// Per-axis velocity in normalized units per second.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f64,
    y: f64,
}

impl Velocity {
    /// Velocity from `a` to `b`. Zero when the samples are not strictly ordered.
    fn between(a: &BallSample, b: &BallSample) -> Self {
        let dt = b.timestamp - a.timestamp;
        if dt <= 0.0 || !dt.is_finite() {
            return Self { x: 0.0, y: 0.0 };
        }
        Self {
            x: (b.x - a.x) / dt,
            y: (b.y - a.y) / dt,
        }
    }
}

/// Scans a ball trajectory for floor and wall bounces.
pub struct TrajectoryDetector {
    thresholds: TrajectoryThresholds,
}

impl TrajectoryDetector {
    pub fn new(thresholds: TrajectoryThresholds) -> Self {
        Self { thresholds }
    }

    pub fn with_defaults() -> Self {
        Self::new(TrajectoryThresholds::default())
    }

    /// Detect bounces in `samples`, which must be sorted by timestamp.
    ///
    /// `known_timestamps` are the times of events found by other detectors.
    pub fn detect(&self, samples: &[BallSample], known_timestamps: &[f64]) -> Vec<BounceEvent> {
        self.detect_with_diagnostics(samples, known_timestamps)
            .into_iter()
            .map(|d| d.event)
            .collect()
    }

    /// Like [`detect`](Self::detect), also reporting sample index and method.
    pub fn detect_with_diagnostics(
        &self,
        samples: &[BallSample],
        known_timestamps: &[f64],
    ) -> Vec<Detection> {
        let mut detections: Vec<Detection> = Vec::new();

        if samples.len() < 5 {
            return detections;
        }

        // Indices up to and including this one are covered by an earlier detection.
        let mut consumed_until: Option<usize> = None;

        for i in 2..=samples.len() - 3 {
            if consumed_until.is_some_and(|last| i <= last) {
                continue;
            }

            let curr = &samples[i];
            if !curr.is_finite() {
                continue;
            }
            if self.is_near_known_event(curr.timestamp, known_timestamps) {
                continue;
            }

            let Some((kind, method)) = self.classify(&samples[i - 1], curr, &samples[i + 1])
            else {
                continue;
            };

            let event = BounceEvent::unattributed(
                curr.timestamp,
                Position::clamped(curr.x, curr.y),
                kind,
            );

            if self.repeats_recent_detection(&detections, &event) {
                tracing::trace!(index = i, t = curr.timestamp, "duplicate of previous detection");
                continue;
            }

            tracing::trace!(
                index = i,
                t = curr.timestamp,
                kind = %kind,
                method = ?method,
                "trajectory bounce"
            );

            detections.push(Detection {
                index: i,
                method,
                event,
            });
            consumed_until = Some(i.saturating_add(self.thresholds.cooldown_samples));
        }

        tracing::debug!(
            samples = samples.len(),
            detected = detections.len(),
            "trajectory detection complete"
        );

        detections
    }

    /// Classify the middle sample of a three-sample window.
    pub fn classify(
        &self,
        prev: &BallSample,
        curr: &BallSample,
        next: &BallSample,
    ) -> Option<(BounceKind, DetectionMethod)> {
        let th = &self.thresholds;
        let before = Velocity::between(prev, curr);
        let after = Velocity::between(curr, next);

        let floor_reversal = before.y > th.floor_velocity
            && after.y < -th.floor_velocity * th.floor_reversal_fraction
            && th.is_floor_band(curr.y);
        if floor_reversal {
            return Some((BounceKind::Floor, DetectionMethod::VelocityReversal));
        }

        let wall_reversal = before.x.abs() > th.wall_velocity
            && before.x * after.x < 0.0
            && after.x.abs() > th.wall_velocity * th.wall_reversal_fraction
            && th.is_near_side_wall(curr.x);
        if wall_reversal {
            return Some((BounceKind::Wall, DetectionMethod::VelocityReversal));
        }

        let angle = angle_between(Vec2::between(prev, curr), Vec2::between(curr, next));
        if angle > th.sharp_angle_deg {
            let kind = if th.is_near_side_wall(curr.x) {
                BounceKind::Wall
            } else {
                BounceKind::Floor
            };
            return Some((kind, DetectionMethod::SharpAngle));
        }

        None
    }

    fn is_near_known_event(&self, t: f64, known_timestamps: &[f64]) -> bool {
        known_timestamps
            .iter()
            .any(|known| (known - t).abs() < self.thresholds.known_event_window_secs)
    }

    /// Whether `event` falls within the minimum separation of an earlier
    /// detection at nearly the same spot.
    fn repeats_recent_detection(&self, detections: &[Detection], event: &BounceEvent) -> bool {
        let th = &self.thresholds;
        detections
            .iter()
            .rev()
            .take_while(|d| event.timestamp - d.event.timestamp < th.min_separation_secs)
            .any(|d| {
                d.event
                    .position
                    .is_near(&event.position, th.duplicate_position_tolerance)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_samples(points: &[(f64, f64, f64)]) -> Vec<BallSample> {
        points
            .iter()
            .map(|(t, x, y)| BallSample::new(*t, *x, *y))
            .collect()
    }

    /// Alternating y between 0.3 and 0.6 at a fixed x.
    fn zigzag(count: usize, dt: f64) -> Vec<BallSample> {
        (0..count)
            .map(|i| {
                let y = if i % 2 == 0 { 0.3 } else { 0.6 };
                BallSample::new(i as f64 * dt, 0.5, y)
            })
            .collect()
    }

    #[test]
    fn test_floor_bounce_from_velocity_reversal() {
        let samples = make_samples(&[
            (0.9, 0.5, 0.2),
            (1.0, 0.5, 0.3),
            (1.1, 0.5, 0.6),
            (1.2, 0.5, 0.35),
            (1.3, 0.5, 0.2),
        ]);

        let detections = TrajectoryDetector::with_defaults().detect_with_diagnostics(&samples, &[]);
        assert_eq!(detections.len(), 1);
        let d = detections[0];
        assert_eq!(d.index, 2);
        assert_eq!(d.method, DetectionMethod::VelocityReversal);
        assert_eq!(d.event.kind, BounceKind::Floor);
        assert_eq!(d.event.timestamp, 1.1);
        assert_eq!(d.event.player_id, -1);
    }

    #[test]
    fn test_floor_bounce_outside_band_is_not_velocity_classified() {
        let detector = TrajectoryDetector::with_defaults();
        let prev = BallSample::new(1.0, 0.5, 0.8);
        let curr = BallSample::new(1.1, 0.5, 0.97);
        let next = BallSample::new(1.2, 0.5, 0.8);

        let (kind, method) = detector.classify(&prev, &curr, &next).unwrap();
        assert_eq!(kind, BounceKind::Floor);
        assert_eq!(method, DetectionMethod::SharpAngle);
    }

    #[test]
    fn test_side_wall_bounce_from_velocity_reversal() {
        let samples = make_samples(&[
            (0.0, 0.6, 0.5),
            (0.1, 0.75, 0.5),
            (0.2, 0.92, 0.52),
            (0.3, 0.8, 0.54),
            (0.4, 0.7, 0.56),
        ]);

        let detections = TrajectoryDetector::with_defaults().detect_with_diagnostics(&samples, &[]);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].event.kind, BounceKind::Wall);
        assert_eq!(detections[0].method, DetectionMethod::VelocityReversal);
    }

    #[test]
    fn test_gradual_turn_caught_by_angle_fallback() {
        let samples = make_samples(&[
            (-0.1, 0.48, 0.47),
            (0.0, 0.5, 0.5),
            (0.1, 0.52, 0.53),
            (0.2, 0.54, 0.5),
            (0.3, 0.56, 0.47),
        ]);

        let detections = TrajectoryDetector::with_defaults().detect_with_diagnostics(&samples, &[]);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].index, 2);
        assert_eq!(detections[0].event.kind, BounceKind::Floor);
        assert_eq!(detections[0].method, DetectionMethod::SharpAngle);
    }

    #[test]
    fn test_angle_fallback_near_side_edge_is_wall() {
        let detector = TrajectoryDetector::with_defaults();
        let prev = BallSample::new(0.0, 0.14, 0.5);
        let curr = BallSample::new(0.2, 0.1, 0.52);
        let next = BallSample::new(0.4, 0.14, 0.54);

        let (kind, method) = detector.classify(&prev, &curr, &next).unwrap();
        assert_eq!(kind, BounceKind::Wall);
        assert_eq!(method, DetectionMethod::SharpAngle);
    }

    #[test]
    fn test_straight_flight_has_no_bounce() {
        let samples: Vec<BallSample> = (0..10)
            .map(|i| {
                let f = i as f64;
                BallSample::new(f * 0.1, 0.2 + f * 0.05, 0.3 + f * 0.04)
            })
            .collect();
        assert!(TrajectoryDetector::with_defaults().detect(&samples, &[]).is_empty());
    }

    #[test]
    fn test_known_event_suppresses_detection() {
        let samples = make_samples(&[
            (0.9, 0.5, 0.2),
            (1.0, 0.5, 0.3),
            (1.1, 0.5, 0.6),
            (1.2, 0.5, 0.35),
            (1.3, 0.5, 0.2),
        ]);
        let events = TrajectoryDetector::with_defaults().detect(&samples, &[1.2]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_cooldown_consumes_following_samples() {
        let samples = zigzag(12, 0.1);
        let detections = TrajectoryDetector::with_defaults().detect_with_diagnostics(&samples, &[]);
        let indices: Vec<usize> = detections.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![2, 6]);
    }

    #[test]
    fn test_dense_samples_do_not_repeat_same_bounce() {
        let samples = zigzag(14, 0.02);
        let detections = TrajectoryDetector::with_defaults().detect_with_diagnostics(&samples, &[]);
        let indices: Vec<usize> = detections.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![2, 10]);
    }

    #[test]
    fn test_unbounded_cooldown_consumes_rest_of_track() {
        let raw = r#"{ "trajectory": { "cooldown_samples": 18446744073709551615 } }"#;
        let config: crate::config::InferenceConfig = serde_json::from_str(raw).unwrap();
        assert!(config.validate().is_ok());

        let detections = TrajectoryDetector::new(config.trajectory)
            .detect_with_diagnostics(&zigzag(12, 0.1), &[]);
        let indices: Vec<usize> = detections.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![2]);
    }

    #[test]
    fn test_non_finite_sample_is_never_emitted() {
        // Horizontal reversal at the side edge with a missing y coordinate.
        let samples = make_samples(&[
            (0.0, 0.70, 0.5),
            (0.1, 0.80, 0.5),
            (0.2, 0.90, f64::NAN),
            (0.3, 0.80, 0.5),
            (0.4, 0.70, 0.5),
        ]);
        assert!(TrajectoryDetector::with_defaults().detect(&samples, &[]).is_empty());
    }

    #[test]
    fn test_too_few_samples() {
        let samples = make_samples(&[(0.0, 0.5, 0.3), (0.1, 0.5, 0.6), (0.2, 0.5, 0.3)]);
        assert!(TrajectoryDetector::with_defaults().detect(&samples, &[]).is_empty());
        assert!(TrajectoryDetector::with_defaults().detect(&[], &[]).is_empty());
    }

    #[test]
    fn test_repeated_timestamps_do_not_produce_nan() {
        let samples = make_samples(&[
            (1.0, 0.5, 0.5),
            (1.0, 0.5, 0.5),
            (1.0, 0.5, 0.5),
            (1.0, 0.5, 0.5),
            (1.0, 0.5, 0.5),
        ]);
        assert!(TrajectoryDetector::with_defaults().detect(&samples, &[]).is_empty());
    }
}
