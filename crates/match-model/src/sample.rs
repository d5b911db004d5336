//! Ball-tracking samples and swing detections.
//!
//! Both are produced upstream by the video-analysis pipeline and are
//! read-only to the inference engine.

use serde::{Deserialize, Serialize};

/// Seconds since the start of the recorded video.
pub type TimestampSecs = f64;

/// A normalized 2D position within the video frame.
///
/// `(0.0, 0.0)` is top-left and `(1.0, 1.0)` is bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a position clamped to the `[0, 1] x [0, 1]` frame.
    pub fn clamped(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }

    /// Whether both coordinates are finite and inside the frame.
    pub fn is_in_frame(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && (0.0..=1.0).contains(&self.x)
            && (0.0..=1.0).contains(&self.y)
    }

    /// True when the two positions differ by no more than `tolerance`
    /// on at least one axis.
    pub fn is_near(&self, other: &Position, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance || (self.y - other.y).abs() <= tolerance
    }
}

/// One timestamped ball position from the upstream tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSample {
    #[serde(rename = "t", alias = "timestamp")]
    pub timestamp: TimestampSecs,
    pub x: f64,
    pub y: f64,
}

impl BallSample {
    pub fn new(timestamp: TimestampSecs, x: f64, y: f64) -> Self {
        Self { timestamp, x, y }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Whether the timestamp and both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite() && self.x.is_finite() && self.y.is_finite()
    }
}

/// A detected racket/paddle contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingEvent {
    /// Instant of ball contact.
    #[serde(alias = "hitTimestamp")]
    pub hit_timestamp: TimestampSecs,

    /// Player who made the contact.
    #[serde(alias = "playerId")]
    pub player_id: i32,

    /// Measured ball speed after contact. `0.0` means no speed was measured.
    #[serde(default, alias = "ballSpeed")]
    pub ball_speed: f64,
}

impl SwingEvent {
    pub fn new(hit_timestamp: TimestampSecs, player_id: i32, ball_speed: f64) -> Self {
        Self {
            hit_timestamp,
            player_id,
            ball_speed,
        }
    }

    /// Whether the upstream pipeline attached a usable speed measurement.
    pub fn has_measured_speed(&self) -> bool {
        self.ball_speed > 0.0
    }
}
