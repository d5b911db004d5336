//! Bounce event types for the rally timeline.
//!
//! Bounce events are exchanged with the timeline and court-overlay views
//! in JSONL format, one event per line.

use serde::{Deserialize, Serialize};

use crate::sample::{Position, TimestampSecs};

/// Player id used for events not attributed to any player.
pub const UNATTRIBUTED_PLAYER: i32 = -1;

/// Where a bounce event came from and what it represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceKind {
    /// Produced by the upstream pipeline. Never altered.
    Authoritative,
    /// Ball contact at a detected swing.
    Swing,
    /// Floor bounce found in the trajectory.
    Floor,
    /// Side-wall bounce found in the trajectory.
    Wall,
    /// A trajectory bounce that must have been an undetected contact.
    InferredSwing,
}

impl BounceKind {
    /// Every kind except `Authoritative` is derived by the engine.
    pub fn is_derived(self) -> bool {
        !matches!(self, BounceKind::Authoritative)
    }

    /// Only trajectory bounces may be rewritten by causal reclassification.
    pub fn is_trajectory_bounce(self) -> bool {
        matches!(self, BounceKind::Floor | BounceKind::Wall)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BounceKind::Authoritative => "authoritative",
            BounceKind::Swing => "swing",
            BounceKind::Floor => "floor",
            BounceKind::Wall => "wall",
            BounceKind::InferredSwing => "inferred_swing",
        }
    }
}

impl std::fmt::Display for BounceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half of the court relative to the net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourtSide {
    /// Below the midline in frame coordinates (closer to the camera).
    Near,
    /// At or above the midline.
    Far,
}

impl CourtSide {
    pub fn of(position: &Position, midline_y: f64) -> Self {
        if position.y > midline_y {
            CourtSide::Near
        } else {
            CourtSide::Far
        }
    }
}

/// A classified ball event on the rally timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceEvent {
    pub timestamp: TimestampSecs,

    pub position: Position,

    /// Attributed player, or [`UNATTRIBUTED_PLAYER`].
    #[serde(default = "default_player_id", alias = "playerId")]
    pub player_id: i32,

    #[serde(rename = "type")]
    pub kind: BounceKind,
}

fn default_player_id() -> i32 {
    UNATTRIBUTED_PLAYER
}

impl BounceEvent {
    pub fn new(
        timestamp: TimestampSecs,
        position: Position,
        player_id: i32,
        kind: BounceKind,
    ) -> Self {
        Self {
            timestamp,
            position,
            player_id,
            kind,
        }
    }

    /// An upstream event.
    pub fn authoritative(timestamp: TimestampSecs, x: f64, y: f64, player_id: i32) -> Self {
        Self::new(
            timestamp,
            Position::new(x, y),
            player_id,
            BounceKind::Authoritative,
        )
    }

    /// A trajectory bounce with no player attribution.
    pub fn unattributed(timestamp: TimestampSecs, position: Position, kind: BounceKind) -> Self {
        Self::new(timestamp, position, UNATTRIBUTED_PLAYER, kind)
    }

    /// Attributed player, if any.
    pub fn player(&self) -> Option<i32> {
        (self.player_id != UNATTRIBUTED_PLAYER).then_some(self.player_id)
    }

    pub fn side(&self, midline_y: f64) -> CourtSide {
        CourtSide::of(&self.position, midline_y)
    }

    /// Same event with a different kind. Timestamp and position are kept.
    pub fn with_kind(self, kind: BounceKind) -> Self {
        Self { kind, ..self }
    }
}

/// Parse bounce events from JSONL content (one JSON object per line).
pub fn parse_bounces(jsonl: &str) -> Result<Vec<BounceEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize bounce events to JSONL format.
pub fn serialize_bounces(events: &[BounceEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
