//! 2D vector helpers for trajectory analysis.

use rallytrace_match_model::{BallSample, Position};

/// A displacement in normalized frame units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `from` to `to`.
    pub fn between(from: &BallSample, to: &BallSample) -> Self {
        Self::sub(Position::new(to.x, to.y), Position::new(from.x, from.y))
    }

    /// `a - b` as a vector.
    pub fn sub(a: Position, b: Position) -> Self {
        Self {
            x: a.x - b.x,
            y: a.y - b.y,
        }
    }

    pub fn dot(&self, other: &Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(&self, other: &Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// Exactly 0 for parallel and 180 for anti-parallel vectors. Returns 0 when
/// either vector has zero length or a component is not finite.
pub fn angle_between(v1: Vec2, v2: Vec2) -> f64 {
    let denom = v1.magnitude() * v2.magnitude();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }

    let angle = v1.cross(&v2).atan2(v1.dot(&v2)).abs().to_degrees();
    if angle.is_nan() {
        return 0.0;
    }
    angle.min(180.0)
}
