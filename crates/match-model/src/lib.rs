//! Rallytrace Match Model
//!
//! Defines the core data contracts for a recorded rally:
//! - **Samples:** Timestamped ball positions from the upstream tracker
//! - **Swings:** Detected racket/paddle contacts
//! - **Bounces:** Classified ball events, upstream or inferred
//! - **Match result:** The on-disk bundle tying the three together
//!
//! All coordinates are normalized to `[0.0, 1.0]` relative to the video
//! frame, origin top-left, y increasing downward.

pub mod bounce;
pub mod match_result;
pub mod sample;

pub use bounce::*;
pub use match_result::*;
pub use sample::*;
