//! Causal-consistency reclassification.
//!
//! The ball cannot cross the net without a player touching it. When two
//! consecutive events sit on opposite sides of the midline and no swing
//! was recorded between them, the earlier one cannot have been a bounce:
//! it is rewritten as an undetected contact (`inferred_swing`).

use rallytrace_match_model::{BounceEvent, BounceKind, SwingEvent};

/// Return a copy of `events` with impossible trajectory bounces relabelled.
///
/// `events` must be sorted by timestamp. Only `floor` and `wall` events are
/// candidates, and only their kind changes. Every decision is made against
/// the input list, so applying this to its own output changes nothing.
pub fn reclassify(
    events: &[BounceEvent],
    swings: &[SwingEvent],
    midline_y: f64,
) -> Vec<BounceEvent> {
    events
        .iter()
        .enumerate()
        .map(|(i, curr)| match events.get(i + 1) {
            Some(next) if crosses_net_unassisted(curr, next, swings, midline_y) => {
                tracing::trace!(
                    t = curr.timestamp,
                    was = %curr.kind,
                    next_t = next.timestamp,
                    "bounce relabelled as inferred swing"
                );
                curr.with_kind(BounceKind::InferredSwing)
            }
            _ => *curr,
        })
        .collect()
}

/// Number of events whose kind differs between two aligned timelines.
pub fn count_relabelled(before: &[BounceEvent], after: &[BounceEvent]) -> usize {
    before
        .iter()
        .zip(after)
        .filter(|(a, b)| a.kind != b.kind)
        .count()
}

fn crosses_net_unassisted(
    curr: &BounceEvent,
    next: &BounceEvent,
    swings: &[SwingEvent],
    midline_y: f64,
) -> bool {
    if !curr.kind.is_trajectory_bounce() {
        return false;
    }
    if curr.side(midline_y) == next.side(midline_y) {
        return false;
    }
    !swings
        .iter()
        .any(|s| s.hit_timestamp > curr.timestamp && s.hit_timestamp < next.timestamp)
}
