//! Swing-bounce synthesis.
//!
//! Places each measured swing contact on the ball trajectory by taking the
//! position of the sample closest in time to the hit.

use rallytrace_match_model::{BallSample, BounceEvent, BounceKind, Position, SwingEvent};

use crate::config::SwingThresholds;

/// Emit a `swing` bounce for every swing that carries a measured ball speed
/// and can be matched to a nearby sample.
///
/// `samples` must be sorted by timestamp. Swings already covered by an
/// authoritative event, or by a swing synthesized earlier in this call,
/// are skipped.
pub fn synthesize_swing_bounces(
    samples: &[BallSample],
    swings: &[SwingEvent],
    authoritative: &[BounceEvent],
    thresholds: &SwingThresholds,
) -> Vec<BounceEvent> {
    let mut synthesized: Vec<BounceEvent> = Vec::new();

    if samples.is_empty() {
        return synthesized;
    }

    for swing in swings {
        if !swing.has_measured_speed() {
            tracing::trace!(t = swing.hit_timestamp, "swing has no measured speed, skipping");
            continue;
        }

        let hit = swing.hit_timestamp;
        let already_known = authoritative
            .iter()
            .chain(synthesized.iter())
            .any(|event| (event.timestamp - hit).abs() < thresholds.duplicate_window_secs);
        if already_known {
            tracing::trace!(t = hit, "swing already covered by a known event");
            continue;
        }

        let Some(sample) = nearest_sample(samples, hit, thresholds) else {
            tracing::trace!(t = hit, "no sample close enough to place swing");
            continue;
        };

        synthesized.push(BounceEvent::new(
            hit,
            Position::clamped(sample.x, sample.y),
            swing.player_id,
            BounceKind::Swing,
        ));
    }

    tracing::debug!(
        swings = swings.len(),
        synthesized = synthesized.len(),
        "swing-bounce synthesis complete"
    );

    synthesized
}

/// The sample closest in time to `hit`, if it lies within the match tolerance.
/// Samples with a non-finite timestamp or coordinate are never chosen.
fn nearest_sample<'a>(
    samples: &'a [BallSample],
    hit: f64,
    thresholds: &SwingThresholds,
) -> Option<&'a BallSample> {
    let start = samples.partition_point(|s| s.timestamp < hit - thresholds.match_tolerance_secs);
    let horizon = hit + thresholds.search_horizon_secs;

    let mut best: Option<(&BallSample, f64)> = None;
    for sample in &samples[start..] {
        if sample.timestamp > horizon {
            break;
        }
        if !sample.is_finite() {
            continue;
        }
        let gap = (sample.timestamp - hit).abs();
        if best.map_or(true, |(_, best_gap)| gap < best_gap) {
            best = Some((sample, gap));
        }
    }

    best.filter(|(_, gap)| *gap <= thresholds.match_tolerance_secs)
        .map(|(sample, _)| sample)
}
