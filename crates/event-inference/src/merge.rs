//! Merging detector outputs into one ordered timeline.

use rallytrace_match_model::BounceEvent;

/// Concatenate event sources and stable-sort by timestamp.
///
/// Nothing is dropped here; each detector already suppresses its own
/// duplicates. Events with equal timestamps keep source order, so
/// authoritative events come first when passed first.
pub fn merge_events<'a, I>(sources: I) -> Vec<BounceEvent>
where
    I: IntoIterator<Item = &'a [BounceEvent]>,
{
    let mut merged: Vec<BounceEvent> = sources.into_iter().flatten().copied().collect();
    merged.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rallytrace_match_model::{BounceKind, Position};

    #[test]
    fn test_merge_orders_across_sources() {
        let authoritative = [BounceEvent::authoritative(2.0, 0.5, 0.7, 1)];
        let swings = [BounceEvent::new(
            1.0,
            Position::new(0.4, 0.6),
            0,
            BounceKind::Swing,
        )];
        let detected = [
            BounceEvent::unattributed(0.5, Position::new(0.3, 0.4), BounceKind::Floor),
            BounceEvent::unattributed(3.0, Position::new(0.9, 0.4), BounceKind::Wall),
        ];

        let merged = merge_events([&authoritative[..], &swings[..], &detected[..]]);
        let times: Vec<f64> = merged.iter().map(|e| e.timestamp).collect();
        assert_eq!(times, vec![0.5, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_ties_keep_source_order() {
        let authoritative = [BounceEvent::authoritative(1.0, 0.5, 0.7, 1)];
        let detected = [BounceEvent::unattributed(
            1.0,
            Position::new(0.5, 0.7),
            BounceKind::Floor,
        )];

        let merged = merge_events([&authoritative[..], &detected[..]]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].kind, BounceKind::Authoritative);
        assert_eq!(merged[1].kind, BounceKind::Floor);
    }

    #[test]
    fn test_empty_sources() {
        let empty: [&[BounceEvent]; 0] = [];
        assert!(merge_events(empty).is_empty());
    }
}
