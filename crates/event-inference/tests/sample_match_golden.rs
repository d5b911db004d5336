use std::path::PathBuf;

use rallytrace_event_inference::EventInferenceEngine;
use rallytrace_match_model::{BounceKind, MatchResult, Position};

fn load_fixture() -> MatchResult {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-match")
        .join("match.json");

    MatchResult::load(path).expect("fixture match should load")
}

#[test]
fn sample_match_fixture_is_valid() {
    let result = load_fixture();
    assert_eq!(result.match_id, "sample-rally-001");
    assert!(result.samples_are_ordered());
    assert!(result.validate().is_empty(), "{:?}", result.validate());
}

#[test]
fn sample_match_timeline_is_stable() {
    let result = load_fixture();
    let (events, report) = EventInferenceEngine::with_defaults().infer_match(&result);

    let summary: Vec<(f64, BounceKind, i32)> = events
        .iter()
        .map(|e| (e.timestamp, e.kind, e.player_id))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0.2, BounceKind::InferredSwing, -1),
            (1.1, BounceKind::Floor, -1),
            (1.52, BounceKind::Swing, 1),
            (2.1, BounceKind::Authoritative, 0),
        ]
    );

    assert_eq!(events[2].position, Position::new(0.92, 0.12));
    assert_eq!(report.authoritative, 1);
    assert_eq!(report.synthesized, 1);
    assert_eq!(report.skipped_unmeasured_swings, 1);
    assert_eq!(report.detected_by_velocity, 2);
    assert_eq!(report.detected_by_angle, 0);
    assert_eq!(report.reclassified, 1);
}
