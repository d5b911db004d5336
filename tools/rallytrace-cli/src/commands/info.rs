//! Show match-result information.

use std::path::PathBuf;

use rallytrace_match_model::{BounceKind, MatchResult};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let result =
        MatchResult::load(&path).map_err(|e| anyhow::anyhow!("Failed to load match result: {e}"))?;

    println!("Match: {}", result.match_id);
    println!("  Version: {}", result.version);
    if let Some(ref generated) = result.generated_at {
        println!("  Generated: {generated}");
    }
    println!();

    println!("Ball samples:");
    println!("  Count: {}", result.ball_samples.len());
    if let (Some(first), Some(last)) = (result.ball_samples.first(), result.ball_samples.last()) {
        println!(
            "  Span: {:.3}s ({:.3}s to {:.3}s)",
            result.sample_span_secs(),
            first.timestamp,
            last.timestamp
        );
    }
    println!("  Ordered: {}", result.samples_are_ordered());
    println!();

    let measured = result
        .swings
        .iter()
        .filter(|s| s.has_measured_speed())
        .count();
    println!("Swings:");
    println!("  Count: {}", result.swings.len());
    println!("  With measured speed: {measured}");
    println!();

    println!("Bounces:");
    println!("  Count: {}", result.bounces.len());
    for kind in [
        BounceKind::Authoritative,
        BounceKind::Swing,
        BounceKind::Floor,
        BounceKind::Wall,
        BounceKind::InferredSwing,
    ] {
        let count = result.bounces.iter().filter(|b| b.kind == kind).count();
        if count > 0 {
            println!("  {kind}: {count}");
        }
    }

    Ok(())
}
