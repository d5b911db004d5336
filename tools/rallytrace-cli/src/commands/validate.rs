//! Validate a match-result file.

use std::path::PathBuf;

use rallytrace_match_model::MatchResult;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating match result at: {}", path.display());

    let result =
        MatchResult::load(&path).map_err(|e| anyhow::anyhow!("Failed to load match result: {e}"))?;

    println!("  Match: {}", result.match_id);
    println!("  Version: {}", result.version);
    println!("  Ball samples: {}", result.ball_samples.len());
    println!("  Swings: {}", result.swings.len());
    println!("  Bounces: {}", result.bounces.len());

    let issues = result.validate();
    if issues.is_empty() {
        println!("\nMatch result is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Inference may produce unreliable events.",
            issues.len()
        );
    }

    Ok(())
}
