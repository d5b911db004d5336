//! Write the default application config.

use anyhow::Context;
use rallytrace_common::{config_file_path, AppConfig};

pub fn run(force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let config = AppConfig::default();
    config
        .save()
        .with_context(|| format!("Failed to write config: {}", path.display()))?;

    println!("Config written to: {}", path.display());
    println!("  Swing bounces: {}", config.detection.synthesize_swing_bounces);
    println!(
        "  Trajectory bounces: {}",
        config.detection.detect_trajectory_bounces
    );
    println!("  Midline: {}", config.detection.midline_y);
    println!("  Log level: {}", config.logging.level);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_defaults_and_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join("rallytrace_test_init_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::env::set_var("XDG_CONFIG_HOME", &dir);

        run(false).unwrap();
        let path = dir.join("rallytrace").join("config.json");
        assert!(path.exists());
        let loaded = AppConfig::load_from(&path);
        assert!(!loaded.detection.detect_audio_bounces);

        assert!(run(false).is_err());
        assert!(run(true).is_ok());

        std::fs::remove_dir_all(&dir).ok();
    }
}
