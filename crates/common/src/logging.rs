//! Tracing subscriber setup.
//!
//! Logs go to stderr so command output on stdout stays pipeable.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Level used when the CLI runs with `--verbose`.
pub const VERBOSE_LEVEL: &str = "debug";

/// `config` with its level raised to [`VERBOSE_LEVEL`] when `verbose` is set.
pub fn with_verbosity(config: &LoggingConfig, verbose: bool) -> LoggingConfig {
    let mut config = config.clone();
    if verbose {
        config.level = VERBOSE_LEVEL.to_string();
    }
    config
}

/// Event filter for `config`.
///
/// `RUST_LOG` takes precedence; an unparseable configured level falls back
/// to `info`.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Later calls leave the first one in place.
pub fn init_logging(config: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::trace!("tracing subscriber already installed");
    }
}

/// Initialize logging for a CLI run.
pub fn init_cli_logging(config: &LoggingConfig, verbose: bool) {
    init_logging(&with_verbosity(config, verbose));
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
