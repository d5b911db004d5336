//! Rallytrace CLI: command-line interface for bounce-timeline inference.
//!
//! Usage:
//!   rallytrace infer <MATCH>      Infer the bounce timeline for a match result
//!   rallytrace validate <MATCH>   Check a match result against engine preconditions
//!   rallytrace info <MATCH>       Show match result contents
//!   rallytrace init-config        Write the default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::infer::{InferArgs, OutputFormat};

#[derive(Parser)]
#[command(
    name = "rallytrace",
    about = "Bounce and swing-contact inference for tracked ball trajectories",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the full bounce timeline for a match result
    Infer {
        /// Path to the match-result JSON file
        path: PathBuf,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Disable swing-bounce synthesis
        #[arg(long)]
        no_swing_bounces: bool,

        /// Disable trajectory bounce detection
        #[arg(long)]
        no_trajectory: bool,

        /// Request audio bounce detection
        #[arg(long)]
        audio: bool,

        /// Net position in normalized y
        #[arg(long)]
        midline: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Validate a match result
    Validate {
        /// Path to the match-result JSON file
        path: PathBuf,
    },

    /// Show match result information
    Info {
        /// Path to the match-result JSON file
        path: PathBuf,
    },

    /// Write the default config to the standard location
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = rallytrace_common::AppConfig::load();

    rallytrace_common::logging::init_cli_logging(&app_config.logging, cli.verbose);

    match cli.command {
        Commands::Infer {
            path,
            output,
            config,
            no_swing_bounces,
            no_trajectory,
            audio,
            midline,
            format,
        } => commands::infer::run(
            &app_config,
            InferArgs {
                path,
                output,
                config,
                no_swing_bounces,
                no_trajectory,
                audio,
                midline,
                format,
            },
        ),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Info { path } => commands::info::run(path),
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}
