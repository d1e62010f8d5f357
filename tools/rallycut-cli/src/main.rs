//! RallyCut CLI — Command-line interface for rally analysis and export.
//!
//! Usage:
//!   rallycut analyze <POSES>     Detect rallies in a pose tracking stream
//!   rallycut export <VIDEO>      Cut highlight clips from a report
//!   rallycut run <VIDEO> <POSES> Analyze and export in one pass
//!   rallycut info <REPORT>       Show a highlight report
//!   rallycut check               Check system capabilities

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::analyze::AnalysisOpts;

mod commands;

#[derive(Parser)]
#[command(
    name = "rallycut",
    about = "Table-tennis highlight clipping from pose tracking streams",
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
    /// Detect rallies in a pose stream and write a highlight report
    Analyze {
        /// Path to the pose stream (poses.jsonl)
        poses: PathBuf,

        /// Path to the table detection sidecar (surface.json)
        #[arg(long)]
        surface: Option<PathBuf>,

        /// Report output path
        #[arg(short, long, default_value = "highlights.json")]
        output: PathBuf,

        #[command(flatten)]
        opts: AnalysisOpts,
    },

    /// Cut highlight clips from an existing report
    Export {
        /// Path to the source video
        video: PathBuf,

        /// Path to the highlight report
        #[arg(long, default_value = "highlights.json")]
        report: PathBuf,

        /// Output directory for clips
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Analyze a pose stream and export clips in one pass
    Run {
        /// Path to the source video
        video: PathBuf,

        /// Path to the pose stream (poses.jsonl)
        poses: PathBuf,

        /// Path to the table detection sidecar (surface.json)
        #[arg(long)]
        surface: Option<PathBuf>,

        /// Output directory for clips and the report
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        opts: AnalysisOpts,
    },

    /// Show a highlight report
    Info {
        /// Path to the highlight report
        report: PathBuf,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    rallycut_common::logging::init_logging(&rallycut_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Analyze {
            poses,
            surface,
            output,
            opts,
        } => {
            commands::analyze::run(poses, surface, output, &opts)?;
            Ok(())
        }
        Commands::Export {
            video,
            report,
            output,
        } => commands::export::run(video, report, output).await,
        Commands::Run {
            video,
            poses,
            surface,
            output,
            opts,
        } => commands::run::run(video, poses, surface, output, &opts).await,
        Commands::Info { report } => commands::info::run(report),
        Commands::Check => commands::check::run(),
    }
}
