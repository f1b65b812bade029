//! SwingSync CLI: analyze, align, and compare racquet swing recordings.
//!
//! Usage:
//!   swingsync analyze <RECORDING>       Analyze a recording and store the result
//!   swingsync phases <RECORDING>        Print detected key poses
//!   swingsync sync <USER> <REFERENCE>   Time offset and frame mapping
//!   swingsync compare <USER> <REF>      Compare two stored results
//!   swingsync show <ID>                 Print a stored result
//!   swingsync validate <RECORDING>      Check a recording file
//!   swingsync demo                      Write synthetic recordings

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use swingsync_common::config::{AppConfig, LoggingConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "swingsync",
    about = "Racquet swing analysis and phase-aware comparison",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recording, optionally against a reference
    Analyze {
        /// Pose recording (JSON)
        recording: PathBuf,

        /// Reference recording to compare and align against
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Label stored with the comparison (defaults to the reference file name)
        #[arg(short, long)]
        label: Option<String>,

        /// Directory for stored results
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print the result without storing it
        #[arg(long)]
        no_save: bool,
    },

    /// Print the key poses detected in a recording
    Phases {
        /// Pose recording (JSON)
        recording: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Align a user recording to a reference recording
    Sync {
        /// User recording (JSON)
        user: PathBuf,

        /// Reference recording (JSON)
        reference: PathBuf,

        /// Print the full frame mapping
        #[arg(long)]
        mapping: bool,
    },

    /// Compare two stored analysis results
    Compare {
        /// Id of the user result
        user_id: String,

        /// Id of the reference result
        reference_id: String,

        /// Label for the reference (defaults to its id)
        #[arg(short, long)]
        label: Option<String>,

        /// Directory of stored results
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Print a stored analysis result
    Show {
        /// Result id
        id: String,

        /// Directory of stored results
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Validate a recording file
    Validate {
        /// Pose recording (JSON)
        recording: PathBuf,
    },

    /// Write a synthetic user/reference recording pair
    Demo {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Frames per recording
        #[arg(long, default_value = "40")]
        frames: usize,

        /// Capture rate
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Tempo warp applied to the reference swing
        #[arg(long, default_value = "1.3")]
        reference_warp: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    swingsync_common::logging::init_logging(&LoggingConfig {
        level,
        json: cli.json_logs || config.logging.json,
        file: config.logging.file.clone(),
    });

    config.analysis.validate()?;

    match cli.command {
        Commands::Analyze {
            recording,
            reference,
            label,
            out_dir,
            no_save,
        } => commands::analyze::run(&config, recording, reference, label, out_dir, no_save),
        Commands::Phases { recording, json } => commands::phases::run(&config, recording, json),
        Commands::Sync {
            user,
            reference,
            mapping,
        } => commands::sync::run(&config, user, reference, mapping),
        Commands::Compare {
            user_id,
            reference_id,
            label,
            results_dir,
        } => commands::compare::run(&config, user_id, reference_id, label, results_dir),
        Commands::Show { id, results_dir } => commands::show::run(&config, id, results_dir),
        Commands::Validate { recording } => commands::validate::run(&config, recording),
        Commands::Demo {
            output,
            frames,
            fps,
            reference_warp,
        } => commands::demo::run(output, frames, fps, reference_warp),
    }
}
