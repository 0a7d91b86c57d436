//! fp - nine-season player projections from the command line

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "fp")]
#[command(about = "Project football players nine seasons ahead", version, long_about = None)]
struct Cli {
    /// Model directory containing manifest.json (carry-forward baseline when omitted)
    #[arg(long, global = true)]
    models: Option<PathBuf>,

    /// Projection config JSON (FP_CONFIG_PATH / FP_PROFILE when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Project one player
    Project {
        /// Request JSON file
        #[arg(long)]
        r#in: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Project a JSON array of players in parallel
    Batch {
        /// Requests JSON file
        #[arg(long)]
        r#in: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Load a model directory and list its estimators
    InspectModels,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    fp_cli::logging::initialize_logging(&cli.log_level)?;

    match cli.command {
        Commands::Project { r#in, out } => {
            let projector = fp_cli::build_projector(cli.models.as_deref(), cli.config.as_deref())?;
            fp_cli::run_project(&projector, &r#in, out.as_deref())?;
        }

        Commands::Batch { r#in, out } => {
            let projector = fp_cli::build_projector(cli.models.as_deref(), cli.config.as_deref())?;
            let summary = fp_cli::run_batch(&projector, &r#in, out.as_deref())?;

            eprintln!(
                "Batch finished: {} total, {} succeeded, {} failed",
                summary.total, summary.succeeded, summary.failed
            );
            for (player_id, reason) in &summary.failures {
                eprintln!("   player {}: {}", player_id, reason);
            }
        }

        Commands::InspectModels => {
            let summary = fp_cli::inspect_models(cli.models.as_deref())?;
            fp_cli::write_json(&summary, None)?;
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("fp CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
