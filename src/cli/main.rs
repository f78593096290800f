//! CLI binary entry point for soda-ingest

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use soda_ingest::cli::commands::init::{InitArgs, handle_init};
use soda_ingest::cli::commands::run::{RunArgs, handle_run};
use soda_ingest::cli::commands::validate::{ValidateArgs, handle_validate};

#[derive(Parser)]
#[command(name = "soda-ingest")]
#[command(about = "Extract-validate-load pipeline for Socrata-style open data portals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter configuration file into the workspace
    Init {
        /// Workspace path
        #[arg(default_value = ".")]
        workspace: PathBuf,
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
    /// Run the full extract-validate-load pipeline
    Run {
        /// Workspace path containing the configuration file
        #[arg(default_value = ".")]
        workspace: PathBuf,
        /// Override the configured page size
        #[arg(long)]
        page_size: Option<usize>,
        /// Override the configured record cap
        #[arg(long)]
        max_records: Option<usize>,
    },
    /// Run the quality gate over a JSON record dump without loading
    Validate {
        /// Input file path or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Workspace whose configuration supplies the thresholds
        #[arg(long, default_value = ".")]
        workspace: PathBuf,
    },
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { workspace, force } => handle_init(&InitArgs { workspace, force }),
        Commands::Run {
            workspace,
            page_size,
            max_records,
        } => handle_run(&RunArgs {
            workspace,
            page_size,
            max_records,
        }),
        Commands::Validate { input, workspace } => {
            handle_validate(&ValidateArgs { input, workspace })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
