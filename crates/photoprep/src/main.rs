//! Photoprep CLI - Deterministic image preview and fingerprint pipeline.
//!
//! Photoprep takes images as input and outputs one flat JSON record per
//! image: the hothash content identity, base64 previews, and extracted
//! EXIF metadata.
//!
//! # Usage
//!
//! ```bash
//! # Process a single image
//! photoprep process image.jpg
//!
//! # Process a directory
//! photoprep process ./photos/ --output records.jsonl --format jsonl
//!
//! # View configuration
//! photoprep config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Photoprep - Deterministic image preview and fingerprint pipeline.
#[derive(Parser, Debug)]
#[command(name = "photoprep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Process images into preview-and-fingerprint records
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match photoprep_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `photoprep config path`."
            );
            photoprep_core::Config::default()
        }
    };
    logging::init(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Photoprep v{}", photoprep_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Process(args) => cli::process::execute(args, config),
        Commands::Config(args) => cli::config::execute(args),
    }
}
