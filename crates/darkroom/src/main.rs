//! darkroom CLI - batch image ingestion with an append-only manifest.
//!
//! darkroom reads raw source images, derives a full-size variant and a
//! square thumbnail from each, and merges the results into a JSON manifest.
//! Safe to run repeatedly: it never deletes outputs, and filenames embed a
//! content fingerprint.
//!
//! # Usage
//!
//! ```bash
//! # Ingest the default incoming directory
//! darkroom ingest
//!
//! # Ingest existing uploads, only specific files, without writing
//! darkroom ingest --input uploads --files a.jpg,b.png --dry-run
//!
//! # View configuration
//! darkroom config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// darkroom - batch image ingestion with an append-only manifest.
#[derive(Parser, Debug)]
#[command(name = "darkroom")]
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
    /// Ingest source images and derive gallery artifacts
    Ingest(cli::ingest::IngestArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match darkroom_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `darkroom config path`."
            );
            darkroom_core::Config::default()
        }
    };
    logging::init(&config, cli.verbose, cli.json_logs);

    tracing::debug!("darkroom v{}", darkroom_core::VERSION);

    match cli.command {
        Commands::Ingest(args) => cli::ingest::execute(config, args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
