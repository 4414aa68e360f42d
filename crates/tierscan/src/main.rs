//! tierscan CLI - classify an image collection by resolution tier.
//!
//! Each run discovers the images in a directory, measures them on a worker
//! pool and writes a JSON and a CSV report named after the run timestamp.
//!
//! # Usage
//!
//! ```bash
//! # Classify the configured input directory
//! tierscan run
//!
//! # Classify a specific directory with 8 workers
//! tierscan run ./photos -o ./reports -p 8
//!
//! # List what would be processed
//! tierscan discover ./photos --format jsonl
//!
//! # View configuration
//! tierscan config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// tierscan - classify images by resolution tier.
#[derive(Parser, Debug)]
#[command(name = "tierscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "TIERSCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every image in a directory and write the run report
    Run(cli::run::RunArgs),

    /// List the images a run would process, without processing them
    Discover(cli::discover::DiscoverArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = cli::load_config(cli.config.as_deref())?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("tierscan v{}", tierscan_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Discover(args) => cli::discover::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}
