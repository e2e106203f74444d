//! roster - reconcile HR worker records into Active Directory
//!
//! Commands:
//! - `sync` fetches HR workers, compares them with directory users, writes
//!   corrections (unless `--dry-run`) and produces the action and
//!   unmatched-worker reports
//! - `export-workers` fetches and normalizes HR workers as JSON

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod logging;
mod reports;

use error::CliResult;

/// roster - HR to directory reconciliation
#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Environment file to load before reading configuration
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile HR workers into the directory
    Sync(commands::sync::SyncArgs),

    /// Export normalized HR workers as JSON
    ExportWorkers(commands::export::ExportArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = config::AppConfig::load(cli.env_file.as_deref())?;
    logging::init_logging(&config.log_filter, cli.log_json)?;

    match cli.command {
        Commands::Sync(args) => commands::sync::execute(args, config).await,
        Commands::ExportWorkers(args) => commands::export::execute(args, config).await,
    }
}
