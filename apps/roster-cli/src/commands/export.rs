//! `roster export-workers`

use clap::Args;
use roster_connector_hr::SessionRegistry;
use roster_sync::SyncOptions;
use std::path::PathBuf;

use super::{hr_client, run_error};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::reports;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write JSON to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub async fn execute(args: ExportArgs, config: AppConfig) -> CliResult<()> {
    let options = SyncOptions {
        page_size: config.hr.page_size,
        ..SyncOptions::default()
    };

    let hr = hr_client(config.hr)?;
    let workers = roster_sync::export_workers(&hr, &SessionRegistry::new(), &options)
        .await
        .map_err(|e| run_error(Some(e)))?;

    reports::export_workers(&workers, args.output.as_deref())
}
