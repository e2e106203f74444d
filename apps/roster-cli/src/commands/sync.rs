//! `roster sync`

use clap::Args;
use roster_connector_hr::SessionRegistry;
use roster_connector_ldap::LdapDirectory;
use roster_sync::{ActionKind, SyncOptions, SyncOrchestrator, SyncStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::{hr_client, run_error};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::reports;

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Report differences without writing to the directory
    #[arg(long)]
    pub dry_run: bool,

    /// Attempts at acquiring the HR token before giving up
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub connect_attempts: u32,

    /// Seconds to wait after the first failed connect (doubles each retry)
    #[arg(long, default_value_t = 2)]
    pub retry_delay_secs: u64,
}

pub async fn execute(args: SyncArgs, mut config: AppConfig) -> CliResult<()> {
    let options = SyncOptions {
        dry_run: args.dry_run,
        page_size: config.hr.page_size,
        connect_attempts: args.connect_attempts,
        retry_delay: Duration::from_secs(args.retry_delay_secs),
    };

    let ldap = config.take_ldap()?;
    let hr = hr_client(config.hr)?;
    let directory = Arc::new(
        LdapDirectory::new(ldap).map_err(|e| CliError::Config(e.to_string()))?,
    );

    let orchestrator = SyncOrchestrator::new(hr, directory.clone(), directory.clone(), options);
    let registry = SessionRegistry::new();
    let response = orchestrator.run(&registry).await;

    if let Err(e) = directory.dispose().await {
        warn!(error = %e, "Failed to close directory connection");
    }

    if let Some(report) = &response.report {
        reports::write_reports(report, &config.reports)?;

        println!(
            "{}{} updates, {} alerts, {} unmatched workers, {} failed writes",
            if args.dry_run { "[dry run] " } else { "" },
            report.count(ActionKind::Update),
            report.count(ActionKind::Alert),
            report.unmatched().len(),
            response.write_failures.len(),
        );
    }

    match response.status {
        SyncStatus::Success => Ok(()),
        SyncStatus::Error => Err(run_error(response.error)),
    }
}
