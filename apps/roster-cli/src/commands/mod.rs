//! Command implementations

pub mod export;
pub mod sync;

use roster_connector_hr::HrClient;
use roster_sync::SyncError;
use std::sync::Arc;

use crate::error::{CliError, CliResult};

fn hr_client(config: roster_connector_hr::HrConfig) -> CliResult<Arc<HrClient>> {
    HrClient::new(config)
        .map(Arc::new)
        .map_err(|e| CliError::Config(e.to_string()))
}

fn run_error(error: Option<SyncError>) -> CliError {
    CliError::Run(
        error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string()),
    )
}
