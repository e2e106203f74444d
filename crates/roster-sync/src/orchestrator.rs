//! End-to-end run: HR session, fetch, directory snapshot, reconcile.

use roster_connector::{DirectorySource, DirectoryWriter, SourceRecord};
use roster_connector_hr::{HrClient, HrError, HrResult, Session, SessionRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::error::{SyncError, SyncResult};
use crate::reconcile::{ReconcileOutcome, Reconciler, WriteFailure};
use crate::report::SyncReport;

/// Run settings.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Report differences without writing.
    pub dry_run: bool,
    /// Records requested per HR page.
    pub page_size: u32,
    /// Connect attempts before giving up (at least one is made).
    pub connect_attempts: u32,
    /// Wait after the first failed connect; doubles per attempt.
    pub retry_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            page_size: 1000,
            connect_attempts: 1,
            retry_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Success,
    Error,
}

/// Outcome of a run. Always returned; callers check `status`.
#[derive(Debug, Default)]
pub struct SyncResponse {
    pub status: SyncStatus,
    /// First error encountered.
    pub error: Option<SyncError>,
    /// Extracted HR workers, when the fetch completed.
    pub payload: Option<Vec<SourceRecord>>,
    /// Report, when reconciliation completed.
    pub report: Option<SyncReport>,
    pub write_failures: Vec<WriteFailure>,
}

impl SyncResponse {
    fn fail(&mut self, err: SyncError) {
        self.status = SyncStatus::Error;
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }
}

/// Drives a reconciliation run against the HR API and a directory.
pub struct SyncOrchestrator {
    hr: Arc<HrClient>,
    source: Arc<dyn DirectorySource>,
    writer: Arc<dyn DirectoryWriter>,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(
        hr: Arc<HrClient>,
        source: Arc<dyn DirectorySource>,
        writer: Arc<dyn DirectoryWriter>,
        options: SyncOptions,
    ) -> Self {
        Self {
            hr,
            source,
            writer,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    async fn connect(&self, registry: &SessionRegistry) -> HrResult<Arc<Session>> {
        connect_with_retry(&self.hr, registry, &self.options).await
    }

    async fn disconnect(&self, registry: &SessionRegistry, session: Arc<Session>) -> HrResult<()> {
        disconnect_session(&self.hr, registry, session).await
    }

    /// Runs a full reconciliation.
    ///
    /// The HR session is always disconnected once connected. A failed
    /// disconnect marks the run as an error but keeps the report.
    #[instrument(skip_all, fields(dry_run = self.options.dry_run))]
    pub async fn run(&self, registry: &SessionRegistry) -> SyncResponse {
        let mut response = SyncResponse::default();

        let session = match self.connect(registry).await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Unable to connect to HR API");
                response.fail(e.into());
                return response;
            }
        };

        match self.hr.build_workers(&session, self.options.page_size).await {
            Ok(workers) => response.payload = Some(workers),
            Err(e) => {
                error!(error = %e, "Unable to fetch HR workers");
                response.fail(e.into());
            }
        }

        if let Some(workers) = response.payload.as_deref() {
            match self.reconcile(workers).await {
                Ok(outcome) => {
                    response.report = Some(outcome.report);
                    if !outcome.write_failures.is_empty() {
                        let count = outcome.write_failures.len();
                        response.write_failures = outcome.write_failures;
                        response.fail(SyncError::WriteFailures(count));
                    }
                }
                Err(e) => {
                    error!(error = %e, "Reconciliation failed");
                    response.fail(e);
                }
            }
        }

        if let Err(e) = self.disconnect(registry, session).await {
            response.fail(e.into());
        }

        info!(status = ?response.status, "Sync run finished");
        response
    }

    async fn reconcile(&self, workers: &[SourceRecord]) -> SyncResult<ReconcileOutcome> {
        let targets = self.source.list_users().await?;

        Reconciler::new(self.writer.as_ref())
            .dry_run(self.options.dry_run)
            .reconcile(workers, &targets)
            .await
    }

    /// Fetches and extracts HR workers without touching the directory.
    ///
    /// # Errors
    ///
    /// The first of connect, fetch or disconnect errors.
    pub async fn export_workers(&self, registry: &SessionRegistry) -> SyncResult<Vec<SourceRecord>> {
        export_workers(&self.hr, registry, &self.options).await
    }
}

async fn connect_with_retry(
    hr: &HrClient,
    registry: &SessionRegistry,
    options: &SyncOptions,
) -> HrResult<Arc<Session>> {
    let attempts = options.connect_attempts.max(1);
    let mut delay = options.retry_delay;
    let mut attempt = 1;

    loop {
        match hr.connect(registry).await {
            Ok(session) => return Ok(session),
            Err(e) if attempt < attempts && !matches!(e, HrError::Config(_)) => {
                warn!(attempt, attempts, error = %e, "HR connect failed, retrying");
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn disconnect_session(
    hr: &HrClient,
    registry: &SessionRegistry,
    session: Arc<Session>,
) -> HrResult<()> {
    hr.disconnect(registry, session).await.inspect_err(|e| {
        warn!(error = %e, "HR disconnect failed");
    })
}

/// Fetches and extracts HR workers with only an HR client.
///
/// Uses `page_size`, `connect_attempts` and `retry_delay` from `options`.
///
/// # Errors
///
/// The first of connect, fetch or disconnect errors.
#[instrument(skip_all)]
pub async fn export_workers(
    hr: &HrClient,
    registry: &SessionRegistry,
    options: &SyncOptions,
) -> SyncResult<Vec<SourceRecord>> {
    let session = connect_with_retry(hr, registry, options).await?;

    let workers = hr.build_workers(&session, options.page_size).await;
    let disconnected = disconnect_session(hr, registry, session).await;

    let workers = workers?;
    disconnected?;

    info!(count = workers.len(), "Exported HR workers");
    Ok(workers)
}
