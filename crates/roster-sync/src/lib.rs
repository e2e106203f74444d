//! # Roster Sync
//!
//! Reconciles HR worker records against the directory user snapshot.
//!
//! A run connects to the HR API, fetches and extracts every worker, reads
//! the directory users, and then for each worker in fetch order:
//!
//! 1. resolves the matching directory user by `employeeID`, falling back
//!    to an exact display name match,
//! 2. compares each mapped attribute and records an action per difference,
//! 3. queues writes for `UPDATE` mappings (never for `ALERT`),
//! 4. links the worker's manager,
//! 5. sends the record's writes in one batch unless running dry.
//!
//! Differences and unmatched workers are collected into a [`SyncReport`].

pub mod error;
pub mod mapping;
pub mod matcher;
pub mod orchestrator;
pub mod reconcile;
pub mod report;

pub use error::{SyncError, SyncResult};
pub use mapping::{ActionKind, FieldMapping, ValueKind, DEFAULT_MAPPINGS};
pub use matcher::{build_index, linked_identifier, resolve, MatchMethod, TargetIndex};
pub use orchestrator::{export_workers, SyncOptions, SyncOrchestrator, SyncResponse, SyncStatus};
pub use reconcile::{diff_record, ReconcileOutcome, Reconciler, RecordDiff, WriteFailure};
pub use report::{ActionRecord, ReportBuilder, SyncReport, UnmatchedRecord};
