//! Matching HR workers to directory users.

use roster_connector::{SourceRecord, TargetRecord};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};

/// Directory users keyed by linked HR identifier.
pub type TargetIndex<'a> = HashMap<&'a str, &'a TargetRecord>;

/// How a worker was matched to a directory user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    /// Linked identifier lookup.
    Identifier,
    /// Exact display name fallback.
    DisplayName,
}

/// Index key for directory users: the linked HR identifier.
///
/// Always present. An unlinked user exposes an empty identifier, which
/// `build_index` skips, so this never produces `SyncError::Mapping`.
pub fn linked_identifier(target: &TargetRecord) -> Option<&str> {
    Some(target.identifier.as_str())
}

/// Builds a lookup index over `records` using `key`.
///
/// Blank keys are left out of the index. When two records share a key the
/// later one wins.
///
/// # Errors
///
/// `SyncError::Validation` when `records` is empty, `SyncError::Mapping`
/// when `key` yields nothing for some record.
pub fn build_index<'a, T, K>(records: &'a [T], key: K) -> SyncResult<HashMap<&'a str, &'a T>>
where
    K: Fn(&'a T) -> Option<&'a str>,
{
    if records.is_empty() {
        return Err(SyncError::Validation(
            "cannot build an index over an empty record set".into(),
        ));
    }

    let mut index = HashMap::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let value = key(record).ok_or_else(|| {
            SyncError::Mapping(format!("record at position {position} has no key attribute"))
        })?;

        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        if index.insert(value, record).is_some() {
            warn!(key = value, "Duplicate index key, later record wins");
        }
    }

    debug!(entries = index.len(), "Built record index");
    Ok(index)
}

/// Finds the directory user for a worker.
///
/// The identifier index is consulted first; only on a miss are targets
/// scanned for a display name equal to the worker's full name.
pub fn resolve<'a>(
    source: &SourceRecord,
    index: &TargetIndex<'a>,
    targets: &'a [TargetRecord],
) -> Option<(&'a TargetRecord, MatchMethod)> {
    if let Some(target) = index.get(source.id.trim()) {
        return Some((*target, MatchMethod::Identifier));
    }

    let name = source.full_name();
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    targets
        .iter()
        .find(|target| target.display_name.trim() == name)
        .map(|target| (target, MatchMethod::DisplayName))
}
