//! Per-record diffing and the write-issuing reconciliation pass.

use roster_connector::{
    AttributeChanges, AttributeValue, DirectoryAttribute, DirectoryWriter, SourceRecord,
    TargetRecord,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::error::{SyncError, SyncResult};
use crate::mapping::{ActionKind, FieldMapping, ValueKind, DEFAULT_MAPPINGS};
use crate::matcher::{build_index, linked_identifier, resolve, TargetIndex};
use crate::report::{ActionRecord, ReportBuilder, SyncReport, UnmatchedRecord};

/// Differences found for one matched worker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordDiff {
    /// Every difference, in mapping order with the manager link last.
    pub actions: Vec<ActionRecord>,
    /// Writes queued by `UPDATE` differences.
    pub changes: AttributeChanges,
}

/// A directory write that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub worker_id: String,
    pub dn: String,
    pub error: String,
}

/// Result of reconciling a full worker set.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    pub report: SyncReport,
    /// Workers that resolved to a directory user.
    pub matched: usize,
    pub write_failures: Vec<WriteFailure>,
}

fn record_action(
    diff: &mut RecordDiff,
    source: &SourceRecord,
    attribute: DirectoryAttribute,
    action: ActionKind,
    old_value: String,
    new_value: String,
) {
    debug!(
        worker_id = %source.id,
        attribute = %attribute,
        action = %action,
        old = %old_value,
        new = %new_value,
        "Attribute differs"
    );
    diff.actions.push(ActionRecord {
        worker_id: source.id.clone(),
        full_name: source.full_name(),
        attribute,
        action,
        old_value,
        new_value,
    });
}

/// Compares one worker against its directory user.
///
/// Scalars are compared after trimming. For list attributes the HR value
/// only has to be a member of the directory list; a blank HR value is
/// never added. `managers` maps HR worker identifiers to the directory
/// users they resolved to and is used for the manager link.
pub fn diff_record(
    source: &SourceRecord,
    target: &TargetRecord,
    managers: &TargetIndex<'_>,
    mappings: &[FieldMapping],
) -> RecordDiff {
    let mut diff = RecordDiff::default();

    for mapping in mappings {
        let wanted = (mapping.source)(source);
        let wanted = wanted.trim();
        let current = target.get(mapping.attribute);

        let write = match mapping.kind {
            ValueKind::Scalar => {
                let current = current.render();
                if current.trim() == wanted {
                    continue;
                }
                record_action(
                    &mut diff,
                    source,
                    mapping.attribute,
                    mapping.action,
                    current,
                    wanted.to_string(),
                );
                AttributeValue::from(wanted)
            }
            ValueKind::List => {
                let mut values = current.to_list();
                if wanted.is_empty() || values.iter().any(|v| v.trim() == wanted) {
                    continue;
                }
                record_action(
                    &mut diff,
                    source,
                    mapping.attribute,
                    mapping.action,
                    values.join(", "),
                    wanted.to_string(),
                );
                values.push(wanted.to_string());
                AttributeValue::from(values)
            }
        };

        if mapping.action == ActionKind::Update {
            diff.changes.set(mapping.attribute, write);
        }
    }

    if let Some(supervisor) = source.supervisor() {
        match managers.get(supervisor) {
            Some(manager) => {
                let wanted = manager.dn.trim();
                let current = target.manager.as_deref().unwrap_or_default();
                if current.trim() != wanted {
                    record_action(
                        &mut diff,
                        source,
                        DirectoryAttribute::Manager,
                        ActionKind::Update,
                        current.to_string(),
                        wanted.to_string(),
                    );
                    diff.changes.set(DirectoryAttribute::Manager, wanted);
                }
            }
            None => debug!(
                worker_id = %source.id,
                supervisor,
                "Supervisor has no directory user"
            ),
        }
    }

    diff
}

/// Runs the diff over every worker and applies queued writes.
pub struct Reconciler<'a> {
    writer: &'a dyn DirectoryWriter,
    mappings: &'a [FieldMapping],
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    /// Creates a live reconciler using the default mapping table.
    pub fn new(writer: &'a dyn DirectoryWriter) -> Self {
        Self {
            writer,
            mappings: &DEFAULT_MAPPINGS,
            dry_run: false,
        }
    }

    /// When set, differences are reported but nothing is written.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_mappings(mut self, mappings: &'a [FieldMapping]) -> Self {
        self.mappings = mappings;
        self
    }

    /// Reconciles `sources` against the `targets` snapshot.
    ///
    /// Workers are processed in the given order. A failed write is
    /// recorded and the pass moves on to the next worker.
    ///
    /// # Errors
    ///
    /// `SyncError::Validation` when either input is empty.
    #[instrument(skip_all, fields(sources = sources.len(), targets = targets.len(), dry_run = self.dry_run))]
    pub async fn reconcile(
        &self,
        sources: &[SourceRecord],
        targets: &[TargetRecord],
    ) -> SyncResult<ReconcileOutcome> {
        if sources.is_empty() {
            return Err(SyncError::Validation("no HR workers to reconcile".into()));
        }

        let index = build_index(targets, linked_identifier)?;
        let resolved: Vec<_> = sources
            .iter()
            .map(|source| resolve(source, &index, targets))
            .collect();

        // Supervisors linked by name in this pass must be found too.
        let mut managers: TargetIndex<'_> = index.iter().map(|(k, v)| (*k, *v)).collect();
        for (source, found) in sources.iter().zip(&resolved) {
            if let Some((target, _)) = found {
                managers.insert(source.id.trim(), *target);
            }
        }

        let mut report = ReportBuilder::new();
        let mut write_failures = Vec::new();
        let mut matched = 0;

        for (source, found) in sources.iter().zip(resolved) {
            let Some((target, method)) = found else {
                debug!(worker_id = %source.id, "No directory user for worker");
                report.push_unmatched(UnmatchedRecord::from(source));
                continue;
            };

            matched += 1;
            debug!(worker_id = %source.id, dn = %target.dn, ?method, "Matched worker");

            let diff = diff_record(source, target, &managers, self.mappings);
            report.extend_actions(diff.actions);

            if diff.changes.is_empty() || self.dry_run {
                continue;
            }

            if let Err(e) = self.writer.update_attributes(&target.dn, &diff.changes).await {
                error!(worker_id = %source.id, dn = %target.dn, error = %e, "Directory write failed");
                write_failures.push(WriteFailure {
                    worker_id: source.id.clone(),
                    dn: target.dn.clone(),
                    error: e.to_string(),
                });
            }
        }

        let report = report.build();

        info!(
            matched,
            unmatched = report.unmatched().len(),
            updates = report.count(ActionKind::Update),
            alerts = report.count(ActionKind::Alert),
            write_failures = write_failures.len(),
            "Reconciliation complete"
        );

        Ok(ReconcileOutcome {
            report,
            matched,
            write_failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> SourceRecord {
        SourceRecord {
            legal_name: "Jane Doe".into(),
            job_title: "Engineer".into(),
            ..SourceRecord::new("E100")
        }
    }

    fn jane_target() -> TargetRecord {
        TargetRecord {
            display_name: "Jane Doe".into(),
            title: "Manager".into(),
            ..TargetRecord::new("CN=Jane Doe,OU=Staff,DC=corp,DC=example,DC=com")
        }
    }

    fn diff(source: &SourceRecord, target: &TargetRecord, all: &[TargetRecord]) -> RecordDiff {
        let index = build_index(all, linked_identifier).unwrap();
        diff_record(source, target, &index, &DEFAULT_MAPPINGS)
    }

    #[test]
    fn test_jane_doe_scenario() {
        let target = jane_target();
        let result = diff(&jane(), &target, std::slice::from_ref(&target));

        let summary: Vec<_> = result
            .actions
            .iter()
            .map(|a| (a.attribute, a.action, a.old_value.as_str(), a.new_value.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (DirectoryAttribute::EmployeeId, ActionKind::Update, "", "E100"),
                (DirectoryAttribute::Title, ActionKind::Update, "Manager", "Engineer"),
            ]
        );
        assert_eq!(
            result.changes.affected_attributes(),
            vec!["employeeID", "title"]
        );
    }

    #[test]
    fn test_trimmed_scalars_equal() {
        let source = SourceRecord {
            job_title: "  Engineer ".into(),
            ..jane()
        };
        let target = TargetRecord {
            identifier: "E100".into(),
            title: "Engineer  ".into(),
            ..jane_target()
        };
        let result = diff(&source, &target, std::slice::from_ref(&target));
        assert!(result.actions.is_empty());
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_alert_never_writes() {
        let source = SourceRecord {
            legal_name: "Jane Smith".into(),
            ..jane()
        };
        let target = TargetRecord {
            identifier: "E100".into(),
            title: "Engineer".into(),
            ..jane_target()
        };
        let result = diff(&source, &target, std::slice::from_ref(&target));

        assert_eq!(result.actions.len(), 1);
        assert_eq!(result.actions[0].action, ActionKind::Alert);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_list_membership_ignores_order() {
        let source = SourceRecord {
            phone_number: "555-0101".into(),
            ..jane()
        };
        let target = TargetRecord {
            identifier: "E100".into(),
            title: "Engineer".into(),
            phone_numbers: vec!["555-0100".into(), " 555-0101".into()],
            ..jane_target()
        };
        let result = diff(&source, &target, std::slice::from_ref(&target));
        assert!(result.actions.is_empty());
    }

    #[test]
    fn test_list_append() {
        let source = SourceRecord {
            phone_number: "555-0199".into(),
            ..jane()
        };
        let target = TargetRecord {
            identifier: "E100".into(),
            title: "Engineer".into(),
            phone_numbers: vec!["555-0100".into()],
            ..jane_target()
        };
        let result = diff(&source, &target, std::slice::from_ref(&target));

        assert_eq!(result.actions[0].old_value, "555-0100");
        assert_eq!(result.actions[0].new_value, "555-0199");
        assert_eq!(
            result.changes.get(DirectoryAttribute::OtherTelephone),
            Some(&AttributeValue::Multi(vec![
                "555-0100".into(),
                "555-0199".into()
            ]))
        );
    }

    #[test]
    fn test_blank_phone_is_not_appended() {
        let target = TargetRecord {
            identifier: "E100".into(),
            title: "Engineer".into(),
            ..jane_target()
        };
        let result = diff(&jane(), &target, std::slice::from_ref(&target));
        assert!(result
            .actions
            .iter()
            .all(|a| a.attribute != DirectoryAttribute::OtherTelephone));
    }

    #[test]
    fn test_manager_link() {
        let boss = TargetRecord {
            identifier: "E001".into(),
            display_name: "Sam Boss".into(),
            ..TargetRecord::new("CN=Sam Boss,OU=Staff,DC=corp,DC=example,DC=com")
        };
        let target = TargetRecord {
            identifier: "E100".into(),
            title: "Engineer".into(),
            ..jane_target()
        };
        let source = SourceRecord {
            supervisor_id: Some("E001".into()),
            ..jane()
        };
        let all = vec![boss, target.clone()];
        let result = diff(&source, &target, &all);

        assert_eq!(result.actions.len(), 1);
        assert_eq!(result.actions[0].attribute, DirectoryAttribute::Manager);
        assert_eq!(result.actions[0].old_value, "");
        assert_eq!(
            result.changes.get(DirectoryAttribute::Manager),
            Some(&AttributeValue::from(
                "CN=Sam Boss,OU=Staff,DC=corp,DC=example,DC=com"
            ))
        );
    }

    #[test]
    fn test_unknown_supervisor_ignored() {
        let target = TargetRecord {
            identifier: "E100".into(),
            title: "Engineer".into(),
            ..jane_target()
        };
        let source = SourceRecord {
            supervisor_id: Some("E999".into()),
            ..jane()
        };
        let result = diff(&source, &target, std::slice::from_ref(&target));
        assert!(result.actions.is_empty());
    }
}
