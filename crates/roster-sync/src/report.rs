//! Action and unmatched-worker reports.

use roster_connector::{DirectoryAttribute, SourceRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mapping::ActionKind;

/// One detected difference between HR and the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "workerID")]
    pub worker_id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub attribute: DirectoryAttribute,
    pub action: ActionKind,
    #[serde(rename = "oldValue")]
    pub old_value: String,
    #[serde(rename = "newValue")]
    pub new_value: String,
}

/// A worker with no directory counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedRecord {
    #[serde(rename = "workerID")]
    pub worker_id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    pub division: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "managerID")]
    pub manager_id: String,
    #[serde(rename = "managerName")]
    pub manager_name: String,
}

impl From<&SourceRecord> for UnmatchedRecord {
    fn from(record: &SourceRecord) -> Self {
        Self {
            worker_id: record.id.clone(),
            full_name: record.full_name(),
            job_title: record.job_title.clone(),
            division: record.division.clone(),
            department: record.department.clone(),
            location: record.location.clone(),
            manager_id: record.supervisor_id.clone().unwrap_or_default(),
            manager_name: record.supervisor_name.clone(),
        }
    }
}

/// Accumulates report rows in processing order.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    actions: Vec<ActionRecord>,
    unmatched: Vec<UnmatchedRecord>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_action(&mut self, action: ActionRecord) {
        self.actions.push(action);
    }

    pub fn extend_actions(&mut self, actions: impl IntoIterator<Item = ActionRecord>) {
        self.actions.extend(actions);
    }

    pub fn push_unmatched(&mut self, record: UnmatchedRecord) {
        self.unmatched.push(record);
    }

    /// Freezes the collected rows.
    pub fn build(self) -> SyncReport {
        if self.actions.is_empty() {
            info!("No actions in report");
        }
        if self.unmatched.is_empty() {
            info!("No unmatched workers in report");
        }

        SyncReport {
            actions: self.actions,
            unmatched: self.unmatched,
        }
    }
}

/// Immutable result of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    actions: Vec<ActionRecord>,
    unmatched: Vec<UnmatchedRecord>,
}

impl SyncReport {
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn unmatched(&self) -> &[UnmatchedRecord] {
        &self.unmatched
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.action == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.unmatched.is_empty()
    }
}
