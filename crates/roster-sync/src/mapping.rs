//! Field mapping table between HR worker fields and directory attributes.

use roster_connector::{DirectoryAttribute, SourceRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do when an attribute differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    /// Record the difference and write the HR value.
    Update,
    /// Record the difference only.
    Alert,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Update => f.write_str("UPDATE"),
            ActionKind::Alert => f.write_str("ALERT"),
        }
    }
}

/// How the directory side stores the attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    /// The directory holds a list; the HR value must be a member of it.
    List,
}

/// One row of the mapping table.
#[derive(Clone, Copy)]
pub struct FieldMapping {
    pub attribute: DirectoryAttribute,
    pub action: ActionKind,
    pub kind: ValueKind,
    /// Reads the HR value for this attribute.
    pub source: fn(&SourceRecord) -> String,
}

impl fmt::Debug for FieldMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapping")
            .field("attribute", &self.attribute)
            .field("action", &self.action)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn worker_id(record: &SourceRecord) -> String {
    record.id.clone()
}

fn full_name(record: &SourceRecord) -> String {
    record.full_name()
}

fn job_title(record: &SourceRecord) -> String {
    record.job_title.clone()
}

fn department(record: &SourceRecord) -> String {
    record.department.clone()
}

fn division(record: &SourceRecord) -> String {
    record.division.clone()
}

fn location(record: &SourceRecord) -> String {
    record.location.clone()
}

fn phone_number(record: &SourceRecord) -> String {
    record.phone_number.clone()
}

/// Mappings evaluated for every matched worker, in this order.
///
/// The manager link is handled separately since it needs the index.
pub static DEFAULT_MAPPINGS: [FieldMapping; 7] = [
    FieldMapping {
        attribute: DirectoryAttribute::EmployeeId,
        action: ActionKind::Update,
        kind: ValueKind::Scalar,
        source: worker_id,
    },
    FieldMapping {
        attribute: DirectoryAttribute::DisplayName,
        action: ActionKind::Alert,
        kind: ValueKind::Scalar,
        source: full_name,
    },
    FieldMapping {
        attribute: DirectoryAttribute::Title,
        action: ActionKind::Update,
        kind: ValueKind::Scalar,
        source: job_title,
    },
    FieldMapping {
        attribute: DirectoryAttribute::Department,
        action: ActionKind::Update,
        kind: ValueKind::Scalar,
        source: department,
    },
    FieldMapping {
        attribute: DirectoryAttribute::Division,
        action: ActionKind::Update,
        kind: ValueKind::Scalar,
        source: division,
    },
    FieldMapping {
        attribute: DirectoryAttribute::Office,
        action: ActionKind::Update,
        kind: ValueKind::Scalar,
        source: location,
    },
    FieldMapping {
        attribute: DirectoryAttribute::OtherTelephone,
        action: ActionKind::Update,
        kind: ValueKind::List,
        source: phone_number,
    },
];
