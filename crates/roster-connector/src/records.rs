//! Normalized HR worker and directory user records.
//!
//! Both record kinds are plain data. Directory attributes are addressed
//! through the [`DirectoryAttribute`] enumeration, which pairs each
//! attribute with a typed getter and setter on [`TargetRecord`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::operation::{AttributeChange, AttributeChanges, AttributeValue};

/// A personnel record from the HR system, the authority for what should be true.
///
/// Scalar fields default to the empty string when the HR payload omits them.
/// Dates are `None` when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// HR worker identifier (unique key).
    pub id: String,
    /// Legal formatted name, e.g. "Jane Doe".
    pub legal_name: String,
    pub given_name: String,
    pub middle_name: String,
    pub family_name: String,
    pub job_title: String,
    pub department: String,
    pub division: String,
    pub location: String,
    pub phone_number: String,
    /// Identifier of the worker's supervisor, if any.
    pub supervisor_id: Option<String>,
    /// Supervisor formatted name as reported by HR.
    pub supervisor_name: String,
    pub hire_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
    pub status_effective_date: Option<NaiveDate>,
}

impl SourceRecord {
    /// Create a record with only the identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// The worker's declared name: the legal name, or given and family
    /// name when HR sent no formatted legal name.
    pub fn full_name(&self) -> String {
        if !self.legal_name.trim().is_empty() {
            return self.legal_name.clone();
        }
        format!("{} {}", self.given_name.trim(), self.family_name.trim())
            .trim()
            .to_string()
    }

    /// Supervisor identifier, if declared and non-blank.
    pub fn supervisor(&self) -> Option<&str> {
        self.supervisor_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// A directory user record, the entity being corrected to match HR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// Distinguished name, the write target.
    pub dn: String,
    /// Linked HR identifier (`employeeID`). Empty when never linked.
    pub identifier: String,
    /// Login name (`sAMAccountName`).
    pub identity: String,
    pub display_name: String,
    pub title: String,
    pub description: String,
    pub department: String,
    pub division: String,
    pub office: String,
    pub phone_numbers: Vec<String>,
    /// Distinguished name of the manager entry.
    pub manager: Option<String>,
}

/// A borrowed view of a directory attribute's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetValue<'a> {
    Scalar(&'a str),
    List(&'a [String]),
}

impl TargetValue<'_> {
    /// Render the value for reports.
    pub fn render(&self) -> String {
        match self {
            TargetValue::Scalar(s) => (*s).to_string(),
            TargetValue::List(values) => values.join(", "),
        }
    }

    /// Values as an owned list; a blank scalar becomes an empty list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            TargetValue::Scalar(s) if s.trim().is_empty() => Vec::new(),
            TargetValue::Scalar(s) => vec![(*s).to_string()],
            TargetValue::List(values) => values.to_vec(),
        }
    }
}

/// Directory attributes the engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectoryAttribute {
    #[serde(rename = "employeeID")]
    EmployeeId,
    #[serde(rename = "displayName")]
    DisplayName,
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "department")]
    Department,
    #[serde(rename = "division")]
    Division,
    #[serde(rename = "physicalDeliveryOfficeName")]
    Office,
    #[serde(rename = "otherTelephone")]
    OtherTelephone,
    #[serde(rename = "manager")]
    Manager,
}

impl DirectoryAttribute {
    /// Every writable attribute, in declaration order.
    pub const ALL: [DirectoryAttribute; 9] = [
        DirectoryAttribute::EmployeeId,
        DirectoryAttribute::DisplayName,
        DirectoryAttribute::Title,
        DirectoryAttribute::Description,
        DirectoryAttribute::Department,
        DirectoryAttribute::Division,
        DirectoryAttribute::Office,
        DirectoryAttribute::OtherTelephone,
        DirectoryAttribute::Manager,
    ];

    /// The LDAP attribute name.
    pub fn ldap_name(self) -> &'static str {
        match self {
            DirectoryAttribute::EmployeeId => "employeeID",
            DirectoryAttribute::DisplayName => "displayName",
            DirectoryAttribute::Title => "title",
            DirectoryAttribute::Description => "description",
            DirectoryAttribute::Department => "department",
            DirectoryAttribute::Division => "division",
            DirectoryAttribute::Office => "physicalDeliveryOfficeName",
            DirectoryAttribute::OtherTelephone => "otherTelephone",
            DirectoryAttribute::Manager => "manager",
        }
    }

    /// Look up an attribute by LDAP name (case-insensitive, as LDAP is).
    pub fn from_ldap_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.ldap_name().eq_ignore_ascii_case(name))
    }

    /// Whether the directory stores a list for this attribute.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, DirectoryAttribute::OtherTelephone)
    }
}

impl fmt::Display for DirectoryAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ldap_name())
    }
}

impl TargetRecord {
    /// Create a record with only the distinguished name set.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            ..Self::default()
        }
    }

    /// Read an attribute's current value.
    pub fn get(&self, attribute: DirectoryAttribute) -> TargetValue<'_> {
        match attribute {
            DirectoryAttribute::EmployeeId => TargetValue::Scalar(&self.identifier),
            DirectoryAttribute::DisplayName => TargetValue::Scalar(&self.display_name),
            DirectoryAttribute::Title => TargetValue::Scalar(&self.title),
            DirectoryAttribute::Description => TargetValue::Scalar(&self.description),
            DirectoryAttribute::Department => TargetValue::Scalar(&self.department),
            DirectoryAttribute::Division => TargetValue::Scalar(&self.division),
            DirectoryAttribute::Office => TargetValue::Scalar(&self.office),
            DirectoryAttribute::OtherTelephone => TargetValue::List(&self.phone_numbers),
            DirectoryAttribute::Manager => {
                TargetValue::Scalar(self.manager.as_deref().unwrap_or_default())
            }
        }
    }

    /// Overwrite an attribute with a new value.
    pub fn set(&mut self, attribute: DirectoryAttribute, value: &AttributeValue) {
        let scalar = || match value {
            AttributeValue::Single(s) => s.clone(),
            AttributeValue::Multi(values) => values.first().cloned().unwrap_or_default(),
        };

        match attribute {
            DirectoryAttribute::EmployeeId => self.identifier = scalar(),
            DirectoryAttribute::DisplayName => self.display_name = scalar(),
            DirectoryAttribute::Title => self.title = scalar(),
            DirectoryAttribute::Description => self.description = scalar(),
            DirectoryAttribute::Department => self.department = scalar(),
            DirectoryAttribute::Division => self.division = scalar(),
            DirectoryAttribute::Office => self.office = scalar(),
            DirectoryAttribute::OtherTelephone => {
                self.phone_numbers = value
                    .as_strings()
                    .into_iter()
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .collect();
            }
            DirectoryAttribute::Manager => {
                let dn = scalar();
                self.manager = if dn.is_empty() { None } else { Some(dn) };
            }
        }
    }

    /// Apply one queued write.
    pub fn apply(&mut self, change: &AttributeChange) {
        self.set(change.attribute, &change.value);
    }

    /// Apply a batch of queued writes in order.
    pub fn apply_changes(&mut self, changes: &AttributeChanges) {
        for change in changes {
            self.apply(change);
        }
    }
}
