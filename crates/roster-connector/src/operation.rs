//! Attribute values and change sets for directory writes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::records::DirectoryAttribute;

/// A value for a directory attribute, which may be single or multi-valued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A single string value. An empty string clears the attribute.
    Single(String),
    /// Multiple values, in directory order.
    Multi(Vec<String>),
}

impl AttributeValue {
    /// Get the values as a list (a single value becomes a one-element list).
    pub fn as_strings(&self) -> Vec<&str> {
        match self {
            AttributeValue::Single(s) => vec![s.as_str()],
            AttributeValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Get as a string if this is a single value.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            AttributeValue::Single(s) => Some(s),
            AttributeValue::Multi(_) => None,
        }
    }

    /// Check if this is multi-valued.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, AttributeValue::Multi(_))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Single(s) => f.write_str(s),
            AttributeValue::Multi(values) => f.write_str(&values.join(", ")),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Single(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Single(s.to_string())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(values: Vec<String>) -> Self {
        AttributeValue::Multi(values)
    }
}

/// A single queued attribute write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// The directory attribute being written.
    pub attribute: DirectoryAttribute,
    /// The complete new value (replace semantics).
    pub value: AttributeValue,
}

/// Ordered set of attribute writes for one directory object.
///
/// Every change replaces the attribute's stored value; list appends are
/// expressed as the full new list. Setting the same attribute twice keeps
/// the first position and the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChanges {
    changes: Vec<AttributeChange>,
}

impl AttributeChanges {
    /// Create a new empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write for an attribute.
    pub fn set(&mut self, attribute: DirectoryAttribute, value: impl Into<AttributeValue>) {
        let value = value.into();
        match self.changes.iter_mut().find(|c| c.attribute == attribute) {
            Some(existing) => existing.value = value,
            None => self.changes.push(AttributeChange { attribute, value }),
        }
    }

    /// Queue a write using builder pattern.
    #[must_use]
    pub fn with(mut self, attribute: DirectoryAttribute, value: impl Into<AttributeValue>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Get the queued value for an attribute.
    pub fn get(&self, attribute: DirectoryAttribute) -> Option<&AttributeValue> {
        self.changes
            .iter()
            .find(|c| c.attribute == attribute)
            .map(|c| &c.value)
    }

    /// Iterate over queued writes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeChange> {
        self.changes.iter()
    }

    /// Names of the affected directory attributes, in insertion order.
    pub fn affected_attributes(&self) -> Vec<&'static str> {
        self.changes.iter().map(|c| c.attribute.ldap_name()).collect()
    }

    /// Get the number of queued writes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if no writes are queued.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeChanges {
    type Item = &'a AttributeChange;
    type IntoIter = std::slice::Iter<'a, AttributeChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_display() {
        assert_eq!(AttributeValue::from("Engineer").to_string(), "Engineer");
        let multi = AttributeValue::from(vec!["555-0100".to_string(), "555-0101".to_string()]);
        assert_eq!(multi.to_string(), "555-0100, 555-0101");
        assert!(multi.is_multi_valued());
        assert_eq!(multi.as_strings(), vec!["555-0100", "555-0101"]);
    }

    #[test]
    fn test_changes_keep_insertion_order() {
        let changes = AttributeChanges::new()
            .with(DirectoryAttribute::EmployeeId, "E100")
            .with(DirectoryAttribute::Title, "Engineer")
            .with(DirectoryAttribute::Manager, "CN=Boss,DC=example,DC=com");

        assert_eq!(
            changes.affected_attributes(),
            vec!["employeeID", "title", "manager"]
        );
    }

    #[test]
    fn test_changes_last_value_wins() {
        let changes = AttributeChanges::new()
            .with(DirectoryAttribute::Title, "Engineer")
            .with(DirectoryAttribute::Department, "R&D")
            .with(DirectoryAttribute::Title, "Senior Engineer");

        assert_eq!(changes.len(), 2);
        assert_eq!(
            changes.get(DirectoryAttribute::Title),
            Some(&AttributeValue::from("Senior Engineer"))
        );
        assert_eq!(changes.affected_attributes(), vec!["title", "department"]);
    }

    #[test]
    fn test_changes_serialize() {
        let changes = AttributeChanges::new().with(
            DirectoryAttribute::OtherTelephone,
            vec!["555-0100".to_string()],
        );
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "changes": [{"attribute": "otherTelephone", "value": ["555-0100"]}]
            })
        );
    }
}
