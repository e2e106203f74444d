//! Common test utilities for roster-sync integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use roster_connector::{
    AttributeChanges, ConnectorError, ConnectorResult, DirectorySource, DirectoryWriter,
    SourceRecord, TargetRecord,
};
use std::collections::HashSet;
use std::sync::Mutex;

/// Directory held in memory. Writes are applied to the stored users.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: Mutex<Vec<TargetRecord>>,
    writes: Mutex<Vec<(String, AttributeChanges)>>,
    failing_dns: HashSet<String>,
}

impl InMemoryDirectory {
    pub fn new(users: Vec<TargetRecord>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    /// Makes writes to `dn` fail.
    pub fn failing_on(mut self, dn: &str) -> Self {
        self.failing_dns.insert(dn.to_string());
        self
    }

    pub fn users(&self) -> Vec<TargetRecord> {
        self.users.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<(String, AttributeChanges)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectorySource for InMemoryDirectory {
    async fn list_users(&self) -> ConnectorResult<Vec<TargetRecord>> {
        Ok(self.users())
    }
}

#[async_trait]
impl DirectoryWriter for InMemoryDirectory {
    async fn update_attributes(&self, dn: &str, changes: &AttributeChanges) -> ConnectorResult<()> {
        if self.failing_dns.contains(dn) {
            return Err(ConnectorError::operation_failed(format!(
                "LDAP modify failed with code 50: insufficient access on {dn}"
            )));
        }

        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.dn == dn)
            .ok_or_else(|| ConnectorError::ObjectNotFound {
                identifier: dn.to_string(),
            })?;
        user.apply_changes(changes);

        self.writes
            .lock()
            .unwrap()
            .push((dn.to_string(), changes.clone()));
        Ok(())
    }
}

pub fn dn(name: &str) -> String {
    format!("CN={name},OU=Staff,DC=corp,DC=example,DC=com")
}

/// A worker whose fields are all populated.
pub fn worker(id: &str, name: &str) -> SourceRecord {
    SourceRecord {
        legal_name: name.to_string(),
        job_title: "Analyst".into(),
        department: "Finance".into(),
        division: "Corporate".into(),
        location: "Denver".into(),
        phone_number: "555-0100".into(),
        ..SourceRecord::new(id)
    }
}

/// A directory user agreeing with `worker(id, name)` on every mapped field.
pub fn linked_user(id: &str, name: &str) -> TargetRecord {
    TargetRecord {
        identifier: id.to_string(),
        identity: name.to_lowercase().replace(' ', "."),
        display_name: name.to_string(),
        title: "Analyst".into(),
        department: "Finance".into(),
        division: "Corporate".into(),
        office: "Denver".into(),
        phone_numbers: vec!["555-0100".into()],
        ..TargetRecord::new(dn(name))
    }
}
