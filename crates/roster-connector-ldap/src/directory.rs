//! Directory connection, user snapshot and attribute writes.

use async_trait::async_trait;
use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, Scope, SearchEntry};
use roster_connector::{
    AttributeChanges, ConnectorError, ConnectorResult, DirectorySource, DirectoryWriter,
    TargetRecord,
};
use secrecy::ExposeSecret;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::{LdapConfig, USER_ATTRIBUTES};

const RC_SUCCESS: u32 = 0;
const RC_NO_SUCH_OBJECT: u32 = 32;
const RC_INVALID_CREDENTIALS: u32 = 49;

/// Active Directory backed by an LDAP connection.
///
/// The connection is opened lazily on first use and reused until
/// [`dispose`](Self::dispose) is called.
pub struct LdapDirectory {
    config: LdapConfig,
    connection: Arc<RwLock<Option<Ldap>>>,
    disposed: Arc<RwLock<bool>>,
}

impl LdapDirectory {
    /// Creates a directory handle. No connection is made yet.
    pub fn new(config: LdapConfig) -> ConnectorResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            connection: Arc::new(RwLock::new(None)),
            disposed: Arc::new(RwLock::new(false)),
        })
    }

    pub fn config(&self) -> &LdapConfig {
        &self.config
    }

    async fn get_connection(&self) -> ConnectorResult<Ldap> {
        if *self.disposed.read().await {
            return Err(ConnectorError::Disposed);
        }

        {
            let guard = self.connection.read().await;
            if let Some(ref ldap) = *guard {
                return Ok(ldap.clone());
            }
        }

        let ldap = self.create_connection().await?;
        *self.connection.write().await = Some(ldap.clone());

        Ok(ldap)
    }

    async fn create_connection(&self) -> ConnectorResult<Ldap> {
        let url = &self.config.url;
        debug!(url = %url, "Connecting to directory");

        let settings = LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(self.config.connect_timeout_secs))
            .set_starttls(self.config.starttls);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, url)
            .await
            .map_err(|e| {
                ConnectorError::connection_failed_with_source(
                    format!("Failed to connect to directory at {url}"),
                    e,
                )
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        let bind_dn = &self.config.bind_dn;
        debug!(bind_dn = %bind_dn, "Performing LDAP bind");

        let result = ldap
            .simple_bind(bind_dn, self.config.bind_password.expose_secret())
            .await
            .map_err(|e| {
                ConnectorError::connection_failed_with_source(
                    format!("LDAP bind failed for {bind_dn}"),
                    e,
                )
            })?;

        match result.rc {
            RC_SUCCESS => {}
            RC_INVALID_CREDENTIALS => return Err(ConnectorError::AuthenticationFailed),
            rc => {
                return Err(ConnectorError::connection_failed(format!(
                    "LDAP bind failed with code {rc}: {}",
                    result.text
                )))
            }
        }

        info!(url = %url, "Directory connection established");
        Ok(ldap)
    }

    /// Unbinds and refuses further use.
    pub async fn dispose(&self) -> ConnectorResult<()> {
        *self.disposed.write().await = true;

        if let Some(mut ldap) = self.connection.write().await.take() {
            if let Err(e) = ldap.unbind().await {
                warn!(error = %e, "Error during LDAP unbind");
            }
        }

        debug!("Directory connection disposed");
        Ok(())
    }
}

fn first_value(attrs: &HashMap<String, Vec<String>>, name: &str) -> Option<String> {
    all_values(attrs, name).and_then(|values| values.first().cloned())
}

fn all_values<'a>(attrs: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a Vec<String>> {
    attrs
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, values)| values)
}

/// Converts a search entry into a directory user record.
///
/// Absent attributes become empty strings; an absent manager is `None`.
pub fn entry_to_target_record(entry: SearchEntry) -> TargetRecord {
    let attrs = &entry.attrs;
    let text = |name: &str| first_value(attrs, name).unwrap_or_default();

    let dn = first_value(attrs, "distinguishedName").unwrap_or_else(|| entry.dn.clone());

    TargetRecord {
        dn,
        identifier: text("employeeID"),
        identity: text("sAMAccountName"),
        display_name: text("displayName"),
        title: text("title"),
        description: text("description"),
        department: text("department"),
        division: text("division"),
        office: text("physicalDeliveryOfficeName"),
        phone_numbers: all_values(attrs, "otherTelephone")
            .cloned()
            .unwrap_or_default(),
        manager: first_value(attrs, "manager").filter(|dn| !dn.is_empty()),
    }
}

/// Builds one modify-replace per change, in order.
///
/// Empty values are dropped, so replacing with `""` clears the attribute.
pub fn build_mods(changes: &AttributeChanges) -> Vec<Mod<String>> {
    changes
        .iter()
        .map(|change| {
            let values: HashSet<String> = change
                .value
                .as_strings()
                .into_iter()
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect();
            Mod::Replace(change.attribute.ldap_name().to_string(), values)
        })
        .collect()
}

#[async_trait]
impl DirectorySource for LdapDirectory {
    #[instrument(skip(self), fields(base_dn = %self.config.base_dn))]
    async fn list_users(&self) -> ConnectorResult<Vec<TargetRecord>> {
        let mut ldap = self.get_connection().await?;

        let adapters: Vec<Box<dyn Adapter<_, _>>> = vec![
            Box::new(EntriesOnly::new()),
            Box::new(PagedResults::new(self.config.page_size)),
        ];

        let mut search = ldap
            .streaming_search_with(
                adapters,
                &self.config.base_dn,
                Scope::Subtree,
                &self.config.user_filter,
                USER_ATTRIBUTES.to_vec(),
            )
            .await
            .map_err(|e| ConnectorError::operation_failed_with_source("User search failed", e))?;

        let mut users = Vec::new();
        while let Some(entry) = search
            .next()
            .await
            .map_err(|e| ConnectorError::operation_failed_with_source("User search failed", e))?
        {
            users.push(entry_to_target_record(SearchEntry::construct(entry)));
        }

        search.finish().await.success().map_err(|e| {
            ConnectorError::operation_failed_with_source("User search did not complete", e)
        })?;

        info!(count = users.len(), "Retrieved directory users");
        Ok(users)
    }
}

#[async_trait]
impl DirectoryWriter for LdapDirectory {
    #[instrument(skip(self, changes), fields(attributes = ?changes.affected_attributes()))]
    async fn update_attributes(&self, dn: &str, changes: &AttributeChanges) -> ConnectorResult<()> {
        let mods = build_mods(changes);
        if mods.is_empty() {
            return Ok(());
        }

        let mut ldap = self.get_connection().await?;

        let result = ldap.modify(dn, mods).await.map_err(|e| {
            ConnectorError::operation_failed_with_source(format!("Failed to update entry: {dn}"), e)
        })?;

        match result.rc {
            RC_SUCCESS => {
                debug!(dn, "Directory entry updated");
                Ok(())
            }
            RC_NO_SUCH_OBJECT => Err(ConnectorError::ObjectNotFound {
                identifier: dn.to_string(),
            }),
            rc => Err(ConnectorError::operation_failed(format!(
                "LDAP modify failed with code {rc}: {}",
                result.text
            ))),
        }
    }
}
