//! LDAP connector configuration.

use roster_connector::{ConnectorError, ConnectorResult};
use secrecy::SecretString;

/// Filter selecting person user objects.
pub const DEFAULT_USER_FILTER: &str = "(&(objectCategory=person)(objectClass=user))";

/// Attributes requested for every user entry.
pub const USER_ATTRIBUTES: [&str; 11] = [
    "distinguishedName",
    "employeeID",
    "sAMAccountName",
    "displayName",
    "title",
    "description",
    "department",
    "division",
    "physicalDeliveryOfficeName",
    "otherTelephone",
    "manager",
];

const DEFAULT_PAGE_SIZE: i32 = 500;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Directory connection settings.
#[derive(Debug)]
pub struct LdapConfig {
    /// Server URL, `ldap://` or `ldaps://`.
    pub url: String,
    pub bind_dn: String,
    pub bind_password: SecretString,
    /// Search base for user entries.
    pub base_dn: String,
    pub user_filter: String,
    /// Entries per page of the paged-results control.
    pub page_size: i32,
    pub connect_timeout_secs: u64,
    /// Upgrade a plain `ldap://` connection with STARTTLS.
    pub starttls: bool,
}

impl LdapConfig {
    #[must_use]
    pub fn builder() -> LdapConfigBuilder {
        LdapConfigBuilder::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConnectorResult<()> {
        let invalid = |message: &str| ConnectorError::InvalidConfiguration {
            message: message.to_string(),
        };

        if !(self.url.starts_with("ldap://") || self.url.starts_with("ldaps://")) {
            return Err(invalid("url must start with ldap:// or ldaps://"));
        }
        if self.starttls && self.url.starts_with("ldaps://") {
            return Err(invalid("starttls cannot be combined with ldaps://"));
        }
        if self.bind_dn.trim().is_empty() {
            return Err(invalid("bind_dn is required"));
        }
        if self.base_dn.trim().is_empty() {
            return Err(invalid("base_dn is required"));
        }
        if self.page_size <= 0 {
            return Err(invalid("page_size must be positive"));
        }
        Ok(())
    }
}

/// Builder for `LdapConfig`.
#[derive(Debug, Default)]
pub struct LdapConfigBuilder {
    url: Option<String>,
    bind_dn: Option<String>,
    bind_password: Option<SecretString>,
    base_dn: Option<String>,
    user_filter: Option<String>,
    page_size: Option<i32>,
    connect_timeout_secs: Option<u64>,
    starttls: bool,
}

impl LdapConfigBuilder {
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the bind credentials.
    #[must_use]
    pub fn bind(mut self, dn: impl Into<String>, password: impl Into<String>) -> Self {
        self.bind_dn = Some(dn.into());
        self.bind_password = Some(SecretString::from(password.into()));
        self
    }

    #[must_use]
    pub fn base_dn(mut self, base_dn: impl Into<String>) -> Self {
        self.base_dn = Some(base_dn.into());
        self
    }

    #[must_use]
    pub fn user_filter(mut self, filter: impl Into<String>) -> Self {
        self.user_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn starttls(mut self, enabled: bool) -> Self {
        self.starttls = enabled;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> ConnectorResult<LdapConfig> {
        let missing = |name: &str| ConnectorError::InvalidConfiguration {
            message: format!("{name} is required"),
        };

        let config = LdapConfig {
            url: self.url.ok_or_else(|| missing("url"))?,
            bind_dn: self.bind_dn.ok_or_else(|| missing("bind_dn"))?,
            bind_password: self.bind_password.ok_or_else(|| missing("bind_password"))?,
            base_dn: self.base_dn.ok_or_else(|| missing("base_dn"))?,
            user_filter: self
                .user_filter
                .unwrap_or_else(|| DEFAULT_USER_FILTER.to_string()),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            connect_timeout_secs: self
                .connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            starttls: self.starttls,
        };

        config.validate()?;
        Ok(config)
    }
}
