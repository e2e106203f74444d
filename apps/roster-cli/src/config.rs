//! Application configuration from `ROSTER_*` environment variables.

use roster_connector_hr::HrConfig;
use roster_connector_ldap::LdapConfig;
use std::env::VarError;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_ACTIONS_REPORT: &str = "actions.csv";
const DEFAULT_UNMATCHED_REPORT: &str = "unmatched.csv";
const DEFAULT_LOG_FILTER: &str = "info";

const LDAP_VARS: [&str; 5] = [
    "ROSTER_LDAP_URL",
    "ROSTER_LDAP_BIND_DN",
    "ROSTER_LDAP_BIND_PASSWORD",
    "ROSTER_LDAP_BASE_DN",
    "ROSTER_LDAP_USER_FILTER",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("cannot load env file {0}: {1}")]
    EnvFile(PathBuf, String),
}

/// Output locations of the two CSV reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub actions: PathBuf,
    pub unmatched: PathBuf,
}

#[derive(Debug)]
pub struct AppConfig {
    pub hr: HrConfig,
    /// Present when any `ROSTER_LDAP_*` variable is set.
    pub ldap: Option<LdapConfig>,
    pub reports: ReportPaths,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl AppConfig {
    /// Loads an env file (the given one, or `.env` if present) and then
    /// reads the process environment.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)
                    .map_err(|e| ConfigError::EnvFile(path.to_path_buf(), e.to_string()))?;
            }
            None => {
                let _ = dotenvy::dotenv();
            }
        }

        Self::from_env()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// Blank values count as unset.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let optional = |key: &str| reader(key).ok().filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| optional(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()));

        let mut hr = HrConfig::builder()
            .api_url(required("ROSTER_HR_API_URL")?)
            .token_url(required("ROSTER_HR_TOKEN_URL")?)
            .disconnect_url(required("ROSTER_HR_DISCONNECT_URL")?)
            .client_id(required("ROSTER_HR_CLIENT_ID")?)
            .client_secret(required("ROSTER_HR_CLIENT_SECRET")?);

        if let Some(grant_type) = optional("ROSTER_HR_GRANT_TYPE") {
            hr = hr.grant_type(grant_type);
        }
        if let Some(user_agent) = optional("ROSTER_HR_USER_AGENT") {
            hr = hr.user_agent(user_agent);
        }
        match (optional("ROSTER_HR_CERT_PATH"), optional("ROSTER_HR_KEY_PATH")) {
            (Some(cert), Some(key)) => hr = hr.client_certificate(cert, key),
            (None, None) => {}
            (Some(_), None) => return Err(ConfigError::MissingVar("ROSTER_HR_KEY_PATH".into())),
            (None, Some(_)) => return Err(ConfigError::MissingVar("ROSTER_HR_CERT_PATH".into())),
        }
        if let Some(page_size) = optional("ROSTER_HR_PAGE_SIZE") {
            let page_size = page_size.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("ROSTER_HR_PAGE_SIZE".into(), e.to_string())
            })?;
            hr = hr.page_size(page_size);
        }

        let hr = hr
            .build()
            .map_err(|e| ConfigError::InvalidValue("ROSTER_HR_*".into(), e.to_string()))?;

        let ldap = if LDAP_VARS.iter().any(|key| optional(key).is_some()) {
            let mut ldap = LdapConfig::builder()
                .url(required("ROSTER_LDAP_URL")?)
                .bind(
                    required("ROSTER_LDAP_BIND_DN")?,
                    required("ROSTER_LDAP_BIND_PASSWORD")?,
                )
                .base_dn(required("ROSTER_LDAP_BASE_DN")?);

            if let Some(filter) = optional("ROSTER_LDAP_USER_FILTER") {
                ldap = ldap.user_filter(filter);
            }

            Some(ldap.build().map_err(|e| {
                ConfigError::InvalidValue("ROSTER_LDAP_*".into(), e.to_string())
            })?)
        } else {
            None
        };

        let reports = ReportPaths {
            actions: optional("ROSTER_REPORT_ACTIONS")
                .unwrap_or_else(|| DEFAULT_ACTIONS_REPORT.to_string())
                .into(),
            unmatched: optional("ROSTER_REPORT_UNMATCHED")
                .unwrap_or_else(|| DEFAULT_UNMATCHED_REPORT.to_string())
                .into(),
        };

        Ok(Self {
            hr,
            ldap,
            reports,
            log_filter: optional("ROSTER_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Takes the directory settings, which only `sync` needs.
    pub fn take_ldap(&mut self) -> Result<LdapConfig, ConfigError> {
        self.ldap
            .take()
            .ok_or_else(|| ConfigError::MissingVar("ROSTER_LDAP_URL".into()))
    }
}
