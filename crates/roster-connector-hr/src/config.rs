//! Configuration for the HR connector.

use reqwest::Url;
use secrecy::SecretString;
use std::path::PathBuf;

use crate::client::CONTINUATION_THRESHOLD;
use crate::{HrError, HrResult};

const DEFAULT_GRANT_TYPE: &str = "client_credentials";
const DEFAULT_USER_AGENT: &str = concat!("roster/", env!("CARGO_PKG_VERSION"));
const DEFAULT_PAGE_SIZE: u32 = 1000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HR API connection settings.
#[derive(Debug)]
pub struct HrConfig {
    /// Base URL for API requests (e.g. `https://api.example.com`).
    pub api_url: String,
    /// `OAuth2` token endpoint.
    pub token_url: String,
    /// Remote logout endpoint used to revoke tokens.
    pub disconnect_url: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub grant_type: String,
    /// Client certificate (PEM) presented during mutual TLS.
    pub cert_path: Option<PathBuf>,
    /// Private key (PEM) for `cert_path`.
    pub key_path: Option<PathBuf>,
    /// Fixed client identifier sent as `User-Agent` on every call.
    pub user_agent: String,
    /// Records requested per page (`$top`).
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl HrConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HrConfigBuilder {
        HrConfigBuilder::new()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `HrError::Config` describing the first invalid setting.
    pub fn validate(&self) -> HrResult<()> {
        for (name, value) in [
            ("api_url", &self.api_url),
            ("token_url", &self.token_url),
            ("disconnect_url", &self.disconnect_url),
        ] {
            Url::parse(value)
                .map_err(|e| HrError::Config(format!("{name} is not a valid URL: {e}")))?;
        }

        if self.client_id.trim().is_empty() {
            return Err(HrError::Config("client_id is required".into()));
        }

        if self.cert_path.is_some() != self.key_path.is_some() {
            return Err(HrError::Config(
                "cert_path and key_path must be set together".into(),
            ));
        }

        if (self.page_size as usize) < CONTINUATION_THRESHOLD {
            return Err(HrError::Config(format!(
                "page_size must be at least {CONTINUATION_THRESHOLD}"
            )));
        }

        Ok(())
    }
}

/// Builder for `HrConfig`.
#[derive(Debug, Default)]
pub struct HrConfigBuilder {
    api_url: Option<String>,
    token_url: Option<String>,
    disconnect_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    grant_type: Option<String>,
    cert_path: Option<PathBuf>,
    key_path: Option<PathBuf>,
    user_agent: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
}

impl HrConfigBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn disconnect_url(mut self, url: impl Into<String>) -> Self {
        self.disconnect_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::from(secret.into()));
        self
    }

    #[must_use]
    pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    /// Set the client certificate and key used for mutual TLS.
    #[must_use]
    pub fn client_certificate(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.cert_path = Some(cert.into());
        self.key_path = Some(key.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `HrError::Config` if a required setting is missing or invalid.
    pub fn build(self) -> HrResult<HrConfig> {
        let missing = |name: &str| HrError::Config(format!("{name} is required"));

        let config = HrConfig {
            api_url: self.api_url.ok_or_else(|| missing("api_url"))?,
            token_url: self.token_url.ok_or_else(|| missing("token_url"))?,
            disconnect_url: self.disconnect_url.ok_or_else(|| missing("disconnect_url"))?,
            client_id: self.client_id.ok_or_else(|| missing("client_id"))?,
            client_secret: self.client_secret.ok_or_else(|| missing("client_secret"))?,
            grant_type: self
                .grant_type
                .unwrap_or_else(|| DEFAULT_GRANT_TYPE.to_string()),
            cert_path: self.cert_path,
            key_path: self.key_path,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            request_timeout_secs: self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }
}
