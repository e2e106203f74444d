//! HR workers API client: token sessions and paginated fetch.

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::session::{Session, SessionRegistry};
use crate::{HrConfig, HrError, HrResult};

/// Path of the workers collection relative to `api_url`.
pub const WORKERS_PATH: &str = "/hr/v2/workers";

/// A page with fewer records than this ends the fetch.
///
/// The backend's true page boundary is observed empirically rather than
/// declared, so this is independent of the requested page size.
pub const CONTINUATION_THRESHOLD: usize = 100;

/// Token response from the authorization server.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Envelope returned by the workers endpoint.
#[derive(Debug, Deserialize)]
struct WorkersEnvelope {
    #[serde(default)]
    workers: Vec<Value>,
}

/// Outcome of a single page request.
#[derive(Debug)]
pub enum Page {
    /// The server returned a page of raw worker records.
    Records(Vec<Value>),
    /// The server signalled cursor exhaustion (HTTP 204).
    EndOfData,
}

/// Client for the HR workers API.
#[derive(Debug)]
pub struct HrClient {
    config: HrConfig,
    http_client: reqwest::Client,
}

impl HrClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the client
    /// certificate cannot be loaded, or the HTTP client cannot be built.
    pub fn new(config: HrConfig) -> HrResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone());

        if let (Some(cert_path), Some(key_path)) = (&config.cert_path, &config.key_path) {
            let read = |path: &std::path::Path| {
                std::fs::read(path).map_err(|e| {
                    HrError::Config(format!("Failed to read {}: {e}", path.display()))
                })
            };

            let mut pem = read(cert_path)?;
            pem.push(b'\n');
            pem.extend(read(key_path)?);

            let identity = reqwest::Identity::from_pem(&pem)
                .map_err(|e| HrError::Config(format!("Invalid client certificate: {e}")))?;
            builder = builder.identity(identity);
        }

        let http_client = builder
            .build()
            .map_err(|e| HrError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    fn workers_url(&self) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), WORKERS_PATH)
    }

    /// Exchanges client credentials for a bearer token and registers the session.
    ///
    /// Never retried here; retry policy belongs to the caller.
    #[instrument(skip(self, registry), fields(token_url = %self.config.token_url))]
    pub async fn connect(&self, registry: &SessionRegistry) -> HrResult<Arc<Session>> {
        debug!("Connecting to HR token server");

        let response = self
            .http_client
            .post(&self.config.token_url)
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", self.config.grant_type.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), "HR token request failed");
            return Err(HrError::Connection {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let session = Arc::new(Session::new(token.access_token, token.expires_in));
        registry.insert(session.clone()).await;

        debug!(
            session_id = %session.id(),
            expires_at = %session.expires_at().format("%Y-%m-%d %H:%M:%S UTC"),
            "Connected to HR token server"
        );

        Ok(session)
    }

    /// Revokes the session's token remotely and removes it from the registry.
    ///
    /// The session is invalidated locally before the remote call, so it is
    /// terminated even when this returns `HrError::Disconnection`.
    #[instrument(skip(self, registry, session), fields(session_id = %session.id()))]
    pub async fn disconnect(
        &self,
        registry: &SessionRegistry,
        session: Arc<Session>,
    ) -> HrResult<()> {
        registry.remove(&session.id()).await;

        debug!(url = %self.config.disconnect_url, "Disconnecting from HR API");

        let response = self
            .http_client
            .get(&self.config.disconnect_url)
            .query(&[("id_token_hint", session.token().expose_secret())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "HR remote disconnect failed");
            return Err(HrError::Disconnection {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Completed HR remote disconnect");
        Ok(())
    }

    /// Requests one page of workers starting at `offset`.
    #[instrument(skip(self, session))]
    pub async fn get_page(&self, session: &Session, offset: u32, page_size: u32) -> HrResult<Page> {
        if session.is_expired() {
            warn!(session_id = %session.id(), "Using an expired HR session");
        }

        let response = self
            .http_client
            .get(self.workers_url())
            .bearer_auth(session.token().expose_secret())
            .query(&[
                ("$top", page_size.to_string()),
                ("$skip", offset.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            debug!("Reached the end of the record cursor");
            return Ok(Page::EndOfData);
        }

        let body = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
            error!(status = status.as_u16(), body = %body, "HR API request failed");
            return Err(HrError::Request {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Page::Records(Vec::new()));
        }

        let envelope: WorkersEnvelope = serde_json::from_str(&body)?;
        Ok(Page::Records(envelope.workers))
    }

    /// Fetches every raw worker record.
    ///
    /// Stops on a short page or cursor exhaustion. Any error abandons the
    /// remaining pages and discards what was accumulated.
    #[instrument(skip(self, session))]
    pub async fn fetch_all(&self, session: &Session, page_size: u32) -> HrResult<Vec<Value>> {
        let mut records = Vec::new();
        let mut offset: u32 = 0;

        loop {
            debug!(offset, page_size, "Getting workers from HR API");

            match self.get_page(session, offset, page_size).await? {
                Page::EndOfData => break,
                Page::Records(page) => {
                    let count = page.len();
                    records.extend(page);

                    if count < CONTINUATION_THRESHOLD {
                        break;
                    }
                    offset += u32::try_from(count).unwrap_or(u32::MAX);
                }
            }
        }

        info!(total = records.len(), "Total HR workers retrieved");

        Ok(records)
    }
}
