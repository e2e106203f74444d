//! HR workers API connector for roster
//!
//! Retrieves personnel records from the HR system's workers API and
//! normalizes them into [`SourceRecord`](roster_connector::SourceRecord)s.
//!
//! # Features
//!
//! - `OAuth2` client credentials token exchange (basic auth, optional client certificate)
//! - Explicit session lifecycle with a caller-owned [`SessionRegistry`]
//! - Offset/limit pagination with cursor exhaustion as a tagged [`Page::EndOfData`]
//! - Defensive field-by-field worker extraction
//!
//! # Example
//!
//! ```no_run
//! use roster_connector_hr::{HrClient, HrConfig, SessionRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HrConfig::builder()
//!     .api_url("https://api.example.com")
//!     .token_url("https://api.example.com/auth/oauth/v2/token")
//!     .disconnect_url("https://accounts.example.com/auth/oauth/v2/logout")
//!     .client_id("client-id")
//!     .client_secret("client-secret")
//!     .build()?;
//!
//! let client = HrClient::new(config)?;
//! let registry = SessionRegistry::new();
//!
//! let session = client.connect(&registry).await?;
//! let workers = client.build_workers(&session, 1000).await?;
//! client.disconnect(&registry, session).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod session;
mod workers;

pub use client::{HrClient, Page, CONTINUATION_THRESHOLD, WORKERS_PATH};
pub use config::{HrConfig, HrConfigBuilder};
pub use error::{HrError, HrResult};
pub use session::{Session, SessionId, SessionRegistry};
pub use workers::{extract_worker, extract_workers};
