//! # Roster Connector Framework
//!
//! Shared record models and directory abstractions used by the roster
//! reconciliation engine.
//!
//! The HR side produces [`SourceRecord`]s, the directory side produces
//! [`TargetRecord`]s, and the engine emits [`AttributeChanges`] that a
//! [`DirectoryWriter`] applies.
//!
//! ## Crate Organization
//!
//! - [`records`] - `SourceRecord`, `TargetRecord` and the typed
//!   `DirectoryAttribute` enumeration
//! - [`operation`] - attribute values and ordered change sets
//! - [`traits`] - directory reader and writer seams
//! - [`error`] - directory-side error types

pub mod error;
pub mod operation;
pub mod records;
pub mod traits;

/// Prelude module for convenient imports.
///
/// ```
/// use roster_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ConnectorError, ConnectorResult};
    pub use crate::operation::{AttributeChange, AttributeChanges, AttributeValue};
    pub use crate::records::{DirectoryAttribute, SourceRecord, TargetRecord, TargetValue};
    pub use crate::traits::{DirectorySource, DirectoryWriter};
}

pub use error::{ConnectorError, ConnectorResult};
pub use operation::{AttributeChange, AttributeChanges, AttributeValue};
pub use records::{DirectoryAttribute, SourceRecord, TargetRecord, TargetValue};
pub use traits::{DirectorySource, DirectoryWriter};

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;
