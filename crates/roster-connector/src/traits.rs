//! Directory connector traits
//!
//! The reconciliation engine reads a full directory snapshot through
//! [`DirectorySource`] and delegates every mutation to [`DirectoryWriter`].

use async_trait::async_trait;

use crate::error::ConnectorResult;
use crate::operation::AttributeChanges;
use crate::records::TargetRecord;

/// Capability for reading the directory user snapshot.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// Fetch every user record under the configured search base.
    async fn list_users(&self) -> ConnectorResult<Vec<TargetRecord>>;
}

/// Capability for applying attribute writes to a directory object.
///
/// This is the only path through which the engine mutates the directory.
#[async_trait]
pub trait DirectoryWriter: Send + Sync {
    /// Apply all `changes` to the object at `dn` in one call.
    ///
    /// Implementations should treat each change as a full replacement of
    /// the attribute's stored value.
    async fn update_attributes(&self, dn: &str, changes: &AttributeChanges)
        -> ConnectorResult<()>;
}
