//! Active Directory connector for roster
//!
//! Reads the directory user snapshot with a paged subtree search and
//! applies attribute writes as LDAP modify-replace operations.
//!
//! [`LdapDirectory`] implements both
//! [`DirectorySource`](roster_connector::DirectorySource) and
//! [`DirectoryWriter`](roster_connector::DirectoryWriter).

mod config;
mod directory;

pub use config::{LdapConfig, LdapConfigBuilder, DEFAULT_USER_FILTER, USER_ATTRIBUTES};
pub use directory::{build_mods, entry_to_target_record, LdapDirectory};
