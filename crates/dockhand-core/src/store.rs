#![forbid(unsafe_code)]

//! Durable per-user flag storage owned by the host.
//!
//! Dockhand persists exactly one value (the pinned-window list) through this
//! trait. Values are raw JSON so the host can store them wherever its own
//! user flags live; Dockhand owns the schema.

use std::fmt;

/// Get/set/unset of one JSON value per (scope, key) pair.
pub trait FlagStore {
    /// The stored value, or `None` when never written.
    fn get_flag(
        &self,
        scope: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, FlagStoreError>;

    /// Store a value, replacing any previous one.
    fn set_flag(
        &mut self,
        scope: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), FlagStoreError>;

    /// Remove a stored value. Removing an absent value is not an error.
    fn unset_flag(&mut self, scope: &str, key: &str) -> Result<(), FlagStoreError>;
}

/// Errors from the host flag store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagStoreError {
    /// The store cannot be reached right now (e.g. no active user).
    Unavailable,
    /// The store refused the operation.
    Rejected { reason: String },
}

impl fmt::Display for FlagStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "flag store unavailable"),
            Self::Rejected { reason } => write!(f, "flag store rejected the operation: {reason}"),
        }
    }
}

impl std::error::Error for FlagStoreError {}
