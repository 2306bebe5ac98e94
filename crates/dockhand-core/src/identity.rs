#![forbid(unsafe_code)]

//! Window identity resolution.
//!
//! Every managed window gets a [`WindowKey`]: unique per instance, stable for
//! the instance's lifetime. Document-backed windows additionally carry a
//! [`DocumentKey`]: stable across reloads and shared by any two windows
//! showing the same document. Pinning, persistence, and deduplication key on
//! the document; taskbar bookkeeping keys on the instance.
//!
//! Resolution order for a descriptor:
//!
//! 1. the host's per-instance uuid, when present;
//! 2. the backing document's key;
//! 3. a generated `dh-{base}-{n}` fallback from a monotonic counter, cached
//!    by the caller for the window's lifetime. Deterministic, so event
//!    streams replay identically.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::window::WindowDescriptor;

/// Runtime identity of one window instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowKey(String);

impl WindowKey {
    /// Create a key, rejecting the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdentityError::EmptyKey);
        }
        Ok(Self(raw))
    }

    /// The key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistent identity of a document, stable across reloads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Create a key, rejecting the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdentityError::EmptyKey);
        }
        Ok(Self(raw))
    }

    /// The key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors validating identity keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    EmptyKey,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "identity key must not be empty"),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Assigns window keys, generating deterministic fallbacks when the host
/// supplies no usable identity.
///
/// Callers resolve once per window and cache the result in their shadow
/// record; the fallback counter never repeats within a session.
#[derive(Debug, Default)]
pub struct KeyResolver {
    next_fallback: u64,
}

impl KeyResolver {
    /// Create a resolver with a fresh fallback counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the runtime key for a descriptor.
    ///
    /// Host-supplied identifiers are trusted verbatim; only the generated
    /// fallback is sanitized.
    pub fn resolve(&mut self, descriptor: &WindowDescriptor) -> WindowKey {
        if let Some(uuid) = descriptor.instance_uuid.as_deref()
            && !uuid.is_empty()
        {
            return WindowKey(uuid.to_owned());
        }
        if let Some(doc) = descriptor.document_key() {
            return WindowKey(doc.as_str().to_owned());
        }
        self.fallback(&descriptor.class_name)
    }

    /// Generate a fresh fallback key, bypassing the host-supplied identity.
    ///
    /// Used when a resolved key is already held by another live window, so
    /// no two instances ever share a key.
    pub fn fallback(&mut self, class_name: &str) -> WindowKey {
        self.next_fallback += 1;
        let base = sanitize(class_name);
        WindowKey(format!("dh-{base}-{}", self.next_fallback))
    }
}

/// Replace every non-word character so generated keys are safe to embed in
/// host element ids.
fn sanitize(base: &str) -> String {
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "window".to_owned()
    } else {
        cleaned
    }
}
