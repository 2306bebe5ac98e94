#![forbid(unsafe_code)]

//! In-memory doubles for the host storage traits.
//!
//! Enabled for this crate's own tests and, via the `test-helpers` feature,
//! for downstream crate tests. Not part of the supported API.

use std::collections::HashMap;

use crate::settings::{SettingKey, SettingValue, SettingsStore};
use crate::store::{FlagStore, FlagStoreError};

/// A `FlagStore` backed by a map, with toggleable failure injection.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: HashMap<(String, String), serde_json::Value>,
    /// When set, every operation fails with `FlagStoreError::Unavailable`.
    pub unavailable: bool,
}

impl MemoryFlagStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing the trait.
    pub fn seed(&mut self, scope: &str, key: &str, value: serde_json::Value) {
        self.flags.insert((scope.to_owned(), key.to_owned()), value);
    }

    /// Peek at a raw value, bypassing the trait.
    #[must_use]
    pub fn peek(&self, scope: &str, key: &str) -> Option<&serde_json::Value> {
        self.flags.get(&(scope.to_owned(), key.to_owned()))
    }
}

impl FlagStore for MemoryFlagStore {
    fn get_flag(
        &self,
        scope: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, FlagStoreError> {
        if self.unavailable {
            return Err(FlagStoreError::Unavailable);
        }
        Ok(self.flags.get(&(scope.to_owned(), key.to_owned())).cloned())
    }

    fn set_flag(
        &mut self,
        scope: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), FlagStoreError> {
        if self.unavailable {
            return Err(FlagStoreError::Unavailable);
        }
        self.flags.insert((scope.to_owned(), key.to_owned()), value);
        Ok(())
    }

    fn unset_flag(&mut self, scope: &str, key: &str) -> Result<(), FlagStoreError> {
        if self.unavailable {
            return Err(FlagStoreError::Unavailable);
        }
        self.flags.remove(&(scope.to_owned(), key.to_owned()));
        Ok(())
    }
}

/// A `SettingsStore` backed by a map.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: HashMap<SettingKey, SettingValue>,
}

impl MemorySettings {
    /// Create an empty store; every lookup reports "never written".
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) {
        self.values.insert(key, value);
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.values.get(&key).cloned()
    }
}
