#![forbid(unsafe_code)]
//! Shadow records for every managed window.
//!
//! The host owns its window objects; Dockhand keeps one [`WindowRecord`]
//! per managed window and treats it as the single source of truth for
//! identity, visibility, pin state, and last known placement. Records are
//! created on the first show notification and destroyed the moment the
//! window closes; nothing sweeps the table in the background.
//!
//! # Invariants
//!
//! - One record per host handle, and at most one handle per resolved key.
//! - `WindowShown` is an upsert: a re-render refreshes the descriptor but
//!   never resets visibility, pin state, or the resolved key.
//! - Raise order is tracked with a monotonic sequence, so "topmost" is a
//!   pure function of the table.

use ahash::AHashMap;
use dockhand_core::identity::{DocumentKey, KeyResolver, WindowKey};
use dockhand_core::window::{HostWindowId, Visibility, WindowDescriptor};
use web_time::Instant;

/// Everything Dockhand tracks about one managed window.
#[derive(Debug, Clone)]
pub struct WindowRecord {
    /// Resolved identity, stable for the window's lifetime.
    pub key: WindowKey,
    /// Host snapshot, kept current from move/resize events.
    pub descriptor: WindowDescriptor,
    /// Where the window currently lives.
    pub visibility: Visibility,
    /// Whether the window is pinned.
    pub pinned: bool,
    /// Whether the window is on screen only because of a hover preview.
    pub shown_by_preview: bool,
    /// Armed double-close guard, if a first close attempt was absorbed.
    pub close_guard_until: Option<Instant>,
    raise_seq: u64,
}

impl WindowRecord {
    /// Host handle of this window.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> HostWindowId {
        self.descriptor.handle
    }

    /// Whether the window occupies screen space right now.
    #[must_use]
    pub fn is_effectively_visible(&self) -> bool {
        self.visibility.is_normal() && !self.descriptor.hidden
    }
}

/// The table of managed windows, keyed by host handle.
#[derive(Debug, Default)]
pub struct WindowTable {
    records: AHashMap<HostWindowId, WindowRecord>,
    by_key: AHashMap<WindowKey, HostWindowId>,
    resolver: KeyResolver,
    next_raise: u64,
}

impl WindowTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or refreshes the record for a shown window and returns its
    /// resolved key.
    ///
    /// A fresh window gets its identity resolved once and starts visible
    /// and unpinned; a re-shown window only has its descriptor replaced.
    /// When the resolved key is already held by another live window, the
    /// newcomer falls back to a generated key instead of stealing it.
    pub fn upsert(&mut self, descriptor: WindowDescriptor) -> WindowKey {
        let handle = descriptor.handle;
        if let Some(record) = self.records.get_mut(&handle) {
            record.descriptor = descriptor;
            return record.key.clone();
        }
        let mut key = self.resolver.resolve(&descriptor);
        if self.by_key.contains_key(&key) {
            key = self.resolver.fallback(&descriptor.class_name);
        }
        self.by_key.insert(key.clone(), handle);
        self.next_raise += 1;
        self.records.insert(
            handle,
            WindowRecord {
                key: key.clone(),
                descriptor,
                visibility: Visibility::default(),
                pinned: false,
                shown_by_preview: false,
                close_guard_until: None,
                raise_seq: self.next_raise,
            },
        );
        key
    }

    /// Removes a window's record, cleaning the key index.
    pub fn remove(&mut self, handle: HostWindowId) -> Option<WindowRecord> {
        let record = self.records.remove(&handle)?;
        if self.by_key.get(&record.key) == Some(&handle) {
            self.by_key.remove(&record.key);
        }
        Some(record)
    }

    /// Record for a handle.
    #[must_use]
    pub fn get(&self, handle: HostWindowId) -> Option<&WindowRecord> {
        self.records.get(&handle)
    }

    /// Mutable record for a handle.
    pub fn get_mut(&mut self, handle: HostWindowId) -> Option<&mut WindowRecord> {
        self.records.get_mut(&handle)
    }

    /// Record for a resolved key.
    #[must_use]
    pub fn by_key(&self, key: &WindowKey) -> Option<&WindowRecord> {
        let handle = self.by_key.get(key)?;
        self.records.get(handle)
    }

    /// Mutable record for a resolved key.
    pub fn by_key_mut(&mut self, key: &WindowKey) -> Option<&mut WindowRecord> {
        let handle = *self.by_key.get(key)?;
        self.records.get_mut(&handle)
    }

    /// Handle currently bound to a key, if the window is still open.
    #[must_use]
    pub fn handle_for_key(&self, key: &WindowKey) -> Option<HostWindowId> {
        let handle = *self.by_key.get(key)?;
        self.records.contains_key(&handle).then_some(handle)
    }

    /// Whether a stash occupant's window is still open.
    #[must_use]
    pub fn is_live(&self, key: &WindowKey) -> bool {
        self.handle_for_key(key).is_some()
    }

    /// Marks a window as raised above its siblings.
    pub fn record_raised(&mut self, handle: HostWindowId) {
        if let Some(record) = self.records.get_mut(&handle) {
            self.next_raise += 1;
            record.raise_seq = self.next_raise;
        }
    }

    /// Whether no effectively-visible window sits above this one.
    #[must_use]
    pub fn is_topmost(&self, handle: HostWindowId) -> bool {
        let Some(record) = self.records.get(&handle) else {
            return false;
        };
        if !record.is_effectively_visible() {
            return false;
        }
        let max = self
            .records
            .values()
            .filter(|r| r.is_effectively_visible())
            .map(|r| r.raise_seq)
            .max()
            .unwrap_or(0);
        record.raise_seq >= max
    }

    /// Another open window bound to the same document, lowest handle first.
    #[must_use]
    pub fn find_other_with_document(
        &self,
        handle: HostWindowId,
        document: &DocumentKey,
    ) -> Option<&WindowRecord> {
        self.records
            .values()
            .filter(|r| r.handle() != handle && r.descriptor.document_key() == Some(document))
            .min_by_key(|r| r.handle())
    }

    /// The open window bound to a document, lowest handle first.
    #[must_use]
    pub fn find_by_document(&self, document: &DocumentKey) -> Option<&WindowRecord> {
        self.records
            .values()
            .filter(|r| r.descriptor.document_key() == Some(document))
            .min_by_key(|r| r.handle())
    }

    /// All records, unordered.
    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> {
        self.records.values()
    }

    /// Handles of all records, ascending, so command batches derived from
    /// table sweeps are deterministic.
    #[must_use]
    pub fn handles_sorted(&self) -> Vec<HostWindowId> {
        let mut handles: Vec<HostWindowId> = self.records.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Number of managed windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no window is managed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
