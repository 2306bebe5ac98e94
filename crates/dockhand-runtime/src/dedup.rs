#![forbid(unsafe_code)]
//! Single-window-per-document enforcement.
//!
//! When a window is shown for a document that already has one, the older
//! window survives: it inherits the newcomer's pin if it lacks one, gets
//! restored or raised, and the newcomer is force-closed. The forced close
//! is tracked in-flight so the controller lets the host's close path run
//! unintercepted, and a window can never deduplicate against itself.
//!
//! Only document-backed windows participate; chrome windows and tool
//! popouts may coexist freely.

use ahash::AHashSet;
use dockhand_core::identity::WindowKey;
use dockhand_core::window::HostWindowId;

use crate::windows::WindowTable;

/// Keys whose forced duplicate-close has been issued but not yet
/// confirmed by the host.
#[derive(Debug, Default)]
pub struct DedupGuard {
    in_flight: AHashSet<WindowKey>,
}

impl DedupGuard {
    /// Creates an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a newcomer as being force-closed.
    pub fn begin(&mut self, key: WindowKey) {
        self.in_flight.insert(key);
    }

    /// Clears the mark once the close lands. Returns whether it was set.
    pub fn finish(&mut self, key: &WindowKey) -> bool {
        self.in_flight.remove(key)
    }

    /// Whether a forced close is pending for the key.
    #[must_use]
    pub fn is_in_flight(&self, key: &WindowKey) -> bool {
        self.in_flight.contains(key)
    }
}

/// Resolution of one duplicate show, computed before any state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupPlan {
    /// Pre-existing window that stays open.
    pub survivor: HostWindowId,
    /// Just-shown duplicate that will be force-closed.
    pub newcomer: HostWindowId,
    /// Resolved key of the newcomer, for in-flight tracking.
    pub newcomer_key: WindowKey,
    /// Whether the survivor takes over the newcomer's pin.
    pub transfer_pin: bool,
    /// Whether the survivor needs a restore rather than a raise.
    pub survivor_minimized: bool,
}

/// Plans deduplication for a just-shown window, or `None` when the show
/// is not a duplicate.
#[must_use]
pub fn plan(table: &WindowTable, newcomer: HostWindowId) -> Option<DedupPlan> {
    let record = table.get(newcomer)?;
    let document = record.descriptor.document_key()?;
    let survivor = table.find_other_with_document(newcomer, document)?;
    Some(DedupPlan {
        survivor: survivor.handle(),
        newcomer,
        newcomer_key: record.key.clone(),
        transfer_pin: record.pinned && !survivor.pinned,
        survivor_minimized: survivor.visibility.is_minimized() || survivor.descriptor.hidden,
    })
}
