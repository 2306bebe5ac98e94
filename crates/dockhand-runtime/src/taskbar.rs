#![forbid(unsafe_code)]
//! Taskbar entry bookkeeping, button labeling, and ordering.
//!
//! At most one entry exists per window key. Every mutation returns the
//! commands that bring the host's button strip in line: an upsert or
//! refresh, followed by the full left-to-right order, which the host
//! applies by reinserting buttons. Removing an absent entry is a no-op.
//!
//! Buttons sort pinned-first, then by document kind, then by the short
//! title shown on the button, then by key, all case-insensitive, so the
//! strip is stable under re-renders.

use ahash::AHashMap;
use dockhand_core::commands::{HostCommand, TaskbarIcon};
use dockhand_core::identity::WindowKey;
use dockhand_core::window::WindowDescriptor;

/// One taskbar button's backing state.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskbarEntry {
    /// Window the button stands for.
    pub key: WindowKey,
    /// Glyph, selected from the document kind.
    pub icon: TaskbarIcon,
    /// Short text on the button.
    pub label: String,
    /// Full window title, shown on hover.
    pub tooltip: String,
    /// Sort group: document kind, or class name for kindless windows.
    pub kind: String,
    /// Whether the entry carries pinned styling and sorts first.
    pub pinned: bool,
}

/// The set of live taskbar entries.
#[derive(Debug, Default)]
pub struct TaskbarStore {
    entries: AHashMap<WindowKey, TaskbarEntry>,
}

impl TaskbarStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an entry exists for the key.
    #[must_use]
    pub fn contains(&self, key: &WindowKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Entry for a key.
    #[must_use]
    pub fn get(&self, key: &WindowKey) -> Option<&TaskbarEntry> {
        self.entries.get(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the strip is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Creates or refreshes the entry for a window and returns the button
    /// commands: the upsert itself, then the resulting order.
    pub fn upsert(
        &mut self,
        key: &WindowKey,
        descriptor: &WindowDescriptor,
        pinned: bool,
    ) -> Vec<HostCommand> {
        let kind = descriptor
            .document
            .as_ref()
            .map_or_else(|| descriptor.class_name.clone(), |d| d.kind.clone());
        let icon = TaskbarIcon::for_document(
            descriptor.document.as_ref().map(|d| d.kind.as_str()),
            &descriptor.class_name,
        );
        let entry = TaskbarEntry {
            key: key.clone(),
            icon,
            label: short_title(&descriptor.title),
            tooltip: descriptor.title.clone(),
            kind,
            pinned,
        };
        let upsert = HostCommand::UpsertTaskbarButton {
            key: entry.key.clone(),
            icon: entry.icon,
            label: entry.label.clone(),
            tooltip: entry.tooltip.clone(),
            pinned: entry.pinned,
        };
        self.entries.insert(key.clone(), entry);
        vec![upsert, self.order_command()]
    }

    /// Removes the entry for a key, returning the button commands, or
    /// nothing when no entry exists.
    pub fn remove(&mut self, key: &WindowKey) -> Vec<HostCommand> {
        if self.entries.remove(key).is_none() {
            return Vec::new();
        }
        vec![
            HostCommand::RemoveTaskbarButton { key: key.clone() },
            self.order_command(),
        ]
    }

    /// Keys in display order: pinned first, then kind, short title, key.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<WindowKey> {
        let mut entries: Vec<&TaskbarEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            let rank = |e: &TaskbarEntry| u8::from(!e.pinned);
            rank(a)
                .cmp(&rank(b))
                .then_with(|| a.kind.to_lowercase().cmp(&b.kind.to_lowercase()))
                .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
                .then_with(|| a.key.cmp(&b.key))
        });
        entries.into_iter().map(|e| e.key.clone()).collect()
    }

    fn order_command(&self) -> HostCommand {
        HostCommand::SetTaskbarOrder {
            keys: self.sorted_keys(),
        }
    }
}

/// The text shown on a taskbar button.
///
/// Document titles commonly read "Type: Name"; the button shows only the
/// name, since the icon already encodes the type and the full title stays
/// available in the tooltip.
#[must_use]
pub fn short_title(full: &str) -> String {
    let title = full.trim();
    if let Some(idx) = title.rfind(':') {
        let after = title[idx + 1..].trim();
        if !after.is_empty() {
            return after.to_owned();
        }
    }
    title.to_owned()
}

/// Title shown while a window is minimized.
#[must_use]
pub fn curate_title(title: &str) -> String {
    title
        .replacen("[Token] ", "~ ", 1)
        .replacen("Table Configuration: ", "", 1)
}

/// Undo [`curate_title`] when a window is restored.
#[must_use]
pub fn uncurate_title(title: &str) -> String {
    title.replacen("~ ", "[Token] ", 1)
}

/// Maps a vertical wheel gesture over the strip to a new horizontal
/// scroll position, or `None` when the host's native handling should run.
///
/// Gestures that are already horizontal, strips that do not overflow, and
/// scrolls that would not move stay untouched.
#[must_use]
pub fn wheel_scroll(
    delta_x: f64,
    delta_y: f64,
    scroll_left: f64,
    max_scroll_left: f64,
) -> Option<f64> {
    if max_scroll_left <= 0.0 {
        return None;
    }
    if delta_x.abs() > delta_y.abs() {
        return None;
    }
    if delta_y == 0.0 {
        return None;
    }
    let next = (scroll_left + delta_y).clamp(0.0, max_scroll_left);
    if next == scroll_left {
        return None;
    }
    Some(next)
}
