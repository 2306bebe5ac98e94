#![forbid(unsafe_code)]

//! Commands the controller asks the host to apply.
//!
//! Commands are plain data and carry everything the host needs; applying
//! them requires no callback into the controller. Order within one returned
//! batch is significant (e.g. placement before z-layer before chrome).

use serde::{Deserialize, Serialize};

use crate::color::PinnedPalette;
use crate::geometry::Bounds;
use crate::identity::{DocumentKey, WindowKey};
use crate::settings::DockEdge;
use crate::window::HostWindowId;

/// Element id the host gives the mounted taskbar strip.
///
/// Buttons inside the strip are tagged with their entry's [`WindowKey`] so
/// pointer events over them can name the entry they belong to.
pub const TASKBAR_ROOT_ID: &str = "dockhand-taskbar";

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

/// Glyph shown on a taskbar button, selected by document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskbarIcon {
    /// Actor-like documents.
    User,
    /// Item-like documents.
    Sword,
    /// Journal entries.
    BookOpen,
    /// Roll tables.
    List,
    /// Everything else.
    Window,
}

impl TaskbarIcon {
    /// Select the icon for a document kind, falling back to the class name
    /// when the kind is absent.
    #[must_use]
    pub fn for_document(kind: Option<&str>, class_name: &str) -> Self {
        match kind {
            Some("Actor") => return Self::User,
            Some("Item") => return Self::Sword,
            Some("JournalEntry") => return Self::BookOpen,
            Some("RollTable") => return Self::List,
            _ => {}
        }
        if class_name.contains("Actor") {
            Self::User
        } else if class_name.contains("Item") {
            Self::Sword
        } else if class_name.contains("Journal") {
            Self::BookOpen
        } else if class_name.contains("RollTable") {
            Self::List
        } else {
            Self::Window
        }
    }

    /// CSS class of the glyph, for hosts that render font icons.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::User => "fas fa-user",
            Self::Sword => "fas fa-sword",
            Self::BookOpen => "fas fa-book-open",
            Self::List => "fas fa-list",
            Self::Window => "far fa-window-maximize",
        }
    }
}

/// One instruction for the host to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostCommand {
    /// Un-hide a display-hidden window.
    ShowWindow { handle: HostWindowId },
    /// Display-hide a window without destroying it.
    HideWindow { handle: HostWindowId },
    /// Set any subset of left/top/width, leaving the rest untouched.
    SetPlacement {
        handle: HostWindowId,
        left: Option<f64>,
        top: Option<f64>,
        width: Option<f64>,
    },
    /// Set the stacking layer of a window.
    SetZLayer { handle: HostWindowId, layer: i32 },
    /// Raise a window above its siblings.
    BringToFront { handle: HostWindowId },
    /// Run the window's real close path.
    CloseWindow { handle: HostWindowId },
    /// Block or unblock user dragging of a window.
    SetDragLock { handle: HostWindowId, locked: bool },
    /// Create or refresh the taskbar button for an entry.
    UpsertTaskbarButton {
        key: WindowKey,
        icon: TaskbarIcon,
        label: String,
        tooltip: String,
        pinned: bool,
    },
    /// Remove an entry's taskbar button.
    RemoveTaskbarButton { key: WindowKey },
    /// Reorder taskbar buttons left-to-right.
    SetTaskbarOrder { keys: Vec<WindowKey> },
    /// Mount the taskbar strip, id [`TASKBAR_ROOT_ID`], on the given edge.
    MountTaskbar { edge: DockEdge },
    /// Remove the taskbar strip.
    UnmountTaskbar,
    /// Inject the configured header controls into a window's title bar.
    EnsureHeaderControls {
        handle: HostWindowId,
        minimize: bool,
        pin: bool,
    },
    /// Hide or reveal a window's close control.
    SetCloseControlHidden { handle: HostWindowId, hidden: bool },
    /// Apply minimized chrome (curated title, restore glyph).
    ApplyMinimizedChrome { handle: HostWindowId, title: String },
    /// Restore normal chrome.
    ApplyRestoredChrome { handle: HostWindowId, title: String },
    /// Toggle pinned header styling on a window.
    SetPinnedStyling { handle: HostWindowId, pinned: bool },
    /// Start reporting `WindowHoverChanged` for a window.
    AttachHoverProbe { handle: HostWindowId },
    /// Stop reporting `WindowHoverChanged` for a window.
    DetachHoverProbe { handle: HostWindowId },
    /// Resolve a document and render its editor window.
    ///
    /// The host re-enters with `WindowShown` once the editor exists.
    OpenDocument { key: DocumentKey },
    /// Reload the session so a reconfiguration takes effect.
    RequestReload,
    /// Install the derived pinned/taskbar color palette.
    ApplyPinnedPalette { palette: PinnedPalette },
    /// Show a user-facing notification.
    Notify { level: NotifyLevel, message: String },
}

impl HostCommand {
    /// Convenience constructor for partial placement updates.
    #[must_use]
    pub fn placement(handle: HostWindowId, bounds: Bounds) -> Self {
        Self::SetPlacement {
            handle,
            left: Some(bounds.left),
            top: Some(bounds.top),
            width: Some(bounds.width),
        }
    }
}
