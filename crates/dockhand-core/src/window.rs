#![forbid(unsafe_code)]

//! Host window handles and the descriptor snapshot the host supplies at
//! show time.
//!
//! The host owns its window objects. Dockhand only ever sees a numeric
//! [`HostWindowId`] plus the [`WindowDescriptor`] snapshot taken when the
//! window is shown; everything else it tracks lives in its own shadow
//! records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;
use crate::identity::DocumentKey;

/// Opaque handle to a host window.
///
/// `0` is reserved/invalid so handles are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostWindowId(u64);

impl HostWindowId {
    /// Lowest valid handle.
    pub const MIN: Self = Self(1);

    /// Create a new handle, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, WindowModelError> {
        if raw == 0 {
            return Err(WindowModelError::ZeroWindowHandle);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HostWindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors validating host window identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowModelError {
    ZeroWindowHandle,
}

impl fmt::Display for WindowModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWindowHandle => write!(f, "window handle 0 is reserved"),
        }
    }
}

impl std::error::Error for WindowModelError {}

/// Broad window classification reported by the host.
///
/// Only [`WindowCategory::Sheet`] windows are document editors; the rest are
/// chrome. Dialogs, config screens, and pickers are excluded from bulk
/// minimization; trackers are ignored outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowCategory {
    /// Document editor ("target sheet").
    Sheet,
    /// Modal-ish prompt.
    Dialog,
    /// Configuration screen.
    Config,
    /// File or asset picker.
    Picker,
    /// Always-on auxiliary tracker.
    Tracker,
    /// Any other chrome panel.
    Panel,
}

/// Identity of the document a window edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Identifier stable across reloads, shared by every window showing the
    /// same document.
    pub key: DocumentKey,
    /// Document type name ("Actor", "Item", ...), used for taskbar icon and
    /// sort grouping.
    pub kind: String,
}

impl DocumentInfo {
    /// Create document identity with a type name.
    pub fn new(key: DocumentKey, kind: impl Into<String>) -> Self {
        Self {
            key,
            kind: kind.into(),
        }
    }
}

/// Snapshot of one host window, taken when the host reports it shown.
///
/// Fields reflect the host's view at that instant; Dockhand keeps its own
/// copy current from later move/resize events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    /// Host handle, valid until `WindowClosed`.
    pub handle: HostWindowId,
    /// Per-instance unique id when the host provides one.
    pub instance_uuid: Option<String>,
    /// Backing document, absent for chrome windows.
    pub document: Option<DocumentInfo>,
    /// Full window title.
    pub title: String,
    /// Host-side implementation class name.
    pub class_name: String,
    /// Placement in board coordinates.
    pub placement: Bounds,
    /// Whether the host has finished rendering the window.
    pub rendered: bool,
    /// Whether the window is currently display-hidden.
    pub hidden: bool,
    /// Broad classification.
    pub category: WindowCategory,
}

impl WindowDescriptor {
    /// Create a descriptor for a visible, rendered window.
    pub fn new(
        handle: HostWindowId,
        title: impl Into<String>,
        class_name: impl Into<String>,
        category: WindowCategory,
        placement: Bounds,
    ) -> Self {
        Self {
            handle,
            instance_uuid: None,
            document: None,
            title: title.into(),
            class_name: class_name.into(),
            placement,
            rendered: true,
            hidden: false,
            category,
        }
    }

    /// Attach a per-instance uuid.
    #[must_use]
    pub fn with_instance_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.instance_uuid = Some(uuid.into());
        self
    }

    /// Attach backing-document identity.
    #[must_use]
    pub fn with_document(mut self, document: DocumentInfo) -> Self {
        self.document = Some(document);
        self
    }

    /// Mark the window as currently hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark the window as still mid-render.
    #[must_use]
    pub fn not_yet_rendered(mut self) -> Self {
        self.rendered = false;
        self
    }

    /// The backing document's persistent key, if any.
    #[must_use]
    pub fn document_key(&self) -> Option<&DocumentKey> {
        self.document.as_ref().map(|d| &d.key)
    }

    /// Whether this window edits a document ("target sheet").
    #[must_use]
    pub fn is_document_backed(&self) -> bool {
        self.document.is_some()
    }
}

/// Where a managed window currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// On-screen at its own placement.
    #[default]
    Normal,
    /// Shrunk into a packed-row slot (row layout modes only).
    MinimizedRow,
    /// Display-hidden, represented only by a taskbar button (dock modes only).
    MinimizedTaskbar,
}

impl Visibility {
    /// Whether the window occupies screen space at its own placement.
    #[inline]
    #[must_use]
    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Whether the window is minimized in either presentation.
    #[inline]
    #[must_use]
    pub const fn is_minimized(self) -> bool {
        !self.is_normal()
    }
}
