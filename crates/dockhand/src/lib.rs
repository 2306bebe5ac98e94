#![forbid(unsafe_code)]

//! Dockhand public facade crate.
//!
//! This crate provides the stable surface for host adapters. It re-exports
//! the controller, the event and command vocabulary, and the configuration
//! types from the internal crates, and offers a lightweight prelude for
//! day-to-day embedding.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use dockhand_core::color::PinnedPalette;
pub use dockhand_core::commands::{HostCommand, NotifyLevel, TASKBAR_ROOT_ID, TaskbarIcon};
pub use dockhand_core::events::{Disposition, HeaderControl, HostEvent, Outcome, PointerButton};
pub use dockhand_core::geometry::{Bounds, Extent, Point};
pub use dockhand_core::identity::{DocumentKey, KeyResolver, WindowKey};
pub use dockhand_core::retry::RetryPolicy;
pub use dockhand_core::settings::{
    DockConfig, DockEdge, LayoutMode, SettingEffect, SettingKey, SettingValue, SettingsError,
    SettingsStore, setting_registry,
};
pub use dockhand_core::store::{FlagStore, FlagStoreError};
pub use dockhand_core::window::{
    DocumentInfo, HostWindowId, Visibility, WindowCategory, WindowDescriptor,
};

// --- Layout re-exports -----------------------------------------------------

pub use dockhand_layout::barrier::DockBarrier;
pub use dockhand_layout::stash::StashAllocator;

// --- Runtime re-exports ----------------------------------------------------

pub use dockhand_runtime::DockController;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for embedding Dockhand.
#[derive(Debug)]
pub enum Error {
    /// The host settings store held an unusable value.
    Settings(SettingsError),
    /// The host flag store failed or refused a write.
    Flags(FlagStoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings(err) => write!(f, "{err}"),
            Self::Flags(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<SettingsError> for Error {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

impl From<FlagStoreError> for Error {
    fn from(err: FlagStoreError) -> Self {
        Self::Flags(err)
    }
}

/// Standard result type for Dockhand embedding APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Bounds, Disposition, DockConfig, DockController, DocumentInfo, DocumentKey, Error, Extent,
        FlagStore, HostCommand, HostEvent, HostWindowId, LayoutMode, Outcome, Result, SettingKey,
        SettingValue, WindowCategory, WindowDescriptor, WindowKey,
    };

    pub use crate::{core, layout, runtime};
}

pub use dockhand_core as core;
pub use dockhand_layout as layout;
pub use dockhand_runtime as runtime;
