#![forbid(unsafe_code)]

//! Recognized configuration options and their host-facing registry.
//!
//! Dockhand never persists settings itself: the host owns a key-value
//! settings store and a settings UI. At startup the host registers every
//! [`SettingSpec`] from [`setting_registry`] with its own UI, materializes a
//! [`DockConfig`] via [`DockConfig::load`], and afterwards forwards changes
//! as `SettingChanged` events which the controller folds in with
//! [`DockConfig::apply`].
//!
//! Layout-mode values written by earlier releases (`top`, `topBar`,
//! `bottom`, `bottomBar`, `persistentTop`, `persistentBottom`) migrate to
//! the current five modes on read; unknown text disables the system rather
//! than guessing.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;
use crate::window::{WindowCategory, WindowDescriptor};

/// Board edge a dock-mode taskbar mounts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DockEdge {
    Top,
    Bottom,
}

/// How minimized windows are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Packed row of shrunk placeholders along the top of the board.
    RowTop,
    /// Packed row along the bottom.
    RowBottom,
    /// Taskbar strip on the top edge; minimized windows are hidden.
    #[default]
    DockTop,
    /// Taskbar strip on the bottom edge.
    DockBottom,
    /// No managed minimization.
    Disabled,
}

impl LayoutMode {
    /// Canonical setting value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RowTop => "row-top",
            Self::RowBottom => "row-bottom",
            Self::DockTop => "dock-top",
            Self::DockBottom => "dock-bottom",
            Self::Disabled => "disabled",
        }
    }

    /// Parse a stored setting value, migrating legacy spellings.
    ///
    /// Total: unknown values disable the system.
    #[must_use]
    pub fn from_setting(raw: &str) -> Self {
        match raw {
            "row-top" | "top" | "topBar" => Self::RowTop,
            "row-bottom" | "bottom" | "bottomBar" => Self::RowBottom,
            "dock-top" | "persistentTop" => Self::DockTop,
            "dock-bottom" | "persistentBottom" => Self::DockBottom,
            _ => Self::Disabled,
        }
    }

    /// Whether minimized windows go to a taskbar strip.
    #[inline]
    #[must_use]
    pub const fn is_dock(self) -> bool {
        matches!(self, Self::DockTop | Self::DockBottom)
    }

    /// Whether minimized windows go to a packed row.
    #[inline]
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::RowTop | Self::RowBottom)
    }

    /// Whether any managed minimization is active.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// The edge a dock-mode taskbar mounts on.
    #[must_use]
    pub const fn dock_edge(self) -> Option<DockEdge> {
        match self {
            Self::DockTop => Some(DockEdge::Top),
            Self::DockBottom => Some(DockEdge::Bottom),
            Self::RowTop | Self::RowBottom | Self::Disabled => None,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a setting applies to, in host terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingScope {
    /// Per-user, per-client.
    Client,
    /// Shared across the session.
    World,
}

/// One recognized setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingKey {
    LayoutMode,
    MinimizeButtonEnabled,
    PinButtonEnabled,
    ClickOutsideMinimizesAll,
    PinRequiresDoubleClose,
    RememberPinnedWindows,
    PinnedHeaderColor,
    TaskbarColor,
    DebugLogging,
    VerboseDebugLogging,
    IgnoreList,
}

impl SettingKey {
    /// Stable string id used by the host store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LayoutMode => "layout-mode",
            Self::MinimizeButtonEnabled => "minimize-button-enabled",
            Self::PinButtonEnabled => "pin-button-enabled",
            Self::ClickOutsideMinimizesAll => "click-outside-minimizes-all",
            Self::PinRequiresDoubleClose => "pin-requires-double-close",
            Self::RememberPinnedWindows => "remember-pinned-windows",
            Self::PinnedHeaderColor => "pinned-header-color",
            Self::TaskbarColor => "taskbar-color",
            Self::DebugLogging => "debug-logging",
            Self::VerboseDebugLogging => "verbose-debug-logging",
            Self::IgnoreList => "ignore-list",
        }
    }

    /// Parse a string id back to a key.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        ALL_KEYS.iter().copied().find(|k| k.as_str() == raw)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ALL_KEYS: [SettingKey; 11] = [
    SettingKey::LayoutMode,
    SettingKey::MinimizeButtonEnabled,
    SettingKey::PinButtonEnabled,
    SettingKey::ClickOutsideMinimizesAll,
    SettingKey::PinRequiresDoubleClose,
    SettingKey::RememberPinnedWindows,
    SettingKey::PinnedHeaderColor,
    SettingKey::TaskbarColor,
    SettingKey::DebugLogging,
    SettingKey::VerboseDebugLogging,
    SettingKey::IgnoreList,
];

/// A setting's value as stored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
}

impl SettingValue {
    /// The boolean value, if this is a boolean setting.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    /// The text value, if this is a text setting.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Bool(_) => None,
        }
    }

    /// Build a text value.
    #[must_use]
    pub fn text(raw: impl Into<String>) -> Self {
        Self::Text(raw.into())
    }
}

/// Registry metadata the host feeds into its settings UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingSpec {
    pub key: SettingKey,
    pub scope: SettingScope,
    pub default: SettingValue,
    /// Whether the host should reload the session when the value changes.
    pub reload_on_change: bool,
    /// Short human label for the settings UI.
    pub label: &'static str,
    /// One-line explanation for the settings UI.
    pub hint: &'static str,
}

/// Every setting Dockhand recognizes, in presentation order.
#[must_use]
pub fn setting_registry() -> Vec<SettingSpec> {
    vec![
        SettingSpec {
            key: SettingKey::LayoutMode,
            scope: SettingScope::Client,
            default: SettingValue::text(LayoutMode::DockTop.as_str()),
            reload_on_change: true,
            label: "Minimized window placement",
            hint: "Where minimized windows go: a taskbar strip or a packed row.",
        },
        SettingSpec {
            key: SettingKey::MinimizeButtonEnabled,
            scope: SettingScope::World,
            default: SettingValue::Bool(true),
            reload_on_change: true,
            label: "Minimize header button",
            hint: "Add a minimize control to document window headers.",
        },
        SettingSpec {
            key: SettingKey::PinButtonEnabled,
            scope: SettingScope::World,
            default: SettingValue::Bool(true),
            reload_on_change: true,
            label: "Pin header button",
            hint: "Add a pin control to document window headers.",
        },
        SettingSpec {
            key: SettingKey::ClickOutsideMinimizesAll,
            scope: SettingScope::World,
            default: SettingValue::Bool(false),
            reload_on_change: true,
            label: "Click outside minimizes",
            hint: "Clicking the empty board minimizes every unpinned window.",
        },
        SettingSpec {
            key: SettingKey::PinRequiresDoubleClose,
            scope: SettingScope::World,
            default: SettingValue::Bool(true),
            reload_on_change: false,
            label: "Double-close pinned windows",
            hint: "Closing a pinned window needs two attempts in quick succession.",
        },
        SettingSpec {
            key: SettingKey::RememberPinnedWindows,
            scope: SettingScope::World,
            default: SettingValue::Bool(false),
            reload_on_change: false,
            label: "Remember pinned windows",
            hint: "Reopen and re-pin remembered windows after a reload.",
        },
        SettingSpec {
            key: SettingKey::PinnedHeaderColor,
            scope: SettingScope::World,
            default: SettingValue::text("#ff8800"),
            reload_on_change: false,
            label: "Pinned header color",
            hint: "Accent color for pinned window headers.",
        },
        SettingSpec {
            key: SettingKey::TaskbarColor,
            scope: SettingScope::World,
            default: SettingValue::text("#0000"),
            reload_on_change: false,
            label: "Taskbar color",
            hint: "Background color of the taskbar strip.",
        },
        SettingSpec {
            key: SettingKey::DebugLogging,
            scope: SettingScope::Client,
            default: SettingValue::Bool(false),
            reload_on_change: false,
            label: "Debug logging",
            hint: "Log lifecycle decisions. Diagnostic only.",
        },
        SettingSpec {
            key: SettingKey::VerboseDebugLogging,
            scope: SettingScope::Client,
            default: SettingValue::Bool(false),
            reload_on_change: false,
            label: "Verbose debug logging",
            hint: "Additionally log every placement computation. Noisy.",
        },
        SettingSpec {
            key: SettingKey::IgnoreList,
            scope: SettingScope::World,
            default: SettingValue::text("QuestTracker,ee"),
            reload_on_change: false,
            label: "Ignored window classes",
            hint: "Comma-separated class names Dockhand leaves untouched.",
        },
    ]
}

/// Read access to the host's settings store.
pub trait SettingsStore {
    /// The stored value for a key, or `None` when never written.
    fn get(&self, key: SettingKey) -> Option<SettingValue>;
}

/// Errors materializing configuration from the host store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A stored value has the wrong kind (e.g. text where a bool belongs).
    WrongKind {
        key: SettingKey,
        expected: &'static str,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongKind { key, expected } => {
                write!(f, "setting {key} holds a non-{expected} value")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// What the controller must do after folding in a changed setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingEffect {
    /// Nothing beyond the config update.
    None,
    /// The host should reload the session.
    Reload,
    /// Re-derive and re-apply the color palette.
    ReapplyPalette,
    /// Remembered pins were turned off; clear the persisted list.
    ClearPinnedPersistence,
    /// Debug logging toggled; announce it.
    DebugToggled(bool),
}

/// Materialized configuration.
///
/// Durations that are not host-visible settings (close guard, hover delay,
/// restore retry) have builder setters for embedders.
#[derive(Debug, Clone, PartialEq)]
pub struct DockConfig {
    pub layout_mode: LayoutMode,
    pub minimize_button: bool,
    pub pin_button: bool,
    pub click_outside_minimizes_all: bool,
    pub pin_double_close: bool,
    pub remember_pinned: bool,
    pub pinned_header_color: String,
    pub taskbar_color: String,
    pub debug_logging: bool,
    pub verbose_logging: bool,
    pub ignore_list: Vec<String>,
    /// How long the first close attempt on a pinned window arms the guard.
    pub close_guard: Duration,
    /// Hover dwell before a taskbar button previews its window.
    pub hover_preview_delay: Duration,
    /// Polling policy for restoring remembered windows at startup.
    pub restore_retry: RetryPolicy,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::DockTop,
            minimize_button: true,
            pin_button: true,
            click_outside_minimizes_all: false,
            pin_double_close: true,
            remember_pinned: false,
            pinned_header_color: "#ff8800".to_owned(),
            taskbar_color: "#0000".to_owned(),
            debug_logging: false,
            verbose_logging: false,
            ignore_list: vec!["QuestTracker".to_owned(), "ee".to_owned()],
            close_guard: Duration::from_secs(2),
            hover_preview_delay: Duration::from_millis(1000),
            restore_retry: RetryPolicy::new(10, Duration::from_millis(250)),
        }
    }
}

impl DockConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout mode.
    #[must_use]
    pub fn with_layout_mode(mut self, mode: LayoutMode) -> Self {
        self.layout_mode = mode;
        self
    }

    /// Set the double-close guard duration.
    #[must_use]
    pub fn with_close_guard(mut self, guard: Duration) -> Self {
        self.close_guard = guard;
        self
    }

    /// Set the hover-preview dwell.
    #[must_use]
    pub fn with_hover_preview_delay(mut self, delay: Duration) -> Self {
        self.hover_preview_delay = delay;
        self
    }

    /// Set the startup-restore retry policy.
    #[must_use]
    pub fn with_restore_retry(mut self, policy: RetryPolicy) -> Self {
        self.restore_retry = policy;
        self
    }

    /// Materialize configuration from the host store.
    ///
    /// Missing keys fall back to defaults; present values of the wrong kind
    /// are an error, since they mean the store is corrupt.
    pub fn load(store: &dyn SettingsStore) -> Result<Self, SettingsError> {
        let mut config = Self::default();
        for key in ALL_KEYS {
            let Some(value) = store.get(key) else {
                continue;
            };
            config.set(key, &value)?;
        }
        Ok(config)
    }

    /// Fold in a changed setting and report the follow-up effect.
    ///
    /// Wrong-kind values leave the config untouched and have no effect;
    /// change notifications are not a correctness-critical path.
    pub fn apply(&mut self, key: SettingKey, value: &SettingValue) -> SettingEffect {
        let remembered_before = self.remember_pinned;
        let debug_before = self.debug_logging;
        if self.set(key, value).is_err() {
            return SettingEffect::None;
        }
        match key {
            SettingKey::LayoutMode
            | SettingKey::MinimizeButtonEnabled
            | SettingKey::PinButtonEnabled
            | SettingKey::ClickOutsideMinimizesAll => SettingEffect::Reload,
            SettingKey::PinnedHeaderColor | SettingKey::TaskbarColor => {
                SettingEffect::ReapplyPalette
            }
            SettingKey::RememberPinnedWindows => {
                if remembered_before && !self.remember_pinned {
                    SettingEffect::ClearPinnedPersistence
                } else {
                    SettingEffect::None
                }
            }
            SettingKey::DebugLogging => {
                if self.debug_logging == debug_before {
                    SettingEffect::None
                } else {
                    SettingEffect::DebugToggled(self.debug_logging)
                }
            }
            SettingKey::PinRequiresDoubleClose
            | SettingKey::VerboseDebugLogging
            | SettingKey::IgnoreList => SettingEffect::None,
        }
    }

    fn set(&mut self, key: SettingKey, value: &SettingValue) -> Result<(), SettingsError> {
        let wrong = |expected: &'static str| SettingsError::WrongKind { key, expected };
        match key {
            SettingKey::LayoutMode => {
                let raw = value.as_str().ok_or(wrong("text"))?;
                self.layout_mode = LayoutMode::from_setting(raw);
            }
            SettingKey::MinimizeButtonEnabled => {
                self.minimize_button = value.as_bool().ok_or(wrong("bool"))?;
            }
            SettingKey::PinButtonEnabled => {
                self.pin_button = value.as_bool().ok_or(wrong("bool"))?;
            }
            SettingKey::ClickOutsideMinimizesAll => {
                self.click_outside_minimizes_all = value.as_bool().ok_or(wrong("bool"))?;
            }
            SettingKey::PinRequiresDoubleClose => {
                self.pin_double_close = value.as_bool().ok_or(wrong("bool"))?;
            }
            SettingKey::RememberPinnedWindows => {
                self.remember_pinned = value.as_bool().ok_or(wrong("bool"))?;
            }
            SettingKey::PinnedHeaderColor => {
                self.pinned_header_color = value.as_str().ok_or(wrong("text"))?.to_owned();
            }
            SettingKey::TaskbarColor => {
                self.taskbar_color = value.as_str().ok_or(wrong("text"))?.to_owned();
            }
            SettingKey::DebugLogging => {
                self.debug_logging = value.as_bool().ok_or(wrong("bool"))?;
            }
            SettingKey::VerboseDebugLogging => {
                self.verbose_logging = value.as_bool().ok_or(wrong("bool"))?;
            }
            SettingKey::IgnoreList => {
                let raw = value.as_str().ok_or(wrong("text"))?;
                self.ignore_list = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect();
            }
        }
        Ok(())
    }

    /// Whether Dockhand leaves this window entirely to the host.
    ///
    /// Windows without document identity, tracker panels, and anything on
    /// the ignore list pass through untouched.
    #[must_use]
    pub fn ignores(&self, descriptor: &WindowDescriptor) -> bool {
        if !descriptor.is_document_backed() {
            return true;
        }
        if descriptor.category == WindowCategory::Tracker {
            return true;
        }
        self.ignore_list
            .iter()
            .any(|class| class == &descriptor.class_name)
    }
}
