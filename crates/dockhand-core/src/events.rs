#![forbid(unsafe_code)]

//! Events the host feeds into the controller.
//!
//! The host adapter translates its framework's lifecycle hooks and input
//! events into [`HostEvent`] values and hands each one to the controller
//! together with the current instant. The controller answers with an
//! [`Outcome`]: a disposition (did it take over, or should the host run its
//! default behavior?) plus commands to apply either way.
//!
//! # Invariants
//!
//! - Events reference windows by handle; the controller never dereferences
//!   host objects.
//! - A `PassThrough` disposition may still carry commands: bookkeeping
//!   cleanup the host must apply before running its default path.
//! - Feeding an event for an unknown handle is safe and produces a no-op.

use serde::{Deserialize, Serialize};

use crate::commands::HostCommand;
use crate::geometry::{Bounds, Extent, Point};
use crate::identity::WindowKey;
use crate::settings::{SettingKey, SettingValue};
use crate::window::{HostWindowId, WindowDescriptor};

/// Injected header control the user clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderControl {
    Minimize,
    Pin,
}

/// Pointer button reported with a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

/// One notification from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// The session is up: board dimensions and the height of the host's top
    /// navigation band, if one is shown.
    SessionReady {
        board: Extent,
        nav_band_height: Option<f64>,
    },
    /// The board was resized.
    BoardResized { board: Extent },
    /// A window finished rendering and is (or became) visible.
    ///
    /// Re-fired by hosts on re-render; handlers treat it as an upsert.
    WindowShown { descriptor: WindowDescriptor },
    /// A window was destroyed.
    WindowClosed { handle: HostWindowId },
    /// The user asked to close a window; the host awaits the disposition.
    CloseRequested { handle: HostWindowId },
    /// The user asked to minimize a window.
    MinimizeRequested { handle: HostWindowId },
    /// The user asked to restore a window.
    MaximizeRequested { handle: HostWindowId },
    /// A window was moved (by drag or programmatically).
    WindowMoved {
        handle: HostWindowId,
        placement: Bounds,
    },
    /// A window was resized.
    WindowResized {
        handle: HostWindowId,
        placement: Bounds,
    },
    /// A window was raised to the top of the stack.
    WindowRaised { handle: HostWindowId },
    /// An injected header control was clicked.
    HeaderControlClicked {
        handle: HostWindowId,
        control: HeaderControl,
    },
    /// A taskbar button was clicked.
    TaskbarButtonClicked { key: WindowKey },
    /// The pointer entered or left a taskbar button.
    TaskbarButtonHoverChanged { key: WindowKey, hovering: bool },
    /// The pointer entered or left a window carrying a hover probe.
    WindowHoverChanged {
        handle: HostWindowId,
        hovering: bool,
    },
    /// A pointer button went down, possibly on a window.
    PointerPressed {
        handle: Option<HostWindowId>,
        position: Point,
        button: PointerButton,
    },
    /// The pointer moved while a button is held.
    PointerMoved { position: Point },
    /// The held pointer button was released.
    PointerReleased,
    /// The pointer interaction was cancelled by the host.
    PointerCancelled,
    /// The host application lost focus.
    HostBlurred,
    /// The board background was clicked with no window under the pointer.
    CanvasClicked { selection_active: bool },
    /// A recognized setting changed value.
    SettingChanged {
        key: SettingKey,
        value: SettingValue,
    },
}

/// Whether the controller took over an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// The controller handled the request; the host must not run its
    /// default behavior.
    Handled,
    /// The host should run its default behavior after applying any
    /// commands in the outcome.
    PassThrough,
}

/// The controller's answer to one event.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Outcome {
    /// Whether the host's default behavior still runs.
    pub disposition: Disposition,
    /// Commands to apply, in order.
    pub commands: Vec<HostCommand>,
}

impl Outcome {
    /// The controller took over; apply these commands instead of the
    /// default behavior.
    pub fn handled(commands: Vec<HostCommand>) -> Self {
        Self {
            disposition: Disposition::Handled,
            commands,
        }
    }

    /// Nothing for the controller to do; run the default behavior.
    pub fn pass_through() -> Self {
        Self {
            disposition: Disposition::PassThrough,
            commands: Vec::new(),
        }
    }

    /// Apply cleanup commands, then run the default behavior.
    pub fn pass_through_with(commands: Vec<HostCommand>) -> Self {
        Self {
            disposition: Disposition::PassThrough,
            commands,
        }
    }

    /// Whether the controller took over.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.disposition == Disposition::Handled
    }
}
