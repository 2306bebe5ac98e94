#![forbid(unsafe_code)]
//! Dock-barrier geometry and drag tracking.
//!
//! A persistent taskbar occupies a strip along the board's top or
//! bottom edge, and windows must not come to rest inside it. Two
//! mechanisms cooperate:
//!
//! - [`DragWatch`] follows one window while its header is being
//!   dragged and reports edge-triggered contact transitions, using an
//!   expanded margin so contact registers slightly before the strip.
//! - [`DockBarrier::correction`] runs once the drag ends and computes
//!   the corrected top for any window left deeper in the strip than
//!   the tolerated margin.
//!
//! # Invariants
//!
//! 1. Contact uses the expanded convention: a window touching the
//!    margin zone around the strip already counts as contact.
//! 2. Correction uses the tolerant convention: a window may overlap the
//!    strip by up to the margin before it is moved, and it is moved to
//!    exactly that margin, never further.
//! 3. A correction that would round to no movement is suppressed.

use dockhand_core::geometry::{Bounds, Extent};
use dockhand_core::settings::DockEdge;
use dockhand_core::window::HostWindowId;

/// Height of the taskbar strip, in pixels.
pub const TASKBAR_HEIGHT: f64 = 40.0;

/// Overlap tolerated between a window and the taskbar strip.
pub const BARRIER_MARGIN: f64 = 2.0;

/// Height of the header zone at the top of a window; presses outside it
/// do not start a tracked drag.
pub const HEADER_ZONE: f64 = 64.0;

/// The screen-edge strip a persistent taskbar occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockBarrier {
    bounds: Bounds,
    edge: DockEdge,
    margin: f64,
}

impl DockBarrier {
    /// Builds a barrier from an explicit strip.
    #[must_use]
    pub const fn new(bounds: Bounds, edge: DockEdge, margin: f64) -> Self {
        Self { bounds, edge, margin }
    }

    /// Builds the barrier for a taskbar mounted on `edge` of a board of
    /// the given size, using the standard strip height and margin.
    #[must_use]
    pub fn for_board(board: Extent, edge: DockEdge) -> Self {
        let bounds = match edge {
            DockEdge::Top => Bounds::new(0.0, 0.0, board.width, TASKBAR_HEIGHT),
            DockEdge::Bottom => Bounds::new(
                0.0,
                board.height - TASKBAR_HEIGHT,
                board.width,
                TASKBAR_HEIGHT,
            ),
        };
        Self::new(bounds, edge, BARRIER_MARGIN)
    }

    /// Strip occupied by the taskbar.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Edge the taskbar is mounted on.
    #[inline]
    #[must_use]
    pub const fn edge(&self) -> DockEdge {
        self.edge
    }

    /// Whether the window is in contact with the barrier.
    ///
    /// Contact is deliberately eager: the margin extends the strip, so
    /// a window hovering just outside it already registers.
    #[must_use]
    pub fn contact(&self, window: Bounds) -> bool {
        match self.edge {
            DockEdge::Top => window.top < self.bounds.bottom() + self.margin,
            DockEdge::Bottom => window.bottom() > self.bounds.top - self.margin,
        }
    }

    /// Corrected top coordinate for a window resting in the strip, or
    /// `None` when its placement is already tolerable.
    ///
    /// A window may overlap the strip by up to the margin; one that
    /// goes deeper is moved back to exactly the margin line. Moves that
    /// round to the current top are suppressed.
    #[must_use]
    pub fn correction(&self, window: Bounds) -> Option<f64> {
        if window.height <= 0.0 {
            return None;
        }
        let new_top = match self.edge {
            DockEdge::Top => {
                let limit = self.bounds.bottom() - self.margin;
                if window.top < limit { limit } else { return None }
            }
            DockEdge::Bottom => {
                let limit = self.bounds.top + self.margin;
                if window.bottom() > limit {
                    limit - window.height
                } else {
                    return None;
                }
            }
        };
        if new_top.round() == window.top.round() {
            return None;
        }
        Some(new_top)
    }
}

/// Transition reported by [`DragWatch::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierTransition {
    /// The tracked window entered the barrier's contact zone.
    Contact,
    /// The tracked window left the contact zone.
    Clear,
}

/// Edge-triggered contact tracker for one in-flight header drag.
#[derive(Debug, Clone, Default)]
pub struct DragWatch {
    tracking: Option<HostWindowId>,
    in_contact: bool,
}

impl DragWatch {
    /// Creates a watch with no tracked window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Window currently being tracked, if any.
    #[inline]
    #[must_use]
    pub const fn tracking(&self) -> Option<HostWindowId> {
        self.tracking
    }

    /// Starts tracking a drag on `handle`, resetting contact state.
    pub fn begin(&mut self, handle: HostWindowId) {
        self.tracking = Some(handle);
        self.in_contact = false;
    }

    /// Feeds a movement of `handle` and reports a transition when the
    /// contact state flips. Movements of untracked windows are ignored.
    pub fn observe(
        &mut self,
        handle: HostWindowId,
        window: Bounds,
        barrier: &DockBarrier,
    ) -> Option<BarrierTransition> {
        if self.tracking != Some(handle) {
            return None;
        }
        let touching = barrier.contact(window);
        if touching == self.in_contact {
            return None;
        }
        self.in_contact = touching;
        Some(if touching {
            BarrierTransition::Contact
        } else {
            BarrierTransition::Clear
        })
    }

    /// Stops tracking and returns the window that was tracked, if any.
    pub fn end(&mut self) -> Option<HostWindowId> {
        self.in_contact = false;
        self.tracking.take()
    }
}
