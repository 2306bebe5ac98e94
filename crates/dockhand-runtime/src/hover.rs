#![forbid(unsafe_code)]
//! Dwell-to-preview tracking for taskbar buttons.
//!
//! A pointer resting on a taskbar button for the configured delay
//! temporarily reveals the hidden window; the reveal is rolled back the
//! moment neither the button nor the revealed window is hovered.
//!
//! # Invariants
//!
//! 1. At most one button is tracked at a time; beginning hover on a new
//!    key replaces any previous tracking.
//! 2. The deadline only exists between `begin` and either the fire or
//!    hover loss, so `next_deadline` never reports a stale timer.
//! 3. Re-entering the button of an active preview re-arms the timer but
//!    keeps the preview mark, so the eventual hover loss still rolls the
//!    reveal back.
//! 4. Leaving the button before the deadline drops the tracking without
//!    requesting a rollback.

use std::time::Duration;

use dockhand_core::identity::WindowKey;
use web_time::Instant;

#[derive(Debug)]
struct HoverState {
    key: WindowKey,
    deadline: Option<Instant>,
    hovering_button: bool,
    hovering_window: bool,
    previewing: bool,
}

impl HoverState {
    fn should_rollback(&self) -> bool {
        self.previewing && !self.hovering_button && !self.hovering_window
    }
}

/// Tracks the one button the pointer may be dwelling on.
#[derive(Debug)]
pub struct HoverPreview {
    delay: Duration,
    state: Option<HoverState>,
}

impl HoverPreview {
    /// Creates an idle tracker with the given dwell delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, state: None }
    }

    /// Key currently tracked, pending or previewing.
    #[must_use]
    pub fn active(&self) -> Option<&WindowKey> {
        self.state.as_ref().map(|s| &s.key)
    }

    /// Whether the key's window is currently revealed by preview tracking.
    #[must_use]
    pub fn is_previewing(&self, key: &WindowKey) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.key == *key && s.previewing)
    }

    /// Pointer entered a button: arm (or re-arm) the dwell timer.
    pub fn begin(&mut self, key: WindowKey, now: Instant) {
        let deadline = Some(now + self.delay);
        match &mut self.state {
            Some(state) if state.key == key => {
                state.hovering_button = true;
                state.deadline = deadline;
            }
            _ => {
                self.state = Some(HoverState {
                    key,
                    deadline,
                    hovering_button: true,
                    hovering_window: false,
                    previewing: false,
                });
            }
        }
    }

    /// Pointer left the button. Returns whether the reveal should be
    /// rolled back now.
    pub fn end_button(&mut self, key: &WindowKey) -> bool {
        let Some(state) = &mut self.state else {
            return false;
        };
        if state.key != *key {
            return false;
        }
        state.hovering_button = false;
        state.deadline = None;
        if state.previewing {
            state.should_rollback()
        } else {
            self.state = None;
            false
        }
    }

    /// Pointer entered or left the revealed window. Returns whether the
    /// reveal should be rolled back now.
    pub fn window_hover(&mut self, key: &WindowKey, hovering: bool) -> bool {
        let Some(state) = &mut self.state else {
            return false;
        };
        if state.key != *key || !state.previewing {
            return false;
        }
        state.hovering_window = hovering;
        !hovering && state.should_rollback()
    }

    /// Key whose dwell timer has elapsed while the button stayed hovered.
    #[must_use]
    pub fn due(&self, now: Instant) -> Option<&WindowKey> {
        let state = self.state.as_ref()?;
        if !state.hovering_button {
            return None;
        }
        let deadline = state.deadline?;
        (now >= deadline).then_some(&state.key)
    }

    /// The dwell timer fired and the reveal was issued.
    pub fn mark_fired(&mut self) {
        if let Some(state) = &mut self.state {
            state.deadline = None;
            state.previewing = true;
        }
    }

    /// The dwell timer fired but the window is no longer eligible.
    pub fn cancel_pending(&mut self) {
        if let Some(state) = &mut self.state {
            state.deadline = None;
        }
    }

    /// Drop tracking for a key after a commit, rollback, or close.
    pub fn clear(&mut self, key: &WindowKey) {
        if self.state.as_ref().is_some_and(|s| s.key == *key) {
            self.state = None;
        }
    }

    /// Instant the pending dwell timer elapses, if one is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.as_ref().and_then(|s| s.deadline)
    }
}
