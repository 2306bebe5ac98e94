#![forbid(unsafe_code)]
//! Slot allocation for minimized windows.
//!
//! A minimized window parks at a deterministic horizontal offset along
//! its row or dock. Offsets form a fixed grid: they start at a base
//! that depends on the layout mode and advance in [`SLOT_STEP`] hops,
//! one minimized window plus one gap per hop. The allocator hands out
//! the first free grid offset, reclaims slots whose occupant the host
//! no longer shows, and falls back to a degraded probe once the grid is
//! exhausted. Releasing a slot compacts every later occupant downward
//! so the grid stays contiguous.
//!
//! # Invariants
//!
//! 1. A key occupies at most one slot. Allocating for a key that is
//!    already stashed refreshes its saved placement and returns the
//!    offset it already holds.
//! 2. Grid offsets run from the mode's base in [`SLOT_STEP`] hops while
//!    below capacity plus one step; past that, allocation degrades to
//!    probing from the window's own left edge in [`DEGRADED_STEP`] hops.
//! 3. A slot whose occupant is no longer live is reclaimed in place,
//!    and the evicted key loses its index entry.
//! 4. Releasing a slot shifts each later occupant into the most recently
//!    freed offset, preserving relative order.
//! 5. An empty stash is never overflowed; otherwise overflow means the
//!    highest occupied offset has reached capacity.

use std::collections::BTreeMap;

use dockhand_core::geometry::Bounds;
use dockhand_core::identity::WindowKey;
use dockhand_core::settings::LayoutMode;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Width applied to a minimized window, in pixels.
pub const SLOT_WIDTH: f64 = 150.0;

/// Horizontal gap between adjacent minimized windows.
pub const SLOT_GAP: f64 = 10.0;

/// Distance between consecutive grid offsets: one slot plus one gap.
pub const SLOT_STEP: i32 = 160;

/// Probe distance used by the degraded allocation path.
pub const DEGRADED_STEP: i32 = 20;

/// Height of a minimized window's header strip.
const MINIMIZED_HEADER: f64 = 41.0;

/// Clearance kept above the board's bottom UI cluster in row-bottom mode.
const ROW_BOTTOM_CLEARANCE: f64 = 70.0;

/// Vertical padding between the nav band and a top-row window.
const NAV_BAND_PADDING: f64 = 20.0;

/// Top-row baseline when no nav band is present.
const BARE_TOP_BASELINE: f64 = 6.0;

/// First grid offset for the given layout mode.
#[must_use]
pub const fn base_offset(mode: LayoutMode) -> i32 {
    match mode {
        LayoutMode::RowTop => 130,
        LayoutMode::DockTop | LayoutMode::DockBottom => 5,
        LayoutMode::RowBottom | LayoutMode::Disabled => 260,
    }
}

/// Vertical baseline for minimized windows in a row layout.
///
/// The bottom row sits above the board's bottom UI cluster; the top row
/// hangs below the nav band when one is present and hugs the top edge
/// otherwise.
#[must_use]
pub fn row_baseline(mode: LayoutMode, board_height: f64, nav_band_height: Option<f64>) -> f64 {
    match mode {
        LayoutMode::RowBottom => board_height - ROW_BOTTOM_CLEARANCE - MINIMIZED_HEADER,
        _ => match nav_band_height {
            Some(nav) if nav > 0.0 => nav + NAV_BAND_PADDING,
            _ => BARE_TOP_BASELINE,
        },
    }
}

/// One occupied stash slot: who holds it and where they go back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StashSlot {
    /// Stable identity of the occupant.
    pub key: WindowKey,
    /// Placement to restore when the occupant leaves the stash.
    pub saved: Bounds,
}

/// A compaction step produced by [`StashAllocator::release`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotMove {
    /// Occupant being shifted.
    pub key: WindowKey,
    /// Offset the occupant held before the release.
    pub from: i32,
    /// Offset the occupant holds now.
    pub to: i32,
}

/// Grid allocator for minimized-window offsets.
#[derive(Debug, Clone)]
pub struct StashAllocator {
    mode: LayoutMode,
    board_width: f64,
    slots: BTreeMap<i32, StashSlot>,
    index: FxHashMap<WindowKey, i32>,
}

impl StashAllocator {
    /// Creates an empty allocator for the given mode and board width.
    #[must_use]
    pub fn new(mode: LayoutMode, board_width: f64) -> Self {
        Self {
            mode,
            board_width,
            slots: BTreeMap::new(),
            index: FxHashMap::default(),
        }
    }

    /// Layout mode this allocator was built for.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Updates the board width used for capacity checks.
    pub fn set_board_width(&mut self, width: f64) {
        self.board_width = width;
    }

    /// First grid offset for this allocator's mode.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> i32 {
        base_offset(self.mode)
    }

    /// Rightmost usable extent of the grid.
    ///
    /// Docks reserve room for three minimized windows' worth of controls
    /// at the right edge, rows for four.
    #[must_use]
    pub fn capacity(&self) -> f64 {
        let reserved = if self.mode.is_dock() { 3.0 } else { 4.0 };
        self.board_width - SLOT_WIDTH * reserved
    }

    /// Highest occupied offset, if any slot is taken.
    #[must_use]
    pub fn highest_offset(&self) -> Option<i32> {
        self.slots.keys().next_back().copied()
    }

    /// Whether the stash has spilled past its usable extent.
    #[must_use]
    pub fn is_overflowed(&self) -> bool {
        self.highest_offset()
            .is_some_and(|offset| f64::from(offset) >= self.capacity())
    }

    /// Z-layer minimized windows should take: raised while overflowed so
    /// the spill stays visible, floor-level otherwise.
    #[must_use]
    pub fn z_layer_hint(&self) -> i32 {
        if self.is_overflowed() { 10 } else { 1 }
    }

    /// Whether the key currently holds a slot.
    #[must_use]
    pub fn contains(&self, key: &WindowKey) -> bool {
        self.index.contains_key(key)
    }

    /// Offset held by the key, if stashed.
    #[must_use]
    pub fn offset_of(&self, key: &WindowKey) -> Option<i32> {
        self.index.get(key).copied()
    }

    /// Saved restore placement for the key, if stashed.
    #[must_use]
    pub fn saved_placement(&self, key: &WindowKey) -> Option<Bounds> {
        let offset = self.offset_of(key)?;
        self.slots.get(&offset).map(|slot| slot.saved)
    }

    /// Slot at the given offset, if occupied.
    #[must_use]
    pub fn slot_at(&self, offset: i32) -> Option<&StashSlot> {
        self.slots.get(&offset)
    }

    /// Occupied offsets in ascending order.
    pub fn offsets(&self) -> impl Iterator<Item = i32> + '_ {
        self.slots.keys().copied()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Assigns an offset to `key`, recording `current` as the placement
    /// to restore later.
    ///
    /// `is_live` reports whether a slot's occupant is still shown by the
    /// host; slots with dead occupants are reclaimed in place. The grid
    /// is walked first-fit from the base; once every grid offset below
    /// capacity plus one step is held by a live occupant, allocation
    /// degrades to probing from `current.left` in [`DEGRADED_STEP`]
    /// hops until an unused offset appears.
    pub fn allocate<F>(&mut self, key: &WindowKey, current: Bounds, is_live: F) -> i32
    where
        F: Fn(&WindowKey) -> bool,
    {
        if let Some(&offset) = self.index.get(key) {
            if let Some(slot) = self.slots.get_mut(&offset) {
                slot.saved = current;
            }
            return offset;
        }
        let limit = self.capacity() + f64::from(SLOT_STEP);
        let mut offset = self.base();
        while f64::from(offset) < limit {
            let evicted = match self.slots.get(&offset) {
                None => None,
                Some(slot) if is_live(&slot.key) => {
                    offset += SLOT_STEP;
                    continue;
                }
                Some(slot) => Some(slot.key.clone()),
            };
            if let Some(dead) = evicted {
                self.index.remove(&dead);
            }
            return self.occupy(offset, key.clone(), current);
        }
        let mut offset = current.left.round() as i32;
        while self.slots.contains_key(&offset) {
            offset += DEGRADED_STEP;
        }
        self.occupy(offset, key.clone(), current)
    }

    /// Frees the slot held by `key` and compacts later occupants.
    ///
    /// Each occupant past the freed offset shifts into the most recently
    /// freed one, so relative order is preserved and the grid closes up
    /// from the left. Returns the moves in the order they applied; the
    /// list is empty when the key held no slot.
    pub fn release(&mut self, key: &WindowKey) -> Vec<SlotMove> {
        let Some(freed) = self.index.remove(key) else {
            return Vec::new();
        };
        self.slots.remove(&freed);
        let later: Vec<i32> = self.slots.range(freed..).map(|(&offset, _)| offset).collect();
        let mut moves = Vec::with_capacity(later.len());
        let mut open = freed;
        for from in later {
            let Some(slot) = self.slots.remove(&from) else {
                continue;
            };
            self.index.insert(slot.key.clone(), open);
            moves.push(SlotMove {
                key: slot.key.clone(),
                from,
                to: open,
            });
            self.slots.insert(open, slot);
            open = from;
        }
        moves
    }

    fn occupy(&mut self, offset: i32, key: WindowKey, saved: Bounds) -> i32 {
        self.index.insert(key.clone(), offset);
        self.slots.insert(offset, StashSlot { key, saved });
        offset
    }
}
