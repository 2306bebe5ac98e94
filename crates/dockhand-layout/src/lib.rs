#![forbid(unsafe_code)]
//! # dockhand-layout
//!
//! Pure placement arithmetic for the Dockhand window manager: where a
//! minimized window lands, and where a dragged window may not.
//!
//! ## Role in Dockhand
//!
//! This crate sits between [`dockhand-core`]'s vocabulary types and the
//! runtime controller. It owns two concerns:
//!
//! - **Stash slots** ([`stash`]): the fixed-width grid of horizontal
//!   offsets that minimized windows occupy, including capacity limits,
//!   stale-slot reclamation, the degraded fallback path, and the
//!   compaction cascade that runs when a slot frees up.
//! - **Dock barriers** ([`barrier`]): the screen-edge strips that
//!   persistent taskbars occupy, the contact test used while a drag is
//!   in flight, and the corrective pass that nudges windows back out of
//!   the strip once the drag ends.
//!
//! Everything here is deterministic and side-effect free; the runtime
//! layer decides *when* these computations run and turns their results
//! into host commands.
//!
//! [`dockhand-core`]: dockhand_core

pub mod barrier;
pub mod stash;
