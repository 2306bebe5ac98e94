#![forbid(unsafe_code)]
//! # dockhand-runtime
//!
//! The event-driven controller that keeps many independently created and
//! destroyed host windows consistent with a small set of shared surfaces:
//! the taskbar strip, the packed minimized row, and the per-user pinned
//! list.
//!
//! ## Role in Dockhand
//!
//! The host adapter owns the actual windows and the event loop. It feeds
//! every lifecycle and input notification into [`DockController::handle`]
//! together with the current instant, applies the returned commands, and
//! honors the returned disposition for interceptable requests (close,
//! minimize, maximize). Deferred work (hover-preview dwell, startup
//! restore polling) runs through [`DockController::advance`], driven by
//! [`DockController::next_deadline`].
//!
//! ## Primary responsibilities
//!
//! - **Shadow state** ([`windows`]): one record per managed window with
//!   its resolved identity, visibility, pin state, and last placement.
//! - **Taskbar bookkeeping** ([`taskbar`]): at most one button per key,
//!   labels, icons, and the pinned-first sort order.
//! - **Deferred interactions** ([`hover`]): the hover-preview dwell and
//!   its rollback rules.
//! - **Deduplication** ([`dedup`]): at most one open window per document,
//!   with pin transfer and re-entrant close suppression.
//! - **Persistence** ([`persist`]): the remembered pinned list and the
//!   bounded startup-restore polling loop.
//! - **Orchestration** ([`controller`]): the single state machine that
//!   ties the above to [`dockhand_core::events::HostEvent`] and
//!   [`dockhand_core::commands::HostCommand`].
//!
//! Everything is single-threaded and synchronous; re-entrancy hazards are
//! handled with explicit in-flight guards and idempotent upserts, never
//! with locks.

pub mod controller;
pub mod dedup;
pub mod hover;
pub mod persist;
pub mod taskbar;
pub mod windows;

pub use controller::DockController;
