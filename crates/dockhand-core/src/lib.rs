#![forbid(unsafe_code)]

//! Core: identity, geometry, host contract, and configuration for Dockhand.
//!
//! # Role in Dockhand
//! `dockhand-core` is the vocabulary layer. It owns the types that cross the
//! host boundary in both directions and the small utilities every other crate
//! leans on.
//!
//! # Primary responsibilities
//! - **HostEvent / HostCommand**: the sans-IO contract. The host feeds events
//!   in; the controller answers with commands the host applies.
//! - **Identity**: runtime window keys and persistent document keys.
//! - **Settings**: the recognized configuration options, their registry
//!   metadata, and legacy-value migration.
//! - **Storage traits**: `FlagStore` (durable per-user flags) and
//!   `SettingsStore` (host settings values).
//!
//! # How it fits in the system
//! `dockhand-layout` builds pure placement logic on the geometry types;
//! `dockhand-runtime` consumes events and produces commands. Neither talks to
//! a real host; adapters live outside this workspace.

pub mod color;
pub mod commands;
pub mod events;
pub mod geometry;
pub mod identity;
pub mod retry;
pub mod settings;
pub mod store;
pub mod window;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
