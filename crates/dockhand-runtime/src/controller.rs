#![forbid(unsafe_code)]
//! The orchestrating state machine.
//!
//! [`DockController`] owns every piece of runtime state and is the only
//! type a host adapter talks to. The adapter translates its native
//! notifications into [`HostEvent`]s, calls [`DockController::handle`]
//! with the current instant, applies the returned commands in order, and
//! honors the disposition for the three interceptable requests (close,
//! minimize, maximize). Timed work runs through
//! [`DockController::advance`], scheduled by
//! [`DockController::next_deadline`].
//!
//! # Invariants
//!
//! 1. Events for windows the controller does not manage (unknown handles,
//!    ignored classes) always pass through untouched.
//! 2. A pinned window never closes through its close control: the request
//!    is absorbed or converted into a minimize, in every layout mode.
//! 3. Shadow state is updated before commands are emitted, so a re-entrant
//!    event arriving between commands sees the post-transition state.
//! 4. Pointer events always pass through; enforcement rides along as
//!    extra commands and never swallows the host's own drag handling.

use dockhand_core::color::PinnedPalette;
use dockhand_core::commands::{HostCommand, NotifyLevel};
use dockhand_core::events::{HeaderControl, HostEvent, Outcome, PointerButton};
use dockhand_core::geometry::{Bounds, Extent, Point};
use dockhand_core::identity::WindowKey;
use dockhand_core::settings::{DockConfig, SettingEffect, SettingKey, SettingValue};
use dockhand_core::store::FlagStore;
use dockhand_core::window::{HostWindowId, Visibility, WindowCategory, WindowDescriptor};
use dockhand_layout::barrier::{BarrierTransition, DockBarrier, DragWatch, HEADER_ZONE};
use dockhand_layout::stash::{self, SlotMove, StashAllocator};
use web_time::Instant;

use crate::dedup::{self, DedupGuard, DedupPlan};
use crate::hover::HoverPreview;
use crate::persist::{PinStore, PinnedRecord, RestoreOutcome, RestoreQueue};
use crate::taskbar::{self, TaskbarStore};
use crate::windows::WindowTable;

/// The single-threaded window-management controller.
///
/// Generic over the host's [`FlagStore`] so persistence works against
/// whatever per-user storage the embedding application provides.
#[derive(Debug)]
pub struct DockController<F> {
    config: DockConfig,
    flags: F,
    board: Extent,
    nav_band_height: Option<f64>,
    windows: WindowTable,
    taskbar: TaskbarStore,
    stash: StashAllocator,
    barrier: Option<DockBarrier>,
    watch: DragWatch,
    hover: HoverPreview,
    dedup: DedupGuard,
    pins: PinStore,
    restores: RestoreQueue,
}

impl<F: FlagStore> DockController<F> {
    /// Creates a controller from a materialized configuration and the
    /// host's flag store. Board geometry arrives with
    /// [`HostEvent::SessionReady`].
    pub fn new(config: DockConfig, flags: F) -> Self {
        let stash = StashAllocator::new(config.layout_mode, 0.0);
        let hover = HoverPreview::new(config.hover_preview_delay);
        let restores = RestoreQueue::new(config.restore_retry);
        Self {
            config,
            flags,
            board: Extent::new(0.0, 0.0),
            nav_band_height: None,
            windows: WindowTable::new(),
            taskbar: TaskbarStore::new(),
            stash,
            barrier: None,
            watch: DragWatch::new(),
            hover,
            dedup: DedupGuard::new(),
            pins: PinStore::new(),
            restores,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    /// The host flag store the controller persists through.
    #[must_use]
    pub fn flags(&self) -> &F {
        &self.flags
    }

    /// Feeds one host event through the state machine.
    ///
    /// Returns the commands the host must apply plus the disposition for
    /// interceptable requests. `now` is the host's current instant and is
    /// the only clock the controller ever sees.
    pub fn handle(&mut self, event: HostEvent, now: Instant) -> Outcome {
        match event {
            HostEvent::SessionReady {
                board,
                nav_band_height,
            } => self.on_session_ready(board, nav_band_height, now),
            HostEvent::BoardResized { board } => self.on_board_resized(board),
            HostEvent::WindowShown { descriptor } => self.on_window_shown(descriptor),
            HostEvent::WindowClosed { handle } => self.on_window_closed(handle),
            HostEvent::CloseRequested { handle } => self.on_close_requested(handle, now),
            HostEvent::MinimizeRequested { handle } => self.on_minimize_requested(handle),
            HostEvent::MaximizeRequested { handle } => self.on_maximize_requested(handle),
            HostEvent::WindowMoved { handle, placement } => self.on_window_moved(handle, placement),
            HostEvent::WindowResized { handle, placement } => {
                self.on_window_resized(handle, placement)
            }
            HostEvent::WindowRaised { handle } => self.on_window_raised(handle),
            HostEvent::HeaderControlClicked { handle, control } => {
                self.on_header_control(handle, control)
            }
            HostEvent::TaskbarButtonClicked { key } => self.on_taskbar_clicked(&key),
            HostEvent::TaskbarButtonHoverChanged { key, hovering } => {
                self.on_button_hover(key, hovering, now)
            }
            HostEvent::WindowHoverChanged { handle, hovering } => {
                self.on_window_hover(handle, hovering)
            }
            HostEvent::PointerPressed {
                handle,
                position,
                button,
            } => self.on_pointer_pressed(handle, position, button),
            HostEvent::PointerMoved { .. } => Outcome::pass_through(),
            HostEvent::PointerReleased | HostEvent::PointerCancelled | HostEvent::HostBlurred => {
                self.on_pointer_settled()
            }
            HostEvent::CanvasClicked { selection_active } => {
                self.on_canvas_clicked(selection_active)
            }
            HostEvent::SettingChanged { key, value } => self.on_setting_changed(key, &value),
        }
    }

    /// Runs any deferred work that came due: the hover-preview dwell and
    /// the startup restore polling loop.
    ///
    /// Hosts call this whenever [`Self::next_deadline`] elapses; calling
    /// it early is a cheap no-op.
    pub fn advance(&mut self, now: Instant) -> Vec<HostCommand> {
        let mut commands = Vec::new();

        if let Some(key) = self.hover.due(now).cloned() {
            let eligible = self
                .windows
                .by_key(&key)
                .is_some_and(|r| r.visibility == Visibility::MinimizedTaskbar && r.descriptor.hidden);
            if eligible {
                if let Some(handle) = self.windows.handle_for_key(&key) {
                    if let Some(record) = self.windows.get_mut(handle) {
                        record.shown_by_preview = true;
                        record.descriptor.hidden = false;
                    }
                    self.windows.record_raised(handle);
                    commands.push(HostCommand::ShowWindow { handle });
                    commands.push(HostCommand::BringToFront { handle });
                    commands.push(HostCommand::AttachHoverProbe { handle });
                    self.hover.mark_fired();
                } else {
                    self.hover.cancel_pending();
                }
            } else {
                self.hover.cancel_pending();
            }
        }

        let outcomes = {
            let windows = &self.windows;
            // a shown-but-unrendered window is not ready to pin; keep polling
            self.restores.poll(now, |id| {
                windows
                    .find_by_document(id)
                    .filter(|r| r.descriptor.rendered)
                    .map(|r| r.handle())
            })
        };
        for outcome in outcomes {
            match outcome {
                RestoreOutcome::Ready { handle, record: remembered } => {
                    commands.extend(self.pin_window(handle));
                    if let Some(saved) = remembered.position {
                        commands.push(HostCommand::placement(handle, saved));
                        if let Some(record) = self.windows.get_mut(handle) {
                            record.descriptor.placement = saved;
                        }
                    }
                    if self.config.layout_mode.is_dock() {
                        commands.extend(self.minimize_to_taskbar(handle));
                    }
                }
                RestoreOutcome::Abandoned { key } => {
                    tracing::warn!(
                        target: "dockhand_runtime::restore",
                        document = %key,
                        "gave up restoring a remembered pinned window"
                    );
                }
            }
        }

        commands
    }

    /// The earliest instant at which [`Self::advance`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.hover.next_deadline(), self.restores.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ---- session lifecycle -------------------------------------------------

    fn on_session_ready(
        &mut self,
        board: Extent,
        nav_band_height: Option<f64>,
        now: Instant,
    ) -> Outcome {
        self.board = board;
        self.nav_band_height = nav_band_height;
        self.stash.set_board_width(board.width);
        self.barrier = self
            .config
            .layout_mode
            .dock_edge()
            .map(|edge| DockBarrier::for_board(board, edge));

        let mut commands = Vec::new();
        if let Some(edge) = self.config.layout_mode.dock_edge() {
            commands.push(HostCommand::MountTaskbar { edge });
        }
        commands.push(HostCommand::ApplyPinnedPalette {
            palette: PinnedPalette::derive(
                &self.config.pinned_header_color,
                &self.config.taskbar_color,
            ),
        });
        if self.config.remember_pinned {
            match self.pins.load(&self.flags) {
                Ok(remembered) => {
                    for record in remembered {
                        tracing::debug!(
                            target: "dockhand_runtime::restore",
                            document = %record.id,
                            "re-opening a remembered pinned window"
                        );
                        commands.push(HostCommand::OpenDocument {
                            key: record.id.clone(),
                        });
                        self.restores.enqueue(record, now);
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        target: "dockhand_runtime::persist",
                        %error,
                        "could not load the remembered pinned list"
                    );
                }
            }
        }
        tracing::info!(
            target: "dockhand_runtime",
            mode = self.config.layout_mode.as_str(),
            board_width = board.width,
            board_height = board.height,
            "session ready"
        );
        Outcome::handled(commands)
    }

    fn on_board_resized(&mut self, board: Extent) -> Outcome {
        self.board = board;
        self.stash.set_board_width(board.width);
        if let Some(edge) = self.config.layout_mode.dock_edge() {
            self.barrier = Some(DockBarrier::for_board(board, edge));
        }
        Outcome::handled(Vec::new())
    }

    // ---- window lifecycle --------------------------------------------------

    fn on_window_shown(&mut self, descriptor: WindowDescriptor) -> Outcome {
        if self.config.ignores(&descriptor) {
            return Outcome::pass_through();
        }
        let handle = descriptor.handle;
        self.windows.upsert(descriptor);
        let mut commands = Vec::new();

        if self.config.minimize_button || self.config.pin_button {
            commands.push(HostCommand::EnsureHeaderControls {
                handle,
                minimize: self.config.minimize_button,
                pin: self.config.pin_button,
            });
        }

        // A window can come back from the host still display-hidden from a
        // taskbar stint that no button owns any more; unhide it.
        if let Some(record) = self.windows.get_mut(handle) {
            if record.descriptor.hidden && !self.taskbar.contains(&record.key) {
                record.descriptor.hidden = false;
                commands.push(HostCommand::ShowWindow { handle });
            }
        }

        // Remembered documents pin themselves as soon as they appear. This
        // must land before duplicate planning so pin transfer sees it.
        let auto_pin = self.config.remember_pinned
            && self.windows.get(handle).is_some_and(|r| {
                !r.pinned
                    && r.descriptor
                        .document_key()
                        .is_some_and(|d| self.pins.is_remembered(d))
            });
        if auto_pin {
            commands.extend(self.pin_window(handle));
        } else if self.windows.get(handle).is_some_and(|r| r.pinned) {
            // re-render of an already pinned window refreshes its chrome
            commands.push(HostCommand::SetPinnedStyling {
                handle,
                pinned: true,
            });
            commands.push(HostCommand::SetCloseControlHidden {
                handle,
                hidden: true,
            });
        }

        if let Some(plan) = dedup::plan(&self.windows, handle) {
            self.apply_dedup(&plan, &mut commands);
        }

        Outcome::handled(commands)
    }

    fn on_window_closed(&mut self, handle: HostWindowId) -> Outcome {
        let Some(record) = self.windows.remove(handle) else {
            return Outcome::pass_through();
        };
        let key = record.key;
        let mut commands = Vec::new();
        commands.extend(self.taskbar.remove(&key));
        let moves = self.stash.release(&key);
        self.compact_row(&moves, &mut commands);
        self.hover.clear(&key);
        if self.dedup.finish(&key) {
            tracing::debug!(
                target: "dockhand_runtime::dedup",
                %key,
                "duplicate close completed"
            );
        }
        if self.watch.tracking() == Some(handle) {
            self.watch.end();
        }
        Outcome::handled(commands)
    }

    // ---- intercepted requests ----------------------------------------------

    fn on_close_requested(&mut self, handle: HostWindowId, now: Instant) -> Outcome {
        let (key, pinned, minimized, hidden) = {
            let Some(record) = self.windows.get(handle) else {
                return Outcome::pass_through();
            };
            (
                record.key.clone(),
                record.pinned,
                record.visibility.is_minimized(),
                record.descriptor.hidden,
            )
        };

        // A close the controller itself ordered for a duplicate must run
        // unintercepted, pinned or not.
        if self.dedup.is_in_flight(&key) {
            return Outcome::pass_through();
        }

        if pinned {
            if minimized {
                return Outcome::handled(Vec::new());
            }
            if self.config.pin_double_close {
                let armed = {
                    let record = self.windows.get(handle);
                    record.and_then(|r| r.close_guard_until).is_some_and(|until| now < until)
                };
                if armed {
                    if let Some(record) = self.windows.get_mut(handle) {
                        record.close_guard_until = None;
                    }
                    return Outcome::handled(self.minimize_window(handle));
                }
                if let Some(record) = self.windows.get_mut(handle) {
                    record.close_guard_until = Some(now + self.config.close_guard);
                }
                tracing::debug!(
                    target: "dockhand_runtime",
                    %key,
                    "absorbed a close on a pinned window; a second close will minimize it"
                );
                return Outcome::handled(Vec::new());
            }
            return Outcome::handled(self.minimize_window(handle));
        }

        // Unpinned: clean our surfaces up front, then let the real close run.
        let mut commands = Vec::new();
        if self.taskbar.contains(&key) {
            commands.extend(self.taskbar.remove(&key));
        }
        if hidden {
            commands.push(HostCommand::ShowWindow { handle });
        }
        self.hover.clear(&key);
        Outcome::pass_through_with(commands)
    }

    fn on_minimize_requested(&mut self, handle: HostWindowId) -> Outcome {
        let Some(record) = self.windows.get(handle) else {
            return Outcome::pass_through();
        };
        if !self.config.layout_mode.is_active() {
            return Outcome::pass_through();
        }
        if record.visibility.is_minimized() {
            return Outcome::handled(Vec::new());
        }
        Outcome::handled(self.minimize_window(handle))
    }

    fn on_maximize_requested(&mut self, handle: HostWindowId) -> Outcome {
        let visibility = match self.windows.get(handle) {
            Some(record) => record.visibility,
            None => return Outcome::pass_through(),
        };
        match visibility {
            Visibility::MinimizedTaskbar => Outcome::handled(self.restore_from_taskbar(handle)),
            Visibility::MinimizedRow => Outcome::handled(self.restore_from_row(handle)),
            Visibility::Normal => Outcome::pass_through(),
        }
    }

    fn on_header_control(&mut self, handle: HostWindowId, control: HeaderControl) -> Outcome {
        let Some(record) = self.windows.get(handle) else {
            return Outcome::pass_through();
        };
        match control {
            HeaderControl::Minimize => {
                if record.visibility.is_minimized() {
                    Outcome::handled(self.restore_window(handle))
                } else if self.config.layout_mode.is_active() {
                    Outcome::handled(self.minimize_window(handle))
                } else {
                    Outcome::pass_through()
                }
            }
            HeaderControl::Pin => {
                if record.pinned {
                    Outcome::handled(self.unpin_window(handle))
                } else {
                    Outcome::handled(self.pin_window(handle))
                }
            }
        }
    }

    // ---- movement and stacking ---------------------------------------------

    fn on_window_moved(&mut self, handle: HostWindowId, placement: Bounds) -> Outcome {
        if let Some(record) = self.windows.get_mut(handle) {
            record.descriptor.placement = placement;
        } else {
            return Outcome::pass_through();
        }
        if self.config.verbose_logging {
            tracing::trace!(
                target: "dockhand_runtime::windows",
                %handle,
                left = placement.left,
                top = placement.top,
                "position update"
            );
        }
        if self.config.debug_logging {
            if let Some(barrier) = &self.barrier {
                if let Some(transition) = self.watch.observe(handle, placement, barrier) {
                    match transition {
                        BarrierTransition::Contact => tracing::debug!(
                            target: "dockhand_runtime::barrier",
                            %handle,
                            "window contacted the taskbar strip"
                        ),
                        BarrierTransition::Clear => tracing::debug!(
                            target: "dockhand_runtime::barrier",
                            %handle,
                            "window cleared the taskbar strip"
                        ),
                    }
                }
            }
        }
        Outcome::handled(Vec::new())
    }

    fn on_window_resized(&mut self, handle: HostWindowId, placement: Bounds) -> Outcome {
        let Some(record) = self.windows.get_mut(handle) else {
            return Outcome::pass_through();
        };
        record.descriptor.placement = placement;
        Outcome::handled(Vec::new())
    }

    fn on_window_raised(&mut self, handle: HostWindowId) -> Outcome {
        if self.windows.get(handle).is_none() {
            return Outcome::pass_through();
        }
        self.windows.record_raised(handle);
        Outcome::handled(Vec::new())
    }

    fn on_pointer_pressed(
        &mut self,
        handle: Option<HostWindowId>,
        position: Point,
        button: PointerButton,
    ) -> Outcome {
        // The drag watch is purely diagnostic; it only runs with a barrier
        // present and debug logging on.
        if self.config.debug_logging && button == PointerButton::Primary && self.barrier.is_some()
        {
            if let Some(handle) = handle {
                if let Some(record) = self.windows.get(handle) {
                    let header = Bounds::new(
                        record.descriptor.placement.left,
                        record.descriptor.placement.top,
                        record.descriptor.placement.width,
                        HEADER_ZONE,
                    );
                    if record.is_effectively_visible() && header.contains(position) {
                        self.watch.begin(handle);
                    }
                }
            }
        }
        Outcome::pass_through()
    }

    fn on_pointer_settled(&mut self) -> Outcome {
        self.watch.end();
        Outcome::pass_through_with(self.enforce_barrier())
    }

    fn enforce_barrier(&mut self) -> Vec<HostCommand> {
        let Some(barrier) = self.barrier else {
            return Vec::new();
        };
        let mut commands = Vec::new();
        for handle in self.windows.handles_sorted() {
            let (placement, hidden) = match self.windows.get(handle) {
                Some(record) => (record.descriptor.placement, record.descriptor.hidden),
                None => continue,
            };
            if hidden {
                continue;
            }
            let Some(new_top) = barrier.correction(placement) else {
                continue;
            };
            if self.config.debug_logging {
                tracing::debug!(
                    target: "dockhand_runtime::barrier",
                    %handle,
                    from = placement.top,
                    to = new_top,
                    "pushed a window off the taskbar strip"
                );
            }
            commands.push(HostCommand::SetPlacement {
                handle,
                left: None,
                top: Some(new_top),
                width: None,
            });
            if let Some(record) = self.windows.get_mut(handle) {
                record.descriptor.placement.top = new_top;
            }
        }
        commands
    }

    // ---- taskbar interactions ----------------------------------------------

    fn on_taskbar_clicked(&mut self, key: &WindowKey) -> Outcome {
        let Some(handle) = self.windows.handle_for_key(key) else {
            // the window died without telling us; drop the stale button
            return Outcome::handled(self.taskbar.remove(key));
        };
        let was_previewing = self.hover.is_previewing(key);
        self.hover.clear(key);

        let (visibility, hidden, pinned) = match self.windows.get(handle) {
            Some(record) => (
                record.visibility,
                record.descriptor.hidden,
                record.pinned,
            ),
            None => return Outcome::handled(Vec::new()),
        };

        // Clicking during a preview commits the window to a real restore,
        // so leaving the button won't re-hide it. The preview already
        // raised it.
        if was_previewing {
            return Outcome::handled(self.restore_from_taskbar(handle));
        }

        if hidden || visibility.is_minimized() {
            let mut commands = self.restore_window(handle);
            self.windows.record_raised(handle);
            commands.push(HostCommand::BringToFront { handle });
            return Outcome::handled(commands);
        }

        if pinned && self.windows.is_topmost(handle) {
            return Outcome::handled(self.minimize_window(handle));
        }

        self.windows.record_raised(handle);
        Outcome::handled(vec![HostCommand::BringToFront { handle }])
    }

    fn on_button_hover(&mut self, key: WindowKey, hovering: bool, now: Instant) -> Outcome {
        if hovering {
            let mut commands = Vec::new();
            // moving straight from one button to another rolls the old
            // preview back before the new dwell starts
            if let Some(active) = self.hover.active().cloned() {
                if active != key && self.hover.is_previewing(&active) {
                    commands.extend(self.rollback_preview(&active));
                }
            }
            self.hover.begin(key, now);
            Outcome::handled(commands)
        } else if self.hover.end_button(&key) {
            Outcome::handled(self.rollback_preview(&key))
        } else {
            Outcome::handled(Vec::new())
        }
    }

    fn on_window_hover(&mut self, handle: HostWindowId, hovering: bool) -> Outcome {
        let Some(record) = self.windows.get(handle) else {
            return Outcome::pass_through();
        };
        let key = record.key.clone();
        if self.hover.window_hover(&key, hovering) {
            Outcome::handled(self.rollback_preview(&key))
        } else {
            Outcome::handled(Vec::new())
        }
    }

    // ---- board interactions ------------------------------------------------

    fn on_canvas_clicked(&mut self, selection_active: bool) -> Outcome {
        if !self.config.click_outside_minimizes_all
            || selection_active
            || !self.config.layout_mode.is_active()
        {
            return Outcome::pass_through();
        }
        let mut commands = Vec::new();
        for handle in self.windows.handles_sorted() {
            let eligible = self.windows.get(handle).is_some_and(|r| {
                r.visibility.is_normal()
                    && !r.pinned
                    && !r.descriptor.hidden
                    && r.descriptor.category == WindowCategory::Sheet
            });
            if eligible {
                commands.extend(self.minimize_window(handle));
            }
        }
        Outcome::handled(commands)
    }

    fn on_setting_changed(&mut self, key: SettingKey, value: &SettingValue) -> Outcome {
        let was_dock = self.config.layout_mode.is_dock();
        let effect = self.config.apply(key, value);
        let mut commands = Vec::new();
        match effect {
            SettingEffect::None => {}
            SettingEffect::Reload => {
                // a layout-mode change rebuilds everything after reload;
                // unmount the strip eagerly if it is going away
                if was_dock && !self.config.layout_mode.is_dock() {
                    commands.push(HostCommand::UnmountTaskbar);
                }
                commands.push(HostCommand::RequestReload);
            }
            SettingEffect::ReapplyPalette => {
                commands.push(HostCommand::ApplyPinnedPalette {
                    palette: PinnedPalette::derive(
                        &self.config.pinned_header_color,
                        &self.config.taskbar_color,
                    ),
                });
            }
            SettingEffect::ClearPinnedPersistence => {
                if let Err(error) = self.pins.clear(&mut self.flags) {
                    tracing::warn!(
                        target: "dockhand_runtime::persist",
                        %error,
                        "could not clear the remembered pinned list"
                    );
                }
            }
            SettingEffect::DebugToggled(enabled) => {
                commands.push(HostCommand::Notify {
                    level: NotifyLevel::Info,
                    message: if enabled {
                        "Debug logging enabled".to_owned()
                    } else {
                        "Debug logging disabled".to_owned()
                    },
                });
            }
        }
        Outcome::handled(commands)
    }

    // ---- transitions -------------------------------------------------------

    /// Minimizes through whichever surface the layout mode uses. Returns
    /// no commands in the disabled mode or when the row refuses.
    fn minimize_window(&mut self, handle: HostWindowId) -> Vec<HostCommand> {
        if self.config.layout_mode.is_dock() {
            self.minimize_to_taskbar(handle)
        } else if self.config.layout_mode.is_row() {
            self.minimize_to_row(handle)
        } else {
            Vec::new()
        }
    }

    /// Restores from whichever surface currently holds the window.
    fn restore_window(&mut self, handle: HostWindowId) -> Vec<HostCommand> {
        let (visibility, hidden) = match self.windows.get(handle) {
            Some(record) => (record.visibility, record.descriptor.hidden),
            None => return Vec::new(),
        };
        match visibility {
            Visibility::MinimizedTaskbar => self.restore_from_taskbar(handle),
            Visibility::MinimizedRow => self.restore_from_row(handle),
            Visibility::Normal => {
                if hidden {
                    if let Some(record) = self.windows.get_mut(handle) {
                        record.descriptor.hidden = false;
                    }
                    vec![HostCommand::ShowWindow { handle }]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn minimize_to_taskbar(&mut self, handle: HostWindowId) -> Vec<HostCommand> {
        let Some(record) = self.windows.get_mut(handle) else {
            return Vec::new();
        };
        record.visibility = Visibility::MinimizedTaskbar;
        record.descriptor.hidden = true;
        record.shown_by_preview = false;
        let key = record.key.clone();
        let descriptor = record.descriptor.clone();
        let pinned = record.pinned;

        let mut commands = self.taskbar.upsert(&key, &descriptor, pinned);
        commands.push(HostCommand::ApplyMinimizedChrome {
            handle,
            title: taskbar::curate_title(&descriptor.title),
        });
        commands.push(HostCommand::HideWindow { handle });
        commands
    }

    fn restore_from_taskbar(&mut self, handle: HostWindowId) -> Vec<HostCommand> {
        let Some(record) = self.windows.get_mut(handle) else {
            return Vec::new();
        };
        record.visibility = Visibility::Normal;
        record.descriptor.hidden = false;
        record.shown_by_preview = false;
        record.close_guard_until = None;
        let key = record.key.clone();
        let descriptor = record.descriptor.clone();
        let pinned = record.pinned;

        let mut commands = vec![
            HostCommand::ShowWindow { handle },
            HostCommand::ApplyRestoredChrome {
                handle,
                title: taskbar::uncurate_title(&descriptor.title),
            },
        ];
        if pinned {
            // pinned windows keep their button while open
            commands.extend(self.taskbar.upsert(&key, &descriptor, true));
            commands.push(HostCommand::SetCloseControlHidden {
                handle,
                hidden: true,
            });
        } else {
            commands.extend(self.taskbar.remove(&key));
        }
        self.hover.clear(&key);
        commands
    }

    fn minimize_to_row(&mut self, handle: HostWindowId) -> Vec<HostCommand> {
        let (key, placement, title) = {
            let Some(record) = self.windows.get(handle) else {
                return Vec::new();
            };
            (
                record.key.clone(),
                record.descriptor.placement,
                record.descriptor.title.clone(),
            )
        };
        if self.stash.is_overflowed() && !self.stash.contains(&key) {
            tracing::debug!(
                target: "dockhand_runtime::stash",
                %key,
                "minimized row is full; leaving the window open"
            );
            return Vec::new();
        }

        let windows = &self.windows;
        let offset = self.stash.allocate(&key, placement, |k| windows.is_live(k));
        let baseline = stash::row_baseline(
            self.config.layout_mode,
            self.board.height,
            self.nav_band_height,
        );

        let mut commands = vec![
            HostCommand::SetPlacement {
                handle,
                left: Some(f64::from(offset)),
                top: Some(baseline),
                width: Some(stash::SLOT_WIDTH),
            },
            HostCommand::ApplyMinimizedChrome {
                handle,
                title: taskbar::curate_title(&title),
            },
            HostCommand::SetZLayer {
                handle,
                layer: self.stash.z_layer_hint(),
            },
        ];
        if !self.stash.is_overflowed() {
            commands.push(HostCommand::SetDragLock {
                handle,
                locked: true,
            });
        }

        if let Some(record) = self.windows.get_mut(handle) {
            record.visibility = Visibility::MinimizedRow;
            record.descriptor.placement.left = f64::from(offset);
            record.descriptor.placement.top = baseline;
            record.descriptor.placement.width = stash::SLOT_WIDTH;
        }
        commands
    }

    fn restore_from_row(&mut self, handle: HostWindowId) -> Vec<HostCommand> {
        let (key, pinned, title) = {
            let Some(record) = self.windows.get(handle) else {
                return Vec::new();
            };
            (
                record.key.clone(),
                record.pinned,
                record.descriptor.title.clone(),
            )
        };
        let saved = self.stash.saved_placement(&key);
        let moves = self.stash.release(&key);

        let mut commands = Vec::new();
        self.compact_row(&moves, &mut commands);
        if let Some(saved) = saved {
            commands.push(HostCommand::placement(handle, saved));
        }
        commands.push(HostCommand::ApplyRestoredChrome {
            handle,
            title: taskbar::uncurate_title(&title),
        });
        commands.push(HostCommand::SetDragLock {
            handle,
            locked: false,
        });
        if pinned {
            commands.push(HostCommand::SetCloseControlHidden {
                handle,
                hidden: true,
            });
        }

        if let Some(record) = self.windows.get_mut(handle) {
            record.visibility = Visibility::Normal;
            record.close_guard_until = None;
            if let Some(saved) = saved {
                record.descriptor.placement = saved;
            }
        }
        commands
    }

    /// Slides still-minimized occupants left after a slot frees up.
    fn compact_row(&mut self, moves: &[SlotMove], commands: &mut Vec<HostCommand>) {
        let mut shifted = Vec::new();
        for mv in moves {
            if let Some(record) = self.windows.by_key(&mv.key) {
                if record.visibility == Visibility::MinimizedRow {
                    shifted.push((record.handle(), f64::from(mv.to)));
                }
            }
        }
        for (mover, left) in shifted {
            commands.push(HostCommand::SetPlacement {
                handle: mover,
                left: Some(left),
                top: None,
                width: None,
            });
            if let Some(record) = self.windows.get_mut(mover) {
                record.descriptor.placement.left = left;
            }
        }
    }

    fn pin_window(&mut self, handle: HostWindowId) -> Vec<HostCommand> {
        let Some(record) = self.windows.get_mut(handle) else {
            return Vec::new();
        };
        record.pinned = true;
        let key = record.key.clone();
        let descriptor = record.descriptor.clone();

        let mut commands = vec![
            HostCommand::SetPinnedStyling {
                handle,
                pinned: true,
            },
            HostCommand::SetCloseControlHidden {
                handle,
                hidden: true,
            },
        ];
        if self.config.layout_mode.is_dock() {
            commands.extend(self.taskbar.upsert(&key, &descriptor, true));
        }
        if self.config.remember_pinned {
            if let Some(document) = descriptor.document_key() {
                let remembered = PinnedRecord {
                    id: document.clone(),
                    position: Some(descriptor.placement),
                };
                if let Err(error) = self.pins.persist(&mut self.flags, remembered) {
                    tracing::warn!(
                        target: "dockhand_runtime::persist",
                        %error,
                        "failed persisting a pinned window"
                    );
                }
            }
        }
        commands
    }

    fn unpin_window(&mut self, handle: HostWindowId) -> Vec<HostCommand> {
        let Some(record) = self.windows.get_mut(handle) else {
            return Vec::new();
        };
        record.pinned = false;
        record.close_guard_until = None;
        let key = record.key.clone();
        let descriptor = record.descriptor.clone();
        let visible = record.is_effectively_visible();

        let mut commands = vec![
            HostCommand::SetPinnedStyling {
                handle,
                pinned: false,
            },
            HostCommand::SetCloseControlHidden {
                handle,
                hidden: false,
            },
        ];
        if self.config.layout_mode.is_dock() {
            if visible {
                // an open unpinned window has no business on the bar
                commands.extend(self.taskbar.remove(&key));
            } else {
                commands.extend(self.taskbar.upsert(&key, &descriptor, false));
            }
        }
        if self.config.remember_pinned {
            if let Some(document) = descriptor.document_key() {
                if let Err(error) = self.pins.unpersist(&mut self.flags, document) {
                    tracing::warn!(
                        target: "dockhand_runtime::persist",
                        %error,
                        "failed forgetting a pinned window"
                    );
                }
            }
        }
        commands
    }

    fn rollback_preview(&mut self, key: &WindowKey) -> Vec<HostCommand> {
        self.hover.clear(key);
        let Some(handle) = self.windows.handle_for_key(key) else {
            return Vec::new();
        };
        let Some(record) = self.windows.get_mut(handle) else {
            return Vec::new();
        };
        if record.shown_by_preview && record.visibility == Visibility::MinimizedTaskbar {
            record.shown_by_preview = false;
            record.descriptor.hidden = true;
            vec![
                HostCommand::HideWindow { handle },
                HostCommand::DetachHoverProbe { handle },
            ]
        } else {
            // the user restored it for real mid-preview; leave it alone
            record.shown_by_preview = false;
            Vec::new()
        }
    }

    fn apply_dedup(&mut self, plan: &DedupPlan, commands: &mut Vec<HostCommand>) {
        tracing::debug!(
            target: "dockhand_runtime::dedup",
            survivor = %plan.survivor,
            newcomer = %plan.newcomer,
            "closing a duplicate window for an already open document"
        );
        if plan.transfer_pin {
            commands.extend(self.pin_window(plan.survivor));
        }
        if plan.survivor_minimized {
            commands.extend(self.restore_window(plan.survivor));
        }
        // the survivor ends up frontmost either way
        self.windows.record_raised(plan.survivor);
        commands.push(HostCommand::BringToFront {
            handle: plan.survivor,
        });
        self.dedup.begin(plan.newcomer_key.clone());
        commands.push(HostCommand::CloseWindow {
            handle: plan.newcomer,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockhand_core::identity::DocumentKey;
    use dockhand_core::settings::LayoutMode;
    use dockhand_core::testing::MemoryFlagStore;
    use dockhand_core::window::DocumentInfo;

    fn controller(config: DockConfig) -> DockController<MemoryFlagStore> {
        DockController::new(config, MemoryFlagStore::new())
    }

    fn handle(raw: u64) -> HostWindowId {
        HostWindowId::new(raw).unwrap()
    }

    fn sheet(raw: u64, title: &str) -> WindowDescriptor {
        let document = DocumentKey::new(format!("Actor.{raw:04}")).unwrap();
        WindowDescriptor::new(
            handle(raw),
            title,
            "ActorSheet",
            WindowCategory::Sheet,
            Bounds::new(100.0, 100.0, 400.0, 300.0),
        )
        .with_document(DocumentInfo::new(document, "Actor"))
    }

    fn ready(controller: &mut DockController<MemoryFlagStore>, now: Instant) {
        let _ = controller.handle(
            HostEvent::SessionReady {
                board: Extent::new(1600.0, 900.0),
                nav_band_height: Some(32.0),
            },
            now,
        );
    }

    #[test]
    fn unknown_handles_pass_through() {
        let now = Instant::now();
        let mut dock = controller(DockConfig::new());
        ready(&mut dock, now);
        for event in [
            HostEvent::CloseRequested { handle: handle(9) },
            HostEvent::MinimizeRequested { handle: handle(9) },
            HostEvent::MaximizeRequested { handle: handle(9) },
        ] {
            let outcome = dock.handle(event, now);
            assert!(!outcome.is_handled());
            assert!(outcome.commands.is_empty());
        }
    }

    #[test]
    fn ignored_windows_are_left_alone() {
        let now = Instant::now();
        let mut dock = controller(DockConfig::new());
        ready(&mut dock, now);
        // document-backed, so only the ignore list can exclude it
        let descriptor = WindowDescriptor::new(
            handle(3),
            "Quest Log",
            "QuestTracker",
            WindowCategory::Panel,
            Bounds::new(0.0, 0.0, 300.0, 500.0),
        )
        .with_document(DocumentInfo::new(
            DocumentKey::new("JournalEntry.quests").unwrap(),
            "JournalEntry",
        ));
        let outcome = dock.handle(HostEvent::WindowShown { descriptor }, now);
        assert!(!outcome.is_handled());
        let outcome = dock.handle(HostEvent::MinimizeRequested { handle: handle(3) }, now);
        assert!(!outcome.is_handled());
    }

    #[test]
    fn disabled_mode_leaves_minimize_to_the_host() {
        let now = Instant::now();
        let mut dock = controller(DockConfig::new().with_layout_mode(LayoutMode::Disabled));
        ready(&mut dock, now);
        let _ = dock.handle(
            HostEvent::WindowShown {
                descriptor: sheet(1, "Gil"),
            },
            now,
        );
        let outcome = dock.handle(HostEvent::MinimizeRequested { handle: handle(1) }, now);
        assert!(!outcome.is_handled());
    }

    #[test]
    fn repeated_minimize_is_a_quiet_no_op() {
        let now = Instant::now();
        let mut dock = controller(DockConfig::new());
        ready(&mut dock, now);
        let _ = dock.handle(
            HostEvent::WindowShown {
                descriptor: sheet(1, "Gil"),
            },
            now,
        );
        let first = dock.handle(HostEvent::MinimizeRequested { handle: handle(1) }, now);
        assert!(first.is_handled());
        assert!(!first.commands.is_empty());
        let second = dock.handle(HostEvent::MinimizeRequested { handle: handle(1) }, now);
        assert!(second.is_handled());
        assert!(second.commands.is_empty());
    }

    #[test]
    fn unpinned_close_cleans_the_bar_and_passes_through() {
        let now = Instant::now();
        let mut dock = controller(DockConfig::new());
        ready(&mut dock, now);
        let _ = dock.handle(
            HostEvent::WindowShown {
                descriptor: sheet(1, "Gil"),
            },
            now,
        );
        let _ = dock.handle(HostEvent::MinimizeRequested { handle: handle(1) }, now);

        let outcome = dock.handle(HostEvent::CloseRequested { handle: handle(1) }, now);
        assert!(!outcome.is_handled());
        assert!(outcome
            .commands
            .iter()
            .any(|c| matches!(c, HostCommand::RemoveTaskbarButton { .. })));
        assert!(outcome
            .commands
            .iter()
            .any(|c| matches!(c, HostCommand::ShowWindow { .. })));
    }

    #[test]
    fn dedup_closes_the_newcomer_and_fronts_the_survivor() {
        let now = Instant::now();
        let mut dock = controller(DockConfig::new());
        ready(&mut dock, now);
        let document = DocumentKey::new("Actor.abc123").unwrap();
        let first = sheet(1, "Gil")
            .with_instance_uuid("app-41")
            .with_document(DocumentInfo::new(document.clone(), "Actor"));
        let second = sheet(2, "Gil")
            .with_instance_uuid("app-57")
            .with_document(DocumentInfo::new(document, "Actor"));
        let _ = dock.handle(HostEvent::WindowShown { descriptor: first }, now);

        let outcome = dock.handle(HostEvent::WindowShown { descriptor: second }, now);
        assert!(outcome.is_handled());
        assert!(outcome.commands.iter().any(|c| matches!(
            c,
            HostCommand::CloseWindow { handle: h } if *h == handle(2)
        )));
        assert!(outcome.commands.iter().any(|c| matches!(
            c,
            HostCommand::BringToFront { handle: h } if *h == handle(1)
        )));

        // the ordered close must pass through even though the key matches
        let close = dock.handle(HostEvent::CloseRequested { handle: handle(2) }, now);
        assert!(!close.is_handled());
    }
}
