//! End-to-end lifecycle flows through the controller: dock and row
//! minimization, restore round trips, pinned close protection, and the
//! click-outside sweep.
//!
//! Every test drives the controller exclusively through [`HostEvent`]s
//! and asserts on the emitted [`HostCommand`]s, the way a host adapter
//! experiences it.

use dockhand_core::commands::HostCommand;
use dockhand_core::events::{HeaderControl, HostEvent, Outcome};
use dockhand_core::geometry::{Bounds, Extent};
use dockhand_core::identity::DocumentKey;
use dockhand_core::settings::{DockConfig, LayoutMode};
use dockhand_core::testing::MemoryFlagStore;
use dockhand_core::window::{DocumentInfo, HostWindowId, WindowCategory, WindowDescriptor};
use dockhand_runtime::DockController;
use std::time::Duration;
use web_time::Instant;

fn dock(config: DockConfig) -> DockController<MemoryFlagStore> {
    DockController::new(config, MemoryFlagStore::new())
}

fn wid(raw: u64) -> HostWindowId {
    HostWindowId::new(raw).unwrap()
}

fn actor(raw: u64, title: &str) -> WindowDescriptor {
    let key = DocumentKey::new(format!("Actor.{raw:04}")).unwrap();
    WindowDescriptor::new(
        wid(raw),
        title,
        "ActorSheet",
        WindowCategory::Sheet,
        Bounds::new(100.0, 100.0, 400.0, 300.0),
    )
    .with_document(DocumentInfo::new(key, "Actor"))
}

fn session(
    controller: &mut DockController<MemoryFlagStore>,
    board: Extent,
    nav: Option<f64>,
    now: Instant,
) {
    let outcome = controller.handle(
        HostEvent::SessionReady {
            board,
            nav_band_height: nav,
        },
        now,
    );
    assert!(outcome.is_handled());
}

fn show(
    controller: &mut DockController<MemoryFlagStore>,
    descriptor: WindowDescriptor,
    now: Instant,
) -> Outcome {
    controller.handle(HostEvent::WindowShown { descriptor }, now)
}

fn placement_of(commands: &[HostCommand], target: HostWindowId) -> Option<&HostCommand> {
    commands.iter().find(
        |c| matches!(c, HostCommand::SetPlacement { handle, .. } if *handle == target),
    )
}

// ---------------------------------------------------------------------------
// dock modes
// ---------------------------------------------------------------------------

#[test]
fn dock_minimize_restore_round_trip() {
    let now = Instant::now();
    let mut controller = dock(DockConfig::new());
    session(&mut controller, Extent::new(1600.0, 900.0), None, now);

    let shown = show(&mut controller, actor(1, "Party: Gil"), now);
    assert!(shown.is_handled());
    assert!(shown.commands.iter().any(|c| matches!(
        c,
        HostCommand::EnsureHeaderControls {
            minimize: true,
            pin: true,
            ..
        }
    )));

    let minimized = controller.handle(HostEvent::MinimizeRequested { handle: wid(1) }, now);
    assert!(minimized.is_handled());
    let label = minimized.commands.iter().find_map(|c| match c {
        HostCommand::UpsertTaskbarButton { label, tooltip, pinned, .. } => {
            Some((label.clone(), tooltip.clone(), *pinned))
        }
        _ => None,
    });
    assert_eq!(
        label,
        Some(("Gil".to_owned(), "Party: Gil".to_owned(), false))
    );
    assert!(minimized
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::HideWindow { handle } if *handle == wid(1))));
    assert!(minimized.commands.iter().any(|c| matches!(
        c,
        HostCommand::ApplyMinimizedChrome { title, .. } if title == "Party: Gil"
    )));

    let restored = controller.handle(HostEvent::MaximizeRequested { handle: wid(1) }, now);
    assert!(restored.is_handled());
    assert!(restored
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::ShowWindow { handle } if *handle == wid(1))));
    assert!(restored
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::RemoveTaskbarButton { .. })));
    // the bar is empty again
    assert!(restored.commands.iter().any(|c| matches!(
        c,
        HostCommand::SetTaskbarOrder { keys } if keys.is_empty()
    )));

    // restoring an open window is the host's business
    let again = controller.handle(HostEvent::MaximizeRequested { handle: wid(1) }, now);
    assert!(!again.is_handled());
}

#[test]
fn token_titles_are_curated_on_the_bar() {
    let now = Instant::now();
    let mut controller = dock(DockConfig::new());
    session(&mut controller, Extent::new(1600.0, 900.0), None, now);
    let _ = show(&mut controller, actor(1, "[Token] Gil"), now);

    let minimized = controller.handle(HostEvent::MinimizeRequested { handle: wid(1) }, now);
    assert!(minimized.commands.iter().any(|c| matches!(
        c,
        HostCommand::ApplyMinimizedChrome { title, .. } if title == "~ Gil"
    )));

    let restored = controller.handle(HostEvent::MaximizeRequested { handle: wid(1) }, now);
    assert!(restored.commands.iter().any(|c| matches!(
        c,
        HostCommand::ApplyRestoredChrome { title, .. } if title == "[Token] Gil"
    )));
}

// ---------------------------------------------------------------------------
// pinned close protection
// ---------------------------------------------------------------------------

#[test]
fn pinned_double_close_absorbs_then_minimizes() {
    let t0 = Instant::now();
    let mut controller = dock(DockConfig::new());
    session(&mut controller, Extent::new(1600.0, 900.0), None, t0);
    let _ = show(&mut controller, actor(1, "Gil"), t0);

    let pinned = controller.handle(
        HostEvent::HeaderControlClicked {
            handle: wid(1),
            control: HeaderControl::Pin,
        },
        t0,
    );
    assert!(pinned.is_handled());
    assert!(pinned.commands.iter().any(|c| matches!(
        c,
        HostCommand::SetPinnedStyling { pinned: true, .. }
    )));
    assert!(pinned.commands.iter().any(|c| matches!(
        c,
        HostCommand::SetCloseControlHidden { hidden: true, .. }
    )));
    assert!(pinned.commands.iter().any(|c| matches!(
        c,
        HostCommand::UpsertTaskbarButton { pinned: true, .. }
    )));

    // first close arms the guard and swallows the request
    let first = controller.handle(HostEvent::CloseRequested { handle: wid(1) }, t0);
    assert!(first.is_handled());
    assert!(first.commands.is_empty());

    // a second close inside the window minimizes instead of closing
    let second = controller.handle(
        HostEvent::CloseRequested { handle: wid(1) },
        t0 + Duration::from_secs(1),
    );
    assert!(second.is_handled());
    assert!(second
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::HideWindow { .. })));

    // closing the now-minimized pinned window does nothing at all
    let while_minimized = controller.handle(
        HostEvent::CloseRequested { handle: wid(1) },
        t0 + Duration::from_secs(1),
    );
    assert!(while_minimized.is_handled());
    assert!(while_minimized.commands.is_empty());

    // restore keeps the button and the hidden close control
    let restored = controller.handle(
        HostEvent::MaximizeRequested { handle: wid(1) },
        t0 + Duration::from_secs(2),
    );
    assert!(restored.commands.iter().any(|c| matches!(
        c,
        HostCommand::UpsertTaskbarButton { pinned: true, .. }
    )));
    assert!(restored.commands.iter().any(|c| matches!(
        c,
        HostCommand::SetCloseControlHidden { hidden: true, .. }
    )));
    assert!(!restored
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::RemoveTaskbarButton { .. })));
}

#[test]
fn close_guard_expires_and_rearms() {
    let t0 = Instant::now();
    let mut controller = dock(DockConfig::new());
    session(&mut controller, Extent::new(1600.0, 900.0), None, t0);
    let _ = show(&mut controller, actor(1, "Gil"), t0);
    let _ = controller.handle(
        HostEvent::HeaderControlClicked {
            handle: wid(1),
            control: HeaderControl::Pin,
        },
        t0,
    );

    let _ = controller.handle(HostEvent::CloseRequested { handle: wid(1) }, t0);

    // way past the guard window: absorbed again, not minimized
    let late = controller.handle(
        HostEvent::CloseRequested { handle: wid(1) },
        t0 + Duration::from_secs(3),
    );
    assert!(late.is_handled());
    assert!(late.commands.is_empty());

    // but the late attempt re-armed the guard
    let follow_up = controller.handle(
        HostEvent::CloseRequested { handle: wid(1) },
        t0 + Duration::from_millis(3500),
    );
    assert!(follow_up
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::HideWindow { .. })));
}

#[test]
fn single_close_minimizes_when_double_close_is_off() {
    let now = Instant::now();
    let mut config = DockConfig::new();
    config.pin_double_close = false;
    let mut controller = dock(config);
    session(&mut controller, Extent::new(1600.0, 900.0), None, now);
    let _ = show(&mut controller, actor(1, "Gil"), now);
    let _ = controller.handle(
        HostEvent::HeaderControlClicked {
            handle: wid(1),
            control: HeaderControl::Pin,
        },
        now,
    );

    let close = controller.handle(HostEvent::CloseRequested { handle: wid(1) }, now);
    assert!(close.is_handled());
    assert!(close
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::HideWindow { .. })));
}

#[test]
fn unpinning_restores_the_default_surfaces() {
    let now = Instant::now();
    let mut controller = dock(DockConfig::new());
    session(&mut controller, Extent::new(1600.0, 900.0), None, now);
    let _ = show(&mut controller, actor(1, "Gil"), now);
    let pin = HostEvent::HeaderControlClicked {
        handle: wid(1),
        control: HeaderControl::Pin,
    };
    let _ = controller.handle(pin.clone(), now);

    // unpinning a visible window drops its button
    let unpinned = controller.handle(pin.clone(), now);
    assert!(unpinned.commands.iter().any(|c| matches!(
        c,
        HostCommand::SetPinnedStyling { pinned: false, .. }
    )));
    assert!(unpinned.commands.iter().any(|c| matches!(
        c,
        HostCommand::SetCloseControlHidden { hidden: false, .. }
    )));
    assert!(unpinned
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::RemoveTaskbarButton { .. })));

    // unpinning a minimized window keeps the button, unpinned
    let _ = controller.handle(pin.clone(), now);
    let _ = controller.handle(HostEvent::MinimizeRequested { handle: wid(1) }, now);
    let unpinned = controller.handle(pin, now);
    assert!(unpinned.commands.iter().any(|c| matches!(
        c,
        HostCommand::UpsertTaskbarButton { pinned: false, .. }
    )));
}

// ---------------------------------------------------------------------------
// row modes
// ---------------------------------------------------------------------------

#[test]
fn row_top_packs_left_to_right_and_overflows() {
    let now = Instant::now();
    let mut controller = dock(DockConfig::new().with_layout_mode(LayoutMode::RowTop));
    // capacity is 1000 - 4 * 150 = 400, so the grid holds 130 / 290 / 450
    session(
        &mut controller,
        Extent::new(1000.0, 800.0),
        Some(30.0),
        now,
    );
    for raw in 1..=4 {
        let _ = show(&mut controller, actor(raw, "Sheet"), now);
    }

    let first = controller.handle(HostEvent::MinimizeRequested { handle: wid(1) }, now);
    assert!(matches!(
        placement_of(&first.commands, wid(1)),
        Some(HostCommand::SetPlacement {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            ..
        }) if *left == 130.0 && *top == 50.0 && *width == 150.0
    ));
    assert!(first
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::SetZLayer { layer: 1, .. })));
    assert!(first
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::SetDragLock { locked: true, .. })));

    let second = controller.handle(HostEvent::MinimizeRequested { handle: wid(2) }, now);
    assert!(matches!(
        placement_of(&second.commands, wid(2)),
        Some(HostCommand::SetPlacement { left: Some(left), .. }) if *left == 290.0
    ));

    // the third lands past capacity: parked high in the z-order, no lock
    let third = controller.handle(HostEvent::MinimizeRequested { handle: wid(3) }, now);
    assert!(matches!(
        placement_of(&third.commands, wid(3)),
        Some(HostCommand::SetPlacement { left: Some(left), .. }) if *left == 450.0
    ));
    assert!(third
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::SetZLayer { layer: 10, .. })));
    assert!(!third
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::SetDragLock { .. })));

    // a full row refuses further minimizations outright
    let refused = controller.handle(HostEvent::MinimizeRequested { handle: wid(4) }, now);
    assert!(refused.is_handled());
    assert!(refused.commands.is_empty());
    let still_open = controller.handle(HostEvent::MaximizeRequested { handle: wid(4) }, now);
    assert!(!still_open.is_handled());
}

#[test]
fn row_restore_compacts_and_reopens_capacity() {
    let now = Instant::now();
    let mut controller = dock(DockConfig::new().with_layout_mode(LayoutMode::RowTop));
    session(
        &mut controller,
        Extent::new(1000.0, 800.0),
        Some(30.0),
        now,
    );
    for raw in 1..=4 {
        let _ = show(&mut controller, actor(raw, "Sheet"), now);
        if raw < 4 {
            let _ = controller.handle(HostEvent::MinimizeRequested { handle: wid(raw) }, now);
        }
    }

    let restored = controller.handle(HostEvent::MaximizeRequested { handle: wid(1) }, now);
    assert!(restored.is_handled());
    // survivors slide left, in order
    assert!(matches!(
        placement_of(&restored.commands, wid(2)),
        Some(HostCommand::SetPlacement {
            left: Some(left),
            top: None,
            width: None,
            ..
        }) if *left == 130.0
    ));
    assert!(matches!(
        placement_of(&restored.commands, wid(3)),
        Some(HostCommand::SetPlacement { left: Some(left), .. }) if *left == 290.0
    ));
    // the restored window gets its saved placement back
    assert!(matches!(
        placement_of(&restored.commands, wid(1)),
        Some(HostCommand::SetPlacement {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            ..
        }) if *left == 100.0 && *top == 100.0 && *width == 400.0
    ));
    assert!(restored
        .commands
        .iter()
        .any(|c| matches!(c, HostCommand::SetDragLock { locked: false, .. })));

    // compaction freed the overflow, so the fourth window fits now
    let fourth = controller.handle(HostEvent::MinimizeRequested { handle: wid(4) }, now);
    assert!(matches!(
        placement_of(&fourth.commands, wid(4)),
        Some(HostCommand::SetPlacement { left: Some(left), .. }) if *left == 450.0
    ));
}

#[test]
fn row_bottom_sits_above_the_bottom_cluster() {
    let now = Instant::now();
    let mut controller = dock(DockConfig::new().with_layout_mode(LayoutMode::RowBottom));
    session(&mut controller, Extent::new(1400.0, 800.0), None, now);
    let _ = show(&mut controller, actor(1, "Sheet"), now);

    let minimized = controller.handle(HostEvent::MinimizeRequested { handle: wid(1) }, now);
    assert!(matches!(
        placement_of(&minimized.commands, wid(1)),
        Some(HostCommand::SetPlacement {
            left: Some(left),
            top: Some(top),
            ..
        }) if *left == 260.0 && *top == 689.0
    ));
}

#[test]
fn closing_a_row_window_compacts_the_survivors() {
    let now = Instant::now();
    let mut controller = dock(DockConfig::new().with_layout_mode(LayoutMode::RowTop));
    session(
        &mut controller,
        Extent::new(1000.0, 800.0),
        Some(30.0),
        now,
    );
    for raw in 1..=2 {
        let _ = show(&mut controller, actor(raw, "Sheet"), now);
        let _ = controller.handle(HostEvent::MinimizeRequested { handle: wid(raw) }, now);
    }

    let closed = controller.handle(HostEvent::WindowClosed { handle: wid(1) }, now);
    assert!(closed.is_handled());
    assert!(matches!(
        placement_of(&closed.commands, wid(2)),
        Some(HostCommand::SetPlacement { left: Some(left), .. }) if *left == 130.0
    ));
}

// ---------------------------------------------------------------------------
// click-outside sweep
// ---------------------------------------------------------------------------

#[test]
fn canvas_click_minimizes_unpinned_sheets_only() {
    let now = Instant::now();
    let mut config = DockConfig::new();
    config.click_outside_minimizes_all = true;
    let mut controller = dock(config);
    session(&mut controller, Extent::new(1600.0, 900.0), None, now);

    let _ = show(&mut controller, actor(1, "Gil"), now);
    let _ = show(&mut controller, actor(2, "Anna"), now);
    let _ = controller.handle(
        HostEvent::HeaderControlClicked {
            handle: wid(2),
            control: HeaderControl::Pin,
        },
        now,
    );

    let swept = controller.handle(
        HostEvent::CanvasClicked {
            selection_active: false,
        },
        now,
    );
    assert!(swept.is_handled());
    let hidden: Vec<_> = swept
        .commands
        .iter()
        .filter_map(|c| match c {
            HostCommand::HideWindow { handle } => Some(*handle),
            _ => None,
        })
        .collect();
    assert_eq!(hidden, vec![wid(1)]);

    // a marquee selection suppresses the sweep entirely
    let selecting = controller.handle(
        HostEvent::CanvasClicked {
            selection_active: true,
        },
        now,
    );
    assert!(!selecting.is_handled());
}

#[test]
fn canvas_click_is_inert_when_disabled() {
    let now = Instant::now();
    let mut controller = dock(DockConfig::new());
    session(&mut controller, Extent::new(1600.0, 900.0), None, now);
    let _ = show(&mut controller, actor(1, "Gil"), now);

    let outcome = controller.handle(
        HostEvent::CanvasClicked {
            selection_active: false,
        },
        now,
    );
    assert!(!outcome.is_handled());
    assert!(outcome.commands.is_empty());
}
