//! Configuration loading and live setting changes: legacy spellings,
//! reload-worthy changes, palette reapplication, and the debug toggle.

use dockhand_core::color::PinnedPalette;
use dockhand_core::commands::HostCommand;
use dockhand_core::events::HostEvent;
use dockhand_core::geometry::{Bounds, Extent};
use dockhand_core::identity::DocumentKey;
use dockhand_core::settings::{
    DockConfig, LayoutMode, SettingKey, SettingValue, SettingsError,
};
use dockhand_core::testing::{MemoryFlagStore, MemorySettings};
use dockhand_core::window::{DocumentInfo, HostWindowId, WindowCategory, WindowDescriptor};
use dockhand_runtime::DockController;
use web_time::Instant;

fn controller(config: DockConfig) -> DockController<MemoryFlagStore> {
    let mut controller = DockController::new(config, MemoryFlagStore::new());
    let _ = controller.handle(
        HostEvent::SessionReady {
            board: Extent::new(1600.0, 900.0),
            nav_band_height: None,
        },
        Instant::now(),
    );
    controller
}

fn change(key: SettingKey, value: SettingValue) -> HostEvent {
    HostEvent::SettingChanged { key, value }
}

fn sheet(raw: u64, class_name: &str) -> WindowDescriptor {
    let key = DocumentKey::new(format!("Actor.{raw:04}")).unwrap();
    WindowDescriptor::new(
        HostWindowId::new(raw).unwrap(),
        "Gil",
        class_name,
        WindowCategory::Sheet,
        Bounds::new(100.0, 100.0, 400.0, 300.0),
    )
    .with_document(DocumentInfo::new(key, "Actor"))
}

// ---------------------------------------------------------------------------
// loading
// ---------------------------------------------------------------------------

#[test]
fn load_materializes_stored_values_over_defaults() {
    let mut store = MemorySettings::new();
    store.set(SettingKey::LayoutMode, SettingValue::text("bottomBar"));
    store.set(SettingKey::IgnoreList, SettingValue::text(" Foo, ,Bar "));
    store.set(SettingKey::ClickOutsideMinimizesAll, SettingValue::Bool(true));

    let config = DockConfig::load(&store).unwrap();
    assert_eq!(config.layout_mode, LayoutMode::RowBottom);
    assert_eq!(config.ignore_list, vec!["Foo".to_owned(), "Bar".to_owned()]);
    assert!(config.click_outside_minimizes_all);
    // untouched keys keep their defaults
    assert!(config.pin_double_close);
    assert_eq!(config.pinned_header_color, "#ff8800");
}

#[test]
fn load_treats_unknown_modes_as_disabled() {
    let mut store = MemorySettings::new();
    store.set(SettingKey::LayoutMode, SettingValue::text("sideways"));
    let config = DockConfig::load(&store).unwrap();
    assert_eq!(config.layout_mode, LayoutMode::Disabled);
}

#[test]
fn load_rejects_values_of_the_wrong_kind() {
    let mut store = MemorySettings::new();
    store.set(SettingKey::DebugLogging, SettingValue::text("yes"));
    assert_eq!(
        DockConfig::load(&store),
        Err(SettingsError::WrongKind {
            key: SettingKey::DebugLogging,
            expected: "bool",
        })
    );
}

// ---------------------------------------------------------------------------
// live changes
// ---------------------------------------------------------------------------

#[test]
fn leaving_a_dock_mode_unmounts_the_strip_before_reload() {
    let mut dock = controller(DockConfig::new());
    let outcome = dock.handle(
        change(SettingKey::LayoutMode, SettingValue::text("topBar")),
        Instant::now(),
    );
    assert!(outcome.is_handled());
    assert_eq!(
        outcome.commands,
        vec![HostCommand::UnmountTaskbar, HostCommand::RequestReload]
    );
}

#[test]
fn mode_changes_that_keep_the_strip_just_reload() {
    let mut dock = controller(DockConfig::new());
    let to_other_dock = dock.handle(
        change(SettingKey::LayoutMode, SettingValue::text("persistentBottom")),
        Instant::now(),
    );
    assert_eq!(to_other_dock.commands, vec![HostCommand::RequestReload]);

    let mut row = controller(DockConfig::new().with_layout_mode(LayoutMode::RowTop));
    let to_other_row = row.handle(
        change(SettingKey::LayoutMode, SettingValue::text("bottomBar")),
        Instant::now(),
    );
    assert_eq!(to_other_row.commands, vec![HostCommand::RequestReload]);
}

#[test]
fn color_changes_reapply_the_derived_palette() {
    let mut dock = controller(DockConfig::new());
    let outcome = dock.handle(
        change(SettingKey::PinnedHeaderColor, SettingValue::text("#00ff00")),
        Instant::now(),
    );
    assert_eq!(
        outcome.commands,
        vec![HostCommand::ApplyPinnedPalette {
            palette: PinnedPalette::derive("#00ff00", "#0000"),
        }]
    );
}

#[test]
fn debug_toggle_announces_only_actual_changes() {
    let mut dock = controller(DockConfig::new());
    let enabled = dock.handle(
        change(SettingKey::DebugLogging, SettingValue::Bool(true)),
        Instant::now(),
    );
    assert!(enabled.commands.iter().any(|c| matches!(
        c,
        HostCommand::Notify { message, .. } if message == "Debug logging enabled"
    )));

    let repeated = dock.handle(
        change(SettingKey::DebugLogging, SettingValue::Bool(true)),
        Instant::now(),
    );
    assert!(repeated.commands.is_empty());

    let disabled = dock.handle(
        change(SettingKey::DebugLogging, SettingValue::Bool(false)),
        Instant::now(),
    );
    assert!(disabled.commands.iter().any(|c| matches!(
        c,
        HostCommand::Notify { message, .. } if message == "Debug logging disabled"
    )));
}

#[test]
fn ignore_list_changes_take_effect_for_the_next_show() {
    let now = Instant::now();
    let mut dock = controller(DockConfig::new());
    let before = dock.handle(
        HostEvent::WindowShown {
            descriptor: sheet(1, "ActorSheet"),
        },
        now,
    );
    assert!(before.is_handled());

    let _ = dock.handle(
        change(SettingKey::IgnoreList, SettingValue::text("ActorSheet")),
        now,
    );
    let after = dock.handle(
        HostEvent::WindowShown {
            descriptor: sheet(2, "ActorSheet"),
        },
        now,
    );
    assert!(!after.is_handled());
}

#[test]
fn wrong_kind_changes_leave_the_config_alone() {
    let mut dock = controller(DockConfig::new());
    let outcome = dock.handle(
        change(SettingKey::LayoutMode, SettingValue::Bool(true)),
        Instant::now(),
    );
    assert!(outcome.is_handled());
    assert!(outcome.commands.is_empty());
    assert_eq!(dock.config().layout_mode, LayoutMode::DockTop);
}
