//! End-to-end tests: a client binding through `SettingsApi` to the
//! reference host.
//!
//! These tests cover:
//! - Load order (host first, client first, host never loaded)
//! - Capability and version checks at initialization
//! - Control registration, overload selection and handle caching
//! - Value round trips through the host store and saved config
//! - Host faults surfacing as "not performed"

use modsetting_binding::{
    Button, CapabilityName, Dropdown, FloatSlider, Group, HostFault, Input, IntSlider, KeyCode,
    Keybinding, ModDescriptor, ModuleDirectory, Operation, ParamType, SettingsApi, Toggle, Value,
    Vec2, VersionCheck, REQUIRED_CAPABILITIES,
};
use modsetting_host::{ControlKind, ModSettingHost, VERSION};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;

const OWNER: &str = "example";

// ==============================================================================
// Test Fixture Helpers
// ==============================================================================

fn descriptor() -> ModDescriptor {
    ModDescriptor::new("Example Mod", OWNER)
}

/// Install `host` in a fresh directory and return an initialized API.
fn bound(host: &ModSettingHost) -> (Arc<ModuleDirectory>, SettingsApi) {
    let directory = Arc::new(ModuleDirectory::new());
    host.install(&directory);
    let api = SettingsApi::new(Arc::clone(&directory));
    assert!(api.init(descriptor()));
    (directory, api)
}

/// Records every value passed to it.
fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |value: T| sink.lock().push(value))
}

/// Every client call, each reporting whether it was performed.
fn every_call(api: &SettingsApi) -> Vec<(&'static str, bool)> {
    vec![
        (
            "add_dropdown_list",
            api.add_dropdown_list(Dropdown::new("D1", "Dropdown", ["a", "b"], "a")),
        ),
        (
            "add_slider",
            api.add_slider(FloatSlider::new("S1", "Slider", 0.0, Vec2::new(0.0, 1.0))),
        ),
        (
            "add_int_slider",
            api.add_int_slider(IntSlider::new("S4", "Int slider", 0, 0, 10)),
        ),
        ("add_toggle", api.add_toggle(Toggle::new("T1", "Toggle", false))),
        (
            "add_keybinding",
            api.add_keybinding(Keybinding::new("K1", "Key", KeyCode::N)),
        ),
        (
            "add_keybinding_with_default",
            api.add_keybinding_with_default(Keybinding::new("K2", "Key", KeyCode::M), KeyCode::M),
        ),
        ("add_input", api.add_input(Input::new("I1", "Input", "text"))),
        ("add_button", api.add_button(Button::new("B1", "Button"))),
        (
            "add_group",
            api.add_group(Group::new("G1", "Group", ["T1", "S1"])),
        ),
        ("get_value", api.get_value::<bool>("T1", |_| {})),
        ("set_value", api.set_value("T1", true)),
        ("has_config", api.has_config()),
        ("get_saved_value", api.get_saved_value::<bool>("T1").0),
        ("remove_ui", api.remove_ui("T1")),
        ("remove_mod", api.remove_mod()),
    ]
}

// ==============================================================================
// Initialization
// ==============================================================================

#[test]
fn test_host_absent() {
    let directory = Arc::new(ModuleDirectory::new());
    let api = SettingsApi::new(Arc::clone(&directory));

    assert!(!api.init(descriptor()));
    assert!(!api.is_ready());
    for (name, performed) in every_call(&api) {
        assert!(!performed, "{name} should not be performed");
    }
    assert_eq!(api.cached_handles(), 0);
    assert_eq!(api.resolution_count(), 0);
}

#[test]
fn test_uninitialized_calls_never_scan() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    host.install(&directory);
    let api = SettingsApi::new(Arc::clone(&directory));

    for (name, performed) in every_call(&api) {
        assert!(!performed, "{name} should not be performed");
    }
    assert_eq!(directory.scan_count(), 0);
    assert_eq!(host.control_count(OWNER), 0);
}

#[test]
fn test_any_missing_capability_rejects_binding() {
    for &capability in REQUIRED_CAPABILITIES {
        let host = ModSettingHost::builder().without(capability).build();
        let directory = Arc::new(ModuleDirectory::new());
        host.install(&directory);
        let api = SettingsApi::new(directory);

        assert!(!api.init(descriptor()), "bound without {capability}");
        assert!(!api.add_toggle(Toggle::new("T1", "Toggle", false)));
    }
}

#[test]
fn test_version_mismatch_still_binds() {
    let host = ModSettingHost::builder().version(0.2).build();
    let (_directory, api) = bound(&host);

    assert_eq!(
        api.version_check(),
        Some(VersionCheck::Mismatch {
            found: 0.2,
            expected: VERSION,
        })
    );
    assert!(api.add_toggle(Toggle::new("T1", "Toggle", true)));
    assert_eq!(host.control_value(OWNER, "T1"), Some(Value::Bool(true)));
}

#[test]
fn test_missing_version_field_still_binds() {
    let host = ModSettingHost::builder().without_version().build();
    let (_directory, api) = bound(&host);

    assert_eq!(api.version_check(), Some(VersionCheck::Missing));
    assert!(api.add_toggle(Toggle::new("T1", "Toggle", true)));
}

#[test]
fn test_client_loaded_before_host() {
    let directory = Arc::new(ModuleDirectory::new());
    let api = SettingsApi::new(Arc::clone(&directory));
    assert!(!api.init(descriptor()));

    let host = ModSettingHost::new();
    host.install(&directory);
    assert!(api.init(descriptor()));
    assert!(api.add_toggle(Toggle::new("T1", "Toggle", false)));
    assert_eq!(host.control_count(OWNER), 1);
}

#[test]
fn test_second_init_keeps_first_descriptor() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);

    assert!(api.init(ModDescriptor::new("Other", "other")));
    assert_eq!(api.descriptor(), Some(descriptor()));
    assert!(api.add_toggle(Toggle::new("T1", "Toggle", false)));
    assert_eq!(host.control_count(OWNER), 1);
    assert_eq!(host.control_count("other"), 0);
}

#[test]
fn test_incomplete_descriptor_blocks_calls() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    host.install(&directory);
    let api = SettingsApi::new(directory);

    assert!(api.init(ModDescriptor::new("Example Mod", "")));
    assert!(!api.add_toggle(Toggle::new("T1", "Toggle", false)));
    assert!(!api.has_config());
    assert_eq!(api.cached_handles(), 0);
}

// ==============================================================================
// Controls and Caching
// ==============================================================================

#[test]
fn test_every_call_is_performed_when_bound() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);

    // `set_value` runs before the config reads, so they find T1 saved
    for (name, performed) in every_call(&api) {
        assert!(performed, "{name} should be performed");
    }
}

#[test]
fn test_duplicate_key_is_accepted_twice() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);

    assert!(api.add_toggle(Toggle::new("T1", "First", false)));
    assert!(api.add_toggle(Toggle::new("T1", "Second", true)));

    assert_eq!(api.cached_handles(), 1);
    assert_eq!(api.resolution_count(), 1);
    assert_eq!(host.control_count(OWNER), 1);
    assert_eq!(host.control(OWNER, "T1").unwrap().description, "Second");
}

#[test]
fn test_slider_overloads_stay_separate() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);

    for _ in 0..3 {
        assert!(api.add_slider(FloatSlider::new("S1", "Real", 1.5, Vec2::new(0.0, 10.0))));
        assert!(api.add_int_slider(IntSlider::new("S4", "Integer", 3, 0, 5)));
    }

    assert_eq!(api.cached_handles(), 2);
    assert_eq!(api.resolution_count(), 2);
    assert!(matches!(
        host.control(OWNER, "S1").unwrap().kind,
        ControlKind::Slider { .. }
    ));
    assert_eq!(host.control_value(OWNER, "S1"), Some(Value::Float(1.5)));
    assert!(matches!(
        host.control(OWNER, "S4").unwrap().kind,
        ControlKind::IntSlider { min: 0, max: 5, .. }
    ));
    assert_eq!(host.control_value(OWNER, "S4"), Some(Value::Int(3)));
}

#[test]
fn test_control_parameters_reach_host() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);

    api.add_slider(
        FloatSlider::new("S1", "Real", 0.0, Vec2::new(-1.0, 1.0))
            .decimal_places(3)
            .char_limit(8),
    );
    api.add_input(Input::new("I1", "Input", "hello"));
    api.add_button(Button::new("B1", "Reset"));
    api.add_group(Group::new("G1", "Group", ["S1", "I1"]).scale(1.5).open(true));
    api.add_keybinding_with_default(Keybinding::new("K2", "Key", KeyCode::F1), KeyCode::F2);

    assert_eq!(
        host.control(OWNER, "S1").unwrap().kind,
        ControlKind::Slider {
            range: Vec2::new(-1.0, 1.0),
            decimal_places: 3,
            char_limit: 8,
        }
    );
    assert_eq!(
        host.control(OWNER, "I1").unwrap().kind,
        ControlKind::Input { char_limit: 40 }
    );
    assert_eq!(
        host.control(OWNER, "B1").unwrap().kind,
        ControlKind::Button {
            label: "Button".to_string(),
        }
    );
    assert_eq!(
        host.control(OWNER, "G1").unwrap().kind,
        ControlKind::Group {
            members: vec!["S1".to_string(), "I1".to_string()],
            scale: 0.9,
            top_insert: false,
            open: true,
        }
    );
    assert_eq!(
        host.control(OWNER, "K2").unwrap().kind,
        ControlKind::Keybinding {
            default: KeyCode::F2,
        }
    );
    assert_eq!(host.store().display_name(OWNER).unwrap(), "Example Mod");
}

#[test]
fn test_concurrent_first_calls_resolve_once() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);
    let api = Arc::new(api);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let api = Arc::clone(&api);
            thread::spawn(move || api.add_toggle(Toggle::new(format!("T{i}"), "Toggle", false)))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    assert_eq!(api.resolution_count(), 1);
    assert_eq!(host.control_count(OWNER), 8);
}

// ==============================================================================
// Values
// ==============================================================================

#[test]
fn test_unset_saved_value_is_not_found() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);

    assert!(!api.has_config());
    assert_eq!(api.get_saved_value::<f32>("S1"), (false, 0.0));
    assert_eq!(api.get_saved_value::<String>("I1"), (false, String::new()));
    assert_eq!(api.get_saved_value::<KeyCode>("K1"), (false, KeyCode::None));
}

#[test]
fn test_get_value_for_unset_key_does_not_call_back() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);
    let (seen, callback) = recorder::<bool>();

    assert!(api.get_value("T9", callback));
    assert!(seen.lock().is_empty());
}

#[test]
fn test_saved_config_seeds_controls() {
    let host = ModSettingHost::builder()
        .saved_config(OWNER, "S1", 7.5f32)
        .saved_config(OWNER, "I1", "saved text".to_string())
        .build();
    let (_directory, api) = bound(&host);

    assert!(api.has_config());
    assert_eq!(api.get_saved_value::<f32>("S1"), (true, 7.5));
    assert_eq!(api.get_saved_value::<i32>("S1"), (false, 0));

    api.add_slider(FloatSlider::new("S1", "Real", 0.0, Vec2::new(0.0, 10.0)));
    api.add_input(Input::new("I1", "Input", "default"));
    assert_eq!(host.control_value(OWNER, "S1"), Some(Value::Float(7.5)));
    assert_eq!(
        host.control_value(OWNER, "I1"),
        Some(Value::Str("saved text".into()))
    );
}

#[test]
fn test_set_value_notifies_and_persists() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);
    let (changes, on_change) = recorder::<bool>();
    let (done, on_done) = recorder::<bool>();

    api.add_toggle(Toggle::new("T1", "Toggle", false).on_change(on_change));
    assert!(api.set_value_with("T1", true, on_done));

    assert_eq!(*changes.lock(), vec![true]);
    assert_eq!(*done.lock(), vec![true]);
    assert_eq!(api.get_saved_value::<bool>("T1"), (true, true));

    let (values, callback) = recorder::<bool>();
    assert!(api.get_value("T1", callback));
    assert_eq!(*values.lock(), vec![true]);
}

#[test]
fn test_set_value_of_wrong_type_is_rejected_by_host() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);
    let (done, on_done) = recorder::<bool>();

    api.add_toggle(Toggle::new("T1", "Toggle", false));
    assert!(api.set_value_with("T1", 3i32, on_done));

    assert_eq!(*done.lock(), vec![false]);
    assert_eq!(host.control_value(OWNER, "T1"), Some(Value::Bool(false)));
    assert!(!api.has_config());
}

#[test]
fn test_user_changes_reach_client_callbacks() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);
    let (picked, on_change) = recorder::<String>();
    let clicks = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&clicks);

    api.add_dropdown_list(Dropdown::new("D1", "Dropdown", ["a", "b"], "a").on_change(on_change));
    api.add_button(Button::new("B1", "Button").on_click(move || *counter.lock() += 1));

    assert!(host.user_change(OWNER, "D1", Value::Str("b".into())));
    assert!(!host.user_change(OWNER, "D1", Value::Int(1)));
    assert!(host.click(OWNER, "B1"));
    assert!(!host.click(OWNER, "D1"));

    assert_eq!(*picked.lock(), vec!["b".to_string()]);
    assert_eq!(*clicks.lock(), 1);
}

#[test]
fn test_removal() {
    let host = ModSettingHost::new();
    let (_directory, api) = bound(&host);
    let (results, on_done) = recorder::<bool>();

    api.add_toggle(Toggle::new("T1", "Toggle", false));
    api.add_toggle(Toggle::new("T2", "Toggle", false));

    assert!(api.remove_ui_with("T1", on_done));
    assert_eq!(host.control_count(OWNER), 1);

    let sink = Arc::clone(&results);
    assert!(api.remove_ui_with("T1", move |removed| sink.lock().push(removed)));
    assert_eq!(*results.lock(), vec![true, false]);

    assert!(api.remove_mod());
    assert_eq!(host.control_count(OWNER), 0);
}

// ==============================================================================
// Host Faults
// ==============================================================================

#[test]
fn test_faulting_operation_reports_not_performed() {
    let host = ModSettingHost::builder()
        .override_operation(Operation::new(
            "HasConfig",
            vec![ParamType::Descriptor],
            |_| Err(HostFault::Fault("config unreadable".into())),
        ))
        .override_operation(Operation::new(
            "AddToggle",
            vec![
                ParamType::Descriptor,
                ParamType::Str,
                ParamType::Str,
                ParamType::Bool,
                ParamType::callback(ParamType::Bool),
            ],
            |_| panic!("toggle widget missing"),
        ))
        .build();
    let (_directory, api) = bound(&host);

    assert!(!api.has_config());
    assert!(!api.add_toggle(Toggle::new("T1", "Toggle", false)));
    // a faulting call leaves the binding usable
    assert!(api.add_input(Input::new("I1", "Input", "")));
}

#[test]
fn test_incompatible_operation_is_not_resolved() {
    let host = ModSettingHost::builder()
        .override_operation(Operation::new(
            CapabilityName::AddSlider.as_str(),
            vec![ParamType::Descriptor, ParamType::Str],
            |_| Ok(Value::Null),
        ))
        .build();
    let (_directory, api) = bound(&host);

    assert!(!api.add_slider(FloatSlider::new("S1", "Real", 0.0, Vec2::new(0.0, 1.0))));
    assert!(!api.add_int_slider(IntSlider::new("S4", "Integer", 0, 0, 1)));
    assert_eq!(api.cached_handles(), 0);
}
