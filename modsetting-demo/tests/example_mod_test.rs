//! Integration tests for the example client mod.
//!
//! These tests cover:
//! - Binding in both load orders
//! - Loading the settings mirror from the host's saved config
//! - Control callbacks updating the mirror
//! - The T3 toggle removing slider S2

use modsetting_binding::{KeyCode, ModDescriptor, ModuleDirectory, SettingsApi, Value};
use modsetting_demo::{ExampleMod, SettingsState};
use modsetting_host::{ControlKind, ModSettingHost, MODULE_NAME};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const OWNER: &str = "example_mod";

/// Controls the example mod registers.
const CONTROL_KEYS: [&str; 13] = [
    "D1", "D2", "T1", "T2", "S1", "S2", "S3", "S4", "I1", "I2", "K1", "K2", "T3",
];

// ==============================================================================
// Test Fixture Helpers
// ==============================================================================

fn example_mod(directory: &Arc<ModuleDirectory>) -> ExampleMod {
    let api = Arc::new(SettingsApi::new(Arc::clone(directory)));
    let example = ExampleMod::new(ModDescriptor::new("Example Mod", OWNER), api);
    example.on_enable();
    example
}

fn host_activation() -> ModDescriptor {
    ModDescriptor::new(MODULE_NAME, MODULE_NAME)
}

fn assert_full_ui(host: &ModSettingHost) {
    assert_eq!(host.control_count(OWNER), CONTROL_KEYS.len());
    for key in CONTROL_KEYS {
        assert!(host.control(OWNER, key).is_some(), "missing control {key}");
    }
}

// ==============================================================================
// Load Order
// ==============================================================================

#[test]
fn test_host_first() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    host.install(&directory);

    let example = example_mod(&directory);
    assert!(example.on_after_setup());
    assert_full_ui(&host);
    assert_eq!(example.settings().snapshot(), SettingsState::default());
}

#[test]
fn test_client_first() {
    let directory = Arc::new(ModuleDirectory::new());
    let example = example_mod(&directory);
    assert!(!example.on_after_setup());

    let host = ModSettingHost::new();
    host.install(&directory);
    assert!(example.on_mod_activated(&host_activation()));
    assert_full_ui(&host);
}

#[test]
fn test_host_never_loads() {
    let directory = Arc::new(ModuleDirectory::new());
    let example = example_mod(&directory);

    assert!(!example.on_after_setup());
    assert!(!example.on_mod_activated(&host_activation()));
    assert_eq!(example.api().cached_handles(), 0);
}

#[test]
fn test_controls_use_expected_parameters() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    host.install(&directory);
    let example = example_mod(&directory);
    example.on_after_setup();

    assert_eq!(
        host.control(OWNER, "S2").unwrap().kind,
        ControlKind::Slider {
            range: modsetting_binding::Vec2::new(0.0, 1000.0),
            decimal_places: 2,
            char_limit: 5,
        }
    );
    assert_eq!(host.control_value(OWNER, "S3"), Some(Value::Float(60.0)));
    assert_eq!(
        host.control(OWNER, "S4").unwrap().kind,
        ControlKind::IntSlider {
            min: 0,
            max: 200,
            char_limit: 5,
        }
    );
    assert_eq!(
        host.control(OWNER, "I2").unwrap().kind,
        ControlKind::Input { char_limit: 50 }
    );
    assert_eq!(
        host.control_value(OWNER, "K1"),
        Some(Value::KeyCode(KeyCode::N))
    );
}

// ==============================================================================
// Settings Mirror
// ==============================================================================

#[test]
fn test_saved_config_fills_mirror() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::builder()
        .saved_config(OWNER, "D1", "Option 1".to_string())
        .saved_config(OWNER, "T2", false)
        .saved_config(OWNER, "S1", 33.0f32)
        .saved_config(OWNER, "K2", KeyCode::F3)
        .build();
    host.install(&directory);

    let example = example_mod(&directory);
    assert!(example.on_after_setup());

    let state = example.settings().snapshot();
    assert_eq!(state.dropdown1, "Option 1");
    assert!(!state.toggle2);
    assert_eq!(state.slider1, 33.0);
    assert_eq!(state.keybinding2, KeyCode::F3);
    // unsaved values keep their defaults
    assert_eq!(state.dropdown2, "Option 9");
    assert_eq!(state.input1, "Input 1");

    assert_eq!(host.control_value(OWNER, "S1"), Some(Value::Float(33.0)));
}

#[test]
fn test_user_edits_update_mirror() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    host.install(&directory);
    let example = example_mod(&directory);
    example.on_after_setup();

    let slider_events = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&slider_events);
    example.settings().on_slider1_changed(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(host.user_change(OWNER, "D2", Value::Str("Option 7".into())));
    assert!(host.user_change(OWNER, "T1", Value::Bool(true)));
    assert!(host.user_change(OWNER, "S1", Value::Float(10.0)));
    assert!(host.user_change(OWNER, "I2", Value::Str("typed".into())));
    assert!(host.user_change(OWNER, "K1", Value::KeyCode(KeyCode::Space)));

    let state = example.settings().snapshot();
    assert_eq!(state.dropdown2, "Option 7");
    assert!(state.toggle1);
    assert_eq!(state.slider1, 10.0);
    assert_eq!(state.input2, "typed");
    assert_eq!(state.keybinding1, KeyCode::Space);
    assert_eq!(slider_events.load(Ordering::SeqCst), 1);

    example.on_disable();
    assert!(host.user_change(OWNER, "S1", Value::Float(11.0)));
    assert_eq!(slider_events.load(Ordering::SeqCst), 1);
    assert_eq!(example.settings().snapshot().slider1, 11.0);
}

#[test]
fn test_set_value_reaches_mirror() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    host.install(&directory);
    let example = example_mod(&directory);
    example.on_after_setup();

    assert!(example.api().set_value("I1", "from code".to_string()));
    assert_eq!(example.settings().snapshot().input1, "from code");
    assert_eq!(
        example.api().get_saved_value::<String>("I1"),
        (true, "from code".to_string())
    );
}

#[test]
fn test_t3_toggle_removes_s2() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    host.install(&directory);
    let example = example_mod(&directory);
    example.on_after_setup();

    assert!(host.control(OWNER, "S2").is_some());
    assert!(host.user_change(OWNER, "T3", Value::Bool(true)));
    assert!(host.control(OWNER, "S2").is_none());
    assert_eq!(host.control_count(OWNER), CONTROL_KEYS.len() - 1);

    // a second click finds nothing to remove
    assert!(host.user_change(OWNER, "T3", Value::Bool(false)));
    assert_eq!(host.control_count(OWNER), CONTROL_KEYS.len() - 1);
}

#[test]
fn test_t3_after_api_dropped_does_nothing() {
    let directory = Arc::new(ModuleDirectory::new());
    let host = ModSettingHost::new();
    host.install(&directory);
    {
        let example = example_mod(&directory);
        example.on_after_setup();
    }

    assert!(host.user_change(OWNER, "T3", Value::Bool(true)));
    assert!(host.control(OWNER, "S2").is_some());
}
