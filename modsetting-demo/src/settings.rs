//! Local mirror of the example mod's settings.
//!
//! The mirror is filled from the host's saved config at initialization and
//! kept current by the controls' change callbacks.

use modsetting_binding::{KeyCode, SettingValue, SettingsApi};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

type Slider1Listener = Arc<dyn Fn(f32) + Send + Sync>;

/// Current values of every mirrored control.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsState {
    pub dropdown1: String,
    pub dropdown2: String,
    pub toggle1: bool,
    pub toggle2: bool,
    pub slider1: f32,
    pub slider2: f32,
    pub input1: String,
    pub input2: String,
    pub keybinding1: KeyCode,
    pub keybinding2: KeyCode,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            dropdown1: "Option 2".to_string(),
            dropdown2: "Option 9".to_string(),
            toggle1: false,
            toggle2: true,
            slider1: 0.0,
            slider2: 0.0,
            input1: "Input 1".to_string(),
            input2: "Input 2".to_string(),
            keybinding1: KeyCode::N,
            keybinding2: KeyCode::None,
        }
    }
}

fn saved_or<T: SettingValue>(api: &SettingsApi, key: &str, default: T) -> T {
    match api.get_saved_value::<T>(key) {
        (true, value) => value,
        (false, _) => default,
    }
}

/// Shared settings mirror.
#[derive(Default)]
pub struct Settings {
    state: RwLock<SettingsState>,
    slider1_listeners: Mutex<Vec<Slider1Listener>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SettingsState {
        self.state.read().clone()
    }

    /// Fill the mirror from the host's saved config, falling back to the
    /// defaults for every value the host has not saved.
    pub fn load(&self, api: &SettingsApi) {
        let defaults = SettingsState::default();
        if !api.has_config() {
            *self.state.write() = defaults;
            return;
        }

        let loaded = SettingsState {
            dropdown1: saved_or(api, "D1", defaults.dropdown1),
            dropdown2: saved_or(api, "D2", defaults.dropdown2),
            toggle1: saved_or(api, "T1", defaults.toggle1),
            toggle2: saved_or(api, "T2", defaults.toggle2),
            slider1: saved_or(api, "S1", defaults.slider1),
            slider2: saved_or(api, "S2", defaults.slider2),
            input1: saved_or(api, "I1", defaults.input1),
            input2: saved_or(api, "I2", defaults.input2),
            keybinding1: saved_or(api, "K1", defaults.keybinding1),
            keybinding2: saved_or(api, "K2", defaults.keybinding2),
        };
        *self.state.write() = loaded;
    }

    pub fn set_dropdown1(&self, value: String) {
        self.state.write().dropdown1 = value;
    }

    pub fn set_dropdown2(&self, value: String) {
        self.state.write().dropdown2 = value;
    }

    pub fn set_toggle1(&self, value: bool) {
        self.state.write().toggle1 = value;
    }

    pub fn set_toggle2(&self, value: bool) {
        self.state.write().toggle2 = value;
    }

    /// Set slider 1 and notify its listeners.
    pub fn set_slider1(&self, value: f32) {
        self.state.write().slider1 = value;
        let listeners = self.slider1_listeners.lock().clone();
        for listener in listeners {
            listener(value);
        }
    }

    pub fn set_slider2(&self, value: f32) {
        self.state.write().slider2 = value;
    }

    pub fn set_input1(&self, value: String) {
        self.state.write().input1 = value;
    }

    pub fn set_input2(&self, value: String) {
        self.state.write().input2 = value;
    }

    pub fn set_keybinding1(&self, value: KeyCode) {
        self.state.write().keybinding1 = value;
    }

    pub fn set_keybinding2(&self, value: KeyCode) {
        self.state.write().keybinding2 = value;
    }

    /// Subscribe to slider 1 changes.
    pub fn on_slider1_changed(&self, listener: impl Fn(f32) + Send + Sync + 'static) {
        self.slider1_listeners.lock().push(Arc::new(listener));
    }

    pub fn slider1_listener_count(&self) -> usize {
        self.slider1_listeners.lock().len()
    }

    /// Drop every slider 1 listener.
    pub fn clear(&self) {
        self.slider1_listeners.lock().clear();
    }
}
