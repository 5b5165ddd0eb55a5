//! In-memory settings store behind the host's operations.
//!
//! Controls are kept per owner (the client's stable name). Every change to a
//! control's value is also written to the owner's saved values, which is
//! what `HasConfig` and `GetSavedValue` read.

use modsetting_binding::{Callback, KeyCode, ModDescriptor, Value, ValueType, Vec2};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info};

/// What kind of control was added, with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    Dropdown {
        options: Vec<String>,
    },
    Slider {
        range: Vec2,
        decimal_places: i32,
        char_limit: i32,
    },
    IntSlider {
        min: i32,
        max: i32,
        char_limit: i32,
    },
    Toggle,
    Keybinding {
        default: KeyCode,
    },
    Input {
        char_limit: i32,
    },
    Button {
        label: String,
    },
    Group {
        members: Vec<String>,
        scale: f32,
        top_insert: bool,
        open: bool,
    },
}

/// One control registered by a client.
#[derive(Debug, Clone)]
pub struct Control {
    pub kind: ControlKind,
    pub description: String,
    /// Current value; `Null` for buttons and groups.
    pub value: Value,
    pub on_change: Option<Callback>,
}

#[derive(Default)]
struct OwnerControls {
    display_name: String,
    controls: HashMap<String, Control>,
}

/// Controls and saved values for every client.
#[derive(Default)]
pub struct SettingsStore {
    controls: Mutex<HashMap<String, OwnerControls>>,
    saved: Mutex<HashMap<String, HashMap<String, Value>>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control, replacing any control with the same key.
    ///
    /// The control starts at the saved value when one of the default's type
    /// exists, otherwise at `default`.
    pub fn add_control(
        &self,
        owner: &ModDescriptor,
        key: &str,
        description: String,
        kind: ControlKind,
        default: Value,
        on_change: Option<Callback>,
    ) {
        let value = match self.saved_value(&owner.name, key) {
            Some(saved) if !default.is_null() && saved.value_type() == default.value_type() => saved,
            _ => default,
        };

        let mut controls = self.controls.lock();
        let entry = controls.entry(owner.name.clone()).or_default();
        entry.display_name = owner.display_name.clone();
        let replaced = entry
            .controls
            .insert(
                key.to_string(),
                Control {
                    kind,
                    description,
                    value,
                    on_change,
                },
            )
            .is_some();

        info!(owner = %owner.name, key, replaced, "Control added");
    }

    /// Current value of a control.
    pub fn value(&self, owner: &str, key: &str) -> Option<Value> {
        self.control(owner, key).map(|c| c.value)
    }

    pub fn control(&self, owner: &str, key: &str) -> Option<Control> {
        self.controls
            .lock()
            .get(owner)
            .and_then(|o| o.controls.get(key))
            .cloned()
    }

    pub fn control_count(&self, owner: &str) -> usize {
        self.controls
            .lock()
            .get(owner)
            .map_or(0, |o| o.controls.len())
    }

    /// Display name the owner registered its controls under.
    pub fn display_name(&self, owner: &str) -> Option<String> {
        self.controls.lock().get(owner).map(|o| o.display_name.clone())
    }

    /// Replace a control's value and save it. Returns the control's change
    /// callback when applied, `None` when the control is missing or holds a
    /// different type.
    ///
    /// The callback is returned rather than invoked so that callers run it
    /// without holding the store's lock.
    pub fn apply(&self, owner: &str, key: &str, value: Value) -> Option<Option<Callback>> {
        let on_change = {
            let mut controls = self.controls.lock();
            let control = controls.get_mut(owner)?.controls.get_mut(key)?;
            if control.value.is_null() || control.value.value_type() != value.value_type() {
                debug!(owner, key, "Rejected value of a different type");
                return None;
            }
            control.value = value.clone();
            control.on_change.clone()
        };

        self.save(owner, key, value);
        Some(on_change)
    }

    /// Write a saved value directly.
    pub fn save(&self, owner: &str, key: &str, value: Value) {
        self.saved
            .lock()
            .entry(owner.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn has_config(&self, owner: &str) -> bool {
        self.saved.lock().get(owner).is_some_and(|s| !s.is_empty())
    }

    pub fn saved_value(&self, owner: &str, key: &str) -> Option<Value> {
        self.saved.lock().get(owner).and_then(|s| s.get(key)).cloned()
    }

    /// Saved value of a control if it holds the given type.
    pub fn saved_value_of(&self, owner: &str, key: &str, ty: ValueType) -> Option<Value> {
        self.saved_value(owner, key)
            .filter(|value| value.value_type() == Some(ty))
    }

    pub fn remove(&self, owner: &str, key: &str) -> bool {
        let removed = self
            .controls
            .lock()
            .get_mut(owner)
            .is_some_and(|o| o.controls.remove(key).is_some());
        if removed {
            info!(owner, key, "Control removed");
        }
        removed
    }

    /// Remove every control of an owner. Saved values are kept.
    pub fn remove_owner(&self, owner: &str) -> bool {
        let removed = self.controls.lock().remove(owner).is_some();
        if removed {
            info!(owner, "All controls removed");
        }
        removed
    }
}
