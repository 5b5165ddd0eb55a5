//! The client-facing call surface.
//!
//! [`SettingsApi`] owns one binding to the host: the client's descriptor,
//! the discovered capability registry and the handle cache. Every public
//! call returns `bool` (or a plain value) and never propagates a failure:
//! an uninitialized binding, an incomplete descriptor, a missing key, an
//! unresolvable capability or a faulting host operation all end up as
//! "not performed" plus a log line.

use crate::cache::BindingCache;
use crate::capability::{CapabilityName, REQUIRED_CAPABILITIES};
use crate::config::BindingConfig;
use crate::controls::{Button, Dropdown, FloatSlider, Group, Input, IntSlider, Keybinding, Toggle};
use crate::descriptor::ModDescriptor;
use crate::directory::ModuleDirectory;
use crate::error::{BindingError, BindingResult};
use crate::registry::{discover, CapabilityRegistry, VersionCheck};
use crate::signature::{CallShape, ParamType};
use crate::value::{Callback, KeyCode, SettingValue, Value, ValueType};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Binding state. Moves to `Ready` at most once and never back.
enum BindingState {
    Uninitialized,
    Ready(Arc<Binding>),
}

struct Binding {
    descriptor: ModDescriptor,
    registry: CapabilityRegistry,
    cache: BindingCache,
    version: VersionCheck,
}

/// Settings API bound to the ModSetting host.
pub struct SettingsApi {
    directory: Arc<ModuleDirectory>,
    config: BindingConfig,
    state: RwLock<BindingState>,
}

impl SettingsApi {
    /// Create an unbound API that will look for the host in `directory`.
    pub fn new(directory: Arc<ModuleDirectory>) -> Self {
        Self::with_config(directory, BindingConfig::default())
    }

    pub fn with_config(directory: Arc<ModuleDirectory>, config: BindingConfig) -> Self {
        Self {
            directory,
            config,
            state: RwLock::new(BindingState::Uninitialized),
        }
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Bind to the host on behalf of `descriptor`.
    ///
    /// Returns `true` if the binding is ready. Once ready, later calls return
    /// `true` immediately and keep the first descriptor. On failure the
    /// binding stays uninitialized and may be retried once more modules have
    /// loaded.
    pub fn init(&self, descriptor: ModDescriptor) -> bool {
        let mut state = self.state.write();
        if let BindingState::Ready(_) = *state {
            return true;
        }

        match self.bind(descriptor) {
            Ok(binding) => {
                info!(
                    client = %binding.descriptor,
                    host = %binding.registry.host().module_identity(),
                    "Settings API initialized"
                );
                *state = BindingState::Ready(Arc::new(binding));
                true
            }
            Err(BindingError::HostNotFound(host_type)) => {
                debug!(%host_type, "Settings host not loaded yet");
                false
            }
            Err(e) => {
                warn!(error = %e, "Settings API binding rejected");
                false
            }
        }
    }

    fn bind(&self, descriptor: ModDescriptor) -> BindingResult<Binding> {
        let host = discover(&self.directory, &self.config)
            .ok_or_else(|| BindingError::HostNotFound(self.config.host_type.clone()))?;
        let registry = CapabilityRegistry::new(host);
        let version =
            registry.check_version(&self.config.version_field, self.config.expected_version);
        registry.validate(REQUIRED_CAPABILITIES)?;

        Ok(Binding {
            descriptor,
            registry,
            cache: BindingCache::new(),
            version,
        })
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read(), BindingState::Ready(_))
    }

    /// Descriptor the binding was initialized with.
    pub fn descriptor(&self) -> Option<ModDescriptor> {
        self.binding().map(|b| b.descriptor.clone())
    }

    /// Result of the version check made at initialization.
    pub fn version_check(&self) -> Option<VersionCheck> {
        self.binding().map(|b| b.version)
    }

    /// Number of bound handles in the cache.
    pub fn cached_handles(&self) -> usize {
        self.binding().map_or(0, |b| b.cache.len())
    }

    /// Number of times the cache ran operation matching.
    pub fn resolution_count(&self) -> usize {
        self.binding().map_or(0, |b| b.cache.resolution_count())
    }

    fn binding(&self) -> Option<Arc<Binding>> {
        match &*self.state.read() {
            BindingState::Ready(binding) => Some(Arc::clone(binding)),
            BindingState::Uninitialized => None,
        }
    }

    /// Binding usable for a call, if every precondition holds.
    fn available(&self, capability: CapabilityName, key: Option<&str>) -> Option<Arc<Binding>> {
        let Some(binding) = self.binding() else {
            debug!(capability = %capability, "Settings API not initialized");
            return None;
        };

        if !binding.descriptor.is_populated() {
            debug!(capability = %capability, "Client descriptor is incomplete");
            return None;
        }

        if capability.is_per_control() && key.map_or(true, str::is_empty) {
            debug!(capability = %capability, "Control key missing");
            return None;
        }

        Some(binding)
    }

    /// Check preconditions, resolve the handle and invoke it.
    ///
    /// `args` receives the owner value and builds the full argument list.
    fn call(
        &self,
        capability: CapabilityName,
        shape: Option<CallShape>,
        key: Option<&str>,
        args: impl FnOnce(Value) -> Vec<Value>,
    ) -> Option<Value> {
        let binding = self.available(capability, key)?;
        let handle = match binding
            .cache
            .resolve(&binding.registry, capability, shape.as_ref())
        {
            Ok(handle) => handle,
            Err(e) => {
                error!(capability = %capability, error = %e, "Failed to resolve host operation");
                return None;
            }
        };

        let owner = Value::Descriptor(binding.descriptor.clone());
        match handle.invoke(args(owner)) {
            Ok(value) => Some(value),
            Err(fault) => {
                error!(capability = %capability, error = %fault, "Host operation failed");
                None
            }
        }
    }

    /// Like [`call`](Self::call), for generic capabilities. The entry point
    /// is cached; the value-type specialization is built per call.
    fn call_generic(
        &self,
        capability: CapabilityName,
        ty: ValueType,
        key: &str,
        args: impl FnOnce(Value) -> Vec<Value>,
    ) -> Option<Value> {
        let binding = self.available(capability, Some(key))?;
        let handle = match binding.cache.resolve(&binding.registry, capability, None) {
            Ok(handle) => handle,
            Err(e) => {
                error!(capability = %capability, error = %e, "Failed to resolve host operation");
                return None;
            }
        };

        let owner = Value::Descriptor(binding.descriptor.clone());
        let result = handle
            .specialize(ty)
            .and_then(|call| call.invoke(args(owner)));
        match result {
            Ok(value) => Some(value),
            Err(fault) => {
                error!(
                    capability = %capability,
                    value_type = %ty,
                    error = %fault,
                    "Host operation failed"
                );
                None
            }
        }
    }

    /// Add a dropdown list.
    pub fn add_dropdown_list(&self, dropdown: Dropdown) -> bool {
        let Dropdown {
            key,
            description,
            options,
            default,
            on_change,
        } = dropdown;
        self.call(CapabilityName::AddDropDownList, None, Some(&key), |owner| {
            vec![
                owner,
                Value::Str(key.clone()),
                Value::Str(description),
                Value::StrList(options),
                Value::Str(default),
                Value::callback(on_change),
            ]
        })
        .is_some()
    }

    /// Add a slider over real values.
    pub fn add_slider(&self, slider: FloatSlider) -> bool {
        let FloatSlider {
            key,
            description,
            default,
            range,
            on_change,
            decimal_places,
            char_limit,
        } = slider;
        self.call(
            CapabilityName::AddSlider,
            Some(float_slider_shape()),
            Some(&key),
            |owner| {
                vec![
                    owner,
                    Value::Str(key.clone()),
                    Value::Str(description),
                    Value::Float(default),
                    Value::Vec2(range),
                    Value::callback(on_change),
                    Value::Int(decimal_places),
                    Value::Int(char_limit),
                ]
            },
        )
        .is_some()
    }

    /// Add a slider over integer values.
    pub fn add_int_slider(&self, slider: IntSlider) -> bool {
        let IntSlider {
            key,
            description,
            default,
            min,
            max,
            on_change,
            char_limit,
        } = slider;
        self.call(
            CapabilityName::AddSlider,
            Some(int_slider_shape()),
            Some(&key),
            |owner| {
                vec![
                    owner,
                    Value::Str(key.clone()),
                    Value::Str(description),
                    Value::Int(default),
                    Value::Int(min),
                    Value::Int(max),
                    Value::callback(on_change),
                    Value::Int(char_limit),
                ]
            },
        )
        .is_some()
    }

    /// Add a toggle.
    pub fn add_toggle(&self, toggle: Toggle) -> bool {
        let Toggle {
            key,
            description,
            enabled,
            on_change,
        } = toggle;
        self.call(CapabilityName::AddToggle, None, Some(&key), |owner| {
            vec![
                owner,
                Value::Str(key.clone()),
                Value::Str(description),
                Value::Bool(enabled),
                Value::callback(on_change),
            ]
        })
        .is_some()
    }

    /// Add a keybinding whose default is no key.
    pub fn add_keybinding(&self, keybinding: Keybinding) -> bool {
        let Keybinding {
            key,
            description,
            key_code,
            on_change,
        } = keybinding;
        self.call(CapabilityName::AddKeybinding, None, Some(&key), |owner| {
            vec![
                owner,
                Value::Str(key.clone()),
                Value::Str(description),
                Value::KeyCode(key_code),
                Value::callback(on_change),
            ]
        })
        .is_some()
    }

    /// Add a keybinding that resets to `default_key`.
    pub fn add_keybinding_with_default(&self, keybinding: Keybinding, default_key: KeyCode) -> bool {
        let Keybinding {
            key,
            description,
            key_code,
            on_change,
        } = keybinding;
        self.call(
            CapabilityName::AddKeybindingWithDefault,
            None,
            Some(&key),
            |owner| {
                vec![
                    owner,
                    Value::Str(key.clone()),
                    Value::Str(description),
                    Value::KeyCode(key_code),
                    Value::KeyCode(default_key),
                    Value::callback(on_change),
                ]
            },
        )
        .is_some()
    }

    /// Add a text input.
    pub fn add_input(&self, input: Input) -> bool {
        let Input {
            key,
            description,
            default,
            char_limit,
            on_change,
        } = input;
        self.call(CapabilityName::AddInput, None, Some(&key), |owner| {
            vec![
                owner,
                Value::Str(key.clone()),
                Value::Str(description),
                Value::Str(default),
                Value::Int(char_limit),
                Value::callback(on_change),
            ]
        })
        .is_some()
    }

    /// Add a button.
    pub fn add_button(&self, button: Button) -> bool {
        let Button {
            key,
            description,
            label,
            on_click,
        } = button;
        self.call(CapabilityName::AddButton, None, Some(&key), |owner| {
            vec![
                owner,
                Value::Str(key.clone()),
                Value::Str(description),
                Value::Str(label),
                Value::callback(on_click),
            ]
        })
        .is_some()
    }

    /// Group previously added controls under a collapsible header.
    pub fn add_group(&self, group: Group) -> bool {
        let Group {
            key,
            description,
            members,
            scale,
            top_insert,
            open,
        } = group;
        self.call(CapabilityName::AddGroup, None, Some(&key), |owner| {
            vec![
                owner,
                Value::Str(key.clone()),
                Value::Str(description),
                Value::StrList(members),
                Value::Float(scale),
                Value::Bool(top_insert),
                Value::Bool(open),
            ]
        })
        .is_some()
    }

    /// Ask the host for the current value of a control. The host answers
    /// through `callback` if the control exists and holds a `T`.
    pub fn get_value<T: SettingValue>(
        &self,
        key: &str,
        callback: impl Fn(T) + Send + Sync + 'static,
    ) -> bool {
        self.call_generic(CapabilityName::GetValue, T::TYPE, key, |owner| {
            vec![
                owner,
                Value::Str(key.to_string()),
                Value::Callback(Callback::typed(callback)),
            ]
        })
        .is_some()
    }

    /// Set the value of a control, notifying the control.
    pub fn set_value<T: SettingValue>(&self, key: &str, value: T) -> bool {
        self.set_value_inner(key, value, None)
    }

    /// Set the value of a control; `on_done` reports whether the host
    /// applied it.
    pub fn set_value_with<T: SettingValue>(
        &self,
        key: &str,
        value: T,
        on_done: impl Fn(bool) + Send + Sync + 'static,
    ) -> bool {
        self.set_value_inner(key, value, Some(Callback::typed(on_done)))
    }

    fn set_value_inner<T: SettingValue>(
        &self,
        key: &str,
        value: T,
        on_done: Option<Callback>,
    ) -> bool {
        self.call_generic(CapabilityName::SetValue, T::TYPE, key, |owner| {
            vec![
                owner,
                Value::Str(key.to_string()),
                value.into_value(),
                Value::callback(on_done),
            ]
        })
        .is_some()
    }

    /// Whether the host has saved settings for this client.
    pub fn has_config(&self) -> bool {
        self.call(CapabilityName::HasConfig, None, None, |owner| vec![owner])
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    /// Read a saved value directly from the host's persisted settings.
    ///
    /// Returns `(false, T::default())` when nothing of type `T` is saved
    /// under `key` or the call could not be performed.
    pub fn get_saved_value<T: SettingValue>(&self, key: &str) -> (bool, T) {
        let saved = self
            .call_generic(CapabilityName::GetSavedValue, T::TYPE, key, |owner| {
                vec![owner, Value::Str(key.to_string())]
            })
            .and_then(T::from_value);
        match saved {
            Some(value) => (true, value),
            None => (false, T::default()),
        }
    }

    /// Remove one control.
    pub fn remove_ui(&self, key: &str) -> bool {
        self.remove_ui_inner(key, None)
    }

    /// Remove one control; `on_done` reports whether it existed.
    pub fn remove_ui_with(&self, key: &str, on_done: impl Fn(bool) + Send + Sync + 'static) -> bool {
        self.remove_ui_inner(key, Some(Callback::typed(on_done)))
    }

    fn remove_ui_inner(&self, key: &str, on_done: Option<Callback>) -> bool {
        self.call(CapabilityName::RemoveUI, None, Some(key), |owner| {
            vec![owner, Value::Str(key.to_string()), Value::callback(on_done)]
        })
        .is_some()
    }

    /// Remove every control this client added. The host does this on its own
    /// when the client is disabled.
    pub fn remove_mod(&self) -> bool {
        self.remove_mod_inner(None)
    }

    pub fn remove_mod_with(&self, on_done: impl Fn(bool) + Send + Sync + 'static) -> bool {
        self.remove_mod_inner(Some(Callback::typed(on_done)))
    }

    fn remove_mod_inner(&self, on_done: Option<Callback>) -> bool {
        self.call(CapabilityName::RemoveMod, None, None, |owner| {
            vec![owner, Value::callback(on_done)]
        })
        .is_some()
    }
}

fn float_slider_shape() -> CallShape {
    CallShape::new(
        "Float",
        vec![
            ParamType::Descriptor,
            ParamType::Str,
            ParamType::Str,
            ParamType::Float,
            ParamType::Vec2,
            ParamType::callback(ParamType::Float),
            ParamType::Int,
            ParamType::Int,
        ],
    )
}

fn int_slider_shape() -> CallShape {
    CallShape::new(
        "Int",
        vec![
            ParamType::Descriptor,
            ParamType::Str,
            ParamType::Str,
            ParamType::Int,
            ParamType::Int,
            ParamType::Int,
            ParamType::callback(ParamType::Int),
            ParamType::Int,
        ],
    )
}
