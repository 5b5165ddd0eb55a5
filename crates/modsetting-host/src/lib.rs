//! # modsetting-host
//!
//! In-process reference implementation of the ModSetting host.
//!
//! The host registers a module named `ModSetting` in a
//! [`ModuleDirectory`], exposing the type `ModSetting.ModBehaviour` with one
//! public static operation per capability and a `Version` field. Controls
//! and saved values live in an in-memory [`SettingsStore`].
//!
//! ```no_run
//! use modsetting_binding::{ModDescriptor, ModuleDirectory, SettingsApi, Toggle};
//! use modsetting_host::ModSettingHost;
//! use std::sync::Arc;
//!
//! let directory = Arc::new(ModuleDirectory::new());
//! let host = ModSettingHost::new();
//! host.install(&directory);
//!
//! let api = SettingsApi::new(directory);
//! api.init(ModDescriptor::new("Example Mod", "example"));
//! api.add_toggle(Toggle::new("T1", "Toggle 1", false));
//! assert_eq!(host.control_count("example"), 1);
//! ```

mod args;
mod behaviour;
pub mod store;

pub use store::{Control, ControlKind, SettingsStore};

use modsetting_binding::{
    CapabilityName, ExposedType, LoadedModule, ModuleDirectory, Operation, SettingValue, Value,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Module name the host registers under.
pub const MODULE_NAME: &str = "ModSetting";

/// Full name of the exposed type.
pub const TYPE_NAME: &str = "ModSetting.ModBehaviour";

/// Version the host reports by default.
pub const VERSION: f32 = 0.3;

/// Builder for [`ModSettingHost`].
pub struct HostBuilder {
    identity: String,
    version: Option<Value>,
    omitted: HashSet<CapabilityName>,
    overrides: Vec<Operation>,
    saved: Vec<(String, String, Value)>,
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self {
            identity: format!("{MODULE_NAME}, Version={VERSION}"),
            version: Some(Value::Float(VERSION)),
            omitted: HashSet::new(),
            overrides: Vec::new(),
            saved: Vec::new(),
        }
    }
}

impl HostBuilder {
    /// Identity the module is registered under.
    pub fn module_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Report `version` in the `Version` field.
    pub fn version(self, version: f32) -> Self {
        self.version_value(Value::Float(version))
    }

    /// Report an arbitrary value in the `Version` field.
    pub fn version_value(mut self, value: Value) -> Self {
        self.version = Some(value);
        self
    }

    /// Expose no `Version` field at all.
    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    /// Leave the operations for `capability` out of the exposed type.
    pub fn without(mut self, capability: CapabilityName) -> Self {
        self.omitted.insert(capability);
        self
    }

    /// Replace every operation named like `operation` with it.
    pub fn override_operation(mut self, operation: Operation) -> Self {
        self.overrides.push(operation);
        self
    }

    /// Seed a persisted value for the client named `owner`.
    pub fn saved_config(
        mut self,
        owner: impl Into<String>,
        key: impl Into<String>,
        value: impl SettingValue,
    ) -> Self {
        self.saved.push((owner.into(), key.into(), value.into_value()));
        self
    }

    pub fn build(self) -> ModSettingHost {
        let store = Arc::new(SettingsStore::new());
        for (owner, key, value) in self.saved {
            store.save(&owner, &key, value);
        }

        let ty = behaviour::exposed_type(
            TYPE_NAME,
            &store,
            self.version,
            &self.omitted,
            self.overrides,
        );

        ModSettingHost {
            module: LoadedModule::new(self.identity).with_type(ty),
            store,
        }
    }
}

/// The reference host: a loadable module plus its settings store.
pub struct ModSettingHost {
    module: LoadedModule,
    store: Arc<SettingsStore>,
}

impl Default for ModSettingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ModSettingHost {
    /// A host exposing every capability at the current version.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HostBuilder {
        HostBuilder::default()
    }

    pub fn identity(&self) -> &str {
        self.module.identity()
    }

    pub fn module(&self) -> &LoadedModule {
        &self.module
    }

    pub fn exposed_type(&self) -> Option<Arc<ExposedType>> {
        self.module.find_type(TYPE_NAME)
    }

    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    /// Register the host's module in `directory`.
    pub fn install(&self, directory: &ModuleDirectory) {
        directory.load(self.module.clone());
        info!(module = %self.identity(), "ModSetting host installed");
    }

    /// Remove the host's module from `directory`.
    pub fn uninstall(&self, directory: &ModuleDirectory) -> bool {
        directory.unload(self.identity())
    }

    pub fn control_count(&self, owner: &str) -> usize {
        self.store.control_count(owner)
    }

    pub fn control(&self, owner: &str, key: &str) -> Option<Control> {
        self.store.control(owner, key)
    }

    pub fn control_value(&self, owner: &str, key: &str) -> Option<Value> {
        self.store.value(owner, key)
    }

    /// Simulate the user changing a control in the settings menu.
    ///
    /// Returns `false` when the control is missing or holds another type.
    pub fn user_change(&self, owner: &str, key: &str, value: Value) -> bool {
        match self.store.apply(owner, key, value.clone()) {
            Some(on_change) => {
                if let Some(on_change) = on_change {
                    on_change.call(value);
                }
                true
            }
            None => false,
        }
    }

    /// Simulate the user clicking a button.
    pub fn click(&self, owner: &str, key: &str) -> bool {
        match self.store.control(owner, key) {
            Some(Control {
                kind: ControlKind::Button { .. },
                on_change,
                ..
            }) => {
                if let Some(on_click) = on_change {
                    on_click.call(Value::Null);
                }
                true
            }
            _ => false,
        }
    }
}
