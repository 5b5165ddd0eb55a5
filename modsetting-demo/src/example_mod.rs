//! Example client mod.
//!
//! Binds to the settings host whichever loads first: if the host is already
//! loaded, [`ExampleMod::on_after_setup`] succeeds; otherwise
//! [`ExampleMod::on_mod_activated`] binds once the host activates.

use crate::settings::Settings;
use modsetting_binding::{
    Dropdown, FloatSlider, Input, IntSlider, Keybinding, ModDescriptor, SettingsApi, Toggle, Vec2,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

pub struct ExampleMod {
    descriptor: ModDescriptor,
    api: Arc<SettingsApi>,
    settings: Arc<Settings>,
    enabled: AtomicBool,
}

impl ExampleMod {
    pub fn new(descriptor: ModDescriptor, api: Arc<SettingsApi>) -> Self {
        Self {
            descriptor,
            api,
            settings: Arc::new(Settings::new()),
            enabled: AtomicBool::new(false),
        }
    }

    pub fn descriptor(&self) -> &ModDescriptor {
        &self.descriptor
    }

    pub fn api(&self) -> &Arc<SettingsApi> {
        &self.api
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Start listening for module activations.
    pub fn on_enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Stop listening for module activations and drop slider listeners.
    pub fn on_disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        self.settings.clear();
    }

    /// Another module was activated. Binds when it is the settings host.
    pub fn on_mod_activated(&self, activated: &ModDescriptor) -> bool {
        if !self.enabled.load(Ordering::SeqCst) {
            return false;
        }
        if activated.name != self.api.config().host_module {
            debug!(module = %activated, "Ignoring activation of unrelated module");
            return false;
        }
        self.bind()
    }

    /// This mod finished setting up. Binds if the host is already loaded.
    pub fn on_after_setup(&self) -> bool {
        self.bind()
    }

    fn bind(&self) -> bool {
        if !self.api.init(self.descriptor.clone()) {
            return false;
        }
        self.settings.load(&self.api);
        self.add_ui();
        true
    }

    fn add_ui(&self) {
        let api = &self.api;
        let settings = &self.settings;
        let state = settings.snapshot();

        api.add_dropdown_list(
            Dropdown::new(
                "D1",
                "Dropdown 1",
                ["Option 1", "Option 2", "Option 3"],
                state.dropdown1,
            )
            .on_change(setter(settings, Settings::set_dropdown1)),
        );
        api.add_dropdown_list(
            Dropdown::new(
                "D2",
                "Dropdown 2",
                ["Option 7", "Option 8", "Option 9"],
                state.dropdown2,
            )
            .on_change(setter(settings, Settings::set_dropdown2)),
        );

        api.add_toggle(
            Toggle::new("T1", "Toggle 1", state.toggle1)
                .on_change(setter(settings, Settings::set_toggle1)),
        );
        api.add_toggle(
            Toggle::new("T2", "Toggle 2", state.toggle2)
                .on_change(setter(settings, Settings::set_toggle2)),
        );

        api.add_slider(
            FloatSlider::new("S1", "Slider 1", state.slider1, Vec2::new(0.0, 100.0))
                .on_change(setter(settings, Settings::set_slider1)),
        );
        api.add_slider(
            FloatSlider::new("S2", "Slider 2", state.slider2, Vec2::new(0.0, 1000.0))
                .on_change(setter(settings, Settings::set_slider2))
                .decimal_places(2),
        );
        api.add_slider(
            FloatSlider::new("S3", "Slider 3", 60.0, Vec2::new(0.0, 1000.0))
                .decimal_places(3)
                .char_limit(8),
        );
        api.add_int_slider(
            IntSlider::new("S4", "Slider 4", 50, 0, 200)
                .on_change(|value| info!(value, "Slider 4 changed")),
        );

        api.add_input(
            Input::new("I1", "Input 1", state.input1)
                .char_limit(40)
                .on_change(setter(settings, Settings::set_input1)),
        );
        api.add_input(
            Input::new("I2", "Input 2", state.input2)
                .char_limit(50)
                .on_change(setter(settings, Settings::set_input2)),
        );

        api.add_keybinding(
            Keybinding::new("K1", "Keybinding 1", state.keybinding1)
                .on_change(setter(settings, Settings::set_keybinding1)),
        );
        api.add_keybinding(
            Keybinding::new("K2", "Keybinding 2", state.keybinding2)
                .on_change(setter(settings, Settings::set_keybinding2)),
        );

        // the host keeps this callback, so it must not own the API
        let weak: Weak<SettingsApi> = Arc::downgrade(api);
        api.add_toggle(
            Toggle::new("T3", "Click to remove S2", false).on_change(move |_| {
                if let Some(api) = weak.upgrade() {
                    api.remove_ui_with("S2", |removed| {
                        info!(removed, "Removed slider S2");
                    });
                }
            }),
        );

        info!(client = %self.descriptor, "Settings UI registered");
    }
}

/// Change callback forwarding to a [`Settings`] setter.
fn setter<T>(
    settings: &Arc<Settings>,
    set: fn(&Settings, T),
) -> impl Fn(T) + Send + Sync + 'static
where
    T: 'static,
{
    let settings = Arc::clone(settings);
    move |value| set(&settings, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modsetting_binding::ModuleDirectory;

    #[test]
    fn test_unrelated_activation_is_ignored() {
        let api = Arc::new(SettingsApi::new(Arc::new(ModuleDirectory::new())));
        let example = ExampleMod::new(ModDescriptor::new("Example", "example"), api);
        example.on_enable();

        assert!(!example.on_mod_activated(&ModDescriptor::new("Other", "OtherMod")));
        assert!(!example.api().is_ready());
    }

    #[test]
    fn test_disabled_mod_ignores_activation() {
        let api = Arc::new(SettingsApi::new(Arc::new(ModuleDirectory::new())));
        let example = ExampleMod::new(ModDescriptor::new("Example", "example"), api);

        assert!(!example.on_mod_activated(&ModDescriptor::new("ModSetting", "ModSetting")));
    }
}
