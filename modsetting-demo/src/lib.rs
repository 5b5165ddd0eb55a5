//! # modsetting-demo
//!
//! Example client mod for the ModSetting binding, plus the configuration
//! used by the `modsetting-demo` binary.

pub mod config;
pub mod example_mod;
pub mod settings;

pub use config::{Config, LoadOrder};
pub use example_mod::ExampleMod;
pub use settings::{Settings, SettingsState};
