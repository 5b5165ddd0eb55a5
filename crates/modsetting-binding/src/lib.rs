//! # modsetting-binding
//!
//! Runtime capability binding between a client mod and the ModSetting host
//! module.
//!
//! Both modules are loaded independently into the same process and neither is
//! compiled against the other. This crate provides:
//! - A module directory where hosts register their exposed surface
//! - Discovery and validation of the host's capability set
//! - Overload selection through a parameter-type matcher
//! - A lazily populated cache of bound host operations
//! - A dispatcher that turns every failure into a `bool` outcome
//!
//! ## Binding lifecycle
//!
//! ```text
//! SettingsApi::init ──► discover ──► check_version ──► validate ──► Ready
//!        │                  │                              │
//!        │             not found                     missing name
//!        ▼                  ▼                              ▼
//!   (already Ready)   Uninitialized                  Uninitialized
//! ```
//!
//! Once `Ready`, every capability call goes through the [`BindingCache`]:
//! the first call resolves the host operation, later calls reuse the handle.

pub mod cache;
pub mod capability;
pub mod config;
pub mod controls;
pub mod descriptor;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod signature;
pub mod surface;
pub mod value;

pub use cache::{BindingCache, BindingKey, BoundHandle, SpecializedCall};
pub use capability::{CapabilityName, CapabilityParseError, REQUIRED_CAPABILITIES};
pub use config::BindingConfig;
pub use controls::{Button, Dropdown, FloatSlider, Group, Input, IntSlider, Keybinding, Toggle};
pub use descriptor::ModDescriptor;
pub use directory::{LoadedModule, ModuleDirectory};
pub use dispatch::SettingsApi;
pub use error::{BindingError, BindingResult, HostFault};
pub use registry::{discover, CapabilityRegistry, HostHandle, VersionCheck};
pub use signature::{match_param, param_matches, shape_matches, CallShape, MatchRule, ParamType};
pub use surface::{ExposedType, Operation, Receiver, Visibility};
pub use value::{Callback, KeyCode, SettingValue, Value, ValueType, Vec2};
