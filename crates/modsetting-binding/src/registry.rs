//! Discovery and validation of the host's capability set.
//!
//! Discovery finds the host's exposed type in the [`ModuleDirectory`];
//! validation confirms every required capability is present; the version
//! check compares the host's compatibility marker against the expected one.

use crate::capability::CapabilityName;
use crate::config::BindingConfig;
use crate::directory::ModuleDirectory;
use crate::error::{BindingError, BindingResult};
use crate::surface::{ExposedType, Operation};
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Reference to the host's exposed type, found by [`discover`].
#[derive(Debug, Clone)]
pub struct HostHandle {
    module: String,
    ty: Arc<ExposedType>,
}

impl HostHandle {
    /// Identity of the module that exposes the type.
    pub fn module_identity(&self) -> &str {
        &self.module
    }

    pub fn type_name(&self) -> &str {
        self.ty.name()
    }
}

/// Find the host's exposed type among the loaded modules.
///
/// Returns `None` when no module carrying the host marker exposes the type.
/// That is the normal state before the host has loaded.
pub fn discover(directory: &ModuleDirectory, config: &BindingConfig) -> Option<HostHandle> {
    for module in directory.scan() {
        if !module.identity().contains(&config.host_module) {
            continue;
        }

        info!(
            module = %module.identity(),
            "Found module related to {}", config.host_module
        );

        if let Some(ty) = module.find_type(&config.host_type) {
            return Some(HostHandle {
                module: module.identity().to_string(),
                ty,
            });
        }
    }

    info!(host_type = %config.host_type, "Host type not found in any loaded module");
    None
}

/// Outcome of the compatibility-version check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VersionCheck {
    /// Marker present and approximately equal to the expected version.
    Compatible,
    /// Marker present with a different value.
    Mismatch { found: f32, expected: f32 },
    /// Marker absent or not a float.
    Missing,
}

impl VersionCheck {
    pub fn is_compatible(&self) -> bool {
        matches!(self, VersionCheck::Compatible)
    }
}

/// The discovered host surface, queried by capability name.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    host: HostHandle,
}

impl CapabilityRegistry {
    pub fn new(host: HostHandle) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &HostHandle {
        &self.host
    }

    /// Confirm that every capability in `required` has at least one public
    /// static operation. Stops at the first missing name.
    pub fn validate(&self, required: &[CapabilityName]) -> BindingResult<()> {
        for capability in required {
            if self.candidates(*capability).next().is_none() {
                error!(
                    capability = %capability,
                    host = %self.host.type_name(),
                    "Required capability not found on host"
                );
                return Err(BindingError::MissingCapability(capability.to_string()));
            }
        }

        debug!(count = required.len(), "All required capabilities present");
        Ok(())
    }

    /// Compare the host's numeric compatibility marker with `expected`.
    ///
    /// A mismatch is logged and reported but does not stop the binding:
    /// newer capabilities may be unavailable while older ones keep working.
    pub fn check_version(&self, field: &str, expected: f32) -> VersionCheck {
        let found = match self.host.ty.field(field) {
            Some(Value::Float(found)) => *found,
            Some(other) => {
                warn!(field, kind = other.kind(), "Host version marker has an unexpected type");
                return VersionCheck::Missing;
            }
            None => {
                warn!(field, "Host exposes no version marker");
                return VersionCheck::Missing;
            }
        };

        if approximately(found, expected) {
            VersionCheck::Compatible
        } else {
            warn!(
                host_version = found,
                api_version = expected,
                "Host version differs from the API version, newer features may be unavailable"
            );
            VersionCheck::Mismatch { found, expected }
        }
    }

    /// Public static operations exposed under a capability's name, in
    /// declaration order.
    pub fn candidates(&self, capability: CapabilityName) -> impl Iterator<Item = &Arc<Operation>> {
        self.host
            .ty
            .operations_named(capability.as_str())
            .filter(|op| op.is_bindable())
    }
}

/// Float comparison with a relative tolerance, for version markers.
fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0)
}
