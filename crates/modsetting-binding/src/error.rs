//! Error types for capability binding and host invocation.

use thiserror::Error;

/// Errors raised while binding to the host module.
///
/// None of these cross the public [`SettingsApi`](crate::SettingsApi)
/// surface; the dispatcher logs them and reports `false`.
#[derive(Error, Debug)]
pub enum BindingError {
    /// The host's exposed type is not present in any loaded module.
    #[error("Host type not found: {0}")]
    HostNotFound(String),

    /// A required capability is absent from the discovered host.
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    /// No operation matched the requested capability and call shape.
    #[error("No operation for {0}")]
    CapabilityNotFound(String),

    /// The selected operation cannot be bound (not public or not static).
    #[error("Operation cannot be bound: {0}")]
    NotBindable(String),

    /// Binding configuration failed validation.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for binding operations.
pub type BindingResult<T> = std::result::Result<T, BindingError>;

/// Failures surfaced while invoking a bound host operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostFault {
    /// Argument count differs from the operation's parameter list.
    #[error("{operation} expects {expected} arguments, got {actual}")]
    Arity {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// An argument does not fit its parameter slot.
    #[error("{operation}: argument {index} does not fit parameter type {expected}")]
    ArgumentType {
        operation: String,
        index: usize,
        expected: String,
    },

    /// A generic operation was invoked without a value type.
    #[error("{0} is generic and must be specialized before invocation")]
    Unspecialized(String),

    /// A non-generic operation was asked for a value-type specialization.
    #[error("{0} is not generic")]
    NotGeneric(String),

    /// The host operation reported a failure.
    #[error("{0}")]
    Fault(String),

    /// The host operation panicked.
    #[error("{operation} panicked: {message}")]
    Panicked { operation: String, message: String },
}
