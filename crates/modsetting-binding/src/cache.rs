//! Lazily populated cache of bound host operations.
//!
//! A [`BoundHandle`] is created the first time a capability is called and
//! reused for the rest of the session. Overloaded capabilities are keyed by
//! their call-shape variant so each overload gets its own slot.

use crate::capability::CapabilityName;
use crate::error::{BindingError, BindingResult, HostFault};
use crate::registry::CapabilityRegistry;
use crate::signature::{shape_matches, CallShape, ParamType};
use crate::surface::{Operation, OperationBody};
use crate::value::{Value, ValueType};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Cache key: a capability plus the overload variant, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub capability: CapabilityName,
    pub variant: Option<&'static str>,
}

impl BindingKey {
    pub fn new(capability: CapabilityName, shape: Option<&CallShape>) -> Self {
        Self {
            capability,
            variant: shape.map(|s| s.variant),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            Some(variant) => write!(f, "{}{}", self.capability, variant),
            None => write!(f, "{}", self.capability),
        }
    }
}

/// A resolved host operation, ready to invoke.
#[derive(Debug)]
pub struct BoundHandle {
    key: BindingKey,
    operation: Arc<Operation>,
}

impl BoundHandle {
    fn bind(key: BindingKey, operation: Arc<Operation>) -> BindingResult<Self> {
        if !operation.is_bindable() {
            return Err(BindingError::NotBindable(operation.name().to_string()));
        }
        Ok(Self { key, operation })
    }

    pub fn key(&self) -> BindingKey {
        self.key
    }

    pub fn operation_name(&self) -> &str {
        self.operation.name()
    }

    pub fn params(&self) -> &[ParamType] {
        self.operation.params()
    }

    pub fn is_generic(&self) -> bool {
        self.operation.is_generic()
    }

    /// Invoke a non-generic operation.
    ///
    /// Arguments are checked against the parameter list first; a panic inside
    /// the host operation is caught and reported as [`HostFault::Panicked`].
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, HostFault> {
        match self.operation.body() {
            OperationBody::Plain(body) => {
                check_args(self.operation.name(), self.operation.params(), &args)?;
                guarded(self.operation.name(), || body(args))
            }
            OperationBody::Generic(_) => {
                Err(HostFault::Unspecialized(self.operation.name().to_string()))
            }
        }
    }

    /// Specialize a generic operation for one value type.
    ///
    /// The specialization is built fresh on every call and never cached.
    pub fn specialize(&self, ty: ValueType) -> Result<SpecializedCall<'_>, HostFault> {
        if !self.operation.is_generic() {
            return Err(HostFault::NotGeneric(self.operation.name().to_string()));
        }

        let params = self
            .operation
            .params()
            .iter()
            .map(|p| p.specialize(ty))
            .collect();
        Ok(SpecializedCall {
            handle: self,
            ty,
            params,
        })
    }
}

/// A generic operation specialized for one value type.
#[derive(Debug)]
pub struct SpecializedCall<'a> {
    handle: &'a BoundHandle,
    ty: ValueType,
    params: Vec<ParamType>,
}

impl SpecializedCall<'_> {
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, HostFault> {
        let operation = &self.handle.operation;
        check_args(operation.name(), &self.params, &args)?;
        match operation.body() {
            OperationBody::Generic(body) => guarded(operation.name(), || body(self.ty, args)),
            OperationBody::Plain(_) => Err(HostFault::NotGeneric(operation.name().to_string())),
        }
    }
}

fn check_args(operation: &str, params: &[ParamType], args: &[Value]) -> Result<(), HostFault> {
    if params.len() != args.len() {
        return Err(HostFault::Arity {
            operation: operation.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }

    for (index, (slot, arg)) in params.iter().zip(args).enumerate() {
        if !slot.accepts_value(arg) {
            return Err(HostFault::ArgumentType {
                operation: operation.to_string(),
                index,
                expected: slot.to_string(),
            });
        }
    }

    Ok(())
}

fn guarded(
    operation: &str,
    f: impl FnOnce() -> Result<Value, HostFault>,
) -> Result<Value, HostFault> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(HostFault::Panicked {
            operation: operation.to_string(),
            message,
        })
    })
}

/// Bound handles keyed by capability and overload variant.
#[derive(Debug, Default)]
pub struct BindingCache {
    entries: RwLock<HashMap<BindingKey, Arc<BoundHandle>>>,
    resolutions: AtomicUsize,
}

impl BindingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached handle for a capability, resolving it on first use.
    ///
    /// Without a shape the first operation with the capability's name is
    /// bound. With a shape the first operation whose parameters accept the
    /// shape is bound, under a key that includes the shape's variant.
    /// Failed lookups are not cached.
    pub fn resolve(
        &self,
        registry: &CapabilityRegistry,
        capability: CapabilityName,
        shape: Option<&CallShape>,
    ) -> BindingResult<Arc<BoundHandle>> {
        let key = BindingKey::new(capability, shape);

        if let Some(handle) = self.entries.read().get(&key) {
            debug!(key = %key, "Binding cache hit");
            return Ok(Arc::clone(handle));
        }

        // Lookup and insert under one write lock so concurrent first calls
        // agree on a single handle.
        let mut entries = self.entries.write();
        if let Some(handle) = entries.get(&key) {
            return Ok(Arc::clone(handle));
        }

        self.resolutions.fetch_add(1, Ordering::Relaxed);
        let mut candidates = registry.candidates(capability);
        let operation = match shape {
            Some(shape) => candidates.find(|op| shape_matches(op.params(), &shape.params)),
            None => candidates.next(),
        }
        .ok_or_else(|| BindingError::CapabilityNotFound(key.to_string()))?;

        let handle = Arc::new(BoundHandle::bind(key, Arc::clone(operation))?);
        debug!(key = %key, operation = %operation.name(), "Bound host operation");
        entries.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    pub fn get(&self, key: &BindingKey) -> Option<Arc<BoundHandle>> {
        self.entries.read().get(key).cloned()
    }

    pub fn contains(&self, key: &BindingKey) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of times operation matching actually ran.
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }
}
