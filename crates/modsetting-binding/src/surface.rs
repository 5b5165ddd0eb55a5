//! Description of a host module's exposed surface.
//!
//! A host builds an [`ExposedType`] out of [`Operation`]s and read-only
//! fields, places it in a [`LoadedModule`](crate::LoadedModule), and registers
//! that module in a [`ModuleDirectory`](crate::ModuleDirectory).

use crate::error::HostFault;
use crate::signature::ParamType;
use crate::value::{Value, ValueType};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type PlainBody = Arc<dyn Fn(Vec<Value>) -> Result<Value, HostFault> + Send + Sync>;
type GenericBody = Arc<dyn Fn(ValueType, Vec<Value>) -> Result<Value, HostFault> + Send + Sync>;

/// Executable body of an operation.
#[derive(Clone)]
pub(crate) enum OperationBody {
    Plain(PlainBody),
    /// Receives the value type chosen by the caller at specialization.
    Generic(GenericBody),
}

/// Who may see an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Whether an operation needs an instance to be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Static,
    Instance,
}

/// One operation exposed by a host type.
#[derive(Clone)]
pub struct Operation {
    name: String,
    params: Vec<ParamType>,
    visibility: Visibility,
    receiver: Receiver,
    body: OperationBody,
}

impl Operation {
    /// Create a public static operation.
    pub fn new<F>(name: impl Into<String>, params: Vec<ParamType>, body: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, HostFault> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            visibility: Visibility::Public,
            receiver: Receiver::Static,
            body: OperationBody::Plain(Arc::new(body)),
        }
    }

    /// Create a public static operation with one type parameter.
    ///
    /// `ParamType::Generic` slots in `params` are replaced by the caller's
    /// value type before arguments are checked.
    pub fn generic<F>(name: impl Into<String>, params: Vec<ParamType>, body: F) -> Self
    where
        F: Fn(ValueType, Vec<Value>) -> Result<Value, HostFault> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            visibility: Visibility::Public,
            receiver: Receiver::Static,
            body: OperationBody::Generic(Arc::new(body)),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    /// Public and static, i.e. callable without a host instance.
    pub fn is_bindable(&self) -> bool {
        self.visibility == Visibility::Public && self.receiver == Receiver::Static
    }

    pub fn is_generic(&self) -> bool {
        matches!(self.body, OperationBody::Generic(_))
    }

    pub(crate) fn body(&self) -> &OperationBody {
        &self.body
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("visibility", &self.visibility)
            .field("receiver", &self.receiver)
            .field("generic", &self.is_generic())
            .finish()
    }
}

/// A named type exposed by a host module.
#[derive(Debug, Clone)]
pub struct ExposedType {
    name: String,
    operations: Vec<Arc<Operation>>,
    fields: HashMap<String, Value>,
}

impl ExposedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
            fields: HashMap::new(),
        }
    }

    /// Add an operation. Operations keep their declaration order.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(Arc::new(operation));
        self
    }

    /// Add a read-only field.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operations(&self) -> &[Arc<Operation>] {
        &self.operations
    }

    /// Operations with the given name, in declaration order.
    pub fn operations_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Operation>> + 'a {
        self.operations.iter().filter(move |op| op.name() == name)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
