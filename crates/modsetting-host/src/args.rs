//! Positional argument reader for host operations.

use modsetting_binding::{Callback, HostFault, KeyCode, ModDescriptor, Value, Vec2};

/// Pulls typed arguments off an operation's argument list in order.
pub(crate) struct Args {
    operation: &'static str,
    values: std::vec::IntoIter<Value>,
}

impl Args {
    pub(crate) fn new(operation: &'static str, values: Vec<Value>) -> Self {
        Self {
            operation,
            values: values.into_iter(),
        }
    }

    pub(crate) fn value(&mut self) -> Result<Value, HostFault> {
        self.values
            .next()
            .ok_or_else(|| HostFault::Fault(format!("{}: missing argument", self.operation)))
    }

    fn unexpected(&self, expected: &str, found: &Value) -> HostFault {
        HostFault::Fault(format!(
            "{}: expected {expected}, found {}",
            self.operation,
            found.kind()
        ))
    }

    pub(crate) fn owner(&mut self) -> Result<ModDescriptor, HostFault> {
        match self.value()? {
            Value::Descriptor(descriptor) => Ok(descriptor),
            other => Err(self.unexpected("descriptor", &other)),
        }
    }

    /// A string; `Null` reads as empty.
    pub(crate) fn string(&mut self) -> Result<String, HostFault> {
        match self.value()? {
            Value::Str(s) => Ok(s),
            Value::Null => Ok(String::new()),
            other => Err(self.unexpected("string", &other)),
        }
    }

    /// A string list; `Null` reads as empty.
    pub(crate) fn strings(&mut self) -> Result<Vec<String>, HostFault> {
        match self.value()? {
            Value::StrList(list) => Ok(list),
            Value::Null => Ok(Vec::new()),
            other => Err(self.unexpected("string list", &other)),
        }
    }

    pub(crate) fn int(&mut self) -> Result<i32, HostFault> {
        match self.value()? {
            Value::Int(i) => Ok(i),
            other => Err(self.unexpected("int", &other)),
        }
    }

    pub(crate) fn float(&mut self) -> Result<f32, HostFault> {
        match self.value()? {
            Value::Float(f) => Ok(f),
            other => Err(self.unexpected("float", &other)),
        }
    }

    pub(crate) fn bool(&mut self) -> Result<bool, HostFault> {
        match self.value()? {
            Value::Bool(b) => Ok(b),
            other => Err(self.unexpected("bool", &other)),
        }
    }

    pub(crate) fn vec2(&mut self) -> Result<Vec2, HostFault> {
        match self.value()? {
            Value::Vec2(v) => Ok(v),
            other => Err(self.unexpected("vec2", &other)),
        }
    }

    pub(crate) fn key_code(&mut self) -> Result<KeyCode, HostFault> {
        match self.value()? {
            Value::KeyCode(k) => Ok(k),
            other => Err(self.unexpected("key code", &other)),
        }
    }

    /// An optional callback; `Null` reads as `None`.
    pub(crate) fn callback(&mut self) -> Result<Option<Callback>, HostFault> {
        match self.value()? {
            Value::Callback(callback) => Ok(Some(callback)),
            Value::Null => Ok(None),
            other => Err(self.unexpected("callback", &other)),
        }
    }
}
