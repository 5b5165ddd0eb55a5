//! Runtime value model shared by the host and client modules.
//!
//! Every argument that crosses the module boundary is a [`Value`]. Settings
//! values are restricted to the closed set described by [`ValueType`]; the
//! [`SettingValue`] trait maps each of them to a Rust type.

use crate::descriptor::ModDescriptor;
use crate::signature::ParamType;
use std::fmt;
use std::sync::Arc;

/// Two-component vector, used for slider ranges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Key identifiers accepted by keybinding controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyCode {
    #[default]
    None,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Alpha0,
    Alpha1,
    Alpha2,
    Alpha3,
    Alpha4,
    Alpha5,
    Alpha6,
    Alpha7,
    Alpha8,
    Alpha9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Space,
    Return,
    Escape,
    Tab,
    Backspace,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    Mouse0,
    Mouse1,
    Mouse2,
}

/// Closure handed across the module boundary.
///
/// Callbacks are untyped at runtime: they receive a [`Value`]. Use
/// [`Callback::typed`] to wrap a closure over a concrete settings type.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(Value) + Send + Sync>);

impl Callback {
    /// Wrap a closure over raw values.
    pub fn new(f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Wrap a closure over one settings type.
    ///
    /// Values of any other type are dropped with a warning.
    pub fn typed<T: SettingValue>(f: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self::new(move |value| {
            let received = value.kind();
            match T::from_value(value) {
                Some(value) => f(value),
                None => {
                    let expected = T::TYPE;
                    tracing::warn!(%expected, received, "Callback received a value of another type");
                }
            }
        })
    }

    /// Wrap a closure that takes no argument.
    pub fn action(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self::new(move |_| f())
    }

    /// Invoke the callback.
    pub fn call(&self, value: Value) {
        (self.0)(value)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A value in the shared runtime value model.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
    StrList(Vec<String>),
    Vec2(Vec2),
    KeyCode(KeyCode),
    Descriptor(ModDescriptor),
    Callback(Callback),
}

impl Value {
    /// Wrap an optional callback, mapping `None` to `Null`.
    pub fn callback(callback: Option<Callback>) -> Self {
        callback.map_or(Value::Null, Value::Callback)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::StrList(_) => "string list",
            Value::Vec2(_) => "vec2",
            Value::KeyCode(_) => "key code",
            Value::Descriptor(_) => "descriptor",
            Value::Callback(_) => "callback",
        }
    }

    /// Settings value type of this value, if it is one.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Int(_) => Some(ValueType::Int),
            Value::Float(_) => Some(ValueType::Float),
            Value::Str(_) => Some(ValueType::Str),
            Value::StrList(_) => Some(ValueType::StrList),
            Value::Vec2(_) => Some(ValueType::Vec2),
            Value::KeyCode(_) => Some(ValueType::KeyCode),
            Value::Null | Value::Descriptor(_) | Value::Callback(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Value::Callback(callback) => Some(callback),
            _ => None,
        }
    }
}

/// Runtime type tag for settings values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Str,
    StrList,
    Vec2,
    KeyCode,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "string",
            ValueType::StrList => "string list",
            ValueType::Vec2 => "vec2",
            ValueType::KeyCode => "key code",
        }
    }

    /// Parameter type a slot must have to hold values of this type.
    pub fn param_type(self) -> ParamType {
        match self {
            ValueType::Bool => ParamType::Bool,
            ValueType::Int => ParamType::Int,
            ValueType::Float => ParamType::Float,
            ValueType::Str => ParamType::Str,
            ValueType::StrList => ParamType::List(Box::new(ParamType::Str)),
            ValueType::Vec2 => ParamType::Vec2,
            ValueType::KeyCode => ParamType::KeyCode,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Rust type that can be stored as a settings value.
///
/// `Default` supplies the value reported when a saved value is not found.
pub trait SettingValue: Clone + Default + Send + Sync + 'static {
    /// Runtime type tag used to specialize generic host operations.
    const TYPE: ValueType;

    fn into_value(self) -> Value;

    /// Extract a value of this type, or `None` if `value` holds another type.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! setting_value {
    ($ty:ty, $tag:ident, $variant:ident) => {
        impl SettingValue for $ty {
            const TYPE: ValueType = ValueType::$tag;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

setting_value!(bool, Bool, Bool);
setting_value!(i32, Int, Int);
setting_value!(f32, Float, Float);
setting_value!(String, Str, Str);
setting_value!(Vec<String>, StrList, StrList);
setting_value!(Vec2, Vec2, Vec2);
setting_value!(KeyCode, KeyCode, KeyCode);
