//! Parameter types and overload matching.
//!
//! A host operation declares one [`ParamType`] per slot. When a capability
//! is overloaded, the caller supplies a [`CallShape`] and the operation whose
//! slots all accept the shape's types is selected.

use crate::value::{Value, ValueType};
use std::fmt;

/// Semantic type of one operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Bool,
    Int,
    Float,
    Str,
    Vec2,
    KeyCode,
    Descriptor,
    /// Concrete sequence.
    List(Box<ParamType>),
    /// Sequence interface; satisfied by any list of a compatible element type.
    Sequence(Box<ParamType>),
    /// Nullable wrapper around a value type.
    Nullable(Box<ParamType>),
    /// Callback receiving one argument.
    Callback(Box<ParamType>),
    /// Callback receiving no argument.
    Action,
    /// Top type; every type is assignable to it.
    Object,
    /// Type parameter of a generic operation, substituted at specialization.
    Generic,
}

impl ParamType {
    pub fn list(inner: ParamType) -> Self {
        ParamType::List(Box::new(inner))
    }

    pub fn sequence(inner: ParamType) -> Self {
        ParamType::Sequence(Box::new(inner))
    }

    pub fn nullable(inner: ParamType) -> Self {
        ParamType::Nullable(Box::new(inner))
    }

    pub fn callback(inner: ParamType) -> Self {
        ParamType::Callback(Box::new(inner))
    }

    /// Whether a slot of this type can be assigned a value of type `other`.
    ///
    /// Sequences are covariant in their element type, callbacks are
    /// contravariant in their argument type.
    pub fn is_assignable_from(&self, other: &ParamType) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (ParamType::Object, _) => true,
            (ParamType::Sequence(slot), ParamType::List(item))
            | (ParamType::Sequence(slot), ParamType::Sequence(item)) => {
                slot.is_assignable_from(item)
            }
            (ParamType::Callback(slot), ParamType::Callback(arg)) => arg.is_assignable_from(slot),
            _ => false,
        }
    }

    /// Whether a slot of this type may receive `Null`.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            ParamType::Nullable(_)
                | ParamType::Str
                | ParamType::List(_)
                | ParamType::Sequence(_)
                | ParamType::Callback(_)
                | ParamType::Action
                | ParamType::Object
        )
    }

    /// Whether a runtime value fits a slot of this type.
    ///
    /// Callback values are untyped at runtime and fit any callback slot.
    pub fn accepts_value(&self, value: &Value) -> bool {
        let provided = match value {
            Value::Null => return self.is_nullable(),
            Value::Callback(_) => {
                return matches!(
                    self,
                    ParamType::Callback(_) | ParamType::Action | ParamType::Object
                )
            }
            Value::Descriptor(_) => ParamType::Descriptor,
            other => match other.value_type() {
                Some(ty) => ty.param_type(),
                None => return false,
            },
        };
        param_matches(self, &provided)
    }

    /// Replace every `Generic` placeholder with the given value type.
    pub fn specialize(&self, ty: ValueType) -> ParamType {
        match self {
            ParamType::Generic => ty.param_type(),
            ParamType::List(inner) => ParamType::List(Box::new(inner.specialize(ty))),
            ParamType::Sequence(inner) => ParamType::Sequence(Box::new(inner.specialize(ty))),
            ParamType::Nullable(inner) => ParamType::Nullable(Box::new(inner.specialize(ty))),
            ParamType::Callback(inner) => ParamType::Callback(Box::new(inner.specialize(ty))),
            other => other.clone(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Bool => f.write_str("bool"),
            ParamType::Int => f.write_str("int"),
            ParamType::Float => f.write_str("float"),
            ParamType::Str => f.write_str("string"),
            ParamType::Vec2 => f.write_str("vec2"),
            ParamType::KeyCode => f.write_str("key code"),
            ParamType::Descriptor => f.write_str("descriptor"),
            ParamType::List(inner) => write!(f, "list<{inner}>"),
            ParamType::Sequence(inner) => write!(f, "sequence<{inner}>"),
            ParamType::Nullable(inner) => write!(f, "{inner}?"),
            ParamType::Callback(inner) => write!(f, "callback<{inner}>"),
            ParamType::Action => f.write_str("action"),
            ParamType::Object => f.write_str("object"),
            ParamType::Generic => f.write_str("T"),
        }
    }
}

/// Rule by which a provided type satisfied a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Exact,
    NullableUnderlying,
    Assignable,
}

/// Decide whether `provided` satisfies `slot`, and by which rule.
///
/// Rules are tried in a fixed order: exact equality, then the underlying
/// type of a nullable slot, then assignability. Assignability goes last so
/// that an exact overload is never shadowed by a merely assignable one.
pub fn match_param(slot: &ParamType, provided: &ParamType) -> Option<MatchRule> {
    if slot == provided {
        return Some(MatchRule::Exact);
    }

    if let ParamType::Nullable(inner) = slot {
        if inner.as_ref() == provided {
            return Some(MatchRule::NullableUnderlying);
        }
    }

    if slot.is_assignable_from(provided) {
        return Some(MatchRule::Assignable);
    }

    None
}

/// Boolean form of [`match_param`].
pub fn param_matches(slot: &ParamType, provided: &ParamType) -> bool {
    match_param(slot, provided).is_some()
}

/// Whether an operation's parameter list accepts a call shape.
pub fn shape_matches(params: &[ParamType], shape: &[ParamType]) -> bool {
    params.len() == shape.len()
        && params
            .iter()
            .zip(shape)
            .all(|(slot, provided)| param_matches(slot, provided))
}

/// Parameter types that select one overload of a capability.
///
/// The variant name becomes part of the cache key, so each overload gets its
/// own cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallShape {
    pub variant: &'static str,
    pub params: Vec<ParamType>,
}

impl CallShape {
    pub fn new(variant: &'static str, params: Vec<ParamType>) -> Self {
        Self { variant, params }
    }
}
