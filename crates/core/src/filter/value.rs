// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime values and their static types.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// A value produced while evaluating a filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    /// Unsigned integers, only produced by `ImageSize`.
    Uint(u64),
    Float(f64),
    String(String),
    Time(DateTime<Utc>),
    Duration(Duration),
    Array(Vec<Value>),
}

/// The operand category used for operator dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Time,
    Duration,
    Array,
}

impl Kind {
    pub fn is_numeric(self) -> bool {
        matches!(self, Kind::Int | Kind::Uint | Kind::Float)
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Kind::Int | Kind::Uint)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Time => "time",
            Kind::Duration => "duration",
            Kind::Array => "array",
        }
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Time(_) => Kind::Time,
            Value::Duration(_) => Kind::Duration,
            Value::Array(_) => Kind::Array,
        }
    }

    /// Numeric view used by float arithmetic and mixed comparisons.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Uint(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer view used by integer arithmetic and mixed comparisons.
    pub(crate) fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(v) => Some(i128::from(*v)),
            Value::Uint(v) => Some(i128::from(*v)),
            _ => None,
        }
    }
}

/// Static type of an expression, inferred at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Time,
    Duration,
    Array(Box<Type>),
    /// Unknown until evaluation, e.g. elements of a mixed array literal.
    Any,
}

impl Type {
    /// Dispatch category, `None` for [`Type::Any`].
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Type::Bool => Some(Kind::Bool),
            Type::Int => Some(Kind::Int),
            Type::Uint => Some(Kind::Uint),
            Type::Float => Some(Kind::Float),
            Type::String => Some(Kind::String),
            Type::Time => Some(Kind::Time),
            Type::Duration => Some(Kind::Duration),
            Type::Array(_) => Some(Kind::Array),
            Type::Any => None,
        }
    }

    pub(crate) fn from_kind(kind: Kind) -> Type {
        match kind {
            Kind::Bool => Type::Bool,
            Kind::Int => Type::Int,
            Kind::Uint => Type::Uint,
            Kind::Float => Type::Float,
            Kind::String => Type::String,
            Kind::Time => Type::Time,
            Kind::Duration => Type::Duration,
            Kind::Array => Type::Array(Box::new(Type::Any)),
        }
    }

    /// Whether a value of type `self` may be passed where `expected` is required.
    pub fn accepts(&self, expected: &Type) -> bool {
        match (self, expected) {
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::Array(a), Type::Array(b)) => a.accepts(b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Array(elem) => write!(f, "[{elem}]"),
            Type::Any => f.write_str("any"),
            other => match other.kind() {
                Some(kind) => f.write_str(kind.name()),
                None => f.write_str("any"),
            },
        }
    }
}
