// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operator dispatch on operand kinds.
//!
//! [`result_kind`] is the single table of supported operand pairs. The
//! compiler consults it through [`binary_type`] to type every node, and the
//! evaluator consults it again through [`apply`] before computing, so a pair
//! rejected at one stage is rejected at the other with the same message.

use std::cmp::Ordering;
use std::fmt::Display;

use chrono::Duration;
use regex::Regex;

use super::diagnostic::DiagnosticKind;
use super::expr::{BinaryOp, UnaryOp};
use super::value::{Kind, Type, Value};

/// An operator failure, positioned later by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Fault {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Fault {
    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        Fault {
            kind: DiagnosticKind::Runtime,
            message: message.into(),
        }
    }

    pub(crate) fn mismatch(op: &str, lhs: impl Display, rhs: impl Display) -> Self {
        Fault {
            kind: DiagnosticKind::Type,
            message: mismatch_message(op, lhs, rhs),
        }
    }
}

pub(crate) fn mismatch_message(op: &str, lhs: impl Display, rhs: impl Display) -> String {
    format!("invalid operation: {op} (mismatched types {lhs} and {rhs})")
}

/// Result kind of `lhs op rhs`, or `None` when the pair is unsupported.
pub(crate) fn result_kind(op: BinaryOp, lhs: Kind, rhs: Kind) -> Option<Kind> {
    match op {
        BinaryOp::Or | BinaryOp::And => {
            (lhs == Kind::Bool && rhs == Kind::Bool).then_some(Kind::Bool)
        }
        BinaryOp::Eq | BinaryOp::Ne => {
            (lhs == rhs || (lhs.is_numeric() && rhs.is_numeric())).then_some(Kind::Bool)
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => match (lhs, rhs) {
            (l, r) if l.is_numeric() && r.is_numeric() => Some(Kind::Bool),
            (Kind::String, Kind::String)
            | (Kind::Time, Kind::Time)
            | (Kind::Duration, Kind::Duration) => Some(Kind::Bool),
            _ => None,
        },
        BinaryOp::In | BinaryOp::NotIn => match rhs {
            Kind::Array => Some(Kind::Bool),
            Kind::String => (lhs == Kind::String).then_some(Kind::Bool),
            _ => None,
        },
        BinaryOp::Matches | BinaryOp::Contains | BinaryOp::StartsWith | BinaryOp::EndsWith => {
            (lhs == Kind::String && rhs == Kind::String).then_some(Kind::Bool)
        }
        BinaryOp::Add => match (lhs, rhs) {
            (Kind::String, Kind::String) => Some(Kind::String),
            (Kind::Time, Kind::Duration) | (Kind::Duration, Kind::Time) => Some(Kind::Time),
            (Kind::Duration, Kind::Duration) => Some(Kind::Duration),
            (l, r) => numeric_kind(l, r),
        },
        BinaryOp::Sub => match (lhs, rhs) {
            (Kind::Time, Kind::Duration) => Some(Kind::Time),
            (Kind::Time, Kind::Time) | (Kind::Duration, Kind::Duration) => Some(Kind::Duration),
            (l, r) => numeric_kind(l, r),
        },
        BinaryOp::Mul => match (lhs, rhs) {
            (Kind::Duration, n) | (n, Kind::Duration) if n.is_integer() => Some(Kind::Duration),
            (l, r) => numeric_kind(l, r),
        },
        BinaryOp::Div | BinaryOp::Pow => {
            (lhs.is_numeric() && rhs.is_numeric()).then_some(Kind::Float)
        }
        BinaryOp::Mod => match (lhs, rhs) {
            (Kind::Uint, Kind::Uint) => Some(Kind::Uint),
            (l, r) if l.is_integer() && r.is_integer() => Some(Kind::Int),
            _ => None,
        },
    }
}

/// Arithmetic result for two numeric kinds: float wins, then signed.
fn numeric_kind(lhs: Kind, rhs: Kind) -> Option<Kind> {
    match (lhs, rhs) {
        (Kind::Uint, Kind::Uint) => Some(Kind::Uint),
        (l, r) if l.is_integer() && r.is_integer() => Some(Kind::Int),
        (l, r) if l.is_numeric() && r.is_numeric() => Some(Kind::Float),
        _ => None,
    }
}

/// Static result type of `lhs op rhs`.
///
/// An [`Type::Any`] operand defers the decision to evaluation.
pub(crate) fn binary_type(op: BinaryOp, lhs: &Type, rhs: &Type) -> Result<Type, String> {
    let mismatch = || mismatch_message(op.symbol(), lhs, rhs);

    if let (BinaryOp::In | BinaryOp::NotIn, Type::Array(elem)) = (op, rhs) {
        return match (lhs.kind(), elem.kind()) {
            (Some(l), Some(e)) if result_kind(BinaryOp::Eq, l, e).is_none() => Err(mismatch()),
            _ => Ok(Type::Bool),
        };
    }

    match (lhs.kind(), rhs.kind()) {
        (Some(l), Some(r)) => result_kind(op, l, r)
            .map(Type::from_kind)
            .ok_or_else(mismatch),
        _ if op.is_predicate() => Ok(Type::Bool),
        _ => Ok(Type::Any),
    }
}

/// Static result type of a prefix operator.
pub(crate) fn unary_type(op: UnaryOp, operand: &Type) -> Result<Type, String> {
    let Some(kind) = operand.kind() else {
        return Ok(match op {
            UnaryOp::Not => Type::Bool,
            UnaryOp::Neg | UnaryOp::Plus => Type::Any,
        });
    };
    unary_kind(op, kind)
        .map(Type::from_kind)
        .ok_or_else(|| unary_mismatch(op, operand))
}

fn unary_mismatch(op: UnaryOp, operand: impl Display) -> String {
    format!("invalid operation: {} (mismatched type {operand})", op.symbol())
}

fn unary_kind(op: UnaryOp, operand: Kind) -> Option<Kind> {
    match (op, operand) {
        (UnaryOp::Not, Kind::Bool) => Some(Kind::Bool),
        (UnaryOp::Neg, Kind::Uint) => Some(Kind::Int),
        (UnaryOp::Neg | UnaryOp::Plus, k) if k.is_numeric() || k == Kind::Duration => Some(k),
        _ => None,
    }
}

/// Static element type of `target[index]`.
pub(crate) fn index_type(target: &Type, index: &Type) -> Result<Type, String> {
    let index_ok = matches!(index, Type::Any) || index.kind().is_some_and(Kind::is_integer);
    match target {
        Type::Array(elem) if index_ok => Ok((**elem).clone()),
        Type::Any if index_ok => Ok(Type::Any),
        _ => Err(format!("invalid operation: cannot index {target} with {index}")),
    }
}

/// Evaluate `lhs op rhs` on concrete values.
pub(crate) fn apply(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    let Some(kind) = result_kind(op, lhs.kind(), rhs.kind()) else {
        return Err(Fault::mismatch(op.symbol(), lhs.kind().name(), rhs.kind().name()));
    };

    match op {
        BinaryOp::Or | BinaryOp::And => match (lhs, rhs) {
            (Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(if op == BinaryOp::And {
                *l && *r
            } else {
                *l || *r
            })),
            _ => Err(Fault::mismatch(op.symbol(), lhs.kind().name(), rhs.kind().name())),
        },
        BinaryOp::Eq => Ok(Value::Bool(equals(lhs, rhs))),
        BinaryOp::Ne => Ok(Value::Bool(!equals(lhs, rhs))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(lhs, rhs);
            Ok(Value::Bool(match (op, ordering) {
                (_, None) => false,
                (BinaryOp::Lt, Some(o)) => o == Ordering::Less,
                (BinaryOp::Le, Some(o)) => o != Ordering::Greater,
                (BinaryOp::Gt, Some(o)) => o == Ordering::Greater,
                (_, Some(o)) => o != Ordering::Less,
            }))
        }
        BinaryOp::In | BinaryOp::NotIn => {
            let found = match rhs {
                Value::Array(items) => items.iter().any(|item| equals(lhs, item)),
                Value::String(haystack) => match lhs {
                    Value::String(needle) => haystack.contains(needle.as_str()),
                    _ => false,
                },
                _ => false,
            };
            Ok(Value::Bool(found == (op == BinaryOp::In)))
        }
        BinaryOp::Matches => match (lhs, rhs) {
            (Value::String(text), Value::String(pattern)) => {
                Ok(Value::Bool(compile_regex(pattern)?.is_match(text)))
            }
            _ => Err(Fault::mismatch(op.symbol(), lhs.kind().name(), rhs.kind().name())),
        },
        BinaryOp::Contains | BinaryOp::StartsWith | BinaryOp::EndsWith => match (lhs, rhs) {
            (Value::String(text), Value::String(part)) => Ok(Value::Bool(match op {
                BinaryOp::Contains => text.contains(part.as_str()),
                BinaryOp::StartsWith => text.starts_with(part.as_str()),
                _ => text.ends_with(part.as_str()),
            })),
            _ => Err(Fault::mismatch(op.symbol(), lhs.kind().name(), rhs.kind().name())),
        },
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        | BinaryOp::Pow => arithmetic(op, kind, lhs, rhs),
    }
}

/// Evaluate a prefix operator on a concrete value.
pub(crate) fn apply_unary(op: UnaryOp, operand: &Value) -> Result<Value, Fault> {
    let mismatch = || Fault {
        kind: DiagnosticKind::Type,
        message: unary_mismatch(op, operand.kind().name()),
    };
    if unary_kind(op, operand.kind()).is_none() {
        return Err(mismatch());
    }

    match (op, operand) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Plus, v) => Ok(v.clone()),
        (UnaryOp::Neg, Value::Int(v)) => v.checked_neg().map(Value::Int).ok_or_else(overflow),
        (UnaryOp::Neg, Value::Uint(v)) => narrow(-i128::from(*v), Kind::Int),
        (UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
        (UnaryOp::Neg, Value::Duration(d)) => Ok(Value::Duration(-*d)),
        _ => Err(mismatch()),
    }
}

/// Evaluate `target[index]`; negative indexes count from the end.
pub(crate) fn apply_index(target: &Value, index: &Value) -> Result<Value, Fault> {
    let (Value::Array(items), Some(i)) = (target, index.as_i128()) else {
        return Err(Fault {
            kind: DiagnosticKind::Type,
            message: format!(
                "invalid operation: cannot index {} with {}",
                target.kind().name(),
                index.kind().name()
            ),
        });
    };
    let len = items.len() as i128;
    let resolved = if i < 0 { len + i } else { i };
    usize::try_from(resolved)
        .ok()
        .and_then(|at| items.get(at))
        .cloned()
        .ok_or_else(|| Fault::runtime(format!("index out of range: {i} (array length is {len})")))
}

/// Equality through the dispatch table; unsupported pairs are unequal.
pub(crate) fn equals(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Time(l), Value::Time(r)) => l == r,
        (Value::Duration(l), Value::Duration(r)) => l == r,
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| equals(a, b))
        }
        (l, r) => compare(l, r) == Some(Ordering::Equal),
    }
}

/// Ordering for comparable pairs. Integers compare exactly, mixed with floats
/// they widen to `f64`.
fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Time(l), Value::Time(r)) => Some(l.cmp(r)),
        (Value::Duration(l), Value::Duration(r)) => Some(l.cmp(r)),
        (l, r) if l.kind().is_integer() && r.kind().is_integer() => {
            Some(l.as_i128()?.cmp(&r.as_i128()?))
        }
        (l, r) => l.as_f64()?.partial_cmp(&r.as_f64()?),
    }
}

fn arithmetic(op: BinaryOp, kind: Kind, lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    match (lhs, rhs) {
        (Value::String(l), Value::String(r)) => return Ok(Value::String(format!("{l}{r}"))),
        (Value::Time(t), Value::Duration(d)) | (Value::Duration(d), Value::Time(t)) => {
            let shifted = if op == BinaryOp::Sub {
                t.checked_sub_signed(*d)
            } else {
                t.checked_add_signed(*d)
            };
            return shifted
                .map(Value::Time)
                .ok_or_else(|| Fault::runtime("time out of range"));
        }
        (Value::Time(l), Value::Time(r)) => {
            return Ok(Value::Duration(l.signed_duration_since(*r)));
        }
        (Value::Duration(l), Value::Duration(r)) => {
            let sum = if op == BinaryOp::Sub {
                l.checked_sub(r)
            } else {
                l.checked_add(r)
            };
            return sum.map(Value::Duration).ok_or_else(overflow);
        }
        (Value::Duration(d), n) | (n, Value::Duration(d)) => {
            let nanos = d.num_nanoseconds().ok_or_else(overflow)?;
            let factor = n.as_i128().ok_or_else(overflow)?;
            let product = i128::from(nanos)
                .checked_mul(factor)
                .and_then(|p| i64::try_from(p).ok())
                .ok_or_else(overflow)?;
            return Ok(Value::Duration(Duration::nanoseconds(product)));
        }
        _ => {}
    }

    if kind == Kind::Float {
        let (Some(l), Some(r)) = (lhs.as_f64(), rhs.as_f64()) else {
            return Err(Fault::mismatch(op.symbol(), lhs.kind().name(), rhs.kind().name()));
        };
        return Ok(Value::Float(match op {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
            _ => l.powf(r),
        }));
    }

    let (Some(l), Some(r)) = (lhs.as_i128(), rhs.as_i128()) else {
        return Err(Fault::mismatch(op.symbol(), lhs.kind().name(), rhs.kind().name()));
    };
    let result = match op {
        BinaryOp::Add => l.checked_add(r),
        BinaryOp::Sub => l.checked_sub(r),
        BinaryOp::Mul => l.checked_mul(r),
        BinaryOp::Mod if r == 0 => return Err(Fault::runtime("integer divide by zero")),
        _ => l.checked_rem(r),
    };
    narrow(result.ok_or_else(overflow)?, kind)
}

/// Fit an exact integer result into the kind the table promised.
fn narrow(value: i128, kind: Kind) -> Result<Value, Fault> {
    match kind {
        Kind::Uint => u64::try_from(value).map(Value::Uint).map_err(|_| overflow()),
        _ => i64::try_from(value).map(Value::Int).map_err(|_| overflow()),
    }
}

fn overflow() -> Fault {
    Fault::runtime("integer overflow")
}

/// Compile a `matches` pattern, keeping the message on one line.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex, Fault> {
    Regex::new(pattern).map_err(|err| Fault {
        kind: DiagnosticKind::Regex,
        message: regex_message(&err),
    })
}

fn regex_message(err: &regex::Error) -> String {
    let text = err.to_string();
    let reason = text
        .lines()
        .find_map(|line| line.strip_prefix("error: "))
        .or_else(|| text.lines().next())
        .unwrap_or_default();
    format!("error parsing regexp: {reason}")
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
