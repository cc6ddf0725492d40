// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Helper functions callable from filter expressions.
//!
//! The compiler resolves calls against an explicit [`Functions`] table, so the
//! vocabulary is fixed when an engine is built. [`Functions::builtin`] holds
//! the standard helpers:
//!
//! - `Date('2021-03-01')` - UTC midnight of a `YYYY-MM-DD` date
//! - `Duration('30d')` - a duration, with `d`, `M` and `Y` as coarse units
//! - `Now()` - the evaluation instant
//! - `SizeStr('1.5 GiB')` - a byte count as a float
//! - `len(Tags)` - length of a string or array

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::units;

use super::value::{Type, Value};

/// Signature shared by every helper.
pub type HelperFn = fn(&CallContext<'_>, &[Value]) -> Result<Value>;

/// Per-call state handed to helpers.
pub struct CallContext<'a> {
    /// The instant `Now()` returns.
    pub now: DateTime<Utc>,
    pub sizes: &'a SizeCache,
}

/// Types accepted in one argument position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    accepted: Vec<Type>,
}

impl Param {
    /// A parameter accepting any of `types`.
    pub fn one_of(types: impl IntoIterator<Item = Type>) -> Self {
        Self {
            accepted: types.into_iter().collect(),
        }
    }

    pub fn accepts(&self, ty: &Type) -> bool {
        self.accepted.iter().any(|expected| ty.accepts(expected))
    }
}

impl From<Type> for Param {
    fn from(ty: Type) -> Self {
        Self { accepted: vec![ty] }
    }
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, ty) in self.accepted.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

/// A registered helper.
#[derive(Clone)]
pub struct Function {
    /// Expected argument types, checked at compile time.
    pub params: Vec<Param>,
    pub returns: Type,
    pub call: HelperFn,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Name to helper lookup table.
#[derive(Debug, Clone, Default)]
pub struct Functions {
    table: HashMap<String, Function>,
}

impl Functions {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard helpers.
    pub fn builtin() -> Self {
        let mut functions = Self::new();
        let text = || vec![Param::from(Type::String)];
        let sized = Param::one_of([Type::String, Type::Array(Box::new(Type::Any))]);
        functions.register("Date", text(), Type::Time, date);
        functions.register("Duration", text(), Type::Duration, duration);
        functions.register("Now", vec![], Type::Time, now);
        functions.register("SizeStr", text(), Type::Float, size_str);
        functions.register("len", vec![sized], Type::Int, len);
        functions
    }

    /// Add or replace a helper.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        params: Vec<Param>,
        returns: Type,
        call: HelperFn,
    ) -> &mut Self {
        self.table.insert(
            name.into(),
            Function {
                params,
                returns,
                call,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.table.get(name)
    }
}

/// Memoized `SizeStr` results, keyed by the literal text.
#[derive(Debug, Default)]
pub struct SizeCache {
    entries: Mutex<HashMap<String, f64>>,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached byte count for `literal`, parsing it on first use.
    ///
    /// Failures are not cached.
    pub fn get_or_parse(&self, literal: &str) -> Result<f64> {
        if let Some(bytes) = self.lock().get(literal) {
            return Ok(*bytes);
        }
        let bytes = units::parse_size(literal)?;
        self.lock().insert(literal.to_string(), bytes);
        Ok(bytes)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock still holds valid entries; the map is append-only.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, f64>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn string_arg(args: &[Value]) -> &str {
    match args.first() {
        Some(Value::String(s)) => s,
        _ => "",
    }
}

fn date(_: &CallContext<'_>, args: &[Value]) -> Result<Value> {
    units::parse_date(string_arg(args)).map(Value::Time)
}

fn duration(_: &CallContext<'_>, args: &[Value]) -> Result<Value> {
    units::parse_duration(string_arg(args)).map(Value::Duration)
}

fn now(ctx: &CallContext<'_>, _: &[Value]) -> Result<Value> {
    Ok(Value::Time(ctx.now))
}

fn size_str(ctx: &CallContext<'_>, args: &[Value]) -> Result<Value> {
    ctx.sizes.get_or_parse(string_arg(args)).map(Value::Float)
}

fn len(_: &CallContext<'_>, args: &[Value]) -> Result<Value> {
    let count = match args.first() {
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Array(items)) => items.len(),
        other => {
            return Err(Error::InvalidArgument {
                func: "len".to_string(),
                ty: other.map_or("nil", |v| v.kind().name()).to_string(),
            });
        }
    };
    Ok(Value::Int(i64::try_from(count).unwrap_or(i64::MAX)))
}

#[cfg(test)]
#[path = "functions_tests.rs"]
mod tests;
