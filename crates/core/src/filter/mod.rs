// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filter expressions for selecting image digests.
//!
//! A filter is a set of rules. Each rule is a boolean expression over the
//! attributes of one digest; a digest matches the set when any rule matches.
//!
//! # Fields
//!
//! - `Repository`, `Digest` - strings
//! - `ImageSize` - size in bytes
//! - `Tags` - list of tag names
//! - `CreatedAt`, `UploadedAt` - timestamps
//!
//! # Helpers
//!
//! - `Date('2021-03-01')`, `Now()` - timestamps
//! - `Duration('30d')` - durations; `d`, `M` and `Y` are 24h, 720h and 8640h
//! - `SizeStr('1.5 GiB')` - byte counts
//!
//! # Examples
//!
//! ```text
//! UploadedAt < Now() - Duration('30d')
//! ImageSize >= SizeStr('500 MiB') && not ('latest' in Tags)
//! Repository matches '^asia.gcr.io/proj/(dev|staging)/'
//! ```

mod compile;
mod diagnostic;
mod eval;
mod expr;
mod fields;
mod functions;
mod lexer;
mod ops;
mod parser;
mod value;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

pub use compile::Program;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use expr::{BinaryOp, UnaryOp};
pub use fields::{Field, Fields};
pub use functions::{CallContext, Function, Functions, HelperFn, Param, SizeCache};
pub use parser::MAX_DEPTH;
pub use value::{Kind, Type, Value};

const RULE_JOINER: &str = " || ";

/// Decides whether one digest is selected.
pub trait FilterEngine: Send + Sync {
    fn process(&self, fields: &Fields) -> Result<bool>;
}

/// A compiled rule set together with its size-literal cache.
#[derive(Debug)]
pub struct Engine {
    program: Program,
    sizes: SizeCache,
}

impl Engine {
    /// Compile `rules` against the built-in helpers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRules`] for an empty slice and [`Error::Compile`]
    /// with a located message when the combined expression is invalid.
    pub fn new<S: AsRef<str>>(rules: &[S]) -> Result<Engine> {
        Self::with_functions(rules, &Functions::builtin())
    }

    /// Compile `rules` against an explicit helper table.
    pub fn with_functions<S: AsRef<str>>(rules: &[S], functions: &Functions) -> Result<Engine> {
        let source = join_rules(rules)?;
        tracing::debug!(filter = %source, "compiling filter");
        let program = compile::compile(&source, functions).map_err(Error::Compile)?;
        Ok(Engine {
            program,
            sizes: SizeCache::new(),
        })
    }

    /// Evaluate with `Now()` fixed to `now`.
    pub fn process_at(&self, fields: &Fields, now: DateTime<Utc>) -> Result<bool> {
        let ctx = CallContext {
            now,
            sizes: &self.sizes,
        };
        self.program.evaluate(fields, &ctx).map_err(Error::Eval)
    }

    /// The combined expression, e.g. `(a) || (b)`.
    pub fn source(&self) -> &str {
        self.program.source()
    }

    pub fn size_cache(&self) -> &SizeCache {
        &self.sizes
    }
}

impl FilterEngine for Engine {
    fn process(&self, fields: &Fields) -> Result<bool> {
        self.process_at(fields, Utc::now())
    }
}

/// Wrap each rule in parentheses and join them with `||`.
fn join_rules<S: AsRef<str>>(rules: &[S]) -> Result<String> {
    if rules.is_empty() {
        return Err(Error::EmptyRules);
    }
    Ok(rules
        .iter()
        .map(|rule| format!("({})", rule.as_ref()))
        .collect::<Vec<_>>()
        .join(RULE_JOINER))
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
