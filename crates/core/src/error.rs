// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for cir-core operations.

use thiserror::Error;

use crate::filter::Diagnostic;

/// All possible errors that can occur in cir-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no filter rules given\n  hint: an absent filter means no filtering, do not compile an empty list")]
    EmptyRules,

    /// The combined filter expression failed to compile.
    #[error("{0}")]
    Compile(Diagnostic),

    /// A compiled filter failed while evaluating one digest.
    #[error("{0}")]
    Eval(Diagnostic),

    #[error("invalid duration \"{0}\"")]
    InvalidDuration(String),

    #[error("unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownDurationUnit { unit: String, input: String },

    #[error("missing unit in duration \"{0}\"")]
    MissingDurationUnit(String),

    #[error("unknown pattern {0}")]
    UnknownSizePattern(String),

    #[error("parsing time \"{input}\" as \"YYYY-MM-DD\": {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("invalid argument for {func} (type {ty})")]
    InvalidArgument { func: String, ty: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for cir-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
