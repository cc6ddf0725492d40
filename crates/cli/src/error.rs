// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the cirrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Filter compile/evaluation and unit literal errors.
    #[error(transparent)]
    Core(#[from] cir_core::Error),

    #[error("registry host is required\n  hint: pass --host or set REGISTRY_HOST")]
    MissingHost,

    #[error("unknown matcher registry handler by host {0}\n  hint: pass --type explicitly, supported types: gcr")]
    UnknownRegistryHost(String),

    #[error("unknown image registry type {0}\n  hint: supported types: gcr")]
    UnknownRegistryType(String),

    #[error("you must specified parent repository after registry host, eg; asia.gcr.io/parent_repo")]
    MissingParentRepository,

    #[error("you must set registry password")]
    MissingPassword,

    #[error("you must set registry username")]
    MissingUsername,

    #[error("you must set oauth token or basic auth params (username & password)")]
    MissingCredentials,

    #[error("must specified one or more output\n  hint: use --output-table and/or --output-json <path>")]
    MissingOutput,

    #[error("invalid value for worker count: {0}, make sure it's more than equal to 1")]
    InvalidWorkerCount(i64),

    #[error("error while reading {what} {path}: {source}")]
    ReadFile {
        what: &'static str,
        path: String,
        source: std::io::Error,
    },

    #[error("unmarshaling repository list file: {0}")]
    RepositoryList(cir_core::Error),

    /// A registry answered with an error payload.
    #[error("{0}")]
    Api(String),

    #[error("{context}: {reason}")]
    InvalidResponse { context: String, reason: String },

    #[error("error while deleting repository {repository}: {source}")]
    Delete {
        repository: String,
        source: Box<Error>,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for cirrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
