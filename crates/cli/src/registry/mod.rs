// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Image registry backends.
//!
//! A backend lists its catalog as [`Repository`] values and deletes the
//! digests of a repository. Only Google Container Registry (including
//! `pkg.dev` Artifact Registry hosts) is supported.

mod gcr;

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use cir_core::Repository;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http::HttpClient;

pub use gcr::Gcr;

static GCR_HOST: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"([a-z]+\.)?(gcr\.io|pkg\.dev)") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

/// Operations every registry backend provides.
pub trait ImageRegistry: Send + Sync {
    /// Every repository reachable from the configured root, with its digests.
    fn catalog(&self) -> Result<Vec<Repository>>;

    /// Delete all digests of `repository`, tags first.
    fn delete(&self, repository: &Repository) -> Result<()>;
}

/// Supported registry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryType {
    Gcr,
}

impl RegistryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryType::Gcr => "gcr",
        }
    }

    /// Guess the registry kind from its host name.
    pub fn detect(host: &str) -> Result<Self> {
        if GCR_HOST.is_match(host) {
            return Ok(RegistryType::Gcr);
        }
        Err(Error::UnknownRegistryHost(host.to_string()))
    }

    /// Build the backend for `host`.
    pub fn open(self, host: &str, client: Arc<dyn HttpClient>) -> Result<Box<dyn ImageRegistry>> {
        match self {
            RegistryType::Gcr => Ok(Box::new(Gcr::new(host, client)?)),
        }
    }
}

impl FromStr for RegistryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gcr" => Ok(RegistryType::Gcr),
            other => Err(Error::UnknownRegistryType(other.to_string())),
        }
    }
}

impl fmt::Display for RegistryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error entry of the Docker registry v2 error payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Body returned by manifest deletion.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrors {
    #[serde(default)]
    pub errors: Option<Vec<ApiError>>,
}

impl ApiErrors {
    pub fn first(&self) -> Option<&ApiError> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
