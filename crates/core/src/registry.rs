// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Image catalog model shared by listing, filtering and deletion.
//!
//! The JSON shape written by `list --output-json` is also the format read by
//! `delete --repo-list`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One image manifest in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    /// `sha256:`-prefixed manifest digest.
    #[serde(rename = "digest")]
    pub name: String,
    #[serde(rename = "size")]
    pub image_size_bytes: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
    #[serde(rename = "Uploaded")]
    pub uploaded: DateTime<Utc>,
}

/// A repository and the digests it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Full name including the registry host, e.g. `asia.gcr.io/proj/app`.
    #[serde(rename = "repository")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub digests: Vec<Digest>,
}

impl Repository {
    pub fn new(name: impl Into<String>, digests: Vec<Digest>) -> Self {
        Repository {
            name: name.into(),
            digests,
        }
    }

    /// Sum of all digest sizes, saturating.
    pub fn total_size(&self) -> u64 {
        self.digests
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.image_size_bytes))
    }
}

// Lists written by older tooling use `null` for empty arrays.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a repository list previously written as JSON.
pub fn parse_repository_list(content: &str) -> crate::Result<Vec<Repository>> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
