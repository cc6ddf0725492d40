// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Google Container Registry backend.
//!
//! The catalog is walked through the `child` attribute of `tags/list`
//! rather than `/v2/_catalog`, so a service account only needs read access
//! to the project's storage bucket.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cir_core::{Digest, Repository};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{ApiError, ApiErrors, ImageRegistry};
use crate::error::{Error, Result};
use crate::http::HttpClient;

#[derive(Debug, Default, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    child: Option<Vec<String>>,
    #[serde(default)]
    manifest: Option<BTreeMap<String, Manifest>>,
    #[serde(default)]
    errors: Option<Vec<ApiError>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default)]
    image_size_bytes: String,
    #[serde(default)]
    tag: Option<Vec<String>>,
    #[serde(default)]
    time_created_ms: String,
    #[serde(default)]
    time_uploaded_ms: String,
}

/// A GCR project, addressed as `<host>/<project>[/<path>...]`.
pub struct Gcr {
    host: String,
    project: String,
    client: Arc<dyn HttpClient>,
}

impl Gcr {
    pub fn new(host: &str, client: Arc<dyn HttpClient>) -> Result<Self> {
        let Some((host, project)) = host.split_once('/') else {
            return Err(Error::MissingParentRepository);
        };
        Ok(Gcr {
            host: host.to_string(),
            project: project.to_string(),
            client,
        })
    }

    fn tag_list(&self, repository: &str, out: &mut Vec<Repository>) -> Result<()> {
        let url = format!("https://{}/v2/{}/tags/list", self.host, repository);
        let body: TagsResponse = decode(&url, self.client.get_json(&url)?)?;

        if let Some(error) = body.errors.as_ref().and_then(|errors| errors.first()) {
            return Err(Error::Api(format!("[{}] [{}]", error.code, error.message)));
        }

        for child in body.child.iter().flatten() {
            self.tag_list(&format!("{repository}/{child}"), out)?;
        }

        let manifests = body.manifest.unwrap_or_default();
        if manifests.is_empty() {
            return Ok(());
        }

        let mut digests = Vec::with_capacity(manifests.len());
        for (name, manifest) in manifests {
            digests.push(to_digest(name, manifest)?);
        }
        tracing::debug!(repo = %repository, total_digest = digests.len(), "fetched repository");
        out.push(Repository::new(format!("{}/{}", self.host, repository), digests));
        Ok(())
    }

    fn delete_manifest(&self, url: &str) -> Result<()> {
        tracing::debug!(%url, "deleting manifest");
        let body: ApiErrors = decode(url, self.client.delete_json(url)?)?;
        match body.first() {
            Some(error) => Err(Error::Api(error.message.clone())),
            None => Ok(()),
        }
    }
}

impl ImageRegistry for Gcr {
    fn catalog(&self) -> Result<Vec<Repository>> {
        let mut repositories = Vec::new();
        self.tag_list(&self.project, &mut repositories)?;
        Ok(repositories)
    }

    fn delete(&self, repository: &Repository) -> Result<()> {
        let prefix = format!("{}/", self.host);
        let short_name = repository
            .name
            .strip_prefix(&prefix)
            .unwrap_or(&repository.name);
        let manifests = format!("https://{}/v2/{}/manifests", self.host, short_name);

        for digest in &repository.digests {
            for tag in &digest.tags {
                self.delete_manifest(&format!("{manifests}/{tag}"))?;
            }
            self.delete_manifest(&format!("{manifests}/{}", digest.name))?;
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned + Default>(url: &str, value: Value) -> Result<T> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|e| Error::InvalidResponse {
        context: format!("while decoding response of {url}"),
        reason: e.to_string(),
    })
}

fn to_digest(name: String, manifest: Manifest) -> Result<Digest> {
    let image_size_bytes = manifest
        .image_size_bytes
        .parse::<u64>()
        .map_err(|e| invalid("while converting image size", &manifest.image_size_bytes, e))?;
    let created = parse_millis(&manifest.time_created_ms)
        .map_err(|reason| invalid("while parse created time", &manifest.time_created_ms, reason))?;
    let uploaded = parse_millis(&manifest.time_uploaded_ms).map_err(|reason| {
        invalid("while parse uploaded time", &manifest.time_uploaded_ms, reason)
    })?;

    Ok(Digest {
        name,
        image_size_bytes,
        tags: manifest.tag.unwrap_or_default(),
        created,
        uploaded,
    })
}

/// Millisecond epoch string to a second-precision instant.
fn parse_millis(input: &str) -> std::result::Result<DateTime<Utc>, String> {
    let millis: i64 = input.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    DateTime::from_timestamp(millis / 1000, 0).ok_or_else(|| "timestamp out of range".to_string())
}

fn invalid(context: &str, input: &str, reason: impl std::fmt::Display) -> Error {
    Error::InvalidResponse {
        context: context.to_string(),
        reason: format!("parsing {input:?}: {reason}"),
    }
}

#[cfg(test)]
#[path = "gcr_tests.rs"]
mod tests;
