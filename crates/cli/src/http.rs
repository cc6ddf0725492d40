// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-over-HTTP transport used by the registry backends.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Credentials attached to every request.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Auth::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// Minimal client surface the registries need.
///
/// Bodies are decoded as JSON; an empty body decodes to [`Value::Null`].
pub trait HttpClient: Send + Sync {
    fn get_json(&self, url: &str) -> Result<Value>;
    fn delete_json(&self, url: &str) -> Result<Value>;
}

/// Blocking reqwest client with fixed credentials.
pub struct ReqwestClient {
    client: Client,
    auth: Auth,
}

impl ReqwestClient {
    pub fn new(auth: Auth, allow_insecure: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if allow_insecure {
            tracing::warn!("ssl certificate verification is disabled");
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .danger_accept_invalid_certs(allow_insecure)
            .build()?;
        Ok(ReqwestClient { client, auth })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
            Auth::Bearer(token) => request.bearer_auth(token),
        }
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<Value> {
        let response = self.authorize(request).send()?;
        tracing::debug!(%url, status = %response.status(), "registry response");
        let body = response.text()?;
        decode_body(url, &body)
    }
}

impl HttpClient for ReqwestClient {
    fn get_json(&self, url: &str) -> Result<Value> {
        tracing::debug!(%url, "GET");
        self.send(self.client.get(url), url)
    }

    fn delete_json(&self, url: &str) -> Result<Value> {
        tracing::debug!(%url, "DELETE");
        self.send(self.client.delete(url), url)
    }
}

pub(crate) fn decode_body(url: &str, body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| Error::InvalidResponse {
        context: format!("while decoding response of {url}"),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
