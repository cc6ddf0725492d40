// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration.
//!
//! Settings come from command-line flags (and their environment variables),
//! optionally layered over a TOML file. The file is looked up at
//! `--config <path>` or, when present, `$XDG_CONFIG_HOME/cir-rotator/config.toml`:
//!
//! ```toml
//! host = "asia.gcr.io/my-project"
//! include-filters = ["UploadedAt < Now() - Duration('90d')"]
//! exclude-filters = ["'latest' in Tags"]
//! worker-count = 4
//! ```
//!
//! Flags win over file values, except the filter lists which are combined
//! (file rules first).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cir_core::{Engine, Repository};
use serde::Deserialize;

use crate::commands::delete::DeleteOptions;
use crate::error::{Error, Result};
use crate::http::{Auth, HttpClient, ReqwestClient};
use crate::registry::{ImageRegistry, RegistryType};

const CONFIG_DIR_NAME: &str = "cir-rotator";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Username GCR expects when the password is a service account key.
const SERVICE_ACCOUNT_USER: &str = "_json_key";

/// Values read from the TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub host: Option<String>,
    #[serde(rename = "type")]
    pub registry_type: Option<String>,
    pub include_filters: Vec<String>,
    pub exclude_filters: Vec<String>,
    pub worker_count: Option<i64>,
    pub allow_insecure: Option<bool>,
    pub skip_list: Option<PathBuf>,
    pub service_account: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load `explicit` if given, else the default file if it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Where list results go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub table: bool,
    pub json: Option<PathBuf>,
}

impl Output {
    pub fn is_empty(&self) -> bool {
        !self.table && self.json.is_none()
    }
}

/// Unvalidated settings gathered from flags and the config file.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub host: Option<String>,
    pub registry_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub service_account: Option<PathBuf>,
    pub access_token: Option<String>,
    pub allow_insecure: bool,
    pub include_filters: Vec<String>,
    pub exclude_filters: Vec<String>,
    pub worker_count: Option<i64>,
    pub skip_list: Option<PathBuf>,
    pub repo_list: Option<PathBuf>,
    pub dry_run: bool,
    pub skip_error: bool,
    pub output: Output,
}

impl Options {
    /// Fill unset values from `file`; file filters are placed first.
    pub fn with_file(mut self, file: FileConfig) -> Self {
        self.host = self.host.or(file.host);
        self.registry_type = self.registry_type.or(file.registry_type);
        self.worker_count = self.worker_count.or(file.worker_count);
        self.allow_insecure |= file.allow_insecure.unwrap_or(false);
        self.skip_list = self.skip_list.or(file.skip_list);
        self.service_account = self.service_account.or(file.service_account);
        self.include_filters = prepend(file.include_filters, self.include_filters);
        self.exclude_filters = prepend(file.exclude_filters, self.exclude_filters);
        self
    }
}

fn prepend(mut first: Vec<String>, rest: Vec<String>) -> Vec<String> {
    first.extend(rest);
    first
}

/// Validated configuration with its dependencies built.
pub struct Config {
    pub host: String,
    pub registry_type: RegistryType,
    pub registry: Box<dyn ImageRegistry>,
    pub include: Option<Engine>,
    pub exclude: Option<Engine>,
    /// Repositories read from `--repo-list`; used instead of the catalog.
    pub repositories: Vec<Repository>,
    pub delete: DeleteOptions,
    pub output: Output,
}

impl Config {
    pub fn init(options: Options) -> Result<Self> {
        Self::init_with(options, |auth, allow_insecure| {
            Ok(Arc::new(ReqwestClient::new(auth, allow_insecure)?))
        })
    }

    /// Validate `options` and build dependencies in order: registry type,
    /// http client, registry, skip list, filters, repository list.
    pub fn init_with<F>(options: Options, connect: F) -> Result<Self>
    where
        F: FnOnce(Auth, bool) -> Result<Arc<dyn HttpClient>>,
    {
        let host = match options.host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(Error::MissingHost),
        };
        let registry_type = match options.registry_type.as_deref() {
            Some(t) if !t.is_empty() => t.parse()?,
            _ => RegistryType::detect(&host)?,
        };
        tracing::debug!(%host, registry_type = %registry_type, "resolved registry");

        let worker_count = match options.worker_count.unwrap_or(1) {
            n if n >= 1 => usize::try_from(n).map_err(|_| Error::InvalidWorkerCount(n))?,
            n => return Err(Error::InvalidWorkerCount(n)),
        };

        let auth = resolve_auth(&options)?;
        let client = connect(auth, options.allow_insecure)?;
        let registry = registry_type.open(&host, client)?;

        let skip_list = match &options.skip_list {
            Some(path) => read_lines(path)?,
            None => Vec::new(),
        };

        let include = compile(&options.include_filters)?;
        let exclude = compile(&options.exclude_filters)?;

        let repositories = match &options.repo_list {
            Some(path) => read_repository_list(path)?,
            None => Vec::new(),
        };

        Ok(Config {
            host,
            registry_type,
            registry,
            include,
            exclude,
            repositories,
            delete: DeleteOptions {
                skip_list,
                dry_run: options.dry_run,
                skip_error: options.skip_error,
                worker_count,
            },
            output: options.output,
        })
    }
}

/// Service account first, then an access token, then basic auth.
fn resolve_auth(options: &Options) -> Result<Auth> {
    if let Some(path) = &options.service_account {
        let key = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            what: "service account file",
            path: path.display().to_string(),
            source,
        })?;
        return Ok(Auth::Basic {
            username: SERVICE_ACCOUNT_USER.to_string(),
            password: key,
        });
    }
    if let Some(token) = options.access_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(Auth::Bearer(token.to_string()));
    }

    let username = options.username.as_deref().unwrap_or_default();
    let password = options.password.as_deref().unwrap_or_default();
    match (username.is_empty(), password.is_empty()) {
        (false, false) => Ok(Auth::Basic {
            username: username.to_string(),
            password: password.to_string(),
        }),
        (false, true) => Err(Error::MissingPassword),
        (true, false) => Err(Error::MissingUsername),
        (true, true) => Err(Error::MissingCredentials),
    }
}

fn compile(rules: &[String]) -> Result<Option<Engine>> {
    if rules.is_empty() {
        return Ok(None);
    }
    Ok(Some(Engine::new(rules)?))
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        what: "skip list file",
        path: path.display().to_string(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

fn read_repository_list(path: &Path) -> Result<Vec<Repository>> {
    let content = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        what: "repository list file",
        path: path.display().to_string(),
        source,
    })?;
    cir_core::registry::parse_repository_list(&content).map_err(Error::RepositoryList)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
