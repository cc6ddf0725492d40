// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Test infrastructure for command testing without a registry.
//!
//! [`FakeRegistry`] serves a fixed catalog and records deletions, and
//! [`TestContext`] wraps it in a [`Config`] so commands can run end to end.
//!
//! ```rust,ignore
//! use crate::commands::testing::{digest, TestContext};
//!
//! let ctx = TestContext::new(vec![Repository::new("gcr.io/p/app", vec![digest("sha256:a1", 10, &[])])]);
//! let repos = list::list_repositories(&ctx.config)?;
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use cir_core::{Digest, Repository};

use crate::commands::delete::DeleteOptions;
use crate::config::{Config, Output};
use crate::error::{Error, Result};
use crate::registry::{ImageRegistry, RegistryType};

/// Digest created on 2021-01-01 and uploaded on 2021-01-02.
pub fn digest(name: &str, size: u64, tags: &[&str]) -> Digest {
    Digest {
        name: name.to_string(),
        image_size_bytes: size,
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        created: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
        uploaded: Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap(),
    }
}

/// In-memory registry. Deleting a repository listed in `failing` errors.
#[derive(Default)]
pub struct FakeRegistry {
    pub catalog: Vec<Repository>,
    pub failing: HashSet<String>,
    pub deleted: Mutex<Vec<Repository>>,
    pub catalog_calls: Mutex<usize>,
}

impl FakeRegistry {
    pub fn deleted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .deleted
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        names
    }
}

impl ImageRegistry for FakeRegistry {
    fn catalog(&self) -> Result<Vec<Repository>> {
        *self.catalog_calls.lock().unwrap() += 1;
        Ok(self.catalog.clone())
    }

    fn delete(&self, repository: &Repository) -> Result<()> {
        if self.failing.contains(&repository.name) {
            return Err(Error::Api("DENIED".to_string()));
        }
        self.deleted.lock().unwrap().push(repository.clone());
        Ok(())
    }
}

impl ImageRegistry for Arc<FakeRegistry> {
    fn catalog(&self) -> Result<Vec<Repository>> {
        self.as_ref().catalog()
    }

    fn delete(&self, repository: &Repository) -> Result<()> {
        self.as_ref().delete(repository)
    }
}

/// A [`Config`] over a shared [`FakeRegistry`].
pub struct TestContext {
    pub registry: Arc<FakeRegistry>,
    pub config: Config,
}

impl TestContext {
    pub fn new(catalog: Vec<Repository>) -> Self {
        Self::with_registry(FakeRegistry {
            catalog,
            ..FakeRegistry::default()
        })
    }

    pub fn with_registry(registry: FakeRegistry) -> Self {
        let registry = Arc::new(registry);
        let config = Config {
            host: "gcr.io/proj".to_string(),
            registry_type: RegistryType::Gcr,
            registry: Box::new(registry.clone()),
            include: None,
            exclude: None,
            repositories: Vec::new(),
            delete: DeleteOptions::default(),
            output: Output::default(),
        };
        TestContext { registry, config }
    }
}
