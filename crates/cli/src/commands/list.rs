// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cir_core::{filter_repositories, FilterEngine, Repository};

use crate::config::Config;
use crate::display;
use crate::error::Result;

/// Repositories to act on: the `--repo-list` content when given, else the
/// filtered registry catalog.
pub fn list_repositories(config: &Config) -> Result<Vec<Repository>> {
    if !config.repositories.is_empty() {
        tracing::debug!(
            total = config.repositories.len(),
            "using repositories from repository list file"
        );
        return Ok(config.repositories.clone());
    }

    tracing::info!("listing repository catalog");
    let catalog = config.registry.catalog()?;
    let include = config.include.as_ref().map(|e| e as &dyn FilterEngine);
    let exclude = config.exclude.as_ref().map(|e| e as &dyn FilterEngine);
    Ok(filter_repositories(catalog, include, exclude)?)
}

/// List repositories and write them to the configured outputs.
pub fn run(config: &Config) -> Result<Vec<Repository>> {
    let repositories = list_repositories(config)?;

    if config.output.table {
        display::print_table(&repositories);
    }

    if let Some(path) = &config.output.json {
        display::dump_json(&repositories, path)?;
        tracing::info!("json output result written to {}", path.display());
    }

    Ok(repositories)
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
