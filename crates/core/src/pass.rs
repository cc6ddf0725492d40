// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Applying filters and skip lists to a repository catalog.

use crate::error::Result;
use crate::filter::{Fields, FilterEngine};
use crate::registry::{Digest, Repository};

/// Keep the digests selected by `include` and not selected by `exclude`.
///
/// Repositories left without digests are dropped; order is preserved. With
/// neither engine the catalog is returned unchanged. The first evaluation
/// error aborts the pass.
pub fn filter_repositories(
    repositories: Vec<Repository>,
    include: Option<&dyn FilterEngine>,
    exclude: Option<&dyn FilterEngine>,
) -> Result<Vec<Repository>> {
    if include.is_none() && exclude.is_none() {
        return Ok(repositories);
    }

    let mut result = Vec::with_capacity(repositories.len());
    for repo in repositories {
        let mut kept = Vec::with_capacity(repo.digests.len());
        for digest in repo.digests {
            let fields = Fields::from_digest(&repo.name, &digest);
            if let Some(engine) = include {
                if !engine.process(&fields)? {
                    continue;
                }
            }
            if let Some(engine) = exclude {
                if engine.process(&fields)? {
                    continue;
                }
            }
            kept.push(digest);
        }

        if kept.is_empty() {
            tracing::debug!(repo = %repo.name, "no digest left after filtering");
            continue;
        }
        result.push(Repository {
            name: repo.name,
            digests: kept,
        });
    }
    Ok(result)
}

/// Drop every digest carrying a tag listed as `<repository>:<tag>` in
/// `skip_list`.
pub fn apply_skip_list(repository: &mut Repository, skip_list: &[String]) {
    if skip_list.is_empty() {
        return;
    }
    let name = repository.name.clone();
    repository
        .digests
        .retain(|digest| match skipped_image(&name, digest, skip_list) {
            Some(image) => {
                tracing::info!(image = %image, digest = %digest.name, "listed in skip list, ignoring related digest");
                false
            }
            None => true,
        });
}

fn skipped_image(repository: &str, digest: &Digest, skip_list: &[String]) -> Option<String> {
    digest
        .tags
        .iter()
        .map(|tag| format!("{repository}:{tag}"))
        .find(|image| skip_list.contains(image))
}

#[cfg(test)]
#[path = "pass_tests.rs"]
mod tests;
