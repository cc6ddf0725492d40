// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use cir_core::units::{byte_count_iec, humanize_duration};
use cir_core::{apply_skip_list, Repository};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::registry::ImageRegistry;

use super::list;

/// How deletion runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOptions {
    /// `<repository>:<tag>` entries whose digests are kept.
    pub skip_list: Vec<String>,
    /// Log what would be deleted without deleting.
    pub dry_run: bool,
    /// Log deletion errors and continue with the next repository.
    pub skip_error: bool,
    pub worker_count: usize,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        DeleteOptions {
            skip_list: Vec::new(),
            dry_run: false,
            skip_error: false,
            worker_count: 1,
        }
    }
}

pub fn run(config: &Config) -> Result<()> {
    let repositories = list::run(config)?;
    delete_repositories(config.registry.as_ref(), repositories, &config.delete)
}

/// Delete every digest of `repositories` except those protected by the skip
/// list, one repository per worker at a time.
pub fn delete_repositories(
    registry: &dyn ImageRegistry,
    repositories: Vec<Repository>,
    options: &DeleteOptions,
) -> Result<()> {
    let mut queue = Vec::with_capacity(repositories.len());
    for mut repo in repositories {
        apply_skip_list(&mut repo, &options.skip_list);
        if repo.digests.is_empty() {
            tracing::warn!(repo = %repo.name, "no digest found as for deleting in repository, skip it");
            continue;
        }

        let total_digest = repo.digests.len();
        let total_size = byte_count_iec(repo.total_size());
        if options.dry_run {
            tracing::warn!(repo = %repo.name, total_digest, %total_size, "[DRY_RUN] attempting for deletion");
            continue;
        }
        tracing::warn!(repo = %repo.name, total_digest, %total_size, "enqueue for deletion");
        queue.push(repo);
    }

    run_workers(registry, &queue, options)
}

/// Drain `queue` with up to `worker_count` threads. After the first hard
/// error no new repository is started; the error is returned once every
/// worker has stopped.
fn run_workers(
    registry: &dyn ImageRegistry,
    queue: &[Repository],
    options: &DeleteOptions,
) -> Result<()> {
    if queue.is_empty() {
        return Ok(());
    }

    let next = AtomicUsize::new(0);
    let failed = AtomicBool::new(false);
    let first_error: Mutex<Option<Error>> = Mutex::new(None);
    let workers = options.worker_count.clamp(1, queue.len());

    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| {
                while !failed.load(Ordering::SeqCst) {
                    let Some(repo) = queue.get(next.fetch_add(1, Ordering::SeqCst)) else {
                        break;
                    };
                    if let Err(e) = delete_one(registry, repo, options.skip_error) {
                        failed.store(true, Ordering::SeqCst);
                        first_error
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .get_or_insert(e);
                    }
                }
            });
        }
    });

    match first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn delete_one(registry: &dyn ImageRegistry, repo: &Repository, skip_error: bool) -> Result<()> {
    let span = tracing::info_span!(
        "delete",
        repo = %repo.name,
        total_digest = repo.digests.len(),
        total_size = %byte_count_iec(repo.total_size()),
    );
    let _guard = span.enter();

    tracing::info!("begin deletion process");
    let begin = Instant::now();
    if let Err(source) = registry.delete(repo) {
        let err = Error::Delete {
            repository: repo.name.clone(),
            source: Box::new(source),
        };
        if !skip_error {
            return Err(err);
        }
        tracing::error!(error = %err, "skip");
    }

    let elapsed = chrono::Duration::from_std(begin.elapsed()).unwrap_or(chrono::Duration::zero());
    tracing::info!(duration = %humanize_duration(elapsed), "done");
    Ok(())
}

#[cfg(test)]
#[path = "delete_tests.rs"]
mod tests;
