// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{digest, TestContext};
use cir_core::Engine;
use tempfile::TempDir;

fn catalog() -> Vec<Repository> {
    vec![
        Repository::new(
            "gcr.io/proj/app",
            vec![
                digest("sha256:a1", 10, &["latest"]),
                digest("sha256:a2", 4096, &[]),
            ],
        ),
        Repository::new("gcr.io/proj/tool", vec![digest("sha256:t1", 20, &["v1"])]),
    ]
}

#[test]
fn test_catalog_without_filters() {
    let ctx = TestContext::new(catalog());
    assert_eq!(list_repositories(&ctx.config).unwrap(), catalog());
    assert_eq!(*ctx.registry.catalog_calls.lock().unwrap(), 1);
}

#[test]
fn test_catalog_is_filtered() {
    let mut ctx = TestContext::new(catalog());
    ctx.config.include = Some(Engine::new(&["ImageSize > SizeStr('1 KiB') || 'v1' in Tags"]).unwrap());
    ctx.config.exclude = Some(Engine::new(&["Repository endsWith '/tool'"]).unwrap());

    let repos = list_repositories(&ctx.config).unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "gcr.io/proj/app");
    assert_eq!(repos[0].digests.len(), 1);
    assert_eq!(repos[0].digests[0].name, "sha256:a2");
}

#[test]
fn test_repository_list_skips_catalog_and_filters() {
    let mut ctx = TestContext::new(catalog());
    let listed = vec![Repository::new(
        "gcr.io/proj/other",
        vec![digest("sha256:o1", 1, &[])],
    )];
    ctx.config.repositories = listed.clone();
    ctx.config.include = Some(Engine::new(&["false"]).unwrap());

    assert_eq!(list_repositories(&ctx.config).unwrap(), listed);
    assert_eq!(*ctx.registry.catalog_calls.lock().unwrap(), 0);
}

#[test]
fn test_run_writes_json_output() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("out.json");
    let mut ctx = TestContext::new(catalog());
    ctx.config.output.json = Some(path.clone());

    let repos = run(&ctx.config).unwrap();
    let written = cir_core::registry::parse_repository_list(&std::fs::read_to_string(&path).unwrap())
        .unwrap();
    assert_eq!(written, repos);
}

#[test]
fn test_evaluation_error_aborts_listing() {
    let mut ctx = TestContext::new(catalog());
    ctx.config.include = Some(Engine::new(&["Tags[3] == 'x'"]).unwrap());
    let err = list_repositories(&ctx.config).unwrap_err();
    assert!(err.to_string().starts_with("index out of range: 3"));
}
