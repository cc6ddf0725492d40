// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;

fn digest(name: &str, size: u64, tags: &[&str]) -> Digest {
    Digest {
        name: name.into(),
        image_size_bytes: size,
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        created: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
        uploaded: Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap(),
    }
}

#[test]
fn serializes_with_catalog_field_names() {
    let repo = Repository::new("asia.gcr.io/proj/app", vec![digest("sha256:abc", 10, &["v1"])]);
    let json: serde_json::Value = serde_json::to_value(&repo).unwrap();
    assert_eq!(json["repository"], "asia.gcr.io/proj/app");
    let first = &json["digests"][0];
    assert_eq!(first["digest"], "sha256:abc");
    assert_eq!(first["size"], 10);
    assert_eq!(first["tags"][0], "v1");
    assert_eq!(first["created"], "2021-01-01T00:00:00Z");
    assert_eq!(first["Uploaded"], "2021-01-02T00:00:00Z");
}

#[test]
fn parses_repository_list() {
    let content = r#"[{
        "repository": "asia.gcr.io/proj/app",
        "digests": [{
            "digest": "sha256:abc",
            "size": 2048,
            "tags": null,
            "created": "2021-01-01T00:00:00+07:00",
            "Uploaded": "2021-01-02T00:00:00Z"
        }]
    }]"#;
    let repos = parse_repository_list(content).unwrap();
    assert_eq!(repos.len(), 1);
    let d = &repos[0].digests[0];
    assert_eq!(d.image_size_bytes, 2048);
    assert!(d.tags.is_empty());
    assert_eq!(d.created, Utc.with_ymd_and_hms(2020, 12, 31, 17, 0, 0).unwrap());
}

#[test]
fn invalid_repository_list_is_json_error() {
    let err = parse_repository_list("{not json").unwrap_err();
    assert!(matches!(err, crate::Error::Json(_)));
}

#[test]
fn total_size_sums_digests() {
    let repo = Repository::new(
        "r",
        vec![digest("a", 1024, &[]), digest("b", 2048, &[])],
    );
    assert_eq!(repo.total_size(), 3072);
}

#[test]
fn total_size_saturates() {
    let repo = Repository::new("r", vec![digest("a", u64::MAX, &[]), digest("b", 1, &[])]);
    assert_eq!(repo.total_size(), u64::MAX);
}
