// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

#[parameterized(
    repository = { "Repository", Field::Repository, Type::String },
    digest = { "Digest", Field::Digest, Type::String },
    image_size = { "ImageSize", Field::ImageSize, Type::Uint },
    tags = { "Tags", Field::Tags, Type::Array(Box::new(Type::String)) },
    created = { "CreatedAt", Field::CreatedAt, Type::Time },
    uploaded = { "UploadedAt", Field::UploadedAt, Type::Time },
)]
fn schema(name: &str, field: Field, ty: Type) {
    assert_eq!(Field::from_name(name), Some(field));
    assert_eq!(field.name(), name);
    assert_eq!(field.ty(), ty);
}

#[test]
fn names_are_case_sensitive() {
    assert_eq!(Field::from_name("repository"), None);
    assert_eq!(Field::from_name("whoami"), None);
}

#[test]
fn valid_names_lists_all() {
    assert_eq!(
        Field::valid_names(),
        "Repository, Digest, ImageSize, Tags, CreatedAt, UploadedAt"
    );
}

#[test]
fn from_digest_copies_attributes() {
    let created = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    let uploaded = Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap();
    let digest = Digest {
        name: "sha256:abc".into(),
        image_size_bytes: 42,
        tags: vec!["v1".into()],
        created,
        uploaded,
    };
    let fields = Fields::from_digest("gcr.io/p/app", &digest);
    assert_eq!(fields.get(Field::Repository), Value::String("gcr.io/p/app".into()));
    assert_eq!(fields.get(Field::Digest), Value::String("sha256:abc".into()));
    assert_eq!(fields.get(Field::ImageSize), Value::Uint(42));
    assert_eq!(
        fields.get(Field::Tags),
        Value::Array(vec![Value::String("v1".into())])
    );
    assert_eq!(fields.get(Field::CreatedAt), Value::Time(created));
    assert_eq!(fields.get(Field::UploadedAt), Value::Time(uploaded));
}

#[test]
fn empty_tags_are_empty_array() {
    assert_eq!(Fields::default().get(Field::Tags), Value::Array(vec![]));
}
