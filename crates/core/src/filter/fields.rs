// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The attributes a filter expression can refer to.

use chrono::{DateTime, Utc};

use crate::registry::Digest;

use super::value::{Type, Value};

/// A name bindable in filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Repository,
    Digest,
    ImageSize,
    Tags,
    CreatedAt,
    UploadedAt,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Repository,
        Field::Digest,
        Field::ImageSize,
        Field::Tags,
        Field::CreatedAt,
        Field::UploadedAt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Repository => "Repository",
            Field::Digest => "Digest",
            Field::ImageSize => "ImageSize",
            Field::Tags => "Tags",
            Field::CreatedAt => "CreatedAt",
            Field::UploadedAt => "UploadedAt",
        }
    }

    /// Static type used when checking expressions.
    pub fn ty(self) -> Type {
        match self {
            Field::Repository | Field::Digest => Type::String,
            Field::ImageSize => Type::Uint,
            Field::Tags => Type::Array(Box::new(Type::String)),
            Field::CreatedAt | Field::UploadedAt => Type::Time,
        }
    }

    /// Case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Comma-separated list of valid names for error hints.
    pub fn valid_names() -> String {
        Field::ALL.map(Field::name).join(", ")
    }
}

/// Attribute values of one digest, the input of a single evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
    pub repository: String,
    pub digest: String,
    pub image_size: u64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub uploaded_at: DateTime<Utc>,
}

impl Fields {
    pub fn from_digest(repository: &str, digest: &Digest) -> Self {
        Fields {
            repository: repository.to_string(),
            digest: digest.name.clone(),
            image_size: digest.image_size_bytes,
            tags: digest.tags.clone(),
            created_at: digest.created,
            uploaded_at: digest.uploaded,
        }
    }

    pub fn get(&self, field: Field) -> Value {
        match field {
            Field::Repository => Value::String(self.repository.clone()),
            Field::Digest => Value::String(self.digest.clone()),
            Field::ImageSize => Value::Uint(self.image_size),
            Field::Tags => Value::Array(self.tags.iter().cloned().map(Value::String).collect()),
            Field::CreatedAt => Value::Time(self.created_at),
            Field::UploadedAt => Value::Time(self.uploaded_at),
        }
    }
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
