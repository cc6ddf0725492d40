// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cir-core: filtering engine and catalog model for cir-rotator
//!
//! This crate provides the filter expression engine, the unit literal parsers
//! it relies on, and the repository filtering pass used by the cir-rotator
//! CLI when listing and deleting container images.

pub mod error;
pub mod filter;
pub mod pass;
pub mod registry;
pub mod units;

pub use error::{Error, Result};
pub use filter::{Diagnostic, DiagnosticKind, Engine, Field, Fields, FilterEngine, Functions};
pub use pass::{apply_skip_list, filter_repositories};
pub use registry::{Digest, Repository};
