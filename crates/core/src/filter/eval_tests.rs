// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::filter::compile::compile;
use crate::filter::functions::{Functions, SizeCache};
use chrono::{TimeZone, Utc};

fn eval(source: &str, fields: &Fields) -> Result<bool, Diagnostic> {
    let program = compile(source, &Functions::builtin()).unwrap();
    let sizes = SizeCache::new();
    let ctx = CallContext {
        now: Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap(),
        sizes: &sizes,
    };
    program.evaluate(fields, &ctx)
}

#[test]
fn dynamic_regex_compiles_at_evaluation() {
    let fields = Fields {
        repository: "gcr.io/p/app".into(),
        digest: "^gcr".into(),
        ..Fields::default()
    };
    assert!(eval("Repository matches Digest", &fields).unwrap());
}

#[test]
fn dynamic_regex_error_is_located() {
    let fields = Fields {
        digest: "(unclosed".into(),
        ..Fields::default()
    };
    let err = eval("Repository matches Digest", &fields).unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::Regex);
    assert_eq!(err.column(), 12);
}

#[test]
fn mixed_array_elements_resolve_at_evaluation() {
    let fields = Fields {
        image_size: 50,
        ..Fields::default()
    };
    assert!(eval("ImageSize in ['x', 50]", &fields).unwrap());
    assert!(!eval("ImageSize in ['x', 51]", &fields).unwrap());
}

#[test]
fn any_typed_operand_mismatch_fails_at_evaluation() {
    let err = eval("[1, 'x'][1] > 2", &Fields::default()).unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::Type);
    assert_eq!(
        err.message(),
        "invalid operation: > (mismatched types string and int)"
    );
    assert_eq!(err.column(), 13);
}

#[test]
fn any_typed_root_must_be_bool() {
    let err = eval("[true, 1][1]", &Fields::default()).unwrap_err();
    assert_eq!(err.message(), "expected bool, but got int");
}

#[test]
fn helper_argument_error_is_type_error() {
    let err = eval("len([1, 'x'][0]) > 0", &Fields::default()).unwrap_err();
    assert_eq!(err.kind(), DiagnosticKind::Type);
    assert_eq!(err.message(), "invalid argument for len (type int)");
}

#[test]
fn now_comes_from_context() {
    let fields = Fields {
        created_at: Utc.with_ymd_and_hms(2021, 2, 28, 0, 0, 0).unwrap(),
        ..Fields::default()
    };
    assert!(eval("Now() - CreatedAt == Duration('1d')", &fields).unwrap());
}
