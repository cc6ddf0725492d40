// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn empty_body_is_null() {
    assert_eq!(decode_body("https://gcr.io", "").unwrap(), Value::Null);
    assert_eq!(decode_body("https://gcr.io", "  \n").unwrap(), Value::Null);
}

#[test]
fn json_body_is_decoded() {
    let value = decode_body("https://gcr.io", r#"{"errors": []}"#).unwrap();
    assert!(value["errors"].as_array().unwrap().is_empty());
}

#[test]
fn invalid_body_names_the_url() {
    let err = decode_body("https://gcr.io/v2/p/tags/list", "<html>").unwrap_err();
    assert!(err
        .to_string()
        .starts_with("while decoding response of https://gcr.io/v2/p/tags/list: "));
}

#[test]
fn debug_hides_secrets() {
    let basic = Auth::Basic {
        username: "_json_key".into(),
        password: "secret".into(),
    };
    assert!(!format!("{basic:?}").contains("secret"));
    assert!(!format!("{:?}", Auth::Bearer("token".into())).contains("token"));
}

#[test]
fn client_builds_without_network() {
    let auth = Auth::Bearer("t".into());
    assert!(ReqwestClient::new(auth.clone(), false).is_ok());
    assert!(ReqwestClient::new(auth, true).is_ok());
}
