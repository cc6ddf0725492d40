// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

const ENV_VARS: [&str; 9] = [
    "REGISTRY_HOST",
    "REGISTRY_TYPE",
    "BASIC_AUTH_USER",
    "BASIC_AUTH_PWD",
    "SA_FILE",
    "ACCESS_TOKEN",
    "ALLOW_INSECURE_SSL",
    "DEBUG_MODE",
    "RUST_LOG",
];

/// The binary with a clean environment rooted in `home`.
pub fn cir(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("cir-rotator");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("NO_COLOR", "1")
        .current_dir(home.path());
    cmd
}

/// Registry flags with basic auth so no credential lookup happens.
pub const REGISTRY: [&str; 6] = ["-H", "asia.gcr.io/proj", "-u", "user", "-p", "pass"];

pub const REPO_LIST: &str = r#"[
  {
    "repository": "asia.gcr.io/proj/app",
    "digests": [
      {
        "digest": "sha256:3f2a9c1e0b7d4a5f6c8e9d0a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e",
        "size": 1048576,
        "tags": ["latest", "v1"],
        "created": "2021-01-01T00:00:00Z",
        "Uploaded": "2021-01-02T00:00:00Z"
      },
      {
        "digest": "sha256:0000000000000000000000000000000000000000000000000000000000000001",
        "size": 2048,
        "tags": null,
        "created": "2021-01-01T00:00:00Z",
        "Uploaded": "2021-01-02T00:00:00Z"
      }
    ]
  },
  {
    "repository": "asia.gcr.io/proj/tool",
    "digests": [
      {
        "digest": "sha256:0000000000000000000000000000000000000000000000000000000000000002",
        "size": 10,
        "tags": ["stable"],
        "created": "2021-01-01T00:00:00Z",
        "Uploaded": "2021-01-02T00:00:00Z"
      }
    ]
  }
]"#;

/// Write `content` under `home` and return its path as a string.
pub fn write_file(home: &TempDir, name: &str, content: &str) -> String {
    let path = home.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}
