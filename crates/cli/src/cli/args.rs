// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` so `list` and `delete`
//! accept the same registry, filter and output flags.

use std::path::PathBuf;

use clap::Args;

use crate::config::{Options, Output};

/// Registry, filter and output flags common to `list` and `delete`.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonArgs {
    /// Registry host including the parent repository, e.g. asia.gcr.io/my-project
    #[arg(long, short = 'H', env = "REGISTRY_HOST", value_name = "HOST")]
    pub host: Option<String>,

    /// Registry type, detected from the host when omitted
    #[arg(long = "type", short = 't', env = "REGISTRY_TYPE", value_name = "TYPE")]
    pub registry_type: Option<String>,

    /// Basic authentication user
    #[arg(long, short = 'u', env = "BASIC_AUTH_USER")]
    pub basic_auth_user: Option<String>,

    /// Basic authentication password
    #[arg(long, short = 'p', env = "BASIC_AUTH_PWD", hide_env_values = true)]
    pub basic_auth_pwd: Option<String>,

    /// Service account key file, takes precedence over other credentials
    #[arg(long, short = 'f', env = "SA_FILE", value_name = "PATH")]
    pub service_account: Option<PathBuf>,

    /// OAuth2 access token, e.g. from `gcloud auth print-access-token`
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, env = "ALLOW_INSECURE_SSL")]
    pub allow_insecure: bool,

    /// Only process images matching the expression (repeatable, OR'd)
    #[arg(long, short = 'i', value_name = "EXPR")]
    pub include_filter: Vec<String>,

    /// Drop images matching the expression (repeatable, OR'd)
    #[arg(long, short = 'e', value_name = "EXPR")]
    pub exclude_filter: Vec<String>,

    /// Number of concurrent deletion workers [default: 1]
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub worker_count: Option<i64>,

    /// Print the result as a table to stdout
    #[arg(long)]
    pub output_table: bool,

    /// Dump the result as JSON to a file
    #[arg(long, value_name = "PATH")]
    pub output_json: Option<PathBuf>,
}

impl CommonArgs {
    pub fn options(&self) -> Options {
        Options {
            host: self.host.clone(),
            registry_type: self.registry_type.clone(),
            username: self.basic_auth_user.clone(),
            password: self.basic_auth_pwd.clone(),
            service_account: self.service_account.clone(),
            access_token: self.access_token.clone(),
            allow_insecure: self.allow_insecure,
            include_filters: self.include_filter.clone(),
            exclude_filters: self.exclude_filter.clone(),
            worker_count: self.worker_count,
            output: Output {
                table: self.output_table,
                json: self.output_json.clone(),
            },
            ..Options::default()
        }
    }
}

/// Flags only meaningful for `delete`.
#[derive(Args, Clone, Debug, Default)]
pub struct DeleteArgs {
    /// Only log what would be deleted
    #[arg(long)]
    pub dry_run: bool,

    /// File of <repository>:<tag> lines whose digests are never deleted
    #[arg(long, value_name = "PATH")]
    pub skip_list: Option<PathBuf>,

    /// JSON file from `list --output-json` to delete instead of the catalog
    #[arg(long, value_name = "PATH")]
    pub repo_list: Option<PathBuf>,

    /// Log deletion errors and continue
    #[arg(long)]
    pub skip_error: bool,
}

impl DeleteArgs {
    pub fn apply(&self, options: Options) -> Options {
        Options {
            dry_run: self.dry_run,
            skip_list: self.skip_list.clone(),
            repo_list: self.repo_list.clone(),
            skip_error: self.skip_error,
            ..options
        }
    }
}
