// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cirrs - list and delete container registry images selected by filters.
//!
//! This crate provides the application behind the `cir-rotator` CLI. The
//! filter language itself lives in `cir-core`; this crate adds:
//!
//! - [`config`] - flags and TOML file merged into a validated [`Config`]
//! - [`http`] - blocking JSON client with basic or bearer auth
//! - [`registry`] - the [`ImageRegistry`](registry::ImageRegistry) trait and the GCR backend
//! - `list` / `delete` commands with table and JSON output
//!
//! ```rust,ignore
//! use cirrs::config::{Config, Options};
//!
//! let config = Config::init(Options {
//!     host: Some("asia.gcr.io/my-project".into()),
//!     access_token: Some(token),
//!     include_filters: vec!["UploadedAt < Now() - Duration('90d')".into()],
//!     ..Options::default()
//! })?;
//! let repositories = cirrs::list_repositories(&config)?;
//! ```

mod cli;
mod commands;
mod display;
pub mod help;

pub mod config;
pub mod error;
pub mod http;
pub mod registry;

pub use cli::{Cli, Command, CommonArgs, DeleteArgs};
pub use commands::delete::{delete_repositories, DeleteOptions};
pub use commands::list::list_repositories;
pub use config::Config;
pub use display::{dump_json, render_table};
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

use config::FileConfig;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::List { common } => {
            let options = common.options();
            if options.output.is_empty() {
                return Err(Error::MissingOutput);
            }
            let file = FileConfig::discover(cli.config.as_deref())?;
            let config = Config::init(options.with_file(file))?;
            commands::list::run(&config)?;
            Ok(())
        }
        Command::Delete { common, delete } => {
            let file = FileConfig::discover(cli.config.as_deref())?;
            let options = delete.apply(common.options()).with_file(file);
            let config = Config::init(options)?;
            commands::delete::run(&config)
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "cir-rotator", &mut std::io::stdout());
            Ok(())
        }
    }
}
