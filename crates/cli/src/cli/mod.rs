// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use crate::help;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub use args::{CommonArgs, DeleteArgs};

#[derive(Parser, Debug)]
#[command(name = "cir-rotator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "List and delete container registry images selected by filter expressions")]
#[command(
    long_about = "List and delete container registry images selected by filter expressions.\n\n\
    Images are matched with rules over Repository, Digest, ImageSize, Tags, CreatedAt and\n\
    UploadedAt, e.g. \"UploadedAt < Now() - Duration('90d') && !('latest' in Tags)\"."
)]
#[command(help_template = help::template())]
#[command(after_help = help::filters())]
#[command(styles = help::styles())]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long, global = true, env = "DEBUG_MODE")]
    pub debug: bool,

    /// TOML config file [default: $XDG_CONFIG_HOME/cir-rotator/config.toml]
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List images matching the filters
    #[command(after_help = help::examples("\
Examples:
  cir-rotator list -H asia.gcr.io/proj -f sa.json --output-table
  cir-rotator list -H gcr.io/proj --access-token \"$(gcloud auth print-access-token)\" \\
      -i \"ImageSize > SizeStr('500 MiB')\" --output-json big.json"))]
    List {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Delete images matching the filters
    #[command(after_help = help::examples("\
Examples:
  cir-rotator delete -H gcr.io/proj -f sa.json --dry-run \\
      -i \"UploadedAt < Now() - Duration('3M')\" -e \"'latest' in Tags\"
  cir-rotator delete -H gcr.io/proj -f sa.json --repo-list big.json --worker-count 4
  cir-rotator delete -H gcr.io/proj -f sa.json --skip-list protected.txt --skip-error"))]
    Delete {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        delete: DeleteArgs,
    },

    /// Generate shell completions
    #[command(after_help = help::examples("\
Examples:
  cir-rotator completion bash > ~/.local/share/bash-completion/completions/cir-rotator
  cir-rotator completion zsh > ~/.zfunc/_cir-rotator
  cir-rotator completion fish > ~/.config/fish/completions/cir-rotator.fish"))]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
