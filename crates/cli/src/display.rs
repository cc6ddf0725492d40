// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Table and JSON rendering of repository listings.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use cir_core::units::byte_count_iec;
use cir_core::Repository;

use crate::error::Result;

const HEADERS: [&str; 7] = [
    "#",
    "DIGEST",
    "REPO",
    "IMAGE_TAG",
    "SIZE",
    "DATE_CREATED",
    "DATE_UPLOADED",
];

/// Characters of the digest kept in the table (`sha256:` plus 20 hex digits).
const DIGEST_SLUG_LEN: usize = 27;

/// Joined tags longer than this are cut to [`DIGEST_SLUG_LEN`] characters.
const MAX_TAGS_LEN: usize = 30;

const ELLIPSIS: char = '…';

type Row = [String; 7];

/// Render one row per digest plus a footer with the total size.
///
/// ```text
/// +---+-----------------------------+-----------------+-----------+---------+---
/// | # | DIGEST                      | REPO            | IMAGE_TAG | SIZE    | ...
/// +---+-----------------------------+-----------------+-----------+---------+---
/// | 1 | sha256:3f2a9c1e0b7d4a5f6c8e…| gcr.io/proj/app | latest    | 1.0 KiB | ...
/// +---+-----------------------------+-----------------+-----------+---------+---
/// |   |                             |                 | TOTAL     | 1.0 KiB | ...
/// +---+-----------------------------+-----------------+-----------+---------+---
/// ```
pub fn render_table(repositories: &[Repository]) -> String {
    let mut rows: Vec<Row> = Vec::new();
    let mut total_size = 0u64;

    for repo in repositories {
        for digest in &repo.digests {
            total_size = total_size.saturating_add(digest.image_size_bytes);
            rows.push([
                (rows.len() + 1).to_string(),
                slug(&digest.name, DIGEST_SLUG_LEN),
                repo.name.clone(),
                slug(&digest.tags.join(","), MAX_TAGS_LEN),
                byte_count_iec(digest.image_size_bytes),
                format_time(&digest.created),
                format_time(&digest.uploaded),
            ]);
        }
    }

    let header: Row = HEADERS.map(String::from);
    let footer: Row = [
        String::new(),
        String::new(),
        String::new(),
        "TOTAL".to_string(),
        byte_count_iec(total_size),
        String::new(),
        String::new(),
    ];

    let mut widths = [0usize; 7];
    for row in std::iter::once(&header).chain(&rows).chain(std::iter::once(&footer)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = separator_line(&widths);
    let mut out = String::new();
    out.push_str(&separator);
    out.push_str(&row_line(&header, &widths));
    out.push_str(&separator);
    for row in &rows {
        out.push_str(&row_line(row, &widths));
    }
    out.push_str(&separator);
    out.push_str(&row_line(&footer, &widths));
    out.push_str(&separator);
    out
}

pub fn print_table(repositories: &[Repository]) {
    print!("{}", render_table(repositories));
}

/// Write `repositories` as JSON to `path`, readable by the owner only.
///
/// The file can be fed back through `delete --repo-list`.
pub fn dump_json(repositories: &[Repository], path: &Path) -> Result<()> {
    let data = serde_json::to_vec(repositories)?;
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(&data)?;
    Ok(())
}

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S +0000 UTC").to_string()
}

/// Cut `text` longer than `max` chars down to [`DIGEST_SLUG_LEN`] plus an ellipsis.
fn slug(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(DIGEST_SLUG_LEN).collect();
    cut.push(ELLIPSIS);
    cut
}

fn separator_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn row_line(row: &Row, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in row.iter().zip(widths) {
        let pad = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
