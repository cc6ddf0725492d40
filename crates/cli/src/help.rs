// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.
//!
//! Colors follow the terminal: `NO_COLOR=1` disables them and `COLOR=1`
//! forces them when stdout is not a TTY.

use std::io::IsTerminal;

use anstyle::{Ansi256Color, Color, Style};
use clap::builder::styling::Styles;

/// Section headers: steel blue.
const HEADER: u8 = 74;
/// Commands and literals: light grey.
const LITERAL: u8 = 250;
/// Placeholders and context: medium grey.
const CONTEXT: u8 = 245;

fn fg(code: u8) -> Style {
    Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))))
}

pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn paint(style: Style, text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }
    format!("{}{}{}", style.render(), text, style.render_reset())
}

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(fg(HEADER))
        .usage(fg(HEADER))
        .literal(fg(LITERAL))
        .placeholder(fg(CONTEXT))
        .valid(fg(CONTEXT))
}

/// Main help template with a colorized Commands header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{}
{{subcommands}}

{}
{{options}}{{after-help}}",
        paint(fg(HEADER), "Commands:"),
        paint(fg(HEADER), "Options:"),
    )
}

/// Filter language reference shown after the main help.
pub fn filters() -> String {
    examples(
        "\
Filter Expressions (-i/--include-filter, -e/--exclude-filter):
  Fields: Repository, Digest, ImageSize, Tags, CreatedAt, UploadedAt
  Helpers: Date('2024-01-31'), Duration('1d12h'), Now(), SizeStr('1.5 GiB'), len(Tags)
  Operators: || && ! == != < <= > >= + - * / % ** in, not in, matches, contains, startsWith, endsWith
  Units: s m h d (24h) M (30d) Y (12M); B KiB MiB GiB TiB PiB EiB",
    )
}

/// Colorize an examples help block.
///
/// Lines ending with `:` become headers, `Label: value` lines get a
/// literal-colored value and command lines are colored as literals.
pub fn examples(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + 256);
    for line in text.lines() {
        if !result.is_empty() {
            result.push('\n');
        }

        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if trimmed.ends_with(':') && !trimmed.contains("  ") {
            result.push_str(indent);
            result.push_str(&paint(fg(HEADER), trimmed));
        } else if trimmed.starts_with("cir-rotator") {
            result.push_str(indent);
            result.push_str(&paint(fg(LITERAL), trimmed));
        } else if let Some(colon) = trimmed.find(": ") {
            result.push_str(indent);
            result.push_str(&trimmed[..=colon]);
            result.push(' ');
            result.push_str(&paint(fg(LITERAL), &trimmed[colon + 2..]));
        } else {
            result.push_str(line);
        }
    }
    result
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
