// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Located error messages for filter expressions.
//!
//! Rendered as the message, the 1-based `(line:column)`, and a snippet of the
//! offending source line with a caret under the column:
//!
//! ```text
//! unknown name whoami (1:2)
//!  | (whoami)
//!  | .^
//! ```

use std::fmt;

/// What went wrong, for callers that need more than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Malformed expression text.
    Syntax,
    /// Identifier or function that is not part of the vocabulary.
    UnknownName,
    /// Operands or arguments of unsupported types.
    Type,
    /// Invalid regular expression.
    Regex,
    /// A helper could not parse its date, duration or size literal.
    Literal,
    /// Arithmetic or indexing failure while evaluating.
    Runtime,
}

/// An error message bound to a position in the combined filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    line: usize,
    column: usize,
    snippet: String,
}

impl Diagnostic {
    /// Bind `message` to the byte `offset` in `source`.
    pub(crate) fn at(
        kind: DiagnosticKind,
        message: impl Into<String>,
        source: &str,
        offset: usize,
    ) -> Self {
        let mut line = 1;
        let mut column = 0;
        for (i, c) in source.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }

        let snippet = source
            .split('\n')
            .nth(line - 1)
            .map(|text| render_snippet(text, column))
            .unwrap_or_default();

        Diagnostic {
            kind,
            message: message.into(),
            line,
            column,
            snippet,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// The bare message without position or snippet.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column, counted in characters.
    pub fn column(&self) -> usize {
        self.column + 1
    }
}

/// The source line, plus a caret line when every character before the caret
/// is single-byte (so the dots line up).
fn render_snippet(text: &str, column: usize) -> String {
    let text = text.replace('\t', " ");
    let mut out = format!("\n | {text}");

    let mut chars = text.chars();
    let mut indicator = String::from("\n | ");
    for _ in 0..column {
        match chars.next() {
            Some(c) if c.len_utf8() > 1 => return out,
            Some(_) => indicator.push('.'),
            None => break,
        }
    }
    if chars.next().is_some_and(|c| c.len_utf8() > 1) {
        return out;
    }
    indicator.push('^');
    out.push_str(&indicator);
    out
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.snippet.is_empty() {
            return f.write_str(&self.message);
        }
        write!(
            f,
            "{} ({}:{}){}",
            self.message,
            self.line,
            self.column + 1,
            self.snippet
        )
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
#[path = "diagnostic_tests.rs"]
mod tests;
