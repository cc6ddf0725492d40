// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tokenizer for filter expressions.

use super::diagnostic::{Diagnostic, DiagnosticKind};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Tok {
    Int(i64),
    Float(f64),
    Str(String),
    /// Identifiers and word operators (`and`, `in`, `matches`, ...).
    Ident(String),
    /// Symbolic operators (`==`, `&&`, `+`, ...).
    Op(&'static str),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub tok: Tok,
    /// Byte offset of the first character.
    pub pos: usize,
}

/// Longest first, so `<=` wins over `<`.
const OPERATORS: [&str; 15] = [
    "==", "!=", "<=", ">=", "&&", "||", "**", "<", ">", "+", "-", "*", "/", "%", "!",
];

/// Split `source` into tokens, ending with [`Tok::Eof`].
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut tokens = Vec::new();
    let bytes = source.as_bytes();
    let mut pos = 0;

    while pos < source.len() {
        let rest = &source[pos..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        let start = pos;
        let tok = match c {
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '[' => Tok::LBracket,
            ']' => Tok::RBracket,
            ',' => Tok::Comma,
            '\'' | '"' => {
                let (value, len) = read_string(source, start, c)?;
                pos += len;
                tokens.push(Token {
                    tok: Tok::Str(value),
                    pos: start,
                });
                continue;
            }
            c if c.is_ascii_digit()
                || (c == '.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)) =>
            {
                let (tok, len) = read_number(source, start)?;
                pos += len;
                tokens.push(Token { tok, pos: start });
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let len = rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                pos += len;
                tokens.push(Token {
                    tok: Tok::Ident(rest[..len].to_string()),
                    pos: start,
                });
                continue;
            }
            _ => match OPERATORS.iter().copied().find(|op| rest.starts_with(op)) {
                Some(op) => {
                    pos += op.len();
                    tokens.push(Token {
                        tok: Tok::Op(op),
                        pos: start,
                    });
                    continue;
                }
                None => {
                    return Err(Diagnostic::at(
                        DiagnosticKind::Syntax,
                        format!("unrecognized character: U+{:04X} '{c}'", c as u32),
                        source,
                        start,
                    ));
                }
            },
        };
        pos += 1;
        tokens.push(Token { tok, pos: start });
    }

    tokens.push(Token {
        tok: Tok::Eof,
        pos: source.len(),
    });
    Ok(tokens)
}

/// Read a quoted string starting at `start`. Returns the unescaped value and
/// the consumed byte length including both quotes.
fn read_string(source: &str, start: usize, quote: char) -> Result<(String, usize), Diagnostic> {
    let body = &source[start + 1..];
    let mut value = String::new();
    let mut chars = body.char_indices();
    let syntax = |msg: &str, at: usize| {
        Diagnostic::at(DiagnosticKind::Syntax, msg.to_string(), source, at)
    };

    while let Some((i, c)) = chars.next() {
        if c == quote {
            return Ok((value, 1 + i + c.len_utf8()));
        }
        if c != '\\' {
            value.push(c);
            continue;
        }

        let escape_at = start + 1 + i;
        let Some((_, e)) = chars.next() else {
            break;
        };
        match e {
            'a' => value.push('\u{07}'),
            'b' => value.push('\u{08}'),
            'f' => value.push('\u{0C}'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'v' => value.push('\u{0B}'),
            '\\' | '\'' | '"' => value.push(e),
            'x' | 'u' => {
                let width = if e == 'x' { 2 } else { 4 };
                let mut code = 0u32;
                for _ in 0..width {
                    let digit = chars
                        .next()
                        .and_then(|(_, d)| d.to_digit(16))
                        .ok_or_else(|| syntax("invalid char escape", escape_at))?;
                    code = code * 16 + digit;
                }
                let ch = char::from_u32(code)
                    .ok_or_else(|| syntax("invalid char escape", escape_at))?;
                value.push(ch);
            }
            _ => return Err(syntax("invalid char escape", escape_at)),
        }
    }

    Err(syntax("literal not terminated", start))
}

/// Read an integer or float literal starting at `start`.
fn read_number(source: &str, start: usize) -> Result<(Tok, usize), Diagnostic> {
    let bytes = &source.as_bytes()[start..];
    let mut len = 0;
    let mut is_float = false;

    while len < bytes.len() && bytes[len].is_ascii_digit() {
        len += 1;
    }
    if len < bytes.len()
        && bytes[len] == b'.'
        && bytes.get(len + 1).is_some_and(u8::is_ascii_digit)
    {
        is_float = true;
        len += 1;
        while len < bytes.len() && bytes[len].is_ascii_digit() {
            len += 1;
        }
    }
    if len < bytes.len() && (bytes[len] == b'e' || bytes[len] == b'E') {
        let mut exp = len + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            is_float = true;
            len = exp;
            while len < bytes.len() && bytes[len].is_ascii_digit() {
                len += 1;
            }
        }
    }

    let text = &source[start..start + len];
    let invalid = || {
        Diagnostic::at(
            DiagnosticKind::Syntax,
            format!("invalid number literal: {text}"),
            source,
            start,
        )
    };
    let tok = if is_float {
        Tok::Float(text.parse().map_err(|_| invalid())?)
    } else {
        Tok::Int(text.parse().map_err(|_| invalid())?)
    };
    Ok((tok, len))
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
