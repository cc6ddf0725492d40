// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parser for filter expressions.
//!
//! Precedence climbing over the token stream. Parses expressions like
//! `(Uploaded < Now() - Duration('30d')) && not (Tags contains 'prod')` into
//! an [`Expr`] tree.

use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::expr::{BinaryOp, Expr, ExprKind, UnaryOp};
use super::lexer::{tokenize, Tok, Token};

/// Deepest nesting accepted before the parser gives up.
pub const MAX_DEPTH: usize = 128;

/// An expression paired with the height of its tree.
type Parsed = (Expr, usize);

const NOT_PRECEDENCE: u8 = 50;
const SIGN_PRECEDENCE: u8 = 90;

/// Parse `source` into a single expression.
pub(crate) fn parse(source: &str) -> Result<Expr, Diagnostic> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        source,
        tokens,
        cursor: 0,
        depth: 0,
    };
    let (expr, _) = parser.expression(0)?;
    let next = parser.peek();
    if next.tok != Tok::Eof {
        return Err(parser.unexpected(next.clone()));
    }
    Ok(expr)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.cursor.min(last)]
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + ahead)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>, pos: usize) -> Diagnostic {
        Diagnostic::at(DiagnosticKind::Syntax, message, self.source, pos)
    }

    fn unexpected(&self, token: Token) -> Diagnostic {
        match token.tok {
            Tok::Eof => self.error("unexpected end of expression", token.pos),
            tok => self.error(format!("unexpected token {}", describe(&tok)), token.pos),
        }
    }

    fn expect(&mut self, expected: Tok) -> Result<Token, Diagnostic> {
        let token = self.advance();
        if token.tok == expected {
            Ok(token)
        } else {
            Err(self.unexpected(token))
        }
    }

    /// Binary operator at the cursor and how many tokens it spans.
    fn binary_op(&self) -> Option<(BinaryOp, usize)> {
        match &self.peek().tok {
            Tok::Op(symbol) => BinaryOp::from_symbol(symbol).map(|op| (op, 1)),
            Tok::Ident(word) if word == "not" => match self.peek_at(1).map(|t| &t.tok) {
                Some(Tok::Ident(next)) if next == "in" => Some((BinaryOp::NotIn, 2)),
                _ => None,
            },
            Tok::Ident(word) => BinaryOp::from_word(word).map(|op| (op, 1)),
            _ => None,
        }
    }

    /// Wrap `kind` in a node, rejecting trees taller than [`MAX_DEPTH`].
    fn node(&self, kind: ExprKind, pos: usize, height: usize) -> Result<Parsed, Diagnostic> {
        if height > MAX_DEPTH {
            return Err(self.error("expression nested too deeply", pos));
        }
        Ok((Expr { kind, pos }, height))
    }

    fn binary(
        &self,
        op: BinaryOp,
        lhs: Parsed,
        rhs: Parsed,
        pos: usize,
    ) -> Result<Parsed, Diagnostic> {
        let height = lhs.1.max(rhs.1) + 1;
        let kind = ExprKind::Binary {
            op,
            lhs: Box::new(lhs.0),
            rhs: Box::new(rhs.0),
        };
        self.node(kind, pos, height)
    }

    fn expression(&mut self, min_precedence: u8) -> Result<Parsed, Diagnostic> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let pos = self.peek().pos;
            return Err(self.error("expression nested too deeply", pos));
        }

        let mut lhs = self.unary()?;
        while let Some((op, span)) = self.binary_op() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            if matches!(op, BinaryOp::Or | BinaryOp::And) {
                lhs = self.logical_chain(op, lhs)?;
                continue;
            }
            let pos = self.peek().pos;
            self.cursor += span;
            let next_min = if op.is_right_assoc() {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.expression(next_min)?;
            lhs = self.binary(op, lhs, rhs, pos)?;
        }

        self.depth -= 1;
        Ok(lhs)
    }

    /// A run of the same logical operator, folded into a balanced tree.
    ///
    /// Operands keep their left to right order, so short-circuiting visits
    /// them exactly as a left-nested chain would.
    fn logical_chain(&mut self, op: BinaryOp, first: Parsed) -> Result<Parsed, Diagnostic> {
        let mut operands = vec![first];
        let mut positions = Vec::new();
        while let Some((next, span)) = self.binary_op() {
            if next != op {
                break;
            }
            positions.push(self.peek().pos);
            self.cursor += span;
            operands.push(self.expression(op.precedence() + 1)?);
        }
        self.balance(op, operands, positions)
    }

    /// `positions[i]` is the operator between `operands[i]` and `operands[i + 1]`.
    fn balance(
        &self,
        op: BinaryOp,
        mut operands: Vec<Parsed>,
        mut positions: Vec<usize>,
    ) -> Result<Parsed, Diagnostic> {
        if operands.len() <= 1 {
            return operands
                .pop()
                .ok_or_else(|| self.error("unexpected end of expression", self.peek().pos));
        }
        let mid = operands.len() / 2;
        let right = operands.split_off(mid);
        let right_positions = positions.split_off(mid);
        let pos = positions.pop().unwrap_or_default();
        let lhs = self.balance(op, operands, positions)?;
        let rhs = self.balance(op, right, right_positions)?;
        self.binary(op, lhs, rhs, pos)
    }

    fn unary(&mut self) -> Result<Parsed, Diagnostic> {
        let token = self.peek().clone();
        let prefix = match &token.tok {
            Tok::Op("!") => Some((UnaryOp::Not, NOT_PRECEDENCE)),
            Tok::Ident(word) if word == "not" => Some((UnaryOp::Not, NOT_PRECEDENCE)),
            Tok::Op("-") => Some((UnaryOp::Neg, SIGN_PRECEDENCE)),
            Tok::Op("+") => Some((UnaryOp::Plus, SIGN_PRECEDENCE)),
            _ => None,
        };

        match prefix {
            Some((op, precedence)) => {
                self.advance();
                let (operand, height) = self.expression(precedence)?;
                let kind = ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                };
                self.node(kind, token.pos, height + 1)
            }
            None => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Parsed, Diagnostic> {
        let mut expr = self.primary()?;
        while self.peek().tok == Tok::LBracket {
            let open = self.advance();
            let (index, index_height) = self.expression(0)?;
            self.expect(Tok::RBracket)?;
            let height = expr.1.max(index_height) + 1;
            let kind = ExprKind::Index {
                target: Box::new(expr.0),
                index: Box::new(index),
            };
            expr = self.node(kind, open.pos, height)?;
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Parsed, Diagnostic> {
        let token = self.advance();
        let pos = token.pos;
        let mut height = 1;
        let kind = match token.tok {
            Tok::Int(v) => ExprKind::Int(v),
            Tok::Float(v) => ExprKind::Float(v),
            Tok::Str(s) => ExprKind::Str(s),
            Tok::LParen => {
                let inner = self.expression(0)?;
                self.expect(Tok::RParen)?;
                return Ok(inner);
            }
            Tok::LBracket => {
                let (items, inner) = self.list(Tok::RBracket)?;
                height += inner;
                ExprKind::Array(items)
            }
            Tok::Ident(name) if name == "true" => ExprKind::Bool(true),
            Tok::Ident(name) if name == "false" => ExprKind::Bool(false),
            Tok::Ident(name) if is_reserved(&name) => {
                return Err(self.unexpected(Token {
                    tok: Tok::Ident(name),
                    pos,
                }));
            }
            Tok::Ident(name) if self.peek().tok == Tok::LParen => {
                self.advance();
                let (args, inner) = self.list(Tok::RParen)?;
                height += inner;
                ExprKind::Call { name, args }
            }
            Tok::Ident(name) => ExprKind::Ident(name),
            tok => return Err(self.unexpected(Token { tok, pos })),
        };
        self.node(kind, pos, height)
    }

    /// Comma separated expressions up to `close` and the tallest of them; a
    /// trailing comma is allowed.
    fn list(&mut self, close: Tok) -> Result<(Vec<Expr>, usize), Diagnostic> {
        let mut items = Vec::new();
        let mut height = 0;
        loop {
            if self.peek().tok == close {
                self.advance();
                return Ok((items, height));
            }
            let (item, item_height) = self.expression(0)?;
            items.push(item);
            height = height.max(item_height);
            let token = self.advance();
            if token.tok == close {
                return Ok((items, height));
            }
            if token.tok != Tok::Comma {
                return Err(self.unexpected(token));
            }
        }
    }
}

fn is_reserved(word: &str) -> bool {
    word == "not" || BinaryOp::from_word(word).is_some()
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Int(v) => v.to_string(),
        Tok::Float(v) => v.to_string(),
        Tok::Str(s) => format!("{s:?}"),
        Tok::Ident(name) => name.clone(),
        Tok::Op(op) => (*op).to_string(),
        Tok::LParen => "(".to_string(),
        Tok::RParen => ")".to_string(),
        Tok::LBracket => "[".to_string(),
        Tok::RBracket => "]".to_string(),
        Tok::Comma => ",".to_string(),
        Tok::Eof => "end of expression".to_string(),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
