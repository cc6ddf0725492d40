// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Evaluation of compiled filters against one digest.

use crate::error::Error;

use super::compile::{Node, NodeKind, Program};
use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::expr::BinaryOp;
use super::fields::Fields;
use super::functions::CallContext;
use super::ops::{self, Fault};
use super::value::Value;

impl Program {
    /// Evaluate against `fields`. `ctx` supplies `Now()` and the size cache.
    pub(crate) fn evaluate(&self, fields: &Fields, ctx: &CallContext<'_>) -> Result<bool, Diagnostic> {
        let evaluator = Evaluator {
            source: &self.source,
            fields,
            ctx,
        };
        match evaluator.eval(&self.root)? {
            Value::Bool(b) => Ok(b),
            other => Err(evaluator.error(
                DiagnosticKind::Type,
                format!("expected bool, but got {}", other.kind().name()),
                self.root.pos,
            )),
        }
    }
}

struct Evaluator<'a> {
    source: &'a str,
    fields: &'a Fields,
    ctx: &'a CallContext<'a>,
}

impl Evaluator<'_> {
    fn error(&self, kind: DiagnosticKind, message: impl Into<String>, pos: usize) -> Diagnostic {
        Diagnostic::at(kind, message, self.source, pos)
    }

    fn locate(&self, pos: usize) -> impl Fn(Fault) -> Diagnostic + '_ {
        move |fault| self.error(fault.kind, fault.message, pos)
    }

    fn eval(&self, node: &Node) -> Result<Value, Diagnostic> {
        match &node.kind {
            NodeKind::Literal(value) => Ok(value.clone()),
            NodeKind::Array(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            NodeKind::Field(field) => Ok(self.fields.get(*field)),
            NodeKind::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                (function.call)(self.ctx, &args).map_err(|err| {
                    let kind = match err {
                        Error::InvalidArgument { .. } => DiagnosticKind::Type,
                        _ => DiagnosticKind::Literal,
                    };
                    self.error(kind, err.to_string(), node.pos)
                })
            }
            NodeKind::Index { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                ops::apply_index(&target, &index).map_err(self.locate(node.pos))
            }
            NodeKind::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                ops::apply_unary(*op, &operand).map_err(self.locate(node.pos))
            }
            NodeKind::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                if let (BinaryOp::And, Value::Bool(false)) | (BinaryOp::Or, Value::Bool(true)) =
                    (op, &lhs)
                {
                    return Ok(lhs);
                }
                let rhs = self.eval(rhs)?;
                ops::apply(*op, &lhs, &rhs).map_err(self.locate(node.pos))
            }
            NodeKind::Matches { text, pattern } => match self.eval(text)? {
                Value::String(text) => Ok(Value::Bool(pattern.is_match(&text))),
                other => Err(self.locate(node.pos)(Fault::mismatch(
                    BinaryOp::Matches.symbol(),
                    other.kind().name(),
                    "string",
                ))),
            },
        }
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
