// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Name resolution and static typing.
//!
//! Turns the parse tree into a typed [`Node`] tree bound to the field schema
//! and a [`Functions`] table. Everything that can be rejected without an
//! image at hand is rejected here.

use regex::Regex;

use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::expr::{BinaryOp, Expr, ExprKind, UnaryOp};
use super::fields::Field;
use super::functions::{Function, Functions};
use super::ops;
use super::parser::parse;
use super::value::{Type, Value};

/// A compiled filter expression.
///
/// Holds no per-evaluation state, so one program can be evaluated from many
/// threads at once.
#[derive(Debug)]
pub struct Program {
    pub(crate) root: Node,
    pub(crate) source: String,
}

impl Program {
    /// The expression text the program was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub ty: Type,
    pub pos: usize,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Literal(Value),
    Array(Vec<Node>),
    Field(Field),
    Call {
        function: Function,
        args: Vec<Node>,
    },
    Index {
        target: Box<Node>,
        index: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    /// `matches` against a literal pattern, compiled once.
    Matches {
        text: Box<Node>,
        pattern: Regex,
    },
}

/// Parse and check `source`; the result must be a bool.
pub(crate) fn compile(source: &str, functions: &Functions) -> Result<Program, Diagnostic> {
    let expr = parse(source)?;
    let checker = Checker { source, functions };
    let root = checker.check(expr)?;
    if !root.ty.accepts(&Type::Bool) {
        return Err(Diagnostic::at(
            DiagnosticKind::Type,
            format!("expected bool, but got {}", root.ty),
            source,
            root.pos,
        ));
    }
    Ok(Program {
        root,
        source: source.to_string(),
    })
}

struct Checker<'a> {
    source: &'a str,
    functions: &'a Functions,
}

impl Checker<'_> {
    fn error(&self, kind: DiagnosticKind, message: impl Into<String>, pos: usize) -> Diagnostic {
        Diagnostic::at(kind, message, self.source, pos)
    }

    fn check(&self, expr: Expr) -> Result<Node, Diagnostic> {
        let pos = expr.pos;
        let (kind, ty) = match expr.kind {
            ExprKind::Bool(b) => (NodeKind::Literal(Value::Bool(b)), Type::Bool),
            ExprKind::Int(v) => (NodeKind::Literal(Value::Int(v)), Type::Int),
            ExprKind::Float(v) => (NodeKind::Literal(Value::Float(v)), Type::Float),
            ExprKind::Str(s) => (NodeKind::Literal(Value::String(s)), Type::String),
            ExprKind::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|item| self.check(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let ty = Type::Array(Box::new(element_type(&items)));
                (NodeKind::Array(items), ty)
            }
            ExprKind::Ident(name) => {
                let field = Field::from_name(&name).ok_or_else(|| {
                    self.error(
                        DiagnosticKind::UnknownName,
                        format!("unknown name {name}"),
                        pos,
                    )
                })?;
                (NodeKind::Field(field), field.ty())
            }
            ExprKind::Call { name, args } => self.check_call(&name, args, pos)?,
            ExprKind::Index { target, index } => {
                let target = self.check(*target)?;
                let index = self.check(*index)?;
                let ty = ops::index_type(&target.ty, &index.ty)
                    .map_err(|msg| self.error(DiagnosticKind::Type, msg, pos))?;
                (
                    NodeKind::Index {
                        target: Box::new(target),
                        index: Box::new(index),
                    },
                    ty,
                )
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.check(*operand)?;
                let ty = ops::unary_type(op, &operand.ty)
                    .map_err(|msg| self.error(DiagnosticKind::Type, msg, pos))?;
                (
                    NodeKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    ty,
                )
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.check(*lhs)?;
                let rhs = self.check(*rhs)?;
                let ty = ops::binary_type(op, &lhs.ty, &rhs.ty)
                    .map_err(|msg| self.error(DiagnosticKind::Type, msg, pos))?;
                (self.binary_node(op, lhs, rhs)?, ty)
            }
        };
        Ok(Node { kind, ty, pos })
    }

    fn check_call(
        &self,
        name: &str,
        args: Vec<Expr>,
        pos: usize,
    ) -> Result<(NodeKind, Type), Diagnostic> {
        let Some(function) = self.functions.get(name) else {
            return Err(self.error(
                DiagnosticKind::UnknownName,
                format!("unknown func {name}"),
                pos,
            ));
        };
        if args.len() < function.params.len() {
            return Err(self.error(
                DiagnosticKind::Type,
                format!("not enough arguments to call {name}"),
                pos,
            ));
        }
        if args.len() > function.params.len() {
            return Err(self.error(
                DiagnosticKind::Type,
                format!("too many arguments to call {name}"),
                pos,
            ));
        }

        let mut checked = Vec::with_capacity(args.len());
        for (arg, param) in args.into_iter().zip(&function.params) {
            let arg = self.check(arg)?;
            if !param.accepts(&arg.ty) {
                return Err(self.error(
                    DiagnosticKind::Type,
                    format!(
                        "cannot use {} as argument (type {param}) to call {name}",
                        arg.ty
                    ),
                    arg.pos,
                ));
            }
            checked.push(arg);
        }

        let returns = function.returns.clone();
        Ok((
            NodeKind::Call {
                function: function.clone(),
                args: checked,
            },
            returns,
        ))
    }

    fn binary_node(&self, op: BinaryOp, lhs: Node, rhs: Node) -> Result<NodeKind, Diagnostic> {
        if op == BinaryOp::Matches {
            if let NodeKind::Literal(Value::String(pattern)) = &rhs.kind {
                let pattern = ops::compile_regex(pattern)
                    .map_err(|fault| self.error(fault.kind, fault.message, rhs.pos))?;
                return Ok(NodeKind::Matches {
                    text: Box::new(lhs),
                    pattern,
                });
            }
        }
        Ok(NodeKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }
}

/// Common element type of an array literal, `Any` when mixed or empty.
fn element_type(items: &[Node]) -> Type {
    let mut iter = items.iter().map(|n| &n.ty);
    match iter.next() {
        Some(first) if iter.all(|ty| ty == first) => first.clone(),
        _ => Type::Any,
    }
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
