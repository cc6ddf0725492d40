// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    or = { BinaryOp::Or, BinaryOp::And },
    and = { BinaryOp::And, BinaryOp::Eq },
    compare = { BinaryOp::Lt, BinaryOp::Add },
    add = { BinaryOp::Sub, BinaryOp::Mul },
    mul = { BinaryOp::Mod, BinaryOp::Pow },
)]
fn precedence_is_ordered(lower: BinaryOp, higher: BinaryOp) {
    assert!(lower.precedence() < higher.precedence());
}

#[parameterized(
    eq = { "==", BinaryOp::Eq },
    le = { "<=", BinaryOp::Le },
    pow = { "**", BinaryOp::Pow },
    or = { "||", BinaryOp::Or },
)]
fn from_symbol_roundtrips(symbol: &str, op: BinaryOp) {
    assert_eq!(BinaryOp::from_symbol(symbol), Some(op));
    assert_eq!(op.symbol(), symbol);
}

#[parameterized(
    and = { "and", BinaryOp::And },
    or = { "or", BinaryOp::Or },
    matches = { "matches", BinaryOp::Matches },
    starts_with = { "startsWith", BinaryOp::StartsWith },
)]
fn from_word_maps(word: &str, op: BinaryOp) {
    assert_eq!(BinaryOp::from_word(word), Some(op));
}

#[test]
fn unknown_words_are_not_operators() {
    assert_eq!(BinaryOp::from_word("Tags"), None);
    assert_eq!(BinaryOp::from_word("not"), None);
    assert_eq!(BinaryOp::from_symbol("!"), None);
}

#[test]
fn predicates_and_arithmetic() {
    assert!(BinaryOp::Matches.is_predicate());
    assert!(BinaryOp::Or.is_predicate());
    assert!(!BinaryOp::Add.is_predicate());
    assert!(BinaryOp::Pow.is_right_assoc());
    assert!(!BinaryOp::Sub.is_right_assoc());
}
