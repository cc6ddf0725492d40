// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod delete;
pub mod list;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
