// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Escalier compiler front end.
//!
//! This crate contains the parsing half of the Escalier compiler:
//! - Lexical analysis (tokenization, including template and JSX text)
//! - Parsing (AST construction with error recovery)
//! - AST traversal (pre-order walking and free-name collection)
//!
//! The parser is designed for editor use: every entry point returns a tree
//! plus diagnostics, tolerates any input, and honors a caller deadline.

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod ast_walker;
pub mod source_analysis;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Decl, Expr, Module, Pat, Script, Stmt, TypeAnn};
    pub use crate::source_analysis::{
        Deadline, Diagnostic, DiagnosticKind, Source, SourceId, Span, parse_module, parse_script,
    };
}
