// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Escalier source code.
//!
//! This module contains the lexer, the parser, and the shared source-location
//! types.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] produces [`Token`]s on demand. Each token carries its source
//! location via [`Span`]. Template-literal text and JSX text are lexed through
//! dedicated entry points ([`Lexer::lex_quasi`], [`Lexer::lex_jsx_text`]) that
//! the parser calls when it knows it is inside those constructs.
//!
//! ```
//! use escalier_core::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("x + 1");
//! assert_eq!(tokens.len(), 4); // x, +, 1, EOF
//! assert!(tokens[3].kind().is_eof());
//! ```
//!
//! # Parsing
//!
//! [`parse_script`], [`parse_module`], [`parse_type_ann`] and
//! [`parse_lib_files`] always return a tree together with the
//! [`Diagnostic`]s collected along the way. Malformed input produces
//! placeholder nodes, never a panic or an early exit; the only thing that
//! stops a parse short is its [`Deadline`].
//!
//! # Error Handling
//!
//! Lexical problems travel on tokens as [`LexErrorKind`] and become
//! diagnostics when the parser commits the token. Use [`LexError`] for
//! standalone miette reports.

mod deadline;
mod error;
mod lexer;
mod parser;
mod source;
mod span;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use deadline::{CancelHandle, Deadline};
pub use error::{LexError, LexErrorKind};
pub use lexer::{Lexer, LexerState, lex};
pub use parser::{
    Diagnostic, DiagnosticKind, MAX_NESTING_DEPTH, parse_lib_files, parse_module, parse_script,
    parse_type_ann,
};
pub use source::{Source, SourceId};
pub use span::{Location, Span};
pub use token::{QuasiEnd, Token, TokenKind};
