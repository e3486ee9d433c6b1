// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical error types.
//!
//! The lexer never fails; malformed tokens carry a [`LexErrorKind`] and the
//! parser converts it into a [`Diagnostic`](super::Diagnostic) when the
//! token is committed. [`LexError`] integrates with [`miette`] for tools
//! that report lexer problems on their own.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// A lexical error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub const fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// A string literal ran to the end of the buffer.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A template literal ran to the end of the buffer.
    #[error("unterminated template literal")]
    UnterminatedTemplate,

    /// A regular-expression literal ran to the end of its line.
    #[error("unterminated regular expression literal")]
    UnterminatedRegex,

    /// A block comment ran to the end of the buffer.
    #[error("unterminated block comment")]
    UnterminatedComment,

    /// An unknown escape sequence in a string.
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// A numeric literal that cannot be parsed.
    #[error("invalid number literal")]
    InvalidNumber,
}

impl LexErrorKind {
    /// Returns `true` for errors about constructs cut short by end of input.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Self::UnterminatedString
                | Self::UnterminatedTemplate
                | Self::UnterminatedRegex
                | Self::UnterminatedComment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = LexError::new(LexErrorKind::UnexpectedCharacter('§'), Span::default());
        assert_eq!(err.to_string(), "unexpected character '§'");

        let err = LexError::new(LexErrorKind::InvalidEscape('q'), Span::default());
        assert_eq!(err.to_string(), "invalid escape sequence '\\q'");
    }

    #[test]
    fn incomplete_kinds() {
        assert!(LexErrorKind::UnterminatedString.is_incomplete());
        assert!(LexErrorKind::UnterminatedComment.is_incomplete());
        assert!(!LexErrorKind::InvalidNumber.is_incomplete());
        assert!(!LexErrorKind::UnexpectedCharacter('#').is_incomplete());
    }
}
