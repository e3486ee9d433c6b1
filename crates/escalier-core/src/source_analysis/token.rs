// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Escalier lexical analysis.
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the type of token
//! - A [`Span`] indicating its location in source
//! - An optional [`LexErrorKind`] when the token is malformed (for example an
//!   unterminated string); the parser turns these into diagnostics when the
//!   token is consumed

use ecow::EcoString;

use super::{LexErrorKind, Span};

/// How a template-literal chunk returned by `Lexer::lex_quasi` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuasiEnd {
    /// The chunk ended at `${`; an interpolated expression follows.
    Interpolation,
    /// The chunk ended at the closing backtick.
    Backtick,
    /// The buffer ended before the template was closed.
    Eof,
}

/// The kind of token, not including source location.
///
/// Tokens are cheap to clone (string payloads use [`EcoString`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    /// An identifier, NFC-normalized: `foo`, `_bar`, `$baz`
    Identifier(EcoString),
    /// A numeric literal as written: `42`, `3.14`, `.5`, `1_000`, `2e10`
    Number(EcoString),
    /// A double-quoted string with escapes processed
    String(EcoString),
    /// A regular-expression literal: pattern and flags
    Regex(EcoString, EcoString),
    /// A chunk of template-literal text (only from `Lexer::lex_quasi`)
    Quasi(EcoString, QuasiEnd),
    /// A run of JSX child text (only from `Lexer::lex_jsx_text`)
    JsxText(EcoString),

    // === Keywords ===
    Fn,
    Val,
    Var,
    Type,
    Class,
    Return,
    If,
    Else,
    Match,
    Try,
    Catch,
    Finally,
    Throw,
    Async,
    Await,
    Yield,
    Do,
    For,
    In,
    Declare,
    Export,
    True,
    False,
    Null,
    Undefined,
    Mut,
    Extends,

    // === Delimiters ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `` ` ``
    BackTick,

    // === Punctuation ===
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `...`
    DotDotDot,
    /// `?`
    Question,
    /// `?.`
    QuestionDot,
    /// `?(`
    QuestionParen,
    /// `?[`
    QuestionBracket,
    /// `??`
    QuestionQuestion,
    /// `->`
    Arrow,
    /// `=>`
    FatArrow,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    EqualEqual,
    BangEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    AmpAmp,
    PipePipe,
    Pipe,
    Amp,
    /// `</` (JSX closing tag)
    LessThanSlash,
    /// `/>` (JSX self-closing tag)
    SlashGreaterThan,

    // === Special ===
    /// End of file
    Eof,
    /// Invalid input (preserves the unparseable text for error recovery)
    Error(EcoString),
}

impl TokenKind {
    /// Maps an identifier to its reserved-word kind, if it is one.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "fn" => Self::Fn,
            "val" => Self::Val,
            "var" => Self::Var,
            "type" => Self::Type,
            "class" => Self::Class,
            "return" => Self::Return,
            "if" => Self::If,
            "else" => Self::Else,
            "match" => Self::Match,
            "try" => Self::Try,
            "catch" => Self::Catch,
            "finally" => Self::Finally,
            "throw" => Self::Throw,
            "async" => Self::Async,
            "await" => Self::Await,
            "yield" => Self::Yield,
            "do" => Self::Do,
            "for" => Self::For,
            "in" => Self::In,
            "declare" => Self::Declare,
            "export" => Self::Export,
            "true" => Self::True,
            "false" => Self::False,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            "mut" => Self::Mut,
            "extends" => Self::Extends,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` if this token syntactically ends an expression.
    ///
    /// A `/` after one of these is division; anywhere else it opens a
    /// regular-expression literal.
    #[must_use]
    pub const fn ends_expression(&self) -> bool {
        matches!(
            self,
            Self::Identifier(_)
                | Self::Number(_)
                | Self::String(_)
                | Self::Regex(..)
                | Self::True
                | Self::False
                | Self::Null
                | Self::Undefined
                | Self::RightParen
                | Self::RightBracket
                | Self::RightBrace
        )
    }

    /// Returns `true` for reserved words.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Fn
                | Self::Val
                | Self::Var
                | Self::Type
                | Self::Class
                | Self::Return
                | Self::If
                | Self::Else
                | Self::Match
                | Self::Try
                | Self::Catch
                | Self::Finally
                | Self::Throw
                | Self::Async
                | Self::Await
                | Self::Yield
                | Self::Do
                | Self::For
                | Self::In
                | Self::Declare
                | Self::Export
                | Self::True
                | Self::False
                | Self::Null
                | Self::Undefined
                | Self::Mut
                | Self::Extends
        )
    }

    /// Returns `true` if this is an identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this is an error token.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the name usable as a property key: identifiers and reserved
    /// words both qualify after `.`.
    #[must_use]
    pub fn property_name(&self) -> Option<EcoString> {
        match self {
            Self::Identifier(name) => Some(name.clone()),
            kind if kind.is_keyword() => Some(EcoString::from(kind.to_string())),
            _ => None,
        }
    }

    /// Describes the token for "expected X but got Y" diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Identifier(name) => format!("identifier '{name}'"),
            Self::Number(text) => format!("number '{text}'"),
            Self::String(_) => "string literal".to_string(),
            Self::Regex(..) => "regular expression".to_string(),
            Self::Quasi(..) => "template literal text".to_string(),
            Self::JsxText(_) => "JSX text".to_string(),
            Self::Eof => "end of file".to_string(),
            Self::Error(text) => format!("unexpected input '{text}'"),
            other => format!("'{other}'"),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Identifier(s) | Self::Number(s) | Self::JsxText(s) | Self::Error(s) => {
                return write!(f, "{s}");
            }
            Self::String(s) => return write!(f, "\"{s}\""),
            Self::Regex(pattern, flags) => return write!(f, "/{pattern}/{flags}"),
            Self::Quasi(s, _) => return write!(f, "{s}"),
            Self::Fn => "fn",
            Self::Val => "val",
            Self::Var => "var",
            Self::Type => "type",
            Self::Class => "class",
            Self::Return => "return",
            Self::If => "if",
            Self::Else => "else",
            Self::Match => "match",
            Self::Try => "try",
            Self::Catch => "catch",
            Self::Finally => "finally",
            Self::Throw => "throw",
            Self::Async => "async",
            Self::Await => "await",
            Self::Yield => "yield",
            Self::Do => "do",
            Self::For => "for",
            Self::In => "in",
            Self::Declare => "declare",
            Self::Export => "export",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Mut => "mut",
            Self::Extends => "extends",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::BackTick => "`",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::DotDotDot => "...",
            Self::Question => "?",
            Self::QuestionDot => "?.",
            Self::QuestionParen => "?(",
            Self::QuestionBracket => "?[",
            Self::QuestionQuestion => "??",
            Self::Arrow => "->",
            Self::FatArrow => "=>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Bang => "!",
            Self::Assign => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Pipe => "|",
            Self::Amp => "&",
            Self::LessThanSlash => "</",
            Self::SlashGreaterThan => "/>",
            Self::Eof => "<eof>",
        };
        f.write_str(text)
    }
}

/// A token with its source location.
///
/// Tokens are values: the lexer re-derives them from the buffer on every
/// call, so holding one never pins lexer state.
///
/// # Examples
///
/// ```
/// use escalier_core::source_analysis::{Span, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Identifier("foo".into()), Span::default());
/// assert!(token.kind().is_identifier());
/// assert!(token.error().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
    error: Option<LexErrorKind>,
}

impl Token {
    /// Creates a well-formed token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            error: None,
        }
    }

    /// Creates a token the lexer could only partially recognise.
    #[must_use]
    pub const fn malformed(kind: TokenKind, span: Span, error: LexErrorKind) -> Self {
        Self {
            kind,
            span,
            error: Some(error),
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Consumes the token and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the source span of this token.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the lexical problem with this token, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&LexErrorKind> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(TokenKind::keyword("fn"), Some(TokenKind::Fn));
        assert_eq!(TokenKind::keyword("val"), Some(TokenKind::Val));
        assert_eq!(TokenKind::keyword("undefined"), Some(TokenKind::Undefined));
        assert_eq!(TokenKind::keyword("get"), None);
        assert_eq!(TokenKind::keyword("keyof"), None);
    }

    #[test]
    fn expression_enders() {
        assert!(TokenKind::Identifier("x".into()).ends_expression());
        assert!(TokenKind::Number("1".into()).ends_expression());
        assert!(TokenKind::RightParen.ends_expression());
        assert!(TokenKind::RightBracket.ends_expression());
        assert!(TokenKind::RightBrace.ends_expression());
        assert!(!TokenKind::Return.ends_expression());
        assert!(!TokenKind::Assign.ends_expression());
        assert!(!TokenKind::LeftParen.ends_expression());
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::Identifier("foo".into()).to_string(), "foo");
        assert_eq!(TokenKind::String("hi".into()).to_string(), "\"hi\"");
        assert_eq!(
            TokenKind::Regex("a+".into(), "g".into()).to_string(),
            "/a+/g"
        );
        assert_eq!(TokenKind::QuestionDot.to_string(), "?.");
        assert_eq!(TokenKind::LessThanSlash.to_string(), "</");
        assert_eq!(TokenKind::Fn.to_string(), "fn");
    }

    #[test]
    fn token_kind_describe() {
        assert_eq!(TokenKind::RightParen.describe(), "')'");
        assert_eq!(TokenKind::Eof.describe(), "end of file");
        assert_eq!(
            TokenKind::Identifier("x".into()).describe(),
            "identifier 'x'"
        );
    }

    #[test]
    fn property_names_include_keywords() {
        assert_eq!(
            TokenKind::Identifier("len".into()).property_name(),
            Some("len".into())
        );
        assert_eq!(TokenKind::Type.property_name(), Some("type".into()));
        assert_eq!(TokenKind::Comma.property_name(), None);
    }

    #[test]
    fn malformed_token_carries_error() {
        let token = Token::malformed(
            TokenKind::String("abc".into()),
            Span::default(),
            LexErrorKind::UnterminatedString,
        );
        assert_eq!(token.error(), Some(&LexErrorKind::UnterminatedString));
        assert!(matches!(token.into_kind(), TokenKind::String(s) if s == "abc"));
    }
}
