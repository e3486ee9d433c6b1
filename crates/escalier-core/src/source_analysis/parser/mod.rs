// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Escalier source code.
//!
//! The parser pulls tokens from a [`Lexer`] on demand and builds an AST. It is
//! designed for editor use as much as for batch compilation.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory**: every entry point returns a tree, with
//!   placeholder nodes where input was missing or malformed
//! - **Multiple errors**: report everything, never stop at the first problem
//! - **Precise spans**: a parent's span always encloses its children's
//! - **Bounded work**: loops poll a [`Deadline`]; nesting beyond
//!   [`MAX_NESTING_DEPTH`] is reported and skipped
//!
//! # Line-sensitive continuation
//!
//! There are no newline tokens. Instead, a binary operator or suffix
//! (`(`, `[`, `.`, `` ` ``) that starts on a later line than the end of the
//! previous token only continues the current expression when the innermost
//! [`Marker`] is [`Marker::Delim`]. Parentheses, brackets and argument lists
//! push `Delim`; blocks push `Expr`. Statement level behaves like `Expr`.
//!
//! # Operator precedence
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `=` `+=` `-=` `*=` `/=` `%=` | Right |
//! | 10 | `\|\|` `??` | Left |
//! | 20 | `&&` | Left |
//! | 30 | `==` `!=` | Left |
//! | 40 | `<` `<=` `>` `>=` | Left |
//! | 50 | `+` `-` | Left |
//! | 60 | `*` `/` `%` | Left |
//!
//! # Usage
//!
//! ```
//! use escalier_core::source_analysis::{Deadline, Source, parse_script};
//!
//! let source = Source::anonymous("val x = 3 + 4");
//! let (script, diagnostics) = parse_script(&source, &Deadline::none());
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(script.stmts.len(), 1);
//! ```

use ecow::EcoString;
use tracing::{debug, instrument};

use crate::ast::{LibModule, Module, Script, StmtKind, TypeAnn};
use crate::source_analysis::{
    Deadline, LexErrorKind, Lexer, LexerState, Location, Source, SourceId, Span, Token, TokenKind,
};

// Submodules with additional impl blocks for Parser
mod declarations;
mod expressions;
mod jsx;
mod patterns;
mod sequence;
mod types;


use patterns::PatternContext;

// ============================================================================
// Diagnostics
// ============================================================================

/// The category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A wrong or missing token: "Expected X but got Y".
    Syntax,
    /// A construct cut short by end of input: unterminated string, template
    /// or comment, or a missing closing delimiter.
    Incomplete,
    /// A literal that cannot be interpreted, such as `1__0`.
    MalformedLiteral,
    /// The deadline expired; the tree is partial.
    Cancelled,
}

/// A parse diagnostic.
///
/// Diagnostics are accumulated in source order and never abort parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The category.
    pub kind: DiagnosticKind,
    /// The error message.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<EcoString>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, message, span)
    }

    /// Creates an incomplete-construct error.
    #[must_use]
    pub fn incomplete(message: impl Into<EcoString>, span: Span) -> Self {
        Self::new(DiagnosticKind::Incomplete, message, span)
    }

    /// Creates a malformed-literal error.
    #[must_use]
    pub fn malformed_literal(message: impl Into<EcoString>, span: Span) -> Self {
        Self::new(DiagnosticKind::MalformedLiteral, message, span)
    }

    /// Creates the diagnostic recorded when a deadline stops a parse.
    #[must_use]
    pub fn cancelled(span: Span) -> Self {
        Self::new(
            DiagnosticKind::Cancelled,
            "Parsing was cancelled before the end of input",
            span,
        )
    }

    /// Converts a lexical problem carried by a token.
    #[must_use]
    pub fn from_lex_error(error: &LexErrorKind, span: Span) -> Self {
        let kind = match error {
            LexErrorKind::InvalidNumber | LexErrorKind::InvalidEscape(_) => {
                DiagnosticKind::MalformedLiteral
            }
            kind if kind.is_incomplete() => DiagnosticKind::Incomplete,
            _ => DiagnosticKind::Syntax,
        };
        Self::new(kind, error.to_string(), span)
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Parser state
// ============================================================================

/// Maximum nesting depth for expressions, types, patterns and blocks.
///
/// Deeper input is reported once and skipped. As a second line of defence,
/// `stacker::maybe_grow` is used at the recursive entry points so the stack is
/// extended on the heap if needed.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Whether an operator on a new line may continue the current expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Marker {
    /// Statement-like position: a line break ends the expression.
    Expr,
    /// Inside a delimiter: line breaks are insignificant.
    Delim,
}

/// A snapshot for speculative parsing.
#[derive(Debug, Clone, Copy)]
pub(super) struct Checkpoint {
    lexer: LexerState,
    diagnostics: usize,
}

/// The parser state.
pub(super) struct Parser<'src> {
    /// Token source.
    lexer: Lexer<'src>,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diagnostic>,
    /// Continuation markers, innermost last.
    markers: Vec<Marker>,
    /// Current nesting depth (guards against stack overflow).
    nesting_depth: usize,
    /// When to give up.
    deadline: Deadline,
    /// Set once the deadline fires; from then on the parser sees end of input.
    cancelled: bool,
}

impl<'src> Parser<'src> {
    /// Creates a new parser over a lexer.
    pub(super) fn new(lexer: Lexer<'src>, deadline: &Deadline) -> Self {
        Self {
            lexer,
            diagnostics: Vec::new(),
            markers: Vec::new(),
            nesting_depth: 0,
            deadline: deadline.clone(),
            cancelled: false,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the next token without consuming it.
    ///
    /// After cancellation this is always end of input, so every production
    /// unwinds as if the buffer ended.
    pub(super) fn peek(&self) -> Token {
        if self.cancelled {
            return Token::new(TokenKind::Eof, self.here());
        }
        self.lexer.peek()
    }

    /// Returns the next token's kind.
    pub(super) fn peek_kind(&self) -> TokenKind {
        self.peek().into_kind()
    }

    /// Returns the kind of the token `n` places after the next one, without
    /// consuming anything. `peek_nth_kind(0)` is the next token.
    pub(super) fn peek_nth_kind(&self, n: usize) -> TokenKind {
        if self.cancelled {
            return TokenKind::Eof;
        }
        let mut lookahead = Lexer::with_id(self.lexer.source(), self.lexer.source_id());
        lookahead.restore_state(self.lexer.save_state());
        for _ in 0..n {
            lookahead.consume();
        }
        lookahead.peek().into_kind()
    }

    /// Checks if the next token has the same kind as `kind`, ignoring
    /// payloads.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek_kind()) == std::mem::discriminant(kind)
    }

    /// Checks if the next token is the identifier `name`.
    pub(super) fn check_contextual(&self, name: &str) -> bool {
        matches!(self.peek_kind(), TokenKind::Identifier(ident) if ident == name)
    }

    /// Consumes the next token and returns it.
    ///
    /// A lexical problem carried by the token is reported here, once. End of
    /// input is never consumed; see [`Parser::finish`].
    pub(super) fn advance(&mut self) -> Token {
        let token = self.peek();
        if token.kind().is_eof() {
            return token;
        }
        self.lexer.consume();
        if let Some(error) = token.error() {
            self.report(Diagnostic::from_lex_error(error, token.span()));
        }
        token
    }

    /// Consumes the next token if it matches `kind`.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes the identifier `name` if it is next.
    pub(super) fn eat_contextual(&mut self, name: &str) -> Option<Token> {
        if self.check_contextual(name) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expects the next token to match `kind`, consuming it if it does.
    ///
    /// If the token doesn't match, reports an error and returns `None`.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.expected(&kind.describe());
            None
        }
    }

    /// Consumes an identifier, reporting and returning a placeholder if the
    /// next token is not one.
    pub(super) fn expect_ident(&mut self, what: &str) -> crate::ast::Ident {
        if let TokenKind::Identifier(name) = self.peek_kind() {
            let token = self.advance();
            return crate::ast::Ident::new(name, token.span());
        }
        self.expected(what);
        crate::ast::Ident::placeholder(self.here())
    }

    /// Consumes end of input, reporting an unterminated trailing comment.
    fn finish(&mut self) {
        if self.cancelled {
            return;
        }
        let token = self.lexer.consume();
        if let Some(error) = token.error() {
            self.report(Diagnostic::from_lex_error(error, token.span()));
        }
    }

    /// Lexes a template-literal chunk, reporting an unterminated template.
    pub(super) fn lex_quasi(&mut self) -> Token {
        if self.cancelled {
            return Token::new(
                TokenKind::Quasi(EcoString::new(), crate::source_analysis::QuasiEnd::Eof),
                self.here(),
            );
        }
        let token = self.lexer.lex_quasi();
        if let Some(error) = token.error() {
            self.report(Diagnostic::from_lex_error(error, token.span()));
        }
        token
    }

    /// Lexes a run of JSX text.
    pub(super) fn lex_jsx_text(&mut self) -> Token {
        if self.cancelled {
            return Token::new(TokenKind::JsxText(EcoString::new()), self.here());
        }
        self.lexer.lex_jsx_text()
    }

    /// Expects the `>` that ends a JSX tag, splitting it off a `>=`.
    pub(super) fn expect_tag_end(&mut self) -> Option<Token> {
        if self.check(&TokenKind::GreaterThanEqual) {
            return self.lexer.consume_greater_than();
        }
        self.expect(&TokenKind::GreaterThan)
    }

    /// Saves the lexer position without recording a checkpoint, for raw
    /// lookahead that never reports.
    pub(super) fn save_lexer(&self) -> LexerState {
        self.lexer.save_state()
    }

    /// Restores a raw lookahead position.
    pub(super) fn restore_lexer(&mut self, state: LexerState) {
        self.lexer.restore_state(state);
    }

    /// Consumes a token without reporting, for raw lookahead.
    pub(super) fn consume_raw(&mut self) -> Token {
        self.lexer.consume()
    }

    // ========================================================================
    // Locations
    // ========================================================================

    /// Returns the location just past the last consumed token.
    pub(super) fn location(&self) -> Location {
        self.lexer.location()
    }

    /// Returns a zero-width span at [`Parser::location`], where placeholders
    /// go.
    pub(super) fn here(&self) -> Span {
        Span::empty_at(self.lexer.location(), self.lexer.source_id())
    }

    /// Returns a span from `start` to the end of the last consumed token.
    ///
    /// `start` is usually the span of a construct's first token. If that
    /// token was never consumed, the construct is empty and the result is a
    /// zero-width span at [`Parser::here`], like any placeholder.
    pub(super) fn span_from(&self, start: Span) -> Span {
        let here = self.here();
        if here.end() >= start.end() {
            start.merge(here)
        } else {
            here
        }
    }

    /// Returns the span where the next construct starts.
    pub(super) fn start_span(&self) -> Span {
        self.peek().span()
    }

    /// Returns the committed byte offset, for forward-progress checks.
    pub(super) fn offset(&self) -> u32 {
        self.location().offset
    }

    /// Reports a missing construct at [`Parser::here`].
    ///
    /// Unlike [`Parser::expected`] the message does not name the next token,
    /// so it stays the same whatever follows.
    pub(super) fn missing(&mut self, what: &str) {
        let span = self.here();
        self.report(Diagnostic::syntax(format!("Expected {what}"), span));
    }

    /// Returns `true` if `token` starts on a later line than the last
    /// consumed token ended.
    pub(super) fn is_on_new_line(&self, token: &Token) -> bool {
        token.span().start().line > self.location().line
    }

    /// Returns `true` if `token` may continue the expression being parsed.
    pub(super) fn continues(&self, token: &Token) -> bool {
        !self.is_on_new_line(token) || self.markers.last() == Some(&Marker::Delim)
    }

    /// Runs `parse` with `marker` pushed, popping it afterwards.
    pub(super) fn with_marker<T>(&mut self, marker: Marker, parse: impl FnOnce(&mut Self) -> T) -> T {
        self.markers.push(marker);
        let result = parse(self);
        self.markers.pop();
        result
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Records a diagnostic. Nothing is recorded after cancellation.
    pub(super) fn report(&mut self, diagnostic: Diagnostic) {
        if !self.cancelled {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Reports "Expected `what` but got ..." at the next token.
    pub(super) fn expected(&mut self, what: &str) {
        let token = self.peek();
        let message = format!("Expected {what} but got {}", token.kind().describe());
        let diagnostic = if token.kind().is_eof() {
            Diagnostic::incomplete(message, token.span())
        } else {
            Diagnostic::syntax(message, token.span())
        };
        self.report(diagnostic);
    }

    /// Snapshots the lexer and the diagnostic list.
    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            lexer: self.lexer.save_state(),
            diagnostics: self.diagnostics.len(),
        }
    }

    /// Returns to a checkpoint, dropping diagnostics recorded since.
    pub(super) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.lexer.restore_state(checkpoint.lexer);
        self.diagnostics.truncate(checkpoint.diagnostics);
    }

    /// Removes and returns the diagnostics recorded since `checkpoint`.
    pub(super) fn diagnostics_since(&mut self, checkpoint: &Checkpoint) -> Vec<Diagnostic> {
        self.diagnostics.split_off(checkpoint.diagnostics)
    }

    /// Moves forward to a checkpoint taken after the current position,
    /// appending the diagnostics the skipped input produced.
    pub(super) fn resume(&mut self, checkpoint: Checkpoint, diagnostics: Vec<Diagnostic>) {
        self.lexer.restore_state(checkpoint.lexer);
        self.diagnostics.extend(diagnostics);
    }

    /// Polls the deadline. Returns `false` once parsing should stop.
    pub(super) fn check_deadline(&mut self) -> bool {
        if !self.cancelled && self.deadline.is_expired() {
            debug!(at = ?self.location(), "parse deadline expired");
            self.cancelled = true;
        }
        !self.cancelled
    }

    /// Runs a recursive production under the nesting guard.
    ///
    /// Past [`MAX_NESTING_DEPTH`] the construct is reported, skipped up to the
    /// enclosing delimiter, and replaced by `placeholder`.
    pub(super) fn nested<T>(
        &mut self,
        placeholder: impl FnOnce(Span) -> T,
        parse: impl FnOnce(&mut Self) -> T,
    ) -> T {
        // 32 KiB red zone, 256 KiB new segment. The depth guard caps
        // recursion, so few segments are ever needed.
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            if self.nesting_depth >= MAX_NESTING_DEPTH {
                let span = self.peek().span();
                debug!(depth = self.nesting_depth, "nesting limit reached");
                self.report(Diagnostic::syntax(
                    format!("Nesting is too deep (maximum {MAX_NESTING_DEPTH} levels)"),
                    span,
                ));
                let start = self.here();
                self.skip_nested_construct();
                return placeholder(self.span_from(start));
            }
            self.nesting_depth += 1;
            let result = parse(self);
            self.nesting_depth -= 1;
            result
        })
    }

    /// Skips tokens up to (not including) a closing delimiter, comma or
    /// semicolon at the current depth.
    fn skip_nested_construct(&mut self) {
        let mut depth = 0usize;
        while self.check_deadline() {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
                | TokenKind::QuestionParen
                | TokenKind::QuestionBracket => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Comma | TokenKind::Semicolon if depth == 0 => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Returns the diagnostics, adding the cancellation notice if needed.
    fn into_diagnostics(mut self) -> Vec<Diagnostic> {
        if self.cancelled {
            self.diagnostics.push(Diagnostic::cancelled(self.here()));
        }
        self.diagnostics
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parses a script: any statements at top level.
///
/// Always returns a tree, even if there are syntax errors. Check the returned
/// diagnostics for errors.
///
/// # Examples
///
/// ```
/// use escalier_core::source_analysis::{Deadline, Source, parse_script};
///
/// let source = Source::anonymous("foo(a,");
/// let (_script, diagnostics) = parse_script(&source, &Deadline::none());
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(diagnostics[0].message, "Expected ')' but got end of file");
/// ```
#[must_use]
#[instrument(skip_all, fields(path = %source.path()))]
pub fn parse_script(source: &Source, deadline: &Deadline) -> (Script, Vec<Diagnostic>) {
    debug!(bytes = source.contents().len(), "parsing script");
    let mut parser = Parser::new(Lexer::new(source), deadline);
    let start = parser.here();
    let stmts = parser.parse_top_level();
    let span = start.merge(parser.here());
    parser.finish();
    (Script { stmts, span }, parser.into_diagnostics())
}

/// Parses a module: a file of declarations.
///
/// Non-declaration statements are reported and kept.
#[must_use]
#[instrument(skip_all, fields(path = %source.path()))]
pub fn parse_module(source: &Source, deadline: &Deadline) -> (Module, Vec<Diagnostic>) {
    debug!(bytes = source.contents().len(), "parsing module");
    let mut parser = Parser::new(Lexer::new(source), deadline);
    let start = parser.here();
    let stmts = parser.parse_top_level();
    for stmt in &stmts {
        if !matches!(stmt.kind, StmtKind::Decl(_)) {
            parser.report(
                Diagnostic::syntax("Expected a declaration at module top level", stmt.span)
                    .with_hint("only `val`, `var`, `fn`, `type` and `class` may appear here"),
            );
        }
    }
    let span = start.merge(parser.here());
    parser.finish();
    (Module { stmts, span }, parser.into_diagnostics())
}

/// Parses a standalone type annotation, for editor tooling.
///
/// Text after the type is reported.
///
/// # Examples
///
/// ```
/// use escalier_core::ast::TypeAnnKind;
/// use escalier_core::source_analysis::{Deadline, parse_type_ann};
///
/// let (type_ann, diagnostics) = parse_type_ann("A | B | C", &Deadline::none());
/// assert!(diagnostics.is_empty());
/// assert!(matches!(&type_ann.kind, TypeAnnKind::Union(types) if types.len() == 3));
/// ```
#[must_use]
#[instrument(skip_all)]
pub fn parse_type_ann(text: &str, deadline: &Deadline) -> (TypeAnn, Vec<Diagnostic>) {
    debug!(bytes = text.len(), "parsing type annotation");
    let mut parser = Parser::new(Lexer::with_id(text, SourceId::default()), deadline);
    let type_ann = parser.with_marker(Marker::Delim, Parser::parse_type_ann);
    if !parser.peek_kind().is_eof() {
        parser.expected("end of type annotation");
    }
    parser.finish();
    (type_ann, parser.into_diagnostics())
}

/// Parses library files into one declaration space.
///
/// Files are parsed in order as modules sharing `deadline`; declarations are
/// concatenated in input order and keep their own file's [`SourceId`] in
/// their spans. Once the deadline fires, remaining files are skipped and a
/// single cancellation diagnostic is reported.
#[must_use]
#[instrument(skip_all, fields(files = sources.len()))]
pub fn parse_lib_files(sources: &[Source], deadline: &Deadline) -> (LibModule, Vec<Diagnostic>) {
    let mut lib = LibModule::default();
    let mut diagnostics = Vec::new();
    for source in sources {
        if diagnostics
            .last()
            .is_some_and(|d: &Diagnostic| d.kind == DiagnosticKind::Cancelled)
        {
            debug!(path = %source.path(), "skipping file after cancellation");
            continue;
        }
        debug!(path = %source.path(), id = %source.id(), "parsing library file");
        let (module, file_diagnostics) = parse_module(source, deadline);
        lib.sources.push(source.id());
        lib.decls.extend(module.stmts.into_iter().filter_map(|stmt| match stmt.kind {
            StmtKind::Decl(decl) => Some(decl),
            _ => None,
        }));
        diagnostics.extend(file_diagnostics);
    }
    (lib, diagnostics)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ast::{DeclKind, ExprKind, TypeAnnKind};

    pub(super) fn parse_ok(text: &str) -> Script {
        let source = Source::anonymous(text);
        let (script, diagnostics) = parse_script(&source, &Deadline::none());
        assert!(
            diagnostics.is_empty(),
            "Expected no errors for {text:?}, got: {diagnostics:?}"
        );
        script
    }

    pub(super) fn parse_err(text: &str) -> (Script, Vec<Diagnostic>) {
        let source = Source::anonymous(text);
        let (script, diagnostics) = parse_script(&source, &Deadline::none());
        assert!(!diagnostics.is_empty(), "Expected errors for {text:?}");
        (script, diagnostics)
    }

    #[test]
    fn parse_empty_input() {
        let script = parse_ok("");
        assert!(script.stmts.is_empty());
        assert!(script.span.is_empty());
    }

    #[test]
    fn parse_whitespace_and_comments_only() {
        let script = parse_ok("  // nothing\n/* here */\n");
        assert!(script.stmts.is_empty());
    }

    #[test]
    fn unterminated_trailing_comment_is_reported() {
        let (_, diagnostics) = parse_err("val x = 1 /* oops");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Incomplete);
        assert_eq!(diagnostics[0].message, "unterminated block comment");
    }

    #[test]
    fn lex_errors_are_reported_once() {
        let (_, diagnostics) = parse_err("val s = \"abc");
        assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Incomplete);
    }

    #[test]
    fn malformed_number_is_a_literal_error() {
        let (script, diagnostics) = parse_err("val n = 1__0");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MalformedLiteral);
        assert_eq!(script.stmts.len(), 1);
    }

    #[test]
    fn module_reports_non_declarations() {
        let source = Source::anonymous("val x = 1\nfoo()\nfn f() {}");
        let (module, diagnostics) = parse_module(&source, &Deadline::none());
        assert_eq!(module.stmts.len(), 3);
        assert_eq!(module.decls().count(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Expected a declaration at module top level"
        );
        assert!(diagnostics[0].hint.is_some());
    }

    #[test]
    fn type_ann_entry_point() {
        let (type_ann, diagnostics) = parse_type_ann("A & B | X & Y", &Deadline::none());
        assert!(diagnostics.is_empty());
        let TypeAnnKind::Union(types) = &type_ann.kind else {
            panic!("expected union, got {type_ann:?}");
        };
        assert_eq!(types.len(), 2);
        assert!(matches!(types[0].kind, TypeAnnKind::Intersection(_)));
        assert!(matches!(types[1].kind, TypeAnnKind::Intersection(_)));
    }

    #[test]
    fn type_ann_trailing_input() {
        let (_, diagnostics) = parse_type_ann("number string", &Deadline::none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Expected end of type annotation but got identifier 'string'"
        );
    }

    #[test]
    fn type_ann_multi_line_union() {
        let (type_ann, diagnostics) = parse_type_ann("\n  | A\n  | B\n  | C", &Deadline::none());
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(matches!(&type_ann.kind, TypeAnnKind::Union(types) if types.len() == 3));
    }

    #[test]
    fn lib_files_keep_source_ids_and_order() {
        let sources = vec![
            Source::new(SourceId::new(1), "a.esc", "type A = number\nval a: A = 1"),
            Source::new(SourceId::new(2), "b.esc", "declare fn b() -> string"),
        ];
        let (lib, diagnostics) = parse_lib_files(&sources, &Deadline::none());
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(lib.sources, vec![SourceId::new(1), SourceId::new(2)]);
        assert_eq!(lib.decls.len(), 3);
        assert!(matches!(lib.decls[0].kind, DeclKind::TypeAlias(_)));
        assert_eq!(lib.decls[0].span.source_id(), SourceId::new(1));
        assert!(matches!(lib.decls[2].kind, DeclKind::Fn(_)));
        assert_eq!(lib.decls[2].span.source_id(), SourceId::new(2));
    }

    #[test]
    fn expired_deadline_stops_with_one_diagnostic() {
        let deadline = Deadline::after(Duration::ZERO);
        let source = Source::anonymous("val a = 1\nval b = (2 +\nfoo(");
        let (script, diagnostics) = parse_script(&source, &deadline);
        assert!(script.stmts.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Cancelled);
    }

    #[test]
    fn cancelled_lib_parse_reports_once() {
        let deadline = Deadline::none();
        deadline.cancel_handle().cancel();
        let sources = vec![
            Source::new(SourceId::new(0), "a.esc", "val a = 1"),
            Source::new(SourceId::new(1), "b.esc", "val b = 2"),
        ];
        let (lib, diagnostics) = parse_lib_files(&sources, &deadline);
        assert!(lib.decls.is_empty());
        assert_eq!(lib.sources.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Cancelled);
    }

    #[test]
    fn deep_nesting_is_reported_once() {
        let depth = MAX_NESTING_DEPTH * 4;
        let text = format!("val x = {}1{}", "(".repeat(depth), ")".repeat(depth));
        let (script, diagnostics) = parse_err(&text);
        assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
        assert!(diagnostics[0].message.starts_with("Nesting is too deep"));
        assert_eq!(script.stmts.len(), 1);
    }

    #[test]
    fn deep_prefix_chains_do_not_overflow() {
        let text = format!("val x = {}y", "-".repeat(2_000));
        let script = parse_ok(&text);
        assert_eq!(script.stmts.len(), 1);

        let text = format!("type T = {}K", "keyof ".repeat(2_000));
        parse_ok(&text);
    }

    #[test]
    fn script_span_covers_input() {
        let script = parse_ok("val x = 1\nx + 2");
        assert_eq!(script.span.start().offset, 0);
        assert_eq!(script.span.end().offset, 15);
        let StmtKind::Expr(expr) = &script.stmts[1].kind else {
            panic!("expected expression statement");
        };
        assert!(matches!(expr.kind, ExprKind::Binary { .. }));
    }
}
