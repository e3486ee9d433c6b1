// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Escalier source code.
//!
//! The lexer converts source text into [`Token`]s on demand. It is
//! hand-written for control over error recovery and context-sensitive
//! tokenization.
//!
//! # Design Principles
//!
//! - **Error recovery**: Never panic on malformed input; malformed tokens
//!   carry a [`LexErrorKind`] and lexing continues
//! - **Side-effect free lookahead**: [`Lexer::peek`] re-derives the next token
//!   from the committed position without changing it
//! - **O(1) snapshots**: [`LexerState`] is a small `Copy` value, so
//!   speculative parses save and restore it freely
//!
//! # Regular expressions versus division
//!
//! A `/` starts a regular-expression literal unless the last committed
//! token ends an expression (identifier, literal, `)`, `]`, `}`). The
//! decision is recomputed on every lex from [`LexerState`], so repeated
//! peeks always agree with the eventual consume.
//!
//! # Example
//!
//! ```
//! use escalier_core::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("x / 2");
//! assert_eq!(tokens.len(), 4); // x, /, 2, EOF
//! assert_eq!(tokens[1].kind(), &TokenKind::Slash);
//! ```

use ecow::EcoString;
use unicode_normalization::{UnicodeNormalization, is_nfc};

use super::{LexErrorKind, Location, QuasiEnd, Source, SourceId, Span, Token, TokenKind};

/// A snapshot of the lexer's committed position.
///
/// Restoring a state with [`Lexer::restore_state`] undoes every `consume`
/// performed since [`Lexer::save_state`] returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    location: Location,
    last_ends_expression: bool,
}

impl LexerState {
    /// Returns the location just past the last committed token.
    #[must_use]
    pub const fn location(self) -> Location {
        self.location
    }
}

/// A lexer that tokenizes Escalier source code on demand.
///
/// # Error Recovery
///
/// The lexer never fails. Unknown characters produce [`TokenKind::Error`]
/// tokens; unterminated strings, templates and regular expressions produce
/// their usual kind with an attached [`LexErrorKind`].
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// File the produced spans belong to.
    source_id: SourceId,
    /// Committed position.
    state: LexerState,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("state", &self.state)
            .field(
                "remaining",
                &self
                    .source
                    .get(self.state.location.offset as usize..)
                    .unwrap_or(""),
            )
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer over a source file.
    #[must_use]
    pub fn new(source: &'src Source) -> Self {
        Self::with_id(source.contents(), source.id())
    }

    /// Creates a lexer over bare text, attributing spans to `source_id`.
    #[must_use]
    pub const fn with_id(source: &'src str, source_id: SourceId) -> Self {
        Self {
            source,
            source_id,
            state: LexerState {
                location: Location::START,
                last_ends_expression: false,
            },
        }
    }

    /// Returns the text being lexed.
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the id stamped onto every span.
    #[must_use]
    pub const fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Returns the location just past the last committed token.
    ///
    /// Whitespace and comments after that token are not included, so this is
    /// the position zero-width placeholders attach to.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.state.location
    }

    /// Snapshots the committed position.
    #[must_use]
    pub const fn save_state(&self) -> LexerState {
        self.state
    }

    /// Rewinds (or fast-forwards) to a snapshot.
    pub const fn restore_state(&mut self, state: LexerState) {
        self.state = state;
    }

    /// Returns the next token without committing it.
    #[must_use]
    pub fn peek(&self) -> Token {
        self.scan().0
    }

    /// Returns the next token and commits past it.
    pub fn consume(&mut self) -> Token {
        let (token, state) = self.scan();
        self.state = state;
        token
    }

    /// Alias of [`Lexer::consume`].
    #[expect(
        clippy::should_implement_trait,
        reason = "the lexer is not an iterator; end of input is a token"
    )]
    pub fn next(&mut self) -> Token {
        self.consume()
    }

    /// Lexes one chunk of template-literal text starting at the committed
    /// position.
    ///
    /// Called after the opening backtick and after each `}` that closes an
    /// interpolation. The chunk runs to `${`, the closing backtick, or end of
    /// input; both delimiters are consumed and reported through
    /// [`QuasiEnd`]. The text is kept raw (escapes are not processed).
    pub fn lex_quasi(&mut self) -> Token {
        let mut cursor = self.cursor();
        let start = cursor.location();
        let begin = cursor.pos;
        let (text_end, end) = loop {
            match cursor.peek_char() {
                None => break (cursor.pos, QuasiEnd::Eof),
                Some('`') => {
                    let text_end = cursor.pos;
                    cursor.advance();
                    break (text_end, QuasiEnd::Backtick);
                }
                Some('$') if cursor.peek_char_n(1) == Some('{') => {
                    let text_end = cursor.pos;
                    cursor.advance();
                    cursor.advance();
                    break (text_end, QuasiEnd::Interpolation);
                }
                Some('\\') => {
                    cursor.advance();
                    cursor.advance();
                }
                Some(_) => {
                    cursor.advance();
                }
            }
        };
        let text = EcoString::from(&self.source[begin..text_end]);
        let span = cursor.span_from(start);
        let token = if end == QuasiEnd::Eof {
            Token::malformed(
                TokenKind::Quasi(text, end),
                span,
                LexErrorKind::UnterminatedTemplate,
            )
        } else {
            Token::new(TokenKind::Quasi(text, end), span)
        };
        self.state = LexerState {
            location: cursor.location(),
            last_ends_expression: end == QuasiEnd::Backtick,
        };
        token
    }

    /// Lexes a run of JSX child text starting at the committed position.
    ///
    /// The run stops before `<`, `{`, or end of input and may be empty.
    /// Whitespace is part of the text.
    pub fn lex_jsx_text(&mut self) -> Token {
        let mut cursor = self.cursor();
        let start = cursor.location();
        let begin = cursor.pos;
        cursor.advance_while(|c| c != '<' && c != '{');
        let text = EcoString::from(&self.source[begin..cursor.pos]);
        let token = Token::new(TokenKind::JsxText(text), cursor.span_from(start));
        self.state = LexerState {
            location: cursor.location(),
            last_ends_expression: false,
        };
        token
    }

    /// Commits only the leading `>` of the next token.
    ///
    /// A JSX tag that ends right before `=` would otherwise lex as `>=`.
    /// Returns `None`, committing nothing, when the next token does not
    /// start with `>`.
    pub fn consume_greater_than(&mut self) -> Option<Token> {
        let mut cursor = self.cursor();
        if cursor.skip_trivia().is_some() || cursor.peek_char() != Some('>') {
            return None;
        }
        let start = cursor.location();
        cursor.advance();
        self.state = LexerState {
            location: cursor.location(),
            last_ends_expression: TokenKind::GreaterThan.ends_expression(),
        };
        Some(Token::new(TokenKind::GreaterThan, cursor.span_from(start)))
    }

    fn cursor(&self) -> Cursor<'src> {
        Cursor {
            source: self.source,
            source_id: self.source_id,
            pos: self.state.location.offset as usize,
            line: self.state.location.line,
            column: self.state.location.column,
        }
    }

    /// Lexes the token after the committed position, returning it together
    /// with the state that committing it would produce.
    fn scan(&self) -> (Token, LexerState) {
        let mut cursor = self.cursor();
        let token = match cursor.skip_trivia() {
            // An unterminated block comment always runs to end of input.
            Some(comment_start) => Token::malformed(
                TokenKind::Eof,
                cursor.span_from(comment_start),
                LexErrorKind::UnterminatedComment,
            ),
            None => cursor.lex_token(self.state.last_ends_expression),
        };
        let state = LexerState {
            location: cursor.location(),
            last_ends_expression: token.kind().ends_expression(),
        };
        (token, state)
    }
}

/// Lexes a whole buffer, including the trailing [`TokenKind::Eof`].
///
/// Convenience for tooling and tests. Spans carry the default [`SourceId`].
#[must_use]
pub fn lex(text: &str) -> Vec<Token> {
    let mut lexer = Lexer::with_id(text, SourceId::default());
    let mut tokens = Vec::new();
    loop {
        let token = lexer.consume();
        let done = token.kind().is_eof();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

// ============================================================================
// Character classification
// ============================================================================

/// Returns `true` for characters that may start an identifier.
///
/// `XID_Start` already excludes pattern-syntax and pattern-whitespace code
/// points.
fn is_id_start(c: char) -> bool {
    c == '_' || c == '$' || unicode_ident::is_xid_start(c)
}

/// Returns `true` for characters that may continue an identifier.
fn is_id_continue(c: char) -> bool {
    c == '$' || c == '\u{200C}' || c == '\u{200D}' || unicode_ident::is_xid_continue(c)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{FEFF}')
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "source files over 4GB are not supported"
)]
const fn to_u32(n: usize) -> u32 {
    n as u32
}

// ============================================================================
// Cursor
// ============================================================================

/// A scratch position the lexer advances while recognising one token.
struct Cursor<'src> {
    source: &'src str,
    source_id: SourceId,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    fn peek_char(&self) -> Option<char> {
        self.source.get(self.pos..)?.chars().next()
    }

    /// Peeks `n+1` characters ahead (n=0 is the same as `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.source.get(self.pos..)?.chars().nth(n)
    }

    /// Consumes one character, tracking line and column. `\r\n` counts as a
    /// single line break.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        match c {
            '\r' => {
                if self.peek_char() == Some('\n') {
                    self.pos += 1;
                }
                self.line += 1;
                self.column = 1;
            }
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Consumes `c` if it is next.
    fn eat(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn location(&self) -> Location {
        Location::new(to_u32(self.pos), self.line, self.column)
    }

    fn span_from(&self, start: Location) -> Span {
        Span::new(start, self.location(), self.source_id)
    }

    /// Skips whitespace and comments.
    ///
    /// Returns the start of an unterminated block comment, if one swallowed
    /// the rest of the input.
    fn skip_trivia(&mut self) -> Option<Location> {
        loop {
            match self.peek_char() {
                Some(c) if is_whitespace(c) => {
                    self.advance();
                }
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.advance_while(|c| c != '\n' && c != '\r');
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    let start = self.location();
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek_char() {
                            None => return Some(start),
                            Some('*') if self.peek_char_n(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => return None,
            }
        }
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    fn lex_token(&mut self, after_expression: bool) -> Token {
        let start = self.location();
        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, self.span_from(start));
        };

        if is_id_start(c) {
            return self.lex_identifier_or_keyword(start);
        }
        if c.is_ascii_digit()
            || (c == '.'
                && !after_expression
                && self.peek_char_n(1).is_some_and(|d| d.is_ascii_digit()))
        {
            return self.lex_number(start);
        }
        if c == '"' {
            return self.lex_string(start);
        }
        if c == '/' && !after_expression {
            return self.lex_regex(start);
        }

        self.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '`' => TokenKind::BackTick,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '.' => {
                if self.peek_char() == Some('.') && self.peek_char_n(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::DotDotDot
                } else {
                    TokenKind::Dot
                }
            }
            '?' => {
                if self.eat('.') {
                    TokenKind::QuestionDot
                } else if self.eat('(') {
                    TokenKind::QuestionParen
                } else if self.eat('[') {
                    TokenKind::QuestionBracket
                } else if self.eat('?') {
                    TokenKind::QuestionQuestion
                } else {
                    TokenKind::Question
                }
            }
            '+' => self.with_assign(TokenKind::Plus, TokenKind::PlusAssign),
            '*' => self.with_assign(TokenKind::Star, TokenKind::StarAssign),
            '%' => self.with_assign(TokenKind::Percent, TokenKind::PercentAssign),
            '!' => self.with_assign(TokenKind::Bang, TokenKind::BangEqual),
            '-' => {
                if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    self.with_assign(TokenKind::Minus, TokenKind::MinusAssign)
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenKind::EqualEqual
                } else if self.eat('>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Assign
                }
            }
            '/' => {
                if self.eat('>') {
                    TokenKind::SlashGreaterThan
                } else {
                    self.with_assign(TokenKind::Slash, TokenKind::SlashAssign)
                }
            }
            '<' => {
                if self.eat('/') {
                    TokenKind::LessThanSlash
                } else {
                    self.with_assign(TokenKind::LessThan, TokenKind::LessThanEqual)
                }
            }
            '>' => self.with_assign(TokenKind::GreaterThan, TokenKind::GreaterThanEqual),
            '&' => {
                if self.eat('&') {
                    TokenKind::AmpAmp
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::PipePipe
                } else {
                    TokenKind::Pipe
                }
            }
            other => {
                return Token::malformed(
                    TokenKind::Error(EcoString::from(other.to_string())),
                    self.span_from(start),
                    LexErrorKind::UnexpectedCharacter(other),
                );
            }
        };
        Token::new(kind, self.span_from(start))
    }

    /// Returns `with` if the next character is `=` (consuming it), else
    /// `plain`.
    fn with_assign(&mut self, plain: TokenKind, with: TokenKind) -> TokenKind {
        if self.eat('=') { with } else { plain }
    }

    /// Lexes an identifier or reserved word.
    ///
    /// The name is NFC-normalized before keyword lookup, and the column
    /// advances by the scalar count of the normalized form.
    fn lex_identifier_or_keyword(&mut self, start: Location) -> Token {
        let begin = self.pos;
        while let Some(c) = self.peek_char() {
            if self.pos > begin && !is_id_continue(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let raw = &self.source[begin..self.pos];
        let name = if is_nfc(raw) {
            EcoString::from(raw)
        } else {
            EcoString::from(raw.nfc().collect::<String>())
        };
        self.column += to_u32(name.chars().count());
        let kind = TokenKind::keyword(&name).unwrap_or(TokenKind::Identifier(name));
        Token::new(kind, self.span_from(start))
    }

    /// Lexes a numeric literal: digits with `_` separators, at most one
    /// decimal point, and an optional exponent.
    fn lex_number(&mut self, start: Location) -> Token {
        let begin = self.pos;
        let mut malformed = false;
        if self.peek_char() != Some('.') {
            malformed |= self.lex_digits();
        }
        if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            malformed |= self.lex_digits();
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_char_n(1), Some('+' | '-')) {
                2
            } else {
                1
            };
            if self.peek_char_n(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.advance();
                }
                malformed |= self.lex_digits();
            }
        }
        // `123abc` is one malformed literal, not a number and a name.
        if self.peek_char().is_some_and(is_id_continue) {
            self.advance_while(is_id_continue);
            malformed = true;
        }

        let kind = TokenKind::Number(EcoString::from(&self.source[begin..self.pos]));
        let span = self.span_from(start);
        if malformed {
            Token::malformed(kind, span, LexErrorKind::InvalidNumber)
        } else {
            Token::new(kind, span)
        }
    }

    /// Consumes a run of digits and separators. Returns `true` if a separator
    /// is misplaced (leading, trailing, or doubled).
    fn lex_digits(&mut self) -> bool {
        let begin = self.pos;
        self.advance_while(|c| c.is_ascii_digit() || c == '_');
        let run = &self.source[begin..self.pos];
        run.starts_with('_') || run.ends_with('_') || run.contains("__")
    }

    /// Lexes a double-quoted string, processing escapes.
    ///
    /// An unterminated string consumes to end of input.
    fn lex_string(&mut self, start: Location) -> Token {
        self.advance(); // opening quote
        let mut value = String::new();
        let mut error = None;
        loop {
            match self.peek_char() {
                None => {
                    error = Some(LexErrorKind::UnterminatedString);
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('0') => value.push('\0'),
                        Some(c @ ('\\' | '"' | '\'' | '`')) => value.push(c),
                        Some('u') => match self.lex_unicode_escape() {
                            Some(c) => value.push(c),
                            None => {
                                error.get_or_insert(LexErrorKind::InvalidEscape('u'));
                            }
                        },
                        Some(other) => {
                            error.get_or_insert(LexErrorKind::InvalidEscape(other));
                            value.push(other);
                        }
                        None => {
                            error = Some(LexErrorKind::UnterminatedString);
                            break;
                        }
                    }
                }
                Some(_) => {
                    let begin = self.pos;
                    self.advance();
                    value.push_str(&self.source[begin..self.pos]);
                }
            }
        }

        let kind = TokenKind::String(EcoString::from(value));
        let span = self.span_from(start);
        match error {
            Some(error) => Token::malformed(kind, span, error),
            None => Token::new(kind, span),
        }
    }

    /// Lexes the body of `\u{XXXX}` or `\uXXXX` after the `u`.
    fn lex_unicode_escape(&mut self) -> Option<char> {
        let begin;
        let end;
        if self.eat('{') {
            begin = self.pos;
            self.advance_while(|c| c.is_ascii_hexdigit());
            end = self.pos;
            if !self.eat('}') || end == begin || end - begin > 6 {
                return None;
            }
        } else {
            begin = self.pos;
            for _ in 0..4 {
                if !self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                    return None;
                }
                self.advance();
            }
            end = self.pos;
        }
        u32::from_str_radix(&self.source[begin..end], 16)
            .ok()
            .and_then(char::from_u32)
    }

    /// Lexes a regular-expression literal. The literal may not span lines.
    fn lex_regex(&mut self, start: Location) -> Token {
        self.advance(); // opening '/'
        let begin = self.pos;
        let mut in_class = false;
        let mut terminated = false;
        loop {
            match self.peek_char() {
                None | Some('\n' | '\r') => break,
                Some('\\') => {
                    self.advance();
                    if !matches!(self.peek_char(), None | Some('\n' | '\r')) {
                        self.advance();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    terminated = true;
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let pattern = EcoString::from(&self.source[begin..self.pos]);
        if !terminated {
            return Token::malformed(
                TokenKind::Regex(pattern, EcoString::new()),
                self.span_from(start),
                LexErrorKind::UnterminatedRegex,
            );
        }
        self.advance(); // closing '/'
        let flags_begin = self.pos;
        self.advance_while(|c| c.is_ascii_alphabetic());
        let flags = EcoString::from(&self.source[flags_begin..self.pos]);
        Token::new(TokenKind::Regex(pattern, flags), self.span_from(start))
    }
}
