// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Escalier lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated inputs:
//!
//! 1. **Lexer never panics** on arbitrary string input
//! 2. **Token spans within input**: `start <= end <= input.len()`
//! 3. **Token spans are ordered** and never overlap
//! 4. **EOF is always last** and appears exactly once
//! 5. **Lexer is deterministic**
//! 6. **Peek agrees with consume**, whatever was consumed before
//! 7. **Valid fragments lex cleanly**
//! 8. **Line/column agree with offsets**

use proptest::prelude::*;

use super::lexer::{Lexer, lex};
use super::source::SourceId;
use super::token::TokenKind;

// ============================================================================
// Generators
// ============================================================================

/// Known-valid single-token fragments that should lex without errors.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "42",
    "3.14",
    ".5",
    "1_000",
    "6.02e23",
    "\"hello\"",
    "\"esc\\n\\u{41}\"",
    "true",
    "undefined",
    "x",
    "myVariable",
    "$ref",
    "caf\u{00E9}",
    "+=",
    "->",
    "=>",
    "...",
    "?.",
    "??",
    "/ab+c/gi",
    "</",
];

/// Multi-token valid inputs that should lex cleanly.
const VALID_INPUTS: &[&str] = &[
    "val x = 5",
    "fn add(a, b) { return a + b }",
    "a / b / c",
    "x = /re/ // comment",
    "type T = A | B & C",
    "foo?.bar?[0]?(1)",
    "/* block */ [1, 2, 3]",
    "match x { {a, b} => a }",
    "<div>hi</div>",
];

fn valid_single_token() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_SINGLE_TOKENS).prop_map(std::string::ToString::to_string)
}

fn valid_input() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_INPUTS).prop_map(std::string::ToString::to_string)
}

/// Counts lines and scalar columns the slow way.
fn line_column_at(input: &str, offset: usize) -> (u32, u32) {
    let mut line = 1;
    let mut column = 1;
    let mut chars = input[..offset].chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
                column = 1;
            }
            '\n' => {
                line += 1;
                column = 1;
            }
            _ => column += 1,
        }
    }
    (line, column)
}

// ============================================================================
// Property tests
// ============================================================================

/// Default is 512 cases; override via `PROPTEST_CASES` env var for nightly runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: Lexer never panics on arbitrary string input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _tokens = lex(&input);
    }

    /// Property 2: All token spans are within input bounds.
    #[test]
    fn token_spans_within_input(input in "\\PC{0,500}") {
        let tokens = lex(&input);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for token in &tokens {
            let span = token.span();
            prop_assert!(
                span.end().offset <= input_len,
                "Token {:?} span end {} exceeds input length {} for input {:?}",
                token.kind(),
                span.end().offset,
                input_len,
                input,
            );
            prop_assert!(
                span.start() <= span.end(),
                "Token {:?} span {:?} is inverted for input {:?}",
                token.kind(),
                span,
                input,
            );
        }
    }

    /// Property 3: Token spans are non-overlapping and ordered.
    #[test]
    fn token_spans_non_overlapping(input in "\\PC{0,500}") {
        let tokens = lex(&input);
        for window in tokens.windows(2) {
            let prev = &window[0];
            let next = &window[1];
            prop_assert!(
                next.span().start().offset >= prev.span().end().offset,
                "Overlapping spans: {:?} at {:?} and {:?} at {:?} for input {:?}",
                prev.kind(),
                prev.span(),
                next.kind(),
                next.span(),
                input,
            );
        }
    }

    /// Property 4: exactly one EOF, and it is last.
    #[test]
    fn eof_always_last(input in "\\PC{0,500}") {
        let tokens = lex(&input);
        let eof_count = tokens.iter().filter(|t| t.kind().is_eof()).count();
        prop_assert_eq!(eof_count, 1, "EOF count for input {:?}", input);
        prop_assert!(
            tokens.last().is_some_and(|t| t.kind().is_eof()),
            "Last token should be EOF for input {:?}",
            input,
        );
    }

    /// Property 5: Lexer is deterministic.
    #[test]
    fn lexer_deterministic(input in "\\PC{0,200}") {
        prop_assert_eq!(lex(&input), lex(&input), "input {:?}", input);
    }

    /// Property 6: peeking never changes what is consumed next.
    #[test]
    fn peek_matches_consume(input in "[a-z0-9 /()\\[\\]{}+*=\"\\n.]{0,80}") {
        let mut lexer = Lexer::with_id(&input, SourceId::default());
        loop {
            let first = lexer.peek();
            let second = lexer.peek();
            prop_assert_eq!(&first, &second);
            let consumed = lexer.consume();
            prop_assert_eq!(&first, &consumed);
            if consumed.kind().is_eof() {
                break;
            }
        }
    }

    /// Property 7a: Known-valid single tokens produce no errors.
    #[test]
    fn valid_tokens_no_errors(input in valid_single_token()) {
        let tokens = lex(&input);
        prop_assert_eq!(tokens.len(), 2, "input {:?} lexed as {:?}", input, tokens);
        for token in &tokens {
            prop_assert!(
                token.error().is_none() && !token.kind().is_error(),
                "Valid input {:?} produced malformed token {:?}",
                input,
                token,
            );
        }
    }

    /// Property 7b: Known-valid inputs produce no errors.
    #[test]
    fn valid_inputs_no_errors(input in valid_input()) {
        for token in lex(&input) {
            prop_assert!(
                token.error().is_none() && !token.kind().is_error(),
                "Valid input {:?} produced malformed token {:?}",
                input,
                token,
            );
        }
    }

    /// Property 8: line and column match a direct count over ASCII input.
    #[test]
    fn line_column_match_offsets(input in "[a-z0-9 +\\n\\r\\t]{0,120}") {
        for token in lex(&input) {
            let start = token.span().start();
            let (line, column) = line_column_at(&input, start.offset as usize);
            prop_assert_eq!((start.line, start.column), (line, column), "input {:?}", input);
        }
    }

    /// Property 9: every regex or division decision follows the previous
    /// token, so `a/b/c` never lexes a regex.
    #[test]
    fn division_after_identifiers(names in prop::collection::vec("x_[a-z]{1,4}", 2..6)) {
        let input = names.join(" / ");
        for token in lex(&input) {
            prop_assert!(
                !matches!(token.kind(), TokenKind::Regex(..)),
                "regex in {:?}",
                input,
            );
        }
    }
}
