// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Delimited, separated lists.
//!
//! Argument lists, parameter lists, array and object literals, tuple and
//! object patterns, type arguments and type parameters all share one shape:
//! items separated by a separator, with an optional trailing separator, up to
//! a terminator. The caller consumes the opener and then `expect`s the
//! terminator, so a missing closer is reported exactly once.

use super::Parser;
use crate::source_analysis::TokenKind;

impl Parser<'_> {
    /// Parses `item (separator item)* separator?` until `terminator`.
    ///
    /// The terminator is not consumed. `item` returns `None` when nothing at
    /// the current token can start an item; the list then ends and the
    /// caller's `expect` reports what was found instead. The deadline is
    /// polled once per item.
    pub(super) fn parse_sequence<T>(
        &mut self,
        terminator: &TokenKind,
        separator: &TokenKind,
        mut item: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        while self.check_deadline() {
            if self.check(terminator) || self.peek_kind().is_eof() {
                break;
            }
            let Some(parsed) = item(self) else {
                break;
            };
            items.push(parsed);
            if self.eat(separator).is_none() {
                break;
            }
        }
        items
    }

    /// Parses a comma-separated list enclosed by the current token and
    /// `close`, returning the items.
    ///
    /// The opener must already have been checked by the caller.
    pub(super) fn parse_delimited<T>(
        &mut self,
        close: &TokenKind,
        item: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        self.advance();
        let items = self.with_marker(super::Marker::Delim, |p| {
            p.parse_sequence(close, &TokenKind::Comma, item)
        });
        self.expect(close);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_ok};
    use crate::ast::{ExprKind, StmtKind};

    fn call_arg_count(text: &str) -> usize {
        let script = parse_ok(text);
        let StmtKind::Expr(expr) = &script.stmts[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Call { args, .. } = &expr.kind else {
            panic!("expected call, got {expr:?}");
        };
        args.len()
    }

    #[test]
    fn empty_list() {
        assert_eq!(call_arg_count("f()"), 0);
    }

    #[test]
    fn trailing_separator_is_allowed() {
        assert_eq!(call_arg_count("f(a, b,)"), 2);
    }

    #[test]
    fn items_may_span_lines() {
        assert_eq!(call_arg_count("f(\n  a,\n  b\n)"), 2);
    }

    #[test]
    fn missing_terminator_reported_once() {
        let (script, diagnostics) = parse_err("foo(a,");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected ')' but got end of file");
        let StmtKind::Expr(expr) = &script.stmts[0].kind else {
            panic!("expected expression statement");
        };
        assert!(matches!(&expr.kind, ExprKind::Call { args, .. } if args.len() == 1));
    }

    #[test]
    fn missing_separator_reports_terminator() {
        let (_, diagnostics) = parse_err("f(a b)");
        assert_eq!(diagnostics[0].message, "Expected ')' but got identifier 'b'");
    }
}
