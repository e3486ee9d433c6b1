// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Pattern and parameter parsing.

use super::{Diagnostic, Marker, Parser};
use crate::ast::{
    BindingIdent, Ident, Literal, ObjPatElem, Param, Pat, PatKind, QualifiedIdent,
};
use crate::source_analysis::{Span, TokenKind};

/// Where a pattern appears, which decides what an identifier may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PatternContext {
    /// The whole pattern of a declaration, parameter or `for` loop. The
    /// enclosing construct owns `: T` and `= init`, so a bare identifier
    /// takes neither.
    Head,
    /// Inside a tuple, object or extractor pattern: `: T` and `= default`
    /// are allowed.
    Nested,
    /// A `match` or `catch` arm: `: T` is allowed, defaults are not.
    MatchArm,
}

impl PatternContext {
    /// The context for sub-patterns.
    const fn element(self) -> Self {
        match self {
            Self::Head | Self::Nested => Self::Nested,
            Self::MatchArm => Self::MatchArm,
        }
    }
}

/// Tokens that start a pattern.
fn starts_pattern(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Undefined
            | TokenKind::Minus
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
    )
}

/// What follows an identifier chain at the start of a pattern.
enum ChainFollower {
    /// `Name(`
    Extractor,
    /// `Name {`
    Instance,
    /// Anything else after a single identifier.
    Binding,
    /// `A.B` not followed by `(` or `{`.
    BareChain,
}

impl Parser<'_> {
    /// Parses a pattern, reporting and returning a placeholder binding if
    /// none is present.
    pub(super) fn parse_pattern(&mut self, ctx: PatternContext) -> Pat {
        self.nested(
            |span| Pat::new(PatKind::Ident(placeholder_binding(span)), span),
            |p| match p.try_parse_pattern_inner(ctx) {
                Some(pat) => pat,
                None => {
                    p.missing("a pattern");
                    let span = p.here();
                    Pat::new(PatKind::Ident(placeholder_binding(span)), span)
                }
            },
        )
    }

    /// Parses a pattern if the next token can start one.
    fn try_parse_pattern(&mut self, ctx: PatternContext) -> Option<Pat> {
        if starts_pattern(&self.peek_kind()) {
            Some(self.parse_pattern(ctx))
        } else {
            None
        }
    }

    fn try_parse_pattern_inner(&mut self, ctx: PatternContext) -> Option<Pat> {
        let token = self.peek();
        let start = token.span();
        let pat = match token.into_kind() {
            TokenKind::Identifier(name) if name == "_" => {
                self.advance();
                Pat::new(PatKind::Wildcard, start)
            }
            TokenKind::Identifier(_) => self.parse_identifier_pattern(ctx),
            TokenKind::Number(raw) => {
                self.advance();
                Pat::new(PatKind::Literal(Literal::number(raw)), start)
            }
            TokenKind::Minus => {
                self.advance();
                let TokenKind::Number(raw) = self.peek_kind() else {
                    self.expected("a number after '-'");
                    return Some(Pat::new(
                        PatKind::Ident(placeholder_binding(self.here())),
                        self.span_from(start),
                    ));
                };
                self.advance();
                let literal = Literal::number(format!("-{raw}"));
                Pat::new(PatKind::Literal(literal), self.span_from(start))
            }
            TokenKind::String(value) => {
                self.advance();
                Pat::new(PatKind::Literal(Literal::String(value)), start)
            }
            TokenKind::True | TokenKind::False => {
                let value = self.advance().kind() == &TokenKind::True;
                Pat::new(PatKind::Literal(Literal::Boolean(value)), start)
            }
            TokenKind::Null => {
                self.advance();
                Pat::new(PatKind::Literal(Literal::Null), start)
            }
            TokenKind::Undefined => {
                self.advance();
                Pat::new(PatKind::Literal(Literal::Undefined), start)
            }
            TokenKind::LeftBracket => {
                let elems =
                    self.parse_delimited(&TokenKind::RightBracket, |p| p.parse_tuple_elem(ctx));
                self.check_rest_last(elems.iter().map(rest_flag));
                Pat::new(PatKind::Tuple(elems), self.span_from(start))
            }
            TokenKind::LeftBrace => {
                let elems = self.parse_obj_pat_elems(ctx);
                Pat::new(PatKind::Object(elems), self.span_from(start))
            }
            _ => return None,
        };
        Some(pat)
    }

    /// Looks past `Ident (. Ident)*` without committing, to see what kind of
    /// pattern this is.
    fn classify_identifier_chain(&mut self) -> ChainFollower {
        let saved = self.save_lexer();
        self.consume_raw();
        let mut dotted = false;
        loop {
            if !matches!(self.peek_kind(), TokenKind::Dot) {
                break;
            }
            self.consume_raw();
            if !self.peek_kind().is_identifier() {
                break;
            }
            self.consume_raw();
            dotted = true;
        }
        let follower = match self.peek_kind() {
            TokenKind::LeftParen => ChainFollower::Extractor,
            TokenKind::LeftBrace => ChainFollower::Instance,
            _ if dotted => ChainFollower::BareChain,
            _ => ChainFollower::Binding,
        };
        self.restore_lexer(saved);
        follower
    }

    /// Parses a binding, extractor or instance pattern.
    fn parse_identifier_pattern(&mut self, ctx: PatternContext) -> Pat {
        let start = self.start_span();
        match self.classify_identifier_chain() {
            ChainFollower::Extractor => {
                let name = self.parse_qualified_ident();
                let args =
                    self.parse_delimited(&TokenKind::RightParen, |p| p.parse_tuple_elem(ctx));
                self.check_rest_last(args.iter().map(rest_flag));
                Pat::new(PatKind::Extractor { name, args }, self.span_from(start))
            }
            ChainFollower::Instance => {
                let name = self.parse_qualified_ident();
                let elems = self.parse_obj_pat_elems(ctx);
                Pat::new(PatKind::Instance { name, elems }, self.span_from(start))
            }
            ChainFollower::BareChain => {
                let name = self.parse_qualified_ident();
                self.report(
                    Diagnostic::syntax(
                        format!("Expected '(' or '{{' after '{}'", name.dotted()),
                        name.span,
                    )
                    .with_hint("a dotted name in a pattern must be an extractor or instance pattern"),
                );
                Pat::new(
                    PatKind::Extractor {
                        name,
                        args: Vec::new(),
                    },
                    self.span_from(start),
                )
            }
            ChainFollower::Binding => {
                let name = self.expect_ident("an identifier");
                let binding = self.parse_binding_rest(name, ctx);
                Pat::new(PatKind::Ident(binding), self.span_from(start))
            }
        }
    }

    /// Parses what may follow a bound name: `: T` and `= default`,
    /// depending on the context.
    fn parse_binding_rest(&mut self, name: Ident, ctx: PatternContext) -> BindingIdent {
        if ctx == PatternContext::Head {
            return BindingIdent {
                name,
                type_ann: None,
                default: None,
            };
        }
        let type_ann = self
            .eat(&TokenKind::Colon)
            .map(|_| self.parse_type_ann());
        let default = if let Some(assign) = self.eat(&TokenKind::Assign) {
            if ctx == PatternContext::MatchArm {
                self.report(Diagnostic::syntax(
                    "Default values are not allowed in match patterns",
                    assign.span(),
                ));
            }
            Some(Box::new(self.parse_expr()))
        } else {
            None
        };
        BindingIdent {
            name,
            type_ann,
            default,
        }
    }

    /// Parses a tuple or extractor element: `...pat` or a pattern.
    fn parse_tuple_elem(&mut self, ctx: PatternContext) -> Option<Pat> {
        if let Some(dots) = self.eat(&TokenKind::DotDotDot) {
            let arg = self.parse_pattern(ctx.element());
            let span = self.span_from(dots.span());
            return Some(Pat::new(PatKind::Rest(Box::new(arg)), span));
        }
        self.try_parse_pattern(ctx.element())
    }

    /// Parses `{ elem, ... }` for object and instance patterns.
    fn parse_obj_pat_elems(&mut self, ctx: PatternContext) -> Vec<ObjPatElem> {
        let elems = self.parse_delimited(&TokenKind::RightBrace, |p| p.parse_obj_pat_elem(ctx));
        self.check_rest_last(
            elems
                .iter()
                .map(|e| (matches!(e, ObjPatElem::Rest { .. }), e.span())),
        );
        elems
    }

    fn parse_obj_pat_elem(&mut self, ctx: PatternContext) -> Option<ObjPatElem> {
        let token = self.peek();
        let start = token.span();
        if let Some(dots) = self.eat(&TokenKind::DotDotDot) {
            let arg = self.parse_pattern(ctx.element());
            return Some(ObjPatElem::Rest {
                arg,
                span: self.span_from(dots.span()),
            });
        }
        let name = token.kind().property_name()?;
        let key = Ident::new(name, start);
        if !token.kind().is_identifier() && !matches!(self.peek_nth_kind(1), TokenKind::Colon) {
            // Reserved words may be keys but never bindings.
            return None;
        }
        self.advance();
        if self.eat(&TokenKind::Colon).is_some() {
            let value = self.parse_pattern(ctx.element());
            return Some(ObjPatElem::KeyValue {
                key,
                value,
                span: self.span_from(start),
            });
        }
        let default = if let Some(assign) = self.eat(&TokenKind::Assign) {
            if ctx == PatternContext::MatchArm {
                self.report(Diagnostic::syntax(
                    "Default values are not allowed in match patterns",
                    assign.span(),
                ));
            }
            Some(self.parse_expr())
        } else {
            None
        };
        Some(ObjPatElem::Shorthand {
            key,
            default,
            span: self.span_from(start),
        })
    }

    /// Reports rest elements that are not last.
    fn check_rest_last(&mut self, elems: impl Iterator<Item = (bool, Span)>) {
        let elems: Vec<_> = elems.collect();
        let Some(last) = elems.len().checked_sub(1) else {
            return;
        };
        for (i, (is_rest, span)) in elems.into_iter().enumerate() {
            if is_rest && i != last {
                self.report(Diagnostic::syntax("A rest element must be last", span));
            }
        }
    }

    /// Parses `Foo.Bar.Baz`. The first segment must be an identifier; a dot
    /// is only consumed when an identifier follows it.
    pub(super) fn parse_qualified_ident(&mut self) -> QualifiedIdent {
        let first = self.expect_ident("an identifier");
        let mut span = first.span;
        let mut parts = vec![first];
        while self.check(&TokenKind::Dot) && self.peek_nth_kind(1).is_identifier() {
            self.advance();
            let part = self.expect_ident("an identifier");
            span = span.merge(part.span);
            parts.push(part);
        }
        QualifiedIdent { parts, span }
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Parses `( param, ... )`.
    pub(super) fn parse_params(&mut self) -> Vec<Param> {
        let params = self.parse_delimited(&TokenKind::RightParen, Self::parse_param);
        let rest: Vec<_> = params
            .iter()
            .map(|p| (matches!(p.pattern.kind, PatKind::Rest(_)), p.span))
            .collect();
        self.check_rest_last(rest.into_iter());
        params
    }

    /// Parses `mut? ...? pattern ?? (: T)? (= default)?`.
    fn parse_param(&mut self) -> Option<Param> {
        let start = self.start_span();
        let is_mut = self.eat(&TokenKind::Mut).is_some();
        let pattern = if let Some(dots) = self.eat(&TokenKind::DotDotDot) {
            let arg = self.parse_pattern(PatternContext::Head);
            Pat::new(PatKind::Rest(Box::new(arg)), self.span_from(dots.span()))
        } else if starts_pattern(&self.peek_kind()) {
            self.parse_pattern(PatternContext::Head)
        } else if is_mut {
            self.missing("a parameter name after 'mut'");
            let span = self.here();
            Pat::new(PatKind::Ident(placeholder_binding(span)), span)
        } else {
            return None;
        };
        let optional = self.eat(&TokenKind::Question).is_some();
        let type_ann = self
            .eat(&TokenKind::Colon)
            .map(|_| self.with_marker(Marker::Delim, Self::parse_type_ann));
        let default = self.eat(&TokenKind::Assign).map(|_| self.parse_expr());
        Some(Param {
            pattern,
            is_mut,
            optional,
            type_ann,
            default,
            span: self.span_from(start),
        })
    }
}

fn rest_flag(pat: &Pat) -> (bool, Span) {
    (matches!(pat.kind, PatKind::Rest(_)), pat.span)
}

fn placeholder_binding(span: Span) -> BindingIdent {
    BindingIdent {
        name: Ident::placeholder(span),
        type_ann: None,
        default: None,
    }
}
