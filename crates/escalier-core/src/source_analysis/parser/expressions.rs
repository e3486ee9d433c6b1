// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing.
//!
//! Binary operators are parsed by precedence climbing over two explicit
//! stacks (operands and pending operators), so long operator chains never
//! recurse. Prefix operators are collected before each operand and applied
//! after its suffix chain, so `-a.b()` is `-(a.b())`.

use ecow::EcoString;

use super::{Diagnostic, Marker, Parser, PatternContext};
use crate::ast::{
    AssignOp, BinaryOp, Block, Body, CatchClause, Expr, ExprKind, ExprOrSpread, Function, Ident,
    IfElseAlt, Literal, MatchArm, ObjProp, PropKey, Template, TemplateElement, UnaryOp,
};
use crate::source_analysis::{QuasiEnd, Span, TokenKind};

// ============================================================================
// Operator table
// ============================================================================

/// Binding power for infix operators.
///
/// Higher values bind more tightly. Left-associative operators have
/// `right > left`, right-associative ones `left > right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BindingPower {
    /// How tightly the operator binds to its left operand.
    pub(super) left: u8,
    /// How tightly the operator binds to its right operand.
    pub(super) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    /// Creates a right-associative binding power.
    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence + 1,
            right: precedence,
        }
    }
}

/// An infix operator: binary or assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Infix {
    Binary(BinaryOp),
    Assign(AssignOp),
}

/// Maps a token to its infix operator and binding power.
///
/// Assignment is the lowest tier and right-associative; everything else is
/// left-associative.
fn infix_operator(kind: &TokenKind) -> Option<(Infix, BindingPower)> {
    use BinaryOp as B;
    let (op, bp) = match kind {
        TokenKind::Assign => (Infix::Assign(AssignOp::Assign), BindingPower::right_assoc(1)),
        TokenKind::PlusAssign => (Infix::Assign(AssignOp::PlusAssign), BindingPower::right_assoc(1)),
        TokenKind::MinusAssign => {
            (Infix::Assign(AssignOp::MinusAssign), BindingPower::right_assoc(1))
        }
        TokenKind::StarAssign => {
            (Infix::Assign(AssignOp::TimesAssign), BindingPower::right_assoc(1))
        }
        TokenKind::SlashAssign => {
            (Infix::Assign(AssignOp::DivideAssign), BindingPower::right_assoc(1))
        }
        TokenKind::PercentAssign => {
            (Infix::Assign(AssignOp::ModuloAssign), BindingPower::right_assoc(1))
        }

        TokenKind::PipePipe => (Infix::Binary(B::Or), BindingPower::left_assoc(10)),
        TokenKind::QuestionQuestion => {
            (Infix::Binary(B::NullishCoalescing), BindingPower::left_assoc(10))
        }
        TokenKind::AmpAmp => (Infix::Binary(B::And), BindingPower::left_assoc(20)),

        TokenKind::EqualEqual => (Infix::Binary(B::Equals), BindingPower::left_assoc(30)),
        TokenKind::BangEqual => (Infix::Binary(B::NotEquals), BindingPower::left_assoc(30)),

        TokenKind::LessThan => (Infix::Binary(B::LessThan), BindingPower::left_assoc(40)),
        TokenKind::LessThanEqual => {
            (Infix::Binary(B::LessThanOrEqual), BindingPower::left_assoc(40))
        }
        TokenKind::GreaterThan => (Infix::Binary(B::GreaterThan), BindingPower::left_assoc(40)),
        TokenKind::GreaterThanEqual => {
            (Infix::Binary(B::GreaterThanOrEqual), BindingPower::left_assoc(40))
        }

        TokenKind::Plus => (Infix::Binary(B::Plus), BindingPower::left_assoc(50)),
        TokenKind::Minus => (Infix::Binary(B::Minus), BindingPower::left_assoc(50)),

        TokenKind::Star => (Infix::Binary(B::Times), BindingPower::left_assoc(60)),
        TokenKind::Slash => (Infix::Binary(B::Divide), BindingPower::left_assoc(60)),
        TokenKind::Percent => (Infix::Binary(B::Modulo), BindingPower::left_assoc(60)),

        _ => return None,
    };
    Some((op, bp))
}

/// Tokens that start a primary expression.
fn starts_primary(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::Regex(..)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Undefined
            | TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::BackTick
            | TokenKind::LessThan
            | TokenKind::Fn
            | TokenKind::Async
            | TokenKind::If
            | TokenKind::Match
            | TokenKind::Try
            | TokenKind::Do
            | TokenKind::Throw
            | TokenKind::Yield
    )
}

/// Tokens that start an expression: primaries plus prefix operators.
pub(super) fn starts_expression(kind: &TokenKind) -> bool {
    starts_primary(kind)
        || matches!(
            kind,
            TokenKind::Minus | TokenKind::Plus | TokenKind::Bang | TokenKind::Await
        )
}

/// Tokens an expression never swallows during recovery: closers,
/// separators and anything that starts a statement or clause.
fn ends_expression_recovery(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eof
            | TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::Arrow
            | TokenKind::FatArrow
            | TokenKind::LessThanSlash
            | TokenKind::Val
            | TokenKind::Var
            | TokenKind::Type
            | TokenKind::Class
            | TokenKind::Return
            | TokenKind::For
            | TokenKind::In
            | TokenKind::Export
            | TokenKind::Declare
            | TokenKind::Else
            | TokenKind::Catch
            | TokenKind::Finally
            | TokenKind::Extends
    )
}

/// A collected prefix operator.
#[derive(Debug, Clone, Copy)]
enum Prefix {
    Unary(UnaryOp),
    Await,
}

// ============================================================================
// Expressions
// ============================================================================

impl Parser<'_> {
    /// Parses an expression, including assignment.
    ///
    /// Always returns an expression; a missing one is reported and replaced
    /// by [`ExprKind::Empty`].
    pub(super) fn parse_expr(&mut self) -> Expr {
        self.nested(Expr::empty, Self::parse_binary)
    }

    /// Parses an expression if the next token can start one.
    ///
    /// Returns `None` without reporting otherwise, leaving the caller's
    /// delimiter check to say what was found.
    pub(super) fn try_parse_expr(&mut self) -> Option<Expr> {
        if starts_expression(&self.peek_kind()) {
            Some(self.parse_expr())
        } else {
            None
        }
    }

    /// Parses `...expr` or `expr`, for array elements and call arguments.
    pub(super) fn parse_expr_or_spread(&mut self) -> Option<ExprOrSpread> {
        if let Some(dots) = self.eat(&TokenKind::DotDotDot) {
            let arg = self.parse_expr();
            let span = self.span_from(dots.span());
            return Some(ExprOrSpread::Spread { arg, span });
        }
        self.try_parse_expr().map(ExprOrSpread::Expr)
    }

    /// Precedence climbing over explicit operand and operator stacks.
    fn parse_binary(&mut self) -> Expr {
        let mut operands = vec![self.parse_operand()];
        let mut operators: Vec<(Infix, BindingPower)> = Vec::new();

        while self.check_deadline() {
            let token = self.peek();
            let Some((op, bp)) = infix_operator(token.kind()) else {
                break;
            };
            if !self.continues(&token) {
                break;
            }

            // Reduce eagerly so equal precedence associates to the left.
            while let Some(&(top, top_bp)) = operators.last()
                && top_bp.right > bp.left
            {
                operators.pop();
                Self::reduce(&mut operands, top);
            }

            self.advance();
            operators.push((op, bp));
            operands.push(self.parse_operand());
        }

        while let Some((op, _)) = operators.pop() {
            Self::reduce(&mut operands, op);
        }

        operands
            .pop()
            .unwrap_or_else(|| Expr::empty(self.here()))
    }

    /// Pops two operands and pushes their combination under `op`.
    fn reduce(operands: &mut Vec<Expr>, op: Infix) {
        let (Some(right), Some(left)) = (operands.pop(), operands.pop()) else {
            return;
        };
        let span = left.span.merge(right.span);
        let kind = match op {
            Infix::Binary(op) => ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Infix::Assign(op) => ExprKind::Assign {
                op,
                target: Box::new(left),
                value: Box::new(right),
            },
        };
        operands.push(Expr::new(kind, span));
    }

    /// Skips tokens until one satisfying `starts` appears.
    ///
    /// The first skipped token is reported; lexer error tokens were already
    /// reported when lexed. Returns `false`, after reporting the missing
    /// expression if nothing else was, when a token that ends the expression
    /// is reached first.
    fn recover_to(&mut self, starts: fn(&TokenKind) -> bool) -> bool {
        let mut reported = false;
        loop {
            let token = self.peek();
            if starts(token.kind()) {
                return true;
            }
            if !self.check_deadline() || ends_expression_recovery(token.kind()) {
                if !reported {
                    self.missing("an expression");
                }
                return false;
            }
            if !reported && !token.kind().is_error() {
                self.report(Diagnostic::syntax(
                    format!("Expected an expression but got {}", token.kind().describe()),
                    token.span(),
                ));
            }
            reported = true;
            self.advance();
        }
    }

    /// Parses prefix operators, a primary and its suffix chain.
    fn parse_operand(&mut self) -> Expr {
        if !self.recover_to(starts_expression) {
            return Expr::empty(self.here());
        }

        let mut prefixes = Vec::new();
        loop {
            let prefix = match self.peek_kind() {
                TokenKind::Minus => Prefix::Unary(UnaryOp::Minus),
                TokenKind::Plus => Prefix::Unary(UnaryOp::Plus),
                TokenKind::Bang => Prefix::Unary(UnaryOp::Not),
                TokenKind::Await => Prefix::Await,
                _ => break,
            };
            let token = self.advance();
            prefixes.push((prefix, token.span()));
        }

        let mut expr = if self.recover_to(starts_primary) {
            let primary = self.parse_primary();
            self.parse_suffixes(primary)
        } else {
            Expr::empty(self.here())
        };

        for (prefix, span) in prefixes.into_iter().rev() {
            let span = span.merge(expr.span);
            let kind = match prefix {
                Prefix::Unary(op) => ExprKind::Unary {
                    op,
                    arg: Box::new(expr),
                },
                Prefix::Await => ExprKind::Await(Box::new(expr)),
            };
            expr = Expr::new(kind, span);
        }
        expr
    }

    /// Applies calls, indexing, member access and template tags.
    ///
    /// A suffix on a new line only applies inside a delimited context, so
    /// `foo\n(bar)` is two statements.
    fn parse_suffixes(&mut self, mut expr: Expr) -> Expr {
        while self.check_deadline() {
            let token = self.peek();
            if !self.continues(&token) {
                break;
            }
            expr = match token.kind() {
                TokenKind::LeftParen | TokenKind::QuestionParen => {
                    let optional = matches!(token.kind(), TokenKind::QuestionParen);
                    let args = self.parse_delimited(&TokenKind::RightParen, Self::parse_expr_or_spread);
                    let span = expr.span.merge(self.here());
                    Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                            optional,
                        },
                        span,
                    )
                }
                TokenKind::LeftBracket | TokenKind::QuestionBracket => {
                    let optional = matches!(token.kind(), TokenKind::QuestionBracket);
                    self.advance();
                    let index = self.with_marker(Marker::Delim, Self::parse_expr);
                    self.expect(&TokenKind::RightBracket);
                    let span = expr.span.merge(self.here());
                    Expr::new(
                        ExprKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                            optional,
                        },
                        span,
                    )
                }
                TokenKind::Dot | TokenKind::QuestionDot => {
                    let optional = matches!(token.kind(), TokenKind::QuestionDot);
                    self.advance();
                    let property = self.parse_property_name();
                    let span = expr.span.merge(self.here());
                    Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property,
                            optional,
                        },
                        span,
                    )
                }
                TokenKind::BackTick => {
                    let template = self.parse_template();
                    let span = expr.span.merge(template.span);
                    Expr::new(
                        ExprKind::TaggedTemplate {
                            tag: Box::new(expr),
                            template,
                        },
                        span,
                    )
                }
                _ => break,
            };
        }
        expr
    }

    /// Parses the name after `.` or `?.`.
    ///
    /// Reserved words are valid property names on the same line. A missing
    /// name becomes a placeholder so the suffix chain can continue.
    fn parse_property_name(&mut self) -> Ident {
        let token = self.peek();
        let same_line = !self.is_on_new_line(&token);
        if let Some(name) = token.kind().property_name()
            && (token.kind().is_identifier() || same_line)
        {
            self.advance();
            return Ident::new(name, token.span());
        }
        self.missing("a property name after '.'");
        Ident::placeholder(self.here())
    }

    // ========================================================================
    // Primaries
    // ========================================================================

    /// Parses a primary expression. The next token must satisfy
    /// `starts_primary`.
    fn parse_primary(&mut self) -> Expr {
        let token = self.peek();
        let span = token.span();
        let literal = |p: &mut Self, literal: Literal| {
            p.advance();
            Expr::new(ExprKind::Literal(literal), span)
        };
        match token.into_kind() {
            TokenKind::Identifier(name) => {
                self.advance();
                Expr::new(ExprKind::Ident(Ident::new(name, span)), span)
            }
            TokenKind::Number(raw) => literal(self, Literal::number(raw)),
            TokenKind::String(value) => literal(self, Literal::String(value)),
            TokenKind::Regex(pattern, flags) => literal(self, Literal::Regex { pattern, flags }),
            TokenKind::True => literal(self, Literal::Boolean(true)),
            TokenKind::False => literal(self, Literal::Boolean(false)),
            TokenKind::Null => literal(self, Literal::Null),
            TokenKind::Undefined => literal(self, Literal::Undefined),
            TokenKind::LeftParen => self.parse_paren_expr(),
            TokenKind::LeftBracket => {
                let elems = self.parse_delimited(&TokenKind::RightBracket, Self::parse_expr_or_spread);
                Expr::new(ExprKind::Array(elems), self.span_from(span))
            }
            TokenKind::LeftBrace => {
                let props = self.parse_delimited(&TokenKind::RightBrace, Self::parse_obj_prop);
                Expr::new(ExprKind::Object(props), self.span_from(span))
            }
            TokenKind::BackTick => {
                let template = self.parse_template();
                let span = template.span;
                Expr::new(ExprKind::Template(template), span)
            }
            TokenKind::LessThan => self.parse_jsx(),
            TokenKind::Fn | TokenKind::Async => self.parse_function_expr(),
            TokenKind::If => self.parse_if_else(),
            TokenKind::Match => self.parse_match(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Do => {
                self.advance();
                let block = self.parse_block();
                Expr::new(ExprKind::Do(block), self.span_from(span))
            }
            TokenKind::Throw => {
                self.advance();
                let arg = self.parse_expr();
                Expr::new(ExprKind::Throw(Box::new(arg)), self.span_from(span))
            }
            TokenKind::Yield => {
                self.advance();
                let next = self.peek();
                let arg = if starts_expression(next.kind()) && self.continues(&next) {
                    Some(Box::new(self.parse_expr()))
                } else {
                    None
                };
                Expr::new(ExprKind::Yield(arg), self.span_from(span))
            }
            _ => {
                self.missing("an expression");
                Expr::empty(self.here())
            }
        }
    }

    /// Parses `( expr )`. The result is the inner expression with its span
    /// widened to cover the parentheses.
    fn parse_paren_expr(&mut self) -> Expr {
        let open = self.advance();
        let mut expr = self.with_marker(Marker::Delim, Self::parse_expr);
        self.expect(&TokenKind::RightParen);
        expr.span = self.span_from(open.span()).merge(expr.span);
        expr
    }

    /// Parses one object-literal member.
    fn parse_obj_prop(&mut self) -> Option<ObjProp> {
        let token = self.peek();
        let start = token.span();
        match token.kind() {
            TokenKind::DotDotDot => {
                self.advance();
                let arg = self.parse_expr();
                Some(ObjProp::Spread {
                    arg,
                    span: self.span_from(start),
                })
            }
            TokenKind::Identifier(name) if !self.peek_second_kind_is(&TokenKind::Colon) => {
                let ident = Ident::new(name.clone(), start);
                self.advance();
                Some(ObjProp::Shorthand(ident))
            }
            _ => {
                let key = self.parse_prop_key()?;
                self.expect(&TokenKind::Colon);
                let value = self.parse_expr();
                Some(ObjProp::KeyValue {
                    key,
                    value,
                    span: self.span_from(start),
                })
            }
        }
    }

    fn peek_second_kind_is(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek_nth_kind(1)) == std::mem::discriminant(kind)
    }

    /// Parses a property key: a name (reserved words included), a string, a
    /// number, or `[expr]`.
    ///
    /// Returns `None` without consuming if nothing here can be a key.
    pub(super) fn parse_prop_key(&mut self) -> Option<PropKey> {
        let token = self.peek();
        let span = token.span();
        let key = match token.kind() {
            TokenKind::String(value) => PropKey::String(value.clone(), span),
            TokenKind::Number(raw) => PropKey::Number(raw.clone(), span),
            TokenKind::LeftBracket => {
                self.advance();
                let expr = self.with_marker(Marker::Delim, Self::parse_expr);
                self.expect(&TokenKind::RightBracket);
                return Some(PropKey::Computed(Box::new(expr), self.span_from(span)));
            }
            kind => PropKey::Ident(Ident::new(kind.property_name()?, span)),
        };
        self.advance();
        Some(key)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Parses `fn ...` or `async fn ...` in expression position.
    fn parse_function_expr(&mut self) -> Expr {
        let start = self.start_span();
        let is_async = self.eat(&TokenKind::Async).is_some();
        self.expect(&TokenKind::Fn);
        let mut function = self.parse_function_signature(start, is_async);
        let body = match self.parse_function_body() {
            Some(body) => body,
            None => {
                self.missing("a function body");
                Body::Block(Block {
                    stmts: Vec::new(),
                    span: self.here(),
                })
            }
        };
        function.body = Some(body);
        function.span = self.span_from(start);
        let span = function.span;
        Expr::new(ExprKind::Function(Box::new(function)), span)
    }

    /// Parses type parameters, parameters, return type and `throws` clause.
    ///
    /// The body is left to the caller; the returned function has none.
    pub(super) fn parse_function_signature(&mut self, start: Span, is_async: bool) -> Function {
        let type_params = if self.check(&TokenKind::LessThan) {
            self.parse_type_params()
        } else {
            Vec::new()
        };
        let params = if self.check(&TokenKind::LeftParen) {
            self.parse_params()
        } else {
            self.expected("'('");
            Vec::new()
        };
        let return_type = self
            .eat(&TokenKind::Arrow)
            .map(|_| self.parse_type_ann());
        let throws = self
            .eat_contextual("throws")
            .map(|_| self.parse_type_ann());
        Function {
            type_params,
            params,
            return_type,
            throws,
            body: None,
            is_async,
            span: self.span_from(start),
        }
    }

    /// Parses `{ block }` or `=> expr` if present.
    pub(super) fn parse_function_body(&mut self) -> Option<Body> {
        if self.check(&TokenKind::LeftBrace) {
            return Some(Body::Block(self.parse_block()));
        }
        if self.eat(&TokenKind::FatArrow).is_some() {
            return Some(Body::Expr(Box::new(self.parse_expr())));
        }
        None
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// Parses `if cond { ... } (else if ... | else { ... })?`.
    fn parse_if_else(&mut self) -> Expr {
        let start = self.advance().span();
        let cond = self.with_marker(Marker::Delim, Self::parse_expr);
        let consequent = self.parse_block();
        let alternate = if self.eat(&TokenKind::Else).is_some() {
            if self.check(&TokenKind::If) {
                let nested = self.nested(Expr::empty, Self::parse_if_else);
                Some(IfElseAlt::IfElse(Box::new(nested)))
            } else {
                Some(IfElseAlt::Block(self.parse_block()))
            }
        } else {
            None
        };
        Expr::new(
            ExprKind::IfElse {
                cond: Box::new(cond),
                consequent,
                alternate,
            },
            self.span_from(start),
        )
    }

    /// Parses `match value { arms }`.
    fn parse_match(&mut self) -> Expr {
        let start = self.advance().span();
        let value = self.with_marker(Marker::Delim, Self::parse_expr);
        let arms = self.parse_match_arms();
        Expr::new(
            ExprKind::Match {
                value: Box::new(value),
                arms,
            },
            self.span_from(start),
        )
    }

    /// Parses `{ pattern (if guard)? => body, ... }`.
    ///
    /// Arms are separated by commas; an arm whose body is a block may omit
    /// the comma.
    pub(super) fn parse_match_arms(&mut self) -> Vec<MatchArm> {
        let mut arms = Vec::new();
        if self.expect(&TokenKind::LeftBrace).is_none() {
            return arms;
        }
        self.with_marker(Marker::Expr, |p| {
            while p.check_deadline() {
                if p.check(&TokenKind::RightBrace) || p.peek_kind().is_eof() {
                    break;
                }
                let before = p.offset();
                let arm = p.parse_match_arm();
                let block_body = matches!(arm.body, Body::Block(_));
                arms.push(arm);
                if p.eat(&TokenKind::Comma).is_some()
                    || block_body
                    || p.check(&TokenKind::RightBrace)
                {
                    continue;
                }
                p.expected("',' or '}'");
                if p.offset() == before {
                    p.advance();
                }
            }
        });
        self.expect(&TokenKind::RightBrace);
        arms
    }

    fn parse_match_arm(&mut self) -> MatchArm {
        let start = self.start_span();
        let pattern = self.parse_pattern(PatternContext::MatchArm);
        let guard = self
            .eat(&TokenKind::If)
            .map(|_| self.with_marker(Marker::Delim, Self::parse_expr));
        self.expect(&TokenKind::FatArrow);
        let body = if self.check(&TokenKind::LeftBrace) {
            Body::Block(self.parse_block())
        } else {
            Body::Expr(Box::new(self.parse_expr()))
        };
        MatchArm {
            pattern,
            guard,
            body,
            span: self.span_from(start),
        }
    }

    /// Parses `try { ... } catch { arms } finally { ... }`.
    fn parse_try(&mut self) -> Expr {
        let start = self.advance().span();
        let body = self.parse_block();
        let catch = self.eat(&TokenKind::Catch).map(|token| {
            let arms = self.parse_match_arms();
            CatchClause {
                arms,
                span: self.span_from(token.span()),
            }
        });
        let finally = self
            .eat(&TokenKind::Finally)
            .map(|_| self.parse_block());
        if catch.is_none() && finally.is_none() {
            self.expected("'catch' or 'finally'");
        }
        Expr::new(
            ExprKind::Try {
                body,
                catch,
                finally,
            },
            self.span_from(start),
        )
    }

    // ========================================================================
    // Template literals
    // ========================================================================

    /// Parses a template literal starting at its opening backtick.
    ///
    /// Text chunks come from [`crate::source_analysis::Lexer::lex_quasi`];
    /// each `${` is followed by an expression and a `}`.
    pub(super) fn parse_template(&mut self) -> Template {
        let start = self.advance().span();
        let mut quasis = Vec::new();
        let mut exprs = Vec::new();
        loop {
            let chunk = self.lex_quasi();
            let span = chunk.span();
            let TokenKind::Quasi(raw, end) = chunk.into_kind() else {
                break;
            };
            quasis.push(TemplateElement { raw, span });
            if end != QuasiEnd::Interpolation || !self.check_deadline() {
                break;
            }
            let expr = self.with_marker(Marker::Delim, |p| {
                if p.check(&TokenKind::RightBrace) {
                    p.missing("an expression in template interpolation");
                    Expr::empty(p.here())
                } else {
                    p.parse_expr()
                }
            });
            exprs.push(expr);
            if self.eat(&TokenKind::RightBrace).is_none() {
                self.expected("'}'");
                if !self.skip_to_closing_brace() {
                    break;
                }
            }
        }
        // Keep one more text chunk than expressions even when cut short.
        while quasis.len() <= exprs.len() {
            quasis.push(TemplateElement {
                raw: EcoString::new(),
                span: self.here(),
            });
        }
        Template {
            quasis,
            exprs,
            span: self.span_from(start),
        }
    }

    /// Skips to and consumes the `}` closing an interpolation. Returns
    /// `false` if input ended first.
    fn skip_to_closing_brace(&mut self) -> bool {
        let mut depth = 0usize;
        while self.check_deadline() {
            match self.peek_kind() {
                TokenKind::Eof => return false,
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => {
                    if depth == 0 {
                        self.advance();
                        return true;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_ok};
    use super::*;
    use crate::ast::{DeclKind, StmtKind};

    fn expr(text: &str) -> Expr {
        let mut script = parse_ok(text);
        assert_eq!(script.stmts.len(), 1, "expected one statement in {text:?}");
        match script.stmts.remove(0).kind {
            StmtKind::Expr(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    /// Renders an expression as a fully parenthesized string.
    fn show(expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Empty => "<empty>".to_string(),
            ExprKind::Ident(ident) => ident.name.to_string(),
            ExprKind::Literal(Literal::Number { raw, .. }) => raw.to_string(),
            ExprKind::Literal(Literal::String(s)) => format!("{s:?}"),
            ExprKind::Literal(other) => format!("{other:?}"),
            ExprKind::Unary { op, arg } => format!("({}{})", op.as_str(), show(arg)),
            ExprKind::Binary { op, left, right } => {
                format!("({} {} {})", show(left), op.as_str(), show(right))
            }
            ExprKind::Assign { target, value, .. } => {
                format!("({} = {})", show(target), show(value))
            }
            ExprKind::Member {
                object,
                property,
                optional,
            } => format!(
                "{}{}{}",
                show(object),
                if *optional { "?." } else { "." },
                property.name
            ),
            ExprKind::Call { callee, args, .. } => {
                let args: Vec<_> = args.iter().map(|a| show(a.expr())).collect();
                format!("{}({})", show(callee), args.join(", "))
            }
            ExprKind::Index { object, index, .. } => format!("{}[{}]", show(object), show(index)),
            ExprKind::Await(arg) => format!("(await {})", show(arg)),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        assert_eq!(show(&expr("a * b + c * d")), "((a * b) + (c * d))");
    }

    #[test]
    fn member_binds_tighter_than_binary() {
        assert_eq!(show(&expr("a + b.c")), "(a + b.c)");
    }

    #[test]
    fn equal_precedence_is_left_associative() {
        assert_eq!(show(&expr("a - b - c")), "((a - b) - c)");
        assert_eq!(show(&expr("a / b * c")), "((a / b) * c)");
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(show(&expr("a = b = c + 1")), "(a = (b = (c + 1)))");
    }

    #[test]
    fn logical_precedence() {
        assert_eq!(show(&expr("a || b && c == d")), "(a || (b && (c == d)))");
        assert_eq!(show(&expr("a ?? b || c")), "((a ?? b) || c)");
        assert_eq!(show(&expr("a < b == c >= d")), "((a < b) == (c >= d))");
    }

    #[test]
    fn prefix_applies_after_suffixes() {
        assert_eq!(show(&expr("-a.b(c)")), "(-a.b(c))");
        assert_eq!(show(&expr("!-x")), "(!(-x))");
        assert_eq!(show(&expr("await f() + 1")), "((await f()) + 1)");
    }

    #[test]
    fn suffix_chain() {
        assert_eq!(show(&expr("a.b[c](d)?.e")), "a.b[c](d)?.e");
        let e = expr("f?(x)");
        assert!(matches!(e.kind, ExprKind::Call { optional: true, .. }));
        let e = expr("xs?[0]");
        assert!(matches!(e.kind, ExprKind::Index { optional: true, .. }));
    }

    #[test]
    fn keyword_property_names() {
        assert_eq!(show(&expr("promise.catch(f).finally(g)")), "promise.catch(f).finally(g)");
    }

    #[test]
    fn parens_group_and_widen_span() {
        let e = expr("(a + b) * c");
        assert_eq!(show(&e), "((a + b) * c)");
        let ExprKind::Binary { left, .. } = &e.kind else {
            panic!("expected binary");
        };
        assert_eq!(left.span.start().offset, 0);
        assert_eq!(left.span.end().offset, 7);
    }

    #[test]
    fn newline_ends_expression_statement() {
        let script = parse_ok("a\n+ b");
        assert_eq!(script.stmts.len(), 2);
        let script = parse_ok("foo\n(bar)");
        assert_eq!(script.stmts.len(), 2);
    }

    #[test]
    fn newline_continues_inside_delimiters() {
        assert_eq!(show(&expr("(a\n+ b)")), "(a + b)");
        assert_eq!(show(&expr("f(a\n* b)")), "f((a * b))");
    }

    #[test]
    fn trailing_operator_yields_placeholder() {
        let (script, diagnostics) = parse_err("a - b +");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected an expression");
        let StmtKind::Expr(e) = &script.stmts[0].kind else {
            panic!("expected expression statement");
        };
        assert_eq!(show(e), "((a - b) + <empty>)");
    }

    #[test]
    fn unexpected_tokens_are_skipped() {
        let (script, diagnostics) = parse_err("val x = * * 5");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected an expression but got '*'");
        let StmtKind::Decl(decl) = &script.stmts[0].kind else {
            panic!("expected declaration");
        };
        let DeclKind::Var(var) = &decl.kind else {
            panic!("expected val");
        };
        assert_eq!(show(var.init.as_ref().expect("init")), "5");
    }

    #[test]
    fn missing_member_name_keeps_chain() {
        let (script, diagnostics) = parse_err("a.(b)");
        assert_eq!(diagnostics.len(), 1);
        let StmtKind::Expr(e) = &script.stmts[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Call { callee, .. } = &e.kind else {
            panic!("expected call, got {e:?}");
        };
        let ExprKind::Member { property, .. } = &callee.kind else {
            panic!("expected member");
        };
        assert!(property.is_placeholder());
    }

    #[test]
    fn array_and_object_literals() {
        let e = expr("[1, ...xs, 3]");
        let ExprKind::Array(elems) = &e.kind else {
            panic!("expected array");
        };
        assert_eq!(elems.len(), 3);
        assert!(matches!(elems[1], ExprOrSpread::Spread { .. }));

        let e = expr("{x: 1, y, \"z\": 2, 3: 4, [k]: 5, ...rest, if: 6}");
        let ExprKind::Object(props) = &e.kind else {
            panic!("expected object");
        };
        assert_eq!(props.len(), 7);
        assert!(matches!(props[1], ObjProp::Shorthand(_)));
        assert!(matches!(
            &props[4],
            ObjProp::KeyValue {
                key: PropKey::Computed(..),
                ..
            }
        ));
        assert!(matches!(props[5], ObjProp::Spread { .. }));
    }

    #[test]
    fn function_literals() {
        let e = expr("fn (a, b) => a + b");
        let ExprKind::Function(function) = &e.kind else {
            panic!("expected function");
        };
        assert_eq!(function.params.len(), 2);
        assert!(matches!(function.body, Some(Body::Expr(_))));

        let e = expr("async fn <T>(x: T) -> Promise<T> throws Error { return x }");
        let ExprKind::Function(function) = &e.kind else {
            panic!("expected function");
        };
        assert!(function.is_async);
        assert_eq!(function.type_params.len(), 1);
        assert!(function.return_type.is_some());
        assert!(function.throws.is_some());
        assert!(matches!(function.body, Some(Body::Block(_))));
    }

    #[test]
    fn if_else_chain() {
        let e = expr("if a { 1 } else if b { 2 } else { 3 }");
        let ExprKind::IfElse { alternate, .. } = &e.kind else {
            panic!("expected if");
        };
        let Some(IfElseAlt::IfElse(nested)) = alternate else {
            panic!("expected else if");
        };
        assert!(matches!(
            nested.kind,
            ExprKind::IfElse {
                alternate: Some(IfElseAlt::Block(_)),
                ..
            }
        ));
    }

    #[test]
    fn match_arms() {
        let e = expr("match x {\n  0 => \"zero\",\n  n if n < 0 => { \"neg\" }\n  _ => \"pos\"\n}");
        let ExprKind::Match { arms, .. } = &e.kind else {
            panic!("expected match");
        };
        assert_eq!(arms.len(), 3);
        assert!(arms[1].guard.is_some());
    }

    #[test]
    fn match_arm_needs_comma() {
        let (_, diagnostics) = parse_err("match x { 1 => a 2 => b }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Expected ',' or '}' but got number '2'"
        );
    }

    #[test]
    fn try_catch_finally() {
        let e = expr("try { f() } catch { e => 0 } finally { done() }");
        assert!(matches!(
            e.kind,
            ExprKind::Try {
                catch: Some(_),
                finally: Some(_),
                ..
            }
        ));
        let (_, diagnostics) = parse_err("try { f() }");
        assert_eq!(
            diagnostics[0].message,
            "Expected 'catch' or 'finally' but got end of file"
        );
    }

    #[test]
    fn throw_yield_do() {
        assert!(matches!(expr("throw Error(\"x\")").kind, ExprKind::Throw(_)));
        assert!(matches!(expr("yield").kind, ExprKind::Yield(None)));
        assert!(matches!(expr("yield 1 + 2").kind, ExprKind::Yield(Some(_))));
        assert!(matches!(expr("do { val a = 1\n a }").kind, ExprKind::Do(_)));
    }

    #[test]
    fn templates() {
        let e = expr("`a${b}c${d + 1}`");
        let ExprKind::Template(template) = &e.kind else {
            panic!("expected template");
        };
        assert_eq!(template.quasis.len(), 3);
        assert_eq!(template.exprs.len(), 2);
        assert_eq!(template.quasis[1].raw, "c");

        let e = expr("sql`select ${x}`");
        assert!(matches!(e.kind, ExprKind::TaggedTemplate { .. }));
    }

    #[test]
    fn unterminated_template_keeps_shape() {
        let (script, diagnostics) = parse_err("`abc${x");
        assert!(!diagnostics.is_empty());
        let StmtKind::Expr(e) = &script.stmts[0].kind else {
            panic!("expected expression statement");
        };
        let ExprKind::Template(template) = &e.kind else {
            panic!("expected template");
        };
        assert_eq!(template.quasis.len(), template.exprs.len() + 1);
    }

    #[test]
    fn regex_and_division() {
        let e = expr("a / b / c");
        assert_eq!(show(&e), "((a / b) / c)");
        let e = expr("x.match(/ab+c/gi)");
        let ExprKind::Call { args, .. } = &e.kind else {
            panic!("expected call");
        };
        assert!(matches!(
            &args[0].expr().kind,
            ExprKind::Literal(Literal::Regex { flags, .. }) if flags == "gi"
        ));
    }

    #[test]
    fn binding_power_associativity() {
        let left = BindingPower::left_assoc(50);
        assert!(left.right > left.left);
        let right = BindingPower::right_assoc(1);
        assert!(right.left > right.right);
    }
}
