// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement, block and declaration parsing.
//!
//! Statements are separated by line breaks or `;`. Every statement loop has
//! a forward-progress guard: if a statement consumed nothing, one token is
//! skipped so the loop always terminates.

use super::expressions::starts_expression;
use super::{Diagnostic, Marker, Parser, PatternContext};
use crate::ast::{
    Block, Body, ClassDecl, ClassMember, ClassMemberKind, Decl, DeclKind, Expr, FnDecl, Ident,
    MethodKind, PropKey, Stmt, StmtKind, TypeAliasDecl, VarDecl, VarKind,
};
use crate::source_analysis::{Span, TokenKind};

/// Tokens after `static`, `private`, `get` or `set` that make the word a
/// member name rather than a modifier.
fn follows_member_name(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LeftParen
            | TokenKind::LessThan
            | TokenKind::Colon
            | TokenKind::Question
            | TokenKind::Assign
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::RightBrace
            | TokenKind::Eof
    )
}

impl Parser<'_> {
    // ========================================================================
    // Statement lists
    // ========================================================================

    /// Parses statements until end of input.
    pub(super) fn parse_top_level(&mut self) -> Vec<Stmt> {
        self.parse_stmt_list(None)
    }

    /// Parses `{ stmt* }`.
    ///
    /// A missing `{` is reported and yields an empty block; a missing `}` is
    /// reported after the statements that were recovered.
    pub(super) fn parse_block(&mut self) -> Block {
        let placeholder = |span| Block {
            stmts: Vec::new(),
            span,
        };
        self.nested(placeholder, |p| {
            let start = p.start_span();
            if p.expect(&TokenKind::LeftBrace).is_none() {
                return placeholder(p.here());
            }
            let stmts = p.with_marker(Marker::Expr, |p| {
                p.parse_stmt_list(Some(&TokenKind::RightBrace))
            });
            p.expect(&TokenKind::RightBrace);
            Block {
                stmts,
                span: p.span_from(start),
            }
        })
    }

    fn parse_stmt_list(&mut self, terminator: Option<&TokenKind>) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while self.check_deadline() {
            if self.eat(&TokenKind::Semicolon).is_some() {
                continue;
            }
            if self.peek_kind().is_eof() || terminator.is_some_and(|t| self.check(t)) {
                break;
            }
            let before = self.offset();
            let stmt = self.parse_stmt();
            if self.offset() == before {
                // Nothing consumed: the statement already reported the
                // token; skip it.
                self.advance();
                continue;
            }
            stmts.push(stmt);
        }
        stmts
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_stmt(&mut self) -> Stmt {
        let start = self.start_span();
        match self.peek_kind() {
            TokenKind::Return => {
                self.advance();
                let next = self.peek();
                let arg = (!self.is_on_new_line(&next) && starts_expression(next.kind()))
                    .then(|| self.parse_expr());
                Stmt {
                    kind: StmtKind::Return(arg),
                    span: self.span_from(start),
                }
            }
            TokenKind::For => self.parse_for(start),
            _ if self.starts_decl() => match self.parse_decl() {
                Some(decl) => {
                    let span = decl.span;
                    Stmt {
                        kind: StmtKind::Decl(decl),
                        span,
                    }
                }
                None => self.parse_expr_stmt(),
            },
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_expr_stmt(&mut self) -> Stmt {
        let expr = self.parse_expr();
        let span = expr.span;
        Stmt {
            kind: StmtKind::Expr(expr),
            span,
        }
    }

    /// Parses `for pattern in iterable { body }`.
    fn parse_for(&mut self, start: Span) -> Stmt {
        self.advance();
        let pattern = self.parse_pattern(PatternContext::Head);
        self.expect(&TokenKind::In);
        let iterable = self.with_marker(Marker::Delim, Self::parse_expr);
        let body = self.parse_block();
        Stmt {
            kind: StmtKind::For {
                pattern,
                iterable,
                body,
            },
            span: self.span_from(start),
        }
    }

    /// Returns `true` if the next tokens start a declaration.
    ///
    /// `fn` and `async fn` only start one when a name follows; otherwise they
    /// are function expressions.
    fn starts_decl(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Export
            | TokenKind::Declare
            | TokenKind::Val
            | TokenKind::Var
            | TokenKind::Type
            | TokenKind::Class => true,
            TokenKind::Fn => self.peek_nth_kind(1).is_identifier(),
            TokenKind::Async => match self.peek_nth_kind(1) {
                TokenKind::Val | TokenKind::Var => true,
                TokenKind::Fn => self.peek_nth_kind(2).is_identifier(),
                _ => false,
            },
            _ => false,
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Parses `export? declare? async? (val | var | fn | type | class) ...`.
    ///
    /// Returns `None` after reporting if the modifiers are not followed by a
    /// declaration keyword.
    fn parse_decl(&mut self) -> Option<Decl> {
        let start = self.start_span();
        let export = self.eat(&TokenKind::Export).is_some();
        let declare = self.eat(&TokenKind::Declare).is_some();
        let keyword_start = self.start_span();
        let async_token = self.eat(&TokenKind::Async);

        let kind = match self.peek_kind() {
            TokenKind::Val | TokenKind::Var => {
                if let Some(token) = &async_token {
                    self.report(Diagnostic::syntax(
                        "'async' cannot be applied to a variable declaration",
                        token.span(),
                    ));
                }
                DeclKind::Var(self.parse_var_decl(declare))
            }
            TokenKind::Fn => {
                DeclKind::Fn(self.parse_fn_decl(keyword_start, async_token.is_some(), declare))
            }
            TokenKind::Type | TokenKind::Class if async_token.is_some() => {
                self.expected("'fn' after 'async'");
                return None;
            }
            TokenKind::Type => DeclKind::TypeAlias(self.parse_type_alias()),
            TokenKind::Class => DeclKind::Class(self.parse_class(declare)),
            _ => {
                self.expected("a declaration");
                return None;
            }
        };
        Some(Decl {
            kind,
            export,
            declare,
            span: self.span_from(start),
        })
    }

    /// Parses `val|var pattern (: T)? (= init)?`.
    fn parse_var_decl(&mut self, declare: bool) -> VarDecl {
        let kind = match self.advance().kind() {
            TokenKind::Var => VarKind::Var,
            _ => VarKind::Val,
        };
        let pattern = self.parse_pattern(PatternContext::Head);
        let type_ann = self
            .eat(&TokenKind::Colon)
            .map(|_| self.parse_type_ann());
        let init = if self.eat(&TokenKind::Assign).is_some() {
            Some(self.parse_expr())
        } else if declare {
            None
        } else {
            self.missing("an initializer");
            Some(Expr::empty(self.here()))
        };
        VarDecl {
            kind,
            pattern,
            type_ann,
            init,
        }
    }

    /// Parses `fn name<T>(params) -> R throws E { body }`.
    fn parse_fn_decl(&mut self, start: Span, is_async: bool, declare: bool) -> FnDecl {
        self.advance();
        let name = self.expect_ident("a function name");
        let mut function = self.parse_function_signature(start, is_async);
        function.body = self.parse_required_body(declare, "a function body");
        function.span = self.span_from(start);
        FnDecl { name, function }
    }

    /// Parses a body, substituting an empty block for a missing one unless
    /// the declaration is ambient.
    fn parse_required_body(&mut self, declare: bool, what: &str) -> Option<Body> {
        let body = self.parse_function_body();
        if body.is_some() || declare {
            return body;
        }
        self.missing(what);
        Some(Body::Block(Block {
            stmts: Vec::new(),
            span: self.here(),
        }))
    }

    /// Parses `type Name<T> = T`.
    fn parse_type_alias(&mut self) -> TypeAliasDecl {
        self.advance();
        let name = self.expect_ident("a type name");
        let type_params = if self.check(&TokenKind::LessThan) {
            self.parse_type_params()
        } else {
            Vec::new()
        };
        self.expect(&TokenKind::Assign);
        let type_ann = self.parse_type_ann();
        TypeAliasDecl {
            name,
            type_params,
            type_ann,
        }
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Parses `class Name<T> extends Base { members }`.
    fn parse_class(&mut self, declare: bool) -> ClassDecl {
        self.advance();
        let name = self.expect_ident("a class name");
        let type_params = if self.check(&TokenKind::LessThan) {
            self.parse_type_params()
        } else {
            Vec::new()
        };
        let extends = self
            .eat(&TokenKind::Extends)
            .map(|_| self.parse_type_ann());

        let mut members = Vec::new();
        if self.expect(&TokenKind::LeftBrace).is_some() {
            self.with_marker(Marker::Expr, |p| {
                while p.check_deadline() {
                    if p.eat(&TokenKind::Semicolon).is_some() || p.eat(&TokenKind::Comma).is_some() {
                        continue;
                    }
                    if p.check(&TokenKind::RightBrace) || p.peek_kind().is_eof() {
                        break;
                    }
                    let before = p.offset();
                    if let Some(member) = p.parse_class_member(declare) {
                        members.push(member);
                    }
                    if p.offset() == before {
                        p.expected("a class member");
                        p.advance();
                    }
                }
            });
            self.expect(&TokenKind::RightBrace);
        }
        ClassDecl {
            name,
            type_params,
            extends,
            members,
        }
    }

    /// Returns `true` if the next token is the contextual modifier `name`
    /// and not a member called `name`.
    fn check_modifier(&self, name: &str) -> bool {
        self.check_contextual(name) && !follows_member_name(&self.peek_nth_kind(1))
    }

    fn parse_class_member(&mut self, declare: bool) -> Option<ClassMember> {
        let start = self.start_span();
        let mut is_static = false;
        let mut is_private = false;
        loop {
            if !is_static && self.check_modifier("static") {
                self.advance();
                is_static = true;
            } else if !is_private && self.check_modifier("private") {
                self.advance();
                is_private = true;
            } else {
                break;
            }
        }

        let function_start = self.start_span();
        let is_async = self.eat(&TokenKind::Async).is_some();
        let method_kind = if self.eat(&TokenKind::Fn).is_some() {
            Some(MethodKind::Method)
        } else if self.check_modifier("get") {
            self.advance();
            Some(MethodKind::Getter)
        } else if self.check_modifier("set") {
            self.advance();
            Some(MethodKind::Setter)
        } else {
            None
        };

        let key = match self.parse_prop_key() {
            Some(key) => key,
            None if method_kind.is_some() || is_async => {
                self.expected("a method name");
                PropKey::Ident(Ident::placeholder(self.here()))
            }
            None if is_static || is_private => {
                self.expected("a class member");
                PropKey::Ident(Ident::placeholder(self.here()))
            }
            None => return None,
        };

        let is_method = method_kind.is_some()
            || self.check(&TokenKind::LeftParen)
            || self.check(&TokenKind::LessThan);
        let kind = if is_method {
            let mut function = self.parse_function_signature(function_start, is_async);
            function.body = self.parse_required_body(declare, "a method body");
            function.span = self.span_from(function_start);
            ClassMemberKind::Method {
                key,
                kind: method_kind.unwrap_or(MethodKind::Method),
                function,
            }
        } else {
            if is_async {
                self.report(Diagnostic::syntax(
                    "'async' can only be applied to methods",
                    function_start,
                ));
            }
            let optional = self.eat(&TokenKind::Question).is_some();
            let type_ann = self
                .eat(&TokenKind::Colon)
                .map(|_| self.parse_type_ann());
            let init = self
                .eat(&TokenKind::Assign)
                .map(|_| self.parse_expr());
            ClassMemberKind::Field {
                key,
                optional,
                type_ann,
                init,
            }
        };
        Some(ClassMember {
            kind,
            is_static,
            is_private,
            span: self.span_from(start),
        })
    }
}
