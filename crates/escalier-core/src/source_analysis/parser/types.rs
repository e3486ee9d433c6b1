// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type-annotation parsing.
//!
//! Unions and intersections use the same two-stack precedence climbing as
//! expressions, except that a run of the same operator accumulates into one
//! N-ary node: `A | B | C` is a single three-member union.

use ecow::EcoString;

use super::{Checkpoint, Diagnostic, Marker, Parser};
use crate::ast::{
    FunctionType, Literal, ObjTypeElem, OptionalModifier, Primitive, PropKey, TemplateElement,
    TypeAnn, TypeAnnKind, TypeParam,
};
use crate::source_analysis::{QuasiEnd, Span, TokenKind};

/// `|` and `&` between types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeOp {
    Union,
    Intersection,
}

impl TypeOp {
    const fn precedence(self) -> u8 {
        match self {
            Self::Union => 3,
            Self::Intersection => 4,
        }
    }

    fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Pipe => Some(Self::Union),
            TokenKind::Amp => Some(Self::Intersection),
            _ => None,
        }
    }
}

/// A pending operator and the number of operands it will take.
#[derive(Debug, Clone, Copy)]
struct PendingOp {
    op: TypeOp,
    arity: usize,
}

/// Prefix type operators.
#[derive(Debug, Clone, Copy)]
enum TypePrefix {
    KeyOf,
    Mutable,
}

/// Tokens that start a type.
fn starts_type(kind: &TokenKind) -> bool {
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
            | TokenKind::Fn
            | TokenKind::LeftBracket
            | TokenKind::LeftParen
            | TokenKind::LeftBrace
            | TokenKind::If
            | TokenKind::BackTick
            | TokenKind::Mut
    )
}

impl Parser<'_> {
    /// Parses a type annotation.
    ///
    /// Always returns a type; a missing one is reported and replaced by
    /// [`TypeAnnKind::Empty`].
    pub(super) fn parse_type_ann(&mut self) -> TypeAnn {
        self.nested(TypeAnn::empty, Self::parse_type_binary)
    }

    /// Parses a type if the next token can start one.
    fn try_parse_type_ann(&mut self) -> Option<TypeAnn> {
        if starts_type(&self.peek_kind()) {
            Some(self.parse_type_ann())
        } else {
            None
        }
    }

    fn parse_type_binary(&mut self) -> TypeAnn {
        // A leading `|` or `&` lets multi-line unions line up.
        if TypeOp::from_token(&self.peek_kind()).is_some() {
            self.advance();
        }

        let mut operands = vec![self.parse_type_operand()];
        let mut pending: Vec<PendingOp> = Vec::new();

        while self.check_deadline() {
            let token = self.peek();
            // `|` and `&` never start a statement, so they continue across lines.
            let Some(op) = TypeOp::from_token(token.kind()) else {
                break;
            };
            self.advance();

            while let Some(&top) = pending.last()
                && top.op != op
                && top.op.precedence() >= op.precedence()
            {
                pending.pop();
                Self::reduce_types(&mut operands, top);
            }

            match pending.last_mut() {
                Some(top) if top.op == op => top.arity += 1,
                _ => pending.push(PendingOp { op, arity: 2 }),
            }
            operands.push(self.parse_type_operand());
        }

        while let Some(top) = pending.pop() {
            Self::reduce_types(&mut operands, top);
        }
        operands
            .pop()
            .unwrap_or_else(|| TypeAnn::empty(self.here()))
    }

    /// Replaces the last `arity` operands with one N-ary node.
    fn reduce_types(operands: &mut Vec<TypeAnn>, pending: PendingOp) {
        let at = operands.len().saturating_sub(pending.arity);
        let types = operands.split_off(at);
        let (Some(first), Some(last)) = (types.first(), types.last()) else {
            return;
        };
        let span = first.span.merge(last.span);
        let kind = match pending.op {
            TypeOp::Union => TypeAnnKind::Union(types),
            TypeOp::Intersection => TypeAnnKind::Intersection(types),
        };
        operands.push(TypeAnn::new(kind, span));
    }

    /// Parses prefix operators, a primary type and its suffixes.
    fn parse_type_operand(&mut self) -> TypeAnn {
        let mut prefixes = Vec::new();
        loop {
            let token = self.peek();
            let prefix = match token.kind() {
                TokenKind::Mut => TypePrefix::Mutable,
                TokenKind::Identifier(name)
                    if name == "keyof" && starts_type(&self.peek_nth_kind(1)) =>
                {
                    TypePrefix::KeyOf
                }
                _ => break,
            };
            self.advance();
            prefixes.push((prefix, token.span()));
        }

        let mut type_ann = match self.try_parse_type_primary() {
            Some(primary) => self.parse_type_suffixes(primary),
            None => {
                self.missing("a type");
                TypeAnn::empty(self.here())
            }
        };

        for (prefix, span) in prefixes.into_iter().rev() {
            let span = span.merge(type_ann.span);
            let kind = match prefix {
                TypePrefix::KeyOf => TypeAnnKind::KeyOf(Box::new(type_ann)),
                TypePrefix::Mutable => TypeAnnKind::Mutable(Box::new(type_ann)),
            };
            type_ann = TypeAnn::new(kind, span);
        }
        type_ann
    }

    /// Applies `T[K]` and `T.name` suffixes.
    fn parse_type_suffixes(&mut self, mut type_ann: TypeAnn) -> TypeAnn {
        while self.check_deadline() {
            let token = self.peek();
            if !self.continues(&token) {
                break;
            }
            let index = match token.kind() {
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.with_marker(Marker::Delim, Self::parse_type_ann);
                    self.expect(&TokenKind::RightBracket);
                    index
                }
                TokenKind::Dot => {
                    self.advance();
                    let name = self.peek();
                    match name.kind().property_name() {
                        Some(text) => {
                            self.advance();
                            TypeAnn::new(TypeAnnKind::Literal(Literal::String(text)), name.span())
                        }
                        None => {
                            self.missing("a property name after '.'");
                            TypeAnn::empty(self.here())
                        }
                    }
                }
                _ => break,
            };
            let span = type_ann.span.merge(self.here());
            type_ann = TypeAnn::new(
                TypeAnnKind::IndexedAccess {
                    object: Box::new(type_ann),
                    index: Box::new(index),
                },
                span,
            );
        }
        type_ann
    }

    fn try_parse_type_primary(&mut self) -> Option<TypeAnn> {
        let token = self.peek();
        let start = token.span();
        let literal = |p: &mut Self, literal: Literal| {
            p.advance();
            TypeAnn::new(TypeAnnKind::Literal(literal), start)
        };
        let type_ann = match token.into_kind() {
            TokenKind::Identifier(name) => self.parse_named_type(&name),
            TokenKind::Number(raw) => literal(self, Literal::number(raw)),
            TokenKind::String(value) => literal(self, Literal::String(value)),
            TokenKind::True => literal(self, Literal::Boolean(true)),
            TokenKind::False => literal(self, Literal::Boolean(false)),
            TokenKind::Null => literal(self, Literal::Null),
            TokenKind::Undefined => literal(self, Literal::Undefined),
            TokenKind::Minus => {
                self.advance();
                let TokenKind::Number(raw) = self.peek_kind() else {
                    self.expected("a number after '-'");
                    return Some(TypeAnn::empty(self.span_from(start)));
                };
                self.advance();
                let literal = Literal::number(format!("-{raw}"));
                TypeAnn::new(TypeAnnKind::Literal(literal), self.span_from(start))
            }
            TokenKind::Fn => {
                self.advance();
                let signature = self.parse_function_type_signature(true);
                TypeAnn::new(
                    TypeAnnKind::Function(Box::new(signature)),
                    self.span_from(start),
                )
            }
            TokenKind::LeftBracket => {
                let elems = self.parse_delimited(&TokenKind::RightBracket, Self::parse_tuple_type_elem);
                TypeAnn::new(TypeAnnKind::Tuple(elems), self.span_from(start))
            }
            TokenKind::LeftParen => {
                self.advance();
                let mut inner = self.with_marker(Marker::Delim, Self::parse_type_ann);
                self.expect(&TokenKind::RightParen);
                inner.span = self.span_from(start).merge(inner.span);
                inner
            }
            TokenKind::LeftBrace => {
                let elems = self.parse_delimited(&TokenKind::RightBrace, Self::parse_obj_type_elem);
                TypeAnn::new(TypeAnnKind::Object(elems), self.span_from(start))
            }
            TokenKind::If => self.parse_conditional_type(),
            TokenKind::BackTick => self.parse_template_type(),
            _ => return None,
        };
        Some(type_ann)
    }

    /// Parses a type that starts with an identifier: `typeof`, `infer`,
    /// `unique symbol`, a primitive, or a reference.
    fn parse_named_type(&mut self, name: &str) -> TypeAnn {
        let start = self.start_span();
        let next = self.peek_nth_kind(1);
        match name {
            "typeof" if next.is_identifier() => {
                self.advance();
                let target = self.parse_qualified_ident();
                return TypeAnn::new(TypeAnnKind::TypeOf(target), self.span_from(start));
            }
            "infer" if next.is_identifier() => {
                self.advance();
                let ident = self.expect_ident("a type variable name");
                return TypeAnn::new(TypeAnnKind::Infer(ident), self.span_from(start));
            }
            "unique" if matches!(&next, TokenKind::Identifier(n) if n == "symbol") => {
                self.advance();
                self.advance();
                return TypeAnn::new(
                    TypeAnnKind::Primitive(Primitive::UniqueSymbol),
                    self.span_from(start),
                );
            }
            _ => {}
        }
        if let Some(primitive) = Primitive::from_name(name) {
            self.advance();
            return TypeAnn::new(TypeAnnKind::Primitive(primitive), start);
        }

        let name = self.parse_qualified_ident();
        let type_args = if self.check(&TokenKind::LessThan) {
            self.parse_delimited(&TokenKind::GreaterThan, Self::try_parse_type_ann)
        } else {
            Vec::new()
        };
        TypeAnn::new(
            TypeAnnKind::Reference { name, type_args },
            self.span_from(start),
        )
    }

    fn parse_tuple_type_elem(&mut self) -> Option<TypeAnn> {
        if let Some(dots) = self.eat(&TokenKind::DotDotDot) {
            let inner = self.parse_type_ann();
            let span = self.span_from(dots.span());
            return Some(TypeAnn::new(TypeAnnKind::Rest(Box::new(inner)), span));
        }
        self.try_parse_type_ann()
    }

    /// Parses the part of a function type after `fn` (or after a method
    /// name): type parameters, parameters, `-> R` and `throws E`.
    ///
    /// With `require_return` a missing `->` is reported; otherwise the
    /// return type defaults to `undefined`.
    fn parse_function_type_signature(&mut self, require_return: bool) -> FunctionType {
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
        let return_type = if self.eat(&TokenKind::Arrow).is_some() {
            self.parse_type_ann()
        } else if require_return {
            self.missing("'->' and a return type");
            TypeAnn::empty(self.here())
        } else {
            TypeAnn::new(TypeAnnKind::Literal(Literal::Undefined), self.here())
        };
        let throws = self
            .eat_contextual("throws")
            .map(|_| self.parse_type_ann());
        FunctionType {
            type_params,
            params,
            return_type,
            throws,
        }
    }

    /// Parses `<T, U: Bound = Default>`.
    pub(super) fn parse_type_params(&mut self) -> Vec<TypeParam> {
        self.parse_delimited(&TokenKind::GreaterThan, |p| {
            if !p.peek_kind().is_identifier() {
                return None;
            }
            let start = p.start_span();
            let name = p.expect_ident("a type parameter name");
            let constraint = p
                .eat(&TokenKind::Colon)
                .map(|_| p.parse_type_ann());
            let default = p
                .eat(&TokenKind::Assign)
                .map(|_| p.parse_type_ann());
            Some(TypeParam {
                name,
                constraint,
                default,
                span: p.span_from(start),
            })
        })
    }

    // ========================================================================
    // Object types
    // ========================================================================

    fn parse_obj_type_elem(&mut self) -> Option<ObjTypeElem> {
        let start = self.start_span();
        match self.peek_kind() {
            TokenKind::DotDotDot => {
                self.advance();
                let spread = self.parse_type_ann();
                return Some(ObjTypeElem::RestSpread(spread, self.span_from(start)));
            }
            TokenKind::LeftBracket => {
                if let Some(mapped) = self.try_parse_mapped_type(start) {
                    return Some(mapped);
                }
            }
            TokenKind::Identifier(name) if name == "get" || name == "set" => {
                let is_accessor = !matches!(
                    self.peek_nth_kind(1),
                    TokenKind::LeftParen
                        | TokenKind::LessThan
                        | TokenKind::Colon
                        | TokenKind::Question
                        | TokenKind::Comma
                        | TokenKind::RightBrace
                );
                if is_accessor {
                    self.advance();
                    let Some(key) = self.parse_prop_key() else {
                        self.expected("a property name");
                        return None;
                    };
                    let signature = Box::new(self.parse_function_type_signature(name == "get"));
                    let span = self.span_from(start);
                    return Some(if name == "get" {
                        ObjTypeElem::Getter {
                            key,
                            signature,
                            span,
                        }
                    } else {
                        ObjTypeElem::Setter {
                            key,
                            signature,
                            span,
                        }
                    });
                }
            }
            _ => {}
        }

        let key = self.parse_prop_key()?;
        let optional = self.eat(&TokenKind::Question).is_some();
        if self.check(&TokenKind::LeftParen) || self.check(&TokenKind::LessThan) {
            let signature = Box::new(self.parse_function_type_signature(true));
            return Some(ObjTypeElem::Method {
                key,
                optional,
                signature,
                span: self.span_from(start),
            });
        }
        self.expect(&TokenKind::Colon);
        let value = self.parse_type_ann();
        Some(ObjTypeElem::Property {
            key,
            optional,
            value,
            span: self.span_from(start),
        })
    }

    /// Tries `[K]?: V for K in Keys`.
    ///
    /// Returns `None` after rewinding when no `:` follows the brackets. When
    /// `for` is missing the element is a computed-key property; its value is
    /// parsed only once.
    fn try_parse_mapped_type(&mut self, start: Span) -> Option<ObjTypeElem> {
        let checkpoint = self.checkpoint();
        self.advance();
        let key = self.with_marker(Marker::Delim, Self::parse_type_ann);
        if self.eat(&TokenKind::RightBracket).is_none() {
            self.rewind(checkpoint);
            return None;
        }
        let optional = if self.eat(&TokenKind::Question).is_some() {
            Some(OptionalModifier::Optional)
        } else if self.check(&TokenKind::Plus) && self.peek_nth_kind(1) == TokenKind::Question {
            self.advance();
            self.advance();
            Some(OptionalModifier::Add)
        } else if self.check(&TokenKind::Minus) && self.peek_nth_kind(1) == TokenKind::Question {
            self.advance();
            self.advance();
            Some(OptionalModifier::Remove)
        } else {
            None
        };
        if self.eat(&TokenKind::Colon).is_none() {
            self.rewind(checkpoint);
            return None;
        }
        let value_start = self.checkpoint();
        let value = self.parse_type_ann();
        if !self.check(&TokenKind::For) {
            let value_end = self.checkpoint();
            let value_diagnostics = self.diagnostics_since(&value_start);
            self.rewind(checkpoint);
            return Some(self.computed_property(start, value, value_end, value_diagnostics));
        }
        self.advance();
        let target = self.expect_ident("a type variable name");
        self.expect(&TokenKind::In);
        let source = self.parse_type_ann();
        Some(ObjTypeElem::Mapped {
            key,
            optional,
            value,
            target,
            source,
            span: self.span_from(start),
        })
    }

    /// Re-reads `[key]?:` as a computed property key, then skips to
    /// `value_end` and attaches the value parsed there.
    fn computed_property(
        &mut self,
        start: Span,
        value: TypeAnn,
        value_end: Checkpoint,
        value_diagnostics: Vec<Diagnostic>,
    ) -> ObjTypeElem {
        let bracket = self.advance().span();
        let expr = self.with_marker(Marker::Delim, Self::parse_expr);
        self.expect(&TokenKind::RightBracket);
        let key = PropKey::Computed(Box::new(expr), self.span_from(bracket));
        let optional = self.eat(&TokenKind::Question).is_some();
        self.expect(&TokenKind::Colon);
        self.resume(value_end, value_diagnostics);
        ObjTypeElem::Property {
            key,
            optional,
            value,
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Conditional and template-literal types
    // ========================================================================

    /// Parses `if Check : Extends { Then } else { Else }`, where the else
    /// branch may itself be `else if ...`.
    fn parse_conditional_type(&mut self) -> TypeAnn {
        let start = self.advance().span();
        let check = self.with_marker(Marker::Delim, Self::parse_type_ann);
        self.expect(&TokenKind::Colon);
        let extends = self.with_marker(Marker::Delim, Self::parse_type_ann);
        let true_type = self.parse_braced_type();
        let false_type = if self.eat(&TokenKind::Else).is_some() {
            if self.check(&TokenKind::If) {
                self.nested(TypeAnn::empty, Self::parse_conditional_type)
            } else {
                self.parse_braced_type()
            }
        } else {
            self.expected("'else'");
            TypeAnn::empty(self.here())
        };
        TypeAnn::new(
            TypeAnnKind::Conditional {
                check: Box::new(check),
                extends: Box::new(extends),
                true_type: Box::new(true_type),
                false_type: Box::new(false_type),
            },
            self.span_from(start),
        )
    }

    /// Parses `{ T }`; the span is widened to cover the braces.
    fn parse_braced_type(&mut self) -> TypeAnn {
        let start = self.start_span();
        if self.expect(&TokenKind::LeftBrace).is_none() {
            return TypeAnn::empty(self.here());
        }
        let mut inner = self.with_marker(Marker::Delim, Self::parse_type_ann);
        self.expect(&TokenKind::RightBrace);
        inner.span = self.span_from(start).merge(inner.span);
        inner
    }

    /// Parses `` `prefix${T}suffix` `` in type position.
    fn parse_template_type(&mut self) -> TypeAnn {
        let start = self.advance().span();
        let mut quasis = Vec::new();
        let mut types = Vec::new();
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
            types.push(self.with_marker(Marker::Delim, Self::parse_type_ann));
            if self.expect(&TokenKind::RightBrace).is_none() {
                break;
            }
        }
        while quasis.len() <= types.len() {
            quasis.push(TemplateElement {
                raw: EcoString::new(),
                span: self.here(),
            });
        }
        TypeAnn::new(
            TypeAnnKind::TemplateLiteral { quasis, types },
            self.span_from(start),
        )
    }
}
