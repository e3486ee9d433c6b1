// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! JSX parsing.
//!
//! Tags and attributes use ordinary tokens. Text between tags comes from
//! [`crate::source_analysis::Lexer::lex_jsx_text`], which the parser calls
//! whenever it is positioned in child content; `{ expr }` containers re-enter
//! the expression parser.

use ecow::EcoString;

use super::{Diagnostic, Marker, Parser};
use crate::ast::{
    Expr, ExprKind, Ident, JsxAttr, JsxAttrValue, JsxChild, JsxClosing, JsxElement,
    JsxExprContainer, JsxFragment, JsxOpening, QualifiedIdent,
};
use crate::source_analysis::{Span, TokenKind};

/// Whitespace-only text that spans lines is layout, not content.
fn is_layout_text(text: &str) -> bool {
    text.is_empty() || (text.contains('\n') && text.chars().all(char::is_whitespace))
}

impl Parser<'_> {
    /// Parses a JSX element or fragment starting at `<`.
    pub(super) fn parse_jsx(&mut self) -> Expr {
        if self.at_fragment() {
            let fragment = self.parse_jsx_fragment();
            let span = fragment.span;
            Expr::new(ExprKind::JsxFragment(Box::new(fragment)), span)
        } else {
            let element = self.parse_jsx_element();
            let span = element.span;
            Expr::new(ExprKind::JsxElement(Box::new(element)), span)
        }
    }

    /// Parses `<>...</>` or `<Name ...>...</Name>`.
    fn parse_jsx_child(&mut self) -> JsxChild {
        if self.at_fragment() {
            JsxChild::Fragment(self.parse_jsx_fragment())
        } else {
            JsxChild::Element(self.parse_jsx_element())
        }
    }

    fn at_fragment(&self) -> bool {
        matches!(
            self.peek_nth_kind(1),
            TokenKind::GreaterThan | TokenKind::GreaterThanEqual
        )
    }

    fn parse_jsx_fragment(&mut self) -> JsxFragment {
        let start = self.advance().span();
        self.expect_tag_end();
        let children = self.parse_jsx_children();
        if self.expect(&TokenKind::LessThanSlash).is_some() {
            if self.peek_kind().is_identifier() {
                let name = self.parse_qualified_ident();
                self.report(Diagnostic::syntax(
                    format!("Expected closing tag '</>' but got '</{}>'", name.dotted()),
                    name.span,
                ));
            }
            self.expect_tag_end();
        }
        JsxFragment {
            children,
            span: self.span_from(start),
        }
    }

    fn parse_jsx_element(&mut self) -> JsxElement {
        let start = self.advance().span();
        let name = if self.peek_kind().is_identifier() {
            self.parse_qualified_ident()
        } else {
            self.expected("a tag name");
            let opening = JsxOpening {
                name: QualifiedIdent::single(Ident::placeholder(self.here())),
                attrs: Vec::new(),
                self_closing: false,
                span: self.span_from(start),
            };
            return JsxElement {
                span: opening.span,
                opening,
                children: Vec::new(),
                closing: None,
            };
        };
        let attrs = self.parse_jsx_attrs();

        let self_closing = self.eat(&TokenKind::SlashGreaterThan).is_some();
        let terminated = self_closing || self.expect_tag_end().is_some();
        let opening = JsxOpening {
            name,
            attrs,
            self_closing,
            span: self.span_from(start),
        };
        if self_closing || !terminated {
            return JsxElement {
                span: opening.span,
                opening,
                children: Vec::new(),
                closing: None,
            };
        }

        let children = self.parse_jsx_children();
        let closing = self.parse_jsx_closing(&opening.name);
        JsxElement {
            opening,
            children,
            closing,
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    fn parse_jsx_attrs(&mut self) -> Vec<JsxAttr> {
        let mut attrs = Vec::new();
        while self.check_deadline() {
            let token = self.peek();
            let Some(first) = token.kind().property_name() else {
                break;
            };
            self.advance();
            let name = self.parse_jsx_attr_name(first, token.span());
            let value = if self.eat(&TokenKind::Assign).is_some() {
                let value = self.peek();
                let value_span = value.span();
                match value.into_kind() {
                    TokenKind::String(text) => {
                        self.advance();
                        Some(JsxAttrValue::String(text, value_span))
                    }
                    TokenKind::LeftBrace => {
                        Some(JsxAttrValue::Expr(self.parse_jsx_expr_container()))
                    }
                    _ => {
                        self.expected("an attribute value");
                        None
                    }
                }
            } else {
                None
            };
            attrs.push(JsxAttr {
                name,
                value,
                span: self.span_from(token.span()),
            });
        }
        attrs
    }

    /// Joins `data-id` style names. Segments must touch the hyphens.
    fn parse_jsx_attr_name(&mut self, first: EcoString, first_span: Span) -> Ident {
        let mut name = first;
        let mut span = first_span;
        loop {
            let hyphen = self.peek();
            if !matches!(hyphen.kind(), TokenKind::Minus)
                || hyphen.span().start().offset != span.end().offset
            {
                break;
            }
            self.advance();
            let part = self.peek();
            match part.kind().property_name() {
                Some(text) if part.span().start().offset == hyphen.span().end().offset => {
                    self.advance();
                    name.push('-');
                    name.push_str(&text);
                    span = span.merge(part.span());
                }
                _ => {
                    self.missing("an attribute name after '-'");
                    break;
                }
            }
        }
        Ident::new(name, span)
    }

    /// Parses `{ expr }` or `{}`.
    fn parse_jsx_expr_container(&mut self) -> JsxExprContainer {
        let start = self.advance().span();
        let expr = if self.check(&TokenKind::RightBrace) {
            None
        } else {
            Some(self.with_marker(Marker::Delim, Self::parse_expr))
        };
        self.expect(&TokenKind::RightBrace);
        JsxExprContainer {
            expr,
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Children and closing tags
    // ========================================================================

    fn parse_jsx_children(&mut self) -> Vec<JsxChild> {
        let mut children = Vec::new();
        while self.check_deadline() {
            let text = self.lex_jsx_text();
            let span = text.span();
            if let TokenKind::JsxText(raw) = text.into_kind()
                && !is_layout_text(&raw)
            {
                children.push(JsxChild::Text(raw, span));
            }
            match self.peek_kind() {
                TokenKind::LessThanSlash | TokenKind::Eof => break,
                TokenKind::LessThan => {
                    let placeholder = |span| {
                        JsxChild::Fragment(JsxFragment {
                            children: Vec::new(),
                            span,
                        })
                    };
                    let child = self.nested(placeholder, Self::parse_jsx_child);
                    children.push(child);
                }
                TokenKind::LeftBrace => {
                    children.push(JsxChild::ExprContainer(self.parse_jsx_expr_container()));
                }
                _ => {
                    self.expected("a child element or '{'");
                    break;
                }
            }
        }
        children
    }

    /// Parses `</Name>`, checking it matches the opening tag.
    fn parse_jsx_closing(&mut self, opening: &QualifiedIdent) -> Option<JsxClosing> {
        let start = self.start_span();
        self.expect(&TokenKind::LessThanSlash)?;
        let name = if self.peek_kind().is_identifier() {
            self.parse_qualified_ident()
        } else {
            self.expected("a closing tag name");
            QualifiedIdent::single(Ident::placeholder(self.here()))
        };
        if !name.parts.iter().any(Ident::is_placeholder) && name.dotted() != opening.dotted() {
            self.report(Diagnostic::syntax(
                format!(
                    "Expected closing tag '</{}>' but got '</{}>'",
                    opening.dotted(),
                    name.dotted()
                ),
                name.span,
            ));
        }
        self.expect_tag_end();
        Some(JsxClosing {
            name,
            span: self.span_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_ok};
    use super::*;
    use crate::ast::StmtKind;

    fn jsx_expr(text: &str) -> ExprKind {
        let script = parse_ok(text);
        let StmtKind::Expr(expr) = &script.stmts[0].kind else {
            panic!("expected expression statement");
        };
        expr.kind.clone()
    }

    fn element(text: &str) -> JsxElement {
        match jsx_expr(text) {
            ExprKind::JsxElement(element) => *element,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn self_closing_element() {
        let el = element("<Foo.Bar x=\"1\" disabled />");
        assert!(el.opening.self_closing);
        assert_eq!(el.opening.name.dotted(), "Foo.Bar");
        assert_eq!(el.opening.attrs.len(), 2);
        assert!(matches!(&el.opening.attrs[0].value, Some(JsxAttrValue::String(v, _)) if v == "1"));
        assert!(el.opening.attrs[1].value.is_none());
        assert!(el.closing.is_none());
    }

    #[test]
    fn children_and_containers() {
        let el = element("<div class={cls} data-id=\"a\">Hello, {name}!<br/></div>");
        assert_eq!(el.opening.attrs[0].name.name, "class");
        assert_eq!(el.opening.attrs[1].name.name, "data-id");
        assert_eq!(el.children.len(), 4);
        assert!(matches!(&el.children[0], JsxChild::Text(t, _) if t == "Hello, "));
        assert!(matches!(&el.children[1], JsxChild::ExprContainer(c) if c.expr.is_some()));
        assert!(matches!(&el.children[2], JsxChild::Text(t, _) if t == "!"));
        assert!(matches!(&el.children[3], JsxChild::Element(_)));
        assert!(el.closing.is_some());
        for child in &el.children {
            assert!(el.span.contains(child.span()));
        }
    }

    #[test]
    fn layout_whitespace_is_dropped() {
        let el = element("<ul>\n  <li>a</li>\n  <li>{}</li>\n</ul>");
        assert_eq!(el.children.len(), 2);
        let JsxChild::Element(second) = &el.children[1] else {
            panic!("expected element");
        };
        assert!(matches!(&second.children[0], JsxChild::ExprContainer(c) if c.expr.is_none()));
    }

    #[test]
    fn fragments() {
        let ExprKind::JsxFragment(fragment) = jsx_expr("<><a/><b/></>") else {
            panic!("expected fragment");
        };
        assert_eq!(fragment.children.len(), 2);
    }

    #[test]
    fn text_may_start_with_equals_or_greater_than() {
        let el = element("<a>=b</a>");
        assert!(matches!(&el.children[..], [JsxChild::Text(t, _)] if t == "=b"));
        assert_eq!(el.opening.span.end().offset, 3);

        let el = element("<a>>b</a>");
        assert!(matches!(&el.children[..], [JsxChild::Text(t, _)] if t == ">b"));

        let ExprKind::JsxFragment(fragment) = jsx_expr("<>=</>") else {
            panic!("expected fragment");
        };
        assert!(matches!(&fragment.children[..], [JsxChild::Text(t, _)] if t == "="));
    }

    #[test]
    fn closing_tag_before_equals() {
        let ExprKind::Binary { op, left, .. } = jsx_expr("<a></a>==b") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, crate::ast::BinaryOp::Equals);
        assert!(matches!(left.kind, ExprKind::JsxElement(_)));
    }

    #[test]
    fn jsx_as_a_value() {
        let script = parse_ok("val el = <p>{x + 1}</p>\nrender(el)");
        assert_eq!(script.stmts.len(), 2);
    }

    #[test]
    fn mismatched_closing_tag() {
        let (script, diagnostics) = parse_err("<a>text</b>");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected closing tag '</a>' but got '</b>'");
        assert_eq!(script.stmts.len(), 1);
    }

    #[test]
    fn unclosed_element() {
        let (_, diagnostics) = parse_err("<a><b></b>");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected '</' but got end of file");
    }
}
