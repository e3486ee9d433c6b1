// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Escalier.
//!
//! The AST represents the structure of an Escalier program after parsing.
//! Every node carries a [`Span`] that downstream passes (type checking,
//! code generation, source maps) rely on for positions.
//!
//! # Design Philosophy
//!
//! - **Closed node families**: [`Expr`], [`Pat`], [`TypeAnn`], [`Decl`] and
//!   [`Stmt`] each wrap a `*Kind` enum, so every consumer matches
//!   exhaustively
//! - **Error recovery**: the parser produces incomplete trees with
//!   placeholders ([`ExprKind::Empty`], [`TypeAnnKind::Empty`], an [`Ident`]
//!   with an empty name) instead of failing
//! - **Nested spans**: a parent's span always encloses its children's spans
//!
//! # Example
//!
//! ```ignore
//! // Source: val x = 3 + 4
//! Script {
//!     stmts: vec![Stmt {
//!         kind: StmtKind::Decl(Decl {
//!             kind: DeclKind::Var(VarDecl {
//!                 kind: VarKind::Val,
//!                 pattern: Pat { kind: PatKind::Ident(..), .. },
//!                 type_ann: None,
//!                 init: Some(Expr { kind: ExprKind::Binary { .. }, .. }),
//!             }),
//!             ..
//!         }),
//!         ..
//!     }],
//!     span: ...
//! }
//! ```

mod declarations;
mod expressions;
mod patterns;
mod types;

pub use declarations::{
    ClassDecl, ClassMember, ClassMemberKind, Decl, DeclKind, FnDecl, MethodKind, TypeAliasDecl,
    VarDecl, VarKind,
};
pub use expressions::{
    AssignOp, BinaryOp, Body, CatchClause, Expr, ExprKind, ExprOrSpread, Function, IfElseAlt,
    JsxAttr, JsxAttrValue, JsxChild, JsxClosing, JsxElement, JsxExprContainer, JsxFragment,
    JsxOpening, MatchArm, ObjProp, Param, Template, TemplateElement, UnaryOp,
};
pub use patterns::{BindingIdent, ObjPatElem, Pat, PatKind};
pub use types::{
    FunctionType, ObjTypeElem, OptionalModifier, Primitive, TypeAnn, TypeAnnKind, TypeParam,
};

use ecow::EcoString;

use crate::source_analysis::{SourceId, Span};

/// An identifier with its location.
///
/// An empty `name` marks a placeholder the parser synthesized after a
/// syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    /// The NFC-normalized name.
    pub name: EcoString,
    /// Source location.
    pub span: Span,
}

impl Ident {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Creates an empty-named placeholder.
    #[must_use]
    pub const fn placeholder(span: Span) -> Self {
        Self {
            name: EcoString::new(),
            span,
        }
    }

    /// Returns `true` for a parser-synthesized placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

/// A dotted chain of identifiers: `Foo.Bar.Baz`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedIdent {
    /// The segments, left to right. Never empty.
    pub parts: Vec<Ident>,
    /// Source location of the whole chain.
    pub span: Span,
}

impl QualifiedIdent {
    /// Wraps a single identifier.
    #[must_use]
    pub fn single(ident: Ident) -> Self {
        let span = ident.span;
        Self {
            parts: vec![ident],
            span,
        }
    }

    /// Returns the dotted name: `"Foo.Bar"`.
    #[must_use]
    pub fn dotted(&self) -> EcoString {
        let mut name = EcoString::new();
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                name.push('.');
            }
            name.push_str(&part.name);
        }
        name
    }

    /// Returns the last segment.
    #[must_use]
    pub fn last(&self) -> Option<&Ident> {
        self.parts.last()
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A number: the text as written plus its value.
    Number {
        /// Source text, including any `_` separators.
        raw: EcoString,
        /// Parsed value (`NaN` for a malformed literal).
        value: f64,
    },
    /// A string with escapes processed.
    String(EcoString),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// A regular expression.
    Regex {
        /// The pattern between the slashes.
        pattern: EcoString,
        /// Trailing flags.
        flags: EcoString,
    },
}

impl Literal {
    /// Builds a number literal from its source text.
    #[must_use]
    pub fn number(raw: impl Into<EcoString>) -> Self {
        let raw = raw.into();
        let digits: String = raw.chars().filter(|&c| c != '_').collect();
        let value = digits.parse::<f64>().unwrap_or(f64::NAN);
        Self::Number { raw, value }
    }
}

/// A property key in an object literal, object type or class.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    /// `name`
    Ident(Ident),
    /// `"name"`
    String(EcoString, Span),
    /// `42`
    Number(EcoString, Span),
    /// `[expr]`
    Computed(Box<Expr>, Span),
}

impl PropKey {
    /// Returns the source location of the key.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Ident(ident) => ident.span,
            Self::String(_, span) | Self::Number(_, span) | Self::Computed(_, span) => *span,
        }
    }
}

/// A brace-delimited statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The statements, in order.
    pub stmts: Vec<Stmt>,
    /// Source location including the braces.
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// What kind of statement this is.
    pub kind: StmtKind,
    /// Source location.
    pub span: Span,
}

/// The statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// An expression evaluated for effect (or as a block's value).
    Expr(Expr),
    /// A declaration.
    Decl(Decl),
    /// `return expr?`
    Return(Option<Expr>),
    /// `for pattern in iterable { body }`
    For {
        /// The loop binding.
        pattern: Pat,
        /// The iterated value.
        iterable: Expr,
        /// The loop body.
        body: Block,
    },
}

/// The root of a script: any statements at top level.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// Top-level statements.
    pub stmts: Vec<Stmt>,
    /// Source location covering the whole buffer.
    pub span: Span,
}

/// The root of a module file.
///
/// Modules should contain only declarations; anything else is reported but
/// kept so no input is silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Top-level statements.
    pub stmts: Vec<Stmt>,
    /// Source location covering the whole buffer.
    pub span: Span,
}

impl Module {
    /// Iterates the top-level declarations.
    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.stmts.iter().filter_map(|stmt| match &stmt.kind {
            StmtKind::Decl(decl) => Some(decl),
            _ => None,
        })
    }
}

/// Several library files combined into one declaration space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LibModule {
    /// Every file's top-level declarations, in input order.
    pub decls: Vec<Decl>,
    /// The files that were parsed, in input order.
    pub sources: Vec<SourceId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_literal_strips_separators() {
        assert_eq!(
            Literal::number("1_000.5"),
            Literal::Number {
                raw: "1_000.5".into(),
                value: 1000.5
            }
        );
        let Literal::Number { value, .. } = Literal::number(".5e1") else {
            panic!("expected number");
        };
        assert!((value - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_number_is_nan() {
        let Literal::Number { value, .. } = Literal::number("12abc") else {
            panic!("expected number");
        };
        assert!(value.is_nan());
    }

    #[test]
    fn qualified_ident_dotted() {
        let parts = vec![
            Ident::new("Foo", Span::default()),
            Ident::new("Bar", Span::default()),
        ];
        let name = QualifiedIdent {
            parts,
            span: Span::default(),
        };
        assert_eq!(name.dotted(), "Foo.Bar");
        assert_eq!(name.last().map(|i| i.name.as_str()), Some("Bar"));
    }

    #[test]
    fn placeholder_ident() {
        assert!(Ident::placeholder(Span::default()).is_placeholder());
        assert!(!Ident::new("x", Span::default()).is_placeholder());
    }
}
