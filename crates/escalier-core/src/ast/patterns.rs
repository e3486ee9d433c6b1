// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Binding patterns, shared by parameters, declarations and `match` arms.

use super::{Expr, Ident, Literal, QualifiedIdent, TypeAnn};
use crate::source_analysis::Span;

/// A pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Pat {
    /// What kind of pattern this is.
    pub kind: PatKind,
    /// Source location.
    pub span: Span,
}

impl Pat {
    /// Creates a new pattern.
    #[must_use]
    pub const fn new(kind: PatKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the bound name if this is a plain identifier pattern.
    #[must_use]
    pub const fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            PatKind::Ident(binding) => Some(&binding.name),
            _ => None,
        }
    }
}

/// The pattern variants.
#[derive(Debug, Clone, PartialEq)]
pub enum PatKind {
    /// `x`, `x: T`, `x = default`
    Ident(BindingIdent),
    /// `_`
    Wildcard,
    /// `[a, b, ...rest]`
    Tuple(Vec<Pat>),
    /// `{a, b: c, ...rest}`
    Object(Vec<ObjPatElem>),
    /// `...pat`, only as the last tuple element
    Rest(Box<Pat>),
    /// `Some(x)`, `Foo.Bar(a, ...rest)`
    Extractor {
        /// The extractor's name.
        name: QualifiedIdent,
        /// Positional sub-patterns.
        args: Vec<Pat>,
    },
    /// `Point {x, y}`
    Instance {
        /// The class name.
        name: QualifiedIdent,
        /// The field patterns.
        elems: Vec<ObjPatElem>,
    },
    /// `5`, `"a"`, `true`, `null`
    Literal(Literal),
}

/// An identifier binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingIdent {
    /// The bound name.
    pub name: Ident,
    /// `x: T`
    pub type_ann: Option<TypeAnn>,
    /// `x = default`
    pub default: Option<Box<Expr>>,
}

/// An object-pattern element.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjPatElem {
    /// `key: pattern`
    KeyValue {
        /// The property read.
        key: Ident,
        /// The pattern it is matched against.
        value: Pat,
        /// Source location.
        span: Span,
    },
    /// `key` or `key = default`
    Shorthand {
        /// The property read and the name bound.
        key: Ident,
        /// Default value.
        default: Option<Expr>,
        /// Source location.
        span: Span,
    },
    /// `...rest`, only as the last element
    Rest {
        /// The pattern bound to the remaining properties.
        arg: Pat,
        /// Source location including the `...`.
        span: Span,
    },
}

impl ObjPatElem {
    /// Returns the source location.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::KeyValue { span, .. } | Self::Shorthand { span, .. } | Self::Rest { span, .. } => {
                *span
            }
        }
    }
}
