// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type-annotation nodes.

use super::{Ident, Literal, Param, PropKey, QualifiedIdent, TemplateElement};
use crate::source_analysis::Span;

/// A type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnn {
    /// What kind of type this is.
    pub kind: TypeAnnKind,
    /// Source location.
    pub span: Span,
}

impl TypeAnn {
    /// Creates a new type annotation.
    #[must_use]
    pub const fn new(kind: TypeAnnKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates the placeholder the parser substitutes for a missing type.
    #[must_use]
    pub const fn empty(span: Span) -> Self {
        Self {
            kind: TypeAnnKind::Empty,
            span,
        }
    }
}

/// The type-annotation variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnKind {
    /// Placeholder for a type that could not be parsed.
    Empty,
    /// `number`, `string`, ...
    Primitive(Primitive),
    /// `5`, `"a"`, `true`, `null`, `undefined`
    Literal(Literal),
    /// `fn <T>(x: T) -> U throws E`
    Function(Box<FunctionType>),
    /// `[A, B, ...C]`
    Tuple(Vec<TypeAnn>),
    /// `...T` inside a tuple type
    Rest(Box<TypeAnn>),
    /// `{a: A, b?: B, ...}`
    Object(Vec<ObjTypeElem>),
    /// `A | B | C`, one node per run of `|`
    Union(Vec<TypeAnn>),
    /// `A & B & C`, one node per run of `&`
    Intersection(Vec<TypeAnn>),
    /// `if Check : Extends { Then } else { Else }`
    Conditional {
        /// The tested type.
        check: Box<TypeAnn>,
        /// The type it is tested against.
        extends: Box<TypeAnn>,
        /// Result when the test holds.
        true_type: Box<TypeAnn>,
        /// Result otherwise.
        false_type: Box<TypeAnn>,
    },
    /// `infer T`
    Infer(Ident),
    /// `keyof T`
    KeyOf(Box<TypeAnn>),
    /// `typeof foo.bar`
    TypeOf(QualifiedIdent),
    /// `T[K]`, `T.name`
    IndexedAccess {
        /// The indexed type.
        object: Box<TypeAnn>,
        /// The index type.
        index: Box<TypeAnn>,
    },
    /// `Foo.Bar<A, B>`
    Reference {
        /// The referenced name.
        name: QualifiedIdent,
        /// Type arguments.
        type_args: Vec<TypeAnn>,
    },
    /// `mut T`
    Mutable(Box<TypeAnn>),
    /// `` `prefix${T}` ``
    TemplateLiteral {
        /// The text chunks, one more than `types`.
        quasis: Vec<TemplateElement>,
        /// The interpolated types.
        types: Vec<TypeAnn>,
    },
}

/// Built-in primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `number`
    Number,
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `bigint`
    BigInt,
    /// `symbol`
    Symbol,
    /// `unique symbol`
    UniqueSymbol,
    /// `object`
    Object,
    /// `any`
    Any,
    /// `unknown`
    Unknown,
    /// `never`
    Never,
}

impl Primitive {
    /// Maps a type name to a primitive. `unique symbol` is two words and is
    /// handled by the parser.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let primitive = match name {
            "number" => Self::Number,
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "bigint" => Self::BigInt,
            "symbol" => Self::Symbol,
            "object" => Self::Object,
            "any" => Self::Any,
            "unknown" => Self::Unknown,
            "never" => Self::Never,
            _ => return None,
        };
        Some(primitive)
    }
}

/// A function type's signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    /// Generic parameters.
    pub type_params: Vec<TypeParam>,
    /// Value parameters.
    pub params: Vec<Param>,
    /// Return type.
    pub return_type: TypeAnn,
    /// `throws E`
    pub throws: Option<TypeAnn>,
}

/// A generic parameter: `T`, `T: Bound`, `T = Default`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    /// The parameter name.
    pub name: Ident,
    /// Upper bound.
    pub constraint: Option<TypeAnn>,
    /// Default type.
    pub default: Option<TypeAnn>,
    /// Source location.
    pub span: Span,
}

/// `?`, `+?` and `-?` on a mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalModifier {
    /// `?`
    Optional,
    /// `+?`
    Add,
    /// `-?`
    Remove,
}

/// An object-type member.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjTypeElem {
    /// `key: T` or `key?: T`
    Property {
        /// The key.
        key: PropKey,
        /// `true` for `key?: T`.
        optional: bool,
        /// The property type.
        value: TypeAnn,
        /// Source location.
        span: Span,
    },
    /// `get key(self) -> T`
    Getter {
        /// The key.
        key: PropKey,
        /// The accessor signature.
        signature: Box<FunctionType>,
        /// Source location.
        span: Span,
    },
    /// `set key(mut self, value: T)`
    Setter {
        /// The key.
        key: PropKey,
        /// The accessor signature.
        signature: Box<FunctionType>,
        /// Source location.
        span: Span,
    },
    /// `key<T>(params) -> R`
    Method {
        /// The key.
        key: PropKey,
        /// `true` for `key?(...)`.
        optional: bool,
        /// The method signature.
        signature: Box<FunctionType>,
        /// Source location.
        span: Span,
    },
    /// `[K]: T[K] for K in Keys`
    Mapped {
        /// The key type, written in brackets.
        key: TypeAnn,
        /// The optional modifier after the brackets.
        optional: Option<OptionalModifier>,
        /// The value type.
        value: TypeAnn,
        /// The iteration variable.
        target: Ident,
        /// The iterated key set.
        source: TypeAnn,
        /// Source location.
        span: Span,
    },
    /// `...T`
    RestSpread(TypeAnn, Span),
}

impl ObjTypeElem {
    /// Returns the source location.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Property { span, .. }
            | Self::Getter { span, .. }
            | Self::Setter { span, .. }
            | Self::Method { span, .. }
            | Self::Mapped { span, .. }
            | Self::RestSpread(_, span) => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names() {
        assert_eq!(Primitive::from_name("number"), Some(Primitive::Number));
        assert_eq!(Primitive::from_name("never"), Some(Primitive::Never));
        assert_eq!(Primitive::from_name("unique"), None);
        assert_eq!(Primitive::from_name("Number"), None);
    }
}
