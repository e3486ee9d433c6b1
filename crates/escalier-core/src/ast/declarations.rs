// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration nodes.

use super::{Expr, Function, Ident, Pat, PropKey, TypeAnn, TypeParam};
use crate::source_analysis::Span;

/// A declaration with its modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    /// What is declared.
    pub kind: DeclKind,
    /// `export`
    pub export: bool,
    /// `declare`: an ambient declaration without initializer or body.
    pub declare: bool,
    /// Source location including the modifiers.
    pub span: Span,
}

/// The declaration variants.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// `val` / `var`
    Var(VarDecl),
    /// `fn name(...) { ... }`
    Fn(FnDecl),
    /// `type Name<T> = ...`
    TypeAlias(TypeAliasDecl),
    /// `class Name { ... }`
    Class(ClassDecl),
}

impl DeclKind {
    /// Returns the declared name, for declarations that bind exactly one.
    #[must_use]
    pub fn name(&self) -> Option<&Ident> {
        match self {
            Self::Var(var) => var.pattern.as_ident(),
            Self::Fn(decl) => Some(&decl.name),
            Self::TypeAlias(alias) => Some(&alias.name),
            Self::Class(class) => Some(&class.name),
        }
    }
}

/// `val` or `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// Immutable binding.
    Val,
    /// Mutable binding.
    Var,
}

/// `val pattern: T = init`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// `val` or `var`.
    pub kind: VarKind,
    /// The binding pattern.
    pub pattern: Pat,
    /// The declared type.
    pub type_ann: Option<TypeAnn>,
    /// The initializer; `None` only for `declare`.
    pub init: Option<Expr>,
}

/// `fn name(...) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    /// The function name.
    pub name: Ident,
    /// Signature and body.
    pub function: Function,
}

/// `type Name<T> = T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    /// The alias name.
    pub name: Ident,
    /// Generic parameters.
    pub type_params: Vec<TypeParam>,
    /// The aliased type.
    pub type_ann: TypeAnn,
}

/// `class Name<T> extends Base { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// The class name.
    pub name: Ident,
    /// Generic parameters.
    pub type_params: Vec<TypeParam>,
    /// The superclass.
    pub extends: Option<TypeAnn>,
    /// Fields and methods, in order.
    pub members: Vec<ClassMember>,
}

/// A class member with its modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    /// What the member is.
    pub kind: ClassMemberKind,
    /// `static`
    pub is_static: bool,
    /// `private`
    pub is_private: bool,
    /// Source location including the modifiers.
    pub span: Span,
}

/// The class member variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMemberKind {
    /// `name: T = init`
    Field {
        /// The field name.
        key: PropKey,
        /// `true` for `name?: T`.
        optional: bool,
        /// The declared type.
        type_ann: Option<TypeAnn>,
        /// The initial value.
        init: Option<Expr>,
    },
    /// `fn name(...)`, `get name(...)`, `set name(...)`
    Method {
        /// The method name.
        key: PropKey,
        /// Plain method or accessor.
        kind: MethodKind,
        /// Signature and body.
        function: Function,
    },
}

/// Whether a class method is an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// `fn name(...)`
    Method,
    /// `get name(...)`
    Getter,
    /// `set name(...)`
    Setter,
}
