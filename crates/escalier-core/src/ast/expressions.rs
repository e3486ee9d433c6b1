// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression nodes.

use ecow::EcoString;

use super::{Block, Ident, Literal, Pat, PropKey, QualifiedIdent, TypeAnn, TypeParam};
use crate::source_analysis::Span;

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What kind of expression this is.
    pub kind: ExprKind,
    /// Source location.
    pub span: Span,
}

impl Expr {
    /// Creates a new expression.
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates the placeholder the parser substitutes for a missing
    /// expression.
    #[must_use]
    pub const fn empty(span: Span) -> Self {
        Self {
            kind: ExprKind::Empty,
            span,
        }
    }

    /// Returns `true` for the missing-expression placeholder.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.kind, ExprKind::Empty)
    }
}

/// The expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Placeholder for an expression that could not be parsed.
    Empty,
    /// A literal value.
    Literal(Literal),
    /// A name reference.
    Ident(Ident),
    /// `-x`, `+x`, `!x`
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        arg: Box<Expr>,
    },
    /// `a + b`
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `a = b`, `a += b`
    Assign {
        /// The operator.
        op: AssignOp,
        /// The assigned place.
        target: Box<Expr>,
        /// The assigned value.
        value: Box<Expr>,
    },
    /// `f(args)` or `f?(args)`
    Call {
        /// The called expression.
        callee: Box<Expr>,
        /// Arguments, possibly spread.
        args: Vec<ExprOrSpread>,
        /// `true` for `?(`.
        optional: bool,
    },
    /// `a[i]` or `a?[i]`
    Index {
        /// The indexed value.
        object: Box<Expr>,
        /// The index.
        index: Box<Expr>,
        /// `true` for `?[`.
        optional: bool,
    },
    /// `a.b` or `a?.b`
    Member {
        /// The object.
        object: Box<Expr>,
        /// The property name (empty when missing after the dot).
        property: Ident,
        /// `true` for `?.`.
        optional: bool,
    },
    /// `[a, ...b]`
    Array(Vec<ExprOrSpread>),
    /// `{a: 1, b, ...c}`
    Object(Vec<ObjProp>),
    /// `fn (params) -> Ret { body }`
    Function(Box<Function>),
    /// `if cond { ... } else { ... }`
    IfElse {
        /// The condition.
        cond: Box<Expr>,
        /// The taken branch.
        consequent: Block,
        /// The `else` branch, if any.
        alternate: Option<IfElseAlt>,
    },
    /// `match value { pat => body, ... }`
    Match {
        /// The scrutinee.
        value: Box<Expr>,
        /// The arms, in order.
        arms: Vec<MatchArm>,
    },
    /// `try { ... } catch { arms } finally { ... }`
    Try {
        /// The protected block.
        body: Block,
        /// The `catch` clause, if any.
        catch: Option<CatchClause>,
        /// The `finally` block, if any.
        finally: Option<Block>,
    },
    /// `throw expr`
    Throw(Box<Expr>),
    /// `await expr`
    Await(Box<Expr>),
    /// `yield expr?`
    Yield(Option<Box<Expr>>),
    /// `do { ... }`
    Do(Block),
    /// `` `text ${expr} text` ``
    Template(Template),
    /// `` tag`text ${expr}` ``
    TaggedTemplate {
        /// The tag function.
        tag: Box<Expr>,
        /// The template.
        template: Template,
    },
    /// `<Name attr={x}>children</Name>`
    JsxElement(Box<JsxElement>),
    /// `<>children</>`
    JsxFragment(Box<JsxFragment>),
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `!`
    Not,
}

impl UnaryOp {
    /// Returns the operator as written.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Not => "!",
        }
    }
}

/// Binary operators, excluding assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `||`
    Or,
    /// `??`
    NullishCoalescing,
    /// `&&`
    And,
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Times,
    /// `/`
    Divide,
    /// `%`
    Modulo,
}

impl BinaryOp {
    /// Returns the operator as written.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::NullishCoalescing => "??",
            Self::And => "&&",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    TimesAssign,
    /// `/=`
    DivideAssign,
    /// `%=`
    ModuloAssign,
}

/// An element that may be spread: array elements and call arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprOrSpread {
    /// A plain expression.
    Expr(Expr),
    /// `...expr`
    Spread {
        /// The spread value.
        arg: Expr,
        /// Source location including the `...`.
        span: Span,
    },
}

impl ExprOrSpread {
    /// Returns the source location.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Expr(expr) => expr.span,
            Self::Spread { span, .. } => *span,
        }
    }

    /// Returns the inner expression.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        match self {
            Self::Expr(expr) | Self::Spread { arg: expr, .. } => expr,
        }
    }
}

/// An object-literal member.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjProp {
    /// `key: value`
    KeyValue {
        /// The key.
        key: PropKey,
        /// The value.
        value: Expr,
        /// Source location.
        span: Span,
    },
    /// `name` (shorthand for `name: name`)
    Shorthand(Ident),
    /// `...expr`
    Spread {
        /// The spread value.
        arg: Expr,
        /// Source location including the `...`.
        span: Span,
    },
}

impl ObjProp {
    /// Returns the source location.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::KeyValue { span, .. } | Self::Spread { span, .. } => *span,
            Self::Shorthand(ident) => ident.span,
        }
    }
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The binding pattern.
    pub pattern: Pat,
    /// `true` for `mut self` and other `mut` parameters.
    pub is_mut: bool,
    /// `true` for `x?: T`.
    pub optional: bool,
    /// The declared type.
    pub type_ann: Option<TypeAnn>,
    /// Default value.
    pub default: Option<Expr>,
    /// Source location.
    pub span: Span,
}

/// A function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// `{ ... }`
    Block(Block),
    /// `=> expr`
    Expr(Box<Expr>),
}

impl Body {
    /// Returns the source location.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Block(block) => block.span,
            Self::Expr(expr) => expr.span,
        }
    }
}

/// A function literal, declaration or method.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Generic parameters.
    pub type_params: Vec<TypeParam>,
    /// Value parameters.
    pub params: Vec<Param>,
    /// The declared return type.
    pub return_type: Option<TypeAnn>,
    /// The declared thrown type.
    pub throws: Option<TypeAnn>,
    /// The body; `None` only for ambient (`declare`) functions.
    pub body: Option<Body>,
    /// `true` for `async fn`.
    pub is_async: bool,
    /// Source location.
    pub span: Span,
}

/// The `else` part of an `if` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum IfElseAlt {
    /// `else { ... }`
    Block(Block),
    /// `else if ...`
    IfElse(Box<Expr>),
}

impl IfElseAlt {
    /// Returns the source location.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Block(block) => block.span,
            Self::IfElse(expr) => expr.span,
        }
    }
}

/// One arm of a `match` or `catch`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// The pattern.
    pub pattern: Pat,
    /// `if guard`
    pub guard: Option<Expr>,
    /// The arm body.
    pub body: Body,
    /// Source location.
    pub span: Span,
}

/// `catch { arms }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// The arms, in order.
    pub arms: Vec<MatchArm>,
    /// Source location including the `catch` keyword.
    pub span: Span,
}

/// A template literal.
///
/// `quasis` always has exactly one more element than `exprs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The text chunks.
    pub quasis: Vec<TemplateElement>,
    /// The interpolated expressions.
    pub exprs: Vec<Expr>,
    /// Source location including the backticks.
    pub span: Span,
}

/// A raw chunk of template-literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateElement {
    /// The text as written.
    pub raw: EcoString,
    /// Source location including its delimiter.
    pub span: Span,
}

/// A JSX element.
#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    /// The opening (or self-closing) tag.
    pub opening: JsxOpening,
    /// Child content.
    pub children: Vec<JsxChild>,
    /// The closing tag; `None` when self-closing or cut off.
    pub closing: Option<JsxClosing>,
    /// Source location.
    pub span: Span,
}

/// `<Name attrs>` or `<Name attrs />`
#[derive(Debug, Clone, PartialEq)]
pub struct JsxOpening {
    /// The tag name.
    pub name: QualifiedIdent,
    /// Attributes, in order.
    pub attrs: Vec<JsxAttr>,
    /// `true` for `/>`.
    pub self_closing: bool,
    /// Source location.
    pub span: Span,
}

/// `</Name>`
#[derive(Debug, Clone, PartialEq)]
pub struct JsxClosing {
    /// The tag name.
    pub name: QualifiedIdent,
    /// Source location.
    pub span: Span,
}

/// `name="value"`, `name={expr}` or a bare `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsxAttr {
    /// The attribute name.
    pub name: Ident,
    /// The value, absent for boolean shorthand.
    pub value: Option<JsxAttrValue>,
    /// Source location.
    pub span: Span,
}

/// The value of a JSX attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttrValue {
    /// `"text"`
    String(EcoString, Span),
    /// `{expr}`
    Expr(JsxExprContainer),
}

/// `{expr}` inside JSX.
#[derive(Debug, Clone, PartialEq)]
pub struct JsxExprContainer {
    /// The expression; `None` for `{}`.
    pub expr: Option<Expr>,
    /// Source location including the braces.
    pub span: Span,
}

/// Content between JSX tags.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxChild {
    /// Raw text.
    Text(EcoString, Span),
    /// A nested element.
    Element(JsxElement),
    /// A nested fragment.
    Fragment(JsxFragment),
    /// `{expr}`
    ExprContainer(JsxExprContainer),
}

impl JsxChild {
    /// Returns the source location.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Text(_, span) => *span,
            Self::Element(element) => element.span,
            Self::Fragment(fragment) => fragment.span,
            Self::ExprContainer(container) => container.span,
        }
    }
}

/// `<>children</>`
#[derive(Debug, Clone, PartialEq)]
pub struct JsxFragment {
    /// Child content.
    pub children: Vec<JsxChild>,
    /// Source location.
    pub span: Span,
}
