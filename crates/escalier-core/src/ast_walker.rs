// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared pre-order walker over every AST node family.
//!
//! [`NodeRef`] borrows one node of any family and lists its direct children
//! in source order. [`walk`] visits a subtree with an explicit stack, so
//! very deep trees (long prefix-operator chains, say) cannot overflow.
//!
//! [`referenced_names`] uses the walker to collect the free names a
//! declaration mentions, which is the input to dependency-graph
//! construction for mutually recursive top-level declarations.

use std::collections::HashSet;

use ecow::EcoString;

use crate::ast::{
    Block, Body, ClassMemberKind, Decl, DeclKind, Expr, ExprKind, Function, FunctionType,
    IfElseAlt, JsxAttrValue, JsxChild, JsxElement, JsxFragment, MatchArm, Module, ObjPatElem,
    ObjProp, ObjTypeElem, Param, Pat, PatKind, PropKey, QualifiedIdent, Script, Stmt, StmtKind,
    TypeAnn, TypeAnnKind, TypeParam,
};
use crate::source_analysis::Span;

/// A borrowed node of any family.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// A statement.
    Stmt(&'a Stmt),
    /// A declaration.
    Decl(&'a Decl),
    /// A block.
    Block(&'a Block),
    /// An expression.
    Expr(&'a Expr),
    /// A pattern.
    Pat(&'a Pat),
    /// A type annotation.
    TypeAnn(&'a TypeAnn),
    /// A generic parameter.
    TypeParam(&'a TypeParam),
    /// A function parameter.
    Param(&'a Param),
}

impl<'a> NodeRef<'a> {
    /// Returns the node's source location.
    #[must_use]
    pub const fn span(self) -> Span {
        match self {
            Self::Stmt(stmt) => stmt.span,
            Self::Decl(decl) => decl.span,
            Self::Block(block) => block.span,
            Self::Expr(expr) => expr.span,
            Self::Pat(pat) => pat.span,
            Self::TypeAnn(type_ann) => type_ann.span,
            Self::TypeParam(param) => param.span,
            Self::Param(param) => param.span,
        }
    }

    /// Returns the direct children, in source order.
    ///
    /// Nodes without their own family (match arms, object members, JSX
    /// children) are flattened: their children are listed here instead.
    #[must_use]
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = Children(Vec::new());
        match self {
            Self::Stmt(stmt) => out.stmt(stmt),
            Self::Decl(decl) => out.decl(decl),
            Self::Block(block) => out.0.extend(block.stmts.iter().map(NodeRef::Stmt)),
            Self::Expr(expr) => out.expr(expr),
            Self::Pat(pat) => out.pat(pat),
            Self::TypeAnn(type_ann) => out.type_ann(type_ann),
            Self::TypeParam(param) => {
                out.opt_type(param.constraint.as_ref());
                out.opt_type(param.default.as_ref());
            }
            Self::Param(param) => {
                out.0.push(NodeRef::Pat(&param.pattern));
                out.opt_type(param.type_ann.as_ref());
                out.opt_expr(param.default.as_ref());
            }
        }
        out.0
    }
}

/// Accumulates children; one method per composite shape.
struct Children<'a>(Vec<NodeRef<'a>>);

impl<'a> Children<'a> {
    fn opt_expr(&mut self, expr: Option<&'a Expr>) {
        self.0.extend(expr.map(NodeRef::Expr));
    }

    fn opt_type(&mut self, type_ann: Option<&'a TypeAnn>) {
        self.0.extend(type_ann.map(NodeRef::TypeAnn));
    }

    fn key(&mut self, key: &'a PropKey) {
        if let PropKey::Computed(expr, _) = key {
            self.0.push(NodeRef::Expr(expr));
        }
    }

    fn body(&mut self, body: &'a Body) {
        match body {
            Body::Block(block) => self.0.push(NodeRef::Block(block)),
            Body::Expr(expr) => self.0.push(NodeRef::Expr(expr)),
        }
    }

    fn function(&mut self, function: &'a Function) {
        self.0.extend(function.type_params.iter().map(NodeRef::TypeParam));
        self.0.extend(function.params.iter().map(NodeRef::Param));
        self.opt_type(function.return_type.as_ref());
        self.opt_type(function.throws.as_ref());
        if let Some(body) = &function.body {
            self.body(body);
        }
    }

    fn function_type(&mut self, signature: &'a FunctionType) {
        self.0.extend(signature.type_params.iter().map(NodeRef::TypeParam));
        self.0.extend(signature.params.iter().map(NodeRef::Param));
        self.0.push(NodeRef::TypeAnn(&signature.return_type));
        self.opt_type(signature.throws.as_ref());
    }

    fn stmt(&mut self, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.0.push(NodeRef::Expr(expr)),
            StmtKind::Decl(decl) => self.0.push(NodeRef::Decl(decl)),
            StmtKind::Return(arg) => self.opt_expr(arg.as_ref()),
            StmtKind::For {
                pattern,
                iterable,
                body,
            } => {
                self.0.push(NodeRef::Pat(pattern));
                self.0.push(NodeRef::Expr(iterable));
                self.0.push(NodeRef::Block(body));
            }
        }
    }

    fn decl(&mut self, decl: &'a Decl) {
        match &decl.kind {
            DeclKind::Var(var) => {
                self.0.push(NodeRef::Pat(&var.pattern));
                self.opt_type(var.type_ann.as_ref());
                self.opt_expr(var.init.as_ref());
            }
            DeclKind::Fn(decl) => self.function(&decl.function),
            DeclKind::TypeAlias(alias) => {
                self.0.extend(alias.type_params.iter().map(NodeRef::TypeParam));
                self.0.push(NodeRef::TypeAnn(&alias.type_ann));
            }
            DeclKind::Class(class) => {
                self.0.extend(class.type_params.iter().map(NodeRef::TypeParam));
                self.opt_type(class.extends.as_ref());
                for member in &class.members {
                    match &member.kind {
                        ClassMemberKind::Field {
                            key,
                            type_ann,
                            init,
                            ..
                        } => {
                            self.key(key);
                            self.opt_type(type_ann.as_ref());
                            self.opt_expr(init.as_ref());
                        }
                        ClassMemberKind::Method { key, function, .. } => {
                            self.key(key);
                            self.function(function);
                        }
                    }
                }
            }
        }
    }

    fn expr(&mut self, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Empty | ExprKind::Literal(_) | ExprKind::Ident(_) => {}
            ExprKind::Unary { arg, .. } => self.0.push(NodeRef::Expr(arg)),
            ExprKind::Binary { left, right, .. } => {
                self.0.push(NodeRef::Expr(left));
                self.0.push(NodeRef::Expr(right));
            }
            ExprKind::Assign { target, value, .. } => {
                self.0.push(NodeRef::Expr(target));
                self.0.push(NodeRef::Expr(value));
            }
            ExprKind::Call { callee, args, .. } => {
                self.0.push(NodeRef::Expr(callee));
                self.0.extend(args.iter().map(|arg| NodeRef::Expr(arg.expr())));
            }
            ExprKind::Index { object, index, .. } => {
                self.0.push(NodeRef::Expr(object));
                self.0.push(NodeRef::Expr(index));
            }
            ExprKind::Member { object, .. } => self.0.push(NodeRef::Expr(object)),
            ExprKind::Array(elems) => {
                self.0.extend(elems.iter().map(|elem| NodeRef::Expr(elem.expr())));
            }
            ExprKind::Object(props) => {
                for prop in props {
                    match prop {
                        ObjProp::KeyValue { key, value, .. } => {
                            self.key(key);
                            self.0.push(NodeRef::Expr(value));
                        }
                        ObjProp::Shorthand(_) => {}
                        ObjProp::Spread { arg, .. } => self.0.push(NodeRef::Expr(arg)),
                    }
                }
            }
            ExprKind::Function(function) => self.function(function),
            ExprKind::IfElse {
                cond,
                consequent,
                alternate,
            } => {
                self.0.push(NodeRef::Expr(cond));
                self.0.push(NodeRef::Block(consequent));
                match alternate {
                    Some(IfElseAlt::Block(block)) => self.0.push(NodeRef::Block(block)),
                    Some(IfElseAlt::IfElse(nested)) => self.0.push(NodeRef::Expr(nested)),
                    None => {}
                }
            }
            ExprKind::Match { value, arms } => {
                self.0.push(NodeRef::Expr(value));
                self.arms(arms);
            }
            ExprKind::Try {
                body,
                catch,
                finally,
            } => {
                self.0.push(NodeRef::Block(body));
                if let Some(catch) = catch {
                    self.arms(&catch.arms);
                }
                self.0.extend(finally.iter().map(NodeRef::Block));
            }
            ExprKind::Throw(arg) | ExprKind::Await(arg) => self.0.push(NodeRef::Expr(arg)),
            ExprKind::Yield(arg) => self.opt_expr(arg.as_deref()),
            ExprKind::Do(block) => self.0.push(NodeRef::Block(block)),
            ExprKind::Template(template) => {
                self.0.extend(template.exprs.iter().map(NodeRef::Expr));
            }
            ExprKind::TaggedTemplate { tag, template } => {
                self.0.push(NodeRef::Expr(tag));
                self.0.extend(template.exprs.iter().map(NodeRef::Expr));
            }
            ExprKind::JsxElement(element) => self.jsx_element(element),
            ExprKind::JsxFragment(fragment) => self.jsx_fragment(fragment),
        }
    }

    fn arms(&mut self, arms: &'a [MatchArm]) {
        for arm in arms {
            self.0.push(NodeRef::Pat(&arm.pattern));
            self.opt_expr(arm.guard.as_ref());
            self.body(&arm.body);
        }
    }

    fn jsx_element(&mut self, element: &'a JsxElement) {
        for attr in &element.opening.attrs {
            if let Some(JsxAttrValue::Expr(container)) = &attr.value {
                self.opt_expr(container.expr.as_ref());
            }
        }
        self.jsx_children(&element.children);
    }

    fn jsx_fragment(&mut self, fragment: &'a JsxFragment) {
        self.jsx_children(&fragment.children);
    }

    fn jsx_children(&mut self, children: &'a [JsxChild]) {
        for child in children {
            match child {
                JsxChild::Text(..) => {}
                JsxChild::Element(element) => self.jsx_element(element),
                JsxChild::Fragment(fragment) => self.jsx_fragment(fragment),
                JsxChild::ExprContainer(container) => self.opt_expr(container.expr.as_ref()),
            }
        }
    }

    fn pat(&mut self, pat: &'a Pat) {
        match &pat.kind {
            PatKind::Ident(binding) => {
                self.opt_type(binding.type_ann.as_ref());
                self.opt_expr(binding.default.as_deref());
            }
            PatKind::Wildcard | PatKind::Literal(_) => {}
            PatKind::Tuple(elems) => self.0.extend(elems.iter().map(NodeRef::Pat)),
            PatKind::Rest(arg) => self.0.push(NodeRef::Pat(arg)),
            PatKind::Extractor { args, .. } => self.0.extend(args.iter().map(NodeRef::Pat)),
            PatKind::Object(elems) | PatKind::Instance { elems, .. } => {
                for elem in elems {
                    match elem {
                        ObjPatElem::KeyValue { value, .. } => self.0.push(NodeRef::Pat(value)),
                        ObjPatElem::Shorthand { default, .. } => self.opt_expr(default.as_ref()),
                        ObjPatElem::Rest { arg, .. } => self.0.push(NodeRef::Pat(arg)),
                    }
                }
            }
        }
    }

    fn type_ann(&mut self, type_ann: &'a TypeAnn) {
        match &type_ann.kind {
            TypeAnnKind::Empty
            | TypeAnnKind::Primitive(_)
            | TypeAnnKind::Literal(_)
            | TypeAnnKind::Infer(_)
            | TypeAnnKind::TypeOf(_) => {}
            TypeAnnKind::Function(signature) => self.function_type(signature),
            TypeAnnKind::Tuple(types)
            | TypeAnnKind::Union(types)
            | TypeAnnKind::Intersection(types)
            | TypeAnnKind::Reference {
                type_args: types, ..
            }
            | TypeAnnKind::TemplateLiteral { types, .. } => {
                self.0.extend(types.iter().map(NodeRef::TypeAnn));
            }
            TypeAnnKind::Rest(inner) | TypeAnnKind::KeyOf(inner) | TypeAnnKind::Mutable(inner) => {
                self.0.push(NodeRef::TypeAnn(inner));
            }
            TypeAnnKind::Object(elems) => {
                for elem in elems {
                    match elem {
                        ObjTypeElem::Property { key, value, .. } => {
                            self.key(key);
                            self.0.push(NodeRef::TypeAnn(value));
                        }
                        ObjTypeElem::Getter { key, signature, .. }
                        | ObjTypeElem::Setter { key, signature, .. }
                        | ObjTypeElem::Method { key, signature, .. } => {
                            self.key(key);
                            self.function_type(signature);
                        }
                        ObjTypeElem::Mapped {
                            key, value, source, ..
                        } => {
                            self.0.push(NodeRef::TypeAnn(key));
                            self.0.push(NodeRef::TypeAnn(value));
                            self.0.push(NodeRef::TypeAnn(source));
                        }
                        ObjTypeElem::RestSpread(inner, _) => self.0.push(NodeRef::TypeAnn(inner)),
                    }
                }
            }
            TypeAnnKind::Conditional {
                check,
                extends,
                true_type,
                false_type,
            } => {
                self.0.push(NodeRef::TypeAnn(check));
                self.0.push(NodeRef::TypeAnn(extends));
                self.0.push(NodeRef::TypeAnn(true_type));
                self.0.push(NodeRef::TypeAnn(false_type));
            }
            TypeAnnKind::IndexedAccess { object, index } => {
                self.0.push(NodeRef::TypeAnn(object));
                self.0.push(NodeRef::TypeAnn(index));
            }
        }
    }
}

// ============================================================================
// Walking
// ============================================================================

/// Visits `root` and every node below it in pre-order.
pub fn walk<'a, F>(root: NodeRef<'a>, f: &mut F)
where
    F: FnMut(NodeRef<'a>),
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        f(node);
        stack.extend(node.children().into_iter().rev());
    }
}

/// Walks every statement of a script.
pub fn walk_script<'a, F>(script: &'a Script, f: &mut F)
where
    F: FnMut(NodeRef<'a>),
{
    for stmt in &script.stmts {
        walk(NodeRef::Stmt(stmt), f);
    }
}

/// Walks every statement of a module.
pub fn walk_module<'a, F>(module: &'a Module, f: &mut F)
where
    F: FnMut(NodeRef<'a>),
{
    for stmt in &module.stmts {
        walk(NodeRef::Stmt(stmt), f);
    }
}

/// Walks a declaration.
pub fn walk_decl<'a, F>(decl: &'a Decl, f: &mut F)
where
    F: FnMut(NodeRef<'a>),
{
    walk(NodeRef::Decl(decl), f);
}

/// Walks an expression.
pub fn walk_expr<'a, F>(expr: &'a Expr, f: &mut F)
where
    F: FnMut(NodeRef<'a>),
{
    walk(NodeRef::Expr(expr), f);
}

/// Walks a type annotation.
pub fn walk_type_ann<'a, F>(type_ann: &'a TypeAnn, f: &mut F)
where
    F: FnMut(NodeRef<'a>),
{
    walk(NodeRef::TypeAnn(type_ann), f);
}

// ============================================================================
// Dependency extraction
// ============================================================================

/// Returns the names a declaration refers to but does not bind, in order of
/// first mention.
///
/// Value references (`foo`, `Foo.bar.baz`), type references, `typeof`
/// targets, extractor and instance patterns, and capitalized JSX tags are
/// collected. A dotted member chain is reported as one qualified name. Names
/// bound anywhere inside the declaration (parameters, patterns, type
/// parameters, `infer` and mapped-type variables) are dropped; the
/// declaration's own name is kept so self-recursion is visible.
#[must_use]
pub fn referenced_names(decl: &Decl) -> Vec<QualifiedIdent> {
    let bound = bound_names(decl);
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    let mut add = |name: QualifiedIdent| {
        let Some(first) = name.parts.first() else {
            return;
        };
        if first.is_placeholder() || bound.contains(&first.name) {
            return;
        }
        if seen.insert(name.dotted()) {
            names.push(name);
        }
    };

    let mut stack = vec![NodeRef::Decl(decl)];
    while let Some(node) = stack.pop() {
        match node {
            NodeRef::Expr(expr) => {
                if let Some(chain) = member_chain(expr) {
                    add(chain);
                    continue;
                }
                match &expr.kind {
                    ExprKind::Object(props) => {
                        for prop in props {
                            if let ObjProp::Shorthand(ident) = prop {
                                add(QualifiedIdent::single(ident.clone()));
                            }
                        }
                    }
                    ExprKind::JsxElement(element) => jsx_tags(element, &mut add),
                    ExprKind::JsxFragment(fragment) => {
                        for child in &fragment.children {
                            jsx_child_tags(child, &mut add);
                        }
                    }
                    _ => {}
                }
            }
            NodeRef::TypeAnn(type_ann) => match &type_ann.kind {
                TypeAnnKind::Reference { name, .. } | TypeAnnKind::TypeOf(name) => {
                    add(name.clone());
                }
                _ => {}
            },
            NodeRef::Pat(pat) => match &pat.kind {
                PatKind::Extractor { name, .. } | PatKind::Instance { name, .. } => {
                    add(name.clone());
                }
                _ => {}
            },
            _ => {}
        }
        stack.extend(node.children().into_iter().rev());
    }
    names
}

/// Returns `a.b.c` for a non-optional member chain rooted at an identifier.
fn member_chain(expr: &Expr) -> Option<QualifiedIdent> {
    match &expr.kind {
        ExprKind::Ident(ident) => Some(QualifiedIdent::single(ident.clone())),
        ExprKind::Member {
            object,
            property,
            optional: false,
        } if !property.is_placeholder() => {
            let mut chain = member_chain(object)?;
            chain.parts.push(property.clone());
            chain.span = expr.span;
            Some(chain)
        }
        _ => None,
    }
}

fn jsx_tags(element: &JsxElement, add: &mut impl FnMut(QualifiedIdent)) {
    let name = &element.opening.name;
    let is_component = name.parts.len() > 1
        || name
            .parts
            .first()
            .and_then(|part| part.name.chars().next())
            .is_some_and(char::is_uppercase);
    if is_component {
        add(name.clone());
    }
    for child in &element.children {
        jsx_child_tags(child, add);
    }
}

fn jsx_child_tags(child: &JsxChild, add: &mut impl FnMut(QualifiedIdent)) {
    match child {
        JsxChild::Element(element) => jsx_tags(element, add),
        JsxChild::Fragment(fragment) => {
            for child in &fragment.children {
                jsx_child_tags(child, add);
            }
        }
        JsxChild::Text(..) | JsxChild::ExprContainer(_) => {}
    }
}

/// Collects every name bound inside a declaration.
fn bound_names(decl: &Decl) -> HashSet<EcoString> {
    let mut bound = HashSet::new();
    walk_decl(decl, &mut |node| match node {
        NodeRef::Pat(pat) => match &pat.kind {
            PatKind::Ident(binding) => {
                bound.insert(binding.name.name.clone());
            }
            PatKind::Object(elems) | PatKind::Instance { elems, .. } => {
                for elem in elems {
                    if let ObjPatElem::Shorthand { key, .. } = elem {
                        bound.insert(key.name.clone());
                    }
                }
            }
            _ => {}
        },
        NodeRef::TypeParam(param) => {
            bound.insert(param.name.name.clone());
        }
        NodeRef::TypeAnn(type_ann) => match &type_ann.kind {
            TypeAnnKind::Infer(ident) => {
                bound.insert(ident.name.clone());
            }
            TypeAnnKind::Object(elems) => {
                for elem in elems {
                    if let ObjTypeElem::Mapped { target, .. } = elem {
                        bound.insert(target.name.clone());
                    }
                }
            }
            _ => {}
        },
        _ => {}
    });
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{Deadline, Source, parse_module, parse_script};

    fn module_decl(text: &str) -> Decl {
        let (module, diagnostics) = parse_module(&Source::anonymous(text), &Deadline::none());
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        module.decls().next().cloned().unwrap_or_else(|| panic!("no declaration in {text:?}"))
    }

    fn names(text: &str) -> Vec<String> {
        referenced_names(&module_decl(text))
            .iter()
            .map(|name| name.dotted().to_string())
            .collect()
    }

    #[test]
    fn walk_is_pre_order() {
        let (script, _) = parse_script(&Source::anonymous("a + b * c"), &Deadline::none());
        let mut idents = Vec::new();
        walk_script(&script, &mut |node| {
            if let NodeRef::Expr(Expr {
                kind: ExprKind::Ident(ident),
                ..
            }) = node
            {
                idents.push(ident.name.to_string());
            }
        });
        assert_eq!(idents, vec!["a", "b", "c"]);
    }

    #[test]
    fn walk_reaches_every_family() {
        let (script, _) = parse_script(
            &Source::anonymous("fn f<T>(x: T = d) -> T { match x { Some(y) => y, _ => x } }"),
            &Deadline::none(),
        );
        let mut families = HashSet::new();
        walk_script(&script, &mut |node| {
            families.insert(std::mem::discriminant(&node));
        });
        assert_eq!(families.len(), 8);
    }

    #[test]
    fn deep_chains_do_not_overflow() {
        let text = format!("{}x", "-".repeat(2_000));
        let (script, _) = parse_script(&Source::anonymous(&text), &Deadline::none());
        let mut count = 0;
        walk_script(&script, &mut |_| count += 1);
        assert_eq!(count, 2_002);
    }

    #[test]
    fn references_exclude_locals() {
        assert_eq!(
            names("fn f(a, {b}) { val c = a + b + g(c)\nreturn h.i.j(c) }"),
            vec!["g", "h.i.j"]
        );
    }

    #[test]
    fn self_reference_is_kept() {
        assert_eq!(
            names("fn fact(n) { if n == 0 { 1 } else { n * fact(n - 1) } }"),
            vec!["fact"]
        );
    }

    #[test]
    fn type_references() {
        assert_eq!(
            names("type Box<T> = {value: T, next: Node.Ref<T>, size: typeof limits} | if T : Array<infer U> { U } else { Other }"),
            vec!["Node.Ref", "limits", "Array", "Other"]
        );
    }

    #[test]
    fn pattern_shorthand_and_jsx() {
        assert_eq!(
            names("val view = match msg { Ok(v) => <Panel.Body>{v}<div/></Panel.Body>, Point {x} => ({x, y}) }"),
            vec!["msg", "Ok", "Panel.Body", "Point", "y"]
        );
    }

    #[test]
    fn class_references() {
        assert_eq!(
            names("class Counter extends Base<Item> { count: number = start\n fn inc(mut self) { self.count = step } }"),
            vec!["Base", "Item", "start", "step"]
        );
    }
}
