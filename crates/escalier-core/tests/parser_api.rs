// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Public-API tests for the Escalier parser.
//!
//! These exercise the crate the way the type checker and the CLI do: build a
//! [`Source`], pick a [`Deadline`], call an entry point, and inspect the tree
//! and diagnostics that come back.

use std::time::Duration;

use escalier_core::ast::{DeclKind, Expr, ExprKind, Script, StmtKind, TypeAnn, TypeAnnKind};
use escalier_core::ast_walker::{NodeRef, referenced_names, walk_module, walk_script};
use escalier_core::source_analysis::{
    Deadline, Diagnostic, DiagnosticKind, Source, SourceId, parse_lib_files, parse_module,
    parse_script, parse_type_ann,
};

fn parse(text: &str) -> (Script, Vec<Diagnostic>) {
    parse_script(&Source::anonymous(text), &Deadline::none())
}

fn only_expr(script: &Script) -> &Expr {
    assert_eq!(script.stmts.len(), 1, "expected one statement: {script:?}");
    match &script.stmts[0].kind {
        StmtKind::Expr(expr) => expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

/// Renders binary/member structure with explicit grouping.
fn grouped(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Ident(ident) => ident.name.to_string(),
        ExprKind::Binary { op, left, right } => {
            format!("({} {} {})", grouped(left), op.as_str(), grouped(right))
        }
        ExprKind::Member {
            object, property, ..
        } => format!("{}.{}", grouped(object), property.name),
        ExprKind::Empty => "<empty>".to_string(),
        other => format!("{other:?}"),
    }
}

fn grouped_type(type_ann: &TypeAnn) -> String {
    let join = |types: &[TypeAnn], sep: &str| {
        let parts: Vec<_> = types.iter().map(grouped_type).collect();
        format!("({})", parts.join(sep))
    };
    match &type_ann.kind {
        TypeAnnKind::Union(types) => join(types, " | "),
        TypeAnnKind::Intersection(types) => join(types, " & "),
        TypeAnnKind::Reference { name, .. } => name.dotted().to_string(),
        other => format!("{other:?}"),
    }
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn multiplicative_binds_tighter_than_additive() {
    let (script, diagnostics) = parse("a * b + c * d");
    assert!(diagnostics.is_empty());
    assert_eq!(grouped(only_expr(&script)), "((a * b) + (c * d))");
}

#[test]
fn member_access_binds_tighter_than_binary() {
    let (script, diagnostics) = parse("a + b.c");
    assert!(diagnostics.is_empty());
    assert_eq!(grouped(only_expr(&script)), "(a + b.c)");
}

#[test]
fn equal_precedence_is_left_associative() {
    let (script, _) = parse("a - b - c");
    assert_eq!(grouped(only_expr(&script)), "((a - b) - c)");
}

#[test]
fn intersection_binds_tighter_than_union() {
    let (type_ann, diagnostics) = parse_type_ann("A & B | X & Y", &Deadline::none());
    assert!(diagnostics.is_empty());
    assert_eq!(grouped_type(&type_ann), "((A & B) | (X & Y))");
}

#[test]
fn same_operator_types_are_n_ary() {
    let (type_ann, diagnostics) = parse_type_ann("A | B | C", &Deadline::none());
    assert!(diagnostics.is_empty());
    let TypeAnnKind::Union(types) = &type_ann.kind else {
        panic!("expected union, got {type_ann:?}");
    };
    assert_eq!(types.len(), 3);
    assert!(types.iter().all(|t| !matches!(t.kind, TypeAnnKind::Union(_))));
}

// ============================================================================
// Error counts
// ============================================================================

#[test]
fn trailing_operator_keeps_a_placeholder_operand() {
    let (script, diagnostics) = parse("a - b +");
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].message, "Expected an expression");
    let ExprKind::Binary { right, .. } = &only_expr(&script).kind else {
        panic!("expected binary expression");
    };
    assert!(right.is_empty());
    assert_eq!(grouped(only_expr(&script)), "((a - b) + <empty>)");
}

#[test]
fn unterminated_call_reports_one_closing_paren() {
    let (script, diagnostics) = parse("foo(a,");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "Expected ')' but got end of file");
    let ExprKind::Call { args, .. } = &only_expr(&script).kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 1);
}

#[test]
fn appending_a_statement_keeps_earlier_errors() {
    for input in ["<a>text</b>", "export 5", "async val x = 1"] {
        let (before_script, before) = parse(input);
        let (after_script, after) = parse(&format!("{input}\nval zz = 1"));
        assert!(!before.is_empty(), "expected errors for {input:?}");
        assert_eq!(before, after, "diagnostics changed for {input:?}");
        assert_eq!(after_script.stmts.len(), before_script.stmts.len() + 1);
    }
}

#[test]
fn any_text_yields_a_tree() {
    for input in ["", ")))", "val", "fn (", "type = |", "<", "`${", "\u{0}\u{feff}", "match {"] {
        let (script, diagnostics) = parse(input);
        let len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        assert!(script.span.end().offset <= len);
        for diagnostic in &diagnostics {
            assert!(diagnostic.span.end().offset <= len, "{diagnostic:?}");
        }
    }
}

// ============================================================================
// Valid programs
// ============================================================================

#[test]
fn valid_snippets_have_expected_shape() {
    let (script, diagnostics) = parse("val x = 5");
    assert!(diagnostics.is_empty());
    assert!(matches!(
        &script.stmts[0].kind,
        StmtKind::Decl(decl) if matches!(decl.kind, DeclKind::Var(_))
    ));

    let (script, diagnostics) = parse("fn add(a, b) { return a + b }");
    assert!(diagnostics.is_empty());
    let StmtKind::Decl(decl) = &script.stmts[0].kind else {
        panic!("expected declaration");
    };
    let DeclKind::Fn(fn_decl) = &decl.kind else {
        panic!("expected function declaration");
    };
    assert_eq!(fn_decl.name.name, "add");
    assert_eq!(fn_decl.function.params.len(), 2);

    let (script, diagnostics) = parse("[1, 2, 3]");
    assert!(diagnostics.is_empty());
    assert!(matches!(&only_expr(&script).kind, ExprKind::Array(elems) if elems.len() == 3));

    let (script, diagnostics) = parse("{x: 1, y: 2}");
    assert!(diagnostics.is_empty());
    assert!(matches!(&only_expr(&script).kind, ExprKind::Object(props) if props.len() == 2));
}

#[test]
fn child_spans_nest_in_a_larger_program() {
    let text = "\
type Shape =
  | {kind: \"circle\", radius: number}
  | {kind: \"square\", size: number}

fn area(shape: Shape) -> number {
  return match shape {
    {kind: \"circle\", radius} => 3.14 * radius * radius,
    {kind: \"square\", size} => size * size,
  }
}

val total = [a, b].map(fn (s) => area(s)).reduce(fn (x, y) => x + y, 0)
";
    let (module, diagnostics) = parse_module(&Source::anonymous(text), &Deadline::none());
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(module.stmts.len(), 3);
    let mut nodes = 0;
    walk_module(&module, &mut |node: NodeRef<'_>| {
        nodes += 1;
        for child in node.children() {
            assert!(
                node.span().contains(child.span()),
                "{:?} escapes {:?}",
                child.span(),
                node.span()
            );
        }
    });
    assert!(nodes > 40);
}

#[test]
fn parsing_twice_gives_identical_results() {
    let text = "val f = fn <T>(x: T) -> T => x\n<p>{f(1)}</p>\nmatch y { Some(v) => v, _ => 0 }";
    assert_eq!(parse(text), parse(text));
}

// ============================================================================
// Modules and library files
// ============================================================================

#[test]
fn module_reports_top_level_expressions() {
    let source = Source::anonymous("val a = 1\nprint(a)");
    let (module, diagnostics) = parse_module(&source, &Deadline::none());
    assert_eq!(module.stmts.len(), 2);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "Expected a declaration at module top level");
    assert_eq!(diagnostics[0].span, module.stmts[1].span);
}

#[test]
fn lib_files_share_one_declaration_space() {
    let sources = [
        Source::new(SourceId::new(1), "lib/a.esc", "type Id = string\nval origin: Point = {x: 0, y: 0}"),
        Source::new(SourceId::new(2), "lib/b.esc", "type Point = {x: number, y: number}"),
    ];
    let (lib, diagnostics) = parse_lib_files(&sources, &Deadline::none());
    assert!(diagnostics.is_empty());
    assert_eq!(lib.decls.len(), 3);
    assert_eq!(lib.sources, vec![SourceId::new(1), SourceId::new(2)]);
    assert_eq!(lib.decls[0].span.source_id(), SourceId::new(1));
    assert_eq!(lib.decls[2].span.source_id(), SourceId::new(2));

    let names: Vec<_> = referenced_names(&lib.decls[1])
        .iter()
        .map(|name| name.dotted().to_string())
        .collect();
    assert_eq!(names, vec!["Point"]);
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn expired_deadline_returns_partial_tree() {
    let text = "val a = 1\n".repeat(1_000);
    let deadline = Deadline::after(Duration::ZERO);
    let (script, diagnostics) = parse_script(&Source::anonymous(text), &deadline);
    assert!(script.stmts.len() < 1_000);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Cancelled);
}

#[test]
fn cancel_handle_stops_a_parse_from_another_thread() {
    let deadline = Deadline::none();
    let handle = deadline.cancel_handle();
    std::thread::spawn(move || handle.cancel())
        .join()
        .expect("cancelling thread panicked");
    let (_, diagnostics) = parse_script(&Source::anonymous("val a = 1"), &deadline);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Cancelled);
}

#[test]
fn cancelled_lib_parse_skips_remaining_files() {
    let sources = [
        Source::new(SourceId::new(1), "a.esc", "val a = 1"),
        Source::new(SourceId::new(2), "b.esc", "val b = 2"),
    ];
    let deadline = Deadline::none();
    deadline.cancel_handle().cancel();
    let (lib, diagnostics) = parse_lib_files(&sources, &deadline);
    assert!(lib.decls.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Cancelled);
}

#[test]
fn walker_sees_every_statement() {
    let (script, _) = parse("val a = 1\nval b = a\nb");
    let mut stmts = 0;
    walk_script(&script, &mut |node: NodeRef<'_>| {
        if matches!(node, NodeRef::Stmt(_)) {
            stmts += 1;
        }
    });
    assert_eq!(stmts, 3);
}
