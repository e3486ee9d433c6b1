// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rich diagnostics using miette.
//!
//! Converts escalier-core parser diagnostics into miette reports with the
//! offending source line, an arrow labelled by diagnostic kind, and the
//! parser's hint as help text.

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use escalier_core::source_analysis::{Diagnostic as CoreDiagnostic, DiagnosticKind};
use miette::{Diagnostic, SourceSpan};

/// A parser diagnostic attached to its source file.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(escalier::parse))]
pub struct ParseDiagnostic {
    /// Human-readable error message
    pub message: String,
    /// Source code for context
    #[source_code]
    pub src: miette::NamedSource<String>,
    /// Location of the error
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label for the error span
    pub label: &'static str,
    /// Suggested fix, if the parser had one
    #[help]
    pub hint: Option<String>,
}

impl ParseDiagnostic {
    /// Wraps a core diagnostic for the file at `source_path`.
    pub fn from_core_diagnostic(
        diagnostic: &CoreDiagnostic,
        source_path: &str,
        source: &str,
    ) -> Self {
        let label = match diagnostic.kind {
            DiagnosticKind::Syntax => "unexpected here",
            DiagnosticKind::Incomplete => "input ends here",
            DiagnosticKind::MalformedLiteral => "malformed literal",
            DiagnosticKind::Cancelled => "parsing stopped here",
        };

        Self {
            message: diagnostic.message.to_string(),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: diagnostic.span.into(),
            label,
            hint: diagnostic.hint.as_ref().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escalier_core::source_analysis::{Deadline, Source, parse_module, parse_script};

    fn first_diagnostic(text: &str) -> ParseDiagnostic {
        let source = Source::anonymous(text);
        let (_, diagnostics) = parse_script(&source, &Deadline::none());
        ParseDiagnostic::from_core_diagnostic(&diagnostics[0], "test.esc", text)
    }

    #[test]
    fn syntax_error_points_at_token() {
        let diag = first_diagnostic("val x = (1 + 2]");
        assert_eq!(diag.message, "Expected ')' but got ']'");
        assert_eq!(diag.span.offset(), 14);
        assert_eq!(diag.span.len(), 1);
        assert_eq!(diag.label, "unexpected here");
    }

    #[test]
    fn unterminated_input_is_incomplete() {
        let diag = first_diagnostic("foo(a,");
        assert_eq!(diag.label, "input ends here");
        assert_eq!(diag.span.offset(), 6);
        assert_eq!(diag.span.len(), 0);
    }

    #[test]
    fn hint_becomes_help() {
        let text = "val a = 1\nprint(a)";
        let (_, diagnostics) = parse_module(&Source::anonymous(text), &Deadline::none());
        let diag = ParseDiagnostic::from_core_diagnostic(&diagnostics[0], "lib.esc", text);
        assert!(diag.hint.as_deref().is_some_and(|h| h.contains("may appear here")));
        assert_eq!(diag.span.offset(), 10);
        assert_eq!(diag.span.len(), 8);
    }

    #[test]
    fn report_renders_message_and_path() {
        let diag = first_diagnostic("foo(a,");
        let rendered = format!("{:?}", miette::Report::new(diag));
        assert!(rendered.contains("Expected ')' but got end of file"));
    }
}
