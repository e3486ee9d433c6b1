// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `escalier parse`: print the AST of one file or one type annotation.

use std::env;

use camino::Utf8Path;
use escalier_core::source_analysis::{
    Deadline, Diagnostic, Source, SourceId, parse_module, parse_script, parse_type_ann,
};
use miette::Result;
use tracing::{debug, instrument};

use super::{finish, project_root, read_source, report_diagnostics};
use crate::config::{self, ParseMode, ParserSettings};

/// Options for `escalier parse`.
#[derive(Debug, Default)]
pub struct ParseOptions<'a> {
    /// Source file to parse; ignored when `type_ann` is set.
    pub path: Option<&'a str>,
    /// Bare type annotation text to parse instead of a file.
    pub type_ann: Option<&'a str>,
    /// `--timeout-ms`
    pub timeout_ms: Option<u64>,
    /// `--module` / `--script`
    pub mode: Option<ParseMode>,
}

/// Parse and print the AST as it comes back, then report diagnostics.
#[instrument(skip_all)]
pub fn run(options: &ParseOptions<'_>) -> Result<()> {
    let env_timeout = env::var(config::TIMEOUT_ENV).ok();

    if let Some(text) = options.type_ann {
        let settings = ParserSettings::resolve(
            options.timeout_ms,
            options.mode,
            env_timeout.as_deref(),
            None,
            Utf8Path::new("."),
        )?;
        let (type_ann, diagnostics) = parse_type_ann(text, &Deadline::after(settings.timeout));
        println!("{type_ann:#?}");
        let source = Source::new(SourceId::default(), "<type-ann>", text);
        report_diagnostics(&diagnostics, &[source]);
        return finish(diagnostics.len(), 1);
    }

    let Some(path) = options.path else {
        miette::bail!("Nothing to parse: pass a source file or --type-ann");
    };
    let path = Utf8Path::new(path);
    let root = project_root(path);
    let manifest = config::find_manifest(&root)?;
    let settings = ParserSettings::resolve(
        options.timeout_ms,
        options.mode,
        env_timeout.as_deref(),
        manifest.as_ref(),
        &root,
    )?;
    debug!(?settings, "resolved parser settings");

    let source = read_source(1, path)?;
    let deadline = Deadline::after(settings.timeout);
    let diagnostics: Vec<Diagnostic> = match settings.mode {
        ParseMode::Script => {
            let (script, diagnostics) = parse_script(&source, &deadline);
            println!("{script:#?}");
            diagnostics
        }
        ParseMode::Module => {
            let (module, diagnostics) = parse_module(&source, &deadline);
            println!("{module:#?}");
            diagnostics
        }
    };
    report_diagnostics(&diagnostics, &[source]);
    finish(diagnostics.len(), 1)
}
