// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `escalier check`: parse every source file and report diagnostics only.
//!
//! Library files named by the manifest are parsed first, as one declaration
//! space, and their diagnostics are reported with the rest.

use std::env;

use camino::Utf8PathBuf;
use escalier_core::source_analysis::{Deadline, parse_lib_files, parse_module, parse_script};
use miette::Result;
use tracing::{debug, info, instrument};

use super::{find_source_files, finish, project_root, read_source, report_diagnostics};
use crate::config::{self, ParseMode, ParserSettings};

/// Check `path` (a file or a directory of `.esc` files).
#[instrument(skip_all, fields(path = %path))]
pub fn run(path: &str, timeout_ms: Option<u64>, mode: Option<ParseMode>) -> Result<()> {
    let path = Utf8PathBuf::from(path);
    let files = find_source_files(&path)?;
    if files.is_empty() {
        miette::bail!("No .esc source files found in '{path}'");
    }

    let root = project_root(&path);
    let manifest = config::find_manifest(&root)?;
    let env_timeout = env::var(config::TIMEOUT_ENV).ok();
    let settings = ParserSettings::resolve(
        timeout_ms,
        mode,
        env_timeout.as_deref(),
        manifest.as_ref(),
        &root,
    )?;
    debug!(?settings, "resolved parser settings");

    let mut next_id = 1;
    let mut diagnostic_count = 0;

    if !settings.lib.is_empty() {
        let mut lib_sources = Vec::with_capacity(settings.lib.len());
        for lib in &settings.lib {
            lib_sources.push(read_source(next_id, lib)?);
            next_id += 1;
        }
        let (lib, diagnostics) =
            parse_lib_files(&lib_sources, &Deadline::after(settings.timeout));
        info!(files = lib_sources.len(), decls = lib.decls.len(), "parsed library files");
        report_diagnostics(&diagnostics, &lib_sources);
        diagnostic_count += diagnostics.len();
    }

    for file in &files {
        let source = read_source(next_id, file)?;
        next_id += 1;
        let deadline = Deadline::after(settings.timeout);
        let diagnostics = match settings.mode {
            ParseMode::Script => parse_script(&source, &deadline).1,
            ParseMode::Module => parse_module(&source, &deadline).1,
        };
        debug!(file = %file, diagnostics = diagnostics.len(), "checked file");
        report_diagnostics(&diagnostics, std::slice::from_ref(&source));
        diagnostic_count += diagnostics.len();
    }

    info!(files = files.len(), diagnostic_count, "check finished");
    finish(diagnostic_count, files.len() + settings.lib.len())
}
