// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations.

pub mod check;
pub mod parse;

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use escalier_core::source_analysis::{Diagnostic, Source, SourceId};
use miette::{Context, IntoDiagnostic, Result};

use crate::diagnostic::ParseDiagnostic;

/// Extension of Escalier source files.
pub const SOURCE_EXTENSION: &str = "esc";

/// Find source files for `path`: the file itself, or every `.esc` file under
/// the directory (its `src/` subdirectory when there is one), sorted.
pub fn find_source_files(path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if path.extension() == Some(SOURCE_EXTENSION) {
            files.push(path.to_path_buf());
        } else {
            miette::bail!("File '{}' is not a .{SOURCE_EXTENSION} source file", path);
        }
    } else if path.is_dir() {
        let src_dir = path.join("src");
        let search_dir = if src_dir.is_dir() {
            src_dir
        } else {
            path.to_path_buf()
        };
        collect_source_files_recursive(&search_dir, &mut files)?;
        files.sort();
    } else {
        miette::bail!("Path '{}' does not exist", path);
    }

    Ok(files)
}

/// Recursively collect `.esc` files. Symlinks are skipped.
fn collect_source_files_recursive(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read directory '{dir}'"))?
    {
        let entry = entry.into_diagnostic()?;
        let file_type = entry.file_type().into_diagnostic()?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| miette::miette!("Non-UTF-8 path"))?;

        if file_type.is_dir() {
            collect_source_files_recursive(&entry_path, files)?;
        } else if file_type.is_file() && entry_path.extension() == Some(SOURCE_EXTENSION) {
            files.push(entry_path);
        }
    }
    Ok(())
}

/// The directory a manifest is looked up in for `path`.
pub fn project_root(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()
            .filter(|parent| !parent.as_str().is_empty())
            .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf)
    }
}

/// Read `path` into a [`Source`] with the given id.
pub fn read_source(id: u32, path: &Utf8Path) -> Result<Source> {
    let contents = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read '{path}'"))?;
    Ok(Source::new(SourceId::new(id), path, contents))
}

/// Print each diagnostic against the source its span belongs to.
pub fn report_diagnostics(diagnostics: &[Diagnostic], sources: &[Source]) {
    for diagnostic in diagnostics {
        let source = sources
            .iter()
            .find(|source| source.id() == diagnostic.span.source_id());
        let (path, text) = source.map_or(("<unknown>", ""), |source| {
            (source.path().as_str(), source.contents())
        });
        let rendered = ParseDiagnostic::from_core_diagnostic(diagnostic, path, text);
        eprintln!("{:?}", miette::Report::new(rendered));
    }
}

/// Fail with a summary if any diagnostics were reported.
pub fn finish(diagnostic_count: usize, files_checked: usize) -> Result<()> {
    if diagnostic_count > 0 {
        let plural = if diagnostic_count == 1 { "" } else { "s" };
        miette::bail!("{diagnostic_count} diagnostic{plural} found in {files_checked} file(s)");
    }
    Ok(())
}
