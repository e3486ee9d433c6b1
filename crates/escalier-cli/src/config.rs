// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parser settings from flags, the environment, and `escalier.toml`.
//!
//! Each setting is taken from the first source that provides it:
//! command-line flag, then `ESCALIER_PARSE_TIMEOUT_MS`, then the manifest's
//! `[parser]` table, then the built-in default.
//!
//! ```toml
//! [parser]
//! timeout_ms = 1000
//! mode = "module"
//! lib = ["lib/dom.d.esc"]
//! ```

use std::fs;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use tracing::debug;

/// Manifest file looked up next to the sources.
pub const MANIFEST_NAME: &str = "escalier.toml";

/// Environment variable overriding the parse timeout.
pub const TIMEOUT_ENV: &str = "ESCALIER_PARSE_TIMEOUT_MS";

/// Timeout used when nothing else sets one.
pub const DEFAULT_TIMEOUT_MS: u64 = 1_000;

/// How each source file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Any statements at top level.
    #[default]
    Script,
    /// Declarations only.
    Module,
}

/// The top-level structure of `escalier.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// The `[parser]` table.
    #[serde(default)]
    pub parser: ParserSection,
}

/// The `[parser]` table. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserSection {
    /// Deadline for each parse, in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Default parse mode.
    pub mode: Option<ParseMode>,
    /// Library files, relative to the manifest, parsed into one declaration
    /// space before the sources.
    #[serde(default)]
    pub lib: Vec<String>,
}

/// Parse an `escalier.toml` manifest file.
pub fn parse_manifest(path: &Utf8Path) -> Result<Manifest> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read manifest '{path}'"))?;

    toml::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse manifest '{path}'"))
}

/// Look for `escalier.toml` in `project_root` and parse it if found.
pub fn find_manifest(project_root: &Utf8Path) -> Result<Option<Manifest>> {
    let manifest_path = project_root.join(MANIFEST_NAME);
    if manifest_path
        .try_exists()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to stat manifest '{manifest_path}'"))?
    {
        debug!(path = %manifest_path, "found manifest");
        parse_manifest(&manifest_path).map(Some)
    } else {
        Ok(None)
    }
}

/// Settings for one CLI run, after precedence is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    /// Deadline for each parse.
    pub timeout: Duration,
    /// How sources are parsed.
    pub mode: ParseMode,
    /// Library files, resolved against the project root.
    pub lib: Vec<Utf8PathBuf>,
}

impl ParserSettings {
    /// Combines the sources of each setting, highest precedence first.
    ///
    /// `env_timeout` is the raw value of [`TIMEOUT_ENV`]; a value that is not
    /// a whole number of milliseconds is an error rather than ignored.
    pub fn resolve(
        flag_timeout: Option<u64>,
        flag_mode: Option<ParseMode>,
        env_timeout: Option<&str>,
        manifest: Option<&Manifest>,
        project_root: &Utf8Path,
    ) -> Result<Self> {
        let section = manifest.map(|m| &m.parser);
        let env_timeout = env_timeout
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    miette::miette!("{TIMEOUT_ENV} must be a number of milliseconds, got '{raw}'")
                })
            })
            .transpose()?;
        let timeout_ms = flag_timeout
            .or(env_timeout)
            .or_else(|| section.and_then(|s| s.timeout_ms))
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let mode = flag_mode
            .or_else(|| section.and_then(|s| s.mode))
            .unwrap_or_default();
        let lib = section
            .map(|s| s.lib.iter().map(|p| project_root.join(p)).collect())
            .unwrap_or_default();

        Ok(Self {
            timeout: Duration::from_millis(timeout_ms),
            mode,
            lib,
        })
    }
}
