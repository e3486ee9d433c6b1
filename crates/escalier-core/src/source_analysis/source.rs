// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source buffers handed to the lexer and parser.

use camino::{Utf8Path, Utf8PathBuf};

/// Identifies one source file within a multi-file build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SourceId(u32);

impl SourceId {
    /// Creates a source id from a raw index.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One file's full text, immutable once parsing begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    id: SourceId,
    path: Utf8PathBuf,
    contents: String,
}

impl Source {
    /// Creates a new source.
    #[must_use]
    pub fn new(id: SourceId, path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Creates an anonymous source with id 0, for snippets and tooling.
    #[must_use]
    pub fn anonymous(contents: impl Into<String>) -> Self {
        Self::new(SourceId::default(), "<input>", contents)
    }

    /// Returns the source id.
    #[must_use]
    pub const fn id(&self) -> SourceId {
        self.id
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the full text.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }
}
