//! Shared page types used by discovery, rendering and the build.

use crate::naming;
use std::path::{Path, PathBuf};

/// Suffix of the per-page options sidecar.
pub const SIDECAR_EXTENSION: &str = "json";

/// Suffix every finished page is written with.
pub const OUTPUT_EXTENSION: &str = "html";

/// Raw content format of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// HTML fragment, copied into `<main>` line by line.
    Html,
    /// Markdown, converted to HTML before it lands in `<main>`.
    Markdown,
}

impl PageKind {
    /// Content kind for a file extension, `None` if it is not a page.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("html") {
            Some(Self::Html)
        } else if ext.eq_ignore_ascii_case("md") {
            Some(Self::Markdown)
        } else {
            None
        }
    }
}

/// One page of the site, identified by the absolute path of its raw content.
///
/// Pages are created once during discovery and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Page {
    source: PathBuf,
}

impl Page {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Absolute path to the raw content file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn kind(&self) -> PageKind {
        self.source
            .extension()
            .and_then(|e| PageKind::from_extension(&e.to_string_lossy()))
            .unwrap_or(PageKind::Html)
    }

    /// Default title and nav label: file stem with underscores as spaces.
    pub fn name(&self) -> String {
        naming::file_label(&self.source)
    }

    /// Where the finished page sits relative to other pages: same folder, `.html` suffix.
    pub fn output_path(&self) -> PathBuf {
        self.source.with_extension(OUTPUT_EXTENSION)
    }

    /// Path of the options sidecar (`about.html` → `about.json`).
    pub fn sidecar(&self) -> PathBuf {
        self.source.with_extension(SIDECAR_EXTENSION)
    }
}
