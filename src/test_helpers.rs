//! Shared test utilities for the folio test suite.
//!
//! Builds throwaway source trees and pulls pieces out of rendered pages.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = write_site(&[
//!     ("index.html", "<p>Hi</p>"),
//!     ("guide/setup.md", "# Setup"),
//! ]);
//! let index = SiteIndex::load(tmp.path()).unwrap();
//! assert_eq!(relative_pages(&index), vec!["index.html", "guide/setup.md"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::index::SiteIndex;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `(relative path, contents)` pairs into a fresh temp directory.
///
/// Parent folders are created as needed.
pub fn write_site(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_files(tmp.path(), files);
    tmp
}

/// Write `(relative path, contents)` pairs under `root`.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
    }
}

// =========================================================================
// Index extractors
// =========================================================================

/// Page sources relative to the index root, `/`-separated, in build order.
pub fn relative_pages(index: &SiteIndex) -> Vec<String> {
    index
        .pages()
        .iter()
        .map(|p| {
            p.source()
                .strip_prefix(index.root())
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

/// Display names of all pages in build order.
pub fn page_names(index: &SiteIndex) -> Vec<String> {
    index.pages().iter().map(|p| p.name()).collect()
}

// =========================================================================
// Rendered output helpers
// =========================================================================

/// Lines strictly between the first `open` line and the next `close` line.
///
/// Panics if either marker is missing.
pub fn block<'a>(lines: &'a [String], open: &str, close: &str) -> &'a [String] {
    let start = lines
        .iter()
        .position(|l| l == open)
        .unwrap_or_else(|| panic!("'{open}' not found in {lines:#?}"));
    let end = lines[start..]
        .iter()
        .position(|l| l == close)
        .map(|i| start + i)
        .unwrap_or_else(|| panic!("'{close}' not found after '{open}'"));
    &lines[start + 1..end]
}

/// Number of lines equal to `line`.
pub fn count_lines(lines: &[String], line: &str) -> usize {
    lines.iter().filter(|l| *l == line).count()
}
