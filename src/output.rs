//! CLI output formatting for every command.
//!
//! Output lists what was produced, by page identity first and file second,
//! so a build log reads as a table of contents of the site.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 about → about.html
//! 002 setup → guide/setup.html
//!     Source: guide/setup.md
//!
//! Removed 1 stale page
//! Built 3 pages
//! ```
//!
//! ## Style
//!
//! ```text
//! plain → style.css
//!     00-reset.css
//!     10-layout.css
//! ```
//!
//! ## Tidy
//!
//! ```text
//! index.html
//! guide/setup.html (warnings)
//! Cleaned 2 files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::index::SiteIndex;
use crate::site::BuildReport;
use crate::style::{AppliedStyle, STYLESHEET};
use crate::tidy::{TidiedFile, TidyOutcome};
use crate::types::PageKind;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `base`, `/`-separated; unchanged when outside `base`.
fn display_relative(path: &Path, base: &Path) -> String {
    let Ok(rel) = path.strip_prefix(base) else {
        return path.display().to_string();
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// `"1 page"`, `"3 pages"`.
fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of a build: one line per page in build order.
///
/// Markdown pages get a `Source:` line since their output name differs.
pub fn format_build_output(index: &SiteIndex, report: &BuildReport, target: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (pos, (page, output)) in index.pages().iter().zip(&report.written).enumerate() {
        let output = display_relative(output, target);
        if pos == 0 {
            lines.push(format!("Home \u{2192} {}", output));
        } else {
            lines.push(format!("{} {} \u{2192} {}", format_index(pos), page.name(), output));
        }
        if page.kind() == PageKind::Markdown {
            lines.push(format!(
                "{}Source: {}",
                indent(1),
                display_relative(page.source(), index.root())
            ));
        }
    }

    lines.push(String::new());
    if !report.removed.is_empty() {
        lines.push(format!("Removed {}", counted(report.removed.len(), "stale page")));
    }
    lines.push(format!("Built {}", counted(report.written.len(), "page")));
    lines
}

pub fn print_build_output(index: &SiteIndex, report: &BuildReport, target: &Path) {
    print_lines(format_build_output(index, report, target));
}

// ============================================================================
// Style
// ============================================================================

/// Format an applied style: the style name, then its sheets in order.
pub fn format_style_output(name: &str, applied: &AppliedStyle, styles_dir: &Path) -> Vec<String> {
    let style_dir = styles_dir.join(name);
    let mut lines = vec![format!("{} \u{2192} {}", name, STYLESHEET)];
    if applied.sheets.is_empty() {
        lines.push(format!("{}(no .css files)", indent(1)));
    }
    for sheet in &applied.sheets {
        lines.push(format!("{}{}", indent(1), display_relative(sheet, &style_dir)));
    }
    lines
}

pub fn print_style_output(name: &str, applied: &AppliedStyle, styles_dir: &Path) {
    print_lines(format_style_output(name, applied, styles_dir));
}

// ============================================================================
// Delete
// ============================================================================

pub fn format_delete_output(removed: &[std::path::PathBuf], target: &Path) -> Vec<String> {
    let mut lines: Vec<String> = removed
        .iter()
        .map(|p| format!("Deleted {}", display_relative(p, target)))
        .collect();
    lines.push(format!("Removed {}", counted(removed.len(), "file")));
    lines
}

pub fn print_delete_output(removed: &[std::path::PathBuf], target: &Path) {
    print_lines(format_delete_output(removed, target));
}

// ============================================================================
// Tidy
// ============================================================================

/// Format cleaned files; files tidy warned about are flagged.
pub fn format_tidy_output(files: &[TidiedFile], target: &Path) -> Vec<String> {
    let mut lines: Vec<String> = files
        .iter()
        .map(|f| {
            let path = display_relative(&f.clean, target);
            match f.outcome {
                TidyOutcome::Clean => path,
                TidyOutcome::Warnings(_) => format!("{} (warnings)", path),
            }
        })
        .collect();
    lines.push(format!("Cleaned {}", counted(files.len(), "file")));
    lines
}

pub fn print_tidy_output(files: &[TidiedFile], target: &Path) {
    print_lines(format_tidy_output(files, target));
}
