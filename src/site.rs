//! Site build and housekeeping.
//!
//! [`build`] turns a [`SiteIndex`] into finished pages under a target folder:
//!
//! ```text
//! ready/index.html        →  site/index.html
//! ready/about.md          →  site/about.html
//! ready/guide/setup.html  →  site/guide/setup.html
//! ```
//!
//! Every page is rendered in memory before the first file is written, so a
//! bad sidecar or a missing content file fails the build with the target
//! left as it was. Rendering runs in parallel with [rayon]; results are
//! collected in build order and written one by one.
//!
//! [rayon]: https://docs.rs/rayon

use crate::index::{IndexError, SiteIndex};
use crate::render::{PageRenderer, RenderError, to_document};
use crate::types::OUTPUT_EXTENSION;
use crate::urlpath;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Target folder not found: {0}")]
    MissingTarget(PathBuf),
    #[error("Target {target} is inside the source folder {root}")]
    TargetInsideSource { target: PathBuf, root: PathBuf },
    #[error("Target {target} contains the source folder {root}")]
    SourceInsideTarget { target: PathBuf, root: PathBuf },
    #[error("No suffix given")]
    EmptySuffix,
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

/// What a build wrote and removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Output files in build order.
    pub written: Vec<PathBuf>,
    /// Stale `.html` files removed by a clean build.
    pub removed: Vec<PathBuf>,
}

/// Render every page of `index` and write it under `target`.
///
/// With `clean`, existing `.html` files under `target` are removed first
/// (after rendering succeeded), so pages dropped from the source disappear.
pub fn build(index: &SiteIndex, target: &Path, clean: bool) -> Result<BuildReport, BuildError> {
    let target = urlpath::normalize(&std::path::absolute(target)?);
    check_overlap(index.root(), &target)?;

    let renderer = PageRenderer::new(index);
    let rendered: Vec<(PathBuf, String)> = index
        .pages()
        .par_iter()
        .map(|page| -> Result<(PathBuf, String), BuildError> {
            let options = index.options_for(page)?;
            let lines = renderer.render(page, &options)?;
            Ok((target.join(index.output_relative(page)), to_document(&lines)))
        })
        .collect::<Result<_, _>>()?;

    let mut report = BuildReport::default();
    if clean && target.is_dir() {
        report.removed = delete_suffix(&target, OUTPUT_EXTENSION)?;
    }

    for (path, text) in rendered {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, text)?;
        log::info!("Wrote {}", path.display());
        report.written.push(path);
    }
    Ok(report)
}

/// Refuse a target that overlaps the source folder in either direction.
///
/// `root` is canonical, so `target` is resolved through its nearest existing
/// ancestor before comparing; a symlinked or `..`-laden target still counts.
fn check_overlap(root: &Path, target: &Path) -> Result<(), BuildError> {
    let resolved = resolve_existing(target)?;
    if resolved.starts_with(root) {
        return Err(BuildError::TargetInsideSource {
            target: target.to_path_buf(),
            root: root.to_path_buf(),
        });
    }
    if root.starts_with(&resolved) {
        return Err(BuildError::SourceInsideTarget {
            target: target.to_path_buf(),
            root: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonical form of the longest existing prefix of `path`, rest appended.
fn resolve_existing(path: &Path) -> Result<PathBuf, BuildError> {
    let mut existing = path;
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return Ok(path.to_path_buf()),
        }
    }
    let mut resolved = existing.canonicalize()?;
    resolved.extend(missing.into_iter().rev());
    Ok(resolved)
}

/// Remove every file under `target` whose name ends in `.suffix`.
///
/// A leading dot on `suffix` is optional. Returns the removed paths, sorted.
pub fn delete_suffix(target: &Path, suffix: &str) -> Result<Vec<PathBuf>, BuildError> {
    let suffix = suffix.trim_start_matches('.');
    if suffix.is_empty() {
        return Err(BuildError::EmptySuffix);
    }
    if !target.is_dir() {
        return Err(BuildError::MissingTarget(target.to_path_buf()));
    }

    let ending = format!(".{suffix}");
    let mut doomed = Vec::new();
    for entry in WalkDir::new(target) {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(&ending) {
            doomed.push(entry.into_path());
        }
    }
    doomed.sort();

    for path in &doomed {
        fs::remove_file(path)?;
        log::info!("Deleted {}", path.display());
    }
    Ok(doomed)
}

/// HTML validation of a built site. Not implemented.
pub fn check(_target: &Path) -> Result<(), BuildError> {
    Err(BuildError::Unsupported("HTML validation"))
}

/// Importing content from another format. Not implemented.
pub fn import(_source: &Path) -> Result<(), BuildError> {
    Err(BuildError::Unsupported("Content import"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn build_mirrors_source_layout() {
        let tmp = write_site(&[
            ("ready/index.html", "<p>Hi</p>"),
            ("ready/guide/setup.html", "<p>Setup</p>"),
        ]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        let target = tmp.path().join("site");
        let report = build(&index, &target, false).unwrap();

        assert_eq!(report.written.len(), 2);
        assert!(report.removed.is_empty());
        assert!(read(&target.join("index.html")).contains("<p>Hi</p>"));
        assert!(read(&target.join("guide/setup.html")).contains("<p>Setup</p>"));
    }

    #[cfg(feature = "markdown")]
    #[test]
    fn markdown_pages_become_html_files() {
        let tmp = write_site(&[("ready/index.md", "*hi*")]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        let target = tmp.path().join("site");
        build(&index, &target, false).unwrap();

        assert!(read(&target.join("index.html")).contains("<p><em>hi</em></p>"));
        assert!(!target.join("index.md").exists());
    }

    #[test]
    fn written_pages_are_in_build_order() {
        let tmp = write_site(&[
            ("ready/index.html", "h"),
            ("ready/b.html", "b"),
            ("ready/a.html", "a"),
            ("ready/pages.txt", "b.html\na.html\n"),
        ]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        let target = tmp.path().join("site");
        let report = build(&index, &target, false).unwrap();

        let names: Vec<String> = report
            .written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["index.html", "b.html", "a.html"]);
    }

    #[test]
    fn failed_render_writes_nothing() {
        let tmp = write_site(&[
            ("ready/index.html", "h"),
            ("ready/about.html", "a"),
            ("ready/about.json", "{broken"),
        ]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        let target = tmp.path().join("site");
        let result = build(&index, &target, false);

        assert!(matches!(result, Err(BuildError::Index(IndexError::Options { .. }))));
        assert!(!target.exists());
    }

    #[test]
    fn failed_clean_build_keeps_old_output() {
        let tmp = write_site(&[
            ("ready/index.html", "h"),
            ("ready/about.html", "a"),
            ("site/old.html", "old"),
        ]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        fs::remove_file(tmp.path().join("ready/about.html")).unwrap();

        let result = build(&index, &tmp.path().join("site"), true);
        assert!(matches!(result, Err(BuildError::Render(RenderError::Read { .. }))));
        assert_eq!(read(&tmp.path().join("site/old.html")), "old");
    }

    #[test]
    fn clean_build_removes_stale_pages_only() {
        let tmp = write_site(&[
            ("ready/index.html", "h"),
            ("site/gone.html", "stale"),
            ("site/style.css", "body {}"),
        ]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        let target = tmp.path().join("site");
        let report = build(&index, &target, true).unwrap();

        assert_eq!(report.removed, vec![target.join("gone.html")]);
        assert!(!target.join("gone.html").exists());
        assert!(target.join("style.css").exists());
        assert!(target.join("index.html").exists());
    }

    #[test]
    fn target_inside_source_is_rejected() {
        let tmp = write_site(&[("ready/index.html", "h")]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        let result = build(&index, &index.root().join("out"), false);
        assert!(matches!(result, Err(BuildError::TargetInsideSource { .. })));
    }

    #[test]
    fn target_containing_source_is_rejected() {
        let tmp = write_site(&[("ready/index.html", "h"), ("ready/about.html", "a")]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();

        let result = build(&index, tmp.path(), true);
        assert!(matches!(result, Err(BuildError::SourceInsideTarget { .. })));
        assert_eq!(read(&tmp.path().join("ready/about.html")), "a");
        assert_eq!(read(&tmp.path().join("ready/index.html")), "h");
    }

    #[test]
    fn target_equal_to_source_is_rejected() {
        let tmp = write_site(&[("ready/index.html", "h")]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        let result = build(&index, &tmp.path().join("site/../ready"), true);
        assert!(matches!(result, Err(BuildError::TargetInsideSource { .. })));
        assert!(tmp.path().join("ready/index.html").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_target_over_source_is_rejected() {
        let tmp = write_site(&[("ready/index.html", "h")]);
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("link")).unwrap();
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();

        let result = build(&index, &tmp.path().join("link"), true);
        assert!(matches!(result, Err(BuildError::SourceInsideTarget { .. })));
        assert!(tmp.path().join("ready/index.html").exists());
    }

    #[test]
    fn sibling_target_with_shared_prefix_is_allowed() {
        let tmp = write_site(&[("ready/index.html", "h")]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        build(&index, &tmp.path().join("ready-site"), true).unwrap();
        assert!(tmp.path().join("ready-site/index.html").exists());
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let tmp = write_site(&[
            ("ready/index.html", "h"),
            ("ready/x/y.html", "y"),
            ("ready/a.html", "a"),
        ]);
        let index = SiteIndex::load(&tmp.path().join("ready")).unwrap();
        let target = tmp.path().join("site");

        build(&index, &target, false).unwrap();
        let first = read(&target.join("x/y.html"));
        build(&index, &target, false).unwrap();
        assert_eq!(first, read(&target.join("x/y.html")));
    }

    #[test]
    fn delete_suffix_removes_matching_files() {
        let tmp = write_site(&[
            ("a.html", "a"),
            ("sub/b.html", "b"),
            ("keep.css", "c"),
            ("keep.xhtml.bak", "d"),
        ]);
        let removed = delete_suffix(tmp.path(), ".html").unwrap();

        assert_eq!(removed, vec![tmp.path().join("a.html"), tmp.path().join("sub/b.html")]);
        assert!(tmp.path().join("keep.css").exists());
        assert!(tmp.path().join("keep.xhtml.bak").exists());
    }

    #[test]
    fn delete_suffix_needs_existing_target() {
        let tmp = write_site(&[]);
        let result = delete_suffix(&tmp.path().join("nope"), "html");
        assert!(matches!(result, Err(BuildError::MissingTarget(_))));
    }

    #[test]
    fn delete_suffix_rejects_empty_suffix() {
        let tmp = write_site(&[("a.html", "a")]);
        assert!(matches!(delete_suffix(tmp.path(), "."), Err(BuildError::EmptySuffix)));
        assert!(tmp.path().join("a.html").exists());
    }

    #[test]
    fn check_and_import_are_unsupported() {
        let tmp = write_site(&[]);
        assert!(matches!(check(tmp.path()), Err(BuildError::Unsupported(_))));
        assert!(matches!(import(tmp.path()), Err(BuildError::Unsupported(_))));
    }
}
