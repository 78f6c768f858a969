//! Page discovery.
//!
//! Stage 1 of the build. [`SiteIndex::load`] walks a source folder once and
//! returns an immutable index: the home page, every other page in build order,
//! and the site-wide default options.
//!
//! ## Source Layout
//!
//! ```text
//! ready/                      # Source root
//! ├── index.html              # Home page (index.md works too; exactly one)
//! ├── index.json              # Default options for every page (optional)
//! ├── pages.txt               # Explicit page order (optional)
//! ├── about.html
//! ├── about.json              # Options for about.html (optional)
//! └── guide/
//!     ├── setup.md
//!     └── usage.html
//! ```
//!
//! ## Page Order
//!
//! The home page always comes first. If `pages.txt` exists, the remaining
//! pages follow in the order it lists them (one path per line, relative to
//! the root, blank lines ignored). Otherwise every `.html` and `.md` file
//! under the root is collected and sorted by path. Hidden files and folders
//! are skipped.
//!
//! The order drives the navigation sequence and prev/next links, so it has
//! to be identical on every run over an unchanged tree.

use crate::options::PageOptions;
use crate::types::{Page, PageKind, SIDECAR_EXTENSION};
use crate::urlpath;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File listing pages in explicit build order.
pub const MANIFEST_FILE: &str = "pages.txt";

/// Stem of the home page file.
pub const HOME_STEM: &str = "index";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source folder not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Home page missing: no index.html or index.md in {0}")]
    MissingHome(PathBuf),
    #[error("Ambiguous home page, found {0:?}")]
    AmbiguousHome(Vec<PathBuf>),
    #[error("{manifest} lists a page that does not exist: {entry}")]
    MissingManifestEntry { manifest: PathBuf, entry: PathBuf },
    #[error("{manifest} lists a page outside the source folder: {entry}")]
    ManifestEntryOutsideRoot { manifest: PathBuf, entry: PathBuf },
    #[error("{manifest} lists a file that is not a page (.html or .md): {entry}")]
    ManifestEntryNotAPage { manifest: PathBuf, entry: PathBuf },
    #[error("{manifest} lists {entry} more than once")]
    DuplicateManifestEntry { manifest: PathBuf, entry: PathBuf },
    #[error("{first} and {second} both build to {output}")]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },
    #[error("Invalid options in {path}: {source}")]
    Options {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The discovered site: immutable once loaded.
#[derive(Debug, Clone)]
pub struct SiteIndex {
    root: PathBuf,
    pages: Vec<Page>,
    defaults: PageOptions,
}

impl SiteIndex {
    /// Discover the home page, the ordered page list and default options under `root`.
    pub fn load(root: &Path) -> Result<Self, IndexError> {
        Self::load_with_manifest(root, MANIFEST_FILE)
    }

    /// Like [`SiteIndex::load`], reading page order from `manifest` instead of `pages.txt`.
    pub fn load_with_manifest(root: &Path, manifest: &str) -> Result<Self, IndexError> {
        let root = root
            .canonicalize()
            .map_err(|_| IndexError::MissingRoot(root.to_path_buf()))?;
        let home = find_home(&root)?;
        let pages = discover_pages(&root, &home, manifest)?;
        let defaults = load_options(&home)?;

        log::debug!("Found {} pages under {}", pages.len(), root.display());
        Ok(Self {
            root,
            pages,
            defaults,
        })
    }

    /// Absolute source folder; the home page's parent.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn home(&self) -> &Page {
        &self.pages[0]
    }

    /// All pages, home first.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Options from the home page's sidecar.
    pub fn defaults(&self) -> &PageOptions {
        &self.defaults
    }

    /// Position of `page` in build order.
    pub fn position(&self, page: &Page) -> Option<usize> {
        self.pages.iter().position(|p| p == page)
    }

    /// Effective options for `page`: defaults overlaid with its own sidecar.
    pub fn options_for(&self, page: &Page) -> Result<PageOptions, IndexError> {
        Ok(self.defaults.clone().merge(load_options(page)?))
    }

    /// Output path of `page` relative to the root, with an `.html` suffix.
    pub fn output_relative(&self, page: &Page) -> PathBuf {
        let output = page.output_path();
        output
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or(output)
    }
}

/// Find the single `index.*` file (sidecars excluded) directly under `root`.
pub fn find_home(root: &Path) -> Result<Page, IndexError> {
    let mut found: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_home_candidate(p))
        .collect();
    found.sort();

    match found.len() {
        0 => Err(IndexError::MissingHome(root.to_path_buf())),
        1 => Ok(Page::new(found.remove(0))),
        _ => Err(IndexError::AmbiguousHome(found)),
    }
}

fn is_home_candidate(path: &Path) -> bool {
    let stem_matches = path.file_stem().is_some_and(|s| s == HOME_STEM);
    match path.extension() {
        Some(ext) => stem_matches && !ext.eq_ignore_ascii_case(SIDECAR_EXTENSION),
        None => false,
    }
}

/// Ordered page list, home first: manifest order if `root/manifest` exists, else sorted scan.
pub fn discover_pages(root: &Path, home: &Page, manifest: &str) -> Result<Vec<Page>, IndexError> {
    let manifest = root.join(manifest);
    let rest = if manifest.is_file() {
        log::debug!("Reading page order from {}", manifest.display());
        read_manifest(root, &manifest)?
    } else {
        log::debug!("Scanning {} for pages", root.display());
        scan_pages(root)?
    };

    let mut pages = vec![home.clone()];
    pages.extend(rest.into_iter().filter(|p| p != home));
    check_outputs(&pages)?;
    Ok(pages)
}

/// Fail when two pages would be written to the same file (`about.html` and `about.md`).
fn check_outputs(pages: &[Page]) -> Result<(), IndexError> {
    let mut seen: HashMap<PathBuf, &Page> = HashMap::new();
    for page in pages {
        if let Some(first) = seen.insert(page.output_path(), page) {
            return Err(IndexError::OutputCollision {
                first: first.source().to_path_buf(),
                second: page.source().to_path_buf(),
                output: page.output_path(),
            });
        }
    }
    Ok(())
}

fn read_manifest(root: &Path, manifest: &Path) -> Result<Vec<Page>, IndexError> {
    let content = fs::read_to_string(manifest)?;
    let mut pages = Vec::new();
    let mut listed = HashSet::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let entry = urlpath::normalize(&root.join(line));
        if !entry.starts_with(root) {
            return Err(IndexError::ManifestEntryOutsideRoot {
                manifest: manifest.to_path_buf(),
                entry,
            });
        }
        if !is_page_file(&entry) {
            return Err(IndexError::ManifestEntryNotAPage {
                manifest: manifest.to_path_buf(),
                entry,
            });
        }
        if !entry.is_file() {
            return Err(IndexError::MissingManifestEntry {
                manifest: manifest.to_path_buf(),
                entry,
            });
        }
        if !listed.insert(entry.clone()) {
            return Err(IndexError::DuplicateManifestEntry {
                manifest: manifest.to_path_buf(),
                entry,
            });
        }
        pages.push(Page::new(entry));
    }
    Ok(pages)
}

fn scan_pages(root: &Path) -> Result<Vec<Page>, IndexError> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_page_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths.into_iter().map(Page::new).collect())
}

fn is_page_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| PageKind::from_extension(&e.to_string_lossy()))
        .is_some()
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Options from `page`'s sidecar; empty when the sidecar does not exist.
pub fn load_options(page: &Page) -> Result<PageOptions, IndexError> {
    let path = page.sidecar();
    if !path.is_file() {
        return Ok(PageOptions::default());
    }
    let text = fs::read_to_string(&path)?;
    PageOptions::from_json(&text).map_err(|source| IndexError::Options { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn missing_home_is_error() {
        let tmp = write_site(&[("about.html", "<p>About</p>")]);
        let result = SiteIndex::load(tmp.path());
        assert!(matches!(result, Err(IndexError::MissingHome(_))));
    }

    #[test]
    fn two_home_candidates_is_error() {
        let tmp = write_site(&[("index.html", "<p>Hi</p>"), ("index.md", "# Hi")]);
        match SiteIndex::load(tmp.path()) {
            Err(IndexError::AmbiguousHome(found)) => assert_eq!(found.len(), 2),
            other => panic!("expected AmbiguousHome, got {other:?}"),
        }
    }

    #[test]
    fn sidecar_is_not_a_home_candidate() {
        let tmp = write_site(&[("index.md", "# Hi"), ("index.json", "{}")]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(page_names(&index), vec!["index"]);
    }

    #[test]
    fn home_in_subfolder_does_not_count() {
        let tmp = write_site(&[("index.html", "x"), ("guide/index.html", "y")]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(relative_pages(&index), vec!["index.html", "guide/index.html"]);
    }

    #[test]
    fn scan_sorts_by_path_with_home_first() {
        let tmp = write_site(&[
            ("zeta.html", "z"),
            ("index.html", "home"),
            ("guide/usage.html", "u"),
            ("alpha.md", "a"),
            ("guide/setup.md", "s"),
            ("notes.txt", "not a page"),
            ("style.css", "body {}"),
        ]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(
            relative_pages(&index),
            vec![
                "index.html",
                "alpha.md",
                "guide/setup.md",
                "guide/usage.html",
                "zeta.html",
            ]
        );
    }

    #[test]
    fn discovery_is_deterministic() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("b/c.html", "c"),
            ("a.html", "a"),
            ("b/a.md", "a"),
        ]);
        let first = SiteIndex::load(tmp.path()).unwrap();
        let second = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(first.pages(), second.pages());
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let tmp = write_site(&[
            ("index.html", "h"),
            (".drafts/secret.html", "s"),
            (".hidden.html", "x"),
            ("shown.html", "y"),
        ]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(relative_pages(&index), vec!["index.html", "shown.html"]);
    }

    #[test]
    fn manifest_order_wins() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("a.html", "a"),
            ("b.html", "b"),
            ("pages.txt", "b.html\n\na.html\n"),
        ]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(relative_pages(&index), vec!["index.html", "b.html", "a.html"]);
    }

    #[test]
    fn manifest_home_is_moved_first() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("a.html", "a"),
            ("b.html", "b"),
            ("pages.txt", "b.html\nindex.html\na.html\n"),
        ]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(relative_pages(&index), vec!["index.html", "b.html", "a.html"]);
    }

    #[test]
    fn manifest_may_omit_pages() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("a.html", "a"),
            ("b.html", "b"),
            ("pages.txt", "a.html\n"),
        ]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(relative_pages(&index), vec!["index.html", "a.html"]);
    }

    #[test]
    fn custom_manifest_name() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("a.html", "a"),
            ("b.html", "b"),
            ("pages.txt", "a.html\n"),
            ("order.lst", "b.html\na.html\n"),
        ]);
        let index = SiteIndex::load_with_manifest(tmp.path(), "order.lst").unwrap();
        assert_eq!(relative_pages(&index), vec!["index.html", "b.html", "a.html"]);
    }

    #[test]
    fn manifest_missing_entry_is_error() {
        let tmp = write_site(&[("index.html", "h"), ("pages.txt", "ghost.html\n")]);
        let result = SiteIndex::load(tmp.path());
        assert!(matches!(
            result,
            Err(IndexError::MissingManifestEntry { .. })
        ));
    }

    #[test]
    fn manifest_entry_outside_root_is_error() {
        let tmp = write_site(&[("index.html", "h"), ("pages.txt", "../elsewhere.html\n")]);
        let result = SiteIndex::load(tmp.path());
        assert!(matches!(
            result,
            Err(IndexError::ManifestEntryOutsideRoot { .. })
        ));
    }

    #[test]
    fn manifest_duplicate_entry_is_error() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("a.html", "a"),
            ("pages.txt", "a.html\n./a.html\n"),
        ]);
        match SiteIndex::load(tmp.path()) {
            Err(IndexError::DuplicateManifestEntry { entry, .. }) => {
                assert!(entry.ends_with("a.html"), "{entry:?}")
            }
            other => panic!("expected DuplicateManifestEntry, got {other:?}"),
        }
    }

    #[test]
    fn manifest_entry_must_be_a_page() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("notes.txt", "n"),
            ("pages.txt", "notes.txt\n"),
        ]);
        let result = SiteIndex::load(tmp.path());
        assert!(matches!(
            result,
            Err(IndexError::ManifestEntryNotAPage { .. })
        ));
    }

    #[test]
    fn html_and_markdown_with_same_stem_collide() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("about.html", "from html"),
            ("about.md", "from md"),
        ]);
        match SiteIndex::load(tmp.path()) {
            Err(IndexError::OutputCollision { first, second, output }) => {
                assert!(first.ends_with("about.html"), "{first:?}");
                assert!(second.ends_with("about.md"), "{second:?}");
                assert!(output.ends_with("about.html"), "{output:?}");
            }
            other => panic!("expected OutputCollision, got {other:?}"),
        }
    }

    #[test]
    fn manifest_pages_with_same_output_collide() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("about.html", "a"),
            ("about.md", "a"),
            ("pages.txt", "about.md\nabout.html\n"),
        ]);
        let result = SiteIndex::load(tmp.path());
        assert!(matches!(result, Err(IndexError::OutputCollision { .. })));
    }

    #[test]
    fn defaults_come_from_home_sidecar() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("index.json", r#"{"title": "Site", "author": "A"}"#),
            ("about.html", "a"),
            ("about.json", r#"{"title": "Page"}"#),
        ]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(index.defaults().title.as_deref(), Some("Site"));

        let about = &index.pages()[1];
        let options = index.options_for(about).unwrap();
        assert_eq!(options.title.as_deref(), Some("Page"));
        assert_eq!(options.author.as_deref(), Some("A"));
    }

    #[test]
    fn missing_sidecar_means_defaults() {
        let tmp = write_site(&[("index.html", "h"), ("about.html", "a")]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        let options = index.options_for(&index.pages()[1]).unwrap();
        assert_eq!(options, PageOptions::default());
    }

    #[test]
    fn malformed_home_sidecar_is_error() {
        let tmp = write_site(&[("index.html", "h"), ("index.json", "{title: oops")]);
        let result = SiteIndex::load(tmp.path());
        assert!(matches!(result, Err(IndexError::Options { .. })));
    }

    #[test]
    fn malformed_page_sidecar_fails_on_query() {
        let tmp = write_site(&[
            ("index.html", "h"),
            ("about.html", "a"),
            ("about.json", r#"{"title": 42}"#),
        ]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        let result = index.options_for(&index.pages()[1]);
        assert!(matches!(result, Err(IndexError::Options { .. })));
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = write_site(&[]);
        let result = SiteIndex::load(&tmp.path().join("nope"));
        assert!(matches!(result, Err(IndexError::MissingRoot(_))));
    }

    #[test]
    fn output_relative_uses_html_suffix() {
        let tmp = write_site(&[("index.md", "# Hi"), ("guide/setup.md", "x")]);
        let index = SiteIndex::load(tmp.path()).unwrap();
        assert_eq!(
            index.output_relative(&index.pages()[1]),
            PathBuf::from("guide/setup.html")
        );
    }
}
