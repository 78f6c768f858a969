//! Cleanup of hand-written page bodies with [HTML Tidy](https://www.html-tidy.org/).
//!
//! `folio tidy SOURCE CLEAN` runs every `.html` file under `SOURCE` through
//! the external `tidy` program and saves the cleaned body fragment at the
//! same relative path under `CLEAN`, ready to be used as page content.
//!
//! Tidy's exit status decides the outcome:
//!
//! | Status | Meaning | Result |
//! |--------|---------|--------|
//! | 0 | clean | [`TidyOutcome::Clean`] |
//! | 1 | warnings | [`TidyOutcome::Warnings`], logged |
//! | other | errors | [`TidyError::Failed`] |
//!
//! Tidy exits 0 for an input that does not exist, so inputs are checked first.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use walkdir::WalkDir;

/// Program looked up on `PATH` by default.
pub const TIDY_PROGRAM: &str = "tidy";

/// Options passed before `-output <clean> <dirty>`.
pub const TIDY_ARGS: &[&str] = &[
    "-ashtml",
    "-bare",
    "-clean",
    "-quiet",
    "-wrap",
    "0",
    "--fix-style-tags",
    "n",
    "--vertical-space",
    "y",
    "--show-body-only",
    "y",
];

#[derive(Error, Debug)]
pub enum TidyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Cannot run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Tidy failed on {path} (status {status}): {stderr}")]
    Failed {
        path: PathBuf,
        status: String,
        stderr: String,
    },
}

/// A successful cleanup.
#[derive(Debug, Clone, PartialEq)]
pub enum TidyOutcome {
    Clean,
    /// Output was written; tidy reported these warnings.
    Warnings(String),
}

/// One file cleaned by [`Tidy::tidy_tree`].
#[derive(Debug, Clone, PartialEq)]
pub struct TidiedFile {
    pub dirty: PathBuf,
    pub clean: PathBuf,
    pub outcome: TidyOutcome,
}

/// Handle on the external cleanup program.
#[derive(Debug, Clone)]
pub struct Tidy {
    program: PathBuf,
}

impl Default for Tidy {
    fn default() -> Self {
        Self::new(TIDY_PROGRAM)
    }
}

impl Tidy {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Clean `dirty` and save the body fragment to `clean`.
    pub fn tidy_body(&self, dirty: &Path, clean: &Path) -> Result<TidyOutcome, TidyError> {
        if !dirty.is_file() {
            return Err(TidyError::NotFound(dirty.to_path_buf()));
        }

        let output = Command::new(&self.program)
            .args(TIDY_ARGS)
            .arg("-output")
            .arg(clean)
            .arg(dirty)
            .output()
            .map_err(|source| TidyError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        match output.status.code() {
            Some(0) => Ok(TidyOutcome::Clean),
            Some(1) => {
                log::warn!("tidy {}: {}", dirty.display(), stderr);
                Ok(TidyOutcome::Warnings(stderr))
            }
            code => Err(TidyError::Failed {
                path: dirty.to_path_buf(),
                status: code.map_or_else(|| "killed".to_string(), |c| c.to_string()),
                stderr,
            }),
        }
    }

    /// Clean every `.html` file under `source` into the same layout under `target`.
    ///
    /// Stops at the first failure; files already cleaned stay written.
    pub fn tidy_tree(&self, source: &Path, target: &Path) -> Result<Vec<TidiedFile>, TidyError> {
        if !source.is_dir() {
            return Err(TidyError::NotFound(source.to_path_buf()));
        }

        let mut done = Vec::new();
        for dirty in html_files(source)? {
            let relative = dirty.strip_prefix(source).unwrap_or(&dirty);
            let clean = target.join(relative);
            if let Some(parent) = clean.parent() {
                fs::create_dir_all(parent)?;
            }
            let outcome = self.tidy_body(&dirty, &clean)?;
            log::info!("Cleaned {}", clean.display());
            done.push(TidiedFile {
                dirty,
                clean,
                outcome,
            });
        }
        Ok(done)
    }
}

/// [`Tidy::tidy_body`] with the `tidy` found on `PATH`.
pub fn tidy_body(dirty: &Path, clean: &Path) -> Result<TidyOutcome, TidyError> {
    Tidy::default().tidy_body(dirty, clean)
}

/// [`Tidy::tidy_tree`] with the `tidy` found on `PATH`.
pub fn tidy_tree(source: &Path, target: &Path) -> Result<Vec<TidiedFile>, TidyError> {
    Tidy::default().tidy_tree(source, target)
}

fn html_files(root: &Path) -> Result<Vec<PathBuf>, TidyError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry?;
        let is_html = entry.path().extension().is_some_and(|e| e == "html");
        if entry.file_type().is_file() && is_html {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
