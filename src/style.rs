//! Shared stylesheet.
//!
//! Every page links one `style.css` at the root of the built site. It is made
//! by concatenating a named style folder:
//!
//! ```text
//! styles/
//! └── plain/
//!     ├── 00-reset.css      # concatenated in path order
//!     ├── 10-layout.css
//!     └── print/
//!         └── print.css
//! ```
//!
//! `folio style plain` writes `<target>/style.css` from these three files.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File name of the built stylesheet, relative to the site root.
pub const STYLESHEET: &str = "style.css";

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Style folder not found: {0}")]
    MissingStyle(PathBuf),
}

/// Result of [`apply_style`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedStyle {
    /// The written stylesheet.
    pub path: PathBuf,
    /// Source sheets in concatenation order.
    pub sheets: Vec<PathBuf>,
}

/// All `.css` files under `dir`, sorted by path.
pub fn style_sheets(dir: &Path) -> Result<Vec<PathBuf>, StyleError> {
    if !dir.is_dir() {
        return Err(StyleError::MissingStyle(dir.to_path_buf()));
    }
    let mut sheets = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        let is_css = entry
            .path()
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("css"));
        if entry.file_type().is_file() && is_css {
            sheets.push(entry.into_path());
        }
    }
    sheets.sort();
    Ok(sheets)
}

/// Concatenated text of every sheet under `dir`.
pub fn concat_styles(dir: &Path) -> Result<String, StyleError> {
    concat(&style_sheets(dir)?)
}

fn concat(sheets: &[PathBuf]) -> Result<String, StyleError> {
    let mut css = String::new();
    for sheet in sheets {
        css.push_str(&fs::read_to_string(sheet)?);
    }
    Ok(css)
}

/// Write `<target>/style.css` from the style folder `styles_root/name`.
pub fn apply_style(styles_root: &Path, name: &str, target: &Path) -> Result<AppliedStyle, StyleError> {
    let dir = styles_root.join(name);
    let sheets = style_sheets(&dir)?;
    let css = concat(&sheets)?;

    fs::create_dir_all(target)?;
    let path = target.join(STYLESHEET);
    fs::write(&path, css)?;
    log::info!("Wrote {} from {} sheets", path.display(), sheets.len());
    Ok(AppliedStyle { path, sheets })
}
