//! Relative URLs between pages.
//!
//! Every local `href` and `src` the generator emits is computed here. Remote
//! URLs pass through untouched; local files become a percent-encoded path
//! relative to the directory of the page that links to them, so a finished
//! site works from any host prefix or straight off the filesystem.
//!
//! ```text
//! page:    /site/ready/guide/intro.html
//! target:  /site/ready/img/My Logo.svg
//! href:    ../img/My%20Logo.svg
//! ```
//!
//! Both inputs must be absolute. A relative local path has no anchor to
//! resolve against, so it is rejected rather than guessed at.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PathError {
    #[error("ambiguous source: {0} is neither a URL nor an absolute path")]
    AmbiguousSource(String),
    #[error("ambiguous page: {0} is not an absolute path")]
    AmbiguousPage(PathBuf),
}

/// The string to put in an `href`/`src` attribute on `page` pointing at `target`.
///
/// `target` may be a remote URL (`https://…`, `mailto:…`) or an absolute local path.
pub fn href(page: &Path, target: &str) -> Result<String, PathError> {
    if has_scheme(target) {
        return Ok(target.to_string());
    }
    let local = Path::new(target);
    if !local.is_absolute() {
        return Err(PathError::AmbiguousSource(target.to_string()));
    }
    relative_url(page, local)
}

/// Percent-encoded path from the directory containing `page` to `target`.
///
/// Segments are joined with `/` regardless of the platform separator.
pub fn relative_url(page: &Path, target: &Path) -> Result<String, PathError> {
    if !page.is_absolute() {
        return Err(PathError::AmbiguousPage(page.to_path_buf()));
    }
    if !target.is_absolute() {
        return Err(PathError::AmbiguousSource(target.display().to_string()));
    }

    let page = normalize(page);
    let base = page.parent().unwrap_or(&page);
    let segments = diff_segments(&normalize(target), base)
        .ok_or_else(|| PathError::AmbiguousSource(target.display().to_string()))?;

    if segments.is_empty() {
        return Ok(".".to_string());
    }
    Ok(segments
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Whether `target` starts with an RFC 3986 scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`).
pub fn has_scheme(target: &str) -> bool {
    let Some(colon) = target.find(':') else {
        return false;
    };
    let scheme = &target[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    // A single letter is a Windows drive, not a scheme.
    scheme.len() > 1 && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Segments leading from directory `base` to `path`, `..` for each level climbed.
///
/// Returns `None` when the two share no root (different drives on Windows).
fn diff_segments(path: &Path, base: &Path) -> Option<Vec<String>> {
    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();

    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();
    if common == 0 {
        return None;
    }

    let ups = std::iter::repeat_n("..".to_string(), base.len() - common);
    let downs = path[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());
    Some(ups.chain(downs).collect())
}
