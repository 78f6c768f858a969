//! Site navigation.
//!
//! Every page carries the same `<nav>` outline of the whole site. Folders
//! become collapsible `<details>` sections; the sections leading to the page
//! being viewed start open, all others start closed.
//!
//! ```text
//! pages (build order)          nav for guide/setup.html
//! ─────────────────────        ──────────────────────────────────
//! index.html                   <a id="home">home</a>
//! about.html                   <a>about</a>
//! guide/setup.md               <details open><summary>guide</summary>
//! guide/usage.html               <a id="here">setup</a>
//! guide/faq/general.html         <a>usage</a>
//! zoo.html                       <details><summary>faq</summary>
//!                                  <a>general</a>
//!                                </details>
//!                              </details>
//!                              <a>zoo</a>
//! ```
//!
//! ## Walking the page list
//!
//! [`nav_tokens`] walks the pages in build order while keeping a stack of
//! open folders, one entry per nesting depth below the home folder. For each
//! page it compares that stack with the page's own folder chain: folders past
//! the common prefix are closed innermost first, then the page's remaining
//! folders are opened outermost first. After the last page the stack is
//! drained, so every section opened is also closed.
//!
//! The walk depends only on the page order and the current page, so the
//! output is byte-identical between runs.

use crate::naming;
use crate::types::Page;
use crate::urlpath::{self, PathError};
use maud::html;
use std::path::{Path, PathBuf};

/// Label of the home link when no `homelink` option is set.
pub const DEFAULT_HOME_LABEL: &str = "home";

/// One element of the flat navigation outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavToken {
    /// Link to the home page, always first.
    Home { href: String, label: String },
    /// Start of a folder section.
    Open { label: String, expanded: bool },
    /// End of the innermost open section.
    Close,
    /// Link to another page.
    Link { href: String, label: String },
    /// The page being rendered: "you are here".
    Here { label: String },
}

/// Build the navigation outline for `current`. `pages` is the build order, home first.
pub fn nav_tokens(
    pages: &[Page],
    current: &Page,
    home_label: &str,
) -> Result<Vec<NavToken>, PathError> {
    let Some((home, targets)) = pages.split_first() else {
        return Ok(Vec::new());
    };
    let root = home.source().parent().unwrap_or(home.source());
    let here = current.output_path();

    let mut tokens = vec![NavToken::Home {
        href: if current == home {
            "#".to_string()
        } else {
            urlpath::relative_url(&here, &home.output_path())?
        },
        label: home_label.to_string(),
    }];

    let mut open: Vec<PathBuf> = Vec::new();
    for target in targets {
        let dirs = section_dirs(root, target.source());
        let common = open
            .iter()
            .zip(&dirs)
            .take_while(|(a, b)| a == b)
            .count();

        tokens.extend((common..open.len()).map(|_| NavToken::Close));
        tokens.extend(dirs[common..].iter().map(|dir| NavToken::Open {
            label: naming::folder_label(dir),
            expanded: current.source().starts_with(dir),
        }));
        open = dirs;

        let label = target.name();
        tokens.push(if target == current {
            NavToken::Here { label }
        } else {
            NavToken::Link {
                href: urlpath::relative_url(&here, &target.output_path())?,
                label,
            }
        });
    }
    tokens.extend(open.iter().map(|_| NavToken::Close));

    Ok(tokens)
}

/// Folders between `root` (exclusive) and `page`, outermost first.
fn section_dirs(root: &Path, page: &Path) -> Vec<PathBuf> {
    if !page.starts_with(root) {
        return Vec::new();
    }
    let mut dirs: Vec<PathBuf> = page
        .ancestors()
        .skip(1)
        .take_while(|d| *d != root)
        .map(Path::to_path_buf)
        .collect();
    dirs.reverse();
    dirs
}

/// Render tokens as the lines of a `<nav>` element.
pub fn render_nav(tokens: &[NavToken]) -> Vec<String> {
    let mut lines = Vec::with_capacity(tokens.len() + 2);
    lines.push("<nav>".to_string());
    for token in tokens {
        let line = match token {
            NavToken::Home { href, label } => html! { a href=(href) id="home" { (label) } }.into_string(),
            NavToken::Open { label, expanded } => {
                let summary = html! { summary { (label) } }.into_string();
                if *expanded {
                    format!("<details open>{summary}")
                } else {
                    format!("<details>{summary}")
                }
            }
            NavToken::Close => "</details>".to_string(),
            NavToken::Link { href, label } => html! { a href=(href) { (label) } }.into_string(),
            NavToken::Here { label } => html! { a href="#" id="here" { (label) } }.into_string(),
        };
        lines.push(line);
    }
    lines.push("</nav>".to_string());
    lines
}
