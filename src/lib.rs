//! # folio
//!
//! A static site generator for sites written by hand. Each page file holds
//! only that page's content: an HTML fragment or Markdown. folio wraps every
//! page in the same document with a head, a site-wide navigation outline,
//! prev/next links and fine print, and writes the finished pages to a target
//! folder.
//!
//! # Architecture: Discover, Render, Write
//!
//! ```text
//! 1. Discover  ready/     →  SiteIndex        (home page, page order, default options)
//! 2. Render    SiteIndex  →  lines per page   (pure; runs in parallel)
//! 3. Write     lines      →  site/**/*.html   (only after every page rendered)
//! ```
//!
//! The index is built once and never changes afterwards. Rendering reads it
//! and the page's own files, nothing else, so any page can be rendered on its
//! own and in any order. Writing comes last so a broken page fails the build
//! before the target is touched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`index`] | Stage 1: finds the home page, orders pages, loads default options |
//! | [`render`] | Stage 2: assembles one page from head, nav, main and footer stanzas |
//! | [`site`] | Stage 3: renders all pages and writes them; suffix cleanup |
//! | [`nav`] | The site outline shared by every page |
//! | [`options`] | Per-page options from JSON sidecars and how they merge |
//! | [`urlpath`] | Relative URLs between pages, so sites work from any location |
//! | [`markdown`] | Markdown pages (cargo feature `markdown`) |
//! | [`style`] | Builds `style.css` from a named style folder |
//! | [`tidy`] | Cleans raw HTML with the external `tidy` program |
//! | [`config`] | `folio.toml` project settings |
//! | [`types`] | `Page` and its derived paths |
//! | [`naming`] | Display labels from file and folder names |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Relative Links Everywhere
//!
//! Every link folio generates between pages is relative to the page it
//! appears on. A built site works from a web server root, a subfolder, or
//! straight from disk with `file://`. Only the canonical link uses the
//! configured base URL.
//!
//! ## Options Are Sidecars
//!
//! Page content files carry no front matter. Options live in a JSON file with
//! the same name (`about.html` → `about.json`), and the home page's sidecar
//! supplies defaults for every page. Content stays plain HTML or Markdown
//! that any editor previews correctly.
//!
//! ## Maud for Markup
//!
//! Generated elements are built with [Maud](https://maud.lambda.xyz/), so
//! every option value is escaped on the way in. Page content is copied as-is;
//! it is the author's own markup.

pub mod config;
pub mod index;
pub mod markdown;
pub mod naming;
pub mod nav;
pub mod options;
pub mod output;
pub mod render;
pub mod site;
pub mod style;
pub mod tidy;
pub mod types;
pub mod urlpath;

#[cfg(test)]
pub(crate) mod test_helpers;
