//! Page assembly.
//!
//! Stage 2 of the build. [`PageRenderer::render`] wraps one page's raw
//! content in the shared skeleton and returns the finished document as lines.
//! The skeleton is built from stanzas, each a self-contained block:
//!
//! ```text
//! <!DOCTYPE html>
//! <html>
//! <head>…</head>                  head: title, links, meta tags
//! <body>
//! <nav>…</nav>                    nav: site outline (see [`crate::nav`])
//! <main>…</main>                  main: the page's own content
//! <section id="icons">…</section> icons: prev/next and link buttons
//! <section id="jump">…</section>  jump: back-to-top link and scripts
//! <section id="klf">…</section>   fine print: copyright, license, contact
//! </body>
//! </html>
//! ```
//!
//! `nav_position: "after"` moves `<nav>` below `<main>`.
//!
//! ## Links
//!
//! Paths in options (`favicon`, `styles`, icon sources, …) are relative to
//! the home folder; a leading `/` means the same. URLs with a scheme and
//! `#fragment` links are used as given. Everything else goes through
//! [`urlpath::relative_url`] so the page works from any location.
//!
//! ## Escaping
//!
//! Option values are escaped by maud. Page content is trusted markup and is
//! copied verbatim, minus trailing whitespace on each line.

use crate::index::SiteIndex;
use crate::markdown;
use crate::nav::{self, DEFAULT_HOME_LABEL};
use crate::options::{NavPosition, PageOptions, filled};
use crate::style::STYLESHEET;
use crate::types::{Page, PageKind};
use crate::urlpath::{self, PathError};
use chrono::Datelike;
use maud::{DOCTYPE, html};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Where the attribution link points when `generator_url` is unset.
pub const GENERATOR_URL: &str = concat!("https://crates.io/crates/", env!("CARGO_PKG_NAME"));

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot read page {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Page is not part of the site: {0}")]
    UnknownPage(PathBuf),
    #[error("Bad link on {page}: {source}")]
    Link {
        page: PathBuf,
        #[source]
        source: PathError,
    },
    #[error("{page}: {source}")]
    Markdown {
        page: PathBuf,
        #[source]
        source: markdown::Unavailable,
    },
}

/// Renders pages of one site. Holds only shared, read-only inputs.
pub struct PageRenderer<'a> {
    index: &'a SiteIndex,
    year: i32,
}

impl<'a> PageRenderer<'a> {
    /// Renderer stamping copyright notices with the current year.
    pub fn new(index: &'a SiteIndex) -> Self {
        Self::with_year(index, chrono::Local::now().year())
    }

    pub fn with_year(index: &'a SiteIndex, year: i32) -> Self {
        Self { index, year }
    }

    /// All lines of the finished document for `page` under `options`.
    pub fn render(&self, page: &Page, options: &PageOptions) -> Result<Vec<String>, RenderError> {
        let position = self
            .index
            .position(page)
            .ok_or_else(|| RenderError::UnknownPage(page.source().to_path_buf()))?;
        let stanza = Stanza {
            index: self.index,
            page,
            position,
            options,
            year: self.year,
        };

        let mut lines = vec![html! { (DOCTYPE) }.into_string()];
        lines.push(match filled(&options.language) {
            Some(lang) => format!(r#"<html lang="{}">"#, escape(lang)),
            None => "<html>".to_string(),
        });
        lines.extend(stanza.head()?);
        lines.push("<body>".to_string());
        match options.nav_position.unwrap_or_default() {
            NavPosition::Before => {
                lines.extend(stanza.nav()?);
                lines.extend(stanza.main()?);
            }
            NavPosition::After => {
                lines.extend(stanza.main()?);
                lines.extend(stanza.nav()?);
            }
        }
        lines.extend(stanza.icons()?);
        lines.extend(stanza.jump()?);
        lines.extend(stanza.fine_print()?);
        lines.push("</body>".to_string());
        lines.push("</html>".to_string());
        Ok(lines)
    }
}

/// Join rendered lines into the text written to disk.
pub fn to_document(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Everything one stanza needs to know about the page being rendered.
struct Stanza<'a> {
    index: &'a SiteIndex,
    page: &'a Page,
    position: usize,
    options: &'a PageOptions,
    year: i32,
}

impl Stanza<'_> {
    /// `href` on this page for a path relative to the home folder, or a URL.
    fn link(&self, target: &str) -> Result<String, RenderError> {
        if urlpath::has_scheme(target) || target.starts_with('#') {
            return Ok(target.to_string());
        }
        let local = self.index.root().join(target.trim_start_matches('/'));
        self.link_to(&local)
    }

    fn link_to(&self, target: &std::path::Path) -> Result<String, RenderError> {
        urlpath::relative_url(&self.page.output_path(), target).map_err(|source| self.link_error(source))
    }

    fn link_error(&self, source: PathError) -> RenderError {
        RenderError::Link {
            page: self.page.source().to_path_buf(),
            source,
        }
    }

    fn head(&self) -> Result<Vec<String>, RenderError> {
        let options = self.options;
        let meta = |name: &str, content: &str| html! { meta name=(name) content=(content); }.into_string();
        let link = |rel: &str, href: &str| html! { link rel=(rel) href=(href); }.into_string();

        let mut lines = vec!["<head>".to_string()];
        let title = filled(&options.title)
            .map(str::to_string)
            .unwrap_or_else(|| self.page.name());
        lines.push(html! { title { (title) } }.into_string());

        match &options.styles {
            Some(sheets) => {
                for sheet in sheets {
                    lines.push(link("stylesheet", &self.link(sheet)?));
                }
            }
            None => lines.push(link("stylesheet", &self.link(STYLESHEET)?)),
        }
        if let Some(base) = filled(&options.base) {
            let home = self.index.home().output_path();
            let from_home = urlpath::relative_url(&home, &self.page.output_path())
                .map_err(|source| self.link_error(source))?;
            lines.push(link("home", base));
            lines.push(link("canonical", &urlpath::join_url(base, &from_home)));
        }
        if let Some(favicon) = filled(&options.favicon) {
            lines.push(link("icon", &self.link(favicon)?));
        }

        lines.push(r#"<meta charset="utf-8">"#.to_string());
        lines.push(meta("viewport", "width=device-width, initial-scale=1.0"));
        if let Some(author) = filled(&options.author) {
            lines.push(meta("author", author));
        }
        if let Some(description) = filled(&options.description) {
            lines.push(meta("description", description));
        }
        if let Some(keywords) = options.keywords.as_ref().filter(|k| !k.is_empty()) {
            lines.push(meta("keywords", &keywords.join(",")));
        }
        if let Some(generator) = filled(&options.generator) {
            lines.push(meta("generator", generator));
        }
        for (name, content) in options.meta.iter().flatten() {
            lines.push(meta(name, content));
        }
        if let Some(image) = filled(&options.ogimage) {
            let src = self.link(image)?;
            lines.push(html! { meta property="og:image" content=(src); }.into_string());
        }
        lines.push("</head>".to_string());
        Ok(lines)
    }

    fn nav(&self) -> Result<Vec<String>, RenderError> {
        let home_label = filled(&self.options.homelink).unwrap_or(DEFAULT_HOME_LABEL);
        let tokens = nav::nav_tokens(self.index.pages(), self.page, home_label)
            .map_err(|source| self.link_error(source))?;
        Ok(nav::render_nav(&tokens))
    }

    fn main(&self) -> Result<Vec<String>, RenderError> {
        let path = self.page.source();
        let raw = fs::read_to_string(path).map_err(|source| RenderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = match self.page.kind() {
            PageKind::Html => raw,
            PageKind::Markdown => markdown::to_html(&raw).map_err(|source| RenderError::Markdown {
                page: path.to_path_buf(),
                source,
            })?,
        };

        let mut lines = vec!["<main>".to_string()];
        lines.extend(content.lines().map(|l| l.trim_end().to_string()));
        lines.push("</main>".to_string());
        Ok(lines)
    }

    fn icons(&self) -> Result<Vec<String>, RenderError> {
        let options = self.options;
        let pages = self.index.pages();
        let n = pages.len();
        let mut lines = vec![r#"<section id="icons">"#.to_string()];

        // A lone page would link to itself.
        let cycle = n > 1;
        if let Some(label) = filled(&options.prevlink).filter(|_| cycle) {
            let prev = &pages[(self.position + n - 1) % n];
            let href = self.link_to(&prev.output_path())?;
            lines.push(html! { a href=(href) rel="prev" { (label) } }.into_string());
        }
        for icon in options.icons.iter().flatten() {
            let href = self.link(&icon.href)?;
            let line = match icon.src.as_deref() {
                Some(src) => {
                    let src = self.link(src)?;
                    html! { a href=(href) { img alt=(icon.alt) src=(src) height="32" title=(icon.alt); } }
                }
                None => html! { a href=(href) { (icon.alt) } },
            };
            lines.push(line.into_string());
        }
        if let Some(label) = filled(&options.nextlink).filter(|_| cycle) {
            let next = &pages[(self.position + 1) % n];
            let href = self.link_to(&next.output_path())?;
            lines.push(html! { a href=(href) rel="next" { (label) } }.into_string());
        }

        lines.push("</section>".to_string());
        Ok(lines)
    }

    fn jump(&self) -> Result<Vec<String>, RenderError> {
        let mut lines = vec![r#"<section id="jump">"#.to_string()];
        if let Some(label) = filled(&self.options.updog) {
            lines.push(html! { a href="#" id="updog" { (label) } }.into_string());
        }
        for script in self.options.javascripts.iter().flatten() {
            let src = self.link(script)?;
            lines.push(html! { script src=(src) async {} }.into_string());
        }
        lines.push("</section>".to_string());
        Ok(lines)
    }

    fn fine_print(&self) -> Result<Vec<String>, RenderError> {
        let options = self.options;
        let mut lines = vec![r#"<section id="klf">"#.to_string()];

        if let Some(holder) = filled(&options.copyright) {
            let notice = format!("© {holder} {}.", self.year);
            lines.push(html! { span id="copyright" { (notice) } }.into_string());
        }
        if let Some(license) = &options.license {
            let href = self.link(&license.href)?;
            lines.push(
                html! { span id="license" { a href=(href) rel="license" { (license.label) } } }
                    .into_string(),
            );
        }
        if let Some(text) = filled(&options.klftext) {
            lines.push(html! { span id="klftext" { (text) } }.into_string());
        }
        if let Some(email) = filled(&options.email) {
            lines.push(html! { address { (email) } }.into_string());
        }
        if let Some(label) = filled(&options.generator) {
            let url = filled(&options.generator_url).unwrap_or(GENERATOR_URL);
            lines.push(html! { a href=(url) rel="generator" { (label) } }.into_string());
        }

        lines.push("</section>".to_string());
        Ok(lines)
    }
}
