//! Markdown to HTML conversion for `.md` pages.
//!
//! Uses [pulldown-cmark](https://docs.rs/pulldown-cmark) when the `markdown`
//! feature is enabled (the default). Without it, sites made only of HTML
//! fragments still build; a `.md` page fails with [`Unavailable`].

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("cannot convert Markdown: folio was built without the `markdown` feature")]
pub struct Unavailable;

/// Convert Markdown text to an HTML fragment.
#[cfg(feature = "markdown")]
pub fn to_html(text: &str) -> Result<String, Unavailable> {
    use pulldown_cmark::{Options, Parser, html};

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_SMART_PUNCTUATION;
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(text, options));
    Ok(out)
}

#[cfg(not(feature = "markdown"))]
pub fn to_html(_text: &str) -> Result<String, Unavailable> {
    Err(Unavailable)
}
