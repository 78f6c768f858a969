//! Per-page rendering options.
//!
//! Options live in JSON sidecar files next to each page (`about.html` →
//! `about.json`). The home page's sidecar holds the site-wide defaults:
//!
//! ```json
//! {
//!   "title": "Kittens",
//!   "author": "A. Cat",
//!   "keywords": ["cats", "naps"],
//!   "base": "https://kittens.example/",
//!   "favicon": "img/paw.ico",
//!   "styles": ["style.css"],
//!   "icons": [["GitHub", "img/gh.svg", "https://github.com/"], ["RSS", "", "feed.xml"]],
//!   "prevlink": "« prev",
//!   "nextlink": "next »",
//!   "javascripts": ["https://cdn.example/count.js"],
//!   "updog": "top of page",
//!   "copyright": "A. Cat",
//!   "license": ["https://creativecommons.org/licenses/by/4.0/", "CC BY 4.0"],
//!   "email": "cat@kittens.example",
//!   "generator": "built with folio",
//!   "homelink": "home"
//! }
//! ```
//!
//! ## Merging
//!
//! A page's effective options are `defaults.merge(page)`: a shallow,
//! right-biased union. Each key the page sets replaces the default wholesale,
//! including lists and the `license` pair. Setting a list to `[]` clears it.
//!
//! ## Unknown keys
//!
//! Keys not listed on [`PageOptions`] are ignored, so sidecars can carry data
//! for other tools.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Typed view of one sidecar file. Every field is optional; `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// `<title>`; falls back to the page name.
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    /// List of keywords, or one comma-separated string.
    #[serde(deserialize_with = "string_or_list")]
    pub keywords: Option<Vec<String>>,
    /// Public base URL, enables the `home` and `canonical` links.
    #[serde(alias = "baseurl", alias = "base_url")]
    pub base: Option<String>,
    /// Favicon path relative to the home folder, or a URL.
    pub favicon: Option<String>,
    /// Stylesheets relative to the home folder, or URLs.
    pub styles: Option<Vec<String>>,
    #[serde(alias = "icon_links", alias = "iconlinks")]
    pub icons: Option<Vec<IconLink>>,
    /// Label of the "next page" link; no link when unset.
    pub nextlink: Option<String>,
    /// Label of the "previous page" link; no link when unset.
    pub prevlink: Option<String>,
    #[serde(alias = "js_sources", alias = "jscripts")]
    pub javascripts: Option<Vec<String>>,
    /// Label of the jump-to-top link.
    #[serde(alias = "jumptext")]
    pub updog: Option<String>,
    /// Copyright holder, rendered as `© holder year.`
    pub copyright: Option<String>,
    pub license: Option<License>,
    pub email: Option<String>,
    /// Label of the attribution link; also the `generator` meta tag.
    #[serde(alias = "qlink")]
    pub generator: Option<String>,
    pub generator_url: Option<String>,
    /// Label of the home link in the nav.
    #[serde(alias = "home_name", alias = "homename")]
    pub homelink: Option<String>,
    /// `lang` attribute of the root element.
    pub language: Option<String>,
    /// Extra `<meta name content>` pairs.
    pub meta: Option<BTreeMap<String, String>>,
    /// Image for `og:image`, relative to the home folder or a URL.
    pub ogimage: Option<String>,
    /// Extra fine print in the footer.
    pub klftext: Option<String>,
    pub nav_position: Option<NavPosition>,
}

impl PageOptions {
    /// Parse a sidecar's JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Right-biased union: every field set in `overlay` wins.
    pub fn merge(self, overlay: PageOptions) -> PageOptions {
        PageOptions {
            title: overlay.title.or(self.title),
            description: overlay.description.or(self.description),
            author: overlay.author.or(self.author),
            keywords: overlay.keywords.or(self.keywords),
            base: overlay.base.or(self.base),
            favicon: overlay.favicon.or(self.favicon),
            styles: overlay.styles.or(self.styles),
            icons: overlay.icons.or(self.icons),
            nextlink: overlay.nextlink.or(self.nextlink),
            prevlink: overlay.prevlink.or(self.prevlink),
            javascripts: overlay.javascripts.or(self.javascripts),
            updog: overlay.updog.or(self.updog),
            copyright: overlay.copyright.or(self.copyright),
            license: overlay.license.or(self.license),
            email: overlay.email.or(self.email),
            generator: overlay.generator.or(self.generator),
            generator_url: overlay.generator_url.or(self.generator_url),
            homelink: overlay.homelink.or(self.homelink),
            language: overlay.language.or(self.language),
            meta: overlay.meta.or(self.meta),
            ogimage: overlay.ogimage.or(self.ogimage),
            klftext: overlay.klftext.or(self.klftext),
            nav_position: overlay.nav_position.or(self.nav_position),
        }
    }
}

/// A link button: `[alt, image source or "", href]` in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(String, String, String)")]
pub struct IconLink {
    pub alt: String,
    /// Image to draw; the button is plain text when absent.
    pub src: Option<String>,
    pub href: String,
}

impl From<(String, String, String)> for IconLink {
    fn from((alt, src, href): (String, String, String)) -> Self {
        Self {
            alt,
            src: (!src.trim().is_empty()).then_some(src),
            href,
        }
    }
}

/// License link: `[href, label]` or `{"url": .., "text": ..}` in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "LicenseRepr")]
pub struct License {
    pub href: String,
    pub label: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LicenseRepr {
    Pair(String, String),
    Object {
        #[serde(alias = "href")]
        url: String,
        #[serde(alias = "label", default)]
        text: Option<String>,
    },
}

impl From<LicenseRepr> for License {
    fn from(repr: LicenseRepr) -> Self {
        match repr {
            LicenseRepr::Pair(href, label) => Self { href, label },
            LicenseRepr::Object { url, text } => Self {
                href: url,
                label: text.unwrap_or_else(|| "LICENSE".to_string()),
            },
        }
    }
}

/// Where the `<nav>` block sits relative to `<main>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPosition {
    #[default]
    Before,
    After,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            OneOrMany::Many(list) => list,
        }),
    )
}

/// The option's text if it is set and not blank.
pub(crate) fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
