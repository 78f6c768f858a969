//! Project configuration.
//!
//! An optional `folio.toml` in the project directory names the folders the
//! CLI works with. Every key is optional and command-line flags override it.
//!
//! ```toml
//! source = "ready"        # Page sources (home page lives here)
//! target = "site"         # Built site
//! styles = "styles"       # Folder of named style folders
//! style = "plain"         # Style applied by `folio build` (optional)
//! manifest = "pages.txt"  # Page order file inside `source`
//! ```
//!
//! Unknown keys are rejected so typos surface instead of being ignored.
//! Per-page options are not configured here; they live in JSON sidecars next
//! to each page (see [`crate::options`]).

use crate::index::MANIFEST_FILE;
use crate::urlpath;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project config file.
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Folders and files used by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Source folder holding the home page.
    pub source: PathBuf,
    /// Output folder for the built site.
    pub target: PathBuf,
    /// Folder whose subfolders are named styles.
    pub styles: PathBuf,
    /// Style applied on every build, if set.
    pub style: Option<String>,
    /// Page order file, relative to `source`.
    pub manifest: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("ready"),
            target: PathBuf::from("site"),
            styles: PathBuf::from("styles"),
            style: None,
            manifest: MANIFEST_FILE.to_string(),
        }
    }
}

impl ProjectConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::Validation("source must not be empty".into()));
        }
        if self.target.as_os_str().is_empty() {
            return Err(ConfigError::Validation("target must not be empty".into()));
        }
        let source = urlpath::normalize(&self.source);
        let target = urlpath::normalize(&self.target);
        if source == target {
            return Err(ConfigError::Validation(
                "source and target must be different folders".into(),
            ));
        }
        if source.starts_with(&target) || target.starts_with(&source) {
            return Err(ConfigError::Validation(
                "source and target must not contain each other".into(),
            ));
        }
        if self.manifest.trim().is_empty() {
            return Err(ConfigError::Validation("manifest must not be empty".into()));
        }
        if self.style.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "style must name a folder when set".into(),
            ));
        }
        Ok(())
    }

    /// Resolve relative folders against the project directory.
    pub fn rooted(mut self, project: &Path) -> Self {
        self.source = project.join(&self.source);
        self.target = project.join(&self.target);
        self.styles = project.join(&self.styles);
        self
    }
}

/// Load `folio.toml` from `project`, or the defaults when it does not exist.
pub fn load_config(project: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = project.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    config.validate()?;
    log::debug!("Loaded {}", path.display());
    Ok(config)
}

/// A fully-commented stock `folio.toml`, printed by `folio gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# folio project configuration
# ===========================
# All settings are optional. Values shown are the defaults.
# Command-line flags override anything set here.
# Unknown keys cause an error.

# Folder holding the page sources. It must contain exactly one home page
# (index.html or index.md). index.json next to it sets default options for
# every page.
source = "ready"

# Folder the built site is written to. Each page lands at the same relative
# path with an .html suffix.
target = "site"

# Folder of named styles. Each subfolder is one style; its .css files are
# concatenated in path order into <target>/style.css.
styles = "styles"

# Style applied on every build. Leave unset to manage style.css yourself
# with `folio style NAME`.
# style = "plain"

# File inside the source folder listing pages in build order, one path per
# line. Without it, pages are ordered by path.
manifest = "pages.txt"
"##
}
