//! Display labels derived from file and folder names.
//!
//! Pages and folders are named on disk the way they should read in the
//! navigation, with underscores standing in for spaces:
//!
//! - `getting_started.html` → "getting started" (page label and default title)
//! - `release_notes/` → "release notes" (nav section label)
//! - `index.md` → "index"

use std::path::Path;

/// Convert a raw file or folder stem into a display label.
pub fn display_name(stem: &str) -> String {
    stem.replace('_', " ")
}

/// Display label for a file: its stem with underscores as spaces.
pub fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| display_name(&s.to_string_lossy()))
        .unwrap_or_default()
}

/// Display label for a folder: its last component with underscores as spaces.
pub fn folder_label(dir: &Path) -> String {
    dir.file_name()
        .map(|s| display_name(&s.to_string_lossy()))
        .unwrap_or_default()
}
