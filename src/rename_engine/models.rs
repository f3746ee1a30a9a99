use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Season used whenever nothing better can be inferred.
pub const DEFAULT_SEASON: u32 = 1;

/// Normalized dotted title, e.g. `South.Park`. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalName(String);

impl CanonicalName {
    /// Normalizes `raw` into dotted form.
    pub fn new(raw: &str) -> Self {
        Self(super::normalize::normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameMode {
    Tv,
    Movie,
}

/// One video file with the episode number extracted from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub episode: u32,
    pub source: PathBuf,
    /// Lower-cased extension including the leading dot, empty if the file has none.
    pub extension: String,
}

impl MediaItem {
    pub fn new(episode: u32, source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let extension = lowercase_extension(&source);
        Self {
            episode,
            source,
            extension,
        }
    }

    pub fn file_name(&self) -> String {
        display_name(&self.source)
    }
}

/// A discovered folder holding video files, before any inference ran on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonFolder {
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
}

impl SeasonFolder {
    pub fn new(path: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            path: path.into(),
            files,
        }
    }

    pub fn label(&self) -> String {
        display_name(&self.path)
    }
}

/// One season's validated items plus the season number they will be tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonContext {
    pub season: u32,
    pub label: String,
    pub items: Vec<MediaItem>,
}

pub(crate) fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
