//! Error types for season-rename.

use std::path::PathBuf;

use crate::rename_engine::{PlanError, SeasonFailure, ValidationResult};

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, RenameError>;

#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    /// A single-season batch failed validation; nothing was planned.
    #[error("{label}: {result}")]
    Validation {
        label: String,
        result: ValidationResult,
    },

    /// At least one season folder failed; no season is planned.
    #[error("{} season folder(s) had problems:\n\n{}", .0.len(), format_failures(.0))]
    SeasonsFailed(Vec<SeasonFailure>),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("no video files found in {} or its season subfolders", .0.display())]
    NoVideoFiles(PathBuf),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

fn format_failures(failures: &[SeasonFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}
