//! Settings file for the renamer.
//!
//! ```toml
//! video_extensions = ["mp4", "mkv"]
//! default_extension = ".mp4"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RenameError, Result};
use crate::rename_engine::DEFAULT_EXTENSION;
use crate::rename_engine::episode::VIDEO_EXTENSIONS;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "season-rename.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extensions (without dot) treated as video files when scanning.
    pub video_extensions: Vec<String>,
    /// Extension given to targets whose source has none.
    pub default_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            video_extensions: VIDEO_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            default_extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Case-insensitive check against the configured extensions; `ext` has no dot.
    pub fn is_video_extension(&self, ext: &str) -> bool {
        self.video_extensions.iter().any(|known| known.eq_ignore_ascii_case(ext))
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    normalize_config(&mut config);
    validate_config(&config)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config from the given path, then `./season-rename.toml`, else defaults.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return load_config(local);
    }

    Ok(Config::default())
}

fn normalize_config(config: &mut Config) {
    for ext in &mut config.video_extensions {
        *ext = ext.trim().trim_start_matches('.').to_lowercase();
    }
    config.video_extensions.retain(|ext| !ext.is_empty());
    config.default_extension = config.default_extension.trim().to_lowercase();
}

fn validate_config(config: &Config) -> Result<()> {
    if config.video_extensions.is_empty() {
        return Err(RenameError::InvalidConfig(
            "video_extensions must list at least one extension".to_string(),
        ));
    }

    if !config.default_extension.starts_with('.') || config.default_extension.len() < 2 {
        return Err(RenameError::InvalidConfig(format!(
            "default_extension must look like \".mp4\", got {:?}",
            config.default_extension
        )));
    }

    Ok(())
}
