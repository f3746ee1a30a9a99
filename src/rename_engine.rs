use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result as AnyResult;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{RenameError, Result};
use crate::scanner::{discover_season_folders, list_video_files};

pub mod context;
pub mod episode;
pub mod models;
pub mod normalize;
pub mod plan;
pub mod seasons;
pub mod validate;

pub use context::{infer_season, infer_title, season_from_label};
pub use episode::{episode_from_path, extract_episode, season_from_files};
pub use models::{CanonicalName, DEFAULT_SEASON, MediaItem, RenameMode, SeasonContext, SeasonFolder};
pub use normalize::normalize;
pub use plan::{
    DEFAULT_EXTENSION, DestinationState, FileSystem, PlanBuilder, PlanError, PlannedRename,
    RenamePlan, build_plan,
};
pub use seasons::{SeasonFailure, plan_all_seasons};
pub use validate::{ValidationResult, validate};

#[derive(Debug, Clone)]
pub struct RenameConfig {
    pub directory: PathBuf,
    /// User-supplied title; blank means "use the inferred title".
    pub title_override: Option<String>,
    pub settings: Config,
}

/// How a folder's contents were interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    Movie,
    TvSeason,
    MultiSeason,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => f.write_str("MOVIE"),
            Self::TvSeason => f.write_str("TV SEASON"),
            Self::MultiSeason => f.write_str("TV MULTI-SEASON"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderPlan {
    pub mode: ScanMode,
    pub title: CanonicalName,
    /// Only set for a single TV season.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    pub plan: RenamePlan,
}

#[derive(Debug)]
pub struct RenameEngine {
    config: RenameConfig,
}

impl RenameEngine {
    pub fn new(config: RenameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// Normalized override if one was given, else the title inferred from the folder.
    pub fn resolve_title(&self) -> CanonicalName {
        let from_override = self
            .config
            .title_override
            .as_deref()
            .map(CanonicalName::new)
            .unwrap_or_default();

        if from_override.is_empty() {
            infer_title(&self.config.directory)
        } else {
            from_override
        }
    }

    /// Scans the configured folder and plans its renames.
    ///
    /// One video is a movie, several are one TV season, and none means every
    /// subfolder holding videos is a season of the same show.
    pub fn plan_directory<D: DestinationState + ?Sized>(&self, destination: &D) -> Result<FolderPlan> {
        let directory = &self.config.directory;
        let videos = list_video_files(directory, &self.config.settings)?;

        match videos.len() {
            0 => self.plan_multi_season(destination),
            1 => self.plan_movie(&videos[0], destination),
            _ => self.plan_tv_season(&videos, destination),
        }
    }

    fn builder<'d, D: DestinationState + ?Sized>(&self, destination: &'d D) -> PlanBuilder<'d, D> {
        PlanBuilder::new(destination).default_extension(self.config.settings.default_extension.clone())
    }

    fn plan_movie<D: DestinationState + ?Sized>(&self, video: &Path, destination: &D) -> Result<FolderPlan> {
        let title = self.resolve_title();
        info!(title = %title, file = %video.display(), "movie detected");

        // Movies carry no episode number.
        let item = MediaItem::new(0, video);
        let mut builder = self.builder(destination);
        builder.add_movie(std::slice::from_ref(&item), &title)?;

        Ok(FolderPlan {
            mode: ScanMode::Movie,
            title,
            season: None,
            plan: builder.finish(),
        })
    }

    fn plan_tv_season<D: DestinationState + ?Sized>(&self, videos: &[PathBuf], destination: &D) -> Result<FolderPlan> {
        let directory = &self.config.directory;
        let season = season_from_files(videos).unwrap_or_else(|| infer_season(directory));
        let title = self.resolve_title();
        info!(title = %title, season, episodes = videos.len(), "TV season detected");

        let items = match validate(videos) {
            ValidationResult::Ok(items) => items,
            result => {
                return Err(RenameError::Validation {
                    label: models::display_name(directory),
                    result,
                });
            }
        };

        if title.is_empty() {
            warn!("no title available, using sXXeYY names");
        }

        let mut builder = self.builder(destination);
        builder.add_episodes(&items, &title, season);

        Ok(FolderPlan {
            mode: ScanMode::TvSeason,
            title,
            season: Some(season),
            plan: builder.finish(),
        })
    }

    fn plan_multi_season<D: DestinationState + ?Sized>(&self, destination: &D) -> Result<FolderPlan> {
        let directory = &self.config.directory;
        let folders = discover_season_folders(directory, &self.config.settings)?;
        if folders.is_empty() {
            return Err(RenameError::NoVideoFiles(directory.clone()));
        }

        let title = self.resolve_title();
        info!(title = %title, seasons = folders.len(), "multi-season show detected");
        if title.is_empty() {
            warn!("no title available, using sXXeYY names");
        }

        let plan = seasons::plan_seasons_with(self.builder(destination), &folders, &title)
            .map_err(RenameError::SeasonsFailed)?;

        Ok(FolderPlan {
            mode: ScanMode::MultiSeason,
            title,
            season: None,
            plan,
        })
    }
}

// Builder for the engine configuration
pub struct ConfigBuilder {
    directory: Option<PathBuf>,
    title_override: Option<String>,
    settings: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            directory: None,
            title_override: None,
            settings: Config::default(),
        }
    }

    pub fn directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.title_override = title.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn settings(mut self, settings: Config) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> AnyResult<RenameConfig> {
        let directory = self.directory
            .ok_or_else(|| anyhow::anyhow!("Directory is required"))?;

        Ok(RenameConfig {
            directory,
            title_override: self.title_override,
            settings: self.settings,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
