//! Target name templates and collision-safe rename plans.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::models::{CanonicalName, MediaItem, RenameMode, display_name};

/// Extension used when a source file has none.
pub const DEFAULT_EXTENSION: &str = ".mp4";

/// Read-only view of the destination file system used while planning.
pub trait DestinationState {
    fn exists(&self, path: &Path) -> bool;
}

/// Queries the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl DestinationState for FileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl<F> DestinationState for F
where
    F: Fn(&Path) -> bool,
{
    fn exists(&self, path: &Path) -> bool {
        self(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("no title set, leaving movie name as-is")]
    MissingMovieTitle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRename {
    pub source: PathBuf,
    pub target: PathBuf,
    pub target_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    /// Set when the plain target was taken and `_N` had to be appended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collision_suffix: Option<u32>,
}

impl PlannedRename {
    pub fn source_name(&self) -> String {
        display_name(&self.source)
    }
}

/// Ordered renames to execute one after another.
///
/// Files that already carry their target name are listed in `unchanged` and never
/// appear in `entries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    pub entries: Vec<PlannedRename>,
    pub unchanged: Vec<PathBuf>,
}

impl RenamePlan {
    pub fn renamed_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates plan entries across one or more batches.
///
/// Every candidate target is checked both against the destination and against the
/// targets already claimed by this builder, so no two entries share a target.
pub struct PlanBuilder<'a, D: DestinationState + ?Sized> {
    destination: &'a D,
    default_extension: String,
    claimed: HashSet<PathBuf>,
    plan: RenamePlan,
}

impl<'a, D: DestinationState + ?Sized> PlanBuilder<'a, D> {
    pub fn new(destination: &'a D) -> Self {
        Self {
            destination,
            default_extension: DEFAULT_EXTENSION.to_string(),
            claimed: HashSet::new(),
            plan: RenamePlan::default(),
        }
    }

    pub fn default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }

    /// Adds one batch of items. Movie mode without a title adds nothing.
    pub fn add(
        &mut self,
        items: &[MediaItem],
        title: &CanonicalName,
        season: u32,
        mode: RenameMode,
    ) -> Result<(), PlanError> {
        match mode {
            RenameMode::Tv => {
                self.add_episodes(items, title, season);
                Ok(())
            }
            RenameMode::Movie => self.add_movie(items, title),
        }
    }

    /// Adds episodes of one season. An empty title selects the `s01e02` template.
    pub fn add_episodes(&mut self, items: &[MediaItem], title: &CanonicalName, season: u32) {
        for item in items {
            let stem = episode_stem(title, season, item.episode);
            self.push(item, &stem, Some(season), Some(item.episode));
        }
    }

    pub fn add_movie(&mut self, items: &[MediaItem], title: &CanonicalName) -> Result<(), PlanError> {
        if title.is_empty() {
            return Err(PlanError::MissingMovieTitle);
        }
        for item in items {
            self.push(item, title.as_str(), None, None);
        }
        Ok(())
    }

    pub fn finish(self) -> RenamePlan {
        self.plan
    }

    fn push(&mut self, item: &MediaItem, stem: &str, season: Option<u32>, episode: Option<u32>) {
        let source = item.source.as_path();
        let extension = if item.extension.is_empty() {
            self.default_extension.as_str()
        } else {
            item.extension.as_str()
        };
        let folder = source.parent().unwrap_or_else(|| Path::new(""));
        let mut target_name = format!("{stem}{extension}");
        let mut target = folder.join(&target_name);
        let mut suffix = 0;

        while target != source && (self.destination.exists(&target) || self.claimed.contains(&target)) {
            suffix += 1;
            target_name = format!("{stem}_{suffix}{extension}");
            target = folder.join(&target_name);
        }

        self.claimed.insert(target.clone());

        if target == source {
            debug!(file = %target_name, "already named, skipping");
            self.plan.unchanged.push(source.to_path_buf());
            return;
        }

        if suffix > 0 {
            warn!(
                source = %source.display(),
                target = %target_name,
                "destination taken, using suffixed name"
            );
        }

        self.plan.entries.push(PlannedRename {
            source: source.to_path_buf(),
            target,
            target_name,
            season,
            episode,
            collision_suffix: (suffix > 0).then_some(suffix),
        });
    }
}

/// Builds a plan for a single batch.
pub fn build_plan<D: DestinationState + ?Sized>(
    items: &[MediaItem],
    title: &CanonicalName,
    season: u32,
    mode: RenameMode,
    destination: &D,
) -> Result<RenamePlan, PlanError> {
    let mut builder = PlanBuilder::new(destination);
    builder.add(items, title, season, mode)?;
    Ok(builder.finish())
}

/// `Title.s01.e02`, or `s01e02` without a title.
pub fn episode_stem(title: &CanonicalName, season: u32, episode: u32) -> String {
    if title.is_empty() {
        format!("s{season:02}e{episode:02}")
    } else {
        format!("{title}.s{season:02}.e{episode:02}")
    }
}
