//! Multi-season planning under one show folder.

use std::fmt;

use tracing::{debug, info, warn};

use super::context::infer_season;
use super::episode::season_from_files;
use super::models::{CanonicalName, SeasonContext, SeasonFolder};
use super::plan::{DestinationState, PlanBuilder, RenamePlan};
use super::validate::{ValidationResult, validate};

/// A season folder whose files did not pass validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonFailure {
    pub label: String,
    pub season: u32,
    pub result: ValidationResult,
}

impl fmt::Display for SeasonFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} (Season {:02})]\n{}", self.label, self.season, self.result)
    }
}

/// Season for a folder: an `SxxEyy` marker in its files wins over the folder name.
pub fn resolve_season(folder: &SeasonFolder) -> u32 {
    season_from_files(&folder.files).unwrap_or_else(|| infer_season(&folder.path))
}

/// Resolves the season and validates the folder's files.
pub fn season_context(folder: &SeasonFolder) -> Result<SeasonContext, SeasonFailure> {
    let season = resolve_season(folder);
    let label = folder.label();

    match validate(&folder.files) {
        ValidationResult::Ok(items) => {
            debug!(folder = %label, season, episodes = items.len(), "season validated");
            Ok(SeasonContext {
                season,
                label,
                items,
            })
        }
        result => Err(SeasonFailure {
            label,
            season,
            result,
        }),
    }
}

/// Plans every season folder against the real destination state given.
///
/// If any folder fails validation no plan is returned at all, only the failures.
pub fn plan_all_seasons<D: DestinationState + ?Sized>(
    folders: &[SeasonFolder],
    title: &CanonicalName,
    destination: &D,
) -> Result<RenamePlan, Vec<SeasonFailure>> {
    plan_seasons_with(PlanBuilder::new(destination), folders, title)
}

/// Like [`plan_all_seasons`] with a preconfigured builder.
pub fn plan_seasons_with<D: DestinationState + ?Sized>(
    mut builder: PlanBuilder<'_, D>,
    folders: &[SeasonFolder],
    title: &CanonicalName,
) -> Result<RenamePlan, Vec<SeasonFailure>> {
    let mut contexts = Vec::with_capacity(folders.len());
    let mut failures = Vec::new();

    for folder in folders {
        match season_context(folder) {
            Ok(context) => contexts.push(context),
            Err(failure) => {
                warn!(folder = %failure.label, season = failure.season, "season failed validation");
                failures.push(failure);
            }
        }
    }

    if !failures.is_empty() {
        return Err(failures);
    }

    for context in &contexts {
        info!(
            folder = %context.label,
            season = context.season,
            episodes = context.items.len(),
            "planning season"
        );
        builder.add_episodes(&context.items, title, context.season);
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn folder(path: &str, names: &[&str]) -> SeasonFolder {
        let files = names.iter().map(|name| Path::new(path).join(name)).collect();
        SeasonFolder::new(path, files)
    }

    fn nothing_exists(_: &Path) -> bool {
        false
    }

    #[test]
    fn test_file_marker_overrides_folder_season() {
        let season = folder("/tv/Show/Season 2", &["Show.S05E01.mkv", "Show.S05E02.mkv"]);
        assert_eq!(resolve_season(&season), 5);

        let season = folder("/tv/Show/Season 2", &["01.mkv", "02.mkv"]);
        assert_eq!(resolve_season(&season), 2);
    }

    #[test]
    fn test_all_seasons_planned_in_folder_order() {
        let folders = vec![
            folder("/tv/Show/Season 1", &["e01.mkv", "e02.mkv"]),
            folder("/tv/Show/Season 2", &["e02.mp4", "e01.mp4"]),
        ];

        let plan = plan_all_seasons(&folders, &CanonicalName::new("Show"), &nothing_exists).unwrap();
        let targets: Vec<PathBuf> = plan.entries.into_iter().map(|entry| entry.target).collect();

        assert_eq!(
            targets,
            vec![
                PathBuf::from("/tv/Show/Season 1/Show.s01.e01.mkv"),
                PathBuf::from("/tv/Show/Season 1/Show.s01.e02.mkv"),
                PathBuf::from("/tv/Show/Season 2/Show.s02.e01.mp4"),
                PathBuf::from("/tv/Show/Season 2/Show.s02.e02.mp4"),
            ]
        );
    }

    #[test]
    fn test_one_failing_season_fails_everything() {
        let folders = vec![
            folder("/tv/Show/Season 1", &["e01.mkv", "e02.mkv", "e03.mkv"]),
            folder("/tv/Show/Season 2", &["e01.mkv", "Show.S02E01.mkv"]),
            folder("/tv/Show/Season 3", &["e01.mkv", "e03.mkv"]),
        ];

        let failures = plan_all_seasons(&folders, &CanonicalName::new("Show"), &nothing_exists).unwrap_err();

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].label, "Season 2");
        assert_eq!(failures[0].result, ValidationResult::DuplicateEpisodes(vec![1]));
        assert_eq!(failures[1].result, ValidationResult::MissingEpisodes(vec![2..=2]));
        assert!(failures[1].to_string().starts_with("[Season 3 (Season 03)]"));
    }

    #[test]
    fn test_no_folders_gives_empty_plan() {
        let plan = plan_all_seasons(&[], &CanonicalName::new("Show"), &nothing_exists).unwrap();
        assert!(plan.is_empty());
    }
}
