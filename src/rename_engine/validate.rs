//! Batch validation: every file must parse, no episode twice, no gaps.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use tracing::warn;

use super::episode::episode_from_path;
use super::models::{MediaItem, display_name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Items sorted by episode number.
    Ok(Vec<MediaItem>),
    /// File names with no recognizable episode number.
    UnparsedFiles(Vec<String>),
    /// Episode numbers claimed by more than one file, sorted.
    DuplicateEpisodes(Vec<u32>),
    /// Episode numbers absent between the lowest and highest found, as sorted runs.
    ///
    /// Every missing number is covered; runs keep a stray huge number from
    /// enumerating billions of gaps.
    MissingEpisodes(Vec<RangeInclusive<u32>>),
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn into_items(self) -> Option<Vec<MediaItem>> {
        match self {
            Self::Ok(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(items) => write!(f, "{} episode(s) ready", items.len()),
            Self::UnparsedFiles(names) => write!(
                f,
                "These files could not be parsed for an episode number:\n{}",
                names.join("\n")
            ),
            Self::DuplicateEpisodes(numbers) => write!(
                f,
                "Duplicate episode numbers found (fix manually before renaming):\n{}",
                padded_list(numbers)
            ),
            Self::MissingEpisodes(numbers) => write!(
                f,
                "Missing episode numbers in sequence (fix manually before renaming):\n{}",
                gap_list(numbers)
            ),
        }
    }
}

/// Validates one batch of episode files.
///
/// Unparsable files are reported first and stop the remaining checks. An empty batch
/// is trivially `Ok`.
pub fn validate(files: &[PathBuf]) -> ValidationResult {
    let mut items = Vec::with_capacity(files.len());
    let mut unparsed = Vec::new();

    for path in files {
        let name = display_name(path);
        match episode_from_path(path) {
            Some(episode) => items.push(MediaItem::new(episode, path.clone())),
            None => unparsed.push(name),
        }
    }

    if !unparsed.is_empty() {
        warn!(count = unparsed.len(), "files without episode number");
        return ValidationResult::UnparsedFiles(unparsed);
    }

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for item in &items {
        *counts.entry(item.episode).or_default() += 1;
    }

    let duplicates: Vec<u32> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(episode, _)| *episode)
        .collect();
    if !duplicates.is_empty() {
        warn!(?duplicates, "duplicate episode numbers");
        return ValidationResult::DuplicateEpisodes(duplicates);
    }

    let present: Vec<u32> = counts.into_keys().collect();
    let missing: Vec<RangeInclusive<u32>> = present
        .windows(2)
        .filter(|pair| pair[1] - pair[0] > 1)
        .map(|pair| pair[0] + 1..=pair[1] - 1)
        .collect();
    if !missing.is_empty() {
        warn!(?missing, "gaps in episode sequence");
        return ValidationResult::MissingEpisodes(missing);
    }

    items.sort_by_key(|item| item.episode);
    ValidationResult::Ok(items)
}

/// Runs longer than this print as `first-last` instead of number by number.
const LISTED_RUN_LIMIT: u32 = 50;

fn gap_list(runs: &[RangeInclusive<u32>]) -> String {
    runs.iter()
        .map(|run| {
            let (first, last) = (*run.start(), *run.end());
            if last - first >= LISTED_RUN_LIMIT {
                format!("{first:02}-{last:02}")
            } else {
                padded_list(&(first..=last).collect::<Vec<_>>())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn padded_list(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| format!("{n:02}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|name| PathBuf::from("/tv/Show/Season 01").join(name)).collect()
    }

    fn episodes(result: &ValidationResult) -> Vec<u32> {
        match result {
            ValidationResult::Ok(items) => items.iter().map(|item| item.episode).collect(),
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_batch_is_sorted() {
        let files = paths(&["Show.S01E03.mkv", "Show.S01E01.mkv", "Show.S01E04.mkv", "Show.S01E02.mkv"]);
        let result = validate(&files);
        assert_eq!(episodes(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_duplicates_reported_sorted_and_distinct() {
        let result = validate(&paths(&["e01.mp4", "e02.mp4", "Show.S01E02.mp4", "e04.mp4"]));
        assert_eq!(result, ValidationResult::DuplicateEpisodes(vec![2]));
    }

    #[test]
    fn test_missing_episodes() {
        let result = validate(&paths(&["e01.mp4", "e03.mp4", "e04.mp4"]));
        assert_eq!(result, ValidationResult::MissingEpisodes(vec![2..=2]));

        let result = validate(&paths(&["e02.mp4", "e06.mp4", "e08.mp4"]));
        assert_eq!(result, ValidationResult::MissingEpisodes(vec![3..=5, 7..=7]));
    }

    #[test]
    fn test_huge_gap_stays_a_single_run() {
        let result = validate(&paths(&["01.mkv", "4000000000 x.mkv"]));
        assert_eq!(result, ValidationResult::MissingEpisodes(vec![2..=3_999_999_999]));
        assert!(result.to_string().ends_with("02-3999999999"));
    }

    #[test]
    fn test_digit_bearing_extension_is_not_read_as_episode() {
        let result = validate(&paths(&["Show 10.m2ts", "Show 11.m2ts", "Show 12.m2ts"]));
        assert_eq!(episodes(&result), vec![10, 11, 12]);

        let result = validate(&paths(&["Show 1.mkv", "Show 7.m2ts"]));
        assert_eq!(result, ValidationResult::MissingEpisodes(vec![2..=6]));
    }

    #[test]
    fn test_unparsed_preempts_other_checks() {
        let result = validate(&paths(&["Pilot.mkv", "e01.mkv", "e01 again.mkv", "Finale.mkv"]));
        assert_eq!(
            result,
            ValidationResult::UnparsedFiles(vec!["Pilot.mkv".to_string(), "Finale.mkv".to_string()])
        );
    }

    #[test]
    fn test_single_file_and_empty_batch() {
        assert_eq!(episodes(&validate(&paths(&["Show - 07.mkv"]))), vec![7]);
        assert_eq!(episodes(&validate(&[])), Vec::<u32>::new());
    }

    #[test]
    fn test_display_names_every_offender() {
        let message = ValidationResult::MissingEpisodes(vec![2..=3, 5..=5, 104..=104]).to_string();
        assert!(message.ends_with("02, 03, 05, 104"));

        let message = ValidationResult::UnparsedFiles(vec!["a.mkv".into(), "b.mkv".into()]).to_string();
        assert!(message.contains("a.mkv\nb.mkv"));
    }
}
