//! Title and season inference from directory names.
//!
//! Typical layouts:
//! - `.../South Park/Season 01/` -> `South.Park`, season 1
//! - `.../The Walking Dead S02/` -> `The.Walking.Dead`, season 2
//! - `.../South Park The End Of Obesity 2024/` -> `South.Park.The.End.Of.Obesity.2024`

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::models::{CanonicalName, DEFAULT_SEASON};

static TRAILING_SEASON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[.\s_-]*season[.\s_-]*\d+$").unwrap());

static TRAILING_SEASON_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.\s_-]*[sS]\d{1,2}$").unwrap());

static SEASON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)season\D*(\d+)").unwrap());

static SEASON_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[sS](\d{1,2})").unwrap());

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Guesses the show or movie title for a folder.
///
/// A trailing season marker is stripped from the folder name; when nothing useful
/// is left the parent folder's name is used instead.
pub fn infer_title(folder: &Path) -> CanonicalName {
    let leaf = folder_name(folder);
    let candidate = strip_season_suffix(&leaf);

    if !candidate.is_empty() && !candidate.eq_ignore_ascii_case("season") {
        return CanonicalName::new(candidate);
    }

    let parent = folder.parent().map(folder_name).unwrap_or_default();
    debug!(folder = %leaf, parent = %parent, "folder name is only a season marker, using parent");
    CanonicalName::new(&parent)
}

/// Guesses the season number for a folder. Never returns less than 1.
pub fn infer_season(folder: &Path) -> u32 {
    season_from_label(&folder_name(folder))
}

/// Season inference on a bare folder label.
///
/// The first matching rule decides. A number too large to be a season falls back to
/// the default season rather than to a later rule.
pub fn season_from_label(label: &str) -> u32 {
    let Some((rule, digits)) = SeasonRule::CASCADE
        .iter()
        .find_map(|rule| rule.find(label).map(|digits| (*rule, digits)))
    else {
        return DEFAULT_SEASON;
    };

    match digits.parse::<u32>() {
        Ok(season) => {
            debug!(label, ?rule, season, "season inferred from folder name");
            season.max(DEFAULT_SEASON)
        }
        Err(_) => {
            warn!(label, ?rule, digits, "season number out of range, using default");
            DEFAULT_SEASON
        }
    }
}

/// Ordered season rules for folder labels, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonRule {
    /// `Season 01`, `season1`, `South Park Season 10`
    SeasonWord,
    /// `S01`, `s5`
    Marker,
    /// Last run of digits anywhere in the label.
    LastDigits,
}

impl SeasonRule {
    pub const CASCADE: [SeasonRule; 3] = [Self::SeasonWord, Self::Marker, Self::LastDigits];

    pub fn apply(self, label: &str) -> Option<u32> {
        self.find(label).and_then(|digits| digits.parse().ok())
    }

    fn find(self, label: &str) -> Option<&str> {
        match self {
            Self::SeasonWord => first_capture(&SEASON_WORD_RE, label),
            Self::Marker => first_capture(&SEASON_MARKER_RE, label),
            Self::LastDigits => DIGIT_RUN_RE.find_iter(label).last().map(|m| m.as_str()),
        }
    }
}

fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

fn strip_season_suffix(name: &str) -> &str {
    let without_word = match TRAILING_SEASON_WORD_RE.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    };
    let without_marker = match TRAILING_SEASON_MARKER_RE.find(without_word) {
        Some(m) => &without_word[..m.start()],
        None => without_word,
    };
    without_marker.trim_matches(|c| matches!(c, ' ' | '.' | '-' | '_'))
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_season_folder_uses_parent() {
        assert_eq!(infer_title(Path::new("/tv/South Park/Season 01")).as_str(), "South.Park");
        assert_eq!(infer_title(Path::new("/tv/The Walking Dead/S2")).as_str(), "The.Walking.Dead");
        assert_eq!(infer_title(Path::new("/tv/Show_Name/season")).as_str(), "Show.Name");
    }

    #[test]
    fn test_title_strips_trailing_marker() {
        assert_eq!(infer_title(Path::new("/tv/South Park Season 10")).as_str(), "South.Park");
        assert_eq!(infer_title(Path::new("/tv/Breaking.Bad.S03")).as_str(), "Breaking.Bad");
        assert_eq!(infer_title(Path::new("/tv/Dark - season_2")).as_str(), "Dark");
    }

    #[test]
    fn test_title_keeps_plain_folder_names() {
        assert_eq!(
            infer_title(Path::new("/movies/South Park The End Of Obesity 2024")).as_str(),
            "South.Park.The.End.Of.Obesity.2024"
        );
        // Marker only counts at the very end.
        assert_eq!(infer_title(Path::new("/tv/S01 Extras")).as_str(), "S01.Extras");
    }

    #[test]
    fn test_title_without_parent_is_empty() {
        assert!(infer_title(Path::new("/Season 01")).is_empty());
        assert!(infer_title(Path::new("/")).is_empty());
    }

    #[test]
    fn test_season_rules_in_order() {
        assert_eq!(season_from_label("Season 01"), 1);
        assert_eq!(season_from_label("season 7"), 7);
        assert_eq!(season_from_label("South Park Season 10"), 10);
        assert_eq!(season_from_label("S03"), 3);
        assert_eq!(season_from_label("s5"), 5);
        assert_eq!(season_from_label("Volume 4"), 4);
        assert_eq!(season_from_label("Specials"), 1);
    }

    #[test]
    fn test_season_word_beats_marker_and_digits() {
        assert_eq!(SeasonRule::SeasonWord.apply("S09 Season 2 (2019)"), Some(2));
        assert_eq!(season_from_label("S09 Season 2 (2019)"), 2);
        assert_eq!(season_from_label("Show S04 720p"), 4);
    }

    #[test]
    fn test_season_word_matches_any_case() {
        assert_eq!(season_from_label("SEASON 2 S05"), 2);
        assert_eq!(season_from_label("SeAsOn_3"), 3);
    }

    #[test]
    fn test_oversized_season_number_uses_default() {
        assert_eq!(SeasonRule::SeasonWord.apply("Season 99999999999"), None);
        assert_eq!(season_from_label("Season 99999999999 S04"), 1);
        assert_eq!(season_from_label("Collection 12345678901"), 1);
    }

    #[test]
    fn test_season_floored_at_one() {
        assert_eq!(season_from_label("Season 00"), 1);
        assert_eq!(season_from_label("S0"), 1);
    }

    #[test]
    fn test_last_digits_fallback_keeps_unrelated_numbers() {
        assert_eq!(SeasonRule::LastDigits.apply("Show 2019 Part 3"), Some(3));
        assert_eq!(season_from_label("Best of 2019"), 2019);
    }
}
