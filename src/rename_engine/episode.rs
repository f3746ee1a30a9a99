//! Episode number extraction from file names.
//!
//! Supported shapes, in priority order:
//! - `The.Walking.Dead.S01E01.720p` -> 1
//! - `Show.1x02.1080p` -> 2
//! - `Show - Ep 03 - title` -> 3
//! - `01 Volcano` -> 1
//! - `MyShow.720p.05` -> 5 (last 1-2 digit group)

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace, warn};

use super::models::DEFAULT_SEASON;

/// Extensions stripped from a bare file name before matching.
pub const VIDEO_EXTENSIONS: [&str; 8] = ["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v"];

static SEASON_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[sS](\d{1,2})[ ._-]*[eE](\d{1,2})").unwrap());

static CROSS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})[xX](\d{1,2})\b").unwrap());

static EPISODE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[eE][pP]?[ ._-]?(\d{1,2})\b").unwrap());

static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)").unwrap());

static SHORT_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}").unwrap());

/// One step of the episode cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeRule {
    /// `S01E07`, `s1 e2`, `S01.E07`
    SeasonEpisode,
    /// `1x12`
    Cross,
    /// `E03`, `Ep 03`, `EP-03`
    EpisodeTag,
    /// Digits at the very start of the name.
    LeadingNumber,
    /// Last 1-2 digit group anywhere. Can pick up pieces of `1080p` or a year.
    LastShortNumber,
}

impl EpisodeRule {
    pub const CASCADE: [EpisodeRule; 5] = [
        Self::SeasonEpisode,
        Self::Cross,
        Self::EpisodeTag,
        Self::LeadingNumber,
        Self::LastShortNumber,
    ];

    /// Runs this rule alone against a file base name (no extension).
    pub fn apply(self, base: &str) -> Option<u32> {
        self.find(base).and_then(|digits| digits.parse().ok())
    }

    /// The digits this rule picks out of `base`, before conversion.
    fn find(self, base: &str) -> Option<&str> {
        match self {
            Self::SeasonEpisode => capture(&SEASON_EPISODE_RE, base, 2),
            Self::Cross => capture(&CROSS_RE, base, 2),
            Self::EpisodeTag => capture(&EPISODE_TAG_RE, base, 1),
            Self::LeadingNumber => capture(&LEADING_NUMBER_RE, base, 1),
            Self::LastShortNumber => SHORT_NUMBER_RE.find_iter(base).last().map(|m| m.as_str()),
        }
    }
}

/// Extracts the episode number from a file name, or `None` when no rule matches.
///
/// Only known video extensions are stripped, so a dotted name without extension
/// (`Show.S01E07`) is read whole. Use [`episode_from_path`] for files on disk.
pub fn extract_episode(file_name: &str) -> Option<u32> {
    extract_episode_with_rule(file_name).map(|(_, episode)| episode)
}

/// Like [`extract_episode`], also reporting which rule matched.
pub fn extract_episode_with_rule(file_name: &str) -> Option<(EpisodeRule, u32)> {
    match_base(strip_video_extension(file_name))
}

/// Extracts the episode number from a file's stem, whatever its extension.
pub fn episode_from_path(path: &Path) -> Option<u32> {
    match_base(&file_stem(path)).map(|(_, episode)| episode)
}

/// The first rule that matches decides. Digits too large for an episode number leave
/// the name unparsed instead of falling through to a weaker rule.
fn match_base(base: &str) -> Option<(EpisodeRule, u32)> {
    let Some((rule, digits)) = EpisodeRule::CASCADE
        .iter()
        .find_map(|rule| rule.find(base).map(|digits| (*rule, digits)))
    else {
        debug!(base, "no episode number found");
        return None;
    };

    match digits.parse::<u32>() {
        Ok(episode) => {
            trace!(base, ?rule, episode, "episode matched");
            Some((rule, episode))
        }
        Err(_) => {
            warn!(base, ?rule, digits, "episode number out of range");
            None
        }
    }
}

/// Season taken from the first file carrying an `SxxEyy` marker.
///
/// Files are checked in the given order; `None` if none of them has the marker.
pub fn season_from_files<P: AsRef<Path>>(files: &[P]) -> Option<u32> {
    files.iter().find_map(|file| {
        let base = file_stem(file.as_ref());
        capture(&SEASON_EPISODE_RE, &base, 1)
            .and_then(|digits| digits.parse::<u32>().ok())
            .map(|season| season.max(DEFAULT_SEASON))
    })
}

fn capture<'t>(re: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn strip_video_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && VIDEO_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => name,
    }
}
