//! Dotted-token normalization for show and movie titles.
//!
//! `South Park` -> `South.Park`, `The_Walking-Dead` -> `The.Walking.Dead`.

use once_cell::sync::Lazy;
use regex::Regex;

static SPACING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_]+").unwrap());

static NON_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9.]+").unwrap());

static DOT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());

/// Normalizes a raw label into dotted form.
///
/// The result only contains ASCII letters, digits and single dots, never starts or
/// ends with a dot, and is empty for blank input. Applying it twice is a no-op.
pub fn normalize(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let dotted = SPACING_RE.replace_all(raw, ".");
    let dotted = NON_TOKEN_RE.replace_all(&dotted, ".");
    let dotted = DOT_RUN_RE.replace_all(&dotted, ".");

    dotted.trim_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic_titles() {
        assert_eq!(normalize("South Park"), "South.Park");
        assert_eq!(normalize("The_Walking-Dead"), "The.Walking.Dead");
        assert_eq!(normalize("  Show   Name  "), "Show.Name");
        assert_eq!(normalize("Already.Dotted.Name"), "Already.Dotted.Name");
    }

    #[test]
    fn test_normalize_punctuation_and_dots() {
        assert_eq!(normalize("Marvel's Agents of S.H.I.E.L.D."), "Marvel.s.Agents.of.S.H.I.E.L.D");
        assert_eq!(normalize("..Movie...Name.."), "Movie.Name");
        assert_eq!(normalize("Show (2024) [1080p]"), "Show.2024.1080p");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t "), "");
        assert_eq!(normalize("___"), "");
        assert_eq!(normalize("-.-"), "");
    }

    #[test]
    fn test_normalize_output_invariants() {
        let samples = [
            "South Park",
            " __weird__ name__ ",
            "a..b...c",
            "...",
            "Ünïcödé Shöw 2",
            "tabs\tand\nnewlines",
            "x_y-z+w&v",
            ".lead and trail.",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert!(!once.chars().any(char::is_whitespace), "{once:?}");
            assert!(!once.contains('_'), "{once:?}");
            assert!(!once.contains(".."), "{once:?}");
            assert!(!once.starts_with('.') && !once.ends_with('.'), "{once:?}");
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
