//! Title format detection.
//!
//! Inspects a sample of item titles under a matched topic and decides which
//! of the three matching strategies fits the topic's title format.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use super::types::MatchingStrategy;

/// Season/episode forms observed in catalog titles.
static SEASON_EPISODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // (S01/E01)
        Regex::new(r"\(S(\d{2})/E(\d{2})\)").unwrap(),
        // S01E01
        Regex::new(r"S(\d{2})E(\d{2})").unwrap(),
        // Staffel 1 Folge 1
        Regex::new(r"(?i)Staffel\s*(\d+).*Folge\s*(\d+)").unwrap(),
    ]
});

/// Air-date mentions in catalog titles.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // vom 15. Januar 2024
        Regex::new(r"vom\s+(\d{1,2}\.\s*\w+\s*\d{4})").unwrap(),
        // 15.01.2024
        Regex::new(r"(\d{1,2}\.\d{1,2}\.\d{4})").unwrap(),
    ]
});

/// At most this many titles are sampled for detection.
const DETECTION_SAMPLE: usize = 10;

/// Outcome of strategy detection over a title sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyDetection {
    pub strategy: MatchingStrategy,
    /// Titles (at most one count each) matching a season/episode pattern.
    pub season_episode_hits: usize,
    /// Titles (at most one count each) matching a date pattern.
    pub date_hits: usize,
}

/// Classify the title format of a topic from a sample of its titles.
///
/// An empty sample defaults to season/episode numbering, the most common
/// catalog format.
pub fn detect(titles: &[&str]) -> StrategyDetection {
    if titles.is_empty() {
        return StrategyDetection {
            strategy: MatchingStrategy::SeasonAndEpisodeNumber,
            season_episode_hits: 0,
            date_hits: 0,
        };
    }

    let mut season_episode_hits = 0;
    let mut date_hits = 0;

    for title in titles.iter().take(DETECTION_SAMPLE) {
        if SEASON_EPISODE_PATTERNS.iter().any(|p| p.is_match(title)) {
            season_episode_hits += 1;
        }
        if DATE_PATTERNS.iter().any(|p| p.is_match(title)) {
            date_hits += 1;
        }
    }

    let strategy = if season_episode_hits > date_hits && season_episode_hits > 0 {
        MatchingStrategy::SeasonAndEpisodeNumber
    } else if date_hits > 0 {
        MatchingStrategy::ItemTitleEqualsAirdate
    } else {
        MatchingStrategy::ItemTitleExact
    };

    debug!(
        ?strategy,
        season_episode_hits, date_hits, "detected matching strategy"
    );

    StrategyDetection {
        strategy,
        season_episode_hits,
        date_hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_episode_titles() {
        let titles: Vec<String> = (1..=10)
            .map(|i| format!("Tatort - Folge {} S01E{:02}", i, i))
            .collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();

        let detection = detect(&refs);
        assert_eq!(detection.strategy, MatchingStrategy::SeasonAndEpisodeNumber);
        assert_eq!(detection.season_episode_hits, 10);
        assert_eq!(detection.date_hits, 0);
    }

    #[test]
    fn test_parenthesized_form_detected() {
        let detection = detect(&["Show (S03/E07) - Der Fall"]);
        assert_eq!(detection.strategy, MatchingStrategy::SeasonAndEpisodeNumber);
        assert_eq!(detection.season_episode_hits, 1);
    }

    #[test]
    fn test_localized_phrase_detected() {
        let detection = detect(&["Show - Staffel 2 Folge 5"]);
        assert_eq!(detection.strategy, MatchingStrategy::SeasonAndEpisodeNumber);
    }

    #[test]
    fn test_airdate_titles() {
        let titles: Vec<String> = (1..=10)
            .map(|i| format!("Tagesschau vom {:02}.01.2024", i))
            .collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();

        let detection = detect(&refs);
        assert_eq!(detection.strategy, MatchingStrategy::ItemTitleEqualsAirdate);
        assert_eq!(detection.date_hits, 10);
    }

    #[test]
    fn test_spelled_out_date_phrase() {
        let detection = detect(&["Tagesschau vom 15. Januar 2024"]);
        assert_eq!(detection.strategy, MatchingStrategy::ItemTitleEqualsAirdate);
        assert_eq!(detection.date_hits, 1);
    }

    #[test]
    fn test_plain_titles_default_to_exact() {
        let detection = detect(&["Die Sendung mit der Maus", "Eine besondere Folge"]);
        assert_eq!(detection.strategy, MatchingStrategy::ItemTitleExact);
        assert_eq!(detection.season_episode_hits, 0);
        assert_eq!(detection.date_hits, 0);
    }

    #[test]
    fn test_empty_sample_defaults_to_season_episode() {
        let detection = detect(&[]);
        assert_eq!(detection.strategy, MatchingStrategy::SeasonAndEpisodeNumber);
    }

    #[test]
    fn test_title_counted_once_per_category() {
        // Both season/episode forms appear; the title still counts once.
        let detection = detect(&["Show S01E01 (S01/E01)"]);
        assert_eq!(detection.season_episode_hits, 1);
    }

    #[test]
    fn test_date_majority_wins_over_minority_markers() {
        // 1 season/episode hit vs 3 date hits.
        let detection = detect(&[
            "Show S01E01",
            "Show vom 01.02.2024",
            "Show vom 02.02.2024",
            "Show vom 03.02.2024",
        ]);
        assert_eq!(detection.strategy, MatchingStrategy::ItemTitleEqualsAirdate);
        assert_eq!(detection.season_episode_hits, 1);
        assert_eq!(detection.date_hits, 3);
    }

    #[test]
    fn test_sample_capped_at_ten_titles() {
        // Eleven date titles after ten plain ones: only the first ten count.
        let mut titles: Vec<String> = (0..10).map(|i| format!("Plain {}", i)).collect();
        titles.push("Show vom 01.02.2024".to_string());
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();

        let detection = detect(&refs);
        assert_eq!(detection.strategy, MatchingStrategy::ItemTitleExact);
        assert_eq!(detection.date_hits, 0);
    }
}
