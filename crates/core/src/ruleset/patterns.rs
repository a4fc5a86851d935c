//! Regex synthesis for detected title formats.
//!
//! Emits the extraction regexes (or title rule) that encode the title format
//! a topic uses. Everything synthesized here is plain data handed to the
//! downstream matching consumer; this module never compiles or executes the
//! strings it produces. The lookaround-based season/episode pairs rely on
//! that: the consumer's regex engine supports lookarounds, ours does not
//! need to.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::{debug, warn};

use super::types::{MatchingStrategy, TitleRegexRule};

/// At most this many titles are sampled for synthesis.
const SYNTHESIS_SAMPLE: usize = 5;

static PAREN_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(S\d{2}/E\d{2}\)").unwrap());
static BARE_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"S\d{2}E\d{2}").unwrap());
static AIRDATE_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"vom\s+(\d{1,2}\.\s*\w+\s*\d{4})").unwrap());

/// Which sample evidence produced the synthesized patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSource {
    /// A `(S##/E##)` title was found in the sample.
    ParenthesizedSeasonEpisode,
    /// A bare `S##E##` title was found in the sample.
    BareSeasonEpisode,
    /// A `vom <date>` title was found in the sample.
    AirdatePhrase,
    /// No sample title matched a known form; the generic pair was emitted.
    DefaultFallback,
    /// Exact-title strategy: nothing to synthesize.
    ExactTitle,
}

/// Synthesized extraction artifacts for one topic.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedPatterns {
    pub episode_regex: Option<String>,
    pub season_regex: Option<String>,
    pub title_rules: Vec<TitleRegexRule>,
    pub source: PatternSource,
}

/// Synthesize the regex artifacts for a detected strategy from sample titles.
pub fn synthesize(titles: &[&str], strategy: MatchingStrategy, topic: &str) -> SynthesizedPatterns {
    let patterns = match strategy {
        MatchingStrategy::SeasonAndEpisodeNumber => synthesize_season_episode(titles),
        MatchingStrategy::ItemTitleEqualsAirdate => synthesize_airdate(titles, topic),
        MatchingStrategy::ItemTitleExact => SynthesizedPatterns {
            episode_regex: None,
            season_regex: None,
            title_rules: Vec::new(),
            source: PatternSource::ExactTitle,
        },
    };

    debug!(topic, source = ?patterns.source, "synthesized patterns");
    patterns
}

fn synthesize_season_episode(titles: &[&str]) -> SynthesizedPatterns {
    for title in titles.iter().take(SYNTHESIS_SAMPLE) {
        if PAREN_FORM.is_match(title) {
            return SynthesizedPatterns {
                episode_regex: Some(r"(?<=E)(\d{2})(?=\))".to_string()),
                season_regex: Some(r"(?<=S)(\d{2})(?=/E)".to_string()),
                title_rules: Vec::new(),
                source: PatternSource::ParenthesizedSeasonEpisode,
            };
        }
        if BARE_FORM.is_match(title) {
            return SynthesizedPatterns {
                episode_regex: Some(r"(?<=E)(\d{2})".to_string()),
                season_regex: Some(r"(?<=S)(\d{2})(?=E)".to_string()),
                title_rules: Vec::new(),
                source: PatternSource::BareSeasonEpisode,
            };
        }
    }
    default_fallback()
}

fn synthesize_airdate(titles: &[&str], topic: &str) -> SynthesizedPatterns {
    for title in titles.iter().take(SYNTHESIS_SAMPLE) {
        if AIRDATE_PHRASE.is_match(title) {
            let pattern = format!(
                r"^{}.*vom\s+(\d{{1,2}}\.\s*\w+\s*\d{{4}})",
                escape_topic(topic)
            );
            return SynthesizedPatterns {
                episode_regex: None,
                season_regex: None,
                title_rules: vec![TitleRegexRule::title_pattern(pattern)],
                source: PatternSource::AirdatePhrase,
            };
        }
    }

    // Airdate strategy but no dated title in the sample: the generic
    // season/episode pair is emitted anyway. Tagged as a fallback so callers
    // can see the mismatch.
    warn!(topic, "airdate strategy without a dated sample title");
    default_fallback()
}

fn default_fallback() -> SynthesizedPatterns {
    SynthesizedPatterns {
        episode_regex: Some(r"(?<=E)(\d{2})(?=\))".to_string()),
        season_regex: Some(r"(?<=S)(\d{2})(?=/E)".to_string()),
        title_rules: Vec::new(),
        source: PatternSource::DefaultFallback,
    }
}

/// Escape regex metacharacters so the topic matches itself literally inside
/// a synthesized rule.
fn escape_topic(topic: &str) -> String {
    let mut escaped = String::with_capacity(topic.len());
    for c in topic.chars() {
        if ".*+?^${}()|[]\\".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesized_form_pair() {
        let patterns = synthesize(
            &["Tatort (S01/E01) - Borowski"],
            MatchingStrategy::SeasonAndEpisodeNumber,
            "Tatort",
        );

        assert_eq!(
            patterns.episode_regex.as_deref(),
            Some(r"(?<=E)(\d{2})(?=\))")
        );
        assert_eq!(
            patterns.season_regex.as_deref(),
            Some(r"(?<=S)(\d{2})(?=/E)")
        );
        assert!(patterns.title_rules.is_empty());
        assert_eq!(patterns.source, PatternSource::ParenthesizedSeasonEpisode);
    }

    #[test]
    fn test_bare_form_pair() {
        let patterns = synthesize(
            &["Tatort S01E01 - Borowski"],
            MatchingStrategy::SeasonAndEpisodeNumber,
            "Tatort",
        );

        assert_eq!(patterns.episode_regex.as_deref(), Some(r"(?<=E)(\d{2})"));
        assert_eq!(patterns.season_regex.as_deref(), Some(r"(?<=S)(\d{2})(?=E)"));
        assert_eq!(patterns.source, PatternSource::BareSeasonEpisode);
    }

    #[test]
    fn test_parenthesized_form_wins_when_first() {
        // The first matching title decides; a later bare form is ignored.
        let patterns = synthesize(
            &["Show (S02/E03)", "Show S02E04"],
            MatchingStrategy::SeasonAndEpisodeNumber,
            "Show",
        );
        assert_eq!(patterns.source, PatternSource::ParenthesizedSeasonEpisode);
    }

    #[test]
    fn test_season_episode_without_sample_falls_back() {
        let patterns = synthesize(
            &["Show ohne Nummern"],
            MatchingStrategy::SeasonAndEpisodeNumber,
            "Show",
        );
        assert_eq!(patterns.source, PatternSource::DefaultFallback);
        assert_eq!(
            patterns.episode_regex.as_deref(),
            Some(r"(?<=E)(\d{2})(?=\))")
        );
    }

    #[test]
    fn test_airdate_rule_anchors_on_topic() {
        let patterns = synthesize(
            &["Tagesschau vom 15. Januar 2024"],
            MatchingStrategy::ItemTitleEqualsAirdate,
            "Tagesschau",
        );

        assert_eq!(patterns.episode_regex, None);
        assert_eq!(patterns.season_regex, None);
        assert_eq!(patterns.title_rules.len(), 1);
        assert_eq!(patterns.source, PatternSource::AirdatePhrase);

        let rule = &patterns.title_rules[0];
        assert_eq!(rule.kind, "regex");
        assert_eq!(rule.field, "title");
        assert_eq!(
            rule.pattern,
            r"^Tagesschau.*vom\s+(\d{1,2}\.\s*\w+\s*\d{4})"
        );
    }

    #[test]
    fn test_airdate_rule_escapes_topic_metacharacters() {
        let patterns = synthesize(
            &["A.B.C vom 15. Januar 2024"],
            MatchingStrategy::ItemTitleEqualsAirdate,
            "A.B.C",
        );

        let rule = &patterns.title_rules[0];
        assert!(rule.pattern.starts_with(r"^A\.B\.C"));
    }

    #[test]
    fn test_airdate_rule_round_trips_against_sample() {
        let title = "Tagesschau vom 15. Januar 2024";
        let patterns = synthesize(
            &[title],
            MatchingStrategy::ItemTitleEqualsAirdate,
            "Tagesschau",
        );

        let compiled = Regex::new(&patterns.title_rules[0].pattern).unwrap();
        let captures = compiled.captures(title).unwrap();
        assert_eq!(captures.get(1).unwrap().as_str(), "15. Januar 2024");
    }

    #[test]
    fn test_airdate_without_dated_sample_falls_back() {
        let patterns = synthesize(
            &["Tagesschau 20:00 Uhr"],
            MatchingStrategy::ItemTitleEqualsAirdate,
            "Tagesschau",
        );
        assert_eq!(patterns.source, PatternSource::DefaultFallback);
        assert!(patterns.episode_regex.is_some());
    }

    #[test]
    fn test_exact_title_synthesizes_nothing() {
        let patterns = synthesize(
            &["Die Sendung mit der Maus"],
            MatchingStrategy::ItemTitleExact,
            "Die Sendung mit der Maus",
        );
        assert_eq!(patterns.episode_regex, None);
        assert_eq!(patterns.season_regex, None);
        assert!(patterns.title_rules.is_empty());
        assert_eq!(patterns.source, PatternSource::ExactTitle);
    }

    #[test]
    fn test_synthesis_sample_capped_at_five() {
        // The dated title sits past the sample window.
        let titles = vec![
            "eins", "zwei", "drei", "vier", "fuenf",
            "Tagesschau vom 15. Januar 2024",
        ];
        let patterns = synthesize(
            &titles,
            MatchingStrategy::ItemTitleEqualsAirdate,
            "Tagesschau",
        );
        assert_eq!(patterns.source, PatternSource::DefaultFallback);
    }

    #[test]
    fn test_escape_topic() {
        assert_eq!(escape_topic("A.B.C"), r"A\.B\.C");
        assert_eq!(escape_topic("Was? (Wo)"), r"Was\? \(Wo\)");
        assert_eq!(escape_topic("Tatort"), "Tatort");
    }
}
