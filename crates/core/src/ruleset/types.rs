//! Ruleset data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::MediaCategory;

/// How item titles under a topic encode episode identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingStrategy {
    /// Titles carry numbered season/episode markers.
    SeasonAndEpisodeNumber,
    /// Titles identify episodes by their air date.
    ItemTitleEqualsAirdate,
    /// Titles match episode names verbatim; comparison happens downstream.
    ItemTitleExact,
}

impl MatchingStrategy {
    /// Stable text form, used as the stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingStrategy::SeasonAndEpisodeNumber => "SeasonAndEpisodeNumber",
            MatchingStrategy::ItemTitleEqualsAirdate => "ItemTitleEqualsAirdate",
            MatchingStrategy::ItemTitleExact => "ItemTitleExact",
        }
    }

    /// Parse the stored text form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SeasonAndEpisodeNumber" => Some(MatchingStrategy::SeasonAndEpisodeNumber),
            "ItemTitleEqualsAirdate" => Some(MatchingStrategy::ItemTitleEqualsAirdate),
            "ItemTitleExact" => Some(MatchingStrategy::ItemTitleExact),
            _ => None,
        }
    }
}

/// An alternative name for a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowAlias {
    pub name: String,
}

/// Known names and identity for a show, supplied by the caller from its
/// metadata provider. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowMetadata {
    /// External identifier of the show.
    pub external_id: u32,
    /// Primary (original-language) name.
    pub primary_name: String,
    /// Localized name matching the catalog's language, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    /// Further known aliases.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<ShowAlias>,
}

impl ShowMetadata {
    /// Preferred catalog search name: localized when present, else primary.
    pub fn search_name(&self) -> &str {
        self.localized_name.as_deref().unwrap_or(&self.primary_name)
    }

    /// Lowercased names to match candidate topics against: localized name,
    /// primary name, then aliases, absent values filtered out.
    pub fn search_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.aliases.len() + 2);
        if let Some(localized) = &self.localized_name {
            names.push(localized.to_lowercase());
        }
        names.push(self.primary_name.to_lowercase());
        names.extend(self.aliases.iter().map(|a| a.name.to_lowercase()));
        names
    }
}

/// A content filter predicate serialized into a ruleset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetFilter {
    pub attribute: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// The fixed filter every generated ruleset carries: items shorter than
/// 15 minutes are trailers or fragments, not episodes.
pub fn default_duration_filter() -> Vec<RulesetFilter> {
    vec![RulesetFilter {
        attribute: "duration".to_string(),
        kind: "GreaterThan".to_string(),
        value: "15".to_string(),
    }]
}

/// A synthesized title-matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRegexRule {
    #[serde(rename = "type")]
    pub kind: String,
    pub field: String,
    pub pattern: String,
}

impl TitleRegexRule {
    /// A regex rule over the item title field.
    pub fn title_pattern(pattern: String) -> Self {
        Self {
            kind: "regex".to_string(),
            field: "title".to_string(),
            pattern,
        }
    }
}

/// Persisted product of a successful generation run.
///
/// `topic` is unique across all records; a record is immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRuleset {
    /// Stable identity (UUID).
    pub id: String,
    /// The matched catalog topic, unique key.
    pub topic: String,
    /// External identifier of the show this was generated for.
    pub media_id: u32,
    /// Primary show name at generation time.
    pub show_name: String,
    /// Localized show name at generation time.
    pub localized_name: Option<String>,
    /// Detected title format.
    pub matching_strategy: MatchingStrategy,
    /// Serialized [`RulesetFilter`] list.
    pub filters: String,
    /// Episode-number extraction regex, when the strategy uses one.
    pub episode_regex: Option<String>,
    /// Season-number extraction regex, when the strategy uses one.
    pub season_regex: Option<String>,
    /// Serialized [`TitleRegexRule`] list.
    pub title_regex_rules: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl GeneratedRuleset {
    /// Projection consumed by the index and downstream callers.
    pub fn to_ruleset(&self) -> Ruleset {
        Ruleset {
            id: self.numeric_id(),
            topic: self.topic.clone(),
            priority: 0,
            matching_strategy: self.matching_strategy,
            filters: self.filters.clone(),
            title_regex_rules: self.title_regex_rules.clone(),
            episode_regex: self.episode_regex.clone(),
            season_regex: self.season_regex.clone(),
            media: RulesetMedia {
                id: self.media_id,
                name: self.show_name.clone(),
                localized_name: self.localized_name.clone(),
                kind: MediaCategory::Series,
            },
        }
    }

    /// Numeric projection id: the first 8 hex digits of the UUID.
    fn numeric_id(&self) -> u32 {
        let hex: String = self.id.chars().filter(|c| *c != '-').take(8).collect();
        match u32::from_str_radix(&hex, 16) {
            Ok(0) | Err(_) => 99_999,
            Ok(n) => n,
        }
    }
}

/// Ruleset as consumed by callers and held in the ruleset index.
///
/// Several rulesets may exist per topic (generated and manually curated
/// ones); the index orders them ascending by `priority`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub id: u32,
    pub topic: String,
    #[serde(default)]
    pub priority: i32,
    pub matching_strategy: MatchingStrategy,
    #[serde(default)]
    pub filters: String,
    #[serde(default)]
    pub title_regex_rules: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_regex: Option<String>,
    pub media: RulesetMedia,
}

/// Media descriptor nested in a ruleset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesetMedia {
    /// External identifier of the show.
    pub id: u32,
    /// Primary show name.
    pub name: String,
    /// Localized show name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    /// Media type of the entry.
    pub kind: MediaCategory,
}
