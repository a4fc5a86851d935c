//! Shared test fixtures.

use crate::category::MediaCategory;
use crate::mediathek::CatalogItem;
use crate::ruleset::{MatchingStrategy, Ruleset, RulesetMedia, ShowAlias, ShowMetadata};

/// A catalog item with the given topic and title.
pub fn catalog_item(topic: &str, title: &str) -> CatalogItem {
    CatalogItem {
        topic: topic.to_string(),
        title: title.to_string(),
        channel: Some("ARD".to_string()),
        duration: Some(45 * 60),
        timestamp: None,
    }
}

/// Items titled in the parenthesized `(S01/E0n)` form.
pub fn season_episode_items(topic: &str, count: usize) -> Vec<CatalogItem> {
    (1..=count)
        .map(|i| catalog_item(topic, &format!("{} (S01/E{:02})", topic, i)))
        .collect()
}

/// Items titled in the `vom <date>` airdate form.
pub fn airdate_items(topic: &str, count: usize) -> Vec<CatalogItem> {
    (1..=count)
        .map(|i| catalog_item(topic, &format!("{} vom {}. Januar 2024", topic, i)))
        .collect()
}

/// Show metadata with optional localized name and aliases.
pub fn show(external_id: u32, primary: &str, localized: Option<&str>) -> ShowMetadata {
    ShowMetadata {
        external_id,
        primary_name: primary.to_string(),
        localized_name: localized.map(str::to_string),
        aliases: Vec::new(),
    }
}

/// Show metadata with aliases.
pub fn show_with_aliases(
    external_id: u32,
    primary: &str,
    aliases: &[&str],
) -> ShowMetadata {
    ShowMetadata {
        external_id,
        primary_name: primary.to_string(),
        localized_name: None,
        aliases: aliases
            .iter()
            .map(|name| ShowAlias {
                name: name.to_string(),
            })
            .collect(),
    }
}

/// A manifest-style ruleset with the given topic, priority and media id.
pub fn ruleset(topic: &str, priority: i32, media_id: u32) -> Ruleset {
    Ruleset {
        id: 1000 + priority.unsigned_abs(),
        topic: topic.to_string(),
        priority,
        matching_strategy: MatchingStrategy::ItemTitleExact,
        filters: "[]".to_string(),
        title_regex_rules: "[]".to_string(),
        episode_regex: None,
        season_regex: None,
        media: RulesetMedia {
            id: media_id,
            name: topic.to_string(),
            localized_name: None,
            kind: MediaCategory::Series,
        },
    }
}
