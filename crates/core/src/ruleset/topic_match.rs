//! Topic selection heuristics.

use std::collections::HashSet;

use tracing::debug;

use super::types::ShowMetadata;
use crate::mediathek::CatalogItem;

/// Which pass selected a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPass {
    /// A candidate topic equals one of the show's names.
    Exact,
    /// A candidate topic contains a show name, or the other way around.
    Substring,
    /// Exactly one distinct topic existed among the candidates.
    SoleCandidate,
}

/// A matched topic together with the pass that selected it.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMatch {
    pub topic: String,
    pub pass: MatchPass,
}

/// Select the best-matching topic for a show among catalog search results.
///
/// Strict identity beats loose containment, containment beats the
/// sole-candidate fallback, and multiple ambiguous candidates match nothing
/// at all. Candidates are tried in the order their topics first appeared in
/// the results.
pub fn match_topic(items: &[CatalogItem], show: &ShowMetadata) -> Option<TopicMatch> {
    let topics = unique_topics(items);
    if topics.is_empty() {
        return None;
    }

    let names = show.search_names();

    for topic in &topics {
        let topic_lower = topic.to_lowercase();
        if names.iter().any(|name| *name == topic_lower) {
            debug!(topic = %topic, "exact topic match");
            return Some(TopicMatch {
                topic: topic.clone(),
                pass: MatchPass::Exact,
            });
        }
    }

    for topic in &topics {
        let topic_lower = topic.to_lowercase();
        if names
            .iter()
            .any(|name| topic_lower.contains(name) || name.contains(&topic_lower))
        {
            debug!(topic = %topic, "partial topic match");
            return Some(TopicMatch {
                topic: topic.clone(),
                pass: MatchPass::Substring,
            });
        }
    }

    if topics.len() == 1 {
        debug!(topic = %topics[0], "using sole candidate topic");
        return Some(TopicMatch {
            topic: topics[0].clone(),
            pass: MatchPass::SoleCandidate,
        });
    }

    debug!(candidates = topics.len(), "no matching topic");
    None
}

/// Distinct topics in first-appearance order.
fn unique_topics(items: &[CatalogItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut topics = Vec::new();
    for item in items {
        if seen.insert(item.topic.as_str()) {
            topics.push(item.topic.clone());
        }
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(topic: &str) -> CatalogItem {
        CatalogItem {
            topic: topic.to_string(),
            title: format!("{} - Folge", topic),
            channel: None,
            duration: None,
            timestamp: None,
        }
    }

    fn show(names: &[&str]) -> ShowMetadata {
        ShowMetadata {
            external_id: 1,
            primary_name: names[0].to_string(),
            localized_name: None,
            aliases: names[1..]
                .iter()
                .map(|n| super::super::types::ShowAlias {
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_exact_match_wins() {
        let items = vec![item("Tatort"), item("Tagesschau")];
        let matched = match_topic(&items, &show(&["tatort"])).unwrap();
        assert_eq!(matched.topic, "Tatort");
        assert_eq!(matched.pass, MatchPass::Exact);
    }

    #[test]
    fn test_substring_match() {
        let items = vec![item("Die Tatort Show")];
        let matched = match_topic(&items, &show(&["tatort"])).unwrap();
        assert_eq!(matched.topic, "Die Tatort Show");
        assert_eq!(matched.pass, MatchPass::Substring);
    }

    #[test]
    fn test_substring_match_reversed_containment() {
        // The show name contains the topic.
        let items = vec![item("Pass")];
        let matched = match_topic(&items, &show(&["Der Pass"])).unwrap();
        assert_eq!(matched.topic, "Pass");
        assert_eq!(matched.pass, MatchPass::Substring);
    }

    #[test]
    fn test_sole_candidate_fallback() {
        let items = vec![item("Sonderausgabe"), item("Sonderausgabe")];
        let matched = match_topic(&items, &show(&["tatort"])).unwrap();
        assert_eq!(matched.topic, "Sonderausgabe");
        assert_eq!(matched.pass, MatchPass::SoleCandidate);
    }

    #[test]
    fn test_ambiguous_candidates_match_nothing() {
        let items = vec![item("A"), item("B")];
        assert_eq!(match_topic(&items, &show(&["tatort"])), None);
    }

    #[test]
    fn test_empty_results_match_nothing() {
        assert_eq!(match_topic(&[], &show(&["tatort"])), None);
    }

    #[test]
    fn test_exact_beats_substring_regardless_of_order() {
        // "Tatort Spezial" appears first and would pass the substring test,
        // but the later exact candidate must win.
        let items = vec![item("Tatort Spezial"), item("Tatort")];
        let matched = match_topic(&items, &show(&["tatort"])).unwrap();
        assert_eq!(matched.topic, "Tatort");
        assert_eq!(matched.pass, MatchPass::Exact);
    }

    #[test]
    fn test_alias_names_participate() {
        let items = vec![item("Pagan Peak"), item("Irrelevant")];
        let show = ShowMetadata {
            external_id: 1,
            primary_name: "Der Pass".to_string(),
            localized_name: None,
            aliases: vec![super::super::types::ShowAlias {
                name: "Pagan Peak".to_string(),
            }],
        };
        let matched = match_topic(&items, &show).unwrap();
        assert_eq!(matched.topic, "Pagan Peak");
        assert_eq!(matched.pass, MatchPass::Exact);
    }
}
