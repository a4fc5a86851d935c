//! Ruleset generation.
//!
//! Turns a show's known names plus the catalog's search results into a
//! persisted parsing ruleset: pick the topic that belongs to the show,
//! detect which title format the topic uses, and synthesize the extraction
//! regexes that encode it.

mod generator;
mod patterns;
mod sqlite;
mod store;
mod strategy;
mod topic_match;
mod types;

pub use generator::{GeneratorError, RulesetGenerator};
pub use patterns::{synthesize, PatternSource, SynthesizedPatterns};
pub use sqlite::SqliteRulesetStore;
pub use store::RulesetStore;
pub use strategy::{detect, StrategyDetection};
pub use topic_match::{match_topic, MatchPass, TopicMatch};
pub use types::*;
