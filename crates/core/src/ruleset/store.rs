//! Generated ruleset storage trait.

use super::types::GeneratedRuleset;
use crate::cache::StoreError;

/// Trait for generated-ruleset storage backends.
///
/// `topic` is the uniqueness key. Concurrent first-time generations for the
/// same topic can both pass the generator's existence check; the store's
/// uniqueness constraint is the backstop, surfacing as
/// [`StoreError::Duplicate`] for the losing writer.
pub trait RulesetStore: Send + Sync {
    /// Look up a ruleset by its topic.
    fn find_by_topic(&self, topic: &str) -> Result<Option<GeneratedRuleset>, StoreError>;

    /// Look up a ruleset by the external media id it was generated for.
    fn find_by_media_id(&self, media_id: u32) -> Result<Option<GeneratedRuleset>, StoreError>;

    /// Persist a new ruleset.
    fn create(&self, ruleset: &GeneratedRuleset) -> Result<GeneratedRuleset, StoreError>;

    /// All persisted rulesets.
    fn all(&self) -> Result<Vec<GeneratedRuleset>, StoreError>;
}
