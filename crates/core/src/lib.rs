pub mod cache;
pub mod category;
pub mod config;
pub mod fetch;
pub mod index;
pub mod mediathek;
pub mod metadata;
pub mod metrics;
pub mod ruleset;
pub mod testing;

pub use cache::{CacheError, KeyValueStore, ResolutionCache, StoreError};
pub use category::{
    CategoryClassifier, ClassifyError, MediaCategory, SqliteCategoryStore, TopicCategoryRecord,
};
pub use config::{load_config, load_config_from_str, Config, ConfigError, DatabaseConfig};
pub use fetch::{FetchClient, FetchError, RetryConfig};
pub use index::{
    Clock, HttpManifestSource, IndexError, ManifestError, ManifestSource, RulesetIndex,
    RulesetIndexConfig, SystemClock,
};
pub use mediathek::{CatalogItem, CatalogSearch, MediathekClient, MediathekConfig};
pub use metadata::{MediaLookup, MetadataError, MetadataSearch, TmdbConfig, TmdbMetadataSearch};
pub use ruleset::{
    GeneratedRuleset, GeneratorError, MatchPass, MatchingStrategy, PatternSource, Ruleset,
    RulesetFilter, RulesetGenerator, RulesetMedia, RulesetStore, ShowAlias, ShowMetadata,
    SqliteRulesetStore, StrategyDetection, TitleRegexRule, TopicMatch,
};
