//! Topic category classification.
//!
//! Maps a free-text catalog topic to movie/series/unknown. Verdicts are
//! cached in the persistent store so each distinct topic hits the metadata
//! service at most once.

mod classifier;
mod sqlite;

pub use classifier::{CategoryClassifier, ClassifyError};
pub use sqlite::SqliteCategoryStore;

use serde::{Deserialize, Serialize};

/// Media type classification for a catalog topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Movie,
    Series,
    Unknown,
}

impl MediaCategory {
    /// Stable text form, used as the stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Movie => "movie",
            MediaCategory::Series => "series",
            MediaCategory::Unknown => "unknown",
        }
    }

    /// Parse the stored text form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaCategory::Movie),
            "series" => Some(MediaCategory::Series),
            "unknown" => Some(MediaCategory::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached classification verdict for one topic.
///
/// One row per distinct topic string; immutable once created (there is no
/// update path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCategoryRecord {
    /// The catalog topic, unique across all records.
    pub topic: String,
    /// Classified media type.
    pub category: MediaCategory,
    /// External identifier from the metadata service, when one was found.
    pub external_id: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_text_round_trip() {
        for category in [
            MediaCategory::Movie,
            MediaCategory::Series,
            MediaCategory::Unknown,
        ] {
            assert_eq!(MediaCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_parse_rejects_garbage() {
        assert_eq!(MediaCategory::parse("tv"), None);
        assert_eq!(MediaCategory::parse(""), None);
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&MediaCategory::Series).unwrap();
        assert_eq!(json, "\"series\"");
    }
}
