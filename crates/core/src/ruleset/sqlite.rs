//! SQLite-backed generated ruleset store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::store::RulesetStore;
use super::types::{GeneratedRuleset, MatchingStrategy};
use crate::cache::StoreError;

/// SQLite-backed ruleset store.
pub struct SqliteRulesetStore {
    conn: Mutex<Connection>,
}

impl SqliteRulesetStore {
    /// Open (or create) the store at the given path.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- Generated rulesets (topic is the uniqueness key)
            CREATE TABLE IF NOT EXISTS generated_rulesets (
                id TEXT PRIMARY KEY,
                topic TEXT NOT NULL UNIQUE,
                media_id INTEGER NOT NULL,
                show_name TEXT NOT NULL,
                localized_name TEXT,
                matching_strategy TEXT NOT NULL,
                filters TEXT NOT NULL,
                episode_regex TEXT,
                season_regex TEXT,
                title_regex_rules TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_generated_rulesets_media ON generated_rulesets(media_id);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_ruleset(row: &rusqlite::Row<'_>) -> rusqlite::Result<GeneratedRuleset> {
        let strategy_str: String = row.get(5)?;
        let matching_strategy = MatchingStrategy::parse(&strategy_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown matching strategy '{}'", strategy_str).into(),
            )
        })?;

        let created_at_str: String = row.get(10)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(GeneratedRuleset {
            id: row.get(0)?,
            topic: row.get(1)?,
            media_id: row.get(2)?,
            show_name: row.get(3)?,
            localized_name: row.get(4)?,
            matching_strategy,
            filters: row.get(6)?,
            episode_regex: row.get(7)?,
            season_regex: row.get(8)?,
            title_regex_rules: row.get(9)?,
            created_at,
        })
    }

    fn find_one<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Option<GeneratedRuleset>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut rows = stmt
            .query_map(params, Self::row_to_ruleset)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match rows.next() {
            Some(row) => Ok(Some(row.map_err(|e| StoreError::Database(e.to_string()))?)),
            None => Ok(None),
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, topic, media_id, show_name, localized_name, \
     matching_strategy, filters, episode_regex, season_regex, title_regex_rules, created_at \
     FROM generated_rulesets";

impl RulesetStore for SqliteRulesetStore {
    fn find_by_topic(&self, topic: &str) -> Result<Option<GeneratedRuleset>, StoreError> {
        self.find_one(
            &format!("{} WHERE topic = ?", SELECT_COLUMNS),
            params![topic],
        )
    }

    fn find_by_media_id(&self, media_id: u32) -> Result<Option<GeneratedRuleset>, StoreError> {
        self.find_one(
            &format!("{} WHERE media_id = ?", SELECT_COLUMNS),
            params![media_id],
        )
    }

    fn create(&self, ruleset: &GeneratedRuleset) -> Result<GeneratedRuleset, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO generated_rulesets \
             (id, topic, media_id, show_name, localized_name, matching_strategy, \
              filters, episode_regex, season_regex, title_regex_rules, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                ruleset.id,
                ruleset.topic,
                ruleset.media_id,
                ruleset.show_name,
                ruleset.localized_name,
                ruleset.matching_strategy.as_str(),
                ruleset.filters,
                ruleset.episode_regex,
                ruleset.season_regex,
                ruleset.title_regex_rules,
                ruleset.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Duplicate(ruleset.topic.clone())
            }
            other => StoreError::Database(other.to_string()),
        })?;

        Ok(ruleset.clone())
    }

    fn all(&self) -> Result<Vec<GeneratedRuleset>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(SELECT_COLUMNS)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_ruleset)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut rulesets = Vec::new();
        for row in rows {
            rulesets.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(rulesets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::types::default_duration_filter;

    fn ruleset(topic: &str, media_id: u32) -> GeneratedRuleset {
        GeneratedRuleset {
            id: uuid::Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            media_id,
            show_name: topic.to_string(),
            localized_name: None,
            matching_strategy: MatchingStrategy::SeasonAndEpisodeNumber,
            filters: serde_json::to_string(&default_duration_filter()).unwrap(),
            episode_regex: Some(r"(?<=E)(\d{2})".to_string()),
            season_regex: Some(r"(?<=S)(\d{2})(?=E)".to_string()),
            title_regex_rules: "[]".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_and_find_by_topic() {
        let store = SqliteRulesetStore::in_memory().unwrap();
        let created = store.create(&ruleset("Tatort", 83214)).unwrap();

        let found = store.find_by_topic("Tatort").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.media_id, 83214);
        assert_eq!(
            found.matching_strategy,
            MatchingStrategy::SeasonAndEpisodeNumber
        );

        assert!(store.find_by_topic("Polizeiruf 110").unwrap().is_none());
    }

    #[test]
    fn test_find_by_media_id() {
        let store = SqliteRulesetStore::in_memory().unwrap();
        store.create(&ruleset("Tatort", 83214)).unwrap();

        let found = store.find_by_media_id(83214).unwrap().unwrap();
        assert_eq!(found.topic, "Tatort");

        assert!(store.find_by_media_id(999).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_topic_rejected() {
        let store = SqliteRulesetStore::in_memory().unwrap();
        store.create(&ruleset("Tatort", 83214)).unwrap();

        let result = store.create(&ruleset("Tatort", 999));
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn test_all_returns_every_row() {
        let store = SqliteRulesetStore::in_memory().unwrap();
        store.create(&ruleset("Tatort", 1)).unwrap();
        store.create(&ruleset("Tagesschau", 2)).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_round_trips_optional_fields() {
        let store = SqliteRulesetStore::in_memory().unwrap();
        let mut input = ruleset("Tagesschau", 7);
        input.localized_name = Some("Tagesschau".to_string());
        input.episode_regex = None;
        input.season_regex = None;
        input.matching_strategy = MatchingStrategy::ItemTitleEqualsAirdate;
        store.create(&input).unwrap();

        let found = store.find_by_topic("Tagesschau").unwrap().unwrap();
        assert_eq!(found.localized_name.as_deref(), Some("Tagesschau"));
        assert_eq!(found.episode_regex, None);
        assert_eq!(
            found.matching_strategy,
            MatchingStrategy::ItemTitleEqualsAirdate
        );
    }
}
