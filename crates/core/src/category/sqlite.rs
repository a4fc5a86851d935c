//! SQLite-backed topic category store.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, params_from_iter, Connection};

use super::{MediaCategory, TopicCategoryRecord};
use crate::cache::{KeyValueStore, StoreError};

/// SQLite-backed store for topic classification verdicts.
pub struct SqliteCategoryStore {
    conn: Mutex<Connection>,
}

impl SqliteCategoryStore {
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
            -- Classification verdicts (one row per distinct topic)
            CREATE TABLE IF NOT EXISTS topic_categories (
                topic TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                external_id INTEGER
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TopicCategoryRecord> {
        let topic: String = row.get(0)?;
        let category_str: String = row.get(1)?;
        let category = MediaCategory::parse(&category_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("unknown category '{}'", category_str).into(),
            )
        })?;
        Ok(TopicCategoryRecord {
            topic,
            category,
            external_id: row.get(2)?,
        })
    }
}

impl KeyValueStore<TopicCategoryRecord> for SqliteCategoryStore {
    fn find(&self, key: &str) -> Result<Option<TopicCategoryRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT topic, category, external_id FROM topic_categories WHERE topic = ?")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut rows = stmt
            .query_map(params![key], Self::row_to_record)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match rows.next() {
            Some(row) => Ok(Some(row.map_err(|e| StoreError::Database(e.to_string()))?)),
            None => Ok(None),
        }
    }

    fn find_many(&self, keys: &[String]) -> Result<Vec<(String, TopicCategoryRecord)>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().unwrap();
        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!(
            "SELECT topic, category, external_id FROM topic_categories WHERE topic IN ({})",
            placeholders
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params_from_iter(keys.iter()), Self::row_to_record)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let record = row.map_err(|e| StoreError::Database(e.to_string()))?;
            records.push((record.topic.clone(), record));
        }
        Ok(records)
    }

    fn create(&self, key: &str, value: &TopicCategoryRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO topic_categories (topic, category, external_id) VALUES (?, ?, ?)",
            params![key, value.category.as_str(), value.external_id],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Duplicate(key.to_string())
            }
            other => StoreError::Database(other.to_string()),
        })?;
        Ok(())
    }

    fn upsert(&self, key: &str, value: &TopicCategoryRecord) -> Result<TopicCategoryRecord, StoreError> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO topic_categories (topic, category, external_id) VALUES (?, ?, ?)
                 ON CONFLICT(topic) DO NOTHING",
                params![key, value.category.as_str(), value.external_id],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        self.find(key)?
            .ok_or_else(|| StoreError::Database(format!("upsert lost row for topic '{}'", key)))
    }
}
