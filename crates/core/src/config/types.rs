use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::index::RulesetIndexConfig;
use crate::mediathek::MediathekConfig;
use crate::metadata::TmdbConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub mediathek: MediathekConfig,
    #[serde(default)]
    pub rulesets: RulesetIndexConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("mediarr.db")
}
