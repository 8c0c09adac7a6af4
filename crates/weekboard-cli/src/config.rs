//! Configuration from environment variables.

use std::path::PathBuf;

use weekboard_history::EngineConfig;

/// Database directory, `data/weekboard` by default.
pub const DB_VAR: &str = "WEEKBOARD_DB";
/// Primary storage key.
pub const KEY_VAR: &str = "WEEKBOARD_STORAGE_KEY";
/// Comma-separated legacy keys, consulted in order.
pub const LEGACY_VAR: &str = "WEEKBOARD_LEGACY_KEYS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut engine = EngineConfig::default();

        if let Some(key) = lookup(KEY_VAR).filter(|k| !k.trim().is_empty()) {
            engine.storage_key = key.trim().to_owned();
        }
        if let Some(keys) = lookup(LEGACY_VAR) {
            engine.legacy_keys = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned)
                .collect();
        }

        let db_path = lookup(DB_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/weekboard"));

        Self { db_path, engine }
    }
}
