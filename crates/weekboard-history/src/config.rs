//! Engine configuration.

/// Storage keys and labels used by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Key the live state is written under.
    pub storage_key: String,
    /// Older keys consulted in order when the primary key is absent.
    pub legacy_keys: Vec<String>,
    /// Description of the first history entry.
    pub initial_description: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: "calendar-board-state-v2".into(),
            legacy_keys: vec!["calendar-board-state-v1".into()],
            initial_description: "Initial state".into(),
        }
    }
}

impl EngineConfig {
    /// Config with a custom primary key and no legacy keys.
    pub fn with_key(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            legacy_keys: Vec::new(),
            ..Self::default()
        }
    }

    /// Keys in lookup order: primary first, then legacy keys.
    pub fn lookup_keys(&self) -> impl Iterator<Item = &str> {
        core::iter::once(self.storage_key.as_str())
            .chain(self.legacy_keys.iter().map(String::as_str))
    }
}
