//! Persistence seam.
//!
//! The engine treats storage as an opaque key-value collaborator holding the
//! encoded live state. Backends live outside this crate; [`MemoryStore`] is
//! the volatile one used by tests.

use std::collections::BTreeMap;
use std::convert::Infallible;

/// Key-value persistence collaborator.
pub trait Store {
    /// Backend error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.values.insert(key.into(), value.into());
        store
    }

    /// Value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of writes performed since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Store for MemoryStore {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

impl<T: Store> Store for &mut T {
    type Error = T::Error;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).write(key, value)
    }
}
