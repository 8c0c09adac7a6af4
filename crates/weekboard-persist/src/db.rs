//! LMDB database wrapper for state persistence.

use std::path::Path;

use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};
use weekboard_history::Store;

/// LMDB database holding encoded state values by key.
pub struct StateDb {
    env: Env,
    db: Database<Str, Str>,
}

impl core::fmt::Debug for StateDb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateDb")
            .field("path", &self.env.path())
            .finish_non_exhaustive()
    }
}

impl StateDb {
    /// Open or create a state database at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or created.
    ///
    /// # Safety
    /// Uses unsafe to call heed's open method which requires ensuring
    /// the environment is not opened twice in the same process.
    #[allow(unsafe_code)]
    pub fn open(path: impl AsRef<Path>) -> heed::Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        // SAFETY: each path is opened once by the owning application
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(64 * 1024 * 1024)
                .max_dbs(1)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let db = env.create_database(&mut wtxn, Some("state"))?;
        wtxn.commit()?;

        tracing::debug!("Opened state database at {}", path.display());
        Ok(Self { env, db })
    }

    /// Load the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the database read fails.
    pub fn load(&self, key: &str) -> heed::Result<Option<String>> {
        let rtxn = self.env.read_txn()?;
        let value = self.db.get(&rtxn, key)?.map(str::to_owned);
        if value.is_some() {
            tracing::trace!("Loaded {key}");
        }
        Ok(value)
    }

    /// Save `value` under `key` in its own write transaction.
    ///
    /// # Errors
    /// Returns an error if the database write fails.
    pub fn save(&self, key: &str, value: &str) -> heed::Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.db.put(&mut wtxn, key, value)?;
        wtxn.commit()?;

        tracing::trace!("Persisted {key} ({} bytes)", value.len());
        Ok(())
    }

    /// Delete the value under `key`.
    ///
    /// # Errors
    /// Returns an error if the database delete fails.
    pub fn delete(&self, key: &str) -> heed::Result<bool> {
        let mut wtxn = self.env.write_txn()?;
        let deleted = self.db.delete(&mut wtxn, key)?;
        wtxn.commit()?;

        if deleted {
            tracing::trace!("Deleted {key}");
        }
        Ok(deleted)
    }
}

impl Store for StateDb {
    type Error = heed::Error;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.load(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.save(key, value)
    }
}
