//! The history engine: commit, preview, rollback and undo.
//!
//! # Ordering
//!
//! For every commit and rollback the persistence write happens before the
//! log changes, the log changes before the cursor moves, and the cursor moves
//! before renderers are notified. All operations run to completion on the
//! caller's thread.

use core::fmt;

use crate::codec::{self, Snapshot};
use crate::{
    EngineConfig, EntryIndex, Frame, HistoryEntry, HistoryError, HistoryLog, HistoryResult,
    Render, Store,
};

/// Owns the live state, its history and the persistence collaborator.
pub struct Engine<S, St> {
    /// The live state. Written only by commit and rollback.
    live: S,
    log: HistoryLog<S>,
    /// Entry the live state corresponds to.
    cursor: EntryIndex,
    /// Entry being inspected read-only, if any.
    preview: Option<EntryIndex>,
    store: St,
    config: EngineConfig,
    renderers: Vec<Box<dyn Render<S>>>,
}

impl<S, St> fmt::Debug for Engine<S, St> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("entries", &self.log.len())
            .field("cursor", &self.cursor)
            .field("preview", &self.preview)
            .field("renderers", &self.renderers.len())
            .finish_non_exhaustive()
    }
}

impl<S: Snapshot, St: Store> Engine<S, St> {
    /// Load the initial state from `store` and start a fresh history.
    ///
    /// The primary key is read first, then each legacy key in order. A value
    /// found under a legacy key is migrated to the primary key. Missing or
    /// unreadable data yields `S::default()`.
    pub fn open(mut store: St, config: EngineConfig) -> Self {
        let mut state = None;

        for key in config.lookup_keys() {
            match store.read(key) {
                Ok(Some(raw)) => {
                    tracing::debug!("Loaded state from key {key}");
                    state = Some((key.to_owned(), codec::decode::<S>(&raw)));
                    break;
                }
                Ok(None) => tracing::trace!("No state under key {key}"),
                Err(e) => tracing::error!("Failed to read state from key {key}: {e}"),
            }
        }

        let state = match state {
            Some((key, state)) => {
                if key != config.storage_key {
                    tracing::info!("Migrating state from {key} to {}", config.storage_key);
                    write_state(&mut store, &config.storage_key, &state);
                }
                state
            }
            None => S::default(),
        };

        Self::with_state(store, config, state)
    }

    /// Start from an explicit state without reading the store.
    pub fn with_state(store: St, config: EngineConfig, state: S) -> Self {
        let initial = HistoryEntry::new(
            config.initial_description.clone(),
            codec::clone_state(&state),
        );
        Self {
            live: state,
            log: HistoryLog::new(initial),
            cursor: 0,
            preview: None,
            store,
            config,
            renderers: Vec::new(),
        }
    }

    // ==================== Reads ====================

    /// The live state.
    pub fn read(&self) -> &S {
        &self.live
    }

    /// The previewed snapshot while previewing, otherwise the live state.
    pub fn effective_state(&self) -> &S {
        self.frame().effective()
    }

    pub fn history(&self) -> &HistoryLog<S> {
        &self.log
    }

    pub fn cursor(&self) -> EntryIndex {
        self.cursor
    }

    pub fn preview_index(&self) -> Option<EntryIndex> {
        self.preview
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot of engine state for renderers.
    pub fn frame(&self) -> Frame<'_, S> {
        Frame {
            live: &self.live,
            entries: self.log.entries(),
            cursor: self.cursor,
            preview: self.preview,
        }
    }

    /// Register a view to be notified after every state-affecting operation.
    pub fn add_renderer(&mut self, renderer: impl Render<S> + 'static) {
        self.renderers.push(Box::new(renderer));
    }

    /// Redraw every view without changing anything.
    pub fn refresh(&mut self) {
        self.notify();
    }

    // ==================== Commit ====================

    /// Apply `mutation` to the live state and record it as a new entry.
    ///
    /// `mutation` must not panic: a panic mid-way leaves the live state
    /// partially mutated and unrecorded. Use [`Engine::try_commit`] for
    /// mutations that can fail.
    ///
    /// Returns the index of the new entry.
    pub fn commit(
        &mut self,
        description: impl Into<String>,
        mutation: impl FnOnce(&mut S),
    ) -> EntryIndex {
        mutation(&mut self.live);
        self.record(description.into())
    }

    /// Apply a fallible mutation as a transaction.
    ///
    /// The mutation runs on a scratch copy. On `Err` the live state, the log,
    /// the store and the preview are untouched and the error is returned.
    pub fn try_commit<E>(
        &mut self,
        description: impl Into<String>,
        mutation: impl FnOnce(&mut S) -> Result<(), E>,
    ) -> Result<EntryIndex, E> {
        let mut scratch = codec::clone_state(&self.live);
        mutation(&mut scratch)?;
        self.live = scratch;
        Ok(self.record(description.into()))
    }

    /// Steps after the mutation: persist, leave preview, drop the stale
    /// future, append, move the cursor, notify.
    fn record(&mut self, description: String) -> EntryIndex {
        self.persist_or_log();
        self.preview = None;

        let dropped = self.log.truncate_after(self.cursor);
        if dropped > 0 {
            tracing::debug!("Discarded {dropped} entries past cursor {}", self.cursor);
        }

        let snapshot = codec::clone_state(&self.live);
        self.cursor = self.log.push(HistoryEntry::new(description, snapshot));
        tracing::debug!(
            "Committed entry {}: {}",
            self.cursor,
            self.log.entries()[self.cursor].description()
        );

        self.notify();
        self.cursor
    }

    // ==================== Preview ====================

    /// Show entry `index` instead of the live state.
    ///
    /// Does not touch the live state, the cursor or the log. Returns `false`
    /// (and changes nothing) when `index` is out of range.
    pub fn enter_preview(&mut self, index: EntryIndex) -> bool {
        if let Err(e) = self.check_index(index) {
            tracing::warn!("Ignoring preview request: {e}");
            return false;
        }
        self.preview = Some(index);
        self.notify();
        true
    }

    /// Return to showing the live state. Returns whether a preview was active.
    pub fn exit_preview(&mut self) -> bool {
        let was_previewing = self.preview.take().is_some();
        self.notify();
        was_previewing
    }

    // ==================== Rollback ====================

    /// Make entry `index` the present and discard every entry after it.
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range.
    pub fn rollback(&mut self, index: EntryIndex) -> bool {
        if let Err(e) = self.check_index(index) {
            tracing::warn!("Ignoring rollback request: {e}");
            return false;
        }

        self.live = codec::clone_state(self.log.entries()[index].snapshot());
        let dropped = self.log.truncate_after(index);
        self.cursor = index;
        self.preview = None;
        self.persist_or_log();
        tracing::debug!("Rolled back to entry {index}, discarded {dropped} entries");

        self.notify();
        true
    }

    /// Roll back one entry. Does nothing at the first entry.
    ///
    /// Like [`Engine::rollback`], the undone entry is discarded; there is no
    /// redo.
    pub fn undo(&mut self) -> bool {
        match self.cursor.checked_sub(1) {
            Some(previous) => self.rollback(previous),
            None => {
                tracing::trace!("Nothing to undo");
                false
            }
        }
    }

    // ==================== Persistence ====================

    /// Write the live state to the store.
    pub fn persist(&mut self) -> HistoryResult<()> {
        let raw = codec::encode(&self.live)?;
        self.store
            .write(&self.config.storage_key, &raw)
            .map_err(HistoryError::store)
    }

    /// The in-memory state stays authoritative when a write fails.
    fn persist_or_log(&mut self) {
        if let Err(e) = self.persist() {
            tracing::error!("Failed to persist state: {e}");
        }
    }

    fn check_index(&self, index: EntryIndex) -> HistoryResult<()> {
        if self.log.contains(index) {
            Ok(())
        } else {
            Err(HistoryError::IndexOutOfRange {
                index,
                len: self.log.len(),
            })
        }
    }

    fn notify(&mut self) {
        let frame = Frame {
            live: &self.live,
            entries: self.log.entries(),
            cursor: self.cursor,
            preview: self.preview,
        };
        for renderer in &mut self.renderers {
            renderer.render(&frame);
        }
    }
}

fn write_state<S: Snapshot, St: Store>(store: &mut St, key: &str, state: &S) {
    let result = codec::encode(state)
        .and_then(|raw| store.write(key, &raw).map_err(HistoryError::store));
    if let Err(e) = result {
        tracing::error!("Failed to write state to key {key}: {e}");
    }
}
