//! The ordered history log.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::EntryIndex;

/// A single recorded transition.
///
/// The snapshot is shared behind an `Arc` and only ever exposed as `&S`, so an
/// entry cannot be changed once it is in the log.
#[derive(Debug, Clone)]
pub struct HistoryEntry<S> {
    description: String,
    snapshot: Arc<S>,
    timestamp: u64,
}

impl<S> HistoryEntry<S> {
    /// Record `snapshot` with the current wall-clock time.
    pub fn new(description: impl Into<String>, snapshot: S) -> Self {
        Self::at(description, snapshot, now_millis())
    }

    /// Record `snapshot` with an explicit timestamp (unix milliseconds).
    pub fn at(description: impl Into<String>, snapshot: S, timestamp: u64) -> Self {
        Self {
            description: description.into(),
            snapshot: Arc::new(snapshot),
            timestamp,
        }
    }

    /// Human-readable description of the change.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// State right after the change.
    pub fn snapshot(&self) -> &S {
        &self.snapshot
    }

    /// Unix timestamp in milliseconds.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// Ordered sequence of history entries.
///
/// Never empty. Entries are only appended or removed from the tail.
#[derive(Debug, Clone)]
pub struct HistoryLog<S> {
    entries: Vec<HistoryEntry<S>>,
}

impl<S> HistoryLog<S> {
    /// Start a log with its first entry.
    pub fn new(initial: HistoryEntry<S>) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    /// Number of entries (always at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries. `new` and `truncate_after` always
    /// leave at least one.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the newest entry.
    pub fn last_index(&self) -> EntryIndex {
        self.entries.len() - 1
    }

    /// Whether `index` points at an entry.
    pub fn contains(&self, index: EntryIndex) -> bool {
        index < self.entries.len()
    }

    pub fn get(&self, index: EntryIndex) -> Option<&HistoryEntry<S>> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry<S>] {
        &self.entries
    }

    pub fn iter(&self) -> core::slice::Iter<'_, HistoryEntry<S>> {
        self.entries.iter()
    }

    /// Append an entry and return its index.
    pub fn push(&mut self, entry: HistoryEntry<S>) -> EntryIndex {
        self.entries.push(entry);
        self.last_index()
    }

    /// Keep entries `[0, index]` and drop the rest.
    ///
    /// Returns the number of entries removed. An out-of-range index removes
    /// nothing.
    pub fn truncate_after(&mut self, index: EntryIndex) -> usize {
        let keep = index.saturating_add(1);
        let removed = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);
        removed
    }
}

impl<'a, S> IntoIterator for &'a HistoryLog<S> {
    type Item = &'a HistoryEntry<S>;
    type IntoIter = core::slice::Iter<'a, HistoryEntry<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Milliseconds since the unix epoch, `0` if the clock is before it.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
