//! Render hooks for views that display engine state.

use crate::{EntryIndex, HistoryEntry};

/// Read-only view handed to renderers after each state-affecting operation.
#[derive(Debug)]
pub struct Frame<'a, S> {
    pub(crate) live: &'a S,
    pub(crate) entries: &'a [HistoryEntry<S>],
    pub(crate) cursor: EntryIndex,
    pub(crate) preview: Option<EntryIndex>,
}

impl<'a, S> Frame<'a, S> {
    /// The state views should display: the previewed snapshot, or the live
    /// state when not previewing.
    pub fn effective(&self) -> &'a S {
        self.preview
            .and_then(|i| self.entries.get(i))
            .map_or(self.live, HistoryEntry::snapshot)
    }

    pub fn live(&self) -> &'a S {
        self.live
    }

    pub fn entries(&self) -> &'a [HistoryEntry<S>] {
        self.entries
    }

    pub fn cursor(&self) -> EntryIndex {
        self.cursor
    }

    pub fn preview_index(&self) -> Option<EntryIndex> {
        self.preview
    }

    /// Entry the effective state comes from.
    pub fn active_index(&self) -> EntryIndex {
        self.preview.unwrap_or(self.cursor)
    }
}

/// A view that redraws from engine state.
pub trait Render<S> {
    fn render(&mut self, frame: &Frame<'_, S>);
}

impl<S, F> Render<S> for F
where
    F: FnMut(&Frame<'_, S>),
{
    fn render(&mut self, frame: &Frame<'_, S>) {
        self(frame);
    }
}
