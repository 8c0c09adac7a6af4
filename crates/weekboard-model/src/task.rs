//! Tasks on the weekly board.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{SortMode, TaskId};

/// A task in one of the day columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub pinned: bool,
    /// Unix timestamp in milliseconds.
    pub created_at: u64,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>, created_at: u64) -> Self {
        Self {
            id,
            title: title.into(),
            pinned: false,
            created_at,
        }
    }

    /// Display order: pinned first, then by `mode`.
    pub fn display_cmp(&self, other: &Self, mode: SortMode) -> Ordering {
        other.pinned.cmp(&self.pinned).then_with(|| match mode {
            SortMode::Alpha => self
                .title
                .to_lowercase()
                .cmp(&other.title.to_lowercase())
                .then_with(|| self.title.cmp(&other.title)),
            SortMode::Created => self.created_at.cmp(&other.created_at),
        })
    }
}
