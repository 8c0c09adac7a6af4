//! The planner state recorded by the history engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use weekboard_history::Snapshot;

use crate::{ActionError, Board, CloudId, GroupId, SortMode, Task, TaskId, Weekday};

/// Everything the weekly board persists.
///
/// Every field has a default, so payloads from older versions that lack a
/// field still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerState {
    pub sort_mode: SortMode,
    pub next_task_id: u64,
    pub next_cloud_id: u64,
    pub next_group_id: u64,
    pub days: BTreeMap<Weekday, Vec<Task>>,
    pub boards: BTreeMap<TaskId, Board>,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::Created,
            next_task_id: 1,
            next_cloud_id: 1,
            next_group_id: 1,
            days: Weekday::ALL.into_iter().map(|day| (day, Vec::new())).collect(),
            boards: BTreeMap::new(),
        }
    }
}

impl Snapshot for PlannerState {
    fn repair(&mut self) {
        for day in Weekday::ALL {
            self.days.entry(day).or_default();
        }

        let max_task = self.days.values().flatten().map(|t| t.id).max().unwrap_or(0);
        let clouds = || self.boards.values().flat_map(|b| &b.clouds);
        let max_cloud = clouds().map(|c| c.id).max().unwrap_or(0);
        let max_group = clouds().filter_map(|c| c.group_id).max().unwrap_or(0);

        // an id at u64::MAX pins its counter there, which allocation refuses
        self.next_task_id = self.next_task_id.max(max_task.saturating_add(1));
        self.next_cloud_id = self.next_cloud_id.max(max_cloud.saturating_add(1));
        self.next_group_id = self.next_group_id.max(max_group.saturating_add(1));

        for board in self.boards.values_mut() {
            board.repair();
        }

        tracing::debug!(
            "Repaired state with {} tasks, next ids task={} cloud={} group={}",
            self.task_count(),
            self.next_task_id,
            self.next_cloud_id,
            self.next_group_id
        );
    }
}

impl PlannerState {
    /// Tasks of `day` in stored order.
    pub fn tasks(&self, day: Weekday) -> &[Task] {
        self.days.get(&day).map_or(&[], Vec::as_slice)
    }

    /// Tasks of `day` in display order for the current sort mode.
    pub fn sorted_tasks(&self, day: Weekday) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks(day).iter().collect();
        tasks.sort_by(|a, b| a.display_cmp(b, self.sort_mode));
        tasks
    }

    /// Find a task and the day it is on.
    pub fn find_task(&self, id: TaskId) -> Option<(Weekday, &Task)> {
        self.days
            .iter()
            .find_map(|(day, tasks)| tasks.iter().find(|t| t.id == id).map(|t| (*day, t)))
    }

    pub(crate) fn find_task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.days.values_mut().flatten().find(|t| t.id == id)
    }

    pub fn task_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn board(&self, task: TaskId) -> Option<&Board> {
        self.boards.get(&task)
    }

    /// Board of `task`, created empty on first use.
    pub(crate) fn ensure_board(&mut self, task: TaskId) -> &mut Board {
        self.boards.entry(task).or_default()
    }

    pub(crate) fn allocate_task_id(&mut self) -> Result<TaskId, ActionError> {
        allocate(&mut self.next_task_id, "task")
    }

    pub(crate) fn allocate_cloud_id(&mut self) -> Result<CloudId, ActionError> {
        allocate(&mut self.next_cloud_id, "cloud")
    }

    pub(crate) fn allocate_group_id(&mut self) -> Result<GroupId, ActionError> {
        allocate(&mut self.next_group_id, "group")
    }
}

/// Hand out `*next` and advance it. `u64::MAX` is never handed out, so a
/// counter pinned there by repair cannot collide with the id that pinned it.
fn allocate(next: &mut u64, kind: &'static str) -> Result<u64, ActionError> {
    let id = *next;
    *next = id
        .checked_add(1)
        .ok_or(ActionError::IdsExhausted(kind))?;
    Ok(id)
}
