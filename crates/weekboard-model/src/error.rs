//! Action error types.

use thiserror::Error;

use crate::{CloudId, TaskId, Weekday};

/// Reasons an action is rejected before it changes anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    /// Task title is empty after trimming.
    #[error("task title is empty")]
    EmptyTitle,

    /// No task with this id exists.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// No cloud with this id exists on the task's board.
    #[error("cloud {cloud} not found on board of task {task}")]
    CloudNotFound { task: TaskId, cloud: CloudId },

    /// Task is already on the target day.
    #[error("task {task} is already on {day}")]
    SameDay { task: TaskId, day: Weekday },

    /// Grouping needs at least two clouds.
    #[error("need at least two clouds to group, got {0}")]
    TooFewClouds(usize),

    /// No clouds were selected.
    #[error("no clouds selected")]
    NothingSelected,

    /// Cloud offset is NaN or infinite, or would move a cloud off any
    /// representable position.
    #[error("invalid cloud offset ({dx}, {dy})")]
    InvalidOffset { dx: f64, dy: f64 },

    /// An id counter reached its maximum.
    #[error("no {0} ids left")]
    IdsExhausted(&'static str),

    /// Zoom is already at its limit.
    #[error("zoom is already at {0:.1}")]
    ZoomLimit(f64),
}
