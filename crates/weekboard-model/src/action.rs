//! User actions on the board.
//!
//! Each action validates against the state it is applied to and either
//! changes it completely or returns an [`ActionError`] without side effects
//! that matter: actions are applied through `Engine::try_commit`, which
//! discards the scratch copy on error.

use crate::board::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::{ActionError, Cloud, CloudId, PlannerState, SortMode, Task, TaskId, Weekday};

/// Something a user did that changes the planner state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddTask {
        day: Weekday,
        title: String,
        created_at: u64,
    },
    MoveTask {
        task: TaskId,
        to: Weekday,
    },
    DeleteTask {
        task: TaskId,
    },
    TogglePin {
        task: TaskId,
    },
    SetSortMode(SortMode),
    /// Delete every task that is not pinned.
    ClearUnpinned,
    AddCloud {
        task: TaskId,
    },
    EditCloudText {
        task: TaskId,
        cloud: CloudId,
        text: String,
    },
    /// Move a cloud by a board-space offset, together with its group.
    MoveClouds {
        task: TaskId,
        cloud: CloudId,
        dx: f64,
        dy: f64,
    },
    GroupClouds {
        task: TaskId,
        clouds: Vec<CloudId>,
    },
    UngroupClouds {
        task: TaskId,
        clouds: Vec<CloudId>,
    },
    ZoomIn {
        task: TaskId,
    },
    ZoomOut {
        task: TaskId,
    },
}

impl Action {
    pub fn add_task(day: Weekday, title: impl Into<String>, created_at: u64) -> Self {
        Self::AddTask {
            day,
            title: title.into(),
            created_at,
        }
    }

    /// History description, resolved against the state before the action.
    pub fn describe(&self, state: &PlannerState) -> String {
        let title = |task: &TaskId| {
            state
                .find_task(*task)
                .map_or_else(|| format!("#{task}"), |(_, t)| format!("\"{}\"", t.title))
        };

        match self {
            Self::AddTask { day, title, .. } => {
                format!("Added task \"{}\" to {day}", title.trim())
            }
            Self::MoveTask { task, to } => match state.find_task(*task) {
                Some((from, _)) => format!("Moved task {} from {from} to {to}", title(task)),
                None => format!("Moved task {} to {to}", title(task)),
            },
            Self::DeleteTask { task } => format!("Deleted task {}", title(task)),
            Self::TogglePin { task } => format!("Toggled pin on {}", title(task)),
            Self::SetSortMode(mode) => format!("Changed sorting: {mode}"),
            Self::ClearUnpinned => "Deleted all unpinned tasks".to_owned(),
            Self::AddCloud { .. } => "Added text cloud".to_owned(),
            Self::EditCloudText { .. } => "Edited cloud text".to_owned(),
            Self::MoveClouds { .. } => "Moved cloud/group".to_owned(),
            Self::GroupClouds { .. } => "Grouped clouds".to_owned(),
            Self::UngroupClouds { .. } => "Ungrouped clouds".to_owned(),
            Self::ZoomIn { .. } => "Zoomed board in".to_owned(),
            Self::ZoomOut { .. } => "Zoomed board out".to_owned(),
        }
    }

    /// Apply this action to `state`.
    pub fn apply(self, state: &mut PlannerState) -> Result<(), ActionError> {
        match self {
            Self::AddTask {
                day,
                title,
                created_at,
            } => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(ActionError::EmptyTitle);
                }
                let id = state.allocate_task_id()?;
                state
                    .days
                    .entry(day)
                    .or_default()
                    .push(Task::new(id, title, created_at));
            }
            Self::MoveTask { task, to } => {
                let (from, _) = state.find_task(task).ok_or(ActionError::TaskNotFound(task))?;
                if from == to {
                    return Err(ActionError::SameDay { task, day: to });
                }
                let tasks = state.days.entry(from).or_default();
                let Some(index) = tasks.iter().position(|t| t.id == task) else {
                    return Err(ActionError::TaskNotFound(task));
                };
                let moved = tasks.remove(index);
                state.days.entry(to).or_default().push(moved);
            }
            Self::DeleteTask { task } => {
                state.find_task(task).ok_or(ActionError::TaskNotFound(task))?;
                for tasks in state.days.values_mut() {
                    tasks.retain(|t| t.id != task);
                }
                state.boards.remove(&task);
            }
            Self::TogglePin { task } => {
                let task = state
                    .find_task_mut(task)
                    .ok_or(ActionError::TaskNotFound(task))?;
                task.pinned = !task.pinned;
            }
            Self::SetSortMode(mode) => state.sort_mode = mode,
            Self::ClearUnpinned => {
                let mut removed = Vec::new();
                for tasks in state.days.values_mut() {
                    tasks.retain(|t| {
                        if !t.pinned {
                            removed.push(t.id);
                        }
                        t.pinned
                    });
                }
                for task in removed {
                    state.boards.remove(&task);
                }
            }
            Self::AddCloud { task } => {
                require_task(state, task)?;
                let id = state.allocate_cloud_id()?;
                state.ensure_board(task).clouds.push(Cloud::new(id));
            }
            Self::EditCloudText { task, cloud, text } => {
                cloud_mut(state, task, cloud)?.text = text;
            }
            Self::MoveClouds {
                task,
                cloud,
                dx,
                dy,
            } => {
                require_task(state, task)?;
                if !dx.is_finite() || !dy.is_finite() {
                    return Err(ActionError::InvalidOffset { dx, dy });
                }
                let board = state.ensure_board(task);
                if board.move_cloud(cloud, dx, dy) == 0 {
                    return Err(ActionError::CloudNotFound { task, cloud });
                }
                if !board.positions_finite() {
                    return Err(ActionError::InvalidOffset { dx, dy });
                }
            }
            Self::GroupClouds { task, clouds } => {
                require_task(state, task)?;
                let selected = existing(state, task, &clouds)?;
                if selected.len() < 2 {
                    return Err(ActionError::TooFewClouds(selected.len()));
                }
                let group = state.allocate_group_id()?;
                for cloud in &mut state.ensure_board(task).clouds {
                    if selected.contains(&cloud.id) {
                        cloud.group_id = Some(group);
                    }
                }
            }
            Self::UngroupClouds { task, clouds } => {
                require_task(state, task)?;
                let selected = existing(state, task, &clouds)?;
                if selected.is_empty() {
                    return Err(ActionError::NothingSelected);
                }
                for cloud in &mut state.ensure_board(task).clouds {
                    if selected.contains(&cloud.id) {
                        cloud.group_id = None;
                    }
                }
            }
            Self::ZoomIn { task } => zoom(state, task, ZOOM_STEP)?,
            Self::ZoomOut { task } => zoom(state, task, -ZOOM_STEP)?,
        }
        Ok(())
    }
}

fn require_task(state: &PlannerState, task: TaskId) -> Result<(), ActionError> {
    state
        .find_task(task)
        .map(|_| ())
        .ok_or(ActionError::TaskNotFound(task))
}

fn cloud_mut(
    state: &mut PlannerState,
    task: TaskId,
    cloud: CloudId,
) -> Result<&mut Cloud, ActionError> {
    require_task(state, task)?;
    state
        .ensure_board(task)
        .cloud_mut(cloud)
        .ok_or(ActionError::CloudNotFound { task, cloud })
}

/// Deduplicated subset of `clouds` present on the board. Errors on the first
/// id that does not exist.
fn existing(
    state: &PlannerState,
    task: TaskId,
    clouds: &[CloudId],
) -> Result<Vec<CloudId>, ActionError> {
    let mut selected = Vec::with_capacity(clouds.len());
    for &cloud in clouds {
        if state.board(task).and_then(|b| b.cloud(cloud)).is_none() {
            return Err(ActionError::CloudNotFound { task, cloud });
        }
        if !selected.contains(&cloud) {
            selected.push(cloud);
        }
    }
    Ok(selected)
}

fn zoom(state: &mut PlannerState, task: TaskId, step: f64) -> Result<(), ActionError> {
    require_task(state, task)?;
    let board = state.ensure_board(task);
    let zoom = (board.zoom + step).clamp(MIN_ZOOM, MAX_ZOOM);
    if (zoom - board.zoom).abs() < f64::EPSILON {
        return Err(ActionError::ZoomLimit(board.zoom));
    }
    // keep one decimal so repeated steps do not drift
    board.zoom = (zoom * 10.0).round() / 10.0;
    Ok(())
}
