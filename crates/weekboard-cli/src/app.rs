//! Dispatch of parsed commands to the engine.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;
use weekboard_history::{Engine, Store, now_millis};
use weekboard_model::{Action, ActionError, CloudDrag, PlannerState, TaskId};

use crate::command::{Command, HELP};
use crate::view::{self, BoardView, CalendarView, HistoryView, OpenBoard};

/// Whether the input loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("no board is open (use `open <task>`)")]
    NoBoardOpen,

    #[error("no history entry {index} (history has {len} entries)")]
    InvalidIndex { index: usize, len: usize },

    #[error("nothing to undo")]
    NothingToUndo,
}

pub struct App<St> {
    engine: Engine<PlannerState, St>,
    open: OpenBoard,
}

impl<St: Store> App<St> {
    pub fn new(engine: Engine<PlannerState, St>) -> Self {
        Self {
            engine,
            open: Rc::new(Cell::new(None)),
        }
    }

    /// Attach the text views and draw them once.
    pub fn install_views(&mut self) {
        self.engine.add_renderer(CalendarView);
        self.engine.add_renderer(BoardView {
            open: Rc::clone(&self.open),
        });
        self.engine.add_renderer(HistoryView);
        self.engine.refresh();
    }

    pub fn engine(&self) -> &Engine<PlannerState, St> {
        &self.engine
    }

    pub fn open_board(&self) -> Option<TaskId> {
        self.open.get()
    }

    pub fn handle(&mut self, command: Command) -> Result<Flow, AppError> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => view::emit(HELP),
            Command::Open(task) => {
                if self.engine.effective_state().find_task(task).is_none() {
                    return Err(ActionError::TaskNotFound(task).into());
                }
                self.open.set(Some(task));
                self.engine.refresh();
            }
            Command::Close => {
                self.open.set(None);
                self.engine.refresh();
            }
            Command::History => view::emit(&view::history_list(&self.engine.frame())),
            Command::Preview(index) => {
                if !self.engine.enter_preview(index) {
                    return Err(self.invalid_index(index));
                }
            }
            Command::Exit => {
                self.engine.exit_preview();
            }
            Command::Rollback(index) => {
                if !self.engine.rollback(index) {
                    return Err(self.invalid_index(index));
                }
            }
            Command::Undo => {
                if !self.engine.undo() {
                    return Err(AppError::NothingToUndo);
                }
            }
            edit => {
                if let Some(action) = self.action_for(edit)? {
                    self.act(action)?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// The action an editing command stands for. `None` for commands that
    /// change nothing, such as a drag that ends where it started.
    fn action_for(&self, command: Command) -> Result<Option<Action>, AppError> {
        let action = match command {
            Command::Add { day, title } => Action::add_task(day, title, now_millis()),
            Command::Move { task, day } => Action::MoveTask { task, to: day },
            Command::Delete(task) => Action::DeleteTask { task },
            Command::Pin(task) => Action::TogglePin { task },
            Command::Sort(mode) => Action::SetSortMode(mode),
            Command::Clear => Action::ClearUnpinned,
            Command::Cloud => Action::AddCloud {
                task: self.require_board()?,
            },
            Command::Text { cloud, text } => Action::EditCloudText {
                task: self.require_board()?,
                cloud,
                text,
            },
            Command::Drag { cloud, dx, dy } => {
                let task = self.require_board()?;
                let zoom = self.engine.read().board(task).map_or(1.0, |b| b.zoom);
                let mut drag = CloudDrag::start(task, cloud, 0.0, 0.0);
                drag.update(dx, dy, zoom);
                return Ok(drag.finish());
            }
            Command::Group(clouds) => Action::GroupClouds {
                task: self.require_board()?,
                clouds,
            },
            Command::Ungroup(clouds) => Action::UngroupClouds {
                task: self.require_board()?,
                clouds,
            },
            Command::ZoomIn => Action::ZoomIn {
                task: self.require_board()?,
            },
            Command::ZoomOut => Action::ZoomOut {
                task: self.require_board()?,
            },
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    /// Record `action` as one history entry, or reject it without changes.
    fn act(&mut self, action: Action) -> Result<(), ActionError> {
        let description = action.describe(self.engine.read());
        let index = self
            .engine
            .try_commit(description, |state| action.apply(state))?;
        tracing::debug!("Action recorded as entry {index}");
        Ok(())
    }

    fn require_board(&self) -> Result<TaskId, AppError> {
        self.open.get().ok_or(AppError::NoBoardOpen)
    }

    fn invalid_index(&self, index: usize) -> AppError {
        AppError::InvalidIndex {
            index,
            len: self.engine.history().len(),
        }
    }
}
