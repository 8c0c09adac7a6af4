//! Weekly task board state.
//!
//! The state is a week of task lists plus one free-form annotation board per
//! task. It is the snapshot type recorded by `weekboard-history`: UI handlers
//! build an [`Action`], and submit it through `Engine::try_commit` so that a
//! rejected action leaves both the state and the history untouched.
//!
//! # Example
//!
//! ```
//! use weekboard_history::{Engine, EngineConfig, MemoryStore};
//! use weekboard_model::{Action, PlannerState, Weekday};
//!
//! let mut engine: Engine<PlannerState, _> =
//!     Engine::open(MemoryStore::new(), EngineConfig::default());
//!
//! let action = Action::add_task(Weekday::Monday, "Write report", 0);
//! let description = action.describe(engine.read());
//! engine.try_commit(description, |state| action.apply(state)).unwrap();
//!
//! assert_eq!(engine.read().tasks(Weekday::Monday).len(), 1);
//! ```

mod action;
mod board;
mod day;
mod error;
mod state;
mod task;

pub use action::Action;
pub use board::{Board, Cloud, CloudDrag, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
pub use day::{SortMode, Weekday};
pub use error::ActionError;
pub use state::PlannerState;
pub use task::Task;

/// Task identifier.
pub type TaskId = u64;

/// Annotation cloud identifier.
pub type CloudId = u64;

/// Cloud group identifier.
pub type GroupId = u64;
