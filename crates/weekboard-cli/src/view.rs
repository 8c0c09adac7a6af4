//! Text renderers for the calendar, the open board and the history panel.

use std::cell::Cell;
use std::rc::Rc;

use weekboard_history::{Frame, HistoryEntry, Render};
use weekboard_model::{PlannerState, TaskId, Weekday};

/// Task whose board is shown, shared between the app and [`BoardView`].
pub type OpenBoard = Rc<Cell<Option<TaskId>>>;

#[allow(clippy::print_stdout)]
pub(crate) fn emit(text: &str) {
    print!("{text}");
}

/// Week columns with tasks in display order.
pub fn calendar(state: &PlannerState) -> String {
    let mut out = String::new();
    for day in Weekday::ALL {
        let tasks = state.sorted_tasks(day);
        out.push_str(&format!("{day}:\n"));
        if tasks.is_empty() {
            out.push_str("    -\n");
        }
        for task in tasks {
            let pin = if task.pinned { "*" } else { " " };
            out.push_str(&format!("  {pin} [{}] {}\n", task.id, task.title));
        }
    }
    out
}

/// The clouds of `task`'s board, or `None` if the task does not exist.
pub fn board(state: &PlannerState, task: TaskId) -> Option<String> {
    let (_, info) = state.find_task(task)?;
    let mut out = String::new();
    let (zoom, clouds) = state
        .board(task)
        .map_or((1.0, &[][..]), |b| (b.zoom, b.clouds.as_slice()));

    out.push_str(&format!(
        "Board: {} (zoom {:.0}%)\n",
        info.title,
        zoom * 100.0
    ));
    if clouds.is_empty() {
        out.push_str("  (no clouds)\n");
    }
    for cloud in clouds {
        let group = cloud
            .group_id
            .map_or_else(String::new, |g| format!(" group {g}"));
        out.push_str(&format!(
            "  cloud {} at ({:.0}, {:.0}){group}: {}\n",
            cloud.id, cloud.x, cloud.y, cloud.text
        ));
    }
    Some(out)
}

/// Every entry with its index and time; the active one is marked.
pub fn history_list(frame: &Frame<'_, PlannerState>) -> String {
    let mut out = String::new();
    for (index, entry) in frame.entries().iter().enumerate() {
        let marker = if index == frame.active_index() { ">" } else { " " };
        out.push_str(&format!(
            "{marker} {index:>3}  {}  {}\n",
            clock(entry),
            entry.description()
        ));
    }
    out
}

/// One-line summary plus the preview banner when previewing.
pub fn history_status(frame: &Frame<'_, PlannerState>) -> String {
    match frame.preview_index() {
        Some(index) => {
            let description = frame
                .entries()
                .get(index)
                .map_or("", HistoryEntry::description);
            format!(
                "PREVIEW {index}/{}: {description} (`exit` to leave, `rollback {index}` to keep)\n",
                frame.entries().len() - 1
            )
        }
        None => format!(
            "history: entry {} of {}\n",
            frame.cursor(),
            frame.entries().len() - 1
        ),
    }
}

/// UTC wall-clock time of an entry.
fn clock(entry: &HistoryEntry<PlannerState>) -> String {
    let secs = entry.timestamp() / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600 % 24,
        secs / 60 % 60,
        secs % 60
    )
}

pub struct CalendarView;

impl Render<PlannerState> for CalendarView {
    fn render(&mut self, frame: &Frame<'_, PlannerState>) {
        emit(&calendar(frame.effective()));
    }
}

pub struct BoardView {
    pub open: OpenBoard,
}

impl Render<PlannerState> for BoardView {
    fn render(&mut self, frame: &Frame<'_, PlannerState>) {
        let Some(task) = self.open.get() else {
            return;
        };
        match board(frame.effective(), task) {
            Some(text) => emit(&text),
            // the task is gone from what is shown; leave the board
            None if frame.preview_index().is_none() => {
                self.open.set(None);
                emit("(board closed)\n");
            }
            None => emit("(task not present in this entry)\n"),
        }
    }
}

pub struct HistoryView;

impl Render<PlannerState> for HistoryView {
    fn render(&mut self, frame: &Frame<'_, PlannerState>) {
        emit(&history_status(frame));
    }
}
