use crate::model::list::TaskList;
use crate::model::preferences::ThemePreference;
use crate::model::task::{Priority, TaskId};
use crate::ops::reorder::DropPosition;

/// A user intent, queued and applied one at a time by the controller.
///
/// Commands name tasks by id. Front ends resolve the display position the
/// user pointed at into an id when the command is created, so a re-sort
/// between then and execution cannot retarget it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task. `None` uses the pending new-task priority.
    Add {
        text: String,
        priority: Option<Priority>,
    },
    /// Set or clear the priority preselected for the next added task
    SetNewTaskPriority(Option<Priority>),
    ToggleComplete(TaskId),
    Delete(TaskId),
    EditText(TaskId, String),
    SetPriority(TaskId, Priority),
    ClearCompleted,
    SetNotes(TaskId, String),
    AddSubtask(TaskId, String),
    ToggleSubtask(TaskId, usize),
    DeleteSubtask(TaskId, usize),
    /// Drag `source` onto `target`, landing on the given side of it
    Move {
        source: TaskId,
        target: TaskId,
        position: DropPosition,
    },
    SetTheme(ThemePreference),
    ToggleTheme,
    /// Replace list and theme with what another process wrote to the store
    Reload {
        tasks: TaskList,
        theme: ThemePreference,
    },
}

impl Command {
    /// Whether this command came from outside the user's own gestures
    pub fn is_reload(&self) -> bool {
        matches!(self, Command::Reload { .. })
    }
}
