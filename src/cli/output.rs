use serde::Serialize;

use crate::model::list::TaskList;
use crate::model::task::{Priority, Subtask, Task, TaskId};
use crate::ops::summary::ListStats;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based display position
    pub position: usize,
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

#[derive(Serialize)]
pub struct StatusJson {
    pub title: String,
    #[serde(flatten)]
    pub stats: ListStats,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub theme: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(position: usize, task: &Task) -> TaskJson {
    TaskJson {
        position,
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
        priority: task.priority,
        notes: task.notes.clone(),
        subtasks: task.subtasks.clone(),
    }
}

pub fn list_to_json(list: &TaskList) -> Vec<TaskJson> {
    list.display_order()
        .into_iter()
        .enumerate()
        .map(|(i, t)| task_to_json(i + 1, t))
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "!!!",
        Priority::Medium => "!! ",
        Priority::Low => "!  ",
        Priority::None => "   ",
    }
}

/// One-line summary: `  3. [ ] !!  Book flights (1/2)`
pub fn format_task_line(position: usize, task: &Task) -> String {
    let progress = match task.subtask_progress() {
        (_, 0) => String::new(),
        (done, total) => format!(" ({}/{})", done, total),
    };
    format!(
        "{:>3}. {} {} {}{}",
        position,
        checkbox(task.completed),
        priority_marker(task.priority),
        task.text,
        progress
    )
}

/// Task line followed by indented notes and numbered subtasks
pub fn format_task_detail(position: usize, task: &Task) -> Vec<String> {
    let mut lines = vec![format_task_line(position, task)];
    for line in task.notes.lines() {
        lines.push(format!("        {}", line));
    }
    for (i, sub) in task.subtasks.iter().enumerate() {
        lines.push(format!(
            "        {}. {} {}",
            i + 1,
            checkbox(sub.completed),
            sub.text
        ));
    }
    lines
}

pub fn format_list(list: &TaskList) -> Vec<String> {
    list.display_order()
        .into_iter()
        .enumerate()
        .flat_map(|(i, t)| format_task_detail(i + 1, t))
        .collect()
}
