use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a task, assigned when the task is created.
///
/// Positions in the display order shift on every re-sort; ids never do.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl Priority {
    /// All priorities, highest first
    pub const ALL: [Priority; 4] = [
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::None,
    ];

    /// Sort rank used by the display order (lower sorts first)
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::None => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::None => "none",
        }
    }

    /// Parse a priority name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Some(Priority::High),
            "medium" | "med" | "m" => Some(Priority::Medium),
            "low" | "l" => Some(Priority::Low),
            "none" | "" => Some(Priority::None),
            _ => None,
        }
    }

    /// Next priority in the compose-line cycle: none → high → medium → low → none
    pub fn cycle(self) -> Priority {
        match self {
            Priority::None => Priority::High,
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A nested checklist item under a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Millisecond timestamp id, unique within the list
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Missing in blobs written before ids existed; repaired on load
    #[serde(default)]
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(id: TaskId, text: String, priority: Priority) -> Self {
        Task {
            id,
            text,
            completed: false,
            priority,
            notes: String::new(),
            subtasks: Vec::new(),
        }
    }

    /// Count of completed subtasks and total subtasks
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_rank_orders_high_first() {
        let ranks: Vec<u8> = Priority::ALL.iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn priority_from_name() {
        assert_eq!(Priority::from_name("HIGH"), Some(Priority::High));
        assert_eq!(Priority::from_name("med"), Some(Priority::Medium));
        assert_eq!(Priority::from_name(" low "), Some(Priority::Low));
        assert_eq!(Priority::from_name("none"), Some(Priority::None));
        assert_eq!(Priority::from_name("urgent"), None);
    }

    #[test]
    fn priority_cycle_wraps() {
        let mut p = Priority::None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            p = p.cycle();
            seen.push(p);
        }
        assert_eq!(
            seen,
            vec![Priority::High, Priority::Medium, Priority::Low, Priority::None]
        );
    }

    #[test]
    fn legacy_record_deserializes_with_defaults() {
        // Blobs saved before priorities, notes, and ids existed
        let task: Task = serde_json::from_str(r#"{"text":"Buy milk","completed":true}"#).unwrap();
        assert_eq!(task.id, TaskId(0));
        assert_eq!(task.text, "Buy milk");
        assert!(task.completed);
        assert_eq!(task.priority, Priority::None);
        assert!(task.notes.is_empty());
        assert!(task.subtasks.is_empty());
    }

    #[test]
    fn empty_notes_and_subtasks_are_omitted() {
        let task = Task::new(TaskId(3), "Call".into(), Priority::Low);
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":3,"text":"Call","completed":false,"priority":"low"}"#
        );
    }

    #[test]
    fn subtask_progress_counts_completed() {
        let mut task = Task::new(TaskId(1), "Trip".into(), Priority::None);
        task.subtasks.push(Subtask {
            id: 1,
            text: "Tickets".into(),
            completed: true,
        });
        task.subtasks.push(Subtask {
            id: 2,
            text: "Hotel".into(),
            completed: false,
        });
        assert_eq!(task.subtask_progress(), (1, 2));
    }
}
