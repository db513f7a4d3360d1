use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::task::{Priority, Task, TaskId};

/// The ordered task sequence.
///
/// `tasks` is kept in storage order (insertion order, rewritten only by an
/// explicit reorder). The display order is a projection computed on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Task>", into = "Vec<Task>")]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
    last_subtask_id: i64,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList {
            tasks: Vec::new(),
            next_id: 1,
            last_subtask_id: 0,
        }
    }

    /// Build a list from stored records, assigning fresh ids to records whose
    /// id is missing (zero) or already taken by an earlier record. If stored
    /// ids leave no room above them, every task is renumbered from 1.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let last_subtask_id = tasks
            .iter()
            .flat_map(|t| t.subtasks.iter().map(|s| s.id))
            .max()
            .unwrap_or(0);
        let mut list = TaskList {
            tasks,
            next_id: 1,
            last_subtask_id,
        };
        if !list.repair_ids() {
            tracing::warn!("stored task ids out of range, renumbering");
            list.renumber();
        }
        list
    }

    /// Replace zero and repeated ids. Returns false when the id space above
    /// the highest stored id runs out.
    fn repair_ids(&mut self) -> bool {
        let highest = self.tasks.iter().map(|t| t.id.0).max().unwrap_or(0);
        let Some(mut next_id) = highest.checked_add(1) else {
            return false;
        };
        let mut seen = HashSet::new();
        for task in &mut self.tasks {
            if task.id.0 == 0 || !seen.insert(task.id) {
                task.id = TaskId(next_id);
                seen.insert(task.id);
                let Some(n) = next_id.checked_add(1) else {
                    return false;
                };
                next_id = n;
            }
        }
        self.next_id = next_id;
        true
    }

    /// Number tasks 1..=n in storage order
    fn renumber(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.id = TaskId(i as u64 + 1);
        }
        self.next_id = self.tasks.len() as u64 + 1;
    }

    /// Tasks in storage order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Number of incomplete tasks
    pub fn remaining(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Tasks in display order: incomplete first sorted by priority rank,
    /// then completed tasks. The sort is stable, so ties keep storage order.
    pub fn display_order(&self) -> Vec<&Task> {
        let mut view: Vec<&Task> = self.tasks.iter().collect();
        view.sort_by_key(|t| display_key(t));
        view
    }

    /// Ids in display order
    pub fn display_ids(&self) -> Vec<TaskId> {
        self.display_order().iter().map(|t| t.id).collect()
    }

    /// Resolve a 0-based display position to a task id
    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        self.display_order().get(index).map(|t| t.id)
    }

    /// Display position of a task id
    pub fn display_index_of(&self, id: TaskId) -> Option<usize> {
        self.display_order().iter().position(|t| t.id == id)
    }

    pub(crate) fn push(&mut self, text: String, priority: Priority) -> TaskId {
        if self.next_id == u64::MAX {
            tracing::warn!("task ids exhausted, renumbering");
            self.renumber();
        }
        let id = TaskId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.tasks.push(Task::new(id, text, priority));
        id
    }

    pub(crate) fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Keep only tasks matching the predicate; returns how many were removed
    pub(crate) fn retain(&mut self, f: impl FnMut(&Task) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(f);
        before - self.tasks.len()
    }

    /// Rewrite storage order to follow `order`. Ids not present in the list
    /// are skipped; tasks missing from `order` keep their place at the end.
    pub(crate) fn reorder(&mut self, order: &[TaskId]) {
        let mut remaining = std::mem::take(&mut self.tasks);
        let mut reordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(idx) = remaining.iter().position(|t| t.id == *id) {
                reordered.push(remaining.remove(idx));
            }
        }
        reordered.append(&mut remaining);
        self.tasks = reordered;
    }

    /// Next subtask id: the current wall-clock millisecond, bumped past the
    /// last id handed out so ids stay unique and increasing.
    pub(crate) fn next_subtask_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last_subtask_id + 1);
        self.last_subtask_id = id;
        id
    }
}

fn display_key(task: &Task) -> (bool, u8) {
    if task.completed {
        (true, 0)
    } else {
        (false, task.priority.rank())
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        TaskList::from_tasks(tasks)
    }
}

impl From<TaskList> for Vec<Task> {
    fn from(list: TaskList) -> Self {
        list.tasks
    }
}

// Id counters are bookkeeping; two lists are equal when their tasks are.
impl PartialEq for TaskList {
    fn eq(&self, other: &Self) -> bool {
        self.tasks == other.tasks
    }
}

impl Eq for TaskList {}
