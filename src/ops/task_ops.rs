use crate::model::list::TaskList;
use crate::model::task::{Priority, Subtask, TaskId};

/// Result of a model operation.
///
/// Validation failures (empty text, unknown id, nothing to clear) are not
/// errors: they come back as `Unchanged` and the caller skips save/render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The list was mutated
    Changed,
    /// A task was appended with this id
    Added(TaskId),
    /// Nothing to do
    Unchanged,
    /// An add was rejected because the list is full
    LimitReached,
}

impl Outcome {
    /// Whether the list needs to be saved and re-rendered
    pub fn is_change(self) -> bool {
        matches!(self, Outcome::Changed | Outcome::Added(_))
    }
}

fn changed_if(cond: bool) -> Outcome {
    if cond {
        Outcome::Changed
    } else {
        Outcome::Unchanged
    }
}

// ---------------------------------------------------------------------------
// Task CRUD
// ---------------------------------------------------------------------------

/// Append a new incomplete task.
///
/// The capacity check runs first, so a full list reports `LimitReached`
/// even for blank input.
pub fn add_task(list: &mut TaskList, text: &str, priority: Priority, max_tasks: usize) -> Outcome {
    if list.len() >= max_tasks {
        return Outcome::LimitReached;
    }
    let text = text.trim();
    if text.is_empty() {
        return Outcome::Unchanged;
    }
    Outcome::Added(list.push(text.to_string(), priority))
}

/// Flip the completed flag
pub fn toggle_complete(list: &mut TaskList, id: TaskId) -> Outcome {
    match list.get_mut(id) {
        Some(task) => {
            task.completed = !task.completed;
            Outcome::Changed
        }
        None => Outcome::Unchanged,
    }
}

pub fn delete_task(list: &mut TaskList, id: TaskId) -> Outcome {
    changed_if(list.remove(id).is_some())
}

/// Replace a task's text with the trimmed input, unless blank or identical
pub fn edit_text(list: &mut TaskList, id: TaskId, new_text: &str) -> Outcome {
    let new_text = new_text.trim();
    if new_text.is_empty() {
        return Outcome::Unchanged;
    }
    match list.get_mut(id) {
        Some(task) if task.text != new_text => {
            task.text = new_text.to_string();
            Outcome::Changed
        }
        _ => Outcome::Unchanged,
    }
}

/// Toggle priority: selecting the current priority again resets to `none`
pub fn set_priority(list: &mut TaskList, id: TaskId, priority: Priority) -> Outcome {
    match list.get_mut(id) {
        Some(task) => {
            let next = if task.priority == priority {
                Priority::None
            } else {
                priority
            };
            if next == task.priority {
                return Outcome::Unchanged;
            }
            task.priority = next;
            Outcome::Changed
        }
        None => Outcome::Unchanged,
    }
}

/// Remove every completed task in one batch
pub fn clear_completed(list: &mut TaskList) -> Outcome {
    changed_if(list.retain(|t| !t.completed) > 0)
}

// ---------------------------------------------------------------------------
// Notes and subtasks
// ---------------------------------------------------------------------------

/// Notes are stored exactly as given, whitespace included
pub fn set_notes(list: &mut TaskList, id: TaskId, notes: &str) -> Outcome {
    match list.get_mut(id) {
        Some(task) if task.notes != notes => {
            task.notes = notes.to_string();
            Outcome::Changed
        }
        _ => Outcome::Unchanged,
    }
}

pub fn add_subtask(list: &mut TaskList, id: TaskId, text: &str) -> Outcome {
    let text = text.trim();
    if text.is_empty() || list.get(id).is_none() {
        return Outcome::Unchanged;
    }
    let sub_id = list.next_subtask_id();
    match list.get_mut(id) {
        Some(task) => {
            task.subtasks.push(Subtask {
                id: sub_id,
                text: text.to_string(),
                completed: false,
            });
            Outcome::Changed
        }
        None => Outcome::Unchanged,
    }
}

pub fn toggle_subtask(list: &mut TaskList, id: TaskId, sub_index: usize) -> Outcome {
    match list.get_mut(id).and_then(|t| t.subtasks.get_mut(sub_index)) {
        Some(sub) => {
            sub.completed = !sub.completed;
            Outcome::Changed
        }
        None => Outcome::Unchanged,
    }
}

pub fn delete_subtask(list: &mut TaskList, id: TaskId, sub_index: usize) -> Outcome {
    match list.get_mut(id) {
        Some(task) if sub_index < task.subtasks.len() => {
            task.subtasks.remove(sub_index);
            Outcome::Changed
        }
        _ => Outcome::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use pretty_assertions::assert_eq;

    const MAX: usize = 12;

    fn list_of(texts: &[&str]) -> TaskList {
        let mut list = TaskList::new();
        for t in texts {
            add_task(&mut list, t, Priority::None, MAX);
        }
        list
    }

    fn display_texts(list: &TaskList) -> Vec<String> {
        list.display_order().iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn add_trims_and_appends_incomplete() {
        let mut list = TaskList::new();
        let outcome = add_task(&mut list, "  Buy milk  ", Priority::Low, MAX);
        let Outcome::Added(id) = outcome else {
            panic!("expected Added, got {:?}", outcome);
        };
        let task = list.get(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Low);
    }

    #[test]
    fn add_rejects_blank_text() {
        let mut list = TaskList::new();
        assert_eq!(add_task(&mut list, "   ", Priority::None, MAX), Outcome::Unchanged);
        assert_eq!(add_task(&mut list, "", Priority::None, MAX), Outcome::Unchanged);
        assert!(list.is_empty());
    }

    #[test]
    fn add_never_exceeds_limit() {
        let mut list = TaskList::new();
        for i in 0..3 {
            assert!(add_task(&mut list, &format!("t{}", i), Priority::None, 3).is_change());
        }
        let before = list.clone();
        assert_eq!(add_task(&mut list, "one more", Priority::None, 3), Outcome::LimitReached);
        assert_eq!(list, before);
        assert_eq!(add_task(&mut list, "  ", Priority::None, 3), Outcome::LimitReached);
    }

    #[test]
    fn toggle_complete_flips_and_ignores_unknown_id() {
        let mut list = list_of(&["a"]);
        let id = list.id_at(0).unwrap();
        assert_eq!(toggle_complete(&mut list, id), Outcome::Changed);
        assert!(list.get(id).unwrap().completed);
        assert_eq!(toggle_complete(&mut list, id), Outcome::Changed);
        assert!(!list.get(id).unwrap().completed);
        assert_eq!(toggle_complete(&mut list, TaskId(999)), Outcome::Unchanged);
    }

    #[test]
    fn delete_removes_task() {
        let mut list = list_of(&["a", "b", "c"]);
        let id = list.id_at(1).unwrap();
        assert_eq!(delete_task(&mut list, id), Outcome::Changed);
        assert_eq!(display_texts(&list), vec!["a", "c"]);
        assert_eq!(delete_task(&mut list, id), Outcome::Unchanged);
    }

    #[test]
    fn edit_text_whitespace_only_is_ignored() {
        let mut list = list_of(&["keep me"]);
        let id = list.id_at(0).unwrap();
        assert_eq!(edit_text(&mut list, id, "  "), Outcome::Unchanged);
        assert_eq!(list.get(id).unwrap().text, "keep me");
    }

    #[test]
    fn edit_text_same_value_is_unchanged() {
        let mut list = list_of(&["same"]);
        let id = list.id_at(0).unwrap();
        assert_eq!(edit_text(&mut list, id, " same "), Outcome::Unchanged);
        assert_eq!(edit_text(&mut list, id, "different"), Outcome::Changed);
        assert_eq!(list.get(id).unwrap().text, "different");
    }

    #[test]
    fn set_priority_twice_resets_to_none() {
        let mut list = list_of(&["a"]);
        let id = list.id_at(0).unwrap();
        assert_eq!(set_priority(&mut list, id, Priority::High), Outcome::Changed);
        assert_eq!(list.get(id).unwrap().priority, Priority::High);
        assert_eq!(set_priority(&mut list, id, Priority::High), Outcome::Changed);
        assert_eq!(list.get(id).unwrap().priority, Priority::None);
    }

    #[test]
    fn set_priority_switches_between_levels() {
        let mut list = list_of(&["a"]);
        let id = list.id_at(0).unwrap();
        set_priority(&mut list, id, Priority::Low);
        set_priority(&mut list, id, Priority::Medium);
        assert_eq!(list.get(id).unwrap().priority, Priority::Medium);
        // none on a none task toggles to none: nothing to do
        let mut other = list_of(&["b"]);
        let oid = other.id_at(0).unwrap();
        assert_eq!(set_priority(&mut other, oid, Priority::None), Outcome::Unchanged);
    }

    #[test]
    fn set_priority_resorts_display() {
        let mut list = list_of(&["a", "b", "c"]);
        let c = list.id_at(2).unwrap();
        set_priority(&mut list, c, Priority::High);
        assert_eq!(display_texts(&list), vec!["c", "a", "b"]);
    }

    #[test]
    fn clear_completed_removes_only_completed() {
        let done = |id: u64, text: &str| {
            let mut t = Task::new(TaskId(id), text.into(), Priority::None);
            t.completed = true;
            t
        };
        let mut list = TaskList::from_tasks(vec![
            done(1, "x"),
            Task::new(TaskId(2), "open".into(), Priority::None),
            done(3, "y"),
        ]);
        assert_eq!(clear_completed(&mut list), Outcome::Changed);
        assert_eq!(display_texts(&list), vec!["open"]);
        assert_eq!(clear_completed(&mut list), Outcome::Unchanged);
    }

    #[test]
    fn notes_set_and_clear() {
        let mut list = list_of(&["a"]);
        let id = list.id_at(0).unwrap();
        assert_eq!(set_notes(&mut list, id, "line one\nline two\n"), Outcome::Changed);
        assert_eq!(list.get(id).unwrap().notes, "line one\nline two\n");
        assert_eq!(set_notes(&mut list, id, "line one\nline two\n"), Outcome::Unchanged);
        // Trailing whitespace is part of the notes
        assert_eq!(set_notes(&mut list, id, "line one\nline two"), Outcome::Changed);
        assert_eq!(set_notes(&mut list, id, "  indented  "), Outcome::Changed);
        assert_eq!(list.get(id).unwrap().notes, "  indented  ");
        assert_eq!(set_notes(&mut list, id, ""), Outcome::Changed);
        assert!(list.get(id).unwrap().notes.is_empty());
    }

    #[test]
    fn subtasks_add_toggle_delete() {
        let mut list = list_of(&["trip"]);
        let id = list.id_at(0).unwrap();
        assert_eq!(add_subtask(&mut list, id, " tickets "), Outcome::Changed);
        assert_eq!(add_subtask(&mut list, id, "hotel"), Outcome::Changed);
        assert_eq!(add_subtask(&mut list, id, "  "), Outcome::Unchanged);

        let task = list.get(id).unwrap();
        assert_eq!(task.subtasks.len(), 2);
        assert_eq!(task.subtasks[0].text, "tickets");
        assert!(task.subtasks[0].id < task.subtasks[1].id);

        assert_eq!(toggle_subtask(&mut list, id, 1), Outcome::Changed);
        assert!(list.get(id).unwrap().subtasks[1].completed);
        assert_eq!(toggle_subtask(&mut list, id, 5), Outcome::Unchanged);

        assert_eq!(delete_subtask(&mut list, id, 0), Outcome::Changed);
        assert_eq!(list.get(id).unwrap().subtasks[0].text, "hotel");
        assert_eq!(delete_subtask(&mut list, id, 3), Outcome::Unchanged);
    }

    #[test]
    fn subtask_ops_on_unknown_task_are_noops() {
        let mut list = list_of(&["a"]);
        let ghost = TaskId(404);
        assert_eq!(add_subtask(&mut list, ghost, "x"), Outcome::Unchanged);
        assert_eq!(toggle_subtask(&mut list, ghost, 0), Outcome::Unchanged);
        assert_eq!(delete_subtask(&mut list, ghost, 0), Outcome::Unchanged);
        assert_eq!(set_notes(&mut list, ghost, "n"), Outcome::Unchanged);
    }

    #[test]
    fn reopening_returns_task_to_its_stored_slot() {
        let mut list = list_of(&["a", "b", "c"]);
        let a = list.id_at(0).unwrap();
        toggle_complete(&mut list, a);
        assert_eq!(display_texts(&list), vec!["b", "c", "a"]);
        toggle_complete(&mut list, a);
        assert_eq!(display_texts(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn completing_moves_task_to_bottom() {
        let mut list = list_of(&["a", "b", "c"]);
        let a = list.id_at(0).unwrap();
        toggle_complete(&mut list, a);
        insta::assert_debug_snapshot!(display_texts(&list), @r#"
        [
            "b",
            "c",
            "a",
        ]
        "#);
    }
}
