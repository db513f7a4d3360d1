use serde::Serialize;

use crate::model::list::TaskList;
use crate::model::task::Priority;

/// Title shown when nothing is left to do
pub const IDLE_TITLE: &str = "NextTask";

/// Window/header title: `(3) Tasks Remaining`, or `NextTask` when all done
pub fn title(list: &TaskList) -> String {
    let remaining = list.remaining();
    if remaining == 0 {
        IDLE_TITLE.to_string()
    } else {
        format!(
            "({}) Task{} Remaining",
            remaining,
            if remaining == 1 { "" } else { "s" }
        )
    }
}

/// Task counts for status output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListStats {
    pub total: usize,
    pub remaining: usize,
    pub completed: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

pub fn stats(list: &TaskList) -> ListStats {
    let mut stats = ListStats {
        total: list.len(),
        ..Default::default()
    };
    for task in list.tasks() {
        if task.completed {
            stats.completed += 1;
            continue;
        }
        stats.remaining += 1;
        match task.priority {
            Priority::High => stats.high += 1,
            Priority::Medium => stats.medium += 1,
            Priority::Low => stats.low += 1,
            Priority::None => {}
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::task_ops::{add_task, set_priority, toggle_complete};

    #[test]
    fn title_counts_incomplete_tasks() {
        let mut list = TaskList::new();
        assert_eq!(title(&list), "NextTask");

        add_task(&mut list, "a", Priority::None, 12);
        assert_eq!(title(&list), "(1) Task Remaining");

        add_task(&mut list, "b", Priority::None, 12);
        assert_eq!(title(&list), "(2) Tasks Remaining");

        for id in list.display_ids() {
            toggle_complete(&mut list, id);
        }
        assert_eq!(title(&list), "NextTask");
    }

    #[test]
    fn stats_split_by_priority() {
        let mut list = TaskList::new();
        for t in ["a", "b", "c", "d"] {
            add_task(&mut list, t, Priority::None, 12);
        }
        let ids = list.display_ids();
        set_priority(&mut list, ids[0], Priority::High);
        set_priority(&mut list, ids[1], Priority::Low);
        toggle_complete(&mut list, ids[2]);

        assert_eq!(
            stats(&list),
            ListStats {
                total: 4,
                remaining: 3,
                completed: 1,
                high: 1,
                medium: 0,
                low: 1,
            }
        );
    }
}
