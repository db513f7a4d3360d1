use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::io::store::{self, KeyValueStore, StoreError};
use crate::model::config::AppConfig;
use crate::model::list::TaskList;
use crate::model::preferences::ThemePreference;
use crate::model::task::{Priority, TaskId};
use crate::ops::reorder;
use crate::ops::task_ops::{self, Outcome};

use super::command::Command;
use super::notice::{self, Notice};

/// Everything the front end renders from
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tasks: TaskList,
    pub theme: ThemePreference,
    /// Priority preselected for the next added task
    pub new_task_priority: Option<Priority>,
    pub notice: Option<Notice>,
}

/// What kind of multi-keystroke operation is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Compose,
    EditText(TaskId),
    EditNotes(TaskId),
    AddSubtask(TaskId),
}

/// Proof that a pending operation is open. Not `Clone`: handing it back to
/// [`Controller::finish`] consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingToken {
    serial: u64,
    kind: PendingKind,
}

impl PendingToken {
    pub fn kind(&self) -> PendingKind {
        self.kind
    }
}

/// Which store key a command dirtied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persist {
    Nothing,
    Tasks,
    Theme,
}

/// Single owner of the application state.
///
/// Front ends enqueue commands; `drain` applies them in order, saving after
/// each mutation and flagging a re-render. While a pending operation is open
/// (the user is mid-edit), reloads from disk are held back and applied when
/// the operation finishes.
pub struct Controller<S: KeyValueStore> {
    store: S,
    state: AppState,
    queue: VecDeque<Command>,
    pending: Option<(u64, PendingKind)>,
    next_serial: u64,
    reload_deferred: bool,
    max_tasks: usize,
    notice_lifetime: Duration,
    needs_render: bool,
    /// Most recent failed save, until a front end collects it
    save_error: Option<StoreError>,
}

impl<S: KeyValueStore> Controller<S> {
    /// Load state from the store. Load failures degrade to an empty list.
    pub fn new(store: S, config: &AppConfig) -> Self {
        let tasks = store::load_tasks(&store);
        let theme = store::load_theme(&store);
        tracing::debug!(tasks = tasks.len(), theme = %theme, "loaded state");
        Controller {
            store,
            state: AppState {
                tasks,
                theme,
                ..Default::default()
            },
            queue: VecDeque::new(),
            pending: None,
            next_serial: 1,
            reload_deferred: false,
            max_tasks: config.tasks.max_tasks,
            notice_lifetime: config.ui.notice_duration(),
            needs_render: true,
            save_error: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn tasks(&self) -> &TaskList {
        &self.state.tasks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_tasks(&self) -> usize {
        self.max_tasks
    }

    /// Resolve a display position to the id of the task shown there
    pub fn resolve(&self, display_index: usize) -> Option<TaskId> {
        self.state.tasks.id_at(display_index)
    }

    pub fn enqueue(&mut self, cmd: Command) {
        self.queue.push_back(cmd);
    }

    /// Enqueue and drain, returning the outcome of `cmd`
    pub fn dispatch(&mut self, cmd: Command) -> Outcome {
        self.enqueue(cmd);
        self.drain().pop().unwrap_or(Outcome::Unchanged)
    }

    /// Apply queued commands one at a time, in order. A reload held back by
    /// a finished pending operation runs after everything queued before it.
    pub fn drain(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(self.queue.len());
        loop {
            let Some(cmd) = self.queue.pop_front() else {
                if self.reload_deferred && self.pending.is_none() {
                    self.reload_deferred = false;
                    self.request_reload();
                    if !self.queue.is_empty() {
                        continue;
                    }
                }
                break;
            };
            let (outcome, persist) = self.apply(cmd);
            match persist {
                Persist::Tasks => self.save_tasks(),
                Persist::Theme => self.save_theme(),
                Persist::Nothing => {}
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    fn apply(&mut self, cmd: Command) -> (Outcome, Persist) {
        if cmd.is_reload() && self.pending.is_some() {
            // The snapshot may predate the edit's own save; re-read later
            tracing::debug!("edit in progress, deferring reload");
            self.reload_deferred = true;
            return (Outcome::Unchanged, Persist::Nothing);
        }

        let tasks = &mut self.state.tasks;
        let outcome = match cmd {
            Command::Add { text, priority } => {
                let priority = priority
                    .or(self.state.new_task_priority)
                    .unwrap_or_default();
                let outcome = task_ops::add_task(tasks, &text, priority, self.max_tasks);
                match outcome {
                    Outcome::LimitReached => {
                        tracing::info!(max = self.max_tasks, "task limit reached");
                        self.state.notice = Some(Notice::new(
                            notice::limit_reached_text(self.max_tasks),
                            self.notice_lifetime,
                        ));
                        self.needs_render = true;
                    }
                    Outcome::Added(_) => self.state.new_task_priority = None,
                    _ => {}
                }
                outcome
            }
            Command::SetNewTaskPriority(priority) => {
                if self.state.new_task_priority == priority {
                    return (Outcome::Unchanged, Persist::Nothing);
                }
                self.state.new_task_priority = priority;
                self.needs_render = true;
                return (Outcome::Changed, Persist::Nothing);
            }
            Command::ToggleComplete(id) => task_ops::toggle_complete(tasks, id),
            Command::Delete(id) => task_ops::delete_task(tasks, id),
            Command::EditText(id, text) => task_ops::edit_text(tasks, id, &text),
            Command::SetPriority(id, priority) => task_ops::set_priority(tasks, id, priority),
            Command::ClearCompleted => task_ops::clear_completed(tasks),
            Command::SetNotes(id, notes) => task_ops::set_notes(tasks, id, &notes),
            Command::AddSubtask(id, text) => task_ops::add_subtask(tasks, id, &text),
            Command::ToggleSubtask(id, sub) => task_ops::toggle_subtask(tasks, id, sub),
            Command::DeleteSubtask(id, sub) => task_ops::delete_subtask(tasks, id, sub),
            Command::Move {
                source,
                target,
                position,
            } => match (tasks.display_index_of(source), tasks.display_index_of(target)) {
                (Some(s), Some(t)) => reorder::move_task(tasks, s, t, position),
                _ => Outcome::Unchanged,
            },
            Command::SetTheme(theme) => return self.apply_theme(theme),
            Command::ToggleTheme => {
                let theme = self.state.theme.toggle();
                return self.apply_theme(theme);
            }
            Command::Reload { tasks: loaded, theme } => {
                let mut outcome = Outcome::Unchanged;
                if *tasks != loaded {
                    *tasks = loaded;
                    outcome = Outcome::Changed;
                }
                if self.state.theme != theme {
                    self.state.theme = theme;
                    outcome = Outcome::Changed;
                }
                if outcome.is_change() {
                    tracing::debug!("reloaded state changed on disk");
                    self.needs_render = true;
                }
                // Came from the store; writing it back would be redundant
                return (outcome, Persist::Nothing);
            }
        };

        if outcome.is_change() {
            self.needs_render = true;
            (outcome, Persist::Tasks)
        } else {
            (outcome, Persist::Nothing)
        }
    }

    fn apply_theme(&mut self, theme: ThemePreference) -> (Outcome, Persist) {
        if self.state.theme == theme {
            return (Outcome::Unchanged, Persist::Nothing);
        }
        self.state.theme = theme;
        self.needs_render = true;
        (Outcome::Changed, Persist::Theme)
    }

    // A failed write is logged, shown as a notice, and kept for
    // `take_save_error`; the in-memory state stays authoritative.
    fn save_tasks(&mut self) {
        if let Err(e) = store::save_tasks(&mut self.store, &self.state.tasks) {
            tracing::warn!(error = %e, "could not save task list");
            self.record_save_error(e);
        }
    }

    fn save_theme(&mut self) {
        if let Err(e) = store::save_theme(&mut self.store, self.state.theme) {
            tracing::warn!(error = %e, "could not save theme preference");
            self.record_save_error(e);
        }
    }

    fn record_save_error(&mut self, e: StoreError) {
        self.state.notice = Some(Notice::new(notice::SAVE_FAILED_TEXT, self.notice_lifetime));
        self.needs_render = true;
        self.save_error = Some(e);
    }

    /// The last save failure since the previous call, if any
    pub fn take_save_error(&mut self) -> Option<StoreError> {
        self.save_error.take()
    }

    /// Queue a reload from the store, or hold it back while an edit is open.
    /// Unreadable or malformed contents are skipped so a bad external write
    /// never wipes the list in memory.
    pub fn request_reload(&mut self) {
        if self.pending.is_some() {
            self.reload_deferred = true;
            return;
        }
        let tasks = match store::try_load_tasks(&self.store) {
            Ok(tasks) => tasks.unwrap_or_else(TaskList::new),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable store change");
                return;
            }
        };
        let theme = store::load_theme(&self.store);
        self.enqueue(Command::Reload { tasks, theme });
    }

    // ---------------------------------------------------------------------
    // Pending operations
    // ---------------------------------------------------------------------

    /// Open a pending operation. Opening a new one supersedes any previous
    /// token, which then finishes as a no-op.
    pub fn begin(&mut self, kind: PendingKind) -> PendingToken {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.pending = Some((serial, kind));
        PendingToken { serial, kind }
    }

    /// Close a pending operation. A reload held back meanwhile runs at the
    /// end of the next `drain`.
    pub fn finish(&mut self, token: PendingToken) {
        match self.pending {
            Some((serial, _)) if serial == token.serial => self.pending = None,
            _ => tracing::debug!(kind = ?token.kind, "stale pending token ignored"),
        }
    }

    pub fn pending(&self) -> Option<PendingKind> {
        self.pending.map(|(_, kind)| kind)
    }

    // ---------------------------------------------------------------------
    // Rendering bookkeeping
    // ---------------------------------------------------------------------

    /// Drop the notice once its lifetime has passed
    pub fn expire_notice(&mut self, now: Instant) {
        if self
            .state
            .notice
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.state.notice = None;
            self.needs_render = true;
        }
    }

    pub fn dismiss_notice(&mut self) {
        if self.state.notice.take().is_some() {
            self.needs_render = true;
        }
    }

    /// Whether state changed since the last call
    pub fn take_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::{MemoryStore, StoreError, TASKS_KEY};
    use crate::ops::reorder::DropPosition;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn controller() -> Controller<MemoryStore> {
        Controller::new(MemoryStore::new(), &AppConfig::default())
    }

    fn with_tasks(texts: &[&str]) -> Controller<MemoryStore> {
        let mut c = controller();
        for t in texts {
            c.enqueue(Command::Add {
                text: t.to_string(),
                priority: None,
            });
        }
        c.drain();
        c
    }

    fn texts<S: KeyValueStore>(c: &Controller<S>) -> Vec<String> {
        c.tasks()
            .display_order()
            .iter()
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn every_mutation_saves_full_list() {
        let mut c = with_tasks(&["a", "b"]);
        assert_eq!(c.store().writes(), 2);
        let id = c.resolve(0).unwrap();
        c.dispatch(Command::ToggleComplete(id));
        assert_eq!(c.store().writes(), 3);
        assert_eq!(store::load_tasks(c.store()), *c.tasks());
    }

    #[test]
    fn noops_do_not_save_or_render() {
        let mut c = with_tasks(&["a"]);
        c.take_render();
        let writes = c.store().writes();

        assert_eq!(c.dispatch(Command::ClearCompleted), Outcome::Unchanged);
        assert_eq!(
            c.dispatch(Command::EditText(c.resolve(0).unwrap(), "   ".into())),
            Outcome::Unchanged
        );
        assert_eq!(c.dispatch(Command::Delete(TaskId(999))), Outcome::Unchanged);

        assert_eq!(c.store().writes(), writes);
        assert!(!c.take_render());
    }

    #[test]
    fn commands_drain_in_order() {
        let mut c = with_tasks(&["a", "b", "c"]);
        let a = c.resolve(0).unwrap();
        let c_id = c.resolve(2).unwrap();
        c.enqueue(Command::SetPriority(c_id, Priority::High));
        // Enqueued against ids, so the re-sort from the first command
        // cannot retarget the second
        c.enqueue(Command::ToggleComplete(a));
        let outcomes = c.drain();
        assert_eq!(outcomes, vec![Outcome::Changed, Outcome::Changed]);
        assert_eq!(texts(&c), vec!["c", "b", "a"]);
    }

    #[test]
    fn limit_reached_sets_notice_and_leaves_list() {
        let config = AppConfig {
            tasks: crate::model::config::TasksConfig { max_tasks: 2 },
            ..Default::default()
        };
        let mut c = Controller::new(MemoryStore::new(), &config);
        for t in ["a", "b"] {
            c.dispatch(Command::Add {
                text: t.into(),
                priority: None,
            });
        }
        let writes = c.store().writes();
        let outcome = c.dispatch(Command::Add {
            text: "c".into(),
            priority: None,
        });
        assert_eq!(outcome, Outcome::LimitReached);
        assert_eq!(c.tasks().len(), 2);
        assert_eq!(c.store().writes(), writes);
        let notice = c.state().notice.as_ref().unwrap();
        assert_eq!(notice.text, "Task limit reached (max 2)");
        assert_eq!(notice.lifetime, Duration::from_millis(3000));
    }

    #[test]
    fn notice_expires() {
        let config = AppConfig {
            tasks: crate::model::config::TasksConfig { max_tasks: 0 },
            ..Default::default()
        };
        let mut c = Controller::new(MemoryStore::new(), &config);
        c.dispatch(Command::Add {
            text: "x".into(),
            priority: None,
        });
        let shown = c.state().notice.as_ref().unwrap().shown_at;
        c.expire_notice(shown + Duration::from_millis(100));
        assert!(c.state().notice.is_some());
        c.expire_notice(shown + Duration::from_millis(3000));
        assert!(c.state().notice.is_none());
    }

    #[test]
    fn add_uses_and_clears_new_task_priority() {
        let mut c = controller();
        c.dispatch(Command::SetNewTaskPriority(Some(Priority::Medium)));
        assert_eq!(c.state().new_task_priority, Some(Priority::Medium));

        // A rejected add keeps the selection
        c.dispatch(Command::Add {
            text: "  ".into(),
            priority: None,
        });
        assert_eq!(c.state().new_task_priority, Some(Priority::Medium));

        let Outcome::Added(id) = c.dispatch(Command::Add {
            text: "report".into(),
            priority: None,
        }) else {
            panic!("expected add");
        };
        assert_eq!(c.tasks().get(id).unwrap().priority, Priority::Medium);
        assert_eq!(c.state().new_task_priority, None);
    }

    #[test]
    fn explicit_priority_wins_over_selection() {
        let mut c = controller();
        c.dispatch(Command::SetNewTaskPriority(Some(Priority::Low)));
        let Outcome::Added(id) = c.dispatch(Command::Add {
            text: "x".into(),
            priority: Some(Priority::High),
        }) else {
            panic!("expected add");
        };
        assert_eq!(c.tasks().get(id).unwrap().priority, Priority::High);
    }

    #[test]
    fn move_by_id_uses_current_display_positions() {
        let mut c = with_tasks(&["A", "B", "C", "D"]);
        let a = c.resolve(0).unwrap();
        let cc = c.resolve(2).unwrap();
        c.dispatch(Command::Move {
            source: a,
            target: cc,
            position: DropPosition::Below,
        });
        assert_eq!(texts(&c), vec!["B", "C", "A", "D"]);
        assert_eq!(store::load_tasks(c.store()), *c.tasks());
    }

    #[test]
    fn theme_toggle_persists_under_theme_key() {
        let mut c = controller();
        assert_eq!(c.state().theme, ThemePreference::Light);
        c.dispatch(Command::ToggleTheme);
        assert_eq!(c.state().theme, ThemePreference::Dark);
        assert_eq!(store::load_theme(c.store()), ThemePreference::Dark);
        // Setting the same theme again writes nothing
        let writes = c.store().writes();
        c.dispatch(Command::SetTheme(ThemePreference::Dark));
        assert_eq!(c.store().writes(), writes);
    }

    /// Simulate another process writing the store
    fn write_externally(c: &mut Controller<MemoryStore>, tasks: &TaskList, theme: ThemePreference) {
        store::save_tasks(&mut c.store, tasks).unwrap();
        store::save_theme(&mut c.store, theme).unwrap();
    }

    #[test]
    fn reload_is_deferred_while_editing() {
        let mut c = with_tasks(&["a"]);
        let token = c.begin(PendingKind::Compose);

        let mut external = c.tasks().clone();
        task_ops::add_task(&mut external, "from cli", Priority::None, 12);
        write_externally(&mut c, &external, ThemePreference::Dark);

        c.request_reload();
        assert!(c.drain().is_empty());
        assert_eq!(c.tasks().len(), 1);

        c.finish(token);
        assert_eq!(c.drain(), vec![Outcome::Changed]);
        assert_eq!(c.pending(), None);
        assert_eq!(c.tasks(), &external);
        assert_eq!(c.state().theme, ThemePreference::Dark);
    }

    #[test]
    fn deferred_reload_reads_store_after_the_edit_saves() {
        let mut c = with_tasks(&["a"]);
        let id = c.resolve(0).unwrap();
        let token = c.begin(PendingKind::EditText(id));

        // A stale snapshot arrives mid-edit
        c.enqueue(Command::Reload {
            tasks: TaskList::new(),
            theme: ThemePreference::Light,
        });
        assert_eq!(c.drain(), vec![Outcome::Unchanged]);

        c.enqueue(Command::EditText(id, "edited".into()));
        c.finish(token);
        c.drain();
        // The edit survives: the reload re-read what the edit saved
        assert_eq!(texts(&c), vec!["edited"]);
    }

    #[test]
    fn stale_token_does_not_release_reload() {
        let mut c = with_tasks(&["a"]);
        let first = c.begin(PendingKind::Compose);
        let second = c.begin(PendingKind::Compose);
        write_externally(&mut c, &TaskList::new(), ThemePreference::Dark);
        c.request_reload();
        c.drain();

        c.finish(first);
        assert_eq!(c.pending(), Some(PendingKind::Compose));
        assert!(c.drain().is_empty());
        assert_eq!(c.tasks().len(), 1);

        c.finish(second);
        c.drain();
        assert!(c.tasks().is_empty());
        assert_eq!(c.state().theme, ThemePreference::Dark);
    }

    #[test]
    fn reload_does_not_write_back() {
        let mut c = with_tasks(&["a"]);
        let writes = c.store().writes();
        c.enqueue(Command::Reload {
            tasks: TaskList::new(),
            theme: ThemePreference::Light,
        });
        assert_eq!(c.drain(), vec![Outcome::Changed]);
        assert_eq!(c.store().writes(), writes);
    }

    #[test]
    fn request_reload_skips_malformed_store() {
        let mut c = with_tasks(&["a"]);
        c.store.set(TASKS_KEY, Value::String("garbage".into())).unwrap();
        c.request_reload();
        assert!(c.drain().is_empty());
        assert_eq!(c.tasks().len(), 1);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::ReadError {
                path: "/nowhere".into(),
                source: std::io::Error::other("disk on fire"),
            })
        }

        fn set(&mut self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::WriteError {
                path: "/nowhere".into(),
                source: std::io::Error::other("disk on fire"),
            })
        }
    }

    #[test]
    fn store_failures_degrade_to_usable_empty_list() {
        let mut c = Controller::new(FailingStore, &AppConfig::default());
        assert!(c.tasks().is_empty());
        assert_eq!(c.state().theme, ThemePreference::Light);

        let outcome = c.dispatch(Command::Add {
            text: "still works".into(),
            priority: None,
        });
        assert!(outcome.is_change());
        assert_eq!(texts(&c), vec!["still works"]);
    }

    #[test]
    fn failed_save_is_reported_once() {
        let mut c = Controller::new(FailingStore, &AppConfig::default());
        assert!(c.take_save_error().is_none());

        c.dispatch(Command::ToggleTheme);
        assert!(matches!(c.take_save_error(), Some(StoreError::WriteError { .. })));
        assert_eq!(
            c.state().notice.as_ref().map(|n| n.text.as_str()),
            Some(notice::SAVE_FAILED_TEXT)
        );
        assert!(c.take_save_error().is_none());

        // Reads and no-ops don't touch the store
        c.dispatch(Command::ClearCompleted);
        assert!(c.take_save_error().is_none());
    }
}
