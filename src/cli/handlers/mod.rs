use std::path::{Path, PathBuf};

use crate::app::{Command, Controller};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, Paths};
use crate::io::store::JsonFileStore;
use crate::model::config::AppConfig;
use crate::model::preferences::ThemePreference;
use crate::model::task::{Priority, TaskId};
use crate::ops::reorder::DropPosition;
use crate::ops::summary;
use crate::ops::task_ops::Outcome;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Config plus a controller over the store file
pub struct Session {
    pub config: AppConfig,
    pub controller: Controller<JsonFileStore>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let Some(cmd) = cli.command else {
        return Err("no command given (run `nt` without arguments for the TUI)".into());
    };

    // Config commands don't need the store
    if let Commands::Config(args) = cmd {
        let config_path = config_path(cli.config.as_deref());
        return cmd_config(args, &config_path, json);
    }

    let mut session = open_session(cli.config.as_deref(), cli.store.as_deref())?;
    let c = &mut session.controller;

    match cmd {
        Commands::List => cmd_list(c, json),
        Commands::Status => cmd_status(c, json),
        Commands::Theme(args) => cmd_theme(c, args, json),

        Commands::Add(args) => cmd_add(c, args),
        Commands::Done(args) => {
            let id = resolve(c, args.pos)?;
            apply(c, Command::ToggleComplete(id), args.pos)?;
            let done = c.tasks().get(id).is_some_and(|t| t.completed);
            println!("{}", if done { "completed" } else { "reopened" });
            Ok(())
        }
        Commands::Rm(args) => {
            let id = resolve(c, args.pos)?;
            let text = task_text(c, id);
            apply(c, Command::Delete(id), args.pos)?;
            println!("deleted: {}", text);
            Ok(())
        }
        Commands::Edit(args) => {
            let id = resolve(c, args.pos)?;
            apply(c, Command::EditText(id, args.text), args.pos)?;
            println!("updated: {}", task_text(c, id));
            Ok(())
        }
        Commands::Priority(args) => cmd_priority(c, args),
        Commands::Clear => {
            let before = c.tasks().len();
            run(c, Command::ClearCompleted)?;
            println!("cleared {} completed", before - c.tasks().len());
            Ok(())
        }
        Commands::Note(args) => {
            let id = resolve(c, args.pos)?;
            apply(c, Command::SetNotes(id, args.text), args.pos)?;
            println!("notes updated");
            Ok(())
        }
        Commands::Sub(args) => cmd_sub(c, args),
        Commands::Mv(args) => cmd_mv(c, args),
        Commands::Config(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_path(overridden: Option<&str>) -> PathBuf {
    overridden
        .map(PathBuf::from)
        .unwrap_or_else(|| Paths::from_env().config_file)
}

/// Resolve paths, read config, and open the store
pub fn open_session(config: Option<&str>, store: Option<&str>) -> Result<Session, config_io::ConfigError> {
    let paths = Paths::from_env();
    let config_path = config_path(config);
    let app_config = config_io::read_config(&config_path)?;
    let store_path = paths.store_file(&app_config, store.map(Path::new));
    tracing::debug!(store = %store_path.display(), "opening store");
    let controller = Controller::new(JsonFileStore::new(store_path), &app_config);
    Ok(Session {
        config: app_config,
        controller,
    })
}

/// Map a 1-based display position to a task id
fn resolve(c: &Controller<JsonFileStore>, pos: usize) -> Result<TaskId, String> {
    pos.checked_sub(1)
        .and_then(|i| c.resolve(i))
        .ok_or_else(|| format!("no task at position {} (list has {})", pos, c.tasks().len()))
}

fn task_text(c: &Controller<JsonFileStore>, id: TaskId) -> String {
    c.tasks()
        .get(id)
        .map(|t| t.text.clone())
        .unwrap_or_default()
}

/// Dispatch a command; a save that failed is reported as an error
fn run(c: &mut Controller<JsonFileStore>, cmd: Command) -> Result<Outcome, Box<dyn std::error::Error>> {
    let outcome = c.dispatch(cmd);
    match c.take_save_error() {
        Some(e) => Err(e.into()),
        None => Ok(outcome),
    }
}

/// Dispatch a command against a task; a no-op is reported as an error
fn apply(c: &mut Controller<JsonFileStore>, cmd: Command, pos: usize) -> CmdResult {
    match run(c, cmd)? {
        Outcome::Unchanged => Err(format!("nothing changed for task {}", pos).into()),
        Outcome::LimitReached => Err(limit_error(c)),
        _ => Ok(()),
    }
}

fn limit_error(c: &Controller<JsonFileStore>) -> Box<dyn std::error::Error> {
    crate::app::notice::limit_reached_text(c.max_tasks())
        .to_lowercase()
        .into()
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::from_name(s).ok_or_else(|| {
        format!(
            "unknown priority '{}' (expected: high, medium, low, none)",
            s
        )
    })
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(c: &Controller<JsonFileStore>, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(&list_to_json(c.tasks()))?);
    } else if c.tasks().is_empty() {
        println!("no tasks");
    } else {
        for line in format_list(c.tasks()) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_status(c: &Controller<JsonFileStore>, json: bool) -> CmdResult {
    let title = summary::title(c.tasks());
    if json {
        let output = StatusJson {
            title,
            stats: summary::stats(c.tasks()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", title);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(c: &mut Controller<JsonFileStore>, args: AddArgs) -> CmdResult {
    let priority = args.priority.as_deref().map(parse_priority).transpose()?;
    match run(
        c,
        Command::Add {
            text: args.text,
            priority,
        },
    )? {
        Outcome::Added(id) => {
            let pos = c.tasks().display_index_of(id).map_or(0, |i| i + 1);
            println!("added {}: {}", pos, task_text(c, id));
            Ok(())
        }
        Outcome::LimitReached => Err(limit_error(c)),
        _ => Err("task text is empty".into()),
    }
}

fn cmd_priority(c: &mut Controller<JsonFileStore>, args: PriorityArgs) -> CmdResult {
    let id = resolve(c, args.pos)?;
    let priority = parse_priority(&args.priority)?;
    apply(c, Command::SetPriority(id, priority), args.pos)?;
    let now = c.tasks().get(id).map(|t| t.priority).unwrap_or_default();
    println!("priority: {}", now);
    Ok(())
}

fn cmd_sub(c: &mut Controller<JsonFileStore>, args: SubCmd) -> CmdResult {
    match args.action {
        SubAction::Add(a) => {
            let id = resolve(c, a.pos)?;
            apply(c, Command::AddSubtask(id, a.text), a.pos)?;
            println!("subtask added");
        }
        SubAction::Done(a) => {
            let id = resolve(c, a.pos)?;
            let idx = subtask_index(c, id, a.n)?;
            apply(c, Command::ToggleSubtask(id, idx), a.pos)?;
            println!("subtask toggled");
        }
        SubAction::Rm(a) => {
            let id = resolve(c, a.pos)?;
            let idx = subtask_index(c, id, a.n)?;
            apply(c, Command::DeleteSubtask(id, idx), a.pos)?;
            println!("subtask deleted");
        }
    }
    Ok(())
}

fn subtask_index(c: &Controller<JsonFileStore>, id: TaskId, n: usize) -> Result<usize, String> {
    let count = c.tasks().get(id).map_or(0, |t| t.subtasks.len());
    n.checked_sub(1)
        .filter(|&i| i < count)
        .ok_or_else(|| format!("no subtask {} (task has {})", n, count))
}

fn cmd_mv(c: &mut Controller<JsonFileStore>, args: MvArgs) -> CmdResult {
    let source = resolve(c, args.source)?;
    let target = resolve(c, args.target)?;
    let position = if args.below {
        DropPosition::Below
    } else {
        DropPosition::Above
    };
    let outcome = run(
        c,
        Command::Move {
            source,
            target,
            position,
        },
    )?;
    if outcome == Outcome::Unchanged {
        return Err("task is already there".into());
    }
    let pos = c.tasks().display_index_of(source).map_or(0, |i| i + 1);
    println!("moved to {}: {}", pos, task_text(c, source));
    Ok(())
}

fn cmd_theme(c: &mut Controller<JsonFileStore>, args: ThemeArgs, json: bool) -> CmdResult {
    let cmd = match args.choice {
        None => None,
        Some(ThemeChoice::Light) => Some(Command::SetTheme(ThemePreference::Light)),
        Some(ThemeChoice::Dark) => Some(Command::SetTheme(ThemePreference::Dark)),
        Some(ThemeChoice::Toggle) => Some(Command::ToggleTheme),
    };
    if let Some(cmd) = cmd {
        run(c, cmd)?;
    }
    let theme = c.state().theme.to_string();
    if json {
        println!("{}", serde_json::to_string_pretty(&ThemeJson { theme })?);
    } else {
        println!("{}", theme);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, path: &Path, json: bool) -> CmdResult {
    match args.action {
        ConfigAction::Show => {
            let config = config_io::read_config(path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("# {}", path.display());
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Set(a) => {
            config_io::set_config_value(path, &a.key, &a.value)?;
            println!("{} = {}", a.key, a.value);
        }
    }
    Ok(())
}
