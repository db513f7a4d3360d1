use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "nt", about = concat!("nexttask v", env!("CARGO_PKG_VERSION"), " - what's next, at a glance"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different store file
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Use a different config file
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks in display order
    List,
    /// Add a task
    Add(AddArgs),
    /// Toggle a task's completion
    Done(PosArgs),
    /// Delete a task
    Rm(PosArgs),
    /// Change a task's text
    Edit(EditArgs),
    /// Toggle a task's priority (same priority again clears it)
    Priority(PriorityArgs),
    /// Delete all completed tasks
    Clear,
    /// Set a task's notes (empty text clears them)
    Note(NoteArgs),
    /// Manage subtasks
    Sub(SubCmd),
    /// Move a task above (or below) another
    Mv(MvArgs),
    /// Show or set the theme
    Theme(ThemeArgs),
    /// Print the remaining-tasks title line
    Status,
    /// Inspect or edit configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Priority (high, medium, low)
    #[arg(long, short)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct PosArgs {
    /// Position as shown by `nt list` (1-based)
    pub pos: usize,
}

#[derive(Args)]
pub struct EditArgs {
    /// Position (1-based)
    pub pos: usize,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// Position (1-based)
    pub pos: usize,
    /// Priority (high, medium, low, none)
    pub priority: String,
}

#[derive(Args)]
pub struct NoteArgs {
    /// Position (1-based)
    pub pos: usize,
    /// Notes text
    pub text: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Position of the task to move (1-based)
    pub source: usize,
    /// Position of the task to drop onto (1-based)
    pub target: usize,
    /// Drop below the target instead of above
    #[arg(long)]
    pub below: bool,
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubCmd {
    #[command(subcommand)]
    pub action: SubAction,
}

#[derive(Subcommand)]
pub enum SubAction {
    /// Add a subtask
    Add(SubAddArgs),
    /// Toggle a subtask's completion
    Done(SubRefArgs),
    /// Delete a subtask
    Rm(SubRefArgs),
}

#[derive(Args)]
pub struct SubAddArgs {
    /// Task position (1-based)
    pub pos: usize,
    /// Subtask text
    pub text: String,
}

#[derive(Args)]
pub struct SubRefArgs {
    /// Task position (1-based)
    pub pos: usize,
    /// Subtask number within the task (1-based)
    pub n: usize,
}

// ---------------------------------------------------------------------------
// Theme / config
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// New theme; omit to print the current one
    pub choice: Option<ThemeChoice>,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a value, e.g. `nt config set tasks.max_tasks 20`
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key (section.field)
    pub key: String,
    /// New value
    pub value: String,
}
