//! Application state, the command queue, and the controller that applies
//! commands to the task list and persists the result.

pub mod command;
pub mod controller;
pub mod notice;

pub use command::Command;
pub use controller::{AppState, Controller, PendingKind, PendingToken};
pub use notice::Notice;
