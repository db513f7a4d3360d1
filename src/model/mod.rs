pub mod config;
pub mod list;
pub mod preferences;
pub mod task;

pub use config::*;
pub use list::*;
pub use preferences::*;
pub use task::*;
