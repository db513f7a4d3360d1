use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TasksConfig {
    /// Maximum number of tasks in the list
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,
}

impl Default for TasksConfig {
    fn default() -> Self {
        TasksConfig {
            max_tasks: default_max_tasks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// How long the "limit reached" notice stays up
    #[serde(default = "default_notice_ms")]
    pub notice_ms: u64,
    #[serde(default)]
    pub clock_24h: bool,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides, keyed by palette slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            notice_ms: default_notice_ms(),
            clock_24h: false,
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

impl UiConfig {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Store file location (default: data dir / store.json)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_max_tasks() -> usize {
    12
}

fn default_notice_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}
