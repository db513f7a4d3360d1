use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("config key must look like section.key, got '{0}'")]
    BadKey(String),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Where config, store, and log files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
}

impl Paths {
    /// Resolve from XDG variables, falling back to `~/.config` and `~/.local/share`
    pub fn from_env() -> Self {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/"));
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"));
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local").join("share"));
        Paths {
            config_file: config_dir.join("nexttask").join("config.toml"),
            data_dir: data_dir.join("nexttask"),
        }
    }

    /// Store file: explicit override, then `[storage] path`, then the data dir
    pub fn store_file(&self, config: &AppConfig, overridden: Option<&Path>) -> PathBuf {
        overridden
            .map(Path::to_path_buf)
            .or_else(|| config.storage.path.clone())
            .unwrap_or_else(|| self.data_dir.join("store.json"))
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("nt.log")
    }
}

/// Read the config file. A missing file gives the defaults.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let config: AppConfig = toml::from_str(&text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.tasks.max_tasks == 0 {
        return Err(ConfigError::Invalid("tasks.max_tasks must be at least 1".into()));
    }
    Ok(())
}

/// Set `section.key = value` in the config file, preserving the rest of the
/// document's formatting. The edited document must still parse as a valid
/// config or nothing is written.
pub fn set_config_value(path: &Path, key: &str, raw: &str) -> Result<AppConfig, ConfigError> {
    let (section, field) = key
        .split_once('.')
        .filter(|(s, f)| !s.is_empty() && !f.is_empty() && !f.contains('.'))
        .ok_or_else(|| ConfigError::BadKey(key.to_string()))?;

    let text = if path.exists() {
        fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        String::new()
    };
    let mut doc: toml_edit::DocumentMut = text.parse()?;

    if !doc.contains_key(section) {
        doc[section] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    if !doc[section].is_table_like() {
        return Err(ConfigError::Invalid(format!("'{}' is not a table", section)));
    }
    doc[section][field] = parse_value(raw);

    let edited = doc.to_string();
    let config: AppConfig = toml::from_str(&edited)?;
    validate(&config)?;

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, edited)?;
    Ok(config)
}

/// Interpret a command-line value as an integer, a boolean, or a string
fn parse_value(raw: &str) -> toml_edit::Item {
    if let Ok(n) = raw.parse::<i64>() {
        toml_edit::value(n)
    } else if let Ok(b) = raw.parse::<bool>() {
        toml_edit::value(b)
    } else {
        toml_edit::value(raw)
    }
}
