//! Server configuration.
//!
//! # Responsibility
//! - Resolve bind address, database file and logging settings from an
//!   optional `configs/config.yaml` and the environment (after `.env` has
//!   been loaded by the binary).
//!
//! # Invariants
//! - Precedence is environment, then config file, then built-in default.
//! - A missing config file is not an error; an unreadable or malformed one is.
//! - Malformed values are reported as `ConfigError`, never a panic.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_DATABASE_TYPE: &str = "sqlite";
const DEFAULT_DATABASE_FILE: &str = "todo.db";
const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Directories searched, in order, for `CONFIG_FILE_NAME`.
pub const CONFIG_SEARCH_DIRS: [&str; 3] = ["./configs", "../configs", "../../configs"];
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    Empty(&'static str),
    UnsupportedDatabase(String),
    CurrentDir(std::io::Error),
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort(value) => {
                write!(f, "server port must be a valid u16, got `{value}`")
            }
            Self::Empty(name) => write!(f, "{name} cannot be empty"),
            Self::UnsupportedDatabase(kind) => {
                write!(f, "unsupported database type `{kind}` (only `sqlite`)")
            }
            Self::CurrentDir(err) => write!(f, "failed to resolve current directory: {err}"),
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file {}: {source}", path.display())
            }
            Self::ParseFile { path, source } => {
                write!(f, "failed to parse config file {}: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) | Self::ReadFile { source: err, .. } => Some(err),
            Self::ParseFile { source, .. } => Some(source),
            Self::InvalidPort(_) | Self::Empty(_) | Self::UnsupportedDatabase(_) => None,
        }
    }
}

/// Shape of `configs/config.yaml`. Every key is optional; unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_yaml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the first `config.yaml` found under `base` in
    /// `CONFIG_SEARCH_DIRS` order. Returns `None` when no candidate exists.
    pub fn discover(base: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for dir in CONFIG_SEARCH_DIRS {
            let path = base.join(dir).join(CONFIG_FILE_NAME);
            if !path.is_file() {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|source| {
                ConfigError::ReadFile {
                    path: path.clone(),
                    source,
                }
            })?;
            let file = Self::from_yaml_str(&path, &content)?;
            return Ok(Some((path, file)));
        }
        Ok(None)
    }
}

/// Server configuration.
///
/// | Env Var                           | File key         | Default                            |
/// |-----------------------------------|------------------|------------------------------------|
/// | `SERVER_HOST` (`HOST`)            | `server.host`    | `0.0.0.0`                          |
/// | `SERVER_PORT` (`PORT`)            | `server.port`    | `8081`                             |
/// | `DATABASE_TYPE`                   | `database.type`  | `sqlite`                           |
/// | `DATABASE_FILE`                   | `database.file`  | `todo.db`                          |
/// | `LOGGING_LEVEL` (`LOG_LEVEL`)     | `logging.level`  | `debug` (debug) / `info` (release) |
/// | `LOGGING_DIR` (`LOG_DIR`)         | `logging.dir`    | `<cwd>/logs`                       |
///
/// Names in parentheses are accepted when the primary name is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file path, relative to the working directory unless absolute.
    pub database_file: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// Config file the values were layered on, if one was found.
    pub source_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Loads `configs/config.yaml` (searched from the working directory)
    /// and applies process environment variables on top.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let (source_file, file) = match FileConfig::discover(&cwd)? {
            Some((path, file)) => (Some(path), file),
            None => (None, FileConfig::default()),
        };
        let mut config = Self::resolve(file, |name| std::env::var(name).ok())?;
        config.source_file = source_file;
        Ok(config)
    }

    /// Loads configuration through an arbitrary variable lookup, with no
    /// config file.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(FileConfig::default(), lookup)
    }

    /// Layers `lookup` over `file` over the defaults.
    pub fn resolve<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match env_value(&lookup, &["SERVER_HOST", "HOST"])? {
            Some(value) => value,
            None => file_value(file.server.host, "server.host")?
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        };

        let port = match env_value(&lookup, &["SERVER_PORT", "PORT"])? {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => file.server.port.unwrap_or(DEFAULT_PORT),
        };

        let database_kind = match env_value(&lookup, &["DATABASE_TYPE"])? {
            Some(value) => value,
            None => file_value(file.database.kind, "database.type")?
                .unwrap_or_else(|| DEFAULT_DATABASE_TYPE.to_string()),
        };
        if !database_kind.eq_ignore_ascii_case(DEFAULT_DATABASE_TYPE) {
            return Err(ConfigError::UnsupportedDatabase(database_kind));
        }

        let database_file = match env_value(&lookup, &["DATABASE_FILE"])? {
            Some(value) => PathBuf::from(value),
            None => file_path(file.database.file, "database.file")?
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE)),
        };

        let log_level = match env_value(&lookup, &["LOGGING_LEVEL", "LOG_LEVEL"])? {
            Some(value) => value,
            None => file_value(file.logging.level, "logging.level")?
                .unwrap_or_else(|| todo_core::default_log_level().to_string()),
        };

        let log_dir = match env_value(&lookup, &["LOGGING_DIR", "LOG_DIR"])? {
            Some(value) => PathBuf::from(value),
            None => file_path(file.logging.dir, "logging.dir")?
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR_NAME)),
        };

        Ok(Self {
            host,
            port,
            database_file,
            log_level,
            log_dir: absolutize(log_dir)?,
            source_file: None,
        })
    }

    /// Returns `host:port` for binding the listener.
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads the first set variable among `names`, treating a set-but-blank
/// value as an error.
fn env_value<F>(lookup: &F, names: &[&'static str]) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for &name in names {
        match lookup(name) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::Empty(name)),
            Some(value) => return Ok(Some(value.trim().to_string())),
            None => {}
        }
    }
    Ok(None)
}

fn file_value(value: Option<String>, key: &'static str) -> Result<Option<String>, ConfigError> {
    match value {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(key)),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

fn file_path(value: Option<PathBuf>, key: &'static str) -> Result<Option<PathBuf>, ConfigError> {
    match value {
        Some(path) if path.as_os_str().is_empty() => Err(ConfigError::Empty(key)),
        other => Ok(other),
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}
