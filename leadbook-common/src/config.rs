//! Configuration loading and root folder resolution
//!
//! A missing or unreadable config file never stops startup: the loader logs a
//! warning and falls back to defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the datasets root folder
pub const ROOT_FOLDER_ENV: &str = "LEADBOOK_ROOT_FOLDER";

/// Environment variable naming an explicit config file
pub const CONFIG_FILE_ENV: &str = "LEADBOOK_CONFIG";

/// Default upload ceiling (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub const DEFAULT_PORT: u16 = 8080;

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
    pub default_dataset: Option<String>,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Load from `path`. Missing file → defaults; parse failure → warning
    /// and defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    debug!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring unparseable config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Could not read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from the resolved config file location
    pub fn load(explicit: Option<&Path>) -> Self {
        match config_file_path(explicit) {
            Ok(path) => Self::load_or_default(&path),
            Err(e) => {
                warn!("{}", e);
                Self::default()
            }
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        if self.cors_origins.is_empty() {
            vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ]
        } else {
            self.cors_origins.clone()
        }
    }
}

/// Write a config file, creating parent directories
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Config file location: explicit path, then `LEADBOOK_CONFIG`, then the
/// platform config directory.
pub fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|d| d.join("leadbook").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. `LEADBOOK_ROOT_FOLDER`
/// 3. `root_folder` in the TOML config
/// 4. OS-dependent default
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_config(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        if let Some(path) = &self.toml_root {
            return path.clone();
        }
        default_root_folder()
    }
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("leadbook"))
        .unwrap_or_else(|| PathBuf::from("./leadbook_data"))
}

/// Prepares the on-disk layout under a resolved root folder
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory datasets are stored in
    pub fn datasets_path(&self) -> PathBuf {
        self.root.join("datasets")
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        let dir = self.datasets_path();
        if dir.exists() && !dir.is_dir() {
            return Err(Error::Config(format!(
                "Path exists but is not a directory: {}",
                dir.display()
            )));
        }
        std::fs::create_dir_all(&dir)?;
        Ok(())
    }
}
