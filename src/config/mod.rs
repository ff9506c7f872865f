//! Configuration management.
//!
//! Configuration is layered: compiled-in defaults, then an optional TOML
//! file, then command-line flags applied by the binary. The file is looked
//! up in the platform config directory and falls back to `~/.config/voxpop/`
//! on Unix-style layouts.

use crate::observability::{LogFormat, LoggingConfig};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default database file name inside the data directory.
const DB_FILE_NAME: &str = "feedback.db";

/// Main configuration for voxpop.
#[derive(Debug, Clone)]
pub struct VoxpopConfig {
    /// Directory for application data; holds the database by default.
    pub data_dir: PathBuf,
    /// Path to the `SQLite` database file.
    pub db_path: PathBuf,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Default for VoxpopConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(".voxpop");
        let db_path = data_dir.join(DB_FILE_NAME);
        Self {
            data_dir,
            db_path,
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Database path.
    pub db_path: Option<String>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Logging section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// Log format name ("text" or "json").
    pub format: Option<String>,
    /// Verbose logging.
    pub verbose: Option<bool>,
    /// Log file path.
    pub file: Option<String>,
}

impl VoxpopConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the file cannot be read and
    /// [`Error::InvalidInput`] if it is not valid TOML.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_config_file", e))?;

        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| Error::InvalidInput(format!("config file {}: {e}", path.display())))?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/voxpop/` on macOS)
    /// 2. XDG config dir (`~/.config/voxpop/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found or a found
    /// file does not load.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("voxpop").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("voxpop")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a [`ConfigFile`] to a [`VoxpopConfig`].
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
            // The default database location follows the data directory
            // unless db_path is set explicitly below.
            config.db_path = config.data_dir.join(DB_FILE_NAME);
        }
        if let Some(db_path) = file.db_path {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(logging) = file.logging {
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
            if let Some(verbose) = logging.verbose {
                config.logging.verbose = verbose;
            }
            config.logging.file = logging.file.map(PathBuf::from);
        }

        config
    }

    /// Sets the data directory (does not move the database path).
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Sets the logging configuration.
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Creates the data directory and the database file's parent directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if a directory cannot be created.
    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| Error::operation("create_data_dir", e))?;
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::operation("create_db_dir", e))?;
        }
        Ok(())
    }
}
