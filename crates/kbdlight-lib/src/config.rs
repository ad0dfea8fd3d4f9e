//! Application configuration: TOML-based, platform-aware paths.
//!
//! The file only holds deployment settings. It is read at startup and
//! never written by the program.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::device::{DEFAULT_DEVICE_PATH, KeyboardBacklight};
use crate::elevate::DEFAULT_HELPER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// sysfs directory holding the `brightness` and `multi_intensity` attributes.
    #[serde(default = "default_device_path")]
    pub device_path: String,

    /// Program used to re-run kbdlight with elevated rights. Default: "pkexec".
    #[serde(default = "default_elevation_helper")]
    pub elevation_helper: String,
}

fn default_device_path() -> String {
    DEFAULT_DEVICE_PATH.into()
}

fn default_elevation_helper() -> String {
    DEFAULT_HELPER.into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device_path: default_device_path(),
            elevation_helper: default_elevation_helper(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `device_path` is empty or whitespace-only.
    EmptyDevicePath,
    /// `device_path` is not absolute.
    RelativeDevicePath(String),
    /// `elevation_helper` is empty or whitespace-only.
    EmptyElevationHelper,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyDevicePath => write!(f, "device_path cannot be empty"),
            ValidationError::RelativeDevicePath(p) => {
                write!(f, "device_path must be absolute, got \"{p}\"")
            }
            ValidationError::EmptyElevationHelper => {
                write!(f, "elevation_helper cannot be empty")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kbdlight"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Full path to the log file (control panel).
    pub fn log_path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("kbdlight.log"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from an arbitrary path, returning the config and any warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file can't be parsed or fails
    /// validation.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return (Self::default(), vec![]),
        };
        let config: Config = match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                let warning = format!(
                    "config parse error ({}), using defaults: {e}",
                    path.display()
                );
                return (Self::default(), vec![warning]);
            }
        };
        match config.validate() {
            Ok(()) => (config, vec![]),
            Err(errs) => {
                let warnings = errs
                    .iter()
                    .map(|e| format!("invalid config ({}), using defaults: {e}", path.display()))
                    .collect();
                (Self::default(), warnings)
            }
        }
    }

    /// Load config from the default path, returning the config and any warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let device_path = self.device_path.trim();
        if device_path.is_empty() {
            errors.push(ValidationError::EmptyDevicePath);
        } else if !Path::new(device_path).is_absolute() {
            errors.push(ValidationError::RelativeDevicePath(device_path.to_string()));
        }

        if self.elevation_helper.trim().is_empty() {
            errors.push(ValidationError::EmptyElevationHelper);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Device accessor for the configured path.
    pub fn device(&self) -> KeyboardBacklight {
        KeyboardBacklight::new(self.device_path.trim())
    }
}
