//! Unified error type for the kbdlight-lib crate.
//!
//! [`KbdlightError`] wraps device write errors and the escalation outcomes
//! the apply coordinator can surface. Read faults never reach this type:
//! the accessor resolves them to defaults.

use std::fmt;

use crate::device::DeviceError;

/// Unified error type for kbdlight-lib operations.
#[derive(Debug)]
pub enum KbdlightError {
    /// Direct write to a device attribute failed.
    Device(DeviceError),
    /// The elevated re-invocation ran but did not succeed.
    ElevationFailed {
        /// Exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// Text the elevated process (or the helper) printed.
        diagnostic: String,
    },
    /// The elevation helper could not be launched at all.
    ElevationUnavailable(String),
    /// Malformed `--set-backlight` argument.
    InvalidArgument(String),
    /// Color parsing error.
    Color(String),
    /// Configuration validation error.
    Config(String),
    /// Standard I/O error.
    Io(std::io::Error),
}

impl fmt::Display for KbdlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KbdlightError::Device(e) => write!(f, "{e}"),
            KbdlightError::ElevationFailed { diagnostic, .. } => write!(f, "{diagnostic}"),
            KbdlightError::ElevationUnavailable(e) => {
                write!(f, "Could not launch elevation helper: {e}")
            }
            KbdlightError::InvalidArgument(e) => write!(f, "Invalid argument: {e}"),
            KbdlightError::Color(e) => write!(f, "Color error: {e}"),
            KbdlightError::Config(e) => write!(f, "Config error: {e}"),
            KbdlightError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for KbdlightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KbdlightError::Device(e) => Some(e),
            KbdlightError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceError> for KbdlightError {
    fn from(e: DeviceError) -> Self {
        KbdlightError::Device(e)
    }
}

impl From<std::io::Error> for KbdlightError {
    fn from(e: std::io::Error) -> Self {
        KbdlightError::Io(e)
    }
}

/// Crate-level Result alias using [`KbdlightError`].
pub type Result<T> = std::result::Result<T, KbdlightError>;
