//! Device state accessor: the sysfs LED class attributes of the keyboard.
//!
//! Reads are best-effort: any [`ReadFault`] resolves to a documented default
//! so a status display always has something to show. Writes are not: the
//! apply coordinator needs the error to decide whether to escalate.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::led::{BacklightState, DEFAULT_BRIGHTNESS, DEFAULT_COLOR, Rgb, parse_attr_color};

/// Device directory exposed by the `tuxedo_keyboard` driver.
pub const DEFAULT_DEVICE_PATH: &str =
    "/sys/devices/platform/tuxedo_keyboard/leds/rgb:kbd_backlight";

/// Brightness attribute: a single decimal integer.
pub const BRIGHTNESS_ATTR: &str = "brightness";

/// Color attribute: `"R G B"`.
pub const COLOR_ATTR: &str = "multi_intensity";

// ── Error types ──

/// Write errors. Both variants trigger privilege escalation in the
/// coordinator; they differ only in how the failure is reported.
#[derive(Debug)]
pub enum DeviceError {
    WriteDenied { path: PathBuf, source: io::Error },
    WriteFailed { path: PathBuf, source: io::Error },
}

impl DeviceError {
    fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            DeviceError::WriteDenied { path, source }
        } else {
            DeviceError::WriteFailed { path, source }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            DeviceError::WriteDenied { path, .. } | DeviceError::WriteFailed { path, .. } => path,
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, DeviceError::WriteDenied { .. })
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::WriteDenied { path, source } | DeviceError::WriteFailed { path, source } => {
                write!(f, "Cannot write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::WriteDenied { source, .. } | DeviceError::WriteFailed { source, .. } => {
                Some(source)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;

/// Why a read fell back to its default.
#[derive(Debug)]
pub enum ReadFault {
    /// The attribute file does not exist.
    Missing(PathBuf),
    /// The file exists but could not be read (e.g. permission denied).
    Unreadable { path: PathBuf, source: io::Error },
    /// The content did not parse.
    Malformed { path: PathBuf, content: String },
}

impl fmt::Display for ReadFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadFault::Missing(path) => write!(f, "{} does not exist", path.display()),
            ReadFault::Unreadable { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ReadFault::Malformed { path, content } => {
                write!(f, "malformed content in {}: {content:?}", path.display())
            }
        }
    }
}

// ── Accessor ──

/// Handle on one keyboard backlight device directory.
///
/// Holds no state besides the path; every read goes to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardBacklight {
    dir: PathBuf,
}

impl Default for KeyboardBacklight {
    fn default() -> Self {
        KeyboardBacklight::new(DEFAULT_DEVICE_PATH)
    }
}

impl KeyboardBacklight {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        KeyboardBacklight { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn attr_path(&self, attr: &str) -> PathBuf {
        self.dir.join(attr)
    }

    /// Whether the device directory exists.
    pub fn is_present(&self) -> bool {
        self.dir.is_dir()
    }

    // ── Reads ──

    pub fn try_read_brightness(&self) -> std::result::Result<u8, ReadFault> {
        let (path, raw) = self.read_attr(BRIGHTNESS_ATTR)?;
        raw.trim().parse::<u8>().map_err(|_| ReadFault::Malformed {
            path,
            content: raw,
        })
    }

    pub fn try_read_color(&self) -> std::result::Result<Rgb, ReadFault> {
        let (path, raw) = self.read_attr(COLOR_ATTR)?;
        parse_attr_color(&raw).map_err(|_| ReadFault::Malformed { path, content: raw })
    }

    /// Current brightness, or [`DEFAULT_BRIGHTNESS`] if it cannot be read.
    pub fn read_brightness(&self) -> u8 {
        self.try_read_brightness().unwrap_or_else(|fault| {
            log::debug!("brightness read fell back to {DEFAULT_BRIGHTNESS}: {fault}");
            DEFAULT_BRIGHTNESS
        })
    }

    /// Current color, or [`DEFAULT_COLOR`] if it cannot be read.
    pub fn read_color(&self) -> Rgb {
        self.try_read_color().unwrap_or_else(|fault| {
            log::debug!("color read fell back to {}: {fault}", DEFAULT_COLOR.to_attr());
            DEFAULT_COLOR
        })
    }

    pub fn read_state(&self) -> BacklightState {
        BacklightState::new(self.read_brightness(), self.read_color())
    }

    fn read_attr(&self, attr: &str) -> std::result::Result<(PathBuf, String), ReadFault> {
        let path = self.attr_path(attr);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok((path, raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ReadFault::Missing(path)),
            Err(source) => Err(ReadFault::Unreadable { path, source }),
        }
    }

    // ── Writes ──

    pub fn write_brightness(&self, value: u8) -> Result<()> {
        self.write_attr(BRIGHTNESS_ATTR, &value.to_string())
    }

    pub fn write_color(&self, color: Rgb) -> Result<()> {
        self.write_attr(COLOR_ATTR, &color.to_attr())
    }

    /// Write brightness, then color. Stops at the first failure, so an error
    /// from the color write leaves the new brightness in place.
    pub fn write_state(&self, state: &BacklightState) -> Result<()> {
        self.write_brightness(state.brightness)?;
        self.write_color(state.color)
    }

    /// Attributes are never created: a missing file is `NotFound`.
    fn write_attr(&self, attr: &str, value: &str) -> Result<()> {
        let path = self.attr_path(attr);
        let result = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .and_then(|mut f| f.write_all(value.as_bytes()));
        match result {
            Ok(()) => {
                log::debug!("wrote {value:?} to {}", path.display());
                Ok(())
            }
            Err(e) => Err(DeviceError::from_io(path, e)),
        }
    }
}
