//! The (brightness, color) pair the device holds.

use std::fmt;

use serde::Serialize;

use super::color::Rgb;

/// Brightness reported when the device attribute cannot be read.
pub const DEFAULT_BRIGHTNESS: u8 = 128;

/// Color reported when the device attribute cannot be read.
pub const DEFAULT_COLOR: Rgb = Rgb::WHITE;

/// Full backlight state. Always read fresh from the device; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BacklightState {
    pub brightness: u8,
    pub color: Rgb,
}

impl BacklightState {
    pub const fn new(brightness: u8, color: Rgb) -> Self {
        BacklightState { brightness, color }
    }
}

impl Default for BacklightState {
    fn default() -> Self {
        BacklightState::new(DEFAULT_BRIGHTNESS, DEFAULT_COLOR)
    }
}

impl fmt::Display for BacklightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "brightness {} color {}", self.brightness, self.color)
    }
}
