//! Backlight state model: color, brightness, presets.

mod color;
mod state;

pub use color::{PRESETS, Rgb, parse_arg_color, parse_attr_color, preset};
pub use state::{BacklightState, DEFAULT_BRIGHTNESS, DEFAULT_COLOR};
