//! kbdlight: keyboard backlight color and brightness control.

pub mod apply;
pub mod config;
pub mod device;
pub mod elevate;
pub mod error;
pub mod led;

pub use error::KbdlightError;
