//! `--set-backlight`: write one backlight state directly and exit.
//!
//! This is the path the elevated child runs, so it never escalates itself.

use kbdlight_lib::KbdlightError;
use kbdlight_lib::apply::{SET_BACKLIGHT_FLAG, parse_set_backlight};

use super::{KeyboardBacklight, Result};

pub(crate) fn cmd_set_backlight(device: &KeyboardBacklight, values: &[String]) -> Result<()> {
    let [brightness, color] = values else {
        return Err(KbdlightError::InvalidArgument(format!(
            "{SET_BACKLIGHT_FLAG} takes <brightness> <r,g,b>"
        )));
    };
    let state = parse_set_backlight(brightness, color)?;
    device.write_state(&state)?;
    log::info!("set {state} on {}", device.dir().display());
    Ok(())
}
