//! Apply coordinator: commit a backlight state, escalating if needed.
//!
//! Per call: `Writing -> Committed`, or
//! `Writing -> PrivilegeNeeded -> Escalating -> {Committed | Failed}`.
//! There is no retry beyond the single escalation and no rollback of a
//! partial direct write; the elevated child rewrites both attributes.

use crate::device::KeyboardBacklight;
use crate::elevate::Elevator;
use crate::error::Result;
use crate::led::{BacklightState, parse_arg_color};
use crate::KbdlightError;

/// CLI flag the elevated child is invoked with.
pub const SET_BACKLIGHT_FLAG: &str = "--set-backlight";

/// CLI flag carrying the device directory to the elevated child.
pub const DEVICE_FLAG: &str = "--device";

/// How a successful apply reached the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Written by this process.
    Direct,
    /// Written by the elevated child (trusted on exit status 0).
    Elevated,
}

/// Commit `state` to `device`, falling back to `elevator` on any write error.
///
/// Blocks for as long as the elevated process runs. Callers with a UI must
/// run this off the render thread.
pub fn apply(
    device: &KeyboardBacklight,
    elevator: &impl Elevator,
    state: &BacklightState,
) -> Result<Applied> {
    log::debug!("apply {state}: writing directly");
    let err = match device.write_state(state) {
        Ok(()) => {
            log::debug!("apply {state}: committed directly");
            return Ok(Applied::Direct);
        }
        Err(e) => e,
    };

    if err.is_denied() {
        log::info!("direct write denied, escalating: {err}");
    } else {
        log::warn!("direct write failed, escalating: {err}");
    }

    let args = elevated_args(device, state)?;
    let output = elevator
        .run_elevated(&args)
        .map_err(|e| KbdlightError::ElevationUnavailable(e.to_string()))?;

    if output.success() {
        log::debug!("apply {state}: committed by elevated child");
        Ok(Applied::Elevated)
    } else {
        let diagnostic = output.diagnostic();
        log::warn!("elevated apply failed ({:?}): {diagnostic}", output.code);
        Err(KbdlightError::ElevationFailed {
            code: output.code,
            diagnostic,
        })
    }
}

/// Arguments for the elevated child: `--device <dir> --set-backlight <b> <r,g,b>`.
///
/// The device directory is always passed explicitly because the elevated
/// process does not read the invoking user's configuration. It is made
/// absolute first: the helper may start the child in another directory.
/// A directory that is not valid UTF-8 is rejected rather than passed on
/// lossily.
pub fn elevated_args(device: &KeyboardBacklight, state: &BacklightState) -> Result<Vec<String>> {
    let dir = std::path::absolute(device.dir())?;
    let dir = dir.to_str().ok_or_else(|| {
        KbdlightError::InvalidArgument(format!(
            "device path {} is not valid UTF-8",
            dir.display()
        ))
    })?;
    Ok(vec![
        DEVICE_FLAG.to_string(),
        dir.to_string(),
        SET_BACKLIGHT_FLAG.to_string(),
        state.brightness.to_string(),
        state.color.to_arg(),
    ])
}

/// Parse the two `--set-backlight` values: `<brightness> <r,g,b>`.
pub fn parse_set_backlight(brightness: &str, color: &str) -> Result<BacklightState> {
    let brightness = brightness.trim().parse::<u8>().map_err(|_| {
        KbdlightError::InvalidArgument(format!(
            "brightness \"{}\" is not an integer in 0-255",
            brightness.trim()
        ))
    })?;
    let color = parse_arg_color(color)?;
    Ok(BacklightState::new(brightness, color))
}

/// Find `--set-backlight <b> <r,g,b>` in a full argument list.
pub fn parse_elevated_args(args: &[String]) -> Result<BacklightState> {
    let pos = args
        .iter()
        .position(|a| a == SET_BACKLIGHT_FLAG)
        .ok_or_else(|| KbdlightError::InvalidArgument(format!("missing {SET_BACKLIGHT_FLAG}")))?;
    match &args[pos + 1..] {
        [brightness, color, ..] => parse_set_backlight(brightness, color),
        _ => Err(KbdlightError::InvalidArgument(format!(
            "{SET_BACKLIGHT_FLAG} takes <brightness> <r,g,b>"
        ))),
    }
}
