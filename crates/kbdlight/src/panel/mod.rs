//! Control panel: egui window for picking backlight color and brightness.
//!
//! The window state lives in [`Panel`], which has no egui dependency so the
//! apply/dirty logic can be tested directly. Applies run on a worker thread:
//! an escalation blocks until the user answers the authentication prompt.

use kbdlight_lib::apply::Applied;
use kbdlight_lib::config::Config;
use kbdlight_lib::device::KeyboardBacklight;
use kbdlight_lib::elevate::HelperElevator;
use kbdlight_lib::error::Result;
use kbdlight_lib::led::{BacklightState, Rgb};

mod ui;

pub(crate) const TITLE: &str = "Keyboard Backlight Control";

/// Editable panel state. The device is the source of truth; `device_brightness`
/// is the value last read back from it.
#[derive(Debug)]
pub(crate) struct Panel {
    pub brightness: u8,
    pub color: Rgb,
    pub device_brightness: u8,
    in_flight: bool,
    pub error: Option<String>,
}

impl Panel {
    pub fn new(initial: BacklightState) -> Self {
        Panel {
            brightness: initial.brightness,
            color: initial.color,
            device_brightness: initial.brightness,
            in_flight: false,
            error: None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// The brightness "Apply" button: only when the slider differs from the device.
    pub fn brightness_apply_enabled(&self) -> bool {
        !self.in_flight && self.brightness != self.device_brightness
    }

    /// Preset and color buttons.
    pub fn color_apply_enabled(&self) -> bool {
        !self.in_flight
    }

    /// Mark an apply as started and return the request, or `None` if one is
    /// already running.
    pub fn begin_apply(&mut self) -> Option<BacklightState> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.error = None;
        Some(BacklightState::new(self.brightness, self.color))
    }

    /// Select a preset color and start applying it.
    pub fn begin_preset(&mut self, color: Rgb) -> Option<BacklightState> {
        if self.in_flight {
            return None;
        }
        self.color = color;
        self.begin_apply()
    }

    /// Record the outcome of an apply along with a fresh device read.
    pub fn finish_apply(&mut self, result: Result<Applied>, device_brightness: u8) {
        self.in_flight = false;
        self.device_brightness = device_brightness;
        match result {
            Ok(applied) => log::info!("applied {:?}", applied),
            Err(e) => {
                log::error!("apply failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

/// Label of the color apply button.
pub(crate) fn color_button_label(color: Rgb) -> String {
    format!("RGB ({}, {}, {})", color.r, color.g, color.b)
}

/// Text color that stays readable on a button filled with `fill`.
pub(crate) fn text_on(fill: Rgb) -> Rgb {
    if fill.is_light() { Rgb::OFF } else { Rgb::WHITE }
}

/// Open the panel. Blocks until the window is closed.
///
/// Must be called from the main thread (eframe/winit requirement).
pub fn run(device: KeyboardBacklight, config: &Config) -> std::result::Result<(), String> {
    let elevator = HelperElevator::for_current_exe(config.elevation_helper.trim())
        .map_err(|e| format!("cannot locate own executable: {e}"))?;
    let initial = device.read_state();
    if !device.is_present() {
        log::warn!(
            "keyboard backlight not found at {}, showing defaults",
            device.dir().display()
        );
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([500.0, 320.0])
            .with_resizable(false)
            .with_title(TITLE),
        ..Default::default()
    };
    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(ui::PanelApp::new(device, elevator, initial, cc)))),
    )
    .map_err(|e| format!("control panel failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbdlight_lib::KbdlightError;

    fn panel() -> Panel {
        Panel::new(BacklightState::new(128, Rgb::WHITE))
    }

    // ── brightness dirty indicator ──

    #[test]
    fn brightness_apply_disabled_when_in_sync() {
        assert!(!panel().brightness_apply_enabled());
    }

    #[test]
    fn brightness_apply_enabled_after_slider_moves() {
        let mut p = panel();
        p.brightness = 50;
        assert!(p.brightness_apply_enabled());
    }

    #[test]
    fn successful_apply_clears_dirty_state() {
        let mut p = panel();
        p.brightness = 50;
        let req = p.begin_apply().unwrap();
        assert_eq!(req, BacklightState::new(50, Rgb::WHITE));
        p.finish_apply(Ok(Applied::Direct), 50);
        assert!(!p.brightness_apply_enabled());
        assert!(p.error.is_none());
    }

    #[test]
    fn failed_apply_keeps_dirty_state_and_reports() {
        let mut p = panel();
        p.brightness = 50;
        p.begin_apply().unwrap();
        p.finish_apply(
            Err(KbdlightError::ElevationFailed {
                code: Some(126),
                diagnostic: "Not authorized".into(),
            }),
            128,
        );
        assert!(p.brightness_apply_enabled());
        assert_eq!(p.error.as_deref(), Some("Not authorized"));
        p.dismiss_error();
        assert!(p.error.is_none());
    }

    // ── in-flight guard ──

    #[test]
    fn no_concurrent_applies() {
        let mut p = panel();
        p.brightness = 10;
        assert!(p.begin_apply().is_some());
        assert!(p.in_flight());
        assert!(p.begin_apply().is_none());
        assert!(p.begin_preset(Rgb::OFF).is_none());
        assert!(!p.brightness_apply_enabled());
        assert!(!p.color_apply_enabled());
        // Preset click while busy does not change the selection
        assert_eq!(p.color, Rgb::WHITE);
    }

    #[test]
    fn preset_sets_color_and_uses_slider_brightness() {
        let mut p = panel();
        p.brightness = 90;
        let req = p.begin_preset(Rgb::new(255, 0, 0)).unwrap();
        assert_eq!(req, BacklightState::new(90, Rgb::new(255, 0, 0)));
        assert_eq!(p.color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn new_apply_clears_previous_error() {
        let mut p = panel();
        p.error = Some("old".into());
        p.begin_apply().unwrap();
        assert!(p.error.is_none());
    }

    // ── presentation helpers ──

    #[test]
    fn color_button_label_format() {
        assert_eq!(color_button_label(Rgb::new(1, 22, 255)), "RGB (1, 22, 255)");
    }

    #[test]
    fn text_contrast() {
        assert_eq!(text_on(Rgb::WHITE), Rgb::OFF);
        assert_eq!(text_on(Rgb::new(255, 255, 0)), Rgb::OFF);
        assert_eq!(text_on(Rgb::new(0, 0, 255)), Rgb::WHITE);
        assert_eq!(text_on(Rgb::OFF), Rgb::WHITE);
    }
}
