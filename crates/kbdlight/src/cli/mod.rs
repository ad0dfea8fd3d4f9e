//! One-shot command-line paths: `--set-backlight` and `--status`.

mod set_backlight;
mod status;

use std::path::Path;

use serde::Serialize;

pub(super) use kbdlight_lib::config::Config;
pub(super) use kbdlight_lib::device::KeyboardBacklight;
pub(super) use kbdlight_lib::error::Result;
pub(super) use kbdlight_lib::led::Rgb;

pub(super) use set_backlight::cmd_set_backlight;
pub(super) use status::cmd_status;

/// Exit code of a failed `--set-backlight`.
pub(super) const SET_BACKLIGHT_FAILED: i32 = 2;

const PADDING: usize = 2;

/// Load config from `custom_path` if given, else from the default location.
/// Parse and validation warnings are logged, never fatal.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {}", format_kv(key, value, w - 2));
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub device: DeviceStatusJson,
    pub config: ConfigStatusJson,
}

#[derive(Serialize)]
pub(super) struct DeviceStatusJson {
    pub path: String,
    pub present: bool,
    pub brightness: Option<u8>,
    pub color: Option<Rgb>,
    pub color_hex: Option<String>,
}

#[derive(Serialize)]
pub(super) struct ConfigStatusJson {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}
