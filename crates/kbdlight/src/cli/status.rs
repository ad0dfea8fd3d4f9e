//! `--status`: show the current backlight state and configuration.

use std::path::Path;

use super::{
    Config, ConfigStatusJson, DeviceStatusJson, KeyboardBacklight, Result, StatusOutput, kv,
    kv_indent, kv_width,
};

/// Collect device status. State is read only when the device exists, so an
/// absent device is not reported with default values.
fn collect_device_status(device: &KeyboardBacklight) -> DeviceStatusJson {
    let present = device.is_present();
    let state = present.then(|| device.read_state());
    DeviceStatusJson {
        path: device.dir().display().to_string(),
        present,
        brightness: state.map(|s| s.brightness),
        color: state.map(|s| s.color),
        color_hex: state.map(|s| s.color.to_string()),
    }
}

fn collect_config_status(config: &Config, custom_path: Option<&Path>) -> ConfigStatusJson {
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    ConfigStatusJson {
        config_file_exists: config_path.as_ref().is_some_and(|p| p.exists()),
        config_file: config_path.map(|p| p.display().to_string()),
        settings: config.clone(),
    }
}

pub(crate) fn cmd_status(
    device: &KeyboardBacklight,
    config: &Config,
    custom_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let output = StatusOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        device: collect_device_status(device),
        config: collect_config_status(config, custom_path),
    };

    if json {
        let text = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        println!("{text}");
        return Ok(());
    }

    let w = kv_width(
        &["Version:", "Device:", "Config:"],
        &["Brightness:", "Color:", "File:", "Elevation helper:"],
    );

    kv("Version:", &output.version, w);

    let dev = &output.device;
    if dev.present {
        kv("Device:", &dev.path, w);
        if let Some(b) = dev.brightness {
            kv_indent("Brightness:", b, w);
        }
        if let (Some(color), Some(hex)) = (dev.color, &dev.color_hex) {
            kv_indent("Color:", format_args!("{hex} ({})", color.to_attr()), w);
        }
    } else {
        kv("Device:", format_args!("{} (not found)", dev.path), w);
    }

    println!("Config:");
    let cfg = &output.config;
    match &cfg.config_file {
        Some(p) if cfg.config_file_exists => kv_indent("File:", format_args!("{p} (loaded)"), w),
        Some(p) => kv_indent(
            "File:",
            format_args!("{p} (not found, using defaults)"),
            w,
        ),
        None => kv_indent("File:", "(no config directory)", w),
    }
    kv_indent("Elevation helper:", &cfg.settings.elevation_helper, w);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbdlight_lib::device::{BRIGHTNESS_ATTR, COLOR_ATTR};
    use kbdlight_lib::led::Rgb;
    use tempfile::TempDir;

    #[test]
    fn present_device_reports_state() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(BRIGHTNESS_ATTR), "42\n").unwrap();
        std::fs::write(dir.path().join(COLOR_ATTR), "0 128 255\n").unwrap();
        let status = collect_device_status(&KeyboardBacklight::new(dir.path()));
        assert!(status.present);
        assert_eq!(status.brightness, Some(42));
        assert_eq!(status.color, Some(Rgb::new(0, 128, 255)));
        assert_eq!(status.color_hex.as_deref(), Some("#0080FF"));
    }

    #[test]
    fn present_device_with_garbage_reports_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(BRIGHTNESS_ATTR), "garbage").unwrap();
        let status = collect_device_status(&KeyboardBacklight::new(dir.path()));
        assert_eq!(status.brightness, Some(128));
        assert_eq!(status.color, Some(Rgb::WHITE));
    }

    #[test]
    fn absent_device_reports_nothing() {
        let status = collect_device_status(&KeyboardBacklight::new("/nonexistent/kbd"));
        assert!(!status.present);
        assert_eq!(status.brightness, None);
        assert_eq!(status.color_hex, None);
    }

    #[test]
    fn custom_config_path_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let status = collect_config_status(&Config::default(), Some(path.as_path()));
        assert_eq!(status.config_file, Some(path.display().to_string()));
        assert!(!status.config_file_exists);

        std::fs::write(&path, "").unwrap();
        let status = collect_config_status(&Config::default(), Some(path.as_path()));
        assert!(status.config_file_exists);
    }
}
