//! RGB color model and its text encodings.
//!
//! The device attribute uses `"R G B"` (single spaces), the command line uses
//! `"R,G,B"`, and human-readable output uses `#RRGGBB`.

use std::fmt;

use serde::Serialize;

/// A backlight color. Each channel is a raw intensity in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Device attribute encoding: `"R G B"`.
    pub fn to_attr(self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }

    /// Command-line argument encoding: `"R,G,B"`.
    pub fn to_arg(self) -> String {
        format!("{},{},{}", self.r, self.g, self.b)
    }

    /// Whether dark text reads better on top of this color.
    pub fn is_light(self) -> bool {
        u16::from(self.r) + u16::from(self.g) + u16::from(self.b) > 382
    }

    pub fn as_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Named colors offered as one-click presets, in display order.
pub const PRESETS: [(&str, Rgb); 7] = [
    ("RED", Rgb::new(255, 0, 0)),
    ("YELLOW", Rgb::new(255, 255, 0)),
    ("GREEN", Rgb::new(0, 255, 0)),
    ("CYAN", Rgb::new(0, 255, 255)),
    ("BLUE", Rgb::new(0, 0, 255)),
    ("WHITE", Rgb::WHITE),
    ("OFF", Rgb::OFF),
];

/// Look up a preset by name (case-insensitive).
pub fn preset(name: &str) -> Option<Rgb> {
    let name = name.trim();
    PRESETS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, rgb)| rgb)
}

/// Parse the device attribute encoding: exactly three whitespace-separated
/// integers in `0..=255`.
pub fn parse_attr_color(s: &str) -> crate::error::Result<Rgb> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    channels(&parts, s)
}

/// Parse the command-line encoding: exactly three comma-separated integers
/// in `0..=255`. Whitespace around each channel is ignored.
pub fn parse_arg_color(s: &str) -> crate::error::Result<Rgb> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    channels(&parts, s)
}

fn channels(parts: &[&str], raw: &str) -> crate::error::Result<Rgb> {
    let [r, g, b] = parts else {
        return Err(crate::KbdlightError::Color(format!(
            "expected 3 channels, got {} in \"{}\"",
            parts.iter().filter(|p| !p.is_empty()).count(),
            raw.trim()
        )));
    };
    Ok(Rgb::new(channel(r)?, channel(g)?, channel(b)?))
}

fn channel(s: &str) -> crate::error::Result<u8> {
    s.parse::<u8>().map_err(|_| {
        crate::KbdlightError::Color(format!("invalid channel \"{s}\" (expected 0-255)"))
    })
}
