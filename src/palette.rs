//! Type colors for list rows and the profile card.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceived brightness on a 0..=255 scale.
    pub fn luma(self) -> u8 {
        let luma = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        (luma / 1000) as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0}")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseRgbError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseRgbError(s.to_string()))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

pub const NORMAL: Rgb = Rgb::new(0xA8, 0xA8, 0x78);

const TYPE_COLORS: [(&str, Rgb); 14] = [
    ("fire", Rgb::new(0xF0, 0x80, 0x30)),
    ("grass", Rgb::new(0x78, 0xC8, 0x50)),
    ("electric", Rgb::new(0xF8, 0xD0, 0x30)),
    ("water", Rgb::new(0x68, 0x90, 0xF0)),
    ("ground", Rgb::new(0xE0, 0xC0, 0x68)),
    ("rock", Rgb::new(0xB8, 0xA0, 0x38)),
    ("fairy", Rgb::new(0xEE, 0x99, 0xAC)),
    ("poison", Rgb::new(0xA0, 0x40, 0xA0)),
    ("bug", Rgb::new(0xA8, 0xB8, 0x20)),
    ("dragon", Rgb::new(0x70, 0x38, 0xF8)),
    ("psychic", Rgb::new(0xF8, 0x58, 0x88)),
    ("flying", Rgb::new(0xA8, 0x90, 0xF0)),
    ("fighting", Rgb::new(0xC0, 0x30, 0x28)),
    ("normal", NORMAL),
];

/// Base color for a single type tag; unknown tags fall back to normal.
pub fn base_color(tag: &str) -> Rgb {
    let tag = tag.trim().to_ascii_lowercase();
    TYPE_COLORS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, color)| *color)
        .unwrap_or(NORMAL)
}

/// Color for a comma-separated type label, blending multiple types.
pub fn type_color(label: &str) -> Rgb {
    let colors: Vec<Rgb> = label.split(',').map(base_color).collect();
    match colors.as_slice() {
        [single] => *single,
        _ => blend(&colors),
    }
}

/// Per-channel average, rounded half up.
pub fn blend(colors: &[Rgb]) -> Rgb {
    if colors.is_empty() {
        return NORMAL;
    }
    let count = colors.len() as u32;
    let (r, g, b) = colors.iter().fold((0u32, 0u32, 0u32), |(r, g, b), color| {
        (r + color.r as u32, g + color.g as u32, b + color.b as u32)
    });
    let average = |total: u32| ((2 * total + count) / (2 * count)) as u8;
    Rgb::new(average(r), average(g), average(b))
}

/// Foreground that stays readable on `background`.
pub fn text_on(background: Rgb) -> Rgb {
    if background.luma() > 110 {
        Rgb::new(0x33, 0x33, 0x33)
    } else {
        Rgb::new(0xF5, 0xF5, 0xF5)
    }
}

/// The label as shown to users: "grass | poison".
pub fn display_label(label: &str) -> String {
    label
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}
