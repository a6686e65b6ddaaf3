//! Sprite decoding and half-block rendering for the profile card.

use image::imageops::FilterType;
use image::{GenericImageView, RgbaImage};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest sprite drawn, in pixels. Two pixel rows share one terminal row.
pub const MAX_WIDTH: u32 = 40;
pub const MAX_HEIGHT: u32 = 40;

const OPAQUE: u8 = 128;

/// Cropped RGBA pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteArt {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl SpriteArt {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Terminal rows needed to draw the sprite.
    pub fn rows(&self) -> u16 {
        self.height.div_ceil(2) as u16
    }

    /// One `Line` per pair of pixel rows, upper pixel in the foreground.
    pub fn lines(&self) -> Vec<Line<'static>> {
        (0..self.height)
            .step_by(2)
            .map(|y| {
                let spans: Vec<Span<'static>> = (0..self.width)
                    .map(|x| half_block(self.opaque(x, y), self.opaque(x, y + 1)))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn opaque(&self, x: u32, y: u32) -> Option<Color> {
        self.pixel(x, y)
            .filter(|[_, _, _, a]| *a >= OPAQUE)
            .map(|[r, g, b, _]| Color::Rgb(r, g, b))
    }
}

fn half_block(top: Option<Color>, bottom: Option<Color>) -> Span<'static> {
    match (top, bottom) {
        (None, None) => Span::raw(" "),
        (Some(top), None) => Span::styled("▀", Style::default().fg(top)),
        (None, Some(bottom)) => Span::styled("▄", Style::default().fg(bottom)),
        (Some(top), Some(bottom)) => Span::styled("▀", Style::default().fg(top).bg(bottom)),
    }
}

/// Decodes image bytes, trims transparent margins and scales down to fit.
pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteArt, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = decoded.to_rgba8();
    let (left, top, width, height) =
        opaque_bounds(&rgba).ok_or_else(|| "sprite has no visible pixels".to_string())?;
    let cropped = rgba.view(left, top, width, height).to_image();

    let scale = f64::min(
        MAX_WIDTH as f64 / width as f64,
        MAX_HEIGHT as f64 / height as f64,
    );
    let fitted = if scale < 1.0 {
        let new_width = ((width as f64 * scale).round() as u32).max(1);
        let new_height = ((height as f64 * scale).round() as u32).max(1);
        image::imageops::resize(&cropped, new_width, new_height, FilterType::Nearest)
    } else {
        cropped
    };

    let (width, height) = fitted.dimensions();
    Ok(SpriteArt {
        width,
        height,
        pixels: fitted.pixels().map(|pixel| pixel.0).collect(),
    })
}

fn opaque_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] < OPAQUE {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}
