//! Effective stroke color and width for an entity on its layer.

use crate::model::{Color, Entity, Layer, LineWeight};
use crate::page::{Rgb, StreamState};

const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;

/// Smallest stroke width the output honours, in points.
pub const MIN_STROKE_WIDTH: f64 = 1.0;

/// True color, then the indexed color (by-layer falls back to the layer), then black.
pub fn resolve_color(entity: &Entity, layer: &Layer) -> Rgb {
    if let Some(rgb) = entity.true_color {
        return rgb;
    }
    match entity.color {
        Color::Index(index) => index_to_rgb(index),
        Color::ByLayer => layer_color(layer),
        Color::ByBlock => Rgb::BLACK,
    }
}

fn layer_color(layer: &Layer) -> Rgb {
    if let Some(rgb) = layer.true_color {
        return rgb;
    }
    match layer.color {
        Color::Index(index) => index_to_rgb(index),
        Color::ByLayer | Color::ByBlock => Rgb::BLACK,
    }
}

/// Stroke width in points; `None` means hairline.
pub fn resolve_stroke_width(entity: &Entity, layer: &Layer) -> Option<f64> {
    let weight = match entity.line_weight {
        LineWeight::ByLayer => layer.line_weight,
        other => other,
    };
    match weight {
        LineWeight::Hundredths(0) => None,
        LineWeight::Hundredths(h) if h > 0 => {
            Some(h as f64 / 100.0 / MM_PER_INCH * POINTS_PER_INCH)
        }
        _ => Some(MIN_STROKE_WIDTH),
    }
}

pub fn resolve_stream_state(entity: &Entity, layer: &Layer) -> StreamState {
    StreamState::new(
        resolve_color(entity, layer),
        resolve_stroke_width(entity, layer),
    )
}

/// Palette lookup; pure white collapses to black so strokes stay visible on a white page.
pub fn index_to_rgb(index: u8) -> Rgb {
    let (r, g, b) = aci_palette(index);
    if (r, g, b) == (255, 255, 255) {
        Rgb::BLACK
    } else {
        Rgb::from_bytes(r, g, b)
    }
}

/// The 256-entry AutoCAD Color Index palette.
///
/// Indices 10..=249 are 24 hues at 15° steps, each with five brightness levels
/// alternating between full and half saturation.
pub fn aci_palette(index: u8) -> (u8, u8, u8) {
    match index {
        0 => (0, 0, 0),
        1 => (255, 0, 0),
        2 => (255, 255, 0),
        3 => (0, 255, 0),
        4 => (0, 255, 255),
        5 => (0, 0, 255),
        6 => (255, 0, 255),
        7 => (255, 255, 255),
        8 => (128, 128, 128),
        9 => (192, 192, 192),
        10..=249 => {
            const VALUES: [f64; 5] = [1.0, 0.8, 0.6, 0.5, 0.3];
            let offset = index - 10;
            let hue = (offset / 10) as f64 * 15.0;
            let step = (offset % 10) as usize;
            let saturation = if step % 2 == 0 { 1.0 } else { 0.5 };
            hsv_to_bytes(hue, saturation, VALUES[step / 2])
        }
        250 => (51, 51, 51),
        251 => (80, 80, 80),
        252 => (105, 105, 105),
        253 => (130, 130, 130),
        254 => (190, 190, 190),
        255 => (255, 255, 255),
    }
}

fn hsv_to_bytes(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let max = value * 255.0;
    let min = max * (1.0 - saturation);
    let sector = (hue / 60.0).floor();
    let frac = hue / 60.0 - sector;
    let rising = min + (max - min) * frac;
    let falling = max - (max - min) * frac;
    let (r, g, b) = match sector as u8 {
        0 => (max, rising, min),
        1 => (falling, max, min),
        2 => (min, max, rising),
        3 => (min, falling, max),
        4 => (rising, min, max),
        _ => (max, min, falling),
    };
    (r as u8, g as u8, b as u8)
}
