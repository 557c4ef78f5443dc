use crate::geom::Vector;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// RGB color with normalized components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Unpacks a `0x00RRGGBB` value.
    pub fn from_packed(value: i32) -> Self {
        Self::from_bytes((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

/// Paint attributes shared by every path and text item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamState {
    pub stroke_color: Rgb,
    /// Points; `None` is a hairline.
    pub stroke_width: Option<f64>,
    pub fill_color: Option<Rgb>,
}

impl StreamState {
    pub fn new(stroke_color: Rgb, stroke_width: Option<f64>) -> Self {
        Self {
            stroke_color,
            stroke_width,
            fill_color: None,
        }
    }

    pub fn with_fill(mut self, fill: Rgb) -> Self {
        self.fill_color = Some(fill);
        self
    }
}

impl Default for StreamState {
    fn default() -> Self {
        Self::new(Rgb::BLACK, None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathItem {
    Line {
        p1: Vector,
        p2: Vector,
        state: StreamState,
    },
    /// Angles in radians, swept counter-clockwise from `start_angle` to `end_angle`.
    /// A full ellipse spans `0..TAU`.
    EllipticalArc {
        center: Vector,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        state: StreamState,
    },
    FilledPolygon {
        points: Vec<Vector>,
        state: StreamState,
    },
}

impl PathItem {
    pub fn state(&self) -> &StreamState {
        match self {
            PathItem::Line { state, .. }
            | PathItem::EllipticalArc { state, .. }
            | PathItem::FilledPolygon { state, .. } => state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub value: String,
    pub font: String,
    pub font_size: f64,
    pub location: Vector,
    /// Radians, counter-clockwise.
    pub rotation: f64,
    pub state: StreamState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Output filter name the bytes are already encoded with.
    pub codec: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub color_space: String,
    pub bits_per_component: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    pub source: ImageSource,
    /// `[a, b, c, d, e, f]` mapping the unit square onto the page.
    pub placement: [f64; 6],
}

/// What a single entity converts into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Drawable {
    Path(PathItem),
    Text(TextItem),
    Image(ImageItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageItem {
    Path(Vec<PathItem>),
    Text(TextItem),
    Image(ImageItem),
}

/// Output page, dimensions in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub items: Vec<PageItem>,
}

impl Page {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    pub fn path_items(&self) -> impl Iterator<Item = &PathItem> {
        self.items.iter().flat_map(|item| match item {
            PageItem::Path(items) => items.as_slice(),
            _ => &[][..],
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageItem> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Image(image) => Some(image),
            _ => None,
        })
    }
}

#[derive(Debug, Default)]
pub struct PathBuilder {
    items: Vec<PathItem>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: PathItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Moves the accumulated items onto the page as one path, leaving the builder empty.
    pub fn flush_into(&mut self, page: &mut Page) {
        if self.items.is_empty() {
            return;
        }
        trace!(items = self.items.len(), "flushing path");
        page.items.push(PageItem::Path(std::mem::take(&mut self.items)));
    }
}
