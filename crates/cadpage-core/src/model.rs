use crate::geom::Vector;
use crate::page::Rgb;
use serde::{Deserialize, Serialize};

/// Indexed or symbolic entity/layer color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    ByBlock,
    #[default]
    ByLayer,
    Index(u8),
}

/// Nominal stroke thickness in hundredths of a millimetre, with its sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineWeight {
    #[default]
    ByLayer,
    ByBlock,
    Default,
    Hundredths(i16),
}

impl LineWeight {
    /// Maps the raw DXF group 370 value onto the sentinels.
    pub fn from_raw(value: i16) -> Self {
        match value {
            -1 => LineWeight::ByLayer,
            -2 => LineWeight::ByBlock,
            -3 => LineWeight::Default,
            v => LineWeight::Hundredths(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub color: Color,
    pub true_color: Option<Rgb>,
    pub line_weight: LineWeight,
    pub is_on: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::Index(7),
            true_color: None,
            line_weight: LineWeight::Default,
            is_on: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub p1: Vector,
    pub p2: Vector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub location: Vector,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vector,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Vector,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// A polyline vertex; `bulge` describes the segment leaving this vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl Vertex {
    pub const fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    pub fn location(&self) -> Vector {
        Vector::xy(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<Vertex>,
    pub closed: bool,
}

/// Filled quadrilateral. Corners are stored in the source's zig-zag order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub first_corner: Vector,
    pub second_corner: Vector,
    pub third_corner: Vector,
    pub fourth_corner: Vector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    pub location: Vector,
    pub height: f64,
    /// Degrees.
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DimensionKind {
    Aligned,
    /// Rotated, horizontal or vertical: measured along `angle_degrees`.
    Rotated { angle_degrees: f64 },
    /// Angular, radial, ordinate, ... kept by name for diagnostics.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub kind: DimensionKind,
    pub style_name: String,
    /// Override text. `None`, `""` and `"<>"` request the measured value.
    pub text: Option<String>,
    /// Dimension line placement point.
    pub definition_point_1: Vector,
    /// First extension line origin.
    pub definition_point_2: Vector,
    /// Second extension line origin.
    pub definition_point_3: Vector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub file_path: String,
    pub location: Vector,
    /// One pixel's extent along the image's horizontal axis.
    pub u_vector: Vector,
    /// One pixel's extent along the image's vertical axis.
    pub v_vector: Vector,
    /// Width and height in pixels.
    pub pixel_width: f64,
    pub pixel_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Line(Line),
    Point(Point),
    Circle(Circle),
    Arc(Arc),
    LwPolyline(Polyline),
    Polyline(Polyline),
    Solid(Solid),
    Text(Text),
    Dimension(Dimension),
    Image(Image),
    Unsupported(String),
}

impl EntityKind {
    pub fn name(&self) -> &str {
        match self {
            EntityKind::Line(_) => "LINE",
            EntityKind::Point(_) => "POINT",
            EntityKind::Circle(_) => "CIRCLE",
            EntityKind::Arc(_) => "ARC",
            EntityKind::LwPolyline(_) => "LWPOLYLINE",
            EntityKind::Polyline(_) => "POLYLINE",
            EntityKind::Solid(_) => "SOLID",
            EntityKind::Text(_) => "TEXT",
            EntityKind::Dimension(_) => "DIMENSION",
            EntityKind::Image(_) => "IMAGE",
            EntityKind::Unsupported(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub layer: String,
    pub color: Color,
    pub true_color: Option<Rgb>,
    pub line_weight: LineWeight,
    pub kind: EntityKind,
}

impl Entity {
    /// An entity on `layer` inheriting color and line weight from it.
    pub fn new(layer: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            layer: layer.into(),
            color: Color::ByLayer,
            true_color: None,
            line_weight: LineWeight::ByLayer,
            kind,
        }
    }
}

/// Named dimension style record, sizes in drawing units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimStyle {
    pub name: String,
    pub text_height: f64,
    pub extension_line_offset: f64,
    pub extension_line_extension: f64,
    pub dimension_line_gap: f64,
    pub arrow_size: f64,
    pub tick_size: f64,
    /// Overall scale; ignored unless positive.
    pub scale: f64,
}

impl DimStyle {
    pub const STANDARD: &'static str = "STANDARD";

    /// AutoCAD's imperial `STANDARD` values.
    pub fn standard() -> Self {
        Self {
            name: Self::STANDARD.to_string(),
            text_height: 0.18,
            extension_line_offset: 0.0625,
            extension_line_extension: 0.18,
            dimension_line_gap: 0.09,
            arrow_size: 0.18,
            tick_size: 0.0,
            scale: 1.0,
        }
    }
}

/// Header values needed for dimension text, kept as the raw codes read from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub drawing_units: i16,
    pub unit_format: i16,
    pub unit_precision: i16,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            drawing_units: 0,
            unit_format: 2,
            unit_precision: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub lower_left: Vector,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub header: Header,
    pub layers: Vec<Layer>,
    pub entities: Vec<Entity>,
    pub dim_styles: Vec<DimStyle>,
    pub viewport: Viewport,
}

impl Document {
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn dim_style(&self, name: &str) -> Option<&DimStyle> {
        self.dim_styles
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}
