//! Linear dimension annotations: extension lines, the dimension line split
//! around its text, arrowheads or ticks, and the measurement text.

use crate::error::Result;
use crate::geom::Vector;
use crate::model::{DimStyle, Dimension, DimensionKind, Document};
use crate::page::{Drawable, PathItem, StreamState, TextItem};
use crate::transform::Transforms;
use crate::units::LengthFormat;
use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

/// Marker standing in for the measured value inside override text.
pub const MEASUREMENT_PLACEHOLDER: &str = "<>";

/// Dimension lines shorter than this get no arrowheads or ticks.
pub const MIN_DIMENSION_LINE: f64 = 1e-12;

/// Estimates rendered text width from the text and its height.
pub type TextWidthPolicy = fn(&str, f64) -> f64;

/// Average glyph advance taken as 0.6 of the text height.
pub fn estimate_text_width(text: &str, text_height: f64) -> f64 {
    text_height * text.chars().count() as f64 * 0.6
}

/// Sizes from a dimension style with its overall scale applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionStyleSettings {
    pub text_height: f64,
    pub extension_line_offset: f64,
    pub extension_line_extension: f64,
    pub dimension_line_gap: f64,
    pub arrow_size: f64,
    pub tick_size: f64,
}

impl From<&DimStyle> for DimensionStyleSettings {
    fn from(style: &DimStyle) -> Self {
        let scale = if style.scale > 0.0 { style.scale } else { 1.0 };
        Self {
            text_height: style.text_height * scale,
            extension_line_offset: style.extension_line_offset * scale,
            extension_line_extension: style.extension_line_extension * scale,
            dimension_line_gap: style.dimension_line_gap * scale,
            arrow_size: style.arrow_size * scale,
            tick_size: style.tick_size * scale,
        }
    }
}

/// Resolves each style name once per conversion.
#[derive(Debug, Default)]
pub struct DimensionStyleCache {
    settings: HashMap<String, DimensionStyleSettings>,
}

impl DimensionStyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, document: &Document, name: &str) -> DimensionStyleSettings {
        *self
            .settings
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| match document.dim_style(name) {
                Some(style) => DimensionStyleSettings::from(style),
                None => DimensionStyleSettings::from(&DimStyle::standard()),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureDirection {
    /// Along the line between the two extension line origins.
    Aligned,
    /// Along a fixed angle, in radians.
    Rotated(f64),
}

/// The three definition points shared by aligned and rotated dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDimension {
    pub origin_1: Vector,
    pub origin_2: Vector,
    pub placement: Vector,
    pub direction: MeasureDirection,
}

impl LinearDimension {
    /// `None` for dimension kinds other than aligned and rotated.
    pub fn from_dimension(dimension: &Dimension) -> Option<Self> {
        let direction = match &dimension.kind {
            DimensionKind::Aligned => MeasureDirection::Aligned,
            DimensionKind::Rotated { angle_degrees } => {
                MeasureDirection::Rotated(angle_degrees.to_radians())
            }
            DimensionKind::Other(_) => return None,
        };
        let flat = |v: Vector| Vector::xy(v.x, v.y);
        Some(Self {
            origin_1: flat(dimension.definition_point_2),
            origin_2: flat(dimension.definition_point_3),
            placement: flat(dimension.definition_point_1),
            direction,
        })
    }

    /// Unit vector the measurement is taken along.
    pub fn axis(&self) -> Vector {
        match self.direction {
            MeasureDirection::Aligned => (self.origin_2 - self.origin_1)
                .normalized()
                .unwrap_or(Vector::X_AXIS),
            MeasureDirection::Rotated(angle) => Vector::xy(angle.cos(), angle.sin()),
        }
    }

    pub fn length(&self) -> f64 {
        (self.origin_2 - self.origin_1).dot(&self.axis()).abs()
    }
}

/// Dimension geometry in source coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDimensionResult {
    pub length: f64,
    pub extension_lines: Vec<(Vector, Vector)>,
    pub dimension_line_segments: Vec<(Vector, Vector)>,
    pub arrowheads: Vec<[Vector; 3]>,
    pub ticks: Vec<(Vector, Vector)>,
    /// Baseline start of the text.
    pub text_location: Vector,
    /// Radians, kept within (-π/2, π/2] so text never reads upside down.
    pub text_rotation: f64,
}

pub fn linear_dimension_geometry(
    dim: &LinearDimension,
    text_width: f64,
    settings: &DimensionStyleSettings,
) -> LinearDimensionResult {
    let axis = dim.axis();
    let normal = axis.perpendicular();

    let foot_1 = dim.origin_1 + normal * (dim.placement - dim.origin_1).dot(&normal);
    let foot_2 = dim.origin_2 + normal * (dim.placement - dim.origin_2).dot(&normal);

    let mut extension_lines = Vec::with_capacity(2);
    for (origin, foot) in [(dim.origin_1, foot_1), (dim.origin_2, foot_2)] {
        let reach = foot - origin;
        let Some(dir) = reach.normalized() else {
            continue;
        };
        if reach.length() + settings.extension_line_extension <= settings.extension_line_offset {
            continue;
        }
        extension_lines.push((
            origin + dir * settings.extension_line_offset,
            foot + dir * settings.extension_line_extension,
        ));
    }

    let line = foot_2 - foot_1;
    let line_length = line.length();
    let line_dir = line.normalized().unwrap_or(axis);
    let line_normal = line_dir.perpendicular();

    let text_dir = if axis.angle() > FRAC_PI_2 + 1e-9 || axis.angle() <= -FRAC_PI_2 + 1e-9 {
        -axis
    } else {
        axis
    };
    let text_normal = text_dir.perpendicular();
    let mid = foot_1.midpoint(&foot_2);

    let half_gap = text_width / 2.0 + settings.dimension_line_gap;
    let text_inline = text_width > 0.0 && 2.0 * half_gap < line_length;
    let (dimension_line_segments, text_location) = if text_inline {
        (
            vec![
                (foot_1, mid - line_dir * half_gap),
                (mid + line_dir * half_gap, foot_2),
            ],
            mid - text_dir * (text_width / 2.0) - text_normal * (settings.text_height / 2.0),
        )
    } else {
        (
            vec![(foot_1, foot_2)],
            mid - text_dir * (text_width / 2.0) + text_normal * settings.dimension_line_gap,
        )
    };

    let mut arrowheads = Vec::new();
    let mut ticks = Vec::new();
    let has_line = line_length >= MIN_DIMENSION_LINE;
    if has_line && settings.tick_size > 0.0 {
        let slant = (line_dir + line_normal)
            .normalized()
            .unwrap_or(line_normal);
        for foot in [foot_1, foot_2] {
            ticks.push((foot - slant * settings.tick_size, foot + slant * settings.tick_size));
        }
    } else if has_line && settings.arrow_size > 0.0 {
        let half_width = settings.arrow_size / 6.0;
        for (tip, inward) in [(foot_1, line_dir), (foot_2, -line_dir)] {
            let base = tip + inward * settings.arrow_size;
            arrowheads.push([
                tip,
                base + line_normal * half_width,
                base - line_normal * half_width,
            ]);
        }
    }

    LinearDimensionResult {
        length: dim.length(),
        extension_lines,
        dimension_line_segments,
        arrowheads,
        ticks,
        text_location,
        text_rotation: text_dir.angle(),
    }
}

/// Text to display for a dimension: the override, the measurement, or both.
///
/// `format` is only consulted when the measurement is shown, so a header with
/// unusable unit settings fails only for dimensions that need it.
pub fn dimension_text(
    override_text: Option<&str>,
    length: f64,
    format: impl FnOnce() -> Result<LengthFormat>,
) -> Result<String> {
    match override_text {
        None | Some("") | Some(MEASUREMENT_PLACEHOLDER) => Ok(format()?.format(length)),
        Some(" ") => Ok(String::new()),
        Some(text) if text.contains(MEASUREMENT_PLACEHOLDER) => {
            let measured = format()?.format(length);
            Ok(text.replace(MEASUREMENT_PLACEHOLDER, &measured))
        }
        Some(text) => Ok(text.to_string()),
    }
}

/// Everything needed to emit a dimension besides the entity itself.
pub struct DimensionContext<'a> {
    pub document: &'a Document,
    pub transforms: &'a Transforms,
    pub font: &'a str,
    pub text_width: TextWidthPolicy,
}

/// `Ok(None)` for unsupported dimension kinds; nothing is emitted for them.
pub fn convert_dimension(
    dimension: &Dimension,
    settings: &DimensionStyleSettings,
    state: StreamState,
    ctx: &DimensionContext<'_>,
) -> Result<Option<Vec<Drawable>>> {
    let Some(linear) = LinearDimension::from_dimension(dimension) else {
        return Ok(None);
    };

    let text = dimension_text(dimension.text.as_deref(), linear.length(), || {
        LengthFormat::from_header(&ctx.document.header)
    })?;
    let text_width = if text.is_empty() {
        0.0
    } else {
        (ctx.text_width)(&text, settings.text_height)
    };
    let geometry = linear_dimension_geometry(&linear, text_width, settings);

    let transforms = ctx.transforms;
    let line = |(p1, p2): &(Vector, Vector)| {
        Drawable::Path(PathItem::Line {
            p1: transforms.point(*p1),
            p2: transforms.point(*p2),
            state,
        })
    };

    let mut items: Vec<Drawable> = geometry
        .extension_lines
        .iter()
        .chain(&geometry.dimension_line_segments)
        .chain(&geometry.ticks)
        .map(line)
        .collect();
    items.extend(geometry.arrowheads.iter().map(|triangle| {
        Drawable::Path(PathItem::FilledPolygon {
            points: triangle.iter().map(|p| transforms.point(*p)).collect(),
            state: state.with_fill(state.stroke_color),
        })
    }));

    let text_dir = Vector::xy(geometry.text_rotation.cos(), geometry.text_rotation.sin());
    let (_, font_size) = transforms.magnitude(settings.text_height);
    items.push(Drawable::Text(TextItem {
        value: text,
        font: ctx.font.to_string(),
        font_size,
        location: transforms.point(geometry.text_location),
        rotation: transforms.magnitude.transform_magnitude(text_dir).angle(),
        state,
    }));

    Ok(Some(items))
}
