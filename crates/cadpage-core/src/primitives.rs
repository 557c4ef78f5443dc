//! One-entity conversions into page drawables.

use crate::bulge::segment_item;
use crate::color::MIN_STROKE_WIDTH;
use crate::geom::Vector;
use crate::model::{Arc, Circle, Line, Point, Polyline, Solid, Text};
use crate::page::{PathItem, StreamState, TextItem};
use crate::transform::Transforms;
use itertools::Itertools;
use std::f64::consts::TAU;

pub fn convert_line(line: &Line, transforms: &Transforms, state: StreamState) -> PathItem {
    PathItem::Line {
        p1: transforms.point(line.p1),
        p2: transforms.point(line.p2),
        state,
    }
}

/// A zero-radius full circle; its visible size comes from the stroke alone.
pub fn convert_point(point: &Point, transforms: &Transforms, state: StreamState) -> PathItem {
    let (thickness, _) = transforms.magnitude(point.thickness);
    let state = StreamState {
        stroke_width: Some(thickness.max(MIN_STROKE_WIDTH)),
        ..state
    };
    PathItem::EllipticalArc {
        center: transforms.point(point.location),
        radius_x: 0.0,
        radius_y: 0.0,
        rotation: 0.0,
        start_angle: 0.0,
        end_angle: TAU,
        state,
    }
}

pub fn convert_circle(circle: &Circle, transforms: &Transforms, state: StreamState) -> PathItem {
    let (radius_x, radius_y) = transforms.magnitude(circle.radius);
    PathItem::EllipticalArc {
        center: transforms.point(circle.center),
        radius_x,
        radius_y,
        rotation: 0.0,
        start_angle: 0.0,
        end_angle: TAU,
        state,
    }
}

pub fn convert_arc(arc: &Arc, transforms: &Transforms, state: StreamState) -> PathItem {
    let (radius_x, radius_y) = transforms.magnitude(arc.radius);
    PathItem::EllipticalArc {
        center: transforms.point(arc.center),
        radius_x,
        radius_y,
        rotation: 0.0,
        start_angle: arc.start_angle.to_radians(),
        end_angle: arc.end_angle.to_radians(),
        state,
    }
}

/// Corners 3 and 4 are swapped: the source stores them zig-zag, not around the outline.
pub fn convert_solid(solid: &Solid, transforms: &Transforms, state: StreamState) -> PathItem {
    let points = [
        solid.first_corner,
        solid.second_corner,
        solid.fourth_corner,
        solid.third_corner,
    ]
    .into_iter()
    .map(|p| transforms.point(p))
    .collect();
    PathItem::FilledPolygon {
        points,
        state: state.with_fill(state.stroke_color),
    }
}

/// One item per segment, including the closing segment of a closed polyline.
pub fn convert_polyline(
    polyline: &Polyline,
    transforms: &Transforms,
    state: StreamState,
) -> Vec<PathItem> {
    let vertices = &polyline.vertices;
    if vertices.len() < 2 {
        return Vec::new();
    }
    if polyline.closed {
        vertices
            .iter()
            .circular_tuple_windows()
            .map(|(v1, v2)| segment_item(v1, v2, transforms, state))
            .collect()
    } else {
        vertices
            .iter()
            .tuple_windows()
            .map(|(v1, v2)| segment_item(v1, v2, transforms, state))
            .collect()
    }
}

pub fn convert_text(
    text: &Text,
    transforms: &Transforms,
    state: StreamState,
    font: &str,
) -> TextItem {
    let (_, font_size) = transforms.magnitude(text.height);
    let angle = text.rotation.to_radians();
    let baseline = transforms
        .magnitude
        .transform_magnitude(Vector::xy(angle.cos(), angle.sin()));
    TextItem {
        value: text.value.clone(),
        font: font.to_string(),
        font_size,
        location: transforms.point(text.location),
        rotation: baseline.angle(),
        state,
    }
}
