//! Circular arcs encoded as a polyline segment plus a bulge value.
//!
//! The bulge is `tan(θ/4)` for the included angle `θ`; positive bulges turn
//! counter-clockwise from the first vertex to the second.

use crate::geom::Vector;
use crate::model::Vertex;
use crate::page::{PathItem, StreamState};
use crate::transform::Transforms;

/// Bulges closer to zero than this are straight segments.
pub const BULGE_TOLERANCE: f64 = 1e-10;

/// Chords shorter than this are drawn straight.
pub const CHORD_EPSILON: f64 = 1e-10;

/// Arc geometry in source coordinates, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulgeArc {
    pub center: Vector,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Reconstructs the arc between `p1` and `p2`, or `None` when the segment is straight
/// or too short to carry a stable arc.
pub fn bulge_arc(p1: Vector, p2: Vector, bulge: f64) -> Option<BulgeArc> {
    if !bulge.is_finite() || bulge.abs() < BULGE_TOLERANCE {
        return None;
    }
    let included_angle = 4.0 * bulge.atan();
    let delta = p2 - p1;
    let chord = delta.length();
    if !chord.is_finite() || chord < CHORD_EPSILON {
        return None;
    }

    let half = included_angle / 2.0;
    let radius = chord / (2.0 * half.sin().abs());
    let offset = bulge.signum() * half.cos() * radius;
    let normal = Vector::xy(-delta.y / chord, delta.x / chord) * offset;
    let center = p1.midpoint(&p2) + normal;

    let (start, end) = if bulge > 0.0 { (p1, p2) } else { (p2, p1) };
    Some(BulgeArc {
        center,
        radius,
        start_angle: (start - center).angle(),
        end_angle: (end - center).angle(),
    })
}

/// The drawable for the segment leaving `v1` towards `v2`.
pub fn segment_item(
    v1: &Vertex,
    v2: &Vertex,
    transforms: &Transforms,
    state: StreamState,
) -> PathItem {
    let p1 = v1.location();
    let p2 = v2.location();
    match bulge_arc(p1, p2, v1.bulge) {
        Some(arc) => {
            let (radius_x, radius_y) = transforms.magnitude(arc.radius);
            PathItem::EllipticalArc {
                center: transforms.point(arc.center),
                radius_x,
                radius_y,
                rotation: 0.0,
                start_angle: arc.start_angle,
                end_angle: arc.end_angle,
                state,
            }
        }
        None => PathItem::Line {
            p1: transforms.point(p1),
            p2: transforms.point(p2),
            state,
        },
    }
}
