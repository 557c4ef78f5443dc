use cadpage_core::convert::{convert, ConvertOptions};
use cadpage_core::geom::Vector;
use cadpage_core::model::{
    Arc, Circle, Document, Entity, EntityKind, Layer, Polyline, Text, Vertex, Viewport,
};
use cadpage_core::page::{PathItem, StreamState};
use cadpage_core::primitives::{convert_arc, convert_circle, convert_text};
use cadpage_core::transform::{build_transforms, PageRect, SourceRect, TransformMode, Transforms};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Stretches x ten times more than y.
fn stretched() -> Transforms {
    build_transforms(
        &TransformMode::Rectangles {
            source: SourceRect::new(0.0, 0.0, 10.0, 10.0),
            destination: PageRect::new(0.0, 0.0, 100.0, 10.0),
        },
        &Viewport::default(),
    )
}

fn one_point_per_unit() -> Transforms {
    build_transforms(
        &TransformMode::UniformScale { scale: 1.0 / 72.0 },
        &Viewport::default(),
    )
}

#[test]
fn arc_angles_become_radians() {
    let arc = Arc {
        center: Vector::xy(1.0, 1.0),
        radius: 2.0,
        start_angle: 90.0,
        end_angle: 180.0,
    };
    match convert_arc(&arc, &one_point_per_unit(), StreamState::default()) {
        PathItem::EllipticalArc {
            center,
            radius_x,
            radius_y,
            start_angle,
            end_angle,
            ..
        } => {
            assert!(center.approx_eq(&Vector::xy(1.0, 1.0), 1e-12));
            assert!((radius_x - 2.0).abs() < 1e-12);
            assert!((radius_y - 2.0).abs() < 1e-12);
            assert!((start_angle - FRAC_PI_2).abs() < 1e-12);
            assert!((end_angle - PI).abs() < 1e-12);
        }
        other => panic!("expected an arc, got {other:?}"),
    }
}

#[test]
fn circle_radii_follow_each_axis_scale() {
    let circle = Circle {
        center: Vector::xy(5.0, 5.0),
        radius: 2.0,
    };
    match convert_circle(&circle, &stretched(), StreamState::default()) {
        PathItem::EllipticalArc {
            center,
            radius_x,
            radius_y,
            start_angle,
            end_angle,
            ..
        } => {
            assert!(center.approx_eq(&Vector::xy(50.0, 5.0), 1e-9));
            assert!((radius_x - 20.0).abs() < 1e-9);
            assert!((radius_y - 2.0).abs() < 1e-9);
            assert_eq!(0.0, start_angle);
            assert_eq!(TAU, end_angle);
        }
        other => panic!("expected a full ellipse, got {other:?}"),
    }
}

#[test]
fn closed_heavy_polyline_emits_one_segment_per_vertex() {
    let triangle = Polyline {
        vertices: vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(4.0, 0.0, 0.0),
            Vertex::new(0.0, 3.0, 0.0),
        ],
        closed: true,
    };
    let document = Document {
        layers: vec![Layer::new("0")],
        entities: vec![Entity::new("0", EntityKind::Polyline(triangle))],
        ..Document::default()
    };
    let options = ConvertOptions::new(612.0, 792.0, 1.0 / 72.0);

    let page = convert(&document, &options).unwrap();
    let segments: Vec<(Vector, Vector)> = page
        .path_items()
        .map(|item| match item {
            PathItem::Line { p1, p2, .. } => (*p1, *p2),
            other => panic!("expected straight segments, got {other:?}"),
        })
        .collect();
    assert_eq!(3, segments.len());
    let (from, to) = segments[2];
    assert!(from.approx_eq(&Vector::xy(0.0, 3.0), 1e-12));
    assert!(to.approx_eq(&Vector::xy(0.0, 0.0), 1e-12));
}

#[test]
fn text_rotation_follows_non_uniform_scaling() {
    let text = Text {
        value: "NOTE".to_string(),
        location: Vector::xy(1.0, 1.0),
        height: 1.0,
        rotation: 45.0,
    };

    let item = convert_text(&text, &stretched(), StreamState::default(), "Helvetica");
    assert!((item.rotation - 0.1f64.atan()).abs() < 1e-12);

    let item = convert_text(&text, &one_point_per_unit(), StreamState::default(), "Helvetica");
    assert!((item.rotation - FRAC_PI_4).abs() < 1e-12);
}
