use cadpage_core::dimension::{
    convert_dimension, dimension_text, estimate_text_width, linear_dimension_geometry,
    DimensionContext, DimensionStyleCache, DimensionStyleSettings, LinearDimension,
    MeasureDirection,
};
use cadpage_core::error::ConvertError;
use cadpage_core::geom::Vector;
use cadpage_core::model::{DimStyle, Dimension, DimensionKind, Document, Header, Viewport};
use cadpage_core::page::{Drawable, PathItem, StreamState};
use cadpage_core::transform::{build_transforms, TransformMode, Transforms};
use cadpage_core::units::{DrawingUnits, LengthFormat, UnitFormat};
use std::f64::consts::FRAC_PI_2;

fn settings() -> DimensionStyleSettings {
    DimensionStyleSettings {
        text_height: 1.0,
        extension_line_offset: 0.5,
        extension_line_extension: 0.25,
        dimension_line_gap: 0.5,
        arrow_size: 1.0,
        tick_size: 0.0,
    }
}

fn horizontal(x2: f64) -> LinearDimension {
    LinearDimension {
        origin_1: Vector::xy(0.0, 0.0),
        origin_2: Vector::xy(x2, 0.0),
        placement: Vector::xy(x2 / 2.0, 2.0),
        direction: MeasureDirection::Aligned,
    }
}

fn identity() -> Transforms {
    build_transforms(
        &TransformMode::UniformScale {
            scale: 1.0 / 72.0,
        },
        &Viewport::default(),
    )
}

fn decimal(precision: i16) -> Document {
    Document {
        header: Header {
            drawing_units: 0,
            unit_format: 2,
            unit_precision: precision,
        },
        ..Document::default()
    }
}

fn aligned(text: Option<&str>) -> Dimension {
    Dimension {
        kind: DimensionKind::Aligned,
        style_name: "STANDARD".to_string(),
        text: text.map(str::to_string),
        definition_point_1: Vector::xy(2.5, 1.0),
        definition_point_2: Vector::xy(0.0, 0.0),
        definition_point_3: Vector::xy(3.0, 4.0),
    }
}

fn assert_close(expected: Vector, actual: Vector) {
    assert!(
        expected.approx_eq(&actual, 1e-9),
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn measures_along_the_dimension_direction() {
    let mut dim = LinearDimension {
        origin_1: Vector::xy(0.0, 0.0),
        origin_2: Vector::xy(3.0, 4.0),
        placement: Vector::xy(0.0, 5.0),
        direction: MeasureDirection::Aligned,
    };
    assert!((dim.length() - 5.0).abs() < 1e-12);

    dim.direction = MeasureDirection::Rotated(0.0);
    assert!((dim.length() - 3.0).abs() < 1e-12);

    dim.direction = MeasureDirection::Rotated(FRAC_PI_2);
    assert!((dim.length() - 4.0).abs() < 1e-12);
}

#[test]
fn text_is_split_into_the_dimension_line_when_it_fits() {
    let geometry = linear_dimension_geometry(&horizontal(10.0), 3.0, &settings());

    assert!((geometry.length - 10.0).abs() < 1e-12);

    assert_eq!(2, geometry.extension_lines.len());
    assert_close(Vector::xy(0.0, 0.5), geometry.extension_lines[0].0);
    assert_close(Vector::xy(0.0, 2.25), geometry.extension_lines[0].1);
    assert_close(Vector::xy(10.0, 0.5), geometry.extension_lines[1].0);
    assert_close(Vector::xy(10.0, 2.25), geometry.extension_lines[1].1);

    assert_eq!(2, geometry.dimension_line_segments.len());
    assert_close(Vector::xy(0.0, 2.0), geometry.dimension_line_segments[0].0);
    assert_close(Vector::xy(3.0, 2.0), geometry.dimension_line_segments[0].1);
    assert_close(Vector::xy(7.0, 2.0), geometry.dimension_line_segments[1].0);
    assert_close(Vector::xy(10.0, 2.0), geometry.dimension_line_segments[1].1);

    assert_close(Vector::xy(3.5, 1.5), geometry.text_location);
    assert!(geometry.text_rotation.abs() < 1e-12);

    assert_eq!(2, geometry.arrowheads.len());
    let [tip, a, b] = geometry.arrowheads[0];
    assert_close(Vector::xy(0.0, 2.0), tip);
    assert_close(Vector::xy(1.0, 2.0 + 1.0 / 6.0), a);
    assert_close(Vector::xy(1.0, 2.0 - 1.0 / 6.0), b);
    let [tip, a, b] = geometry.arrowheads[1];
    assert_close(Vector::xy(10.0, 2.0), tip);
    assert_close(Vector::xy(9.0, 2.0 + 1.0 / 6.0), a);
    assert_close(Vector::xy(9.0, 2.0 - 1.0 / 6.0), b);
    assert!(geometry.ticks.is_empty());
}

#[test]
fn text_sits_above_a_line_too_short_to_split() {
    let geometry = linear_dimension_geometry(&horizontal(2.0), 3.0, &settings());
    assert_eq!(1, geometry.dimension_line_segments.len());
    assert_close(Vector::xy(0.0, 2.0), geometry.dimension_line_segments[0].0);
    assert_close(Vector::xy(2.0, 2.0), geometry.dimension_line_segments[0].1);
    assert_close(Vector::xy(-0.5, 2.5), geometry.text_location);
}

#[test]
fn empty_text_leaves_the_line_whole() {
    let geometry = linear_dimension_geometry(&horizontal(10.0), 0.0, &settings());
    assert_eq!(1, geometry.dimension_line_segments.len());
}

#[test]
fn tick_size_replaces_arrowheads() {
    let ticked = DimensionStyleSettings {
        tick_size: 0.5,
        ..settings()
    };
    let geometry = linear_dimension_geometry(&horizontal(10.0), 3.0, &ticked);
    assert!(geometry.arrowheads.is_empty());
    assert_eq!(2, geometry.ticks.len());
    let (a, b) = geometry.ticks[0];
    assert_close(Vector::xy(0.0, 2.0), a.midpoint(&b));
    assert!(((b - a).length() - 1.0).abs() < 1e-9);
}

#[test]
fn text_never_reads_upside_down() {
    let right_to_left = LinearDimension {
        origin_1: Vector::xy(10.0, 0.0),
        origin_2: Vector::xy(0.0, 0.0),
        placement: Vector::xy(5.0, -2.0),
        direction: MeasureDirection::Aligned,
    };
    let geometry = linear_dimension_geometry(&right_to_left, 3.0, &settings());
    assert!(geometry.text_rotation.abs() < 1e-9);

    let vertical = LinearDimension {
        origin_1: Vector::xy(0.0, 0.0),
        origin_2: Vector::xy(0.0, 10.0),
        placement: Vector::xy(-2.0, 5.0),
        direction: MeasureDirection::Rotated(FRAC_PI_2),
    };
    let geometry = linear_dimension_geometry(&vertical, 3.0, &settings());
    assert!((geometry.text_rotation - FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn override_text_rules() {
    let format = || Ok(LengthFormat::new(DrawingUnits::English, UnitFormat::Decimal, 2));
    assert_eq!("5.00", dimension_text(None, 5.0, format).unwrap());
    assert_eq!("5.00", dimension_text(Some(""), 5.0, format).unwrap());
    assert_eq!("5.00", dimension_text(Some("<>"), 5.0, format).unwrap());
    assert_eq!("", dimension_text(Some(" "), 5.0, format).unwrap());
    assert_eq!("5.00 TYP", dimension_text(Some("<> TYP"), 5.0, format).unwrap());
    assert_eq!("WIDTH", dimension_text(Some("WIDTH"), 5.0, format).unwrap());
}

#[test]
fn literal_override_does_not_need_unit_settings() {
    let failing = || {
        Err(ConvertError::InvalidUnitEnumeration {
            field: "unit format",
            value: 0,
        })
    };
    assert_eq!("WIDTH", dimension_text(Some("WIDTH"), 5.0, failing).unwrap());
    assert!(dimension_text(None, 5.0, failing).is_err());
}

#[test]
fn text_width_heuristic() {
    assert!((estimate_text_width("5.00", 0.18) - 0.18 * 4.0 * 0.6).abs() < 1e-12);
    assert_eq!(0.0, estimate_text_width("", 1.0));
}

#[test]
fn style_cache_scales_and_falls_back_to_standard() {
    let mut document = Document::default();
    document.dim_styles.push(DimStyle {
        name: "Big".to_string(),
        scale: 2.0,
        ..DimStyle::standard()
    });
    let mut cache = DimensionStyleCache::new();

    let big = cache.get(&document, "BIG");
    assert!((big.text_height - 0.36).abs() < 1e-12);
    assert!((big.arrow_size - 0.36).abs() < 1e-12);

    let missing = cache.get(&document, "nope");
    assert_eq!(DimensionStyleSettings::from(&DimStyle::standard()), missing);
}

#[test]
fn converts_to_lines_arrowheads_and_text() {
    let document = decimal(2);
    let transforms = identity();
    let ctx = DimensionContext {
        document: &document,
        transforms: &transforms,
        font: "Helvetica",
        text_width: estimate_text_width,
    };
    let state = StreamState::default();
    let drawables = convert_dimension(&aligned(None), &settings(), state, &ctx)
        .unwrap()
        .expect("aligned dimensions convert");

    let lines = drawables
        .iter()
        .filter(|d| matches!(d, Drawable::Path(PathItem::Line { .. })))
        .count();
    let arrows: Vec<_> = drawables
        .iter()
        .filter_map(|d| match d {
            Drawable::Path(PathItem::FilledPolygon { points, state }) => Some((points, state)),
            _ => None,
        })
        .collect();
    assert!(lines >= 3);
    assert_eq!(2, arrows.len());
    assert!(arrows
        .iter()
        .all(|(points, state)| points.len() == 3 && state.fill_color.is_some()));

    match drawables.last() {
        Some(Drawable::Text(text)) => {
            assert_eq!("5.00", text.value);
            assert!((text.font_size - 1.0).abs() < 1e-9);
            assert_eq!("Helvetica", text.font);
        }
        other => panic!("expected trailing text, got {other:?}"),
    }
}

#[test]
fn single_space_override_renders_empty_text() {
    let document = decimal(2);
    let transforms = identity();
    let ctx = DimensionContext {
        document: &document,
        transforms: &transforms,
        font: "Helvetica",
        text_width: estimate_text_width,
    };
    let drawables = convert_dimension(&aligned(Some(" ")), &settings(), StreamState::default(), &ctx)
        .unwrap()
        .unwrap();
    match drawables.last() {
        Some(Drawable::Text(text)) => assert_eq!("", text.value),
        other => panic!("expected trailing text, got {other:?}"),
    }
}

#[test]
fn other_dimension_kinds_are_not_converted() {
    let document = decimal(2);
    let transforms = identity();
    let ctx = DimensionContext {
        document: &document,
        transforms: &transforms,
        font: "Helvetica",
        text_width: estimate_text_width,
    };
    let radial = Dimension {
        kind: DimensionKind::Other("RADIAL".to_string()),
        ..aligned(None)
    };
    assert_eq!(
        None,
        convert_dimension(&radial, &settings(), StreamState::default(), &ctx).unwrap()
    );
}

#[test]
fn coincident_origins_draw_no_terminators() {
    let geometry = linear_dimension_geometry(&horizontal(0.0), 0.0, &settings());
    assert_eq!(0.0, geometry.length);
    assert!(geometry.arrowheads.is_empty());
    assert!(geometry.ticks.is_empty());

    let ticked = DimensionStyleSettings {
        tick_size: 0.5,
        ..settings()
    };
    let geometry = linear_dimension_geometry(&horizontal(0.0), 0.0, &ticked);
    assert!(geometry.ticks.is_empty());
    assert!(geometry.arrowheads.is_empty());
}
