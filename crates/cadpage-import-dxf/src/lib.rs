use anyhow::{Context, Result};
use cadpage_core::geom::Vector;
use cadpage_core::model::{
    Arc, Circle, Color, DimStyle, Dimension, DimensionKind, Document, Entity, EntityKind,
    Header, Image, Layer, Line, LineWeight, Point, Polyline, Solid, Text, Vertex, Viewport,
};
use cadpage_core::page::Rgb;
use dxf::entities::EntityType;
use dxf::enums::DimensionType;
use dxf::objects::ObjectType;
use dxf::{DrawingItem, Handle};
use std::path::Path;
use tracing::debug;

pub fn import_dxf(path: &Path) -> Result<Document> {
    let drawing = dxf::Drawing::load_file(path).with_context(|| format!("load DXF: {path:?}"))?;
    let document = document_from_drawing(&drawing);
    debug!(
        layers = document.layers.len(),
        entities = document.entities.len(),
        dim_styles = document.dim_styles.len(),
        "imported DXF"
    );
    Ok(document)
}

/// Copies everything the page conversion reads out of a loaded drawing.
pub fn document_from_drawing(drawing: &dxf::Drawing) -> Document {
    let header = Header {
        drawing_units: drawing.header.drawing_units as i16,
        unit_format: drawing.header.unit_format as i16,
        unit_precision: drawing.header.unit_precision,
    };

    let layers = drawing
        .layers()
        .map(|layer| Layer {
            name: layer.name.clone(),
            color: convert_color(&layer.color),
            true_color: None,
            line_weight: LineWeight::from_raw(layer.line_weight.raw_value()),
            is_on: layer.is_layer_on,
        })
        .collect();

    let dim_styles = drawing
        .dim_styles()
        .map(|style| DimStyle {
            name: style.name.clone(),
            text_height: style.dimensioning_text_height,
            extension_line_offset: style.dimension_extension_line_offset,
            extension_line_extension: style.dimension_extension_line_extension,
            dimension_line_gap: style.dimension_line_gap,
            arrow_size: style.dimensioning_arrow_size,
            tick_size: style.dimensioning_tick_size,
            scale: style.dimensioning_scale_factor,
        })
        .collect();

    let viewport = drawing
        .view_ports()
        .find(|vp| vp.name.eq_ignore_ascii_case("*ACTIVE"))
        .map(|vp| Viewport {
            lower_left: point(&vp.lower_left),
        })
        .unwrap_or_default();

    let entities = drawing
        .entities()
        .map(|ent| Entity {
            layer: ent.common.layer.clone(),
            color: convert_color(&ent.common.color),
            true_color: match ent.common.color_24_bit {
                0 => None,
                packed => Some(Rgb::from_packed(packed)),
            },
            line_weight: LineWeight::from_raw(ent.common.lineweight_enum_value),
            kind: convert_kind(drawing, &ent.specific),
        })
        .collect();

    Document {
        header,
        layers,
        entities,
        dim_styles,
        viewport,
    }
}

fn convert_kind(drawing: &dxf::Drawing, specific: &EntityType) -> EntityKind {
    match specific {
        EntityType::Line(line) => EntityKind::Line(Line {
            p1: point(&line.p1),
            p2: point(&line.p2),
        }),
        EntityType::ModelPoint(p) => EntityKind::Point(Point {
            location: point(&p.location),
            thickness: p.thickness,
        }),
        EntityType::Circle(circle) => EntityKind::Circle(Circle {
            center: point(&circle.center),
            radius: circle.radius,
        }),
        EntityType::Arc(arc) => EntityKind::Arc(Arc {
            center: point(&arc.center),
            radius: arc.radius,
            start_angle: arc.start_angle,
            end_angle: arc.end_angle,
        }),
        EntityType::LwPolyline(poly) => EntityKind::LwPolyline(Polyline {
            vertices: poly
                .vertices
                .iter()
                .map(|v| Vertex::new(v.x, v.y, v.bulge))
                .collect(),
            closed: poly.is_closed(),
        }),
        EntityType::Polyline(poly) => EntityKind::Polyline(Polyline {
            vertices: poly
                .vertices()
                .map(|v| Vertex::new(v.location.x, v.location.y, v.bulge))
                .collect(),
            closed: poly.is_closed(),
        }),
        EntityType::Solid(solid) => EntityKind::Solid(Solid {
            first_corner: point(&solid.first_corner),
            second_corner: point(&solid.second_corner),
            third_corner: point(&solid.third_corner),
            fourth_corner: point(&solid.fourth_corner),
        }),
        EntityType::Text(t) => EntityKind::Text(Text {
            value: t.value.clone(),
            location: point(&t.location),
            height: t.text_height,
            rotation: t.rotation,
        }),
        EntityType::RotatedDimension(d) => {
            let base = &d.dimension_base;
            let kind = match base.dimension_type {
                DimensionType::Aligned => DimensionKind::Aligned,
                DimensionType::RotatedHorizontalOrVertical => DimensionKind::Rotated {
                    angle_degrees: d.rotation_angle,
                },
                other => DimensionKind::Other(format!("{other:?}").to_ascii_uppercase()),
            };
            EntityKind::Dimension(Dimension {
                kind,
                style_name: base.dimension_style_name.clone(),
                text: Some(base.text.clone()),
                definition_point_1: point(&base.definition_point_1),
                definition_point_2: point(&d.definition_point_2),
                definition_point_3: point(&d.definition_point_3),
            })
        }
        EntityType::RadialDimension(d) => other_dimension("RADIAL", &d.dimension_base),
        EntityType::DiameterDimension(d) => other_dimension("DIAMETER", &d.dimension_base),
        EntityType::AngularThreePointDimension(d) => {
            other_dimension("ANGULAR", &d.dimension_base)
        }
        EntityType::OrdinateDimension(d) => other_dimension("ORDINATE", &d.dimension_base),
        EntityType::Image(img) => match image_file_path(drawing, img) {
            Some(file_path) => EntityKind::Image(Image {
                file_path,
                location: point(&img.location),
                u_vector: vector(&img.u_vector),
                v_vector: vector(&img.v_vector),
                pixel_width: img.image_size.x,
                pixel_height: img.image_size.y,
            }),
            None => EntityKind::Unsupported("IMAGE".to_string()),
        },
        EntityType::Insert(_) => EntityKind::Unsupported("INSERT".to_string()),
        EntityType::Spline(_) => EntityKind::Unsupported("SPLINE".to_string()),
        EntityType::Ellipse(_) => EntityKind::Unsupported("ELLIPSE".to_string()),
        EntityType::MText(_) => EntityKind::Unsupported("MTEXT".to_string()),
        _ => EntityKind::Unsupported("UNSUPPORTED".to_string()),
    }
}

fn other_dimension(name: &str, base: &dxf::entities::DimensionBase) -> EntityKind {
    EntityKind::Dimension(Dimension {
        kind: DimensionKind::Other(name.to_string()),
        style_name: base.dimension_style_name.clone(),
        text: Some(base.text.clone()),
        definition_point_1: point(&base.definition_point_1),
        definition_point_2: Vector::ZERO,
        definition_point_3: Vector::ZERO,
    })
}

/// Follows the entity's hex handle reference to its IMAGEDEF object.
fn image_file_path(drawing: &dxf::Drawing, img: &dxf::entities::Image) -> Option<String> {
    let handle = u64::from_str_radix(img.image_def_reference.trim(), 16).ok()?;
    match drawing.item_by_handle(Handle(handle))? {
        DrawingItem::Object(obj) => match &obj.specific {
            ObjectType::ImageDefinition(def) => Some(def.file_path.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn convert_color(color: &dxf::Color) -> Color {
    if color.is_by_layer() {
        Color::ByLayer
    } else if color.is_by_block() {
        Color::ByBlock
    } else {
        color.index().map(Color::Index).unwrap_or_default()
    }
}

fn point(p: &dxf::Point) -> Vector {
    Vector::new(p.x, p.y, p.z)
}

fn vector(v: &dxf::Vector) -> Vector {
    Vector::new(v.x, v.y, v.z)
}
