use crate::color::resolve_stream_state;
use crate::dimension::{
    convert_dimension, estimate_text_width, DimensionContext, DimensionStyleCache,
    TextWidthPolicy,
};
use crate::error::{ConvertError, Result};
use crate::image::{embed_image, ContentResolver};
use crate::model::{Document, Entity, EntityKind, Layer};
use crate::page::{Drawable, Page, PageItem, PathBuilder};
use crate::primitives::{
    convert_arc, convert_circle, convert_line, convert_point, convert_polyline, convert_solid,
    convert_text,
};
use crate::transform::{build_transforms, PageRect, SourceRect, TransformMode, Transforms};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// US Letter, in points.
pub const DEFAULT_PAGE_WIDTH: f64 = 612.0;
pub const DEFAULT_PAGE_HEIGHT: f64 = 792.0;
pub const DEFAULT_FONT: &str = "Helvetica";

pub struct ConvertOptions {
    pub page_width: f64,
    pub page_height: f64,
    pub transform: TransformMode,
    pub font: String,
    pub text_width: TextWidthPolicy,
    resolver: Option<Box<dyn ContentResolver>>,
}

impl ConvertOptions {
    /// Uniform scaling: one drawing unit becomes `scale` inches on the page.
    pub fn new(page_width: f64, page_height: f64, scale: f64) -> Self {
        Self {
            page_width,
            page_height,
            transform: TransformMode::UniformScale { scale },
            font: DEFAULT_FONT.to_string(),
            text_width: estimate_text_width,
            resolver: None,
        }
    }

    /// Maps `source` onto `destination`. The rectangles come as a pair: supplying only
    /// one is rejected, supplying neither falls back to uniform scale 1.
    pub fn with_rects(
        page_width: f64,
        page_height: f64,
        source: Option<SourceRect>,
        destination: Option<PageRect>,
    ) -> Result<Self> {
        let transform = match (source, destination) {
            (Some(source), Some(destination)) => {
                let extents = [
                    source.width(),
                    source.height(),
                    destination.width(),
                    destination.height(),
                ];
                if extents.iter().any(|e| !e.is_finite() || *e <= 0.0) {
                    return Err(ConvertError::InvalidOptions(
                        "source and page rectangles must have positive extents",
                    ));
                }
                TransformMode::Rectangles {
                    source,
                    destination,
                }
            }
            (None, None) => TransformMode::UniformScale { scale: 1.0 },
            _ => {
                return Err(ConvertError::InvalidOptions(
                    "source and page rectangles must be supplied together",
                ))
            }
        };
        Ok(Self {
            transform,
            ..Self::new(page_width, page_height, 1.0)
        })
    }

    pub fn with_content_resolver(mut self, resolver: impl ContentResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_text_width_policy(mut self, policy: TextWidthPolicy) -> Self {
        self.text_width = policy;
        self
    }

    pub fn content_resolver(&self) -> Option<&dyn ContentResolver> {
        self.resolver.as_deref()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT, 1.0)
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("page_width", &self.page_width)
            .field("page_height", &self.page_height)
            .field("transform", &self.transform)
            .field("font", &self.font)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Converts `document` into a single page.
///
/// Visible layers are walked twice: images first so they sit beneath everything,
/// then every other entity in document order.
pub fn convert(document: &Document, options: &ConvertOptions) -> Result<Page> {
    let mut converter = Converter::new(document, options);

    let mut by_layer: HashMap<String, Vec<&Entity>> = HashMap::new();
    for entity in &document.entities {
        if document.layer(&entity.layer).is_none() {
            warn!(layer = %entity.layer, kind = entity.kind.name(), "entity on unknown layer skipped");
            continue;
        }
        by_layer
            .entry(entity.layer.to_ascii_lowercase())
            .or_default()
            .push(entity);
    }
    let visible: Vec<(&Layer, &[&Entity])> = document
        .layers
        .iter()
        .filter(|layer| layer.is_on)
        .filter_map(|layer| {
            by_layer
                .get(&layer.name.to_ascii_lowercase())
                .map(|entities| (layer, entities.as_slice()))
        })
        .collect();

    for (layer, entities) in &visible {
        for entity in entities.iter().filter(|e| is_image(e)) {
            converter.submit(entity, layer)?;
        }
    }
    for (layer, entities) in &visible {
        for entity in entities.iter().filter(|e| !is_image(e)) {
            converter.submit(entity, layer)?;
        }
    }

    Ok(converter.finish())
}

fn is_image(entity: &Entity) -> bool {
    matches!(entity.kind, EntityKind::Image(_))
}

/// State for one conversion call: the page being filled and the pending path.
pub struct Converter<'a> {
    document: &'a Document,
    options: &'a ConvertOptions,
    transforms: Transforms,
    styles: DimensionStyleCache,
    builder: PathBuilder,
    page: Page,
}

impl<'a> Converter<'a> {
    pub fn new(document: &'a Document, options: &'a ConvertOptions) -> Self {
        Self {
            document,
            options,
            transforms: build_transforms(&options.transform, &document.viewport),
            styles: DimensionStyleCache::new(),
            builder: PathBuilder::new(),
            page: Page::new(options.page_width, options.page_height),
        }
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    /// Converts one entity; `Ok(None)` means the kind has no converter.
    pub fn convert_entity(
        &mut self,
        entity: &Entity,
        layer: &Layer,
    ) -> Result<Option<Vec<Drawable>>> {
        let state = resolve_stream_state(entity, layer);
        let transforms = &self.transforms;
        let drawables = match &entity.kind {
            EntityKind::Line(line) => vec![Drawable::Path(convert_line(line, transforms, state))],
            EntityKind::Point(point) => {
                vec![Drawable::Path(convert_point(point, transforms, state))]
            }
            EntityKind::Circle(circle) => {
                vec![Drawable::Path(convert_circle(circle, transforms, state))]
            }
            EntityKind::Arc(arc) => vec![Drawable::Path(convert_arc(arc, transforms, state))],
            EntityKind::LwPolyline(polyline) | EntityKind::Polyline(polyline) => {
                convert_polyline(polyline, transforms, state)
                    .into_iter()
                    .map(Drawable::Path)
                    .collect()
            }
            EntityKind::Solid(solid) => vec![Drawable::Path(convert_solid(solid, transforms, state))],
            EntityKind::Text(text) => vec![Drawable::Text(convert_text(
                text,
                transforms,
                state,
                &self.options.font,
            ))],
            EntityKind::Dimension(dimension) => {
                let settings = self.styles.get(self.document, &dimension.style_name);
                let ctx = DimensionContext {
                    document: self.document,
                    transforms: &self.transforms,
                    font: &self.options.font,
                    text_width: self.options.text_width,
                };
                return convert_dimension(dimension, &settings, state, &ctx);
            }
            EntityKind::Image(image) => {
                embed_image(image, transforms, self.options.content_resolver())
                    .map(Drawable::Image)
                    .into_iter()
                    .collect()
            }
            EntityKind::Unsupported(_) => return Ok(None),
        };
        Ok(Some(drawables))
    }

    /// Converts `entity` and places its drawables on the page in order.
    pub fn submit(&mut self, entity: &Entity, layer: &Layer) -> Result<()> {
        let Some(drawables) = self.convert_entity(entity, layer)? else {
            debug!(kind = entity.kind.name(), layer = %layer.name, "skipping unsupported entity");
            return Ok(());
        };
        for drawable in drawables {
            match drawable {
                Drawable::Path(item) => self.builder.push(item),
                Drawable::Text(text) => {
                    self.builder.flush_into(&mut self.page);
                    self.page.items.push(PageItem::Text(text));
                }
                Drawable::Image(image) => {
                    self.builder.flush_into(&mut self.page);
                    self.page.items.push(PageItem::Image(image));
                }
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Page {
        self.builder.flush_into(&mut self.page);
        self.page
    }
}
