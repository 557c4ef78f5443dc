use crate::geom::Vector;
use crate::model::Image;
use crate::page::{ImageItem, ImageSource};
use crate::transform::{AffineTransform, Transforms};
use std::path::Path;
use tracing::debug;

/// Supplies the raw bytes of an externally referenced image.
///
/// Returning `None` is a normal outcome: the image is left out of the page.
pub trait ContentResolver {
    fn resolve(&self, path: &str) -> Option<Vec<u8>>;
}

impl<F> ContentResolver for F
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn resolve(&self, path: &str) -> Option<Vec<u8>> {
        self(path)
    }
}

/// Encodings that can be embedded without re-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughCodec {
    Jpeg,
}

impl PassThroughCodec {
    /// Only JPEG passes through; PNG and everything else is rejected.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(PassThroughCodec::Jpeg),
            _ => None,
        }
    }

    pub fn filter_name(&self) -> &'static str {
        match self {
            PassThroughCodec::Jpeg => "DCTDecode",
        }
    }
}

/// Assumed for every embedded image; the image header is not inspected.
pub const IMAGE_COLOR_SPACE: &str = "DeviceRGB";
pub const IMAGE_BITS_PER_COMPONENT: u8 = 8;

pub fn embed_image(
    image: &Image,
    transforms: &Transforms,
    resolver: Option<&dyn ContentResolver>,
) -> Option<ImageItem> {
    let Some(codec) = PassThroughCodec::from_path(&image.file_path) else {
        debug!(path = %image.file_path, "skipping image with unsupported encoding");
        return None;
    };
    let Some(bytes) = resolver.and_then(|r| r.resolve(&image.file_path)) else {
        debug!(path = %image.file_path, "image content could not be resolved");
        return None;
    };

    let width = image.u_vector.length() * image.pixel_width;
    let height = image.v_vector.length() * image.pixel_height;
    let size = transforms
        .magnitude
        .transform_magnitude(Vector::xy(width, height));
    let origin = transforms.point(image.location);
    let angle = image.u_vector.angle();

    let placement = AffineTransform::translation(origin.x, origin.y)
        .then(&AffineTransform::scaling(size.x, size.y))
        .then(&AffineTransform::rotation(angle));

    Some(ImageItem {
        source: ImageSource {
            codec: codec.filter_name().to_string(),
            bytes,
            width: image.pixel_width.max(0.0).round() as u32,
            height: image.pixel_height.max(0.0).round() as u32,
            color_space: IMAGE_COLOR_SPACE.to_string(),
            bits_per_component: IMAGE_BITS_PER_COMPONENT,
        },
        placement: placement.to_array(),
    })
}
