use crate::geom::Vector;
use crate::model::Viewport;
use nalgebra::{Matrix3, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Drawing units are assumed to be inches when scaling uniformly.
pub const POINTS_PER_UNIT: f64 = 72.0;

/// Region of the source drawing, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

/// Region of the output page, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRect {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl SourceRect {
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

impl PageRect {
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransformMode {
    /// Drawing units times `scale` inches, anchored at the viewport's lower-left corner.
    UniformScale { scale: f64 },
    /// Maps `source` onto `destination`, stretching each axis independently.
    Rectangles {
        source: SourceRect,
        destination: PageRect,
    },
}

/// 2D affine transform acting on the XY components of a [`Vector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    matrix: Matrix3<f64>,
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            matrix: Matrix3::new_translation(&Vector2::new(dx, dy)),
        }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            matrix: Matrix3::new_nonuniform_scaling(&Vector2::new(sx, sy)),
        }
    }

    pub fn rotation(angle: f64) -> Self {
        Self {
            matrix: Matrix3::new_rotation(angle),
        }
    }

    /// `self ∘ other`: `other` is applied first.
    pub fn then(&self, other: &AffineTransform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Position-affecting transform; `z` passes through.
    pub fn transform_point(&self, p: Vector) -> Vector {
        let t = self.matrix.transform_point(&Point2::new(p.x, p.y));
        Vector::new(t.x, t.y, p.z)
    }

    /// Transform for lengths: the linear part only, translation dropped.
    pub fn transform_magnitude(&self, v: Vector) -> Vector {
        let t = self.matrix.transform_vector(&Vector2::new(v.x, v.y));
        Vector::new(t.x, t.y, v.z)
    }

    /// The same transform without its translation.
    pub fn magnitude_only(&self) -> Self {
        let mut matrix = self.matrix;
        matrix[(0, 2)] = 0.0;
        matrix[(1, 2)] = 0.0;
        Self { matrix }
    }

    /// Page content matrix components `[a, b, c, d, e, f]`.
    pub fn to_array(&self) -> [f64; 6] {
        let m = &self.matrix;
        [
            m[(0, 0)],
            m[(1, 0)],
            m[(0, 1)],
            m[(1, 1)],
            m[(0, 2)],
            m[(1, 2)],
        ]
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// The composed drawing-to-page transform and its magnitude-only companion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub point: AffineTransform,
    pub magnitude: AffineTransform,
}

impl Transforms {
    pub fn new(point: AffineTransform) -> Self {
        Self {
            point,
            magnitude: point.magnitude_only(),
        }
    }

    pub fn point(&self, p: Vector) -> Vector {
        self.point.transform_point(p)
    }

    /// Scales a length along each axis independently, e.g. a radius into `(rx, ry)`.
    pub fn magnitude(&self, length: f64) -> (f64, f64) {
        let v = self.magnitude.transform_magnitude(Vector::xy(length, length));
        (v.x.abs(), v.y.abs())
    }
}

pub fn build_transforms(mode: &TransformMode, viewport: &Viewport) -> Transforms {
    let point = match *mode {
        TransformMode::UniformScale { scale } => {
            let factor = scale * POINTS_PER_UNIT;
            AffineTransform::scaling(factor, factor).then(&AffineTransform::translation(
                -viewport.lower_left.x,
                -viewport.lower_left.y,
            ))
        }
        TransformMode::Rectangles {
            source,
            destination,
        } => {
            let sx = destination.width() / source.width();
            let sy = destination.height() / source.height();
            AffineTransform::translation(destination.left, destination.bottom)
                .then(&AffineTransform::scaling(sx, sy))
                .then(&AffineTransform::translation(-source.left, -source.bottom))
        }
    };
    Transforms::new(point)
}
