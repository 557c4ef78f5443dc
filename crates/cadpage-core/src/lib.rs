pub mod bulge;
pub mod color;
pub mod convert;
pub mod dimension;
pub mod error;
pub mod geom;
pub mod image;
pub mod model;
pub mod page;
pub mod primitives;
pub mod transform;
pub mod units;

pub use convert::{convert, ConvertOptions, Converter};
pub use error::ConvertError;
