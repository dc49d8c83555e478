//! Raster image types.
//!
//! [`PixelFormat`] tags the buffer layout and [`RasterImage`] owns the pixel
//! and palette bytes of one decoded (or resampled) image.

mod error;
mod format;
mod raster;

pub use error::RasterError;
pub use format::PixelFormat;
pub use raster::RasterImage;
