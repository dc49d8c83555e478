//! Error types for raster image construction.

use std::fmt;

use super::PixelFormat;

/// Error returned when a [`RasterImage`](super::RasterImage) would violate its
/// buffer invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Width or height is zero
    ZeroDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Pixel buffer does not match `width * height * bytes_per_pixel`
    PixelLengthMismatch {
        /// Required length in bytes
        expected: usize,
        /// Supplied length in bytes
        actual: usize,
    },
    /// Indexed format supplied without a palette
    MissingPalette(PixelFormat),
    /// True-color format supplied with a palette
    UnexpectedPalette(PixelFormat),
    /// Palette table does not match the format's palette size
    PaletteLengthMismatch {
        /// Required length in bytes
        expected: usize,
        /// Supplied length in bytes
        actual: usize,
    },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::ZeroDimensions { width, height } => {
                write!(f, "image has zero-sized dimensions {}x{}", width, height)
            }
            RasterError::PixelLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
            RasterError::MissingPalette(format) => {
                write!(f, "{} image requires a palette", format)
            }
            RasterError::UnexpectedPalette(format) => {
                write!(f, "{} image cannot carry a palette", format)
            }
            RasterError::PaletteLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "palette length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for RasterError {}
