//! Fitting a decoded image onto the spray grid.
//!
//! [`normalize`] computes the spray dimensions with
//! [`fit_dimensions`](crate::fit_dimensions) and, when they differ from the
//! source size, asks a [`Resample`] implementation for a scaled pixel buffer.
//! The result is always a freshly built [`RasterImage`]; the source record is
//! consumed and dropped.

use std::fmt;

use crate::fit::fit_dimensions;
use crate::image::{PixelFormat, RasterImage};

/// Error returned by a [`Resample`] implementation or when its output cannot
/// back a raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResampleError {
    /// The resampler could not produce a buffer
    Failed(String),
    /// The resampler returned a buffer of the wrong size
    LengthMismatch {
        /// Required length in bytes
        expected: usize,
        /// Returned length in bytes
        actual: usize,
    },
}

impl fmt::Display for ResampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResampleError::Failed(reason) => write!(f, "resample failed: {}", reason),
            ResampleError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "resampled buffer is {} bytes, expected {}",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for ResampleError {}

/// Scales a pixel buffer to new dimensions without changing its format.
///
/// Implementations must return exactly
/// `dst_width * dst_height * format.bytes_per_pixel()` bytes. Index buffers
/// must never be blended: an indexed source needs a point-sampling filter.
pub trait Resample {
    fn resample(
        &self,
        pixels: &[u8],
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
        format: PixelFormat,
    ) -> Result<Vec<u8>, ResampleError>;
}

/// A raster image fitted to spray dimensions, with its original size.
#[derive(Debug)]
pub struct Normalized {
    /// The fitted image
    pub image: RasterImage,
    /// Width before fitting
    pub source_width: u32,
    /// Height before fitting
    pub source_height: u32,
}

impl Normalized {
    /// Whether the image went through the resampler.
    pub fn was_resampled(&self) -> bool {
        self.image.width() != self.source_width || self.image.height() != self.source_height
    }
}

/// Fit `image` to spray dimensions.
///
/// When the fitted size equals the native size the image is returned as-is;
/// no resample and no copy happen. Otherwise the resampled bytes and a
/// verbatim copy of the palette (768 or 1024 bytes, whichever the format
/// carries) go into a new record of the same format.
///
/// # Errors
///
/// Propagates the resampler's [`ResampleError`], and reports
/// [`ResampleError::LengthMismatch`] when the returned buffer does not fit the
/// target size.
pub fn normalize(image: RasterImage, resampler: &dyn Resample) -> Result<Normalized, ResampleError> {
    let (source_width, source_height) = (image.width(), image.height());
    let (width, height) = fit_dimensions(source_width, source_height);

    if (width, height) == (source_width, source_height) {
        return Ok(Normalized {
            image,
            source_width,
            source_height,
        });
    }

    let format = image.format();
    let pixels = resampler.resample(
        image.pixels(),
        source_width,
        source_height,
        width,
        height,
        format,
    )?;

    let expected = width as usize * height as usize * format.bytes_per_pixel();
    if pixels.len() != expected {
        return Err(ResampleError::LengthMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let palette = image.palette().map(<[u8]>::to_vec);
    let scaled = RasterImage::new(width, height, format, pixels, palette).map_err(|e| {
        ResampleError::Failed(format!("resampled image is inconsistent: {}", e))
    })?;

    Ok(Normalized {
        image: scaled,
        source_width,
        source_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Point-samples the source, recording how often it was called.
    struct NearestResampler {
        calls: Cell<usize>,
    }

    impl NearestResampler {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl Resample for NearestResampler {
        fn resample(
            &self,
            pixels: &[u8],
            src_width: u32,
            src_height: u32,
            dst_width: u32,
            dst_height: u32,
            format: PixelFormat,
        ) -> Result<Vec<u8>, ResampleError> {
            self.calls.set(self.calls.get() + 1);
            let bpp = format.bytes_per_pixel();
            let mut out = Vec::with_capacity((dst_width * dst_height) as usize * bpp);
            for y in 0..dst_height {
                let sy = (y * src_height / dst_height) as usize;
                for x in 0..dst_width {
                    let sx = (x * src_width / dst_width) as usize;
                    let at = (sy * src_width as usize + sx) * bpp;
                    out.extend_from_slice(&pixels[at..at + bpp]);
                }
            }
            Ok(out)
        }
    }

    struct FailingResampler;

    impl Resample for FailingResampler {
        fn resample(
            &self,
            _: &[u8],
            _: u32,
            _: u32,
            _: u32,
            _: u32,
            _: PixelFormat,
        ) -> Result<Vec<u8>, ResampleError> {
            Err(ResampleError::Failed("out of memory".to_string()))
        }
    }

    struct ShortResampler;

    impl Resample for ShortResampler {
        fn resample(
            &self,
            _: &[u8],
            _: u32,
            _: u32,
            _: u32,
            _: u32,
            _: PixelFormat,
        ) -> Result<Vec<u8>, ResampleError> {
            Ok(vec![0; 3])
        }
    }

    fn indexed(width: u32, height: u32) -> RasterImage {
        let pixels = (0..width * height).map(|i| (i % 251) as u8).collect();
        let palette = (0..1024).map(|i| (i % 256) as u8).collect();
        RasterImage::new(width, height, PixelFormat::Indexed32, pixels, Some(palette)).unwrap()
    }

    #[test]
    fn test_fitting_image_is_untouched() {
        let resampler = NearestResampler::new();
        let image = indexed(64, 32);
        let original = image.clone();

        let result = normalize(image, &resampler).unwrap();

        assert_eq!(resampler.calls.get(), 0);
        assert!(!result.was_resampled());
        assert_eq!(result.image, original);
    }

    #[test]
    fn test_resample_builds_fitted_record() {
        let resampler = NearestResampler::new();
        let image = indexed(200, 150);
        let palette = image.palette().unwrap().to_vec();

        let result = normalize(image, &resampler).unwrap();

        assert_eq!(resampler.calls.get(), 1);
        assert!(result.was_resampled());
        assert_eq!((result.source_width, result.source_height), (200, 150));
        assert_eq!((result.image.width(), result.image.height()), (96, 80));
        assert_eq!(result.image.format(), PixelFormat::Indexed32);
        assert_eq!(result.image.pixels().len(), 96 * 80);
        assert_eq!(result.image.palette(), Some(palette.as_slice()));
    }

    #[test]
    fn test_true_color_resample_has_no_palette() {
        let resampler = NearestResampler::new();
        let image =
            RasterImage::new(10, 10, PixelFormat::Rgb24, vec![9; 300], None).unwrap();

        let result = normalize(image, &resampler).unwrap();

        assert_eq!((result.image.width(), result.image.height()), (16, 16));
        assert_eq!(result.image.pixels().len(), 16 * 16 * 3);
        assert!(result.image.palette().is_none());
    }

    #[test]
    fn test_resample_failure_propagates() {
        let err = normalize(indexed(200, 150), &FailingResampler).unwrap_err();
        assert_eq!(err, ResampleError::Failed("out of memory".to_string()));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let err = normalize(indexed(200, 150), &ShortResampler).unwrap_err();
        assert_eq!(
            err,
            ResampleError::LengthMismatch {
                expected: 96 * 80,
                actual: 3
            }
        );
    }
}
