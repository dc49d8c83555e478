//! Owned raster image record.

use super::{PixelFormat, RasterError};

/// A decoded raster image: dimensions, pixel layout, pixel bytes and, for
/// indexed formats, the palette table.
///
/// The only way to build one is [`RasterImage::new`], which validates every
/// buffer length against the format. Buffers are always owned; a resized copy
/// is a new value built from fresh buffers, never an alias of the old one.
///
/// # Example
///
/// ```
/// use spray_index::{PixelFormat, RasterImage};
///
/// let image = RasterImage::new(2, 1, PixelFormat::Rgb24, vec![0; 6], None).unwrap();
/// assert_eq!(image.pixel_count(), 2);
/// assert!(image.palette().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
    palette: Option<Vec<u8>>,
}

impl RasterImage {
    /// Create a raster image, checking buffer sizes against `format`.
    ///
    /// # Errors
    ///
    /// - [`RasterError::ZeroDimensions`] if either dimension is zero
    /// - [`RasterError::PixelLengthMismatch`] if `pixels` is not
    ///   `width * height * format.bytes_per_pixel()` bytes
    /// - [`RasterError::MissingPalette`] / [`RasterError::UnexpectedPalette`]
    ///   if palette presence does not match the format
    /// - [`RasterError::PaletteLengthMismatch`] if the palette table has the
    ///   wrong size for the format
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
        palette: Option<Vec<u8>>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroDimensions { width, height });
        }

        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(RasterError::PixelLengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        match (format.palette_bytes(), &palette) {
            (Some(_), None) => return Err(RasterError::MissingPalette(format)),
            (None, Some(_)) => return Err(RasterError::UnexpectedPalette(format)),
            (Some(expected), Some(table)) if table.len() != expected => {
                return Err(RasterError::PaletteLengthMismatch {
                    expected,
                    actual: table.len(),
                });
            }
            _ => {}
        }

        Ok(Self {
            width,
            height,
            format,
            pixels,
            palette,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw pixel bytes in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Palette table for indexed formats (RGB or RGBA entries).
    #[inline]
    pub fn palette(&self) -> Option<&[u8]> {
        self.palette.as_deref()
    }

    /// Alpha value of every pixel, `None` when the format has no alpha.
    pub fn alpha(&self) -> Option<impl Iterator<Item = u8> + '_> {
        if !self.format.has_alpha() {
            return None;
        }
        let stride = self.format.bytes_per_pixel();
        Some(self.pixels.chunks_exact(stride).map(move |px| px[stride - 1]))
    }

    /// Consume the image, returning its pixel buffer and palette.
    pub fn into_parts(self) -> (Vec<u8>, Option<Vec<u8>>) {
        (self.pixels, self.palette)
    }
}
