//! Color reduction to 256 indexed colors.
//!
//! Exactly one of two paths runs per image:
//!
//! - **Indexed reuse**: a BMP source that kept its 8-bit palette. The pixel
//!   buffer already holds indices and the source palette is copied (alpha
//!   dropped). Nothing is remapped and the result is a gradient decal.
//! - **Quantize**: everything else. A [`Quantize`] implementation produces
//!   indices and a palette, then index 255 is reserved for transparency:
//!   1. quantizer output 255 becomes 254,
//!   2. pixels with alpha ≤ [`ALPHA_THRESHOLD`] become 255 (RGBA sources only),
//!   3. palette entry 255 becomes [`TRANSPARENT_MARKER`].

use std::fmt;

use crate::image::{PixelFormat, RasterImage};
use crate::output::IndexedImage;
use crate::palette::{Palette, PaletteError, TRANSPARENT_INDEX, TRANSPARENT_MARKER};

/// Highest alpha value that still counts as transparent.
///
/// Only fully opaque pixels (alpha 255) keep their quantized color.
pub const ALPHA_THRESHOLD: u8 = 254;

/// Index that quantizer output 255 is moved to.
const COLLISION_INDEX: u8 = TRANSPARENT_INDEX - 1;

/// Error returned by a [`Quantize`] implementation or when its output is
/// unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    /// The quantizer only accepts true-color input
    UnsupportedFormat(PixelFormat),
    /// The quantizer returned an index buffer of the wrong length
    IndexLengthMismatch {
        /// Required length (`width * height`)
        expected: usize,
        /// Returned length
        actual: usize,
    },
    /// The quantizer could not produce a result
    Failed(String),
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::UnsupportedFormat(format) => {
                write!(f, "cannot quantize {} pixels", format)
            }
            QuantizeError::IndexLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "quantizer returned {} indices, expected {}",
                    actual, expected
                )
            }
            QuantizeError::Failed(reason) => write!(f, "quantization failed: {}", reason),
        }
    }
}

impl std::error::Error for QuantizeError {}

/// Error returned by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReduceError {
    /// The source palette could not be read
    Palette(PaletteError),
    /// The quantize path failed
    Quantize(QuantizeError),
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReduceError::Palette(err) => write!(f, "source palette error: {}", err),
            ReduceError::Quantize(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ReduceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReduceError::Palette(err) => Some(err),
            ReduceError::Quantize(err) => Some(err),
        }
    }
}

impl From<PaletteError> for ReduceError {
    fn from(err: PaletteError) -> Self {
        ReduceError::Palette(err)
    }
}

impl From<QuantizeError> for ReduceError {
    fn from(err: QuantizeError) -> Self {
        ReduceError::Quantize(err)
    }
}

/// Indices and palette produced by a quantizer.
#[derive(Debug, Clone)]
pub struct Quantized {
    /// One index per pixel, row-major order
    pub indices: Vec<u8>,
    /// Palette the indices refer to
    pub palette: Palette,
}

/// Reduces a true-color image to 256 colors.
///
/// The image is borrowed; the quantizer owns whatever scratch buffers it
/// needs and hands its result back by value.
pub trait Quantize {
    fn quantize(&self, image: &RasterImage) -> Result<Quantized, QuantizeError>;
}

/// Which reduction path produced a [`Reduced`] result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducePath {
    /// Source indices and palette reused unchanged
    IndexedReuse,
    /// Quantized with index 255 reserved for transparency
    Quantized,
}

/// Output of [`reduce`].
#[derive(Debug, Clone)]
pub struct Reduced {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
    pub palette: Palette,
    pub path: ReducePath,
    /// Pixels moved from quantizer index 255 to 254
    pub collisions_remapped: usize,
    /// Pixels forced to the transparent index
    pub transparent_pixels: usize,
}

impl Reduced {
    /// Reused source palettes are rendered as gradient decals.
    #[inline]
    pub fn gradient_decal(&self) -> bool {
        self.path == ReducePath::IndexedReuse
    }

    /// Assemble the final descriptor.
    pub fn into_indexed_image(self) -> IndexedImage {
        let gradient_decal = self.gradient_decal();
        IndexedImage::assemble(
            self.width,
            self.height,
            self.indices,
            self.palette,
            gradient_decal,
        )
    }
}

/// Whether [`reduce`] will take the indexed-reuse path for `image`.
#[inline]
pub fn uses_indexed_path(image: &RasterImage, source_is_bmp: bool) -> bool {
    source_is_bmp && image.palette().is_some()
}

/// Reduce a normalized image to 256 indexed colors.
///
/// `source_is_bmp` tells whether the image was decoded from a BMP file; only
/// those keep their own palette.
///
/// # Errors
///
/// Returns [`ReduceError::Quantize`] when the quantizer fails or returns an
/// index buffer that does not cover the image.
pub fn reduce(
    image: RasterImage,
    source_is_bmp: bool,
    quantizer: &dyn Quantize,
) -> Result<Reduced, ReduceError> {
    if uses_indexed_path(&image, source_is_bmp) {
        reuse_palette(image)
    } else {
        quantize(image, quantizer)
    }
}

fn reuse_palette(image: RasterImage) -> Result<Reduced, ReduceError> {
    let (width, height, format) = (image.width(), image.height(), image.format());
    let (indices, table) = image.into_parts();
    let (table, stride) = match (table, format.palette_stride()) {
        (Some(table), Some(stride)) => (table, stride),
        (table, _) => {
            return Err(PaletteError::LengthMismatch {
                expected: format.palette_bytes().unwrap_or(0),
                actual: table.map_or(0, |t| t.len()),
            }
            .into())
        }
    };
    let palette = Palette::from_table(&table, stride)?;

    Ok(Reduced {
        width,
        height,
        indices,
        palette,
        path: ReducePath::IndexedReuse,
        collisions_remapped: 0,
        transparent_pixels: 0,
    })
}

fn quantize(image: RasterImage, quantizer: &dyn Quantize) -> Result<Reduced, ReduceError> {
    let Quantized {
        mut indices,
        mut palette,
    } = quantizer.quantize(&image)?;

    let expected = image.pixel_count();
    if indices.len() != expected {
        return Err(QuantizeError::IndexLengthMismatch {
            expected,
            actual: indices.len(),
        }
        .into());
    }

    let mut collisions_remapped = 0;
    for idx in indices.iter_mut() {
        if *idx == TRANSPARENT_INDEX {
            *idx = COLLISION_INDEX;
            collisions_remapped += 1;
        }
    }

    let mut transparent_pixels = 0;
    if let Some(alpha) = image.alpha() {
        for (idx, a) in indices.iter_mut().zip(alpha) {
            if a <= ALPHA_THRESHOLD {
                *idx = TRANSPARENT_INDEX;
                transparent_pixels += 1;
            }
        }
    }

    palette.set(TRANSPARENT_INDEX, TRANSPARENT_MARKER);

    Ok(Reduced {
        width: image.width(),
        height: image.height(),
        indices,
        palette,
        path: ReducePath::Quantized,
        collisions_remapped,
        transparent_pixels,
    })
}
