//! spray-index: indexed spray textures for GoldSrc-style decals
//!
//! This library turns a decoded raster image into the 256-color indexed
//! texture a `tempdecal.wad` container expects, and serializes that container.
//! It performs no I/O of its own beyond writing to a caller-supplied sink:
//! decoding, resampling and quantization are plugged in through the
//! [`Resample`] and [`Quantize`] traits.
//!
//! # Quick Start
//!
//! ```
//! use spray_index::{fit_dimensions, IndexedImage, Palette};
//!
//! let (w, h) = fit_dimensions(200, 150);
//! assert_eq!((w, h), (96, 80));
//!
//! let image = IndexedImage::assemble(w, h, vec![0; (w * h) as usize], Palette::default(), false);
//! let wad = spray_index::wad::to_wad_bytes(&image).unwrap();
//! assert_eq!(&wad[..4], b"WAD3");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RasterImage (decoded)
//!     |
//!     v
//! normalize()      fit to a 16-aligned size under the surface budget,
//!     |            resample only when the size changes
//!     v
//! reduce()         BMP with palette -> reuse indices and palette (gradient)
//!     |            otherwise        -> quantize, reserve index 255 (transparent)
//!     v
//! IndexedImage     indices + 256-entry palette + mode flag
//!     |
//!     v
//! wad::write_wad() WAD3 container with one miptex lump
//! ```
//!
//! # Transparency
//!
//! Quantized sprays reserve palette index 255. Any pixel the quantizer
//! assigned to 255 is moved to 254 first, then every pixel whose alpha is
//! below 255 is set to 255 and palette entry 255 becomes pure blue
//! ([`TRANSPARENT_MARKER`]). Sprays that reuse a BMP palette keep index 255
//! as an ordinary color.

pub mod fit;
pub mod image;
pub mod normalize;
pub mod output;
pub mod palette;
pub mod reduce;
pub mod wad;


pub use fit::{fit_dimensions, is_spray_sized, FALLBACK_SIZE, GRID, SPRAY_MAX_SURFACE};
pub use image::{PixelFormat, RasterError, RasterImage};
pub use normalize::{normalize, Normalized, Resample, ResampleError};
pub use output::IndexedImage;
pub use palette::{Palette, PaletteError, PALETTE_SIZE, TRANSPARENT_INDEX, TRANSPARENT_MARKER};
pub use reduce::{
    reduce, uses_indexed_path, Quantize, QuantizeError, Quantized, ReduceError, ReducePath,
    Reduced, ALPHA_THRESHOLD,
};
pub use wad::{parse_wad, write_wad, WadError, WadLump};

/// File name the game loads the player's spray from.
pub const DEFAULT_OUTPUT_NAME: &str = "tempdecal.wad";
