//! Pixel layouts understood by the spray pipeline.

use std::fmt;

/// Pixel layout of a [`RasterImage`](super::RasterImage) buffer.
///
/// Each variant carries its own per-pixel size and palette size, so callers
/// never do arithmetic on raw format codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel.
    Rgba32,
    /// 8-bit RGB, 3 bytes per pixel.
    Rgb24,
    /// One index byte per pixel into a 256-entry RGB palette (768 bytes).
    Indexed24,
    /// One index byte per pixel into a 256-entry RGBA palette (1024 bytes).
    Indexed32,
}

impl PixelFormat {
    /// Bytes used by a single pixel in the pixel buffer.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba32 => 4,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Indexed24 | PixelFormat::Indexed32 => 1,
        }
    }

    /// Size of the palette table in bytes, `None` for true-color formats.
    #[inline]
    pub const fn palette_bytes(self) -> Option<usize> {
        match self {
            PixelFormat::Indexed24 => Some(256 * 3),
            PixelFormat::Indexed32 => Some(256 * 4),
            PixelFormat::Rgba32 | PixelFormat::Rgb24 => None,
        }
    }

    /// Bytes per palette entry, `None` for true-color formats.
    #[inline]
    pub const fn palette_stride(self) -> Option<usize> {
        match self {
            PixelFormat::Indexed24 => Some(3),
            PixelFormat::Indexed32 => Some(4),
            PixelFormat::Rgba32 | PixelFormat::Rgb24 => None,
        }
    }

    /// Whether the pixel buffer itself carries an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Rgba32)
    }

    #[inline]
    pub const fn is_indexed(self) -> bool {
        matches!(self, PixelFormat::Indexed24 | PixelFormat::Indexed32)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Rgba32 => "RGBA32",
            PixelFormat::Rgb24 => "RGB24",
            PixelFormat::Indexed24 => "indexed (RGB palette)",
            PixelFormat::Indexed32 => "indexed (RGBA palette)",
        };
        f.write_str(name)
    }
}
