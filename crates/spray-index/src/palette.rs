//! Fixed 256-entry RGB palette.
//!
//! Spray containers always carry exactly 256 RGB entries; entry *i* is the
//! color of index *i*. [`Palette`] encodes that length in its type so no
//! downstream code needs to check it.

use std::fmt;

/// Number of palette entries.
pub const PALETTE_SIZE: usize = 256;

/// Index reserved for transparent pixels in quantized sprays.
pub const TRANSPARENT_INDEX: u8 = 255;

/// Color stored at [`TRANSPARENT_INDEX`] in quantized sprays.
///
/// Consumers of the container treat pure blue in the last slot as the
/// "this index is see-through" marker.
pub const TRANSPARENT_MARKER: [u8; 3] = [0, 0, 255];

/// Error returned when a palette table cannot be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// Table does not hold exactly 256 entries of the given stride
    LengthMismatch {
        /// Required length in bytes
        expected: usize,
        /// Supplied length in bytes
        actual: usize,
    },
    /// Entry stride other than 3 (RGB) or 4 (RGBA)
    UnsupportedStride(usize),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "palette table must be {} bytes, got {}",
                    expected, actual
                )
            }
            PaletteError::UnsupportedStride(stride) => {
                write!(f, "unsupported palette entry size: {} bytes", stride)
            }
        }
    }
}

impl std::error::Error for PaletteError {}

/// Exactly 256 RGB colors.
///
/// # Example
///
/// ```
/// use spray_index::{Palette, TRANSPARENT_INDEX, TRANSPARENT_MARKER};
///
/// let mut palette = Palette::from_rgb(&[0u8; 768]).unwrap();
/// palette.set(TRANSPARENT_INDEX, TRANSPARENT_MARKER);
/// assert_eq!(palette.get(255), [0, 0, 255]);
/// assert_eq!(palette.to_rgb_bytes().len(), 768);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [[u8; 3]; PALETTE_SIZE],
}

impl Palette {
    /// Build a palette directly from its entries.
    pub fn from_entries(entries: [[u8; 3]; PALETTE_SIZE]) -> Self {
        Self { entries }
    }

    /// Read a flat `R G B` table of 768 bytes.
    pub fn from_rgb(table: &[u8]) -> Result<Self, PaletteError> {
        Self::from_table(table, 3)
    }

    /// Read a flat `R G B A` table of 1024 bytes, dropping the alpha bytes.
    pub fn from_rgba(table: &[u8]) -> Result<Self, PaletteError> {
        Self::from_table(table, 4)
    }

    /// Read a flat table whose entries are `stride` bytes wide (3 or 4).
    ///
    /// Only the leading RGB bytes of each entry are kept.
    pub fn from_table(table: &[u8], stride: usize) -> Result<Self, PaletteError> {
        if stride != 3 && stride != 4 {
            return Err(PaletteError::UnsupportedStride(stride));
        }
        let expected = PALETTE_SIZE * stride;
        if table.len() != expected {
            return Err(PaletteError::LengthMismatch {
                expected,
                actual: table.len(),
            });
        }

        let mut entries = [[0u8; 3]; PALETTE_SIZE];
        for (entry, chunk) in entries.iter_mut().zip(table.chunks_exact(stride)) {
            *entry = [chunk[0], chunk[1], chunk[2]];
        }
        Ok(Self { entries })
    }

    /// Color of `index`.
    #[inline]
    pub fn get(&self, index: u8) -> [u8; 3] {
        self.entries[index as usize]
    }

    /// Replace the color of `index`.
    #[inline]
    pub fn set(&mut self, index: u8, rgb: [u8; 3]) {
        self.entries[index as usize] = rgb;
    }

    /// All entries in index order.
    #[inline]
    pub fn entries(&self) -> &[[u8; 3]; PALETTE_SIZE] {
        &self.entries
    }

    /// Always [`PALETTE_SIZE`].
    #[inline]
    pub fn len(&self) -> usize {
        PALETTE_SIZE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flat `R G B` bytes, 768 in total.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.entries.iter().flatten().copied().collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: [[0u8; 3]; PALETTE_SIZE],
        }
    }
}
