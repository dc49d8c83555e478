//! IndexedImage struct: the assembled spray descriptor.

use crate::palette::Palette;

/// The canonical output of the spray pipeline.
///
/// Stores one `u8` palette index per pixel in row-major order, the palette,
/// the dimensions and whether the image should be rendered as a gradient
/// decal. Every `u8` is a valid index because the palette always has 256
/// entries.
///
/// # Example
///
/// ```
/// use spray_index::{IndexedImage, Palette};
///
/// let image = IndexedImage::assemble(16, 16, vec![3; 256], Palette::default(), false);
///
/// assert_eq!(image.width(), 16);
/// assert_eq!(image.indices().len(), 256);
/// assert!(!image.gradient_decal());
///
/// let rgb = image.to_rgb();
/// assert_eq!(rgb.len(), 16 * 16 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    /// Palette indices, one per pixel, row-major order.
    indices: Vec<u8>,
    width: u32,
    height: u32,
    palette: Palette,
    /// Indices came straight from a source palette rather than a quantizer.
    gradient_decal: bool,
}

impl IndexedImage {
    /// Package an index buffer and palette into a descriptor.
    ///
    /// # Panics
    ///
    /// Panics if `indices.len() != width * height`. Earlier stages guarantee
    /// the length, so a mismatch is a bug in the caller.
    pub fn assemble(
        width: u32,
        height: u32,
        indices: Vec<u8>,
        palette: Palette,
        gradient_decal: bool,
    ) -> Self {
        assert_eq!(
            indices.len(),
            width as usize * height as usize,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
            gradient_decal,
        }
    }

    /// Palette indices in row-major order.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
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
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Whether the renderer should treat this spray as a gradient decal.
    #[inline]
    pub fn gradient_decal(&self) -> bool {
        self.gradient_decal
    }

    /// Expand to flat `R G B` bytes by looking every index up in the palette.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.get(idx));
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_color_palette() -> Palette {
        let mut palette = Palette::default();
        palette.set(0, [0, 0, 0]);
        palette.set(1, [255, 0, 0]);
        palette
    }

    #[test]
    fn test_assemble_stores_fields() {
        let image = IndexedImage::assemble(3, 2, vec![0, 1, 0, 1, 0, 1], two_color_palette(), true);

        assert_eq!(image.indices(), &[0, 1, 0, 1, 0, 1]);
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.palette().len(), 256);
        assert!(image.gradient_decal());
    }

    #[test]
    fn test_to_rgb_layout() {
        let image = IndexedImage::assemble(2, 1, vec![1, 0], two_color_palette(), false);
        assert_eq!(image.to_rgb(), vec![255, 0, 0, 0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "must match width * height")]
    fn test_assemble_rejects_short_buffer() {
        let _ = IndexedImage::assemble(4, 4, vec![0; 15], Palette::default(), false);
    }
}
