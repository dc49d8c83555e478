//! Indexed PNG previews of an assembled spray.
//!
//! The preview carries the spray's own palette as PLTE. Quantized sprays also
//! get a tRNS chunk that makes index 255 fully transparent, matching how the
//! game renders the decal.

use std::io::Cursor;
use std::path::Path;

use spray_index::{IndexedImage, TRANSPARENT_INDEX};

use crate::error::RenderError;

/// Encode `image` as an 8-bit indexed PNG.
pub fn encode_preview_png(image: &IndexedImage) -> Result<Vec<u8>, RenderError> {
    let plte = image.palette().to_rgb_bytes();
    let trns = (!image.gradient_decal()).then(transparency_table);

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_palette(plte);
        if let Some(trns) = trns {
            encoder.set_trns(trns);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(image.indices())
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Encode `image` and write it to `path`.
pub fn write_preview(image: &IndexedImage, path: &Path) -> Result<usize, RenderError> {
    let png = encode_preview_png(image)?;
    std::fs::write(path, &png)?;
    tracing::debug!(path = %path.display(), bytes = png.len(), "Wrote preview");
    Ok(png.len())
}

/// Alpha per palette entry: opaque except the transparent index.
fn transparency_table() -> Vec<u8> {
    let mut trns = vec![255u8; TRANSPARENT_INDEX as usize + 1];
    trns[TRANSPARENT_INDEX as usize] = 0;
    trns
}
