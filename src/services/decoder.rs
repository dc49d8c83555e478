use std::io::Cursor;
use std::path::Path;

use image::codecs::bmp::BmpDecoder;
use image::{DynamicImage, ImageDecoder as _};
use spray_index::{PixelFormat, RasterImage, PALETTE_SIZE};

use crate::error::LoadError;

const BMP_HEADER_SIZE_AT: usize = 14;
const BMP_COMPRESSION_AT: usize = 30;
const BMP_INFO_HEADER_LEN: u32 = 40;
const BI_RGB: u32 = 0;

/// Loads a source image from disk into a raster record
pub trait ImageDecoder {
    /// Decode `path`. With `preserve_palette`, a paletted source keeps its
    /// indices and color table instead of being expanded to true color.
    fn decode(&self, path: &Path, preserve_palette: bool) -> Result<RasterImage, LoadError>;
}

/// Whether `path` names a BMP file (case-insensitive extension check)
pub fn is_bmp_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"))
}

/// Filesystem decoder backed by the `image` crate plus the paletted BMP reader
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDecoder;

impl FsDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode an in-memory file; `path` is only used for error messages
    pub fn decode_bytes(
        &self,
        path: &Path,
        bytes: &[u8],
        preserve_palette: bool,
    ) -> Result<RasterImage, LoadError> {
        if preserve_palette {
            if let Some(image) = decode_indexed_bmp(path, bytes)? {
                tracing::debug!(
                    width = image.width(),
                    height = image.height(),
                    "Decoded paletted BMP"
                );
                return Ok(image);
            }
        }

        let decoded = image::load_from_memory(bytes).map_err(|e| decode_error(path, e))?;
        let image = to_raster(decoded)?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            format = %image.format(),
            "Decoded image"
        );
        Ok(image)
    }
}

impl ImageDecoder for FsDecoder {
    fn decode(&self, path: &Path, preserve_palette: bool) -> Result<RasterImage, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.decode_bytes(path, &bytes, preserve_palette)
    }
}

fn decode_error(path: &Path, e: image::ImageError) -> LoadError {
    LoadError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn read_u32_le(bytes: &[u8], offset: usize) -> Option<u32> {
    let b = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Uncompressed BMPs only; run-length encoded ones are expanded by the
/// generic decoder instead.
fn is_uncompressed_bmp(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"BM") {
        return false;
    }
    match read_u32_le(bytes, BMP_HEADER_SIZE_AT) {
        // OS/2 core headers carry no compression field
        Some(len) if len < BMP_INFO_HEADER_LEN => true,
        Some(_) => read_u32_le(bytes, BMP_COMPRESSION_AT) == Some(BI_RGB),
        None => false,
    }
}

/// Decode a paletted BMP into an `Indexed32` raster, keeping the index bytes
/// and the color table. Returns `None` for anything that is not a plain
/// 1/4/8-bit BMP.
///
/// Palette entries are stored as RGBA with alpha 255; entries past the
/// file's color table are black.
fn decode_indexed_bmp(path: &Path, bytes: &[u8]) -> Result<Option<RasterImage>, LoadError> {
    if !is_uncompressed_bmp(bytes) {
        return Ok(None);
    }

    let mut decoder = BmpDecoder::new(Cursor::new(bytes)).map_err(|e| decode_error(path, e))?;
    let Some(table) = decoder.get_palette() else {
        tracing::debug!("BMP has no color table, using generic decoder");
        return Ok(None);
    };

    let mut palette = vec![0u8; PALETTE_SIZE * 4];
    for (dst, rgb) in palette.chunks_exact_mut(4).zip(table) {
        dst[..3].copy_from_slice(rgb);
    }
    for dst in palette.chunks_exact_mut(4) {
        dst[3] = 255;
    }

    decoder.set_indexed_color(true);
    let (width, height) = decoder.dimensions();
    let mut pixels = vec![0u8; decoder.total_bytes() as usize];
    decoder
        .read_image(&mut pixels)
        .map_err(|e| decode_error(path, e))?;

    let image = RasterImage::new(width, height, PixelFormat::Indexed32, pixels, Some(palette))?;
    Ok(Some(image))
}

/// Convert a decoded image to RGBA when it carries alpha, RGB otherwise
fn to_raster(decoded: DynamicImage) -> Result<RasterImage, LoadError> {
    let (width, height) = (decoded.width(), decoded.height());
    let image = if decoded.color().has_alpha() {
        let pixels = decoded.into_rgba8().into_raw();
        RasterImage::new(width, height, PixelFormat::Rgba32, pixels, None)?
    } else {
        let pixels = decoded.into_rgb8().into_raw();
        RasterImage::new(width, height, PixelFormat::Rgb24, pixels, None)?
    };
    Ok(image)
}
