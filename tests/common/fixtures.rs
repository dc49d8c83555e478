//! Test fixtures: source images encoded in memory.

use image::codecs::bmp::BmpEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

/// Sizes used across tests
pub mod sizes {
    /// Landscape source that must be fitted to 96x80
    pub const LANDSCAPE: (u32, u32) = (200, 150);

    /// Already a valid spray size, never resampled
    pub const NATIVE: (u32, u32) = (64, 48);

    /// Smaller than one grid cell
    pub const TINY: (u32, u32) = (1, 1);
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .expect("Failed to encode fixture");
    buf.into_inner()
}

/// Opaque RGB gradient as PNG
pub fn rgb_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    encode(DynamicImage::ImageRgb8(image), ImageFormat::Png)
}

/// RGBA PNG whose left half is fully transparent
pub fn half_transparent_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([(x * 7) as u8, (y * 5) as u8, 200, alpha])
    });
    encode(DynamicImage::ImageRgba8(image), ImageFormat::Png)
}

/// Opaque RGBA PNG where every pixel is the same color
pub fn solid_rgba_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    encode(DynamicImage::ImageRgba8(image), ImageFormat::Png)
}

/// Palette used by [`paletted_bmp`]: entry i is (i, 255 - i, i / 2)
pub fn bmp_palette() -> Vec<[u8; 3]> {
    (0..256u32)
        .map(|i| [i as u8, (255 - i) as u8, (i / 2) as u8])
        .collect()
}

/// Index bytes used by [`paletted_bmp`]
pub fn bmp_indices(width: u32, height: u32) -> Vec<u8> {
    (0..width * height).map(|i| (i * 13 % 256) as u8).collect()
}

/// 8-bit paletted BMP
pub fn paletted_bmp(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    BmpEncoder::new(&mut buf)
        .encode_with_palette(
            &bmp_indices(width, height),
            width,
            height,
            ExtendedColorType::L8,
            Some(bmp_palette().as_slice()),
        )
        .expect("Failed to encode fixture");
    buf
}

/// 24-bit BMP, goes through the quantizer even though it is a BMP
pub fn truecolor_bmp(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 50]));
    encode(DynamicImage::ImageRgb8(image), ImageFormat::Bmp)
}
