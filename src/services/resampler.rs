use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Pixel, RgbImage, RgbaImage};
use spray_index::{PixelFormat, Resample, ResampleError};

/// Resampler backed by `image::imageops::resize`
///
/// True-color buffers use the configured filter. Index buffers always use
/// nearest-neighbour so no two palette indices are ever averaged.
#[derive(Debug, Clone, Copy)]
pub struct ImageResampler {
    filter: FilterType,
}

impl ImageResampler {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }
}

impl Default for ImageResampler {
    fn default() -> Self {
        Self::new(FilterType::Triangle)
    }
}

impl Resample for ImageResampler {
    fn resample(
        &self,
        pixels: &[u8],
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
        format: PixelFormat,
    ) -> Result<Vec<u8>, ResampleError> {
        tracing::debug!(
            src_width,
            src_height,
            dst_width,
            dst_height,
            %format,
            "Resampling"
        );
        match format {
            PixelFormat::Rgba32 => {
                let src: RgbaImage = buffer(pixels, src_width, src_height)?;
                Ok(imageops::resize(&src, dst_width, dst_height, self.filter).into_raw())
            }
            PixelFormat::Rgb24 => {
                let src: RgbImage = buffer(pixels, src_width, src_height)?;
                Ok(imageops::resize(&src, dst_width, dst_height, self.filter).into_raw())
            }
            PixelFormat::Indexed24 | PixelFormat::Indexed32 => {
                let src: GrayImage = buffer(pixels, src_width, src_height)?;
                Ok(imageops::resize(&src, dst_width, dst_height, FilterType::Nearest).into_raw())
            }
        }
    }
}

fn buffer<P: Pixel<Subpixel = u8>>(
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<ImageBuffer<P, Vec<u8>>, ResampleError> {
    ImageBuffer::from_raw(width, height, pixels.to_vec()).ok_or_else(|| {
        ResampleError::Failed(format!(
            "{} bytes do not form a {}x{} image",
            pixels.len(),
            width,
            height
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_resample_size() {
        let out = ImageResampler::default()
            .resample(&[200; 10 * 10 * 4], 10, 10, 16, 16, PixelFormat::Rgba32)
            .unwrap();
        assert_eq!(out.len(), 16 * 16 * 4);
        assert!(out.iter().all(|&b| b == 200));
    }

    #[test]
    fn test_indexed_resample_never_blends() {
        // Alternating indices 0 and 200: any blending would introduce values
        // in between
        let src: Vec<u8> = (0..64 * 64)
            .map(|i| if (i % 64 + i / 64) % 2 == 0 { 0 } else { 200 })
            .collect();

        let out = ImageResampler::default()
            .resample(&src, 64, 64, 48, 32, PixelFormat::Indexed32)
            .unwrap();

        assert_eq!(out.len(), 48 * 32);
        assert!(out.iter().all(|&i| i == 0 || i == 200));
    }

    #[test]
    fn test_short_buffer_fails() {
        let err = ImageResampler::default()
            .resample(&[0; 5], 2, 2, 16, 16, PixelFormat::Rgb24)
            .unwrap_err();
        assert!(matches!(err, ResampleError::Failed(_)));
    }
}
