use color_quant::NeuQuant;
use spray_index::{Palette, PixelFormat, Quantize, QuantizeError, Quantized, RasterImage, PALETTE_SIZE};

use crate::models::clamp_sample_factor;

/// NeuQuant quantizer from the `color_quant` crate
///
/// The network is trained on fully opaque pixels: transparency is handled
/// afterwards by reserving palette index 255, so alpha must not pull palette
/// entries towards invisible colors.
#[derive(Debug, Clone, Copy)]
pub struct NeuQuantizer {
    sample_factor: i32,
}

impl NeuQuantizer {
    /// `sample_factor` is clamped to 1..=30 (1 is slowest and best)
    pub fn new(sample_factor: i32) -> Self {
        Self {
            sample_factor: clamp_sample_factor(sample_factor),
        }
    }

    pub fn sample_factor(&self) -> i32 {
        self.sample_factor
    }
}

impl Default for NeuQuantizer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Quantize for NeuQuantizer {
    fn quantize(&self, image: &RasterImage) -> Result<Quantized, QuantizeError> {
        let rgba = opaque_rgba(image)?;
        tracing::debug!(
            pixels = image.pixel_count(),
            sample_factor = self.sample_factor,
            "Training NeuQuant"
        );

        let nq = NeuQuant::new(self.sample_factor, PALETTE_SIZE, &rgba);
        let palette = Palette::from_rgb(&nq.color_map_rgb())
            .map_err(|e| QuantizeError::Failed(e.to_string()))?;
        let indices = rgba
            .chunks_exact(4)
            .map(|px| nq.index_of(px) as u8)
            .collect();

        Ok(Quantized { indices, palette })
    }
}

/// Expand any supported format to RGBA bytes with alpha forced to 255
fn opaque_rgba(image: &RasterImage) -> Result<Vec<u8>, QuantizeError> {
    let pixels = image.pixels();
    let rgba = match image.format() {
        PixelFormat::Rgba32 => pixels
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        PixelFormat::Rgb24 => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        format @ (PixelFormat::Indexed24 | PixelFormat::Indexed32) => {
            let (Some(table), Some(stride)) = (image.palette(), format.palette_stride()) else {
                return Err(QuantizeError::UnsupportedFormat(format));
            };
            pixels
                .iter()
                .flat_map(|&i| {
                    let at = i as usize * stride;
                    [table[at], table[at + 1], table[at + 2], 255]
                })
                .collect()
        }
    };
    Ok(rgba)
}
