use std::path::{Path, PathBuf};

use serde::Serialize;
use spray_index::{normalize, reduce, ReducePath, Resample, Quantize};

use crate::error::ConvertError;
use crate::models::AppConfig;
use crate::rendering::write_preview;
use crate::services::{
    is_bmp_path, ContainerWriter, FsDecoder, ImageDecoder, ImageResampler, NeuQuantizer,
    WadFileWriter,
};

/// How the palette of a conversion was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionPath {
    /// BMP palette and indices reused, rendered as a gradient decal
    IndexedReuse,
    /// Quantized, index 255 transparent
    Quantized,
}

impl From<ReducePath> for ConversionPath {
    fn from(path: ReducePath) -> Self {
        match path {
            ReducePath::IndexedReuse => ConversionPath::IndexedReuse,
            ReducePath::Quantized => ConversionPath::Quantized,
        }
    }
}

/// Summary of one successful conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub source: PathBuf,
    pub source_width: u32,
    pub source_height: u32,
    pub width: u32,
    pub height: u32,
    pub path: ConversionPath,
    pub collisions_remapped: usize,
    pub transparent_pixels: usize,
    pub output: PathBuf,
    pub bytes_written: usize,
    pub preview: Option<PathBuf>,
}

/// Conversion pipeline that orchestrates decode → fit → reduce → write
///
/// Owns its collaborators and the output target; nothing is global, so
/// several pipelines with different targets can coexist. Each call is
/// synchronous and runs to completion on the calling thread.
pub struct ConversionPipeline {
    decoder: Box<dyn ImageDecoder>,
    resampler: Box<dyn Resample>,
    quantizer: Box<dyn Quantize>,
    writer: Box<dyn ContainerWriter>,
    preview: Option<PathBuf>,
}

impl ConversionPipeline {
    pub fn new(
        decoder: Box<dyn ImageDecoder>,
        resampler: Box<dyn Resample>,
        quantizer: Box<dyn Quantize>,
        writer: Box<dyn ContainerWriter>,
    ) -> Self {
        Self {
            decoder,
            resampler,
            quantizer,
            writer,
            preview: None,
        }
    }

    /// Default collaborators configured from `config`
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Box::new(FsDecoder::new()),
            Box::new(ImageResampler::default()),
            Box::new(NeuQuantizer::new(config.sample_factor)),
            Box::new(WadFileWriter::new(
                config.output_dir.clone(),
                config.output_name.clone(),
            )),
        )
        .with_preview(config.preview.clone())
    }

    /// Also write an indexed PNG preview after each conversion
    pub fn with_preview(mut self, preview: Option<PathBuf>) -> Self {
        self.preview = preview;
        self
    }

    /// Convert `source` into a spray container
    pub fn convert(&self, source: &Path) -> Result<ConversionReport, ConvertError> {
        let is_bmp = is_bmp_path(source);
        tracing::debug!(source = %source.display(), is_bmp, "Decoding");
        let decoded = self.decoder.decode(source, is_bmp)?;

        let normalized = normalize(decoded, self.resampler.as_ref())?;
        tracing::debug!(
            source_width = normalized.source_width,
            source_height = normalized.source_height,
            width = normalized.image.width(),
            height = normalized.image.height(),
            resampled = normalized.was_resampled(),
            "Fitted"
        );
        let (source_width, source_height) = (normalized.source_width, normalized.source_height);

        let reduced = reduce(normalized.image, is_bmp, self.quantizer.as_ref())?;
        tracing::debug!(
            path = ?reduced.path,
            collisions_remapped = reduced.collisions_remapped,
            transparent_pixels = reduced.transparent_pixels,
            "Reduced colors"
        );
        let path = ConversionPath::from(reduced.path);
        let (collisions_remapped, transparent_pixels) =
            (reduced.collisions_remapped, reduced.transparent_pixels);

        let image = reduced.into_indexed_image();
        let written = self.writer.write(&image)?;

        let preview = self.preview.as_ref().and_then(|preview| {
            match write_preview(&image, preview) {
                Ok(_) => Some(preview.clone()),
                Err(e) => {
                    tracing::warn!(%e, path = %preview.display(), "Failed to write preview");
                    None
                }
            }
        });

        tracing::info!(
            source = %source.display(),
            output = %written.path.display(),
            width = image.width(),
            height = image.height(),
            "Spray converted"
        );

        Ok(ConversionReport {
            source: source.to_path_buf(),
            source_width,
            source_height,
            width: image.width(),
            height: image.height(),
            path,
            collisions_remapped,
            transparent_pixels,
            output: written.path,
            bytes_written: written.bytes,
            preview,
        })
    }

    /// Convert `source`, reporting only success
    ///
    /// Returns `true` iff decode, fit, reduce and write all succeeded. The
    /// cause of a failure is logged.
    pub fn convert_to_container(&self, source: &Path) -> bool {
        match self.convert(source) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(%e, source = %source.display(), "Spray conversion failed");
                false
            }
        }
    }
}
