pub mod decoder;
pub mod pipeline;
pub mod quantizer;
pub mod resampler;
pub mod writer;

pub use decoder::{is_bmp_path, FsDecoder, ImageDecoder};
pub use pipeline::{ConversionPath, ConversionPipeline, ConversionReport};
pub use quantizer::NeuQuantizer;
pub use resampler::ImageResampler;
pub use writer::{ContainerWriter, WadFileWriter, WrittenContainer};
