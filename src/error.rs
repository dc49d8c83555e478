use std::path::PathBuf;

use spray_index::{RasterError, ReduceError, ResampleError, WadError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Resample error: {0}")]
    Resample(#[from] ResampleError),

    #[error("Color reduction error: {0}")]
    Reduce(#[from] ReduceError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Invalid raster: {0}")]
    Raster(#[from] RasterError),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Container encode error: {0}")]
    Encode(#[from] WadError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
