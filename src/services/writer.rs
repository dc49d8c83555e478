use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use spray_index::IndexedImage;

use crate::error::WriteError;

/// Where a container ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenContainer {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Persists an assembled spray
pub trait ContainerWriter {
    fn write(&self, image: &IndexedImage) -> Result<WrittenContainer, WriteError>;
}

/// Writes a WAD3 container to `output_dir/output_name`
///
/// The container is encoded in memory, written to a temp file in the output
/// directory and persisted over the target. A failed write drops the temp
/// file, leaving no partial container behind.
#[derive(Debug, Clone)]
pub struct WadFileWriter {
    output_dir: PathBuf,
    output_name: String,
}

impl WadFileWriter {
    pub fn new(output_dir: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_name: output_name.into(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }
}

impl ContainerWriter for WadFileWriter {
    fn write(&self, image: &IndexedImage) -> Result<WrittenContainer, WriteError> {
        let bytes = spray_index::wad::to_wad_bytes(image)?;

        std::fs::create_dir_all(&self.output_dir).map_err(|source| WriteError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_path();
        let io_error = |source| WriteError::Io {
            path: path.clone(),
            source,
        };
        let mut temp = NamedTempFile::new_in(&self.output_dir).map_err(io_error)?;
        temp.write_all(&bytes).map_err(io_error)?;
        temp.persist(&path).map_err(|e| io_error(e.error))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote container");
        Ok(WrittenContainer {
            path,
            bytes: bytes.len(),
        })
    }
}
