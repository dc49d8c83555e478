//! Test application factory for integration tests.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use spraywad::models::AppConfig;
use spraywad::services::ConversionPipeline;

/// Scratch directory with a source folder and an output folder
pub struct TestApp {
    dir: TempDir,
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test app writing `tempdecal.wad` into its own temp directory
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = AppConfig {
            output_dir: dir.path().join("out"),
            sample_factor: 1,
            ..Default::default()
        };
        Self { dir, config }
    }

    /// Pipeline built from the current config
    pub fn pipeline(&self) -> ConversionPipeline {
        ConversionPipeline::from_config(&self.config)
    }

    /// Write a source file and return its path
    pub fn write_source(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).expect("Failed to write source");
        path
    }

    /// Path inside the scratch directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.output_path()
    }

    pub fn output_exists(&self) -> bool {
        self.output_path().exists()
    }

    /// Read the written container
    pub fn read_output(&self) -> Vec<u8> {
        std::fs::read(self.output_path()).expect("Container was not written")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}
