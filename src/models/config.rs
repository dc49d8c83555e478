use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "SPRAYWAD_CONFIG";

/// Valid NeuQuant sampling factors: 1 samples every pixel, 30 is fastest.
pub const SAMPLE_FACTOR_RANGE: std::ops::RangeInclusive<i32> = 1..=30;

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory the container is written to (the game's asset search path)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the container
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// NeuQuant sampling factor
    #[serde(default = "default_sample_factor")]
    pub sample_factor: i32,

    /// Optional indexed PNG written next to every conversion
    #[serde(default)]
    pub preview: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_name() -> String {
    spray_index::DEFAULT_OUTPUT_NAME.to_string()
}

fn default_sample_factor() -> i32 {
    10
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        output_dir = %config.output_dir.display(),
                        output_name = %config.output_name,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from an explicit path, else from `SPRAYWAD_CONFIG`, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => Self::load(path),
            None => match std::env::var_os(CONFIG_ENV_VAR) {
                Some(path) => Self::load(Path::new(&path)),
                None => Self::default(),
            },
        }
    }

    /// Parse a YAML document; the sample factor is clamped into range
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.sample_factor = clamp_sample_factor(config.sample_factor);
        Ok(config)
    }

    /// Full path of the container
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            output_name: default_output_name(),
            sample_factor: default_sample_factor(),
            preview: None,
        }
    }
}

/// Clamp a sampling factor into [`SAMPLE_FACTOR_RANGE`]
pub fn clamp_sample_factor(factor: i32) -> i32 {
    factor.clamp(*SAMPLE_FACTOR_RANGE.start(), *SAMPLE_FACTOR_RANGE.end())
}
