pub mod config;

pub use config::{clamp_sample_factor, AppConfig, CONFIG_ENV_VAR, SAMPLE_FACTOR_RANGE};
