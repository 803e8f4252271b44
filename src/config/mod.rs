// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::logging::LoggingConfig;
use crate::raster::DecodeLimits;

pub mod output;
pub mod watermark;

pub use output::OutputConfig;
pub use watermark::{ShadowConfig, WatermarkConfig};

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub watermark: WatermarkConfig,
    /// Limits applied before decoding the source and the watermark
    #[serde(default)]
    pub limits: DecodeLimits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            }
        });

        if let Some(var_name) = missing {
            return Err(ConfigError::MissingEnvVar(var_name));
        }

        Ok(serde_yaml::from_str(&substituted)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let output = &self.output;
        if output.width == 0 || output.height == 0 {
            return Err(invalid(format!(
                "output size {}x{} must be positive",
                output.width, output.height
            )));
        }

        if !(output.quality > 0.0 && output.quality <= 1.0) {
            return Err(invalid(format!(
                "output.quality {} must be in (0, 1]",
                output.quality
            )));
        }

        if let Some(mime) = &output.mime_type {
            if !mime.starts_with("image/") {
                return Err(invalid(format!(
                    "output.mime_type '{}' is not an image type",
                    mime
                )));
            }
        }

        let wm = &self.watermark;
        if !(0.0..=1.0).contains(&wm.opacity) {
            return Err(invalid(format!(
                "watermark.opacity {} must be in [0, 1]",
                wm.opacity
            )));
        }

        if !(0.0..=1.0).contains(&wm.shadow.alpha) {
            return Err(invalid(format!(
                "watermark.shadow.alpha {} must be in [0, 1]",
                wm.shadow.alpha
            )));
        }

        if !(0.0..0.5).contains(&wm.padding_ratio) {
            return Err(invalid(format!(
                "watermark.padding_ratio {} must be in [0, 0.5)",
                wm.padding_ratio
            )));
        }

        if !(wm.width_ratio > 0.0 && wm.width_ratio <= 1.0) {
            return Err(invalid(format!(
                "watermark.width_ratio {} must be in (0, 1]",
                wm.width_ratio
            )));
        }

        let shadow_ratio = 0.0..=0.5;
        if !shadow_ratio.contains(&wm.shadow.blur_ratio)
            || !shadow_ratio.contains(&wm.shadow.offset_ratio)
        {
            return Err(invalid(format!(
                "watermark.shadow blur_ratio {} and offset_ratio {} must be in [0, 0.5]",
                wm.shadow.blur_ratio, wm.shadow.offset_ratio
            )));
        }

        if wm.enabled && wm.source.trim().is_empty() {
            return Err(invalid(
                "watermark.source cannot be empty when the watermark is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}
