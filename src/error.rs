// Error types module

use std::fmt;

use crate::config::ConfigError;
use crate::raster::ImageError;

/// Errors a caller of the pipeline can observe
///
/// Everything else (missing watermark, surface or encoder failure) is
/// recovered inside the pipeline and reported through `PipelineOutcome`.
#[derive(Debug)]
pub enum PipelineError {
    /// The uploaded bytes are not a decodable image within the limits
    SourceDecode(ImageError),

    /// Invalid configuration passed to `WatermarkPipeline::from_config`
    Config(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::SourceDecode(e) => write!(f, "Failed to decode source image: {}", e),
            PipelineError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::SourceDecode(e) => Some(e),
            PipelineError::Config(_) => None,
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        PipelineError::Config(e.to_string())
    }
}
