//! Watermark error types.
//!
//! Every variant is recoverable from the pipeline's point of view: a mark
//! that cannot be loaded means the photo is produced without it.

use std::fmt;

/// Errors that can occur while loading the watermark asset.
#[derive(Debug)]
pub enum WatermarkError {
    /// Source string is not a path, `file://` or `https://` locator
    InvalidSource(String),

    /// Failed to read or download the watermark bytes
    FetchError(String),

    /// Watermark bytes are not a decodable image
    DecodeError(String),

    /// HTTP client could not be built
    ClientError(String),
}

impl WatermarkError {
    /// Short machine-friendly tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSource(_) => "invalid_source",
            Self::FetchError(_) => "fetch",
            Self::DecodeError(_) => "decode",
            Self::ClientError(_) => "client",
        }
    }
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSource(msg) => write!(f, "Invalid watermark source: {}", msg),
            Self::FetchError(msg) => write!(f, "Failed to fetch watermark: {}", msg),
            Self::DecodeError(msg) => write!(f, "Failed to decode watermark image: {}", msg),
            Self::ClientError(msg) => write!(f, "Failed to create HTTP client: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
