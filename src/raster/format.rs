//! Output format resolution
//!
//! Maps MIME types onto the formats the encoders can produce. Anything
//! that cannot be encoded resolves to PNG, matching how a browser canvas
//! treats unsupported `toBlob` types.

use std::str::FromStr;

use super::error::ImageError;

/// Encodable output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Parse a MIME type such as `image/jpeg` or `image/png; charset=binary`.
    ///
    /// Returns `None` for types no encoder handles.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Resolve the format to encode with.
    ///
    /// An explicit `preferred` MIME type wins; otherwise the source file's
    /// type is used, and PNG when neither is encodable.
    pub fn resolve(preferred: Option<&str>, source_mime: &str) -> Self {
        preferred
            .and_then(Self::from_mime)
            .or_else(|| Self::from_mime(source_mime))
            .unwrap_or(Self::Png)
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            other => Self::from_mime(other).ok_or_else(|| ImageError::unsupported_format(s)),
        }
    }
}

/// Guess a MIME type from a file name's extension.
pub fn mime_from_extension(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
