//! Raster error types
//!
//! Covers every stage that touches pixel data: decoding, surface
//! creation, resampling and encoding.

use std::fmt;

/// Errors that can occur while decoding, compositing or encoding rasters
#[derive(Debug, Clone)]
pub enum ImageError {
    // === Decoding Errors ===
    /// Image format is not supported
    UnsupportedFormat { format: String },
    /// Failed to decode image data
    DecodeFailed { message: String },
    /// Image dimensions exceed safety limits (image bomb protection)
    ImageBombDetected {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },
    /// Input file size exceeds limit
    FileTooLarge { size: usize, max_size: usize },

    // === Raster Errors ===
    /// Pixel buffer length does not match the declared dimensions
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },
    /// Drawing surface could not be created
    SurfaceUnavailable {
        width: u32,
        height: u32,
        reason: String,
    },
    /// Resize operation failed
    ResizeFailed { message: String },

    // === Encoding Errors ===
    /// Encoding to output format failed
    EncodeFailed { format: String, message: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedFormat { format } => {
                write!(f, "Unsupported image format: {}", format)
            }
            ImageError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ImageError::ImageBombDetected {
                width,
                height,
                pixels,
                max_pixels,
            } => {
                write!(
                    f,
                    "Image dimensions {}x{} ({} pixels) exceed limit of {} pixels",
                    width, height, pixels, max_pixels
                )
            }
            ImageError::FileTooLarge { size, max_size } => {
                write!(
                    f,
                    "File size {} bytes exceeds maximum {} bytes",
                    size, max_size
                )
            }
            ImageError::InvalidDimensions {
                width,
                height,
                reason,
            } => {
                write!(f, "Invalid dimensions {}x{}: {}", width, height, reason)
            }
            ImageError::SurfaceUnavailable {
                width,
                height,
                reason,
            } => {
                write!(
                    f,
                    "Cannot create {}x{} drawing surface: {}",
                    width, height, reason
                )
            }
            ImageError::ResizeFailed { message } => {
                write!(f, "Resize failed: {}", message)
            }
            ImageError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    /// Whether the error was raised while turning input bytes into pixels
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ImageError::UnsupportedFormat { .. }
                | ImageError::DecodeFailed { .. }
                | ImageError::ImageBombDetected { .. }
                | ImageError::FileTooLarge { .. }
        )
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        ImageError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ImageError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn surface_unavailable(width: u32, height: u32, reason: impl Into<String>) -> Self {
        ImageError::SurfaceUnavailable {
            width,
            height,
            reason: reason.into(),
        }
    }

    pub fn image_bomb(width: u32, height: u32, max_pixels: u64) -> Self {
        ImageError::ImageBombDetected {
            width,
            height,
            pixels: width as u64 * height as u64,
            max_pixels,
        }
    }
}
