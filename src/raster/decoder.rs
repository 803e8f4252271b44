//! Image decoding with size limits
//!
//! Header dimensions are checked before the pixel data is decoded so a
//! small file that expands to a huge raster is rejected early. The EXIF
//! orientation tag is applied after decoding, so a phone photo stored
//! sideways comes out upright.

use image::io::Reader as ImageReader;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use super::error::ImageError;
use super::RasterImage;
use crate::constants::{
    DEFAULT_MAX_SOURCE_FILE_SIZE, DEFAULT_MAX_SOURCE_HEIGHT, DEFAULT_MAX_SOURCE_PIXELS,
    DEFAULT_MAX_SOURCE_WIDTH,
};

fn default_max_width() -> u32 {
    DEFAULT_MAX_SOURCE_WIDTH
}

fn default_max_height() -> u32 {
    DEFAULT_MAX_SOURCE_HEIGHT
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

fn default_max_file_size() -> usize {
    DEFAULT_MAX_SOURCE_FILE_SIZE
}

/// Limits applied to every image before it is decoded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum allowed source image width
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    /// Maximum allowed source image height
    #[serde(default = "default_max_height")]
    pub max_height: u32,
    /// Maximum allowed total pixels (width * height)
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
    /// Maximum source file size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            max_height: default_max_height(),
            max_pixels: default_max_pixels(),
            max_file_size: default_max_file_size(),
        }
    }
}

/// Decode image bytes into a raster.
///
/// The format is sniffed from the data, never trusted from a MIME type.
pub fn decode_image(data: &[u8], limits: &DecodeLimits) -> Result<RasterImage, ImageError> {
    validate_file_size(data.len(), limits)?;

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| ImageError::unsupported_format("unrecognized image data"))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?;
    validate_dimensions(width, height, limits)?;

    let img = ImageReader::with_format(Cursor::new(data), format)
        .decode()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?;

    let orientation = read_orientation(data);
    let img = apply_orientation(img, orientation);

    tracing::debug!(
        format = ?format,
        orientation,
        width = img.width(),
        height = img.height(),
        "Decoded image"
    );

    Ok(RasterImage::from_rgba(img.to_rgba8()))
}

/// Read the EXIF orientation tag (1-8). Missing or unreadable EXIF is 1.
pub fn read_orientation(data: &[u8]) -> u32 {
    let mut cursor = Cursor::new(data);
    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(_) => return 1,
    };

    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(1)
}

/// Transform a decoded image so that it displays upright.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Validate image dimensions against the decode limits
pub fn validate_dimensions(
    width: u32,
    height: u32,
    limits: &DecodeLimits,
) -> Result<(), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions {
            width,
            height,
            reason: "image has no pixels".to_string(),
        });
    }

    if width > limits.max_width {
        return Err(ImageError::InvalidDimensions {
            width,
            height,
            reason: format!("width exceeds limit of {} pixels", limits.max_width),
        });
    }
    if height > limits.max_height {
        return Err(ImageError::InvalidDimensions {
            width,
            height,
            reason: format!("height exceeds limit of {} pixels", limits.max_height),
        });
    }

    let pixels = width as u64 * height as u64;
    if pixels > limits.max_pixels {
        return Err(ImageError::ImageBombDetected {
            width,
            height,
            pixels,
            max_pixels: limits.max_pixels,
        });
    }

    Ok(())
}

/// Validate source file size
pub fn validate_file_size(size: usize, limits: &DecodeLimits) -> Result<(), ImageError> {
    if size > limits.max_file_size {
        return Err(ImageError::FileTooLarge {
            size,
            max_size: limits.max_file_size,
        });
    }
    Ok(())
}
