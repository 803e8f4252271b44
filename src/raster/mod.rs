//! Raster images and the codecs around them
//!
//! A [`RasterImage`] is the unit of data every pipeline stage passes on:
//! an owned RGBA8 buffer with `len == width * height * 4`.
//!
//! - [`decoder`] turns PNG/JPEG/WebP/GIF bytes into rasters, with size limits
//! - [`encoder`] turns rasters back into bytes behind the [`ImageEncoder`] trait
//! - [`format`] maps MIME types onto encodable formats
//! - [`resize`] resamples RGBA buffers with fast_image_resize

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod resize;

pub use decoder::{decode_image, validate_dimensions, validate_file_size, DecodeLimits};
pub use encoder::{
    EncodedImage, EncoderFactory, EncoderProvider, EncoderQuality, ImageEncoder, JpegEncoder,
    PngEncoder, WebPEncoder,
};
pub use error::ImageError;
pub use format::OutputFormat;
pub use resize::resize_rgba;

use image::{Rgba, RgbaImage};

/// A single RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba<u8>> for Pixel {
    fn from(p: Rgba<u8>) -> Self {
        Self {
            r: p[0],
            g: p[1],
            b: p[2],
            a: p[3],
        }
    }
}

/// Decoded image: width, height and a contiguous RGBA8 buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl RasterImage {
    /// Build a raster from raw RGBA bytes.
    ///
    /// Fails with `InvalidDimensions` when `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageError::InvalidDimensions {
                width,
                height,
                reason: format!("expected {} bytes, got {}", expected, data.len()),
            });
        }

        RgbaImage::from_raw(width, height, data)
            .map(Self::from_rgba)
            .ok_or_else(|| ImageError::InvalidDimensions {
                width,
                height,
                reason: "buffer rejected".to_string(),
            })
    }

    /// Wrap an existing RGBA image buffer.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Fill a new raster with a single color.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(
            width,
            height,
            Rgba([pixel.r, pixel.g, pixel.b, pixel.a]),
        ))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width() && y < self.height() {
            Some(Pixel::from(*self.pixels.get_pixel(x, y)))
        } else {
            None
        }
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}
