//! Shared fixtures: a synthetic logo on disk and generated listing photos.

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use listing_watermark::config::PipelineConfig;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

pub const LOGO_WIDTH: u32 = 200;
pub const LOGO_HEIGHT: u32 = 100;
const NAVY: [u8; 3] = [20, 30, 80];
pub const PHOTO_GRAY: [u8; 3] = [60, 60, 60];

/// Logo on a white background: a navy frame (x 20..180, y 20..80, 10px
/// thick) around an enclosed white panel.
pub fn logo_image() -> RgbaImage {
    RgbaImage::from_fn(LOGO_WIDTH, LOGO_HEIGHT, |x, y| {
        let in_outer = (20..180).contains(&x) && (20..80).contains(&y);
        let in_inner = (30..170).contains(&x) && (30..70).contains(&y);
        if in_outer && !in_inner {
            Rgba([NAVY[0], NAVY[1], NAVY[2], 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

pub fn encode_rgba(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn encode_rgb(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

/// Uniform gray photo.
pub fn gray_photo(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    encode_rgb(
        &RgbImage::from_pixel(width, height, Rgb(PHOTO_GRAY)),
        format,
    )
}

/// Temporary directory holding `logo.png`.
pub struct AssetDir {
    pub dir: TempDir,
    pub logo_path: PathBuf,
}

impl AssetDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let logo_path = dir.path().join("logo.png");
        std::fs::write(&logo_path, encode_rgba(&logo_image(), ImageFormat::Png)).unwrap();
        Self { dir, logo_path }
    }

    /// A logo path inside the directory that does not exist (yet).
    pub fn missing_logo_path(&self) -> PathBuf {
        self.dir.path().join("not-there.png")
    }
}

pub fn config_with_source(source: &str) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.watermark.source = source.to_string();
    config
}
