//! Output canvas and encoding configuration.
//!
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ENCODE_QUALITY, DEFAULT_MAX_SURFACE_PIXELS, DEFAULT_OUTPUT_HEIGHT,
    DEFAULT_OUTPUT_WIDTH,
};

fn default_width() -> u32 {
    DEFAULT_OUTPUT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_OUTPUT_HEIGHT
}

fn default_quality() -> f32 {
    DEFAULT_ENCODE_QUALITY
}

fn default_max_surface_pixels() -> u64 {
    DEFAULT_MAX_SURFACE_PIXELS
}

/// Size and encoding of the produced image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Canvas width in pixels (default: 1500)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Canvas height in pixels (default: 1000)
    #[serde(default = "default_height")]
    pub height: u32,
    /// Quality factor for lossy formats, 0.0 - 1.0 (default: 0.9)
    #[serde(default = "default_quality")]
    pub quality: f32,
    /// Force an output MIME type instead of keeping the source's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Largest canvas a surface may be acquired for
    #[serde(default = "default_max_surface_pixels")]
    pub max_surface_pixels: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            quality: default_quality(),
            mime_type: None,
            max_surface_pixels: default_max_surface_pixels(),
        }
    }
}
