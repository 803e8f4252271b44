//! Watermark asset and appearance configuration.
//!
//! Sizes are ratios of the canvas width so the mark keeps its proportions
//! on any output size.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_NEAR_WHITE_THRESHOLD, DEFAULT_SHADOW_ALPHA, DEFAULT_SHADOW_BLUR_RATIO,
    DEFAULT_SHADOW_COLOR, DEFAULT_SHADOW_OFFSET_RATIO, DEFAULT_WATERMARK_FETCH_TIMEOUT_SECS,
    DEFAULT_WATERMARK_OPACITY, DEFAULT_WATERMARK_PADDING_RATIO, DEFAULT_WATERMARK_SOURCE,
    DEFAULT_WATERMARK_WIDTH_RATIO,
};

fn default_true() -> bool {
    true
}

fn default_source() -> String {
    DEFAULT_WATERMARK_SOURCE.to_string()
}

fn default_opacity() -> f32 {
    DEFAULT_WATERMARK_OPACITY
}

fn default_width_ratio() -> f64 {
    DEFAULT_WATERMARK_WIDTH_RATIO
}

fn default_padding_ratio() -> f64 {
    DEFAULT_WATERMARK_PADDING_RATIO
}

fn default_near_white_threshold() -> u8 {
    DEFAULT_NEAR_WHITE_THRESHOLD
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_WATERMARK_FETCH_TIMEOUT_SECS
}

fn default_shadow_color() -> [u8; 3] {
    DEFAULT_SHADOW_COLOR
}

fn default_shadow_alpha() -> f32 {
    DEFAULT_SHADOW_ALPHA
}

fn default_shadow_blur_ratio() -> f64 {
    DEFAULT_SHADOW_BLUR_RATIO
}

fn default_shadow_offset_ratio() -> f64 {
    DEFAULT_SHADOW_OFFSET_RATIO
}

/// Drop shadow drawn beneath the watermark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShadowConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// RGB shadow color (default: black)
    #[serde(default = "default_shadow_color")]
    pub color: [u8; 3],
    /// Shadow alpha before the watermark opacity is applied (default: 0.28)
    #[serde(default = "default_shadow_alpha")]
    pub alpha: f32,
    /// Blur radius as a fraction of canvas width (default: 0.006)
    #[serde(default = "default_shadow_blur_ratio")]
    pub blur_ratio: f64,
    /// X and Y offset as a fraction of canvas width (default: 0.002)
    #[serde(default = "default_shadow_offset_ratio")]
    pub offset_ratio: f64,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: default_shadow_color(),
            alpha: default_shadow_alpha(),
            blur_ratio: default_shadow_blur_ratio(),
            offset_ratio: default_shadow_offset_ratio(),
        }
    }
}

/// Watermark asset location and appearance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatermarkConfig {
    /// Draw the watermark at all (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path, `file://` path or `https://` URL of the watermark image
    #[serde(default = "default_source")]
    pub source: String,
    /// Keep the decoded asset for the lifetime of the pipeline (default: true)
    #[serde(default = "default_true")]
    pub cache: bool,
    /// Opacity applied to the mark and its shadow (default: 0.7)
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Target mark width as a fraction of canvas width (default: 480/1500)
    #[serde(default = "default_width_ratio")]
    pub width_ratio: f64,
    /// Minimum distance to the canvas edge as a fraction of canvas width
    #[serde(default = "default_padding_ratio")]
    pub padding_ratio: f64,
    /// Per-channel minimum for a pixel to count as background white
    #[serde(default = "default_near_white_threshold")]
    pub near_white_threshold: u8,
    /// Timeout for `https://` sources in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub shadow: ShadowConfig,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source: default_source(),
            cache: true,
            opacity: default_opacity(),
            width_ratio: default_width_ratio(),
            padding_ratio: default_padding_ratio(),
            near_white_threshold: default_near_white_threshold(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            shadow: ShadowConfig::default(),
        }
    }
}
