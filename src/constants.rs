// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Ratios are fractions of the output canvas width so the watermark keeps
// its visual proportion when the canvas size changes.

// =============================================================================
// Output canvas defaults
// =============================================================================

/// Default output canvas width in pixels
pub const DEFAULT_OUTPUT_WIDTH: u32 = 1500;

/// Default output canvas height in pixels
pub const DEFAULT_OUTPUT_HEIGHT: u32 = 1000;

/// Default encode quality for lossy formats (0.0 - 1.0)
pub const DEFAULT_ENCODE_QUALITY: f32 = 0.9;

/// Largest canvas a surface may be created for (width * height)
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 40_000_000;

// =============================================================================
// Watermark defaults
// =============================================================================

/// Default watermark asset location
pub const DEFAULT_WATERMARK_SOURCE: &str = "static/watermark.png";

/// Default watermark opacity
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.7;

/// Default watermark width as a fraction of canvas width (480px of 1500px)
pub const DEFAULT_WATERMARK_WIDTH_RATIO: f64 = 480.0 / 1500.0;

/// Default padding around the watermark as a fraction of canvas width
pub const DEFAULT_WATERMARK_PADDING_RATIO: f64 = 0.025;

/// Per-channel minimum for a pixel to count as background white
pub const DEFAULT_NEAR_WHITE_THRESHOLD: u8 = 245;

/// Timeout for fetching https:// watermark sources
pub const DEFAULT_WATERMARK_FETCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Drop shadow defaults
// =============================================================================

/// Default shadow color (RGB)
pub const DEFAULT_SHADOW_COLOR: [u8; 3] = [0, 0, 0];

/// Default shadow alpha (0.0 - 1.0)
pub const DEFAULT_SHADOW_ALPHA: f32 = 0.28;

/// Default shadow blur radius as a fraction of canvas width
pub const DEFAULT_SHADOW_BLUR_RATIO: f64 = 0.006;

/// Default shadow x/y offset as a fraction of canvas width
pub const DEFAULT_SHADOW_OFFSET_RATIO: f64 = 0.002;

// =============================================================================
// Decode limits
// =============================================================================

/// Maximum accepted source image width (largest JPEG dimension)
pub const DEFAULT_MAX_SOURCE_WIDTH: u32 = 65_535;

/// Maximum accepted source image height (largest JPEG dimension)
pub const DEFAULT_MAX_SOURCE_HEIGHT: u32 = 65_535;

/// Maximum accepted source pixel count (100 megapixels)
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 100_000_000;

/// Maximum accepted source file size (50 MB)
pub const DEFAULT_MAX_SOURCE_FILE_SIZE: usize = 50 * 1024 * 1024;

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
