//! Watermark stage of the pipeline.
//!
//! Turns a logo exported on a white background into a transparent overlay
//! and draws it, centered with a soft drop shadow, over the cover-fitted
//! listing photo.
//!
//! # Stages
//!
//! - [`asset`]: locate, fetch and decode the logo once per pipeline
//! - [`background`]: border-connected flood fill that clears the white
//!   background while keeping enclosed highlights
//! - [`position`]: cover-fit and watermark box math
//! - [`compositor`]: the per-call drawing surface and layer blending
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   enabled: true
//!   source: "static/watermark.png"
//!   opacity: 0.7
//!   width_ratio: 0.32
//!   shadow:
//!     alpha: 0.28
//!     blur_ratio: 0.006
//! ```

pub mod asset;
pub mod background;
pub mod compositor;
pub mod error;
pub mod position;

// Re-export main types for convenience
pub use asset::{WatermarkAsset, WatermarkCache, WatermarkSource};
pub use background::{is_near_white, remove_background};
pub use compositor::{
    composite, composite_with_report, watermark_layers, CompositeRequest, Compositor,
    RasterSurface, ShadowStyle, WatermarkLayer, WatermarkStyle,
};
pub use error::WatermarkError;
pub use position::{
    calculate_cover_fit, calculate_watermark_box, is_within_padding, CoverFit, CropRect,
    ImageDimensions, PlacementPosition, WatermarkBox, WatermarkDimensions,
};
