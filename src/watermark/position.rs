//! Placement math for the base image and the watermark.
//!
//! Two calculations live here:
//!
//! - **Cover fit**: scale the source so it fills the whole canvas, keep its
//!   aspect ratio, center it and crop whatever overflows. Never letterboxes.
//! - **Watermark box**: a centered, aspect-preserving box bounded by the
//!   desired width and by the padded canvas.
//!
//! # Example
//!
//! ```
//! use listing_watermark::watermark::position::{calculate_cover_fit, ImageDimensions};
//!
//! let source = ImageDimensions { width: 2000, height: 2000 };
//! let canvas = ImageDimensions { width: 1500, height: 1000 };
//!
//! let fit = calculate_cover_fit(&source, &canvas);
//! assert_eq!(fit.scale, 0.75);
//! assert_eq!(fit.offset_y, -250.0);
//! ```

/// Dimensions of a source image or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner of a drawn layer on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Result of a cover-fit calculation, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// `max(canvas.width / source.width, canvas.height / source.height)`
    pub scale: f64,
    pub draw_width: f64,
    pub draw_height: f64,
    /// Offsets are zero or negative; negative means that much is cropped.
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Region of the source image that ends up visible on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CoverFit {
    /// Source-space rectangle that maps onto the full canvas.
    pub fn source_crop(&self, source: &ImageDimensions, canvas: &ImageDimensions) -> CropRect {
        let width = ((canvas.width as f64 / self.scale).round() as u32).clamp(1, source.width.max(1));
        let height =
            ((canvas.height as f64 / self.scale).round() as u32).clamp(1, source.height.max(1));

        CropRect {
            x: source.width.saturating_sub(width) / 2,
            y: source.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }
}

/// Calculate "object-fit: cover" placement of `source` on `canvas`.
pub fn calculate_cover_fit(source: &ImageDimensions, canvas: &ImageDimensions) -> CoverFit {
    let sw = source.width.max(1) as f64;
    let sh = source.height.max(1) as f64;
    let tw = canvas.width as f64;
    let th = canvas.height as f64;

    let scale = (tw / sw).max(th / sh);
    let draw_width = sw * scale;
    let draw_height = sh * scale;

    CoverFit {
        scale,
        draw_width,
        draw_height,
        offset_x: (tw - draw_width) / 2.0,
        offset_y: (th - draw_height) / 2.0,
    }
}

/// Where and how large the watermark is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkBox {
    pub position: PlacementPosition,
    pub dims: WatermarkDimensions,
}

/// Calculate the centered watermark box.
///
/// The width is `min(desired_width, canvas.width - 2 * padding)` and the
/// height follows the watermark's aspect ratio. A mark too tall for the
/// padded canvas is scaled down further so it stays inside the padding.
///
/// Returns `None` when the watermark or the padded canvas has no area.
pub fn calculate_watermark_box(
    canvas: &ImageDimensions,
    watermark: &WatermarkDimensions,
    padding: u32,
    desired_width: u32,
) -> Option<WatermarkBox> {
    if watermark.width == 0 || watermark.height == 0 {
        return None;
    }

    let max_width = canvas.width.saturating_sub(padding.saturating_mul(2));
    let max_height = canvas.height.saturating_sub(padding.saturating_mul(2));
    if max_width == 0 || max_height == 0 || desired_width == 0 {
        return None;
    }

    let mut target_width = desired_width.min(max_width) as f64;
    let mut target_height = watermark.height as f64 * (target_width / watermark.width as f64);

    if target_height > max_height as f64 {
        target_width *= max_height as f64 / target_height;
        target_height = max_height as f64;
    }

    let width = (target_width.round() as u32).clamp(1, max_width);
    let height = (target_height.round() as u32).clamp(1, max_height);

    let x = ((canvas.width as f64 - width as f64) / 2.0).round() as i32;
    let y = ((canvas.height as f64 - height as f64) / 2.0).round() as i32;

    Some(WatermarkBox {
        position: PlacementPosition::new(x, y),
        dims: WatermarkDimensions { width, height },
    })
}

/// Check that a watermark box lies entirely within the padded canvas.
pub fn is_within_padding(wm_box: &WatermarkBox, canvas: &ImageDimensions, padding: u32) -> bool {
    let p = padding as i32;
    let right = wm_box.position.x + wm_box.dims.width as i32;
    let bottom = wm_box.position.y + wm_box.dims.height as i32;

    wm_box.position.x >= p
        && wm_box.position.y >= p
        && right <= canvas.width as i32 - p
        && bottom <= canvas.height as i32 - p
}
