//! Compositor for the fixed-size output image.
//!
//! Produces the final raster in two steps:
//!
//! 1. The source is cover-fitted onto a fresh [`RasterSurface`]: scaled to
//!    fill the canvas, centered, overflow cropped.
//! 2. If a background-removed watermark is available, it is scaled into its
//!    centered box and drawn with a blurred drop shadow at partial opacity.
//!
//! Draw settings (opacity, shadow) belong to each [`WatermarkLayer`], and the
//! compositor drains its layers when applying them, so nothing set for one
//! draw can affect a later one.
//!
//! # Example
//!
//! ```ignore
//! use listing_watermark::watermark::compositor::{composite, CompositeRequest, WatermarkStyle};
//!
//! let request = CompositeRequest {
//!     source: &photo,
//!     watermark: Some(&stripped_logo),
//!     canvas: ImageDimensions::new(1500, 1000),
//!     style: WatermarkStyle::for_canvas(&config.watermark, 1500),
//!     max_surface_pixels: 40_000_000,
//! };
//! let output = composite(&request)?;
//! ```

use super::position::{
    calculate_cover_fit, calculate_watermark_box, ImageDimensions, PlacementPosition,
    WatermarkDimensions,
};
use crate::config::WatermarkConfig;
use crate::raster::{resize_rgba, ImageError, RasterImage};
use image::{imageops, Rgba, RgbaImage};

/// A layer to be composited onto the canvas.
#[derive(Clone)]
pub struct WatermarkLayer {
    /// The layer image (RGBA).
    pub image: RgbaImage,
    /// Position where the layer should be placed.
    pub position: PlacementPosition,
    /// Opacity to apply (0.0 to 1.0). Applied on top of image's alpha channel.
    pub opacity: f32,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .field("opacity", &self.opacity)
            .finish()
    }
}

/// Ordered stack of layers waiting to be drawn.
#[derive(Debug, Default)]
pub struct Compositor {
    layers: Vec<WatermarkLayer>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, layer: WatermarkLayer) {
        self.layers.push(layer);
    }

    /// Draw all pending layers, in insertion order, and drop them.
    pub fn apply(&mut self, target: &mut RgbaImage) {
        for layer in self.layers.drain(..) {
            blend_layer(target, &layer);
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Drop shadow parameters in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStyle {
    pub color: [u8; 3],
    /// Shadow alpha before the layer opacity is applied.
    pub alpha: f32,
    /// Blur radius; the Gaussian sigma is half of it.
    pub blur: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Watermark draw parameters resolved for one canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkStyle {
    pub padding: u32,
    pub desired_width: u32,
    pub opacity: f32,
    pub shadow: Option<ShadowStyle>,
}

impl WatermarkStyle {
    /// Turn the width-relative ratios from config into pixels.
    pub fn for_canvas(config: &WatermarkConfig, canvas_width: u32) -> Self {
        let w = canvas_width as f64;
        let shadow = config.shadow.enabled.then(|| {
            let offset = (w * config.shadow.offset_ratio).round() as i32;
            ShadowStyle {
                color: config.shadow.color,
                alpha: config.shadow.alpha,
                blur: ((w * config.shadow.blur_ratio).round() as u32).min(canvas_width),
                offset_x: offset,
                offset_y: offset,
            }
        });

        Self {
            padding: (w * config.padding_ratio).round() as u32,
            desired_width: (w * config.width_ratio).round() as u32,
            opacity: config.opacity,
            shadow,
        }
    }
}

/// Immutable input to [`composite`].
#[derive(Debug, Clone, Copy)]
pub struct CompositeRequest<'a> {
    pub source: &'a RasterImage,
    /// Background-removed watermark; `None` skips step 2.
    pub watermark: Option<&'a RasterImage>,
    pub canvas: ImageDimensions,
    pub style: WatermarkStyle,
    pub max_surface_pixels: u64,
}

/// Drawing surface owned by a single compositing call.
///
/// Acquired with [`RasterSurface::acquire`] and consumed by
/// [`RasterSurface::into_raster`]; it cannot outlive the call that made it.
pub struct RasterSurface {
    canvas: RgbaImage,
}

impl RasterSurface {
    /// Allocate a transparent canvas.
    ///
    /// Fails with `SurfaceUnavailable` for an empty canvas, a canvas above
    /// `max_pixels`, or when the allocation itself fails.
    pub fn acquire(dims: ImageDimensions, max_pixels: u64) -> Result<Self, ImageError> {
        let pixels = dims.width as u64 * dims.height as u64;
        if pixels == 0 {
            return Err(ImageError::surface_unavailable(
                dims.width,
                dims.height,
                "canvas has no pixels",
            ));
        }
        if pixels > max_pixels {
            return Err(ImageError::surface_unavailable(
                dims.width,
                dims.height,
                format!("{} pixels exceeds limit of {}", pixels, max_pixels),
            ));
        }

        let len = pixels
            .checked_mul(4)
            .and_then(|bytes| usize::try_from(bytes).ok())
            .ok_or_else(|| {
                ImageError::surface_unavailable(dims.width, dims.height, "size overflows usize")
            })?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|e| {
            ImageError::surface_unavailable(dims.width, dims.height, e.to_string())
        })?;
        buf.resize(len, 0);

        let canvas = RgbaImage::from_raw(dims.width, dims.height, buf).ok_or_else(|| {
            ImageError::surface_unavailable(dims.width, dims.height, "buffer rejected")
        })?;

        Ok(Self { canvas })
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.canvas.width(), self.canvas.height())
    }

    /// Draw `source` cover-fitted over the whole surface.
    pub fn draw_cover(&mut self, source: &RasterImage) -> Result<(), ImageError> {
        let canvas = self.dimensions();
        let source_dims = ImageDimensions::new(source.width(), source.height());
        let fit = calculate_cover_fit(&source_dims, &canvas);
        let crop = fit.source_crop(&source_dims, &canvas);

        tracing::debug!(
            source_width = source_dims.width,
            source_height = source_dims.height,
            scale = fit.scale,
            crop_x = crop.x,
            crop_y = crop.y,
            crop_width = crop.width,
            crop_height = crop.height,
            "Cover-fitting source"
        );

        let visible =
            imageops::crop_imm(source.as_rgba(), crop.x, crop.y, crop.width, crop.height)
                .to_image();
        let scaled = resize_rgba(&visible, canvas.width, canvas.height)?;
        imageops::replace(&mut self.canvas, &scaled, 0, 0);
        Ok(())
    }

    /// Draw layers through a compositor.
    pub fn draw(&mut self, compositor: &mut Compositor) {
        compositor.apply(&mut self.canvas);
    }

    pub fn into_raster(self) -> RasterImage {
        RasterImage::from_rgba(self.canvas)
    }
}

/// Compose the output raster for `request`.
///
/// A failure while preparing the watermark is logged and the cover-fitted
/// image is returned without it. Surface and base-image failures are errors.
pub fn composite(request: &CompositeRequest<'_>) -> Result<RasterImage, ImageError> {
    composite_with_report(request).map(|(raster, _)| raster)
}

/// Like [`composite`], also reporting whether any watermark layer was drawn.
pub fn composite_with_report(
    request: &CompositeRequest<'_>,
) -> Result<(RasterImage, bool), ImageError> {
    let mut surface = RasterSurface::acquire(request.canvas, request.max_surface_pixels)?;
    surface.draw_cover(request.source)?;

    let mut drawn = false;
    if let Some(watermark) = request.watermark {
        match watermark_layers(watermark, request.canvas, &request.style) {
            Ok(layers) => {
                let mut compositor = Compositor::new();
                for layer in layers {
                    compositor.add_layer(layer);
                }
                drawn = compositor.layer_count() > 0;
                surface.draw(&mut compositor);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Watermark could not be drawn, skipping");
            }
        }
    }

    Ok((surface.into_raster(), drawn))
}

/// Build the shadow and mark layers for a watermark on `canvas`.
///
/// Returns no layers when the watermark has no room on the canvas.
pub fn watermark_layers(
    watermark: &RasterImage,
    canvas: ImageDimensions,
    style: &WatermarkStyle,
) -> Result<Vec<WatermarkLayer>, ImageError> {
    let wm_dims = WatermarkDimensions {
        width: watermark.width(),
        height: watermark.height(),
    };

    let Some(wm_box) =
        calculate_watermark_box(&canvas, &wm_dims, style.padding, style.desired_width)
    else {
        tracing::debug!(
            canvas_width = canvas.width,
            canvas_height = canvas.height,
            "No room for watermark on canvas"
        );
        return Ok(Vec::new());
    };

    let mark = resize_rgba(watermark.as_rgba(), wm_box.dims.width, wm_box.dims.height)?;

    let mut layers = Vec::with_capacity(2);
    if let Some(shadow) = &style.shadow {
        layers.push(shadow_layer(&mark, wm_box.position, shadow, style.opacity));
    }
    layers.push(WatermarkLayer {
        image: mark,
        position: wm_box.position,
        opacity: style.opacity,
    });

    Ok(layers)
}

/// Build a blurred silhouette of `mark` in the shadow color.
///
/// The silhouette is padded by twice the blur radius so the Gaussian tail is
/// not clipped, and its position accounts for that padding.
fn shadow_layer(
    mark: &RgbaImage,
    position: PlacementPosition,
    shadow: &ShadowStyle,
    opacity: f32,
) -> WatermarkLayer {
    let margin = shadow.blur.saturating_mul(2);
    let [r, g, b] = shadow.color;
    let alpha = shadow.alpha.clamp(0.0, 1.0);

    let mut silhouette = RgbaImage::from_pixel(
        mark.width().saturating_add(margin.saturating_mul(2)),
        mark.height().saturating_add(margin.saturating_mul(2)),
        Rgba([r, g, b, 0]),
    );
    for (x, y, px) in mark.enumerate_pixels() {
        let a = (px[3] as f32 * alpha).round() as u8;
        silhouette.put_pixel(x + margin, y + margin, Rgba([r, g, b, a]));
    }

    let image = if shadow.blur > 0 {
        imageops::blur(&silhouette, shadow.blur as f32 / 2.0)
    } else {
        silhouette
    };

    WatermarkLayer {
        image,
        position: PlacementPosition::new(
            position
                .x
                .saturating_add(shadow.offset_x)
                .saturating_sub(margin as i32),
            position
                .y
                .saturating_add(shadow.offset_y)
                .saturating_sub(margin as i32),
        ),
        opacity,
    }
}

/// Blend a single layer onto the target image.
fn blend_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    let target_width = target.width() as i32;
    let target_height = target.height() as i32;

    let wm_width = layer.image.width() as i32;
    let wm_height = layer.image.height() as i32;

    // Visible region, clamped to target bounds
    let x_start = layer.position.x.max(0);
    let y_start = layer.position.y.max(0);
    let x_end = (layer.position.x + wm_width).min(target_width);
    let y_end = (layer.position.y + wm_height).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wx = (tx - layer.position.x) as u32;
            let wy = (ty - layer.position.y) as u32;

            let wm_pixel = layer.image.get_pixel(wx, wy);
            let target_pixel = target.get_pixel(tx as u32, ty as u32);

            let blended = blend_pixels(*target_pixel, *wm_pixel, layer.opacity);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
