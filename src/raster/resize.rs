//! RGBA resampling with fast_image_resize
//!
//! Rasters with any non-opaque pixel are resized in premultiplied form so
//! the color of fully transparent pixels never bleeds into visible edges.

use fast_image_resize::{FilterType, Image, MulDiv, PixelType, ResizeAlg, Resizer};
use image::RgbaImage;
use std::num::NonZeroU32;

use super::error::ImageError;

/// Resize an RGBA image to exactly `target_w` x `target_h` with Lanczos3.
pub fn resize_rgba(img: &RgbaImage, target_w: u32, target_h: u32) -> Result<RgbaImage, ImageError> {
    if img.width() == target_w && img.height() == target_h {
        return Ok(img.clone());
    }

    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

    let translucent = img.pixels().any(|p| p[3] < 255);
    let mut src_image =
        Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x4)
            .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mul_div = MulDiv::default();
    if translucent {
        mul_div
            .multiply_alpha_inplace(&mut src_image.view_mut())
            .map_err(|e| ImageError::resize_failed(format!("Failed to premultiply alpha: {:?}", e)))?;
    }

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);
    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    {
        let mut dst_view = dst_image.view_mut();
        resizer
            .resize(&src_image.view(), &mut dst_view)
            .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

        if translucent {
            mul_div
                .divide_alpha_inplace(&mut dst_view)
                .map_err(|e| {
                    ImageError::resize_failed(format!("Failed to unpremultiply alpha: {:?}", e))
                })?;
        }
    }

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))
}
