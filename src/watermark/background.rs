//! Background removal for watermark assets.
//!
//! Logos are usually exported on a white background. Making every white
//! pixel transparent would also punch holes in white strokes inside the
//! artwork, so only near-white pixels connected to the image border are
//! cleared.
//!
//! The pixel grid is treated as a 4-connected graph. A breadth-first search
//! starts from every near-white border pixel at once and only walks through
//! near-white pixels. Every pixel it reaches gets alpha 0; everything else,
//! including enclosed near-white regions, is left untouched.
//!
//! Runs in O(width * height) time with one visited flag per pixel.

use std::collections::VecDeque;

use crate::raster::RasterImage;

/// Whether a pixel counts as background white.
///
/// Fully transparent pixels never match, so they stop the fill.
#[inline]
pub fn is_near_white(r: u8, g: u8, b: u8, a: u8, threshold: u8) -> bool {
    a > 0 && r >= threshold && g >= threshold && b >= threshold
}

/// Return a copy of `raster` with its border-connected near-white background
/// made transparent.
///
/// The input is never modified; the fill runs on a private working copy.
pub fn remove_background(raster: &RasterImage, threshold: u8) -> RasterImage {
    let mut working = raster.as_rgba().clone();
    let width = working.width() as usize;
    let height = working.height() as usize;

    if width == 0 || height == 0 {
        return RasterImage::from_rgba(working);
    }

    let data: &mut [u8] = &mut working;
    let near_white = |data: &[u8], idx: usize| {
        let di = idx * 4;
        is_near_white(data[di], data[di + 1], data[di + 2], data[di + 3], threshold)
    };

    let mut visited = vec![false; width * height];
    let mut queue = VecDeque::new();

    let seed = |idx: usize, data: &[u8], visited: &mut [bool], queue: &mut VecDeque<usize>| {
        if !visited[idx] && near_white(data, idx) {
            visited[idx] = true;
            queue.push_back(idx);
        }
    };

    for x in 0..width {
        seed(x, data, &mut visited, &mut queue);
        seed((height - 1) * width + x, data, &mut visited, &mut queue);
    }
    for y in 0..height {
        seed(y * width, data, &mut visited, &mut queue);
        seed(y * width + width - 1, data, &mut visited, &mut queue);
    }

    let mut cleared = 0usize;
    while let Some(idx) = queue.pop_front() {
        data[idx * 4 + 3] = 0;
        cleared += 1;

        let x = idx % width;
        let y = idx / width;

        let mut neighbors = [None; 4];
        if x > 0 {
            neighbors[0] = Some(idx - 1);
        }
        if x + 1 < width {
            neighbors[1] = Some(idx + 1);
        }
        if y > 0 {
            neighbors[2] = Some(idx - width);
        }
        if y + 1 < height {
            neighbors[3] = Some(idx + width);
        }

        for next in neighbors.into_iter().flatten() {
            if !visited[next] && near_white(data, next) {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    tracing::debug!(
        width,
        height,
        cleared,
        threshold,
        "Removed watermark background"
    );

    RasterImage::from_rgba(working)
}
