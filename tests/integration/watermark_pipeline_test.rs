//! End-to-end pipeline tests against real files on disk.
//!
//! Run with:
//!   cargo test --test integration_tests watermark_pipeline

use super::test_harness::{config_with_source, encode_rgb, gray_photo, AssetDir, PHOTO_GRAY};
use image::{ImageFormat, Rgb, RgbImage};
use listing_watermark::raster::{decode_image, DecodeLimits, RasterImage};
use listing_watermark::{
    apply_watermark, FallbackReason, MediaFile, PipelineOutcome, WatermarkPipeline,
};
use rstest::rstest;

fn decode(file: &MediaFile) -> RasterImage {
    decode_image(&file.data, &DecodeLimits::default()).expect("output should decode")
}

fn assert_near(actual: u8, expected: u8, tolerance: u8) {
    assert!(
        actual.abs_diff(expected) <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

// Test: every aspect ratio fills the whole 1500x1000 canvas
#[rstest]
#[case::square(1000, 1000)]
#[case::landscape_16_9(1600, 900)]
#[case::portrait_9_16(900, 1600)]
#[tokio::test]
async fn test_output_is_always_1500x1000(#[case] width: u32, #[case] height: u32) {
    let assets = AssetDir::new();
    let pipeline =
        WatermarkPipeline::from_config(config_with_source(assets.logo_path.to_str().unwrap()))
            .unwrap();

    let input = MediaFile::new(
        "listing.png",
        "image/png",
        gray_photo(width, height, ImageFormat::Png),
    );
    let (out, outcome) = pipeline.apply_with_outcome(input).await.unwrap();

    assert_eq!(outcome, PipelineOutcome::Watermarked);
    assert_eq!(out.mime_type, "image/png");

    let raster = decode(&out);
    assert_eq!((raster.width(), raster.height()), (1500, 1000));

    // Cover fit never letterboxes
    assert!(raster.as_bytes().chunks_exact(4).all(|px| px[3] == 255));
}

// Test: watermark lands centered, background stripped, enclosed panel kept
#[tokio::test]
async fn test_watermark_is_drawn_centered() {
    let assets = AssetDir::new();
    let pipeline =
        WatermarkPipeline::from_config(config_with_source(assets.logo_path.to_str().unwrap()))
            .unwrap();

    let input = MediaFile::new(
        "living-room.png",
        "image/png",
        gray_photo(1500, 1000, ImageFormat::Png),
    );
    let out = decode(&pipeline.apply(input).await.unwrap());

    // 200x100 logo -> 480x240 box at (510, 380), scale 2.4
    // Left frame bar: logo (25, 50)
    let frame = out.pixel(570, 500).unwrap();
    assert!(frame.r < 45, "frame: {:?}", frame);
    assert!(frame.b > frame.r, "frame keeps navy tint: {:?}", frame);

    // Enclosed white panel: logo (100, 50)
    let panel = out.pixel(750, 500).unwrap();
    assert!(panel.r > 180, "panel: {:?}", panel);

    // Stripped background inside the box shows the photo
    let background = out.pixel(515, 385).unwrap();
    assert_near(background.r, PHOTO_GRAY[0], 2);

    // Far from the box
    let far = out.pixel(100, 100).unwrap();
    assert_near(far.r, PHOTO_GRAY[0], 1);
}

// Test: invalid watermark path still yields a 1500x1000 image
#[tokio::test]
async fn test_missing_watermark_is_soft_failure() {
    let assets = AssetDir::new();
    let missing = assets.missing_logo_path();
    let pipeline =
        WatermarkPipeline::from_config(config_with_source(missing.to_str().unwrap())).unwrap();

    let input = MediaFile::new(
        "garden.png",
        "image/png",
        gray_photo(800, 600, ImageFormat::Png),
    );
    let (out, outcome) = pipeline.apply_with_outcome(input).await.unwrap();

    assert_eq!(outcome, PipelineOutcome::WatermarkSkipped);
    let raster = decode(&out);
    assert_eq!((raster.width(), raster.height()), (1500, 1000));

    // Cover only: the center is photo gray
    assert_near(raster.pixel(750, 500).unwrap().r, PHOTO_GRAY[0], 1);
}

// Test: a later call picks up a watermark that failed to load earlier
#[tokio::test]
async fn test_watermark_load_is_retried() {
    let assets = AssetDir::new();
    let late = assets.missing_logo_path();
    let pipeline =
        WatermarkPipeline::from_config(config_with_source(late.to_str().unwrap())).unwrap();

    let photo = gray_photo(300, 200, ImageFormat::Png);

    let (_, first) = pipeline
        .apply_with_outcome(MediaFile::new("a.png", "image/png", photo.clone()))
        .await
        .unwrap();
    assert_eq!(first, PipelineOutcome::WatermarkSkipped);

    std::fs::copy(&assets.logo_path, &late).unwrap();

    let (_, second) = pipeline
        .apply_with_outcome(MediaFile::new("b.png", "image/png", photo))
        .await
        .unwrap();
    assert_eq!(second, PipelineOutcome::Watermarked);
    assert!(pipeline.watermark_cache().is_loaded());
}

// Test: 3000x2000 JPEG scales by exactly 0.5 and stays JPEG
#[tokio::test]
async fn test_large_jpeg_scenario() {
    let assets = AssetDir::new();
    let pipeline =
        WatermarkPipeline::from_config(config_with_source(assets.logo_path.to_str().unwrap()))
            .unwrap();

    let input = MediaFile::new(
        "facade.jpg",
        "image/jpeg",
        gray_photo(3000, 2000, ImageFormat::Jpeg),
    );
    let out = pipeline.apply(input).await.unwrap();

    assert_eq!(out.name, "facade.jpg");
    assert_eq!(out.mime_type, "image/jpeg");
    assert_eq!(&out.data[..2], &[0xFF, 0xD8]);

    let raster = decode(&out);
    assert_eq!((raster.width(), raster.height()), (1500, 1000));
}

// Test: 2000x2000 source loses 250 canvas px (333 source px) top and bottom
#[tokio::test]
async fn test_square_source_is_cropped_vertically() {
    // Red above y=300, blue from y=1700, green in between
    let img = RgbImage::from_fn(2000, 2000, |_, y| {
        if y < 300 {
            Rgb([255, 0, 0])
        } else if y >= 1700 {
            Rgb([0, 0, 255])
        } else {
            Rgb([0, 255, 0])
        }
    });
    let bytes = encode_rgb(&img, ImageFormat::Png);

    let mut config = config_with_source("unused");
    config.watermark.enabled = false;
    let pipeline = WatermarkPipeline::from_config(config).unwrap();

    let (out, outcome) = pipeline
        .apply_with_outcome(MediaFile::new("square.png", "image/png", bytes))
        .await
        .unwrap();
    assert_eq!(outcome, PipelineOutcome::WatermarkSkipped);

    let raster = decode(&out);
    for (x, y) in [(0, 0), (1499, 0), (750, 0), (0, 999), (750, 999), (1499, 999)] {
        let px = raster.pixel(x, y).unwrap();
        assert!(
            px.g > 200 && px.r < 30 && px.b < 30,
            "edge ({x}, {y}) should be green: {:?}",
            px
        );
    }
}

// Test: non-image input passes through the process-wide entry point
#[tokio::test]
async fn test_apply_watermark_non_image_is_identity() {
    let input = MediaFile::new("floorplan.pdf", "application/pdf", b"%PDF-1.7".to_vec());
    let out = apply_watermark(input.clone()).await.unwrap();
    assert_eq!(out, input);
}

// Test: surface failure with a watermark configured returns the upload byte-equal
#[tokio::test]
async fn test_surface_failure_returns_upload() {
    let assets = AssetDir::new();
    let mut config = config_with_source(assets.logo_path.to_str().unwrap());
    config.output.max_surface_pixels = 1_000_000;
    let pipeline = WatermarkPipeline::from_config(config).unwrap();

    let input = MediaFile::new(
        "attic.jpg",
        "image/jpeg",
        gray_photo(640, 480, ImageFormat::Jpeg),
    );
    let (out, outcome) = pipeline.apply_with_outcome(input.clone()).await.unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Unchanged(FallbackReason::SurfaceUnavailable)
    );
    assert_eq!(out.data, input.data);
    assert_eq!(out.name, input.name);
}
