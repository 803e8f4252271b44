//! Watermark asset cache under concurrent use.

use super::test_harness::{config_with_source, gray_photo, AssetDir, LOGO_HEIGHT, LOGO_WIDTH};
use image::ImageFormat;
use listing_watermark::raster::DecodeLimits;
use listing_watermark::watermark::WatermarkCache;
use listing_watermark::{MediaFile, PipelineOutcome, WatermarkPipeline};
use std::sync::Arc;

// Test: concurrent first callers share a single loaded asset
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_loads_share_one_asset() {
    let assets = AssetDir::new();
    let config = config_with_source(assets.logo_path.to_str().unwrap());
    let cache = Arc::new(WatermarkCache::new(
        &config.watermark,
        DecodeLimits::default(),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.load().await })
        })
        .collect();

    let mut assets_loaded = Vec::new();
    for handle in handles {
        assets_loaded.push(handle.await.unwrap().unwrap());
    }

    let first = &assets_loaded[0];
    assert!(assets_loaded
        .iter()
        .all(|a| Arc::ptr_eq(&a.stripped, &first.stripped)));
    assert!(cache.is_loaded());
}

// Test: background removal through the public loader
#[tokio::test]
async fn test_loaded_asset_has_background_removed() {
    let assets = AssetDir::new();
    let config = config_with_source(&format!("file://{}", assets.logo_path.display()));
    let cache = WatermarkCache::new(&config.watermark, DecodeLimits::default());

    let asset = cache.get().await.expect("logo should load");
    assert_eq!(
        (asset.stripped.width(), asset.stripped.height()),
        (LOGO_WIDTH, LOGO_HEIGHT)
    );

    // Border-connected white is cleared
    assert_eq!(asset.stripped.pixel(0, 0).unwrap().a, 0);
    assert_eq!(asset.stripped.pixel(10, 50).unwrap().a, 0);
    // Enclosed white panel keeps its alpha
    assert_eq!(asset.stripped.pixel(100, 50).unwrap().a, 255);
    // Frame untouched
    assert_eq!(asset.stripped.pixel(25, 50).unwrap().a, 255);
    // Original is not modified
    assert_eq!(asset.original.pixel(0, 0).unwrap().a, 255);
}

// Test: concurrent pipeline runs all get the watermark
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pipeline_runs() {
    let assets = AssetDir::new();
    let mut config = config_with_source(assets.logo_path.to_str().unwrap());
    config.output.width = 600;
    config.output.height = 400;
    let pipeline = Arc::new(WatermarkPipeline::from_config(config).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                let input = MediaFile::new(
                    format!("photo-{i}.png"),
                    "image/png",
                    gray_photo(320 + i * 40, 240, ImageFormat::Png),
                );
                pipeline.apply_with_outcome(input).await
            })
        })
        .collect();

    for handle in handles {
        let (_, outcome) = handle.await.unwrap().unwrap();
        assert_eq!(outcome, PipelineOutcome::Watermarked);
    }
}
