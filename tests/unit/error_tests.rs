// Error type tests

use listing_watermark::config::ConfigError;
use listing_watermark::raster::ImageError;
use listing_watermark::watermark::WatermarkError;
use listing_watermark::PipelineError;
use std::error::Error;

#[test]
fn test_source_decode_error_display_and_source() {
    let err = PipelineError::SourceDecode(ImageError::decode_failed("bad huffman table"));

    assert_eq!(
        err.to_string(),
        "Failed to decode source image: Failed to decode image: bad huffman table"
    );
    assert!(err.source().is_some());
}

#[test]
fn test_config_error_converts_into_pipeline_error() {
    let err: PipelineError = ConfigError::Invalid("opacity out of range".to_string()).into();
    match &err {
        PipelineError::Config(msg) => assert!(msg.contains("opacity out of range")),
        _ => panic!("Expected Config variant"),
    }
    assert!(err.source().is_none());
}

#[test]
fn test_config_error_messages() {
    let err = ConfigError::MissingEnvVar("WM_SOURCE".to_string());
    assert_eq!(
        err.to_string(),
        "Environment variable 'WM_SOURCE' is referenced but not set"
    );

    let err = ConfigError::Invalid("bad".to_string());
    assert_eq!(err.to_string(), "Invalid configuration: bad");
}

#[test]
fn test_image_error_decode_classification() {
    assert!(ImageError::decode_failed("x").is_decode_error());
    assert!(ImageError::unsupported_format("tiff").is_decode_error());
    assert!(!ImageError::encode_failed("png", "x").is_decode_error());
    assert!(!ImageError::surface_unavailable(10, 10, "x").is_decode_error());
}

#[test]
fn test_watermark_error_is_std_error() {
    fn assert_error<E: Error + Send + Sync + 'static>(_: &E) {}

    let err = WatermarkError::FetchError("404".to_string());
    assert_error(&err);
    assert_error(&ImageError::resize_failed("x"));
    assert_error(&PipelineError::Config("x".to_string()));
}
