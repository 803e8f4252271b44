// Configuration module unit tests

use listing_watermark::config::*;
use listing_watermark::logging::LogFormat;
use std::io::Write;

#[test]
fn test_can_deserialize_full_yaml_config() {
    let yaml = r#"
output:
  width: 1200
  height: 800
  quality: 0.8
  mime_type: "image/webp"
  max_surface_pixels: 2000000
watermark:
  enabled: true
  source: "https://cdn.example.com/logo.png"
  cache: false
  opacity: 0.6
  width_ratio: 0.25
  padding_ratio: 0.05
  near_white_threshold: 240
  fetch_timeout_secs: 5
  shadow:
    enabled: true
    color: [10, 20, 30]
    alpha: 0.4
    blur_ratio: 0.01
    offset_ratio: 0.003
limits:
  max_width: 4000
  max_height: 4000
  max_pixels: 16000000
  max_file_size: 1048576
logging:
  level: debug
  format: pretty
"#;
    let config = PipelineConfig::from_yaml_with_env(yaml).expect("Failed to parse config");

    assert_eq!(config.output.width, 1200);
    assert_eq!(config.output.height, 800);
    assert_eq!(config.output.mime_type.as_deref(), Some("image/webp"));
    assert_eq!(config.output.max_surface_pixels, 2_000_000);

    assert_eq!(config.watermark.source, "https://cdn.example.com/logo.png");
    assert!(!config.watermark.cache);
    assert_eq!(config.watermark.near_white_threshold, 240);
    assert_eq!(config.watermark.fetch_timeout_secs, 5);
    assert_eq!(config.watermark.shadow.color, [10, 20, 30]);

    assert_eq!(config.limits.max_width, 4000);
    assert_eq!(config.limits.max_file_size, 1_048_576);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Pretty);

    assert!(config.validate().is_ok());
}

#[test]
fn test_defaults_match_reference_values() {
    let config = PipelineConfig::default();
    assert_eq!(config.output.width, 1500);
    assert_eq!(config.output.height, 1000);
    assert_eq!(config.output.quality, 0.9);
    assert!(config.output.mime_type.is_none());

    assert!(config.watermark.enabled);
    assert_eq!(config.watermark.source, "static/watermark.png");
    assert_eq!(config.watermark.opacity, 0.7);
    assert!((config.watermark.width_ratio * 1500.0 - 480.0).abs() < 1e-9);
    assert_eq!(config.watermark.padding_ratio, 0.025);
    assert_eq!(config.watermark.shadow.alpha, 0.28);
    assert_eq!(config.watermark.shadow.blur_ratio, 0.006);
    assert_eq!(config.watermark.shadow.offset_ratio, 0.002);
}

#[test]
fn test_env_var_substitution() {
    std::env::set_var("LISTING_WM_TEST_SOURCE", "/srv/brand/logo.png");

    let yaml = r#"
watermark:
  source: "${LISTING_WM_TEST_SOURCE}"
"#;
    let config = PipelineConfig::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.watermark.source, "/srv/brand/logo.png");

    std::env::remove_var("LISTING_WM_TEST_SOURCE");
}

#[test]
fn test_missing_env_var_is_error() {
    let yaml = r#"
watermark:
  source: "${LISTING_WM_TEST_UNSET_VARIABLE}"
"#;
    match PipelineConfig::from_yaml_with_env(yaml) {
        Err(ConfigError::MissingEnvVar(name)) => {
            assert_eq!(name, "LISTING_WM_TEST_UNSET_VARIABLE");
        }
        other => panic!("Expected MissingEnvVar, got {:?}", other),
    }
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "output:\n  width: 640\n  height: 480").unwrap();

    let config = PipelineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.output.width, 640);
    assert_eq!(config.output.height, 480);
}

#[test]
fn test_from_missing_file_is_io_error() {
    let result = PipelineConfig::from_file("/nonexistent/listing-watermark.yaml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_validate_quality_range() {
    let mut config = PipelineConfig::default();
    config.output.quality = 0.0;
    assert!(config.validate().is_err());

    config.output.quality = 1.0;
    assert!(config.validate().is_ok());

    config.output.quality = 1.1;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_watermark_ratios() {
    let mut config = PipelineConfig::default();
    config.watermark.padding_ratio = 0.5;
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.watermark.width_ratio = 0.0;
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.watermark.shadow.alpha = -0.1;
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.watermark.shadow.blur_ratio = -0.01;
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.watermark.shadow.blur_ratio = 5.0;
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.watermark.shadow.offset_ratio = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_empty_source_only_matters_when_enabled() {
    let mut config = PipelineConfig::default();
    config.watermark.source = "  ".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("watermark.source"));

    config.watermark.enabled = false;
    assert!(config.validate().is_ok());
}
