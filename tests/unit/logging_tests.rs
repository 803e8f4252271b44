// Logging tests
//
// Structured logs carry key-value fields instead of formatted strings, e.g.
// {"level":"WARN","fields":{"message":"Watermark unavailable, continuing without it","source":"static/watermark.png"}}

use listing_watermark::logging::{init_subscriber, LogFormat, LoggingConfig};

/// Test: Can initialize tracing subscriber, and only once per process
#[test]
fn test_init_subscriber_once() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Json,
    };

    let first = init_subscriber(&config);
    assert!(first.is_ok(), "first init failed: {:?}", first.err());

    tracing::info!(component = "logging_tests", "subscriber installed");

    // A global subscriber is already set
    assert!(init_subscriber(&config).is_err());
}

#[test]
fn test_logging_config_from_yaml_defaults() {
    let config: LoggingConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config, LoggingConfig::default());
}
