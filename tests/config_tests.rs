// Config loading and validation tests

use std::io::Write;

use txview::config::{AppConfig, ChartsConfig, HistogramConfig};

const VALID_CONFIG: &str = r#"
[charts]
top_timer_count = 7
gap_slack_factor = 0.25
micros_per_millisecond = 1000.0

[histogram]
significant_digits = 2
raw_value_limit = 512

[source]
path = "data/aggregates.json"
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.charts.top_timer_count, 7);
    assert_eq!(config.charts.gap_slack_factor, 0.25);
    assert_eq!(config.histogram.significant_digits, 2);
    assert_eq!(config.histogram.raw_value_limit, 512);
    assert_eq!(config.source.path, "data/aggregates.json");
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let config = AppConfig::load_from_str("[source]\npath = \"a.json\"\n").unwrap();
    assert_eq!(config.charts, ChartsConfig::default());
    assert_eq!(config.histogram, HistogramConfig::default());
    assert_eq!(config.charts.top_timer_count, 5);
    assert_eq!(config.histogram.raw_value_limit, 1024);
}

#[test]
fn test_config_requires_source() {
    assert!(AppConfig::load_from_str("[charts]\ntop_timer_count = 3\n").is_err());
}

#[test]
fn test_config_validation_rejects_zero_top_timer_count() {
    let bad = VALID_CONFIG.replace("top_timer_count = 7", "top_timer_count = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("charts.top_timer_count"));
}

#[test]
fn test_config_validation_rejects_negative_slack() {
    let bad = VALID_CONFIG.replace("gap_slack_factor = 0.25", "gap_slack_factor = -1.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("charts.gap_slack_factor"));
}

#[test]
fn test_config_validation_rejects_zero_micros_per_millisecond() {
    let bad = VALID_CONFIG.replace(
        "micros_per_millisecond = 1000.0",
        "micros_per_millisecond = 0.0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("charts.micros_per_millisecond"));
}

#[test]
fn test_config_validation_rejects_significant_digits_out_of_range() {
    for digits in ["0", "6"] {
        let bad = VALID_CONFIG.replace(
            "significant_digits = 2",
            &format!("significant_digits = {digits}"),
        );
        let err = AppConfig::load_from_str(&bad).unwrap_err();
        assert!(err.to_string().contains("histogram.significant_digits"));
    }
}

#[test]
fn test_config_validation_rejects_zero_raw_value_limit() {
    let bad = VALID_CONFIG.replace("raw_value_limit = 512", "raw_value_limit = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("histogram.raw_value_limit"));
}

#[test]
fn test_config_validation_rejects_empty_source_path() {
    let bad = VALID_CONFIG.replace("path = \"data/aggregates.json\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("source.path"));
}

#[test]
fn test_config_load_reads_config_file_env() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(VALID_CONFIG.as_bytes()).unwrap();
    // only test in this binary that touches CONFIG_FILE
    unsafe { std::env::set_var("CONFIG_FILE", file.path()) };
    let config = AppConfig::load().unwrap();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    assert_eq!(config.charts.top_timer_count, 7);
}
