//! Site configuration loading and validation

use std::io::Write;

use surfsense::config::SiteConfig;

#[test]
fn full_toml_round_trip() {
    let toml_str = r#"
        [site]
        name = "Test Reef"
        timezone = "UTC"

        [wind]
        offshore_min_degrees = 60.0
        offshore_max_degrees = 150.0

        [swell]
        large_height_feet = 6.0

        [aggregator]
        wind_weight = 0.5
        swell_weight = 0.3
        tide_weight = 0.2

        [enhancement]
        debounce_ms = 250
        timeout_secs = 5

        [server]
        listen_addr = "127.0.0.1:9999"
    "#;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(toml_str.as_bytes()).expect("write");

    let config = SiteConfig::load_from_file(file.path()).expect("load");
    assert_eq!(config.site.name, "Test Reef");
    assert!((config.wind.offshore_min_degrees - 60.0).abs() < f64::EPSILON);
    assert!((config.swell.large_height_feet - 6.0).abs() < f64::EPSILON);
    assert!((config.aggregator.wind_weight - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.enhancement.debounce_ms, 250);
    assert_eq!(config.enhancement.timeout_secs, 5);
    assert_eq!(config.server.listen_addr, "127.0.0.1:9999");

    // Sections absent from the file keep their defaults
    assert!((config.tide.dropping_score - 4.5).abs() < f64::EPSILON);
    assert_eq!(config.evaluation.interval_secs, 60);
}

#[test]
fn invalid_weights_are_rejected_on_load() {
    let toml_str = r#"
        [aggregator]
        wind_weight = 0.9
        swell_weight = 0.4
        tide_weight = 0.2
    "#;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(toml_str.as_bytes()).expect("write");

    assert!(SiteConfig::load_from_file(file.path()).is_err());
}

#[test]
fn malformed_toml_is_an_error_not_a_panic() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"this is { not toml").expect("write");

    assert!(SiteConfig::load_from_file(file.path()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let path = std::path::Path::new("/nonexistent/surfsense/site_config.toml");
    assert!(SiteConfig::load_from_file(path).is_err());
}

#[test]
fn defaults_match_reference_constants() {
    let config = SiteConfig::default();
    // Scoring breakpoints
    assert!((config.wind.offshore_min_degrees - 45.0).abs() < f64::EPSILON);
    assert!((config.wind.offshore_max_degrees - 135.0).abs() < f64::EPSILON);
    assert!((config.swell.long_period_seconds - 15.0).abs() < f64::EPSILON);
    assert!((config.swell.firing_height_feet - 10.0).abs() < f64::EPSILON);
    assert!((config.swell.firing_period_seconds - 18.0).abs() < f64::EPSILON);
    // Pipeline timing
    assert_eq!(config.enhancement.debounce_ms, 500);
    assert_eq!(config.enhancement.duplicate_window_ms, 2000);
    assert_eq!(config.enhancement.timeout_secs, 10);
    assert_eq!(config.enhancement.cache_ttl_secs, 1800);
    // Validation bounds
    assert_eq!(config.enhancement.max_response_chars, 400);
    assert!((config.enhancement.max_growth_factor - 2.0).abs() < f64::EPSILON);
}
