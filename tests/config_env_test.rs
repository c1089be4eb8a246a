//! Config environment variable tests
//!
//! Verifies that Config::from_env() reads and applies environment
//! overrides. Config::from_env() also loads a .env file via dotenvy,
//! so these tests focus on override behavior.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use docchat::config::{Config, LogFormat, DEFAULT_MAX_FILE_BYTES};
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn test_config_defaults() {
    env::remove_var("DOCCHAT_BASE_URL");
    env::remove_var("DOCCHAT_TIMEOUT_MS");
    env::remove_var("DOCCHAT_MAX_FILE_BYTES");
    env::remove_var("LOG_LEVEL");
    env::remove_var("LOG_FORMAT");

    let config = Config::from_env().unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8001");
    assert_eq!(config.api.timeout_ms, None);
    assert_eq!(config.upload.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    assert_eq!(config.upload.max_file_bytes, 10 * 1024 * 1024);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_config_custom_base_url() {
    env::set_var("DOCCHAT_BASE_URL", "http://rag.internal:9000");

    let config = Config::from_env().unwrap();
    assert_eq!(config.api.base_url, "http://rag.internal:9000");

    env::remove_var("DOCCHAT_BASE_URL");
}

#[test]
#[serial]
fn test_config_custom_timeout_and_file_limit() {
    env::set_var("DOCCHAT_TIMEOUT_MS", "15000");
    env::set_var("DOCCHAT_MAX_FILE_BYTES", "1048576");

    let config = Config::from_env().unwrap();
    assert_eq!(config.api.timeout_ms, Some(15000));
    assert_eq!(config.upload.max_file_bytes, 1_048_576);

    env::remove_var("DOCCHAT_TIMEOUT_MS");
    env::remove_var("DOCCHAT_MAX_FILE_BYTES");
}

#[test]
#[serial]
fn test_config_invalid_timeout_is_an_error() {
    env::set_var("DOCCHAT_TIMEOUT_MS", "soon");

    let result = Config::from_env();
    assert!(result.is_err());

    env::remove_var("DOCCHAT_TIMEOUT_MS");
}

#[test]
#[serial]
fn test_config_json_log_format() {
    env::set_var("LOG_FORMAT", "JSON");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);

    env::remove_var("LOG_FORMAT");
}
