use std::env;

use crate::error::AppError;

/// Default size ceiling for a single uploaded file (10 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout. `None` keeps the HTTP client default.
    pub timeout_ms: Option<u64>,
}

/// Upload validation configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_bytes: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig {
            base_url: env::var("DOCCHAT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout_ms: match env::var("DOCCHAT_TIMEOUT_MS") {
                Ok(raw) => Some(raw.parse().map_err(|_| AppError::Config {
                    message: format!("DOCCHAT_TIMEOUT_MS is not a number: {raw}"),
                })?),
                Err(_) => None,
            },
        };

        let upload = UploadConfig {
            max_file_bytes: env::var("DOCCHAT_MAX_FILE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_FILE_BYTES),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            api,
            upload,
            logging,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_ms: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}
