//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use crate::net::timeouts::{BULK_REQUEST_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, UPLOAD_TIMEOUT};
use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5190/api";

/// How video files reach the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStrategy {
    /// Single multipart request to `/Video/registrar`
    #[default]
    Multipart,
    /// Presigned URL from `/s3/get-presigned-url`, direct PUT, then `/videos`
    Presigned,
}

impl FromStr for UploadStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multipart" => Ok(UploadStrategy::Multipart),
            "presigned" | "s3" => Ok(UploadStrategy::Presigned),
            other => Err(ConfigError::Invalid {
                var: "ACADEMIQ_UPLOAD_STRATEGY".to_string(),
                reason: format!("Unknown strategy '{other}', expected multipart or presigned"),
            }),
        }
    }
}

impl fmt::Display for UploadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStrategy::Multipart => write!(f, "multipart"),
            UploadStrategy::Presigned => write!(f, "presigned"),
        }
    }
}

/// Complete client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without trailing slash
    pub base_url: String,
    /// Timeout for ordinary requests
    pub request_timeout: Duration,
    /// Timeout for bulk writes
    pub bulk_timeout: Duration,
    /// Timeout for file uploads
    pub upload_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Where the session is persisted; `None` keeps it in memory only
    pub session_file: Option<PathBuf>,
    /// Video upload flow
    pub upload_strategy: UploadStrategy,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `ACADEMIQ_API_URL`: backend base URL (default: `http://localhost:5190/api`)
    /// - `ACADEMIQ_REQUEST_TIMEOUT_SECS`: request timeout (default: 10)
    /// - `ACADEMIQ_BULK_TIMEOUT_SECS`: bulk write timeout (default: 15)
    /// - `ACADEMIQ_UPLOAD_TIMEOUT_SECS`: upload timeout (default: 600)
    /// - `ACADEMIQ_CONNECT_TIMEOUT_SECS`: connect timeout (default: 5)
    /// - `ACADEMIQ_SESSION_FILE`: session file (default: `$HOME/.academiq/session.json`)
    /// - `ACADEMIQ_UPLOAD_STRATEGY`: `multipart` or `presigned` (default: multipart)
    ///
    /// # Arguments
    ///
    /// * `base_url_override` - Optional base URL override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ClientConfig, ConfigError>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if a variable holds an invalid value
    pub fn from_env(base_url_override: Option<String>) -> Result<Self, ConfigError> {
        let base_url = base_url_override
            .or_else(|| std::env::var("ACADEMIQ_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let upload_strategy = match std::env::var("ACADEMIQ_UPLOAD_STRATEGY") {
            Ok(value) => value.parse()?,
            Err(_) => UploadStrategy::default(),
        };

        let session_file = std::env::var("ACADEMIQ_SESSION_FILE")
            .ok()
            .map(PathBuf::from)
            .or_else(default_session_file);

        let config = ClientConfig {
            base_url: normalize_base_url(&base_url),
            request_timeout: Duration::from_secs(parse_env_or(
                "ACADEMIQ_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )),
            bulk_timeout: Duration::from_secs(parse_env_or(
                "ACADEMIQ_BULK_TIMEOUT_SECS",
                BULK_REQUEST_TIMEOUT.as_secs(),
            )),
            upload_timeout: Duration::from_secs(parse_env_or(
                "ACADEMIQ_UPLOAD_TIMEOUT_SECS",
                UPLOAD_TIMEOUT.as_secs(),
            )),
            connect_timeout: Duration::from_secs(parse_env_or("ACADEMIQ_CONNECT_TIMEOUT_SECS", 5)),
            session_file,
            upload_strategy,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration for development
    ///
    /// Points at `http://localhost:5190/api` and keeps the session in memory.
    pub fn development() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            bulk_timeout: BULK_REQUEST_TIMEOUT,
            upload_timeout: UPLOAD_TIMEOUT,
            connect_timeout: Duration::from_secs(5),
            session_file: None,
            upload_strategy: UploadStrategy::Multipart,
        }
    }

    /// Development configuration pointed at another backend
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::development()
        }
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "ACADEMIQ_API_URL".to_string(),
                reason: format!("'{}' must start with http:// or https://", self.base_url),
            });
        }

        let timeouts = [
            ("ACADEMIQ_REQUEST_TIMEOUT_SECS", self.request_timeout),
            ("ACADEMIQ_BULK_TIMEOUT_SECS", self.bulk_timeout),
            ("ACADEMIQ_UPLOAD_TIMEOUT_SECS", self.upload_timeout),
            ("ACADEMIQ_CONNECT_TIMEOUT_SECS", self.connect_timeout),
        ];
        for (var, value) in timeouts {
            if value.is_zero() {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }
        }

        if self.bulk_timeout < self.request_timeout {
            return Err(ConfigError::Invalid {
                var: "ACADEMIQ_BULK_TIMEOUT_SECS".to_string(),
                reason: format!(
                    "Must not be shorter than the request timeout ({}s)",
                    self.request_timeout.as_secs()
                ),
            });
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_session_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".academiq").join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "ACADEMIQ_API_URL",
        "ACADEMIQ_REQUEST_TIMEOUT_SECS",
        "ACADEMIQ_BULK_TIMEOUT_SECS",
        "ACADEMIQ_UPLOAD_TIMEOUT_SECS",
        "ACADEMIQ_CONNECT_TIMEOUT_SECS",
        "ACADEMIQ_SESSION_FILE",
        "ACADEMIQ_UPLOAD_STRATEGY",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: env tests are serialized
            unsafe { std::env::remove_var(var) };
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "ACADEMIQ_API_URL".to_string(),
            reason: "bad scheme".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ACADEMIQ_API_URL"));
        assert!(msg.contains("bad scheme"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = ClientConfig::from_env(None).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.bulk_timeout, Duration::from_secs(15));
        assert_eq!(config.upload_timeout, Duration::from_secs(600));
        assert_eq!(config.upload_strategy, UploadStrategy::Multipart);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_variables() {
        clear_env();
        unsafe {
            std::env::set_var("ACADEMIQ_API_URL", "https://lms.example.com/api/");
            std::env::set_var("ACADEMIQ_REQUEST_TIMEOUT_SECS", "3");
            std::env::set_var("ACADEMIQ_UPLOAD_STRATEGY", "Presigned");
            std::env::set_var("ACADEMIQ_SESSION_FILE", "/tmp/aq-session.json");
        }

        let config = ClientConfig::from_env(None).unwrap();
        assert_eq!(config.base_url, "https://lms.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.upload_strategy, UploadStrategy::Presigned);
        assert_eq!(
            config.session_file,
            Some(PathBuf::from("/tmp/aq-session.json"))
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_override_wins_over_env() {
        clear_env();
        unsafe { std::env::set_var("ACADEMIQ_API_URL", "http://ignored:1/api") };
        let config = ClientConfig::from_env(Some("http://127.0.0.1:9000/api".into())).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/api");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_unknown_upload_strategy_rejected() {
        clear_env();
        unsafe { std::env::set_var("ACADEMIQ_UPLOAD_STRATEGY", "carrier-pigeon") };
        let err = ClientConfig::from_env(None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "ACADEMIQ_UPLOAD_STRATEGY"));
        clear_env();
    }

    #[test]
    fn test_validation_rejects_bad_scheme() {
        let config = ClientConfig::with_base_url("ftp://localhost/api");
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = ClientConfig {
            request_timeout: Duration::ZERO,
            ..ClientConfig::development()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ACADEMIQ_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_validation_bulk_not_shorter_than_request() {
        let config = ClientConfig {
            request_timeout: Duration::from_secs(20),
            bulk_timeout: Duration::from_secs(15),
            ..ClientConfig::development()
        };
        assert!(config.validate().is_err());
        assert!(ClientConfig::development().validate().is_ok());
    }
}
