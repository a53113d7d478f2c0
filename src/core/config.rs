//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::Backend;

/// Free web endpoint used by the web-scrape backend
pub const DEFAULT_WEB_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Metered API endpoint used by the paid backend
pub const DEFAULT_PAID_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Cloud API endpoint used by the cloud backend
pub const DEFAULT_CLOUD_ENDPOINT: &str =
    "https://translate.api.cloud.yandex.net/translate/v2/translate";

/// The paid API rejects requests with more text segments than this
pub const DEFAULT_MAX_SEGMENTS: usize = 128;

/// Credentials, limits and endpoints for every backend.
///
/// Read once when a service is built; services keep their own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service built by `build_service`
    pub backend: Backend,
    /// Developer key of the paid API (`GOOGLE_TRANSLATE_KEY`)
    pub paid_api_key: Option<String>,
    /// Most texts per paid API request
    pub max_segments: usize,
    /// Cloud API key (`YANDEX_API_KEY`), preferred over the IAM token
    pub cloud_api_key: Option<String>,
    /// Cloud IAM token (`YANDEX_IAM_TOKEN`)
    pub cloud_iam_token: Option<String>,
    /// Cloud folder id (`YANDEX_FOLDER_ID`), required with the IAM token
    pub cloud_folder_id: Option<String>,
    /// Most texts per cloud request; unset sends the whole batch at once
    pub cloud_max_texts: Option<usize>,
    /// Free web endpoint URL
    pub web_endpoint: String,
    /// Paid API endpoint URL
    pub paid_endpoint: String,
    /// Cloud API endpoint URL
    pub cloud_endpoint: String,
    /// Per-request timeout; unset keeps the HTTP client's default
    pub timeout_ms: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            paid_api_key: None,
            max_segments: DEFAULT_MAX_SEGMENTS,
            cloud_api_key: None,
            cloud_iam_token: None,
            cloud_folder_id: None,
            cloud_max_texts: None,
            web_endpoint: DEFAULT_WEB_ENDPOINT.to_string(),
            paid_endpoint: DEFAULT_PAID_ENDPOINT.to_string(),
            cloud_endpoint: DEFAULT_CLOUD_ENDPOINT.to_string(),
            timeout_ms: None,
        }
    }
}

/// Read a non-empty environment variable
fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse an optional environment variable
fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env_string(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| {
                TranslationError::config(format!("{} has an invalid value: {}", name, raw))
            }),
        None => Ok(None),
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend = match env_string("AUTOTRANSLATE_SERVICE") {
            Some(name) => name.parse::<Backend>()?,
            None => defaults.backend,
        };

        Ok(Self {
            backend,
            paid_api_key: env_string("GOOGLE_TRANSLATE_KEY"),
            max_segments: env_parse("AUTOTRANSLATE_MAX_SEGMENTS")?.unwrap_or(defaults.max_segments),
            cloud_api_key: env_string("YANDEX_API_KEY"),
            cloud_iam_token: env_string("YANDEX_IAM_TOKEN"),
            cloud_folder_id: env_string("YANDEX_FOLDER_ID"),
            cloud_max_texts: env_parse("YANDEX_MAX_TEXTS")?,
            web_endpoint: env_string("AUTOTRANSLATE_WEB_ENDPOINT").unwrap_or(defaults.web_endpoint),
            paid_endpoint: env_string("AUTOTRANSLATE_PAID_ENDPOINT")
                .unwrap_or(defaults.paid_endpoint),
            cloud_endpoint: env_string("AUTOTRANSLATE_CLOUD_ENDPOINT")
                .unwrap_or(defaults.cloud_endpoint),
            timeout_ms: env_parse("AUTOTRANSLATE_TIMEOUT_MS")?,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Use a different backend with the same credentials
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Whether the credentials a backend needs are all present
    pub fn has_credentials_for(&self, backend: Backend) -> bool {
        match backend {
            Backend::WebScrape => true,
            Backend::PaidApi => self.paid_api_key.is_some(),
            Backend::CloudApi => {
                self.cloud_api_key.is_some()
                    || (self.cloud_iam_token.is_some() && self.cloud_folder_id.is_some())
            }
        }
    }

    /// Validate configuration for the selected backend
    pub fn validate(&self) -> Result<()> {
        self.validate_for(self.backend)
    }

    /// Validate limits and the credentials a specific backend needs
    pub fn validate_for(&self, backend: Backend) -> Result<()> {
        if self.max_segments == 0 {
            return Err(TranslationError::config("max_segments must be greater than 0"));
        }

        if self.cloud_max_texts == Some(0) {
            return Err(TranslationError::config("cloud_max_texts must be greater than 0"));
        }

        if !self.has_credentials_for(backend) {
            return Err(match backend {
                Backend::PaidApi => TranslationError::config(
                    "GOOGLE_TRANSLATE_KEY is not configured, it is required by the paid API service",
                ),
                _ => TranslationError::config(
                    "YANDEX_API_KEY, or both YANDEX_IAM_TOKEN and YANDEX_FOLDER_ID, are required by the cloud API service",
                ),
            });
        }

        if backend == Backend::CloudApi
            && self.cloud_api_key.is_some()
            && self.cloud_iam_token.is_some()
        {
            warn!("Both an API key and an IAM token are configured, the API key is used");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert_eq!(config.backend, Backend::WebScrape);
        assert_eq!(config.max_segments, DEFAULT_MAX_SEGMENTS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paid_backend_requires_key() {
        let config = ServiceConfig::default().with_backend(Backend::PaidApi);
        assert!(matches!(
            config.validate(),
            Err(TranslationError::ConfigError { .. })
        ));

        let config = ServiceConfig {
            paid_api_key: Some("dev-key".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cloud_backend_credentials() {
        let base = ServiceConfig::default().with_backend(Backend::CloudApi);
        assert!(base.validate().is_err());

        let token_only = ServiceConfig {
            cloud_iam_token: Some("t1".to_string()),
            ..base.clone()
        };
        assert!(token_only.validate().is_err());

        let token_and_folder = ServiceConfig {
            cloud_folder_id: Some("folder".to_string()),
            ..token_only
        };
        assert!(token_and_folder.validate().is_ok());

        let key_only = ServiceConfig {
            cloud_api_key: Some("k1".to_string()),
            ..base
        };
        assert!(key_only.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let config = ServiceConfig {
            max_segments: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            cloud_max_texts: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autotranslate.json");

        let config = ServiceConfig {
            backend: Backend::CloudApi,
            cloud_api_key: Some("k1".to_string()),
            cloud_max_texts: Some(50),
            ..Default::default()
        };
        config.to_file(&path).unwrap();

        let loaded = ServiceConfig::from_file(&path).unwrap();
        assert_eq!(loaded.backend, Backend::CloudApi);
        assert_eq!(loaded.cloud_api_key.as_deref(), Some("k1"));
        assert_eq!(loaded.cloud_max_texts, Some(50));
        assert_eq!(loaded.max_segments, DEFAULT_MAX_SEGMENTS);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "backend": "paid_api", "paid_api_key": "dev" }"#).unwrap();

        let loaded = ServiceConfig::from_file(&path).unwrap();
        assert_eq!(loaded.backend, Backend::PaidApi);
        assert_eq!(loaded.paid_endpoint, DEFAULT_PAID_ENDPOINT);
        assert!(loaded.validate().is_ok());
    }
}
