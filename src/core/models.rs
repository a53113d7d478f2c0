//! Core data models for translation

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::{Result, TranslationError};
use crate::services::TranslatorService;

/// Source language used when the caller does not name one
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

/// Available translation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Free, unauthenticated web endpoint
    #[default]
    WebScrape,
    /// Metered API authenticated with a developer key
    PaidApi,
    /// Cloud API authenticated with an API key or an IAM token
    CloudApi,
}

impl Backend {
    /// Every backend, in selection order
    pub const ALL: [Backend; 3] = [Backend::WebScrape, Backend::PaidApi, Backend::CloudApi];

    /// Stable identifier, also accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::WebScrape => "web_scrape",
            Backend::PaidApi => "paid_api",
            Backend::CloudApi => "cloud_api",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Backend {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "web_scrape" | "web" | "free" | "goslate" => Ok(Backend::WebScrape),
            "paid_api" | "paid" | "google" => Ok(Backend::PaidApi),
            "cloud_api" | "cloud" | "yandex" => Ok(Backend::CloudApi),
            other => Err(TranslationError::config(format!(
                "unknown translation service: {}",
                other
            ))),
        }
    }
}

/// Translated strings in input order.
///
/// `Lazy` issues its network calls only while it is being polled and can be
/// consumed exactly once.
pub enum Translations {
    /// Fully collected translations
    Materialized(Vec<String>),
    /// Single-pass stream of translations
    Lazy(BoxStream<'static, Result<String>>),
}

impl Translations {
    /// Whether the translations are still pending
    pub fn is_lazy(&self) -> bool {
        matches!(self, Translations::Lazy(_))
    }

    /// Drive any pending requests and collect every translation
    pub async fn into_vec(self) -> Result<Vec<String>> {
        match self {
            Translations::Materialized(items) => Ok(items),
            Translations::Lazy(items) => items.try_collect().await,
        }
    }

    /// View the translations as a stream regardless of their form
    pub fn into_stream(self) -> BoxStream<'static, Result<String>> {
        match self {
            Translations::Materialized(items) => stream::iter(items.into_iter().map(Ok)).boxed(),
            Translations::Lazy(items) => items,
        }
    }
}

impl fmt::Debug for Translations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translations::Materialized(items) => {
                f.debug_tuple("Materialized").field(items).finish()
            }
            Translations::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<Vec<String>> for Translations {
    fn from(items: Vec<String>) -> Self {
        Translations::Materialized(items)
    }
}

/// Batch translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Source texts, in catalog order
    pub strings: Vec<String>,
    /// Target language code
    pub target_language: String,
    /// Source language code, `en` unless set
    pub source_language: String,
    /// Allow a lazy result
    pub optimized: bool,
}

impl TranslationRequest {
    /// Create an optimized request from English
    pub fn new(strings: Vec<String>, target_language: impl Into<String>) -> Self {
        Self {
            strings,
            target_language: target_language.into(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            optimized: true,
        }
    }

    /// Translate from another source language
    pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    /// Choose between a lazy and a materialized result
    pub fn optimized(mut self, optimized: bool) -> Self {
        self.optimized = optimized;
        self
    }

    /// Run the request against a service
    pub async fn send(&self, service: &dyn TranslatorService) -> Result<Translations> {
        service
            .translate_strings(
                &self.strings,
                &self.target_language,
                Some(&self.source_language),
                self.optimized,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str_aliases() {
        assert_eq!("web-scrape".parse::<Backend>().unwrap(), Backend::WebScrape);
        assert_eq!("Paid_API".parse::<Backend>().unwrap(), Backend::PaidApi);
        assert_eq!("yandex".parse::<Backend>().unwrap(), Backend::CloudApi);
        assert!(matches!(
            "deepl".parse::<Backend>(),
            Err(TranslationError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_backend_display_round_trips() {
        for backend in Backend::ALL {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_lazy_translations_collect_in_order() {
        let lazy = Translations::Lazy(
            stream::iter(vec![Ok("un".to_string()), Ok("deux".to_string())]).boxed(),
        );
        assert!(lazy.is_lazy());

        let items = tokio_test::block_on(lazy.into_vec()).unwrap();
        assert_eq!(items, vec!["un", "deux"]);
    }

    #[test]
    fn test_lazy_translations_stop_at_first_error() {
        let lazy = Translations::Lazy(
            stream::iter(vec![
                Ok("un".to_string()),
                Err(TranslationError::invalid_argument("boom")),
                Ok("trois".to_string()),
            ])
            .boxed(),
        );

        let result = tokio_test::block_on(lazy.into_vec());
        assert!(matches!(result, Err(TranslationError::InvalidArgument { .. })));
    }

    #[test]
    fn test_materialized_into_stream() {
        let items = Translations::from(vec!["a".to_string(), "b".to_string()]);
        assert!(!items.is_lazy());

        let collected: Vec<String> =
            tokio_test::block_on(items.into_stream().try_collect()).unwrap();
        assert_eq!(collected, vec!["a", "b"]);
    }

    #[test]
    fn test_request_defaults() {
        let request = TranslationRequest::new(vec!["Hello".to_string()], "fr");
        assert_eq!(request.source_language, DEFAULT_SOURCE_LANGUAGE);
        assert!(request.optimized);

        let request = request.with_source_language("de").optimized(false);
        assert_eq!(request.source_language, "de");
        assert!(!request.optimized);
    }
}
