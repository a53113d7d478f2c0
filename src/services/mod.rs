//! Interchangeable machine-translation backends
//!
//! Every backend implements [`TranslatorService`]. Callers pick one through
//! [`ServiceConfig::backend`] and [`build_service`], then hand it ordered
//! batches of catalog strings. Outputs always come back in input order.
//!
//! Services are not safe to drive from several tasks at once; give each
//! concurrent worker its own instance.

use async_trait::async_trait;
use tracing::info;

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Backend, Translations, DEFAULT_SOURCE_LANGUAGE};

pub mod cloud_api;
pub mod paid_api;
pub mod web_scrape;

pub use cloud_api::CloudApiTranslator;
pub use paid_api::PaidApiTranslator;
pub use web_scrape::WebScrapeTranslator;

/// Common interface of all translation backends
#[async_trait]
pub trait TranslatorService: Send + Sync {
    /// Stable backend identifier used in logs and errors
    fn name(&self) -> &'static str;

    /// Network calls issued since construction
    fn request_count(&self) -> u64;

    /// Translate exactly one string.
    ///
    /// `source_language` defaults to [`DEFAULT_SOURCE_LANGUAGE`].
    async fn translate_string(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String> {
        let _ = (text, target_language, source_language);
        Err(TranslationError::Unsupported {
            service: self.name(),
            operation: "translate_string",
        })
    }

    /// Translate an ordered batch.
    ///
    /// With `optimized` set a backend may answer with a lazy, single-pass
    /// [`Translations::Lazy`]; otherwise the result is always materialized.
    async fn translate_strings(
        &self,
        strings: &[String],
        target_language: &str,
        source_language: Option<&str>,
        optimized: bool,
    ) -> Result<Translations>;
}

/// Check language codes and resolve the default source language
pub(crate) fn resolve_languages<'a>(
    target_language: &'a str,
    source_language: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    if target_language.trim().is_empty() {
        return Err(TranslationError::invalid_argument(
            "target language must not be empty",
        ));
    }

    let source_language = source_language.unwrap_or(DEFAULT_SOURCE_LANGUAGE);
    if source_language.trim().is_empty() {
        return Err(TranslationError::invalid_argument(
            "source language must not be empty",
        ));
    }

    Ok((target_language, source_language))
}

/// Construct the backend selected by the configuration
pub fn build_service(config: &ServiceConfig) -> Result<Box<dyn TranslatorService>> {
    info!("Using translation service: {}", config.backend);

    let service: Box<dyn TranslatorService> = match config.backend {
        Backend::WebScrape => Box::new(WebScrapeTranslator::new(config)?),
        Backend::PaidApi => Box::new(PaidApiTranslator::new(config)?),
        Backend::CloudApi => Box::new(CloudApiTranslator::new(config)?),
    };

    Ok(service)
}
