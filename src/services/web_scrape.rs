//! Free web translation backend
//!
//! Talks to the unauthenticated endpoint used by the browser widget. There
//! is no key and no documented limit; each text is one GET request, issued
//! in input order. Failures surface as-is and are never retried.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::client::{build_http_client, read_success_body};
use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Backend, Translations};
use crate::core::request_counter::RequestCounter;
use crate::services::{resolve_languages, TranslatorService};

/// Connection to the free endpoint, shared with lazy result streams
#[derive(Debug)]
struct FreeEndpoint {
    client: reqwest::Client,
    endpoint: String,
    counter: RequestCounter,
}

impl FreeEndpoint {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String> {
        // The endpoint answers blank input with no sentences, which would parse as an error.
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let issued = self.counter.record();
        debug!(
            "{}: translating 1 text {} -> {} (request #{})",
            Backend::WebScrape,
            source_language,
            target_language,
            issued
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let body = read_success_body(Backend::WebScrape.as_str(), response).await?;
        let value: Value = serde_json::from_str(&body)?;
        join_sentences(&value)
    }
}

/// Join the translated sentences of a response.
///
/// The payload looks like
/// `[[["Bonjour. ", "Hello. ", ..], ["Monde", "World", ..]], null, "en", ..]`.
fn join_sentences(value: &Value) -> Result<String> {
    let sentences = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::InvalidResponseError {
            message: "No translation in response".to_string(),
        })?;

    Ok(sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect())
}

/// Translator backed by the free web endpoint.
///
/// Not `Clone`; lazy streams share its request count.
#[derive(Debug)]
pub struct WebScrapeTranslator {
    inner: Arc<FreeEndpoint>,
}

impl WebScrapeTranslator {
    /// Create a new translator; needs no credentials
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate_for(Backend::WebScrape)?;

        let client = build_http_client(config)?;
        info!("{} service ready ({})", Backend::WebScrape, config.web_endpoint);

        Ok(Self {
            inner: Arc::new(FreeEndpoint {
                client,
                endpoint: config.web_endpoint.clone(),
                counter: RequestCounter::new(),
            }),
        })
    }

    /// Stream of translations that requests each text when it is polled
    fn translation_stream(
        &self,
        strings: Vec<String>,
        target_language: String,
        source_language: String,
    ) -> BoxStream<'static, Result<String>> {
        let inner = Arc::clone(&self.inner);

        stream::iter(strings)
            .then(move |text| {
                let inner = Arc::clone(&inner);
                let target_language = target_language.clone();
                let source_language = source_language.clone();
                async move {
                    inner
                        .translate(&text, &target_language, &source_language)
                        .await
                }
            })
            .boxed()
    }
}

#[async_trait]
impl TranslatorService for WebScrapeTranslator {
    fn name(&self) -> &'static str {
        Backend::WebScrape.as_str()
    }

    fn request_count(&self) -> u64 {
        self.inner.counter.get()
    }

    async fn translate_string(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String> {
        let (target_language, source_language) =
            resolve_languages(target_language, source_language)?;
        self.inner
            .translate(text, target_language, source_language)
            .await
    }

    async fn translate_strings(
        &self,
        strings: &[String],
        target_language: &str,
        source_language: Option<&str>,
        optimized: bool,
    ) -> Result<Translations> {
        let (target_language, source_language) =
            resolve_languages(target_language, source_language)?;

        let translations = self.translation_stream(
            strings.to_vec(),
            target_language.to_string(),
            source_language.to_string(),
        );

        if optimized {
            return Ok(Translations::Lazy(translations));
        }

        let translations: Vec<String> = translations.try_collect().await?;
        Ok(Translations::Materialized(translations))
    }
}
