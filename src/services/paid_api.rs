//! Metered translation API authenticated with a developer key
//!
//! The API refuses requests carrying more than `max_segments` texts
//! ("Too many text segments"), so large batches are split into consecutive
//! chunks. Each chunk is one request; their results are appended to a
//! local accumulator in chunk order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::client::{build_http_client, ensure_same_length, read_success_body};
use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Backend, Translations};
use crate::core::request_counter::RequestCounter;
use crate::services::{resolve_languages, TranslatorService};

/// Request body for one call
#[derive(Debug, Serialize)]
struct PaidRequest<'a> {
    q: &'a [String],
    target: &'a str,
    source: &'a str,
}

/// The API wraps its payload in `data`; some proxies strip it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PaidEnvelope {
    Wrapped { data: PaidPayload },
    Bare(PaidPayload),
}

#[derive(Debug, Deserialize)]
struct PaidPayload {
    #[serde(default)]
    translations: Vec<PaidTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaidTranslation {
    translated_text: String,
}

impl PaidEnvelope {
    fn into_texts(self) -> Vec<String> {
        let payload = match self {
            PaidEnvelope::Wrapped { data } => data,
            PaidEnvelope::Bare(payload) => payload,
        };
        payload
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect()
    }
}

/// Translator backed by the metered API.
///
/// Not `Clone`: the request count belongs to one instance.
#[derive(Debug)]
pub struct PaidApiTranslator {
    client: reqwest::Client,
    endpoint: String,
    developer_key: String,
    max_segments: usize,
    counter: RequestCounter,
}

impl PaidApiTranslator {
    /// Create a new translator; fails without a developer key
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate_for(Backend::PaidApi)?;

        let developer_key = config
            .paid_api_key
            .clone()
            .ok_or_else(|| TranslationError::config("GOOGLE_TRANSLATE_KEY is not configured"))?;

        let client = build_http_client(config)?;
        info!(
            "{} service ready ({} texts per request)",
            Backend::PaidApi,
            config.max_segments
        );

        Ok(Self {
            client,
            endpoint: config.paid_endpoint.clone(),
            developer_key,
            max_segments: config.max_segments,
            counter: RequestCounter::new(),
        })
    }

    /// Largest number of texts sent in one request
    pub fn max_segments(&self) -> usize {
        self.max_segments
    }

    /// Issue one request for at most `max_segments` texts
    async fn send_request(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: &str,
    ) -> Result<Vec<String>> {
        let issued = self.counter.record();
        debug!(
            "{}: translating {} texts {} -> {} (request #{})",
            Backend::PaidApi,
            texts.len(),
            source_language,
            target_language,
            issued
        );

        let body = PaidRequest {
            q: texts,
            target: target_language,
            source: source_language,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.developer_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let body = read_success_body(Backend::PaidApi.as_str(), response).await?;
        let envelope: PaidEnvelope = serde_json::from_str(&body)?;
        let translated = envelope.into_texts();

        ensure_same_length(Backend::PaidApi.as_str(), texts.len(), translated.len())?;
        Ok(translated)
    }

    /// Translate every chunk in order, appending into `translated`
    async fn translate_chunks(
        &self,
        strings: &[String],
        target_language: &str,
        source_language: &str,
        mut translated: Vec<String>,
    ) -> Result<Vec<String>> {
        for chunk in strings.chunks(self.max_segments) {
            let chunk_translations = self
                .send_request(chunk, target_language, source_language)
                .await?;
            translated.extend(chunk_translations);
        }
        Ok(translated)
    }
}

#[async_trait]
impl TranslatorService for PaidApiTranslator {
    fn name(&self) -> &'static str {
        Backend::PaidApi.as_str()
    }

    fn request_count(&self) -> u64 {
        self.counter.get()
    }

    async fn translate_string(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String> {
        let (target_language, source_language) =
            resolve_languages(target_language, source_language)?;

        let texts = [text.to_string()];
        let translated = self
            .send_request(&texts, target_language, source_language)
            .await?;

        translated
            .into_iter()
            .next()
            .ok_or_else(|| TranslationError::InvalidResponseError {
                message: "No translation in response".to_string(),
            })
    }

    /// Always materializes; `optimized = true` is rejected.
    async fn translate_strings(
        &self,
        strings: &[String],
        target_language: &str,
        source_language: Option<&str>,
        optimized: bool,
    ) -> Result<Translations> {
        if optimized {
            return Err(TranslationError::invalid_argument(
                "optimized=true is not supported by the paid API service",
            ));
        }

        let (target_language, source_language) =
            resolve_languages(target_language, source_language)?;

        if strings.is_empty() {
            return Ok(Translations::Materialized(Vec::new()));
        }

        let translated = self
            .translate_chunks(
                strings,
                target_language,
                source_language,
                Vec::with_capacity(strings.len()),
            )
            .await?;

        Ok(Translations::Materialized(translated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ServiceConfig {
        ServiceConfig {
            backend: Backend::PaidApi,
            paid_api_key: Some("dev-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let result = PaidApiTranslator::new(&ServiceConfig::default());
        assert!(matches!(result, Err(TranslationError::ConfigError { .. })));
    }

    #[test]
    fn test_default_segment_limit() {
        let translator = PaidApiTranslator::new(&config()).unwrap();
        assert_eq!(translator.max_segments(), 128);
        assert_eq!(translator.request_count(), 0);
    }

    #[test]
    fn test_envelope_accepts_wrapped_and_bare() {
        let wrapped: PaidEnvelope = serde_json::from_value(json!({
            "data": { "translations": [{ "translatedText": "Bonjour" }] }
        }))
        .unwrap();
        assert_eq!(wrapped.into_texts(), vec!["Bonjour"]);

        let bare: PaidEnvelope = serde_json::from_value(json!({
            "translations": [{ "translatedText": "Hola", "detectedSourceLanguage": "en" }]
        }))
        .unwrap();
        assert_eq!(bare.into_texts(), vec!["Hola"]);
    }

    #[tokio::test]
    async fn test_optimized_rejected_before_any_request() {
        let translator = PaidApiTranslator::new(&config()).unwrap();
        let result = translator
            .translate_strings(&["Hello".to_string()], "fr", None, true)
            .await;

        assert!(matches!(result, Err(TranslationError::InvalidArgument { .. })));
        assert_eq!(translator.request_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let translator = PaidApiTranslator::new(&config()).unwrap();
        let result = translator
            .translate_strings(&[], "fr", None, false)
            .await
            .unwrap();

        assert!(result.into_vec().await.unwrap().is_empty());
        assert_eq!(translator.request_count(), 0);
    }
}
