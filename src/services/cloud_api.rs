//! Cloud translation API
//!
//! Authenticates with either an API key (`Authorization: Api-Key ..`) or an
//! IAM token plus folder id (`Authorization: Bearer ..`). The API key wins
//! when both are configured. The whole batch goes out in one request unless
//! `cloud_max_texts` sets a chunk size.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::client::{build_http_client, ensure_same_length, read_success_body};
use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Backend, Translations};
use crate::core::request_counter::RequestCounter;
use crate::services::{resolve_languages, TranslatorService};

/// How requests are authorized
#[derive(Debug, Clone)]
pub enum CloudCredentials {
    /// Static API key of a service account
    ApiKey(String),
    /// Short-lived IAM token; requests also need the folder id
    IamToken(String),
}

impl CloudCredentials {
    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        match self {
            CloudCredentials::ApiKey(key) => format!("Api-Key {}", key),
            CloudCredentials::IamToken(token) => format!("Bearer {}", token),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CloudRequest<'a> {
    target_language_code: &'a str,
    texts: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CloudResponse {
    #[serde(default)]
    translations: Vec<CloudTranslation>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CloudTranslation {
    text: String,
}

/// Translator backed by the cloud API.
///
/// Not `Clone`: the request count belongs to one instance.
#[derive(Debug)]
pub struct CloudApiTranslator {
    client: reqwest::Client,
    endpoint: String,
    credentials: CloudCredentials,
    folder_id: Option<String>,
    max_texts: Option<usize>,
    counter: RequestCounter,
}

impl CloudApiTranslator {
    /// Create a new translator; needs an API key, or an IAM token and a folder id
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate_for(Backend::CloudApi)?;

        let credentials = match (
            &config.cloud_api_key,
            &config.cloud_iam_token,
            &config.cloud_folder_id,
        ) {
            (Some(key), _, _) => CloudCredentials::ApiKey(key.clone()),
            (None, Some(token), Some(_)) => CloudCredentials::IamToken(token.clone()),
            _ => {
                return Err(TranslationError::config(
                    "YANDEX_API_KEY, or both YANDEX_IAM_TOKEN and YANDEX_FOLDER_ID, are required",
                ))
            }
        };

        let client = build_http_client(config)?;
        info!(
            "{} service ready ({})",
            Backend::CloudApi,
            match &credentials {
                CloudCredentials::ApiKey(_) => "api key",
                CloudCredentials::IamToken(_) => "iam token",
            }
        );

        Ok(Self {
            client,
            endpoint: config.cloud_endpoint.clone(),
            credentials,
            folder_id: config.cloud_folder_id.clone(),
            max_texts: config.cloud_max_texts,
            counter: RequestCounter::new(),
        })
    }

    /// Credentials used for every request
    pub fn credentials(&self) -> &CloudCredentials {
        &self.credentials
    }

    /// Issue one request for `texts`
    async fn send_request(&self, texts: &[String], target_language: &str) -> Result<Vec<String>> {
        let issued = self.counter.record();
        debug!(
            "{}: translating {} texts -> {} (request #{})",
            Backend::CloudApi,
            texts.len(),
            target_language,
            issued
        );

        let body = CloudRequest {
            target_language_code: target_language,
            texts,
            folder_id: self.folder_id.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", self.credentials.authorization())
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = read_success_body(Backend::CloudApi.as_str(), response).await?;
        let parsed: CloudResponse = serde_json::from_str(&body)?;

        if parsed.error.is_some() {
            warn!("{} returned an error payload: {}", Backend::CloudApi, body);
            return Err(TranslationError::RemoteServiceError { status, body });
        }

        Ok(parsed.translations.into_iter().map(|t| t.text).collect())
    }
}

#[async_trait]
impl TranslatorService for CloudApiTranslator {
    fn name(&self) -> &'static str {
        Backend::CloudApi.as_str()
    }

    fn request_count(&self) -> u64 {
        self.counter.get()
    }

    /// Falls back to the original text when nothing comes back.
    async fn translate_string(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<String> {
        let texts = [text.to_string()];
        let translated = self
            .translate_strings(&texts, target_language, source_language, false)
            .await?
            .into_vec()
            .await?;

        match translated.into_iter().next() {
            Some(translation) => Ok(translation),
            None => {
                warn!("{} returned no translation, keeping source text", Backend::CloudApi);
                Ok(text.to_string())
            }
        }
    }

    async fn translate_strings(
        &self,
        strings: &[String],
        target_language: &str,
        source_language: Option<&str>,
        _optimized: bool,
    ) -> Result<Translations> {
        // The API detects the source language itself.
        let (target_language, _) = resolve_languages(target_language, source_language)?;

        let translated = match self.max_texts {
            Some(max_texts) if strings.len() > max_texts => {
                let mut translated = Vec::with_capacity(strings.len());
                for chunk in strings.chunks(max_texts) {
                    let chunk_translations = self.send_request(chunk, target_language).await?;
                    ensure_same_length(
                        Backend::CloudApi.as_str(),
                        chunk.len(),
                        chunk_translations.len(),
                    )?;
                    translated.extend(chunk_translations);
                }
                translated
            }
            _ => {
                let translated = self.send_request(strings, target_language).await?;
                // An empty answer for a single text is left to the caller's fallback.
                if strings.len() > 1 {
                    ensure_same_length(
                        Backend::CloudApi.as_str(),
                        strings.len(),
                        translated.len(),
                    )?;
                }
                translated
            }
        };

        Ok(Translations::Materialized(translated))
    }
}
