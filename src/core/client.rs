//! HTTP plumbing shared by the translation services

use std::time::Duration;
use tracing::warn;

use crate::core::config::ServiceConfig;
use crate::core::errors::{Result, TranslationError};

/// Build the HTTP client a service uses for its whole lifetime.
///
/// Without a configured timeout the client's own default applies.
pub fn build_http_client(config: &ServiceConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .pool_max_idle_per_host(10);

    if let Some(timeout_ms) = config.timeout_ms {
        builder = builder.timeout(Duration::from_millis(timeout_ms));
    }

    Ok(builder.build()?)
}

/// Read the body of a response, failing on a non-success status.
///
/// The error keeps the status code and the raw body text.
pub async fn read_success_body(service: &str, response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    warn!("{} responded with {}: {}", service, status.as_u16(), body);
    Err(TranslationError::RemoteServiceError {
        status: status.as_u16(),
        body,
    })
}

/// Check that a backend answered once per submitted text
pub fn ensure_same_length(service: &str, sent: usize, received: usize) -> Result<()> {
    if sent == received {
        return Ok(());
    }

    Err(TranslationError::InvalidResponseError {
        message: format!(
            "{} returned {} translations for {} texts",
            service, received, sent
        ),
    })
}
