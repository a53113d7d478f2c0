//! CLI command definitions and handlers

use clap::Subcommand;
use futures::StreamExt;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::core::config::ServiceConfig;
use crate::core::models::{Backend, TranslationRequest, DEFAULT_SOURCE_LANGUAGE};
use crate::services::build_service;

/// Commands for the autotranslate tool
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate texts with the configured service
    Translate {
        /// Texts to translate (one per line from stdin when omitted)
        texts: Vec<String>,

        /// Target language code
        #[arg(short, long)]
        target_lang: String,

        /// Source language code
        #[arg(short, long, default_value = DEFAULT_SOURCE_LANGUAGE)]
        source_lang: String,

        /// Collect every translation before printing
        #[arg(long)]
        eager: bool,
    },

    /// List translation services and whether they are configured
    Backends,
}

/// Read non-empty lines from stdin
async fn read_stdin_lines() -> anyhow::Result<Vec<String>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut texts = Vec::new();

    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            texts.push(line);
        }
    }

    Ok(texts)
}

/// Handle translate command
pub async fn handle_translate(
    config: ServiceConfig,
    texts: Vec<String>,
    target_lang: String,
    source_lang: String,
    eager: bool,
) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let texts = if texts.is_empty() {
        read_stdin_lines().await?
    } else {
        texts
    };

    if texts.is_empty() {
        anyhow::bail!("No texts to translate");
    }

    // The paid service only answers with materialized results.
    let optimized = !eager && config.backend != Backend::PaidApi;

    info!("Translating {} texts with {}", texts.len(), config.backend);
    info!("Languages: {} -> {}", source_lang, target_lang);

    let service = build_service(&config)?;
    let request = TranslationRequest::new(texts, target_lang)
        .with_source_language(source_lang)
        .optimized(optimized);

    let mut translations = request.send(service.as_ref()).await?.into_stream();
    while let Some(translation) = translations.next().await {
        println!("{}", translation?);
    }

    info!(
        "Completed: {} requests issued in {:?}",
        service.request_count(),
        start_time.elapsed()
    );

    Ok(())
}

/// Handle backends command
pub fn handle_backends(config: &ServiceConfig) {
    for backend in Backend::ALL {
        let marker = if backend == config.backend { "*" } else { " " };
        let status = if config.has_credentials_for(backend) {
            "configured"
        } else {
            "missing credentials"
        };
        println!("{} {:<12} {}", marker, backend.as_str(), status);
    }
}
