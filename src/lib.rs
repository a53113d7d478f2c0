//! Catalog Autotranslate - machine-translation adapters for catalog strings
//!
//! This library sends strings extracted from localization catalogs to one of
//! several translation backends and returns the translations in input order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod services;

// Re-export key types for convenience
pub use crate::core::{
    config::ServiceConfig,
    errors::{Result, TranslationError},
    models::{Backend, TranslationRequest, Translations, DEFAULT_SOURCE_LANGUAGE},
    request_counter::RequestCounter,
};

pub use crate::services::{
    build_service, CloudApiTranslator, PaidApiTranslator, TranslatorService, WebScrapeTranslator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
