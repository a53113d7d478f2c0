//! Main entry point for the autotranslate CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_autotranslate::cli::commands::{self, Commands};
use catalog_autotranslate::{Backend, ServiceConfig};

/// Translate catalog strings with a machine-translation service
#[derive(Parser, Debug)]
#[command(name = "autotranslate", version, about, long_about = None)]
struct Args {
    /// Translation service (web_scrape, paid_api, cloud_api)
    #[arg(long)]
    service: Option<Backend>,

    /// JSON configuration file (defaults to environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("catalog_autotranslate=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("catalog_autotranslate=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::from_env()?,
    };

    // Override config with CLI args if provided
    if let Some(service) = args.service {
        config = config.with_backend(service);
    }

    match args.command {
        Some(Commands::Translate {
            texts,
            target_lang,
            source_lang,
            eager,
        }) => {
            commands::handle_translate(config, texts, target_lang, source_lang, eager).await?;
        }
        Some(Commands::Backends) => {
            commands::handle_backends(&config);
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
