//! `vidresolve` CLI - resolve direct video stream URLs for a batch of pages

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{debug, info};

use vidresolve::config::{self, ConfigError};
use vidresolve::{logger, output, BatchResolver, PageClient, RunConfig};

#[derive(Parser)]
#[command(name = "vidresolve")]
#[command(about = "Resolve direct, playable video stream URLs from video page links")]
#[command(version)]
struct Cli {
    /// Page URLs to resolve (replace `startUrls` from --input)
    urls: Vec<String>,

    /// Input JSON file containing `startUrls` and options
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Save the result JSON here instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings JSON with defaults [default: <config dir>/vidresolve/settings.json]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stream quality: lowest, medium or highest (unknown values mean highest)
    #[arg(short, long)]
    quality: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    vidresolve::logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        logger("vidresolve.main").error("Fatal error during execution", &e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.config {
        Some(path) => info!(path = %path.display(), "Loading configuration"),
        None => debug!(
            path = %config::default_settings_path().display(),
            "Loading configuration if present"
        ),
    }
    let settings = config::load_settings(cli.config.as_deref())?;

    let mut input = match &cli.input {
        Some(path) => {
            info!(path = %path.display(), "Loading input");
            config::load_document(path)?
        }
        None if !cli.urls.is_empty() => serde_json::Map::new(),
        None => return Err(ConfigError::NoInput.into()),
    };
    if !cli.urls.is_empty() {
        input.extend(config::input_from_urls(&cli.urls));
    }
    config::validate_input(&input)?;

    if let Some(quality) = cli.quality {
        input.insert("quality".to_string(), Value::String(quality));
    }

    let run_config = RunConfig::from_documents(settings, input)?;

    info!("Starting video URL resolution");
    debug!(
        quality = %run_config.quality,
        use_proxy = run_config.use_proxy_for_download,
        proxy_url = run_config.proxy_url.as_deref().unwrap_or("None"),
        output_dir = %run_config.output_dir.display(),
        timeout = run_config.timeout,
        "Configuration"
    );

    std::fs::create_dir_all(&run_config.output_dir).with_context(|| {
        format!("failed to create output directory {}", run_config.output_dir.display())
    })?;

    let client = PageClient::new(&run_config.client_options())?;
    let resolver = BatchResolver::new(client, run_config.quality);
    let results = resolver.process_all(&run_config.urls()).await;

    output::emit(&results, cli.output.as_deref())?;

    info!(
        resolved = results.len(),
        total = run_config.start_urls.len(),
        "Completed run"
    );
    Ok(())
}
