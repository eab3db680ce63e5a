use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

use daily_drop::config::Config;
use daily_drop::{feed, pick, publish};

#[derive(Parser, Debug)]
#[command(
    name = "daily-drop",
    version,
    about = "Pick the freshest, most substantial feed item and publish it as daily.json"
)]
struct Args {
    /// Config file (default: ~/.config/daily-drop/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file, overriding `output_path` from the config
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the record to stdout instead of writing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load(path)
        }
        None => match Config::default_path() {
            Some(path) => Config::load(&path),
            None => {
                tracing::debug!("HOME not set, using built-in configuration");
                Ok(Config::default())
            }
        },
    }
    .context("Failed to load configuration")?;

    let output_path = args.output.unwrap_or_else(|| config.output_path.clone());

    tracing::info!(feeds = config.feeds.len(), "Fetching feeds");
    let client =
        feed::build_client(config.fetch_timeout()).context("Failed to build HTTP client")?;
    let batches = feed::fetch_all(&client, &config.feeds, config.fetch_timeout())
        .await
        .context("Feed ingestion failed, nothing published")?;

    let total_entries: usize = batches.iter().map(|b| b.entries.len()).sum();
    tracing::info!(entries = total_entries, "Feeds fetched");

    // Single clock reading for scoring, generatedAt, and any fallback date
    let now = Utc::now();
    let result = pick::pick_daily(&batches, now, &config.pick_options());

    if result.is_fallback() {
        tracing::warn!("No feed item selected, publishing fallback record");
    }

    if args.dry_run {
        println!("{}", publish::render(&result)?);
        return Ok(());
    }

    publish::write_record(&result, &output_path)
        .with_context(|| format!("Failed to publish {}", output_path.display()))?;

    println!(
        "Wrote {}: {}",
        output_path.display(),
        result.item.title.as_deref().unwrap_or("(untitled)")
    );
    Ok(())
}
