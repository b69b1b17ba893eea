//! Ad-hoc check of a TrustServista API key against live data.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use news_analyzer_common::TrustServistaConfig;
use trustservista_client::{ClientOptions, TrustServistaClient, DEFAULT_LANGUAGE};

#[derive(Parser)]
#[command(name = "probe-trustservista")]
#[command(about = "Query TrustServista for a domain and an article")]
struct Cli {
    /// Web domain to fetch aggregate statistics for
    #[arg(long, default_value = "bbc.com")]
    domain: String,

    /// Article URL to fetch sentiment, trust level and clickbait for
    #[arg(long)]
    url: Option<String>,

    /// Statistics window start (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Statistics window end (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,

    /// Content language
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let ts = TrustServistaConfig::from_env()?.context("TRUSTSERVISTA_API_KEY must be set")?;

    let client = TrustServistaClient::new(
        &ts.api_key,
        ClientOptions {
            base_url: ts.base_url,
            timeout: Duration::from_secs(ts.timeout_secs),
            retries: ts.retries,
        },
    )?;

    if !client.verify_key().await {
        match client.key_status() {
            Some(false) => anyhow::bail!("TrustServista rejected the API key"),
            _ => anyhow::bail!("TrustServista key check failed; see the log for the cause"),
        }
    }

    let stats = client
        .website_statistics(
            &cli.domain,
            cli.start_date.as_deref(),
            cli.end_date.as_deref(),
        )
        .await
        .with_context(|| format!("statistics for {}", cli.domain))?;
    println!("Website statistics for {}:", cli.domain);
    println!("{}", serde_json::to_string_pretty(&stats)?);

    if let Some(url) = &cli.url {
        let metrics = client.fetch_combined_metrics(url, true, &cli.language).await;
        println!("\nCombined metrics for {url}:");
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    }

    Ok(())
}
