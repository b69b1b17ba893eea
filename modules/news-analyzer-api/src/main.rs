use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use news_analyzer_api::{build_router, Analyzer, AppState};
use news_analyzer_common::Config;
use news_analyzer_store::NewsStore;
use trustservista_client::{ClientOptions, TrustServistaClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Connected to database");

    let store = NewsStore::new(pool);
    store.migrate().await?;
    info!("Migrations complete");

    let metrics = match &config.trustservista {
        Some(ts) => {
            let client = TrustServistaClient::new(
                &ts.api_key,
                ClientOptions {
                    base_url: ts.base_url.clone(),
                    timeout: Duration::from_secs(ts.timeout_secs),
                    retries: ts.retries,
                },
            )?;
            info!(base_url = %ts.base_url, "TrustServista metrics enabled");
            Some(client)
        }
        None => {
            info!("TRUSTSERVISTA_API_KEY not set, metrics routes disabled");
            None
        }
    };

    let state = AppState::new(store, Analyzer::new(config.scoring_rule), metrics);
    let app = build_router(state, &config.allowed_origins);

    let addr = config.bind_addr();
    info!(%addr, scoring_rule = %config.scoring_rule, "News analyzer API starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
