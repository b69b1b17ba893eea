use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,chrome-extension://*,moz-extension://*";
const DEFAULT_TRUSTSERVISTA_BASE_URL: &str = "https://app.trustservista.com/api/rest/v2";

/// How `/analyze` derives its trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringRule {
    /// Fixed placeholder score.
    #[default]
    Placeholder,
    /// `min(100, words / 10)`.
    WordCount,
}

impl FromStr for ScoringRule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(ScoringRule::Placeholder),
            "word_count" | "wordcount" => Ok(ScoringRule::WordCount),
            other => Err(anyhow!("unknown scoring rule: {other}")),
        }
    }
}

impl fmt::Display for ScoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringRule::Placeholder => f.write_str("placeholder"),
            ScoringRule::WordCount => f.write_str("word_count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrustServistaConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub retries: u32,
}

impl TrustServistaConfig {
    /// Reads only the `TRUSTSERVISTA_*` variables. `None` when no key is set.
    pub fn from_env() -> Result<Option<Self>> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = non_empty(&lookup);
        let Some(api_key) = var("TRUSTSERVISTA_API_KEY") else {
            return Ok(None);
        };
        Ok(Some(Self {
            api_key,
            base_url: var("TRUSTSERVISTA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TRUSTSERVISTA_BASE_URL.to_string()),
            timeout_secs: parse_or(&var, "TRUSTSERVISTA_TIMEOUT_SECS", 10)?,
            retries: parse_or(&var, "TRUSTSERVISTA_RETRIES", 1)?,
        }))
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Server
    pub host: String,
    pub port: u16,

    // CORS
    pub allowed_origins: Vec<String>,

    // Analysis
    pub scoring_rule: ScoringRule,

    // External metrics; absent when no API key is set
    pub trustservista: Option<TrustServistaConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = non_empty(&lookup);
        let trustservista = TrustServistaConfig::from_vars(&lookup)?;

        Ok(Self {
            database_url: var("DATABASE_URL").context("DATABASE_URL environment variable is required")?,
            database_max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 10)?,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", 8000)?,
            allowed_origins: parse_origins(
                &var("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
            scoring_rule: match var("SCORING_RULE") {
                Some(raw) => raw.parse()?,
                None => ScoringRule::default(),
            },
            trustservista,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Empty values count as unset.
fn non_empty<F>(lookup: &F) -> impl Fn(&str) -> Option<String> + '_
where
    F: Fn(&str) -> Option<String>,
{
    move |key: &str| lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
