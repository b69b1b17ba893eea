pub mod error;
pub mod types;

pub use error::{Result, TrustServistaError};
pub use types::{
    CombinedMetrics, ContentRequest, Metric, StatisticsRequest, SummaryRequest, DEFAULT_LANGUAGE,
    EMPTY_CONTENT,
};

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use futures::future::join_all;
use reqwest::StatusCode;
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://app.trustservista.com/api/rest/v2";

const API_KEY_HEADER: &str = "X-TRUS-API-Key";

const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(5);

const KEY_UNKNOWN: u8 = 0;
const KEY_VALID: u8 = 1;
const KEY_INVALID: u8 = 2;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Upper bound for a single request, including reading the body.
    pub timeout: Duration,
    /// Extra attempts after a transport failure.
    pub retries: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            retries: 1,
        }
    }
}

pub struct TrustServistaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    retries: u32,
    key_state: AtomicU8,
}

impl TrustServistaClient {
    pub fn new(api_key: &str, options: ClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            retries: options.retries,
            key_state: AtomicU8::new(KEY_UNKNOWN),
        })
    }

    /// Cached key validity: `None` until a key check or a 401 has settled it.
    pub fn key_status(&self) -> Option<bool> {
        match self.key_state.load(Ordering::Acquire) {
            KEY_VALID => Some(true),
            KEY_INVALID => Some(false),
            _ => None,
        }
    }

    /// Check the key with a tiny sentiment request and cache a settled outcome
    /// for the life of this client.
    pub async fn verify_key(&self) -> bool {
        if let Some(known) = self.key_status() {
            return known;
        }

        let sample = serde_json::json!({ "content": "test", "language": DEFAULT_LANGUAGE });
        let state = match self.post_json(Metric::Sentiment.endpoint(), &sample).await {
            Ok(_) => KEY_VALID,
            Err(TrustServistaError::Auth { .. }) => KEY_INVALID,
            Err(e) => {
                // Only a 401 settles the key. Anything else is retried on the next call.
                tracing::warn!(error = %e, "TrustServista key check inconclusive");
                return false;
            }
        };

        // A concurrent 401 may have settled it first; that answer wins.
        match self
            .key_state
            .compare_exchange(KEY_UNKNOWN, state, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => state == KEY_VALID,
            Err(current) => current == KEY_VALID,
        }
    }

    /// Sentiment, trust level and clickbait for one article, fetched concurrently.
    /// Failed sub-calls are logged and left out of the result.
    pub async fn fetch_combined_metrics(
        &self,
        content: &str,
        is_url: bool,
        language: &str,
    ) -> CombinedMetrics {
        self.fetch_metrics(&Metric::ALL, content, is_url, language)
            .await
    }

    /// Sentiment and clickbait only.
    pub async fn analyze_article(
        &self,
        content: &str,
        is_url: bool,
        language: &str,
    ) -> CombinedMetrics {
        self.fetch_metrics(&[Metric::Sentiment, Metric::Clickbait], content, is_url, language)
            .await
    }

    /// Fan out one request per metric against a shared body and keep whatever succeeded.
    pub async fn fetch_metrics(
        &self,
        metrics: &[Metric],
        content: &str,
        is_url: bool,
        language: &str,
    ) -> CombinedMetrics {
        let request = ContentRequest::new(content, is_url, language);

        let calls = metrics.iter().map(|&metric| {
            let request = &request;
            async move { (metric, self.post_json(metric.endpoint(), request).await) }
        });
        let results = join_all(calls).await;

        let mut combined = CombinedMetrics::default();
        for (metric, result) in results {
            match result {
                Ok(payload) => combined.insert(metric, payload),
                Err(e) => {
                    tracing::warn!(metric = %metric, error = %e, "TrustServista metric unavailable");
                }
            }
        }

        tracing::debug!(
            requested = metrics.len(),
            returned = combined.len(),
            "TrustServista metrics aggregated"
        );
        combined
    }

    /// TrustLevel/clickbait averages and sentiment distribution for a web domain.
    pub async fn website_statistics(
        &self,
        web_domain: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<serde_json::Value> {
        let body = StatisticsRequest {
            web_domain: web_domain.to_string(),
            start_date: start_date.unwrap_or(EMPTY_CONTENT).to_string(),
            end_date: end_date.unwrap_or(EMPTY_CONTENT).to_string(),
        };
        self.post_json("statistics", &body).await
    }

    pub async fn summary(
        &self,
        content: &str,
        is_url: bool,
        language: &str,
        size: u32,
    ) -> Result<serde_json::Value> {
        let body = SummaryRequest {
            content: ContentRequest::new(content, is_url, language),
            size,
        };
        self.post_json("summary", &body).await
    }

    pub async fn metadata(&self, content: &str, is_url: bool) -> Result<serde_json::Value> {
        let field = if is_url { "contentUri" } else { "content" };
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), serde_json::Value::from(content));
        self.post_json("metadata", &body).await
    }

    /// API information and remaining quota.
    pub async fn info(&self) -> Result<serde_json::Value> {
        self.ensure_key_usable()?;
        let url = format!("{}/info", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        self.read_json("info", resp).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<serde_json::Value> {
        let mut attempt = 0;
        loop {
            match self.post_once(endpoint, body).await {
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    let delay = retry_delay(attempt);
                    tracing::debug!(endpoint, attempt, error = %e, "Retrying TrustServista request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn post_once<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<serde_json::Value> {
        self.ensure_key_usable()?;
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;
        self.read_json(endpoint, resp).await
    }

    async fn read_json(&self, endpoint: &str, resp: reqwest::Response) -> Result<serde_json::Value> {
        let status = resp.status();
        if status == StatusCode::OK {
            let text = resp.text().await?;
            return Ok(serde_json::from_str(&text)?);
        }

        let message = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            self.key_state.store(KEY_INVALID, Ordering::Release);
            tracing::warn!(endpoint, "TrustServista rejected the API key");
            return Err(TrustServistaError::Auth {
                status: status.as_u16(),
            });
        }

        Err(TrustServistaError::UnexpectedStatus {
            status: status.as_u16(),
            message,
        })
    }

    /// A key known to be bad is not sent again.
    fn ensure_key_usable(&self) -> Result<()> {
        if self.key_state.load(Ordering::Acquire) == KEY_INVALID {
            return Err(TrustServistaError::Auth {
                status: StatusCode::UNAUTHORIZED.as_u16(),
            });
        }
        Ok(())
    }
}

/// Exponential backoff from `RETRY_BASE_DELAY`, capped at `RETRY_MAX_DELAY`.
fn retry_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(RETRY_MAX_DELAY)
}
