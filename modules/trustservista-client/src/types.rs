use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder the API expects in `content` when the article is given by URI.
pub const EMPTY_CONTENT: &str = "EMPTY";

pub const DEFAULT_LANGUAGE: &str = "eng";

/// Per-article metrics exposed by the TrustServista API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Sentiment,
    TrustLevel,
    Clickbait,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Sentiment, Metric::TrustLevel, Metric::Clickbait];

    /// REST endpoint path segment.
    pub fn endpoint(self) -> &'static str {
        match self {
            Metric::Sentiment => "sentiment",
            Metric::TrustLevel => "trustlevel",
            Metric::Clickbait => "clickbait",
        }
    }

    /// Key under which the metric appears in an aggregated result.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Sentiment => "sentiment",
            Metric::TrustLevel => "trust_level",
            Metric::Clickbait => "clickbait",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Shared body for the per-article endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContentRequest {
    pub content: String,
    #[serde(rename = "contentUri")]
    pub content_uri: String,
    pub language: String,
}

impl ContentRequest {
    pub fn new(content: &str, is_url: bool, language: &str) -> Self {
        if is_url {
            Self {
                content: EMPTY_CONTENT.to_string(),
                content_uri: content.to_string(),
                language: language.to_string(),
            }
        } else {
            Self {
                content: content.to_string(),
                content_uri: String::new(),
                language: language.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest {
    #[serde(flatten)]
    pub content: ContentRequest,
    pub size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsRequest {
    #[serde(rename = "webDomain")]
    pub web_domain: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

/// Metric name to raw upstream payload. A missing key means that metric
/// was unavailable for this request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinedMetrics(BTreeMap<String, serde_json::Value>);

impl CombinedMetrics {
    pub fn insert(&mut self, metric: Metric, payload: serde_json::Value) {
        self.0.insert(metric.key().to_string(), payload);
    }

    pub fn get(&self, metric: Metric) -> Option<&serde_json::Value> {
        self.0.get(metric.key())
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains_key(metric.key())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
