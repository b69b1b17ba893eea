// Process-lifetime in-memory state. Nothing here survives a restart.

use std::collections::HashMap;

use chrono::Utc;
use news_analyzer_common::{AnalysisRecord, SentimentPoint};
use tokio::sync::Mutex;

/// Sentiment scores observed per article URL, oldest first.
#[derive(Default)]
pub struct SentimentHistory {
    points: Mutex<HashMap<String, Vec<SentimentPoint>>>,
}

impl SentimentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, url: &str, value: f64) {
        let point = SentimentPoint {
            timestamp: Utc::now(),
            value,
        };
        self.points
            .lock()
            .await
            .entry(url.to_string())
            .or_default()
            .push(point);
    }

    /// Empty for a URL that was never recorded.
    pub async fn history(&self, url: &str) -> Vec<SentimentPoint> {
        self.points
            .lock()
            .await
            .get(url)
            .cloned()
            .unwrap_or_default()
    }
}

/// Word-count analyses kept in insertion order.
#[derive(Default)]
pub struct AnalysisStore {
    records: Mutex<Vec<AnalysisRecord>>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: AnalysisRecord) {
        self.records.lock().await.push(record);
    }

    pub async fn get(&self, id: &str) -> Option<AnalysisRecord> {
        self.records
            .lock()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub async fn list(&self) -> Vec<AnalysisRecord> {
        self.records.lock().await.clone()
    }
}
