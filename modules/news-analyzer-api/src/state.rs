use std::sync::Arc;

use news_analyzer_store::NewsStore;
use trustservista_client::TrustServistaClient;

use crate::analysis::Analyzer;
use crate::history::{AnalysisStore, SentimentHistory};

/// Shared by every handler behind an `Arc`.
pub struct AppState {
    pub store: NewsStore,
    pub analyzer: Analyzer,
    pub sentiment_history: SentimentHistory,
    pub analyses: AnalysisStore,
    /// `None` when no TrustServista API key is configured.
    pub metrics: Option<TrustServistaClient>,
}

impl AppState {
    pub fn new(
        store: NewsStore,
        analyzer: Analyzer,
        metrics: Option<TrustServistaClient>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            analyzer,
            sentiment_history: SentimentHistory::new(),
            analyses: AnalysisStore::new(),
            metrics,
        })
    }
}
