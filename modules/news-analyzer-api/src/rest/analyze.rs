use std::sync::Arc;

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Json, Path, Query, State,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use news_analyzer_common::{AnalysisRecord, AnalysisRequest, AnalysisResult, ArticleData, SentimentPoint};

use super::{json_body, path_param, query_params};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Score an article and remember its sentiment against the article URL.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ArticleData>, JsonRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let article = json_body(payload)?;
    let result = state.analyzer.analyze(&article);

    if let Some(url) = article.url.as_deref().filter(|u| !u.is_empty()) {
        state
            .sentiment_history
            .record(url, result.sentiment.score)
            .await;
    }

    debug!(
        analysis_id = %result.analysis_id,
        trust_score = result.trust_score,
        rule = %state.analyzer.rule(),
        "Article analyzed"
    );
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    url: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    history: Vec<SentimentPoint>,
}

pub async fn sentiment_history(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<HistoryResponse>> {
    let params = query_params(params)?;
    Ok(Json(HistoryResponse {
        history: state.sentiment_history.history(&params.url).await,
    }))
}

// --- Word-count analyses ---

pub async fn list_analyses(State(state): State<Arc<AppState>>) -> Json<Vec<AnalysisRecord>> {
    Json(state.analyses.list().await)
}

pub async fn create_analysis(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisRecord>> {
    let request = json_body(payload)?;
    let record = state.analyzer.rate(&request);
    state.analyses.insert(record.clone()).await;
    Ok(Json(record))
}

pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<AnalysisRecord>> {
    let id = path_param(id)?;
    state
        .analyses
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Analysis not found".to_string()))
}
