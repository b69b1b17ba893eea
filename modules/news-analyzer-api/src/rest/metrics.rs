use std::sync::Arc;

use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Json, Query, State,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use trustservista_client::{CombinedMetrics, TrustServistaClient, DEFAULT_LANGUAGE};

use super::{json_body, query_params};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MetricsRequest {
    content: String,
    #[serde(default)]
    is_url: bool,
    language: Option<String>,
}

impl MetricsRequest {
    fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }
}

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    domain: String,
    start_date: Option<String>,
    end_date: Option<String>,
}

fn client(state: &AppState) -> ApiResult<&TrustServistaClient> {
    state.metrics.as_ref().ok_or(ApiError::MetricsUnavailable)
}

/// Sentiment, trust level and clickbait. Unavailable metrics are left out.
pub async fn combined_metrics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetricsRequest>, JsonRejection>,
) -> ApiResult<Json<CombinedMetrics>> {
    let client = client(&state)?;
    let request = json_body(payload)?;
    let metrics = client
        .fetch_combined_metrics(&request.content, request.is_url, request.language())
        .await;
    Ok(Json(metrics))
}

pub async fn article_metrics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetricsRequest>, JsonRejection>,
) -> ApiResult<Json<CombinedMetrics>> {
    let client = client(&state)?;
    let request = json_body(payload)?;
    let metrics = client
        .analyze_article(&request.content, request.is_url, request.language())
        .await;
    Ok(Json(metrics))
}

pub async fn website_statistics(
    State(state): State<Arc<AppState>>,
    params: Result<Query<StatisticsQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let client = client(&state)?;
    let params = query_params(params)?;
    let stats = client
        .website_statistics(
            &params.domain,
            params.start_date.as_deref(),
            params.end_date.as_deref(),
        )
        .await?;
    Ok(Json(stats))
}

pub async fn key_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let client = client(&state)?;
    let valid = client.verify_key().await;
    info!(valid, "TrustServista key checked");
    Ok(Json(json!({ "valid": valid })))
}
