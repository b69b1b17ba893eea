use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use news_analyzer_common::{
    AnalysisResult, ArticleData, NewsCreate, NewsFilter, NewsUpdate, Pagination, ValidationError,
};
use news_analyzer_store::NewsDetail;

use super::{json_body, path_param, query_params};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const REQUIRED_ANALYZE_FIELDS: [&str; 4] = ["title", "content", "url", "source"];

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    skip: Option<i64>,
    limit: Option<i64>,
    category: Option<String>,
    source: Option<String>,
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<NewsDetail>>> {
    let params = query_params(params)?;
    let page = Pagination::new(params.skip, params.limit)?;
    let filter = NewsFilter {
        category: params.category.filter(|c| !c.is_empty()),
        source: params.source.filter(|s| !s.is_empty()),
    };
    Ok(Json(state.store.list(&filter, page).await?))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<NewsDetail>> {
    let id = path_param(id)?;
    Ok(Json(state.store.get(id).await?))
}

pub async fn create_news(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewsCreate>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<NewsDetail>)> {
    let payload = json_body(payload)?;
    let created = state.store.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_news(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewsUpdate>, JsonRejection>,
) -> ApiResult<Json<NewsDetail>> {
    let id = path_param(id)?;
    let patch = json_body(payload)?;
    Ok(Json(state.store.update(id, &patch).await?))
}

pub async fn delete_news(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_param(id)?;
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Analyze an article submitted as a raw object. All of `title`, `content`,
/// `url` and `source` must be present.
pub async fn analyze_news(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let payload = json_body(payload)?;
    let article = required_article(&payload)?;

    let result = state.analyzer.analyze(&article);
    info!(analysis_id = %result.analysis_id, "Analyzed news submission");
    Ok(Json(result))
}

fn required_article(payload: &Value) -> ApiResult<ArticleData> {
    let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    let missing: Vec<String> = REQUIRED_ANALYZE_FIELDS
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing).into());
    }

    let text = |field: &str| -> ApiResult<String> {
        object
            .get(field)
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| ApiError::BadRequest(format!("Field '{field}' must be a string")))
    };

    Ok(ArticleData {
        title: text("title")?,
        content: text("content")?,
        url: Some(text("url")?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_source_is_named() {
        let err = required_article(&json!({"title": "t", "content": "c", "url": "u"})).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: source");
    }

    #[test]
    fn every_missing_field_is_listed_in_order() {
        let err = required_article(&json!({"content": "c"})).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: title, url, source");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = required_article(&json!(["title"])).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn complete_payload_becomes_article() {
        let article = required_article(&json!({
            "title": "t",
            "content": "c",
            "url": "https://news.example/a",
            "source": "Wire"
        }))
        .unwrap();
        assert_eq!(article.url.as_deref(), Some("https://news.example/a"));
    }
}
