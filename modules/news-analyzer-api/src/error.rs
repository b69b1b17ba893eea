use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use news_analyzer_common::ValidationError;
use news_analyzer_store::StoreError;
use serde_json::json;
use tracing::error;
use trustservista_client::TrustServistaError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Everything a handler can fail with. Rendered as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("TrustServista API key not configured")]
    MetricsUnavailable,

    #[error("Upstream metrics call failed: {0}")]
    Upstream(#[from] TrustServistaError),

    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound("News not found".to_string()),
            StoreError::Validation(v) => v.into(),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MetricsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
