use std::sync::Arc;

use axum::{
    http::{request::Parts, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::rest::{analyze, metrics, news};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health check
        .route("/", get(analyze::health))
        // Analysis
        .route("/analyze", post(analyze::analyze))
        .route("/sentiment/history", get(analyze::sentiment_history))
        .route(
            "/analyses",
            get(analyze::list_analyses).post(analyze::create_analysis),
        )
        .route("/analyses/{id}", get(analyze::get_analysis))
        // News CRUD
        .route("/api/news", get(news::list_news).post(news::create_news))
        .route("/api/news/", get(news::list_news).post(news::create_news))
        .route("/api/news/analyze", post(news::analyze_news))
        .route(
            "/api/news/{id}",
            get(news::get_news)
                .patch(news::update_news)
                .delete(news::delete_news),
        )
        // TrustServista metrics
        .route("/metrics", post(metrics::combined_metrics))
        .route("/metrics/article", post(metrics::article_metrics))
        .route("/metrics/statistics", get(metrics::website_statistics))
        .route("/metrics/key", get(metrics::key_status))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

/// Credentialed CORS. Methods and headers are mirrored from the preflight.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let patterns = allowed_origins.to_vec();
        AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
            origin
                .to_str()
                .map(|origin| origin_allowed(&patterns, origin))
                .unwrap_or(false)
        })
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// An entry ending in `*` matches any origin with that prefix; anything else
/// must match exactly.
pub fn origin_allowed(patterns: &[String], origin: &str) -> bool {
    patterns.iter().any(|pattern| match pattern.strip_suffix('*') {
        Some(prefix) => origin.starts_with(prefix),
        None => pattern == origin,
    })
}
