use super::{ApiError, AppState};
use crate::url::parse_seed;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

/// Depth used when the request does not name one
pub const DEFAULT_DEPTH: usize = 1;

/// Raw query string of `GET /graph`
///
/// Both fields stay strings so that bad input is reported with our own
/// message instead of the extractor's.
#[derive(Debug, Default, Deserialize)]
pub struct GraphParams {
    pub url: Option<String>,
    pub depth: Option<String>,
}

impl GraphParams {
    fn depth(&self, max_depth: usize) -> Result<usize, ApiError> {
        let depth = match self.depth.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_DEPTH,
            Some(raw) => raw.parse::<usize>().map_err(|e| {
                ApiError::BadRequest(format!("query parameter 'depth' is invalid: {}", e))
            })?,
        };

        if depth > max_depth {
            return Err(ApiError::BadRequest(format!(
                "query parameter 'depth' is invalid: {} exceeds the maximum of {}",
                depth, max_depth
            )));
        }
        Ok(depth)
    }
}

/// `GET /graph?url=<seed>&depth=<n>`
pub async fn graph_handler(
    State(state): State<AppState>,
    params: Result<Query<GraphParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let raw_url = params.url.as_deref().map(str::trim).unwrap_or_default();
    if raw_url.is_empty() {
        return Err(ApiError::BadRequest("query parameter 'url' is empty".to_string()));
    }
    let seed = parse_seed(raw_url)
        .map_err(|e| ApiError::BadRequest(format!("query parameter 'url' is invalid: {}", e)))?;

    let depth = params.depth(state.config.crawler.max_depth as usize)?;

    // Dropping the guard cancels the crawl if the client goes away
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let report = state
        .crawler
        .crawl(&seed, depth, cancel)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if report.graph.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(report.graph.view()).into_response())
}

/// `GET /health`
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
