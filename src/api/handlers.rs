use axum::{
    Json,
    extract::{Path, Query as QueryParams, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::Query;
use crate::search::SearchOrchestrator;

use super::models::{SearchParams, SearchRequest, SearchResponse};

const MAX_PLACEHOLDER_DIMENSION: u32 = 2000;

pub async fn search_handler(
    State(orchestrator): State<Arc<SearchOrchestrator>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    run_search(&orchestrator, &request.query).await
}

pub async fn search_get_handler(
    State(orchestrator): State<Arc<SearchOrchestrator>>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    run_search(&orchestrator, &params.q).await
}

async fn run_search(
    orchestrator: &SearchOrchestrator,
    raw: &str,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();

    let Some(query) = Query::parse(raw) else {
        return Err((StatusCode::BAD_REQUEST, "Query cannot be empty".to_string()));
    };

    // lookup failures come back as an empty list, same as a zero-match search
    let results = orchestrator.search(&query).await;

    let total_results = results.len();
    let processing_time_ms = start.elapsed().as_millis();

    Ok(Json(SearchResponse {
        query: query.as_str().to_string(),
        results,
        total_results,
        processing_time_ms,
    }))
}

pub async fn placeholder_handler(
    Path((width, height)): Path<(u32, u32)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let valid = 1..=MAX_PLACEHOLDER_DIMENSION;
    if !valid.contains(&width) || !valid.contains(&height) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Placeholder dimensions must be between 1 and {MAX_PLACEHOLDER_DIMENSION}"),
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        placeholder_svg(width, height),
    ))
}

pub fn placeholder_svg(width: u32, height: u32) -> String {
    let font_size = (width.min(height) / 8).max(8);
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><rect width="100%" height="100%" fill="#e9d5ff"/><text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" font-family="sans-serif" font-size="{font_size}" fill="#6b21a8">{width}&#215;{height}</text></svg>"##
    )
}
