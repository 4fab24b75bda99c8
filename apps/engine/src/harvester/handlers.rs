use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::harvester::pipeline::{BatchResult, DEFAULT_CONCURRENT_TASKS, MAX_CONCURRENT_TASKS};
use crate::harvester::SearchQuery;
use crate::models::job::JobView;
use crate::state::AppState;

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENT_TASKS
}

fn check_keyword(query: &SearchQuery) -> Result<(), AppError> {
    if query.keyword.trim().is_empty() {
        return Err(AppError::Validation("keyword must not be empty".to_string()));
    }
    Ok(())
}

/// POST /api/v1/jobs/scrape
pub async fn handle_scrape(
    State(state): State<AppState>,
    Json(query): Json<SearchQuery>,
) -> Result<Json<BatchResult>, AppError> {
    check_keyword(&query)?;
    Ok(Json(state.harvester.scrape_by_keyword(&query).await))
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub queries: Vec<SearchQuery>,
    #[serde(default = "default_concurrency")]
    pub concurrent_tasks: usize,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchResult>,
    pub total_unique: usize,
    pub total_duplicates: usize,
}

/// POST /api/v1/jobs/scrape/batch
pub async fn handle_scrape_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    if req.queries.is_empty() {
        return Err(AppError::Validation("queries must not be empty".to_string()));
    }
    if !(1..=MAX_CONCURRENT_TASKS).contains(&req.concurrent_tasks) {
        return Err(AppError::Validation(format!(
            "concurrent_tasks must be between 1 and {MAX_CONCURRENT_TASKS}"
        )));
    }
    for query in &req.queries {
        check_keyword(query)?;
    }

    let results = state
        .harvester
        .scrape_batch(&req.queries, req.concurrent_tasks)
        .await;
    Ok(Json(BatchResponse {
        total_unique: results.iter().map(|r| r.metrics.unique).sum(),
        total_duplicates: results.iter().map(|r| r.metrics.duplicates_removed).sum(),
        results,
    }))
}

#[derive(Deserialize)]
pub struct DetailRequest {
    pub url: String,
}

/// POST /api/v1/jobs/scrape/detail
pub async fn handle_scrape_detail(
    State(state): State<AppState>,
    Json(req): Json<DetailRequest>,
) -> Result<Json<JobView>, AppError> {
    let row = state.harvester.scrape_detail(&req.url).await?;
    Ok(Json(JobView::from_row(&row, true)))
}

/// DELETE /api/v1/jobs/scrape/cache
pub async fn handle_reset_cache(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.harvester.reset_cache().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub full_details: bool,
}

/// GET /api/v1/jobs/:source/:external_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path((source, external_id)): Path<(String, String)>,
    Query(params): Query<JobQuery>,
) -> Result<Json<JobView>, AppError> {
    let row = state
        .harvester
        .persister()
        .get_from(&source, &external_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {source}/{external_id} not found")))?;
    Ok(Json(JobView::from_row(&row, params.full_details)))
}
