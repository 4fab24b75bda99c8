use axum::{extract::State, Json};
use serde::Deserialize;

use crate::cv::CvExtract;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

/// POST /api/v1/cv/extract
/// Structured extraction only; nothing is stored.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<CvExtract>, AppError> {
    Ok(Json(state.extractor.extract(&req.text)))
}
