use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::{rank_jobs, MatchResult, ProfileInput, Recommendation};
use crate::state::AppState;

pub const DEFAULT_RECOMMENDATIONS: usize = 10;
pub const MAX_RECOMMENDATIONS: usize = 100;

#[derive(Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub projects: Option<Vec<String>>,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub weights: Option<Map<String, Value>>,
}

/// POST /api/v1/match/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let result = state.scorer.score(
        req.skills.as_deref(),
        req.projects.as_deref(),
        &req.job_description,
        req.weights.as_ref(),
    );
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct RecommendationRequest {
    /// Score a stored profile instead of the inline one.
    #[serde(default)]
    pub student_id: Option<Uuid>,
    #[serde(flatten)]
    pub profile: ProfileInput,
    #[serde(default)]
    pub weights: Option<Map<String, Value>>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// POST /api/v1/match/recommendations
/// Ranks every stored job of the configured source against a profile.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let profile = match req.student_id {
        Some(id) => {
            let student = state
                .students
                .get(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))?;
            if !student.is_active {
                return Err(AppError::UnprocessableEntity(format!("Student {id} is inactive")));
            }
            ProfileInput {
                skills: student.skills(),
                projects: student.projects.clone(),
            }
        }
        None => req.profile,
    };

    let jobs = state.harvester.persister().list().await?;
    let limit = req
        .limit
        .unwrap_or(DEFAULT_RECOMMENDATIONS)
        .clamp(1, MAX_RECOMMENDATIONS);

    Ok(Json(rank_jobs(
        &state.scorer,
        &profile,
        &jobs,
        req.weights.as_ref(),
        limit,
    )))
}
