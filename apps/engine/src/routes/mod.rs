pub mod health;
pub mod text;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::cv::handlers as cv;
use crate::harvester::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;
use crate::students::handlers as students;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Text & CV
        .route("/api/v1/text/normalize", post(text::handle_normalize))
        .route("/api/v1/cv/extract", post(cv::handle_extract))
        // Students
        .route("/api/v1/students/resume", post(students::handle_upload_resume))
        .route(
            "/api/v1/students/resume/pdf",
            post(students::handle_upload_resume_file),
        )
        .route("/api/v1/students/:id", get(students::handle_get_student))
        .route(
            "/api/v1/students/:id/active",
            patch(students::handle_set_active),
        )
        // Matching
        .route("/api/v1/match/score", post(matching::handle_score))
        .route(
            "/api/v1/match/recommendations",
            post(matching::handle_recommendations),
        )
        // Harvester
        .route("/api/v1/jobs/scrape", post(jobs::handle_scrape))
        .route("/api/v1/jobs/scrape/batch", post(jobs::handle_scrape_batch))
        .route("/api/v1/jobs/scrape/detail", post(jobs::handle_scrape_detail))
        .route("/api/v1/jobs/scrape/cache", delete(jobs::handle_reset_cache))
        .route(
            "/api/v1/jobs/:source/:external_id",
            get(jobs::handle_get_job),
        )
        .with_state(state)
}
