use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::cv::pdf::{decode_text, extract_text};
use crate::errors::AppError;
use crate::models::student::StudentView;
use crate::state::AppState;
use crate::students::{ingest_resume, Identity, IngestOutcome};

#[derive(Deserialize)]
pub struct ResumeRequest {
    pub text: String,
    #[serde(flatten)]
    pub identity: Identity,
}

/// POST /api/v1/students/resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Json(req): Json<ResumeRequest>,
) -> Result<Json<IngestOutcome>, AppError> {
    let outcome = ingest_resume(&state.extractor, &state.students, &req.text, req.identity).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/students/resume/pdf
/// Multipart: a `file` part (PDF or UTF-8 text) plus optional `name`,
/// `email`, `phone` and `program` text parts.
pub async fn handle_upload_resume_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestOutcome>, AppError> {
    let mut identity = Identity::default();
    let mut text: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let is_pdf = field.content_type() == Some("application/pdf")
                    || field
                        .file_name()
                        .map_or(false, |f| f.to_ascii_lowercase().ends_with(".pdf"));
                let bytes = field.bytes().await?;
                debug!(bytes = bytes.len(), is_pdf, "résumé file received");
                text = Some(if is_pdf {
                    extract_text(&bytes)?
                } else {
                    decode_text(&bytes)?
                });
            }
            "name" => identity.name = Some(field.text().await?),
            "email" => identity.email = Some(field.text().await?),
            "phone" => identity.phone = Some(field.text().await?),
            "program" => identity.program = Some(field.text().await?),
            _ => {}
        }
    }

    let text = text.ok_or_else(|| AppError::Validation("missing 'file' part".to_string()))?;
    let outcome = ingest_resume(&state.extractor, &state.students, &text, identity).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/students/:id
pub async fn handle_get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentView>, AppError> {
    let row = state
        .students
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))?;
    Ok(Json(StudentView::from(&row)))
}

#[derive(Deserialize)]
pub struct ActiveToggle {
    pub is_active: bool,
}

/// PATCH /api/v1/students/:id/active
pub async fn handle_set_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActiveToggle>,
) -> Result<Json<StudentView>, AppError> {
    let row = state
        .students
        .set_active(id, req.is_active)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))?;
    Ok(Json(StudentView::from(&row)))
}
