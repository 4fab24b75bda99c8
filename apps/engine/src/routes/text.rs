use axum::Json;
use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, tokens};

#[derive(Deserialize)]
pub struct NormalizeRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct NormalizeResponse {
    pub normalized: String,
    pub tokens: Vec<String>,
}

/// POST /api/v1/text/normalize
pub async fn handle_normalize(Json(req): Json<NormalizeRequest>) -> Json<NormalizeResponse> {
    Json(NormalizeResponse {
        normalized: normalize(&req.text),
        tokens: tokens(&req.text),
    })
}
