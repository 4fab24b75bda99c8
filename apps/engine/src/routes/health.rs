use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "engine",
        "environment": state.config.app_env.as_str(),
        "store": state.store.backend(),
        "vectorizer": state.scorer.vectorizer_name(),
        "ephemeral_key": state.crypto.is_ephemeral(),
        "seen_jobs": state.harvester.deduplicator().len(),
    }))
}
