use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the text-generation backend the service talks to.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "recruiter",
        "llm": {
            "base_url": state.config.llm.base_url,
            "model": state.config.llm.model,
        },
        "active_interviews": state.sessions.len().await,
    }))
}
