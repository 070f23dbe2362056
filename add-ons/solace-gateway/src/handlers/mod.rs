pub mod chat;

use crate::AppState;
use axum::extract::{Json, State};
use serde_json::{json, Value};

/// Liveness banner kept from the original API.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Mental Health Chatbot API is running." }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "llm_mode": state.llm_mode.as_str(),
        "backend": state.pipeline.backend_name(),
        "model": state.config.model,
    }))
}
