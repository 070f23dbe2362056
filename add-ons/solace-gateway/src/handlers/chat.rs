//! Chat handler: one JSON request in, one `ChatReply` out.
//!
//! Persona and sentiment directive are added by `ResponsePipeline` in solace-core, never by
//! the client. Backend failures surface as the fallback reply with a 200, so the client
//! always gets `{reply, sentiment, confidence}`.

use crate::AppState;
use axum::extract::{Json, State};
use solace_core::{ChatReply, ChatRequest};
use tracing::Instrument;

pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatReply> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id, history_len = req.history.len());
    let reply = state.pipeline.handle(&req).instrument(span).await;
    Json(reply)
}
