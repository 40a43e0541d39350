//! Conversation memory HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use wellness_engine::MemoryStats;

use crate::dto::ClearResponse;
use crate::ServerState;

/// Returns stats for a user's memory. Unknown users report zero messages.
pub async fn stats(State(state): State<Arc<ServerState>>, Path(user_id): Path<String>) -> Json<MemoryStats> {
    Json(state.orchestrator.memory_stats(&user_id).await)
}

/// Drops a user's memory.
pub async fn clear(State(state): State<Arc<ServerState>>, Path(user_id): Path<String>) -> Json<ClearResponse> {
    let cleared = state.orchestrator.clear_memory(&user_id).await;
    Json(ClearResponse { success: true, user_id, cleared })
}
