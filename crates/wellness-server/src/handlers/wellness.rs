//! Query and intent HTTP handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;
use wellness_core::{Intent, WellnessQuery};

use crate::dto::{IntentsResponse, QueryRequest, QueryResponse};
use crate::error::AppError;
use crate::ServerState;

/// Runs a query through the pipeline.
pub async fn query(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let query = WellnessQuery::from(req);
    let response = state.orchestrator.process(&query).await?;

    if response.requires_emergency {
        info!("Emergency response returned to {}", response.user_id);
    }
    Ok(Json(QueryResponse::from(response)))
}

/// Lists the supported intents.
pub async fn intents() -> Json<IntentsResponse> {
    Json(IntentsResponse { intents: Intent::ALL.to_vec() })
}
