//! HTTP route handlers for the wellness server.

pub mod memory;
pub mod wellness;

use std::collections::BTreeMap;

use axum::{http::Uri, Json};
use wellness_core::Domain;

use crate::dto::{HealthResponse, RootResponse, SERVICE_NAME, VERSION};
use crate::error::AppError;

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        agents_available: Domain::ALL.len(),
    })
}

/// Service discovery: name, version, and the endpoint map.
pub async fn root() -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("health", "/health"),
        ("intents", "/wellness/intents"),
        ("query", "/wellness/query (POST)"),
        ("memory", "/wellness/memory/{user_id} (GET, DELETE)"),
    ]);
    Json(RootResponse {
        name: SERVICE_NAME,
        version: VERSION,
        status: "running",
        endpoints,
    })
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
