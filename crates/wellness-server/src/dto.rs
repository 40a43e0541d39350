//! Data transfer objects for HTTP message serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wellness_core::{Intent, SynthesizedResponse, UserProfile, WellnessQuery};

pub const SERVICE_NAME: &str = "Digital Wellness Assistant";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// === Query Types ===

/// Body of `POST /wellness/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub user_id: String,
    pub query: String,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

impl From<QueryRequest> for WellnessQuery {
    fn from(req: QueryRequest) -> Self {
        WellnessQuery {
            user_id: req.user_id,
            query: req.query,
            intent: req.intent,
            user_profile: req.user_profile,
        }
    }
}

/// Synthesized response plus the number of agents that contributed.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    #[serde(flatten)]
    pub response: SynthesizedResponse,
    pub agent_count: usize,
}

impl From<SynthesizedResponse> for QueryResponse {
    fn from(response: SynthesizedResponse) -> Self {
        let agent_count = response.agent_responses.len();
        Self { response, agent_count }
    }
}

// === Service Info Types ===

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub agents_available: usize,
}

#[derive(Debug, Serialize)]
pub struct IntentsResponse {
    pub intents: Vec<Intent>,
}

/// Service discovery document served at `/`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

// === Memory Types ===

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub user_id: String,
    /// Whether any stored memory existed for the user.
    pub cleared: bool,
}
