//! Core domain types and error definitions for the wellness router.
//!
//! This crate provides the types shared across the workspace:
//!
//! - [`Intent`] and [`Domain`] — Query categories and the domains that own a generator
//! - [`WellnessQuery`] and [`UserProfile`] — Inbound request shape
//! - [`GeneratorResult`] and [`SynthesizedResponse`] — Pipeline outputs
//! - [`Message`] and [`MessageRole`] — Conversation memory entries
//! - [`GenerationError`] and [`WellnessError`] — Error taxonomy
//! - [`GuidanceGenerator`] — The external text-generation capability
//!
//! # Example
//!
//! ```rust
//! use wellness_core::{Intent, WellnessQuery};
//!
//! let query = WellnessQuery::new("u1", "How much protein should I eat?");
//! assert!(query.validate().is_ok());
//! assert_eq!("diet".parse::<Intent>(), Ok(Intent::Diet));
//! ```

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed disclaimer attached to every synthesized response.
pub const DISCLAIMER: &str = "This is educational wellness guidance, not medical advice. \
Consult healthcare professionals for medical concerns.";

/// Confidence assigned to a generator result when none is given.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Errors raised by a single guidance generator invocation.
///
/// These never reach the caller individually: the dispatcher logs them and
/// drops the failed result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Upstream LLM request failed.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The call did not settle before the dispatch deadline.
    #[error("Generation timed out")]
    Timeout,

    /// The upstream returned no usable content.
    #[error("Generator returned an empty response")]
    EmptyResponse,

    /// The request could not be built.
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),
}

/// Errors surfaced by the orchestration pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WellnessError {
    /// Inbound request is malformed.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Every dispatched generator failed.
    #[error("All {attempted} generator(s) failed for intent '{intent}'")]
    AllGeneratorsFailed { intent: Intent, attempted: usize },
}

/// Classified category of a wellness query.
///
/// Declaration order is significant: it is the classifier's tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Symptom,
    Lifestyle,
    Diet,
    Fitness,
    General,
}

impl Intent {
    /// All intents in declaration order.
    pub const ALL: [Intent; 5] = [
        Intent::Symptom,
        Intent::Lifestyle,
        Intent::Diet,
        Intent::Fitness,
        Intent::General,
    ];

    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Symptom => "symptom",
            Intent::Lifestyle => "lifestyle",
            Intent::Diet => "diet",
            Intent::Fitness => "fitness",
            Intent::General => "general",
        }
    }

    /// Returns the domain owning this intent, or `None` for `General`.
    pub fn domain(&self) -> Option<Domain> {
        match self {
            Intent::Symptom => Some(Domain::Symptom),
            Intent::Lifestyle => Some(Domain::Lifestyle),
            Intent::Diet => Some(Domain::Diet),
            Intent::Fitness => Some(Domain::Fitness),
            Intent::General => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown intent name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown intent: '{0}'")]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symptom" => Ok(Self::Symptom),
            "lifestyle" => Ok(Self::Lifestyle),
            "diet" => Ok(Self::Diet),
            "fitness" => Ok(Self::Fitness),
            "general" => Ok(Self::General),
            other => Err(UnknownIntent(other.to_string())),
        }
    }
}

/// A wellness domain with its own guidance generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Symptom,
    Lifestyle,
    Diet,
    Fitness,
}

impl Domain {
    /// All domains in invocation order.
    pub const ALL: [Domain; 4] = [Domain::Symptom, Domain::Lifestyle, Domain::Diet, Domain::Fitness];

    /// Returns the intent this domain serves.
    pub fn intent(&self) -> Intent {
        match self {
            Domain::Symptom => Intent::Symptom,
            Domain::Lifestyle => Intent::Lifestyle,
            Domain::Diet => Intent::Diet,
            Domain::Fitness => Intent::Fitness,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.intent().as_str())
    }
}

/// Optional user profile supplied with a query.
///
/// Any JSON object is accepted and carried as-is; the pipeline never reads it.
/// Well-known keys are `age`, `gender`, `health_conditions` and `preferences`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(pub serde_json::Map<String, serde_json::Value>);

impl UserProfile {
    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

/// An inbound wellness question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessQuery {
    pub user_id: String,
    pub query: String,
    /// Caller override; bypasses classification when set.
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

impl WellnessQuery {
    /// Creates a query without intent override or profile.
    pub fn new(user_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            query: query.into(),
            intent: None,
            user_profile: None,
        }
    }

    /// Sets the caller-supplied intent.
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    /// Rejects blank user IDs and blank query text.
    pub fn validate(&self) -> Result<(), WellnessError> {
        if self.user_id.trim().is_empty() {
            return Err(WellnessError::Validation("user_id must not be empty".into()));
        }
        if self.query.trim().is_empty() {
            return Err(WellnessError::Validation("query must not be empty".into()));
        }
        Ok(())
    }
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

/// Output of one guidance generator invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorResult {
    pub agent_name: String,
    pub content: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl GeneratorResult {
    /// Creates a result with the default confidence and no recommendations.
    pub fn new(agent_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            content: content.into(),
            confidence: DEFAULT_CONFIDENCE,
            recommendations: Vec::new(),
        }
    }

    /// Sets the confidence, clamped to `[0, 1]`.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Sets the recommendations.
    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations = recommendations.into_iter().map(Into::into).collect();
        self
    }
}

/// Final response returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedResponse {
    pub user_id: String,
    pub query: String,
    pub intent: Intent,
    pub agent_responses: Vec<GeneratorResult>,
    pub synthesized_guidance: String,
    pub primary_recommendations: Vec<String>,
    pub disclaimer: String,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub requires_emergency: bool,
}

impl SynthesizedResponse {
    /// Builds the emergency-terminal response: no agents, no recommendations.
    pub fn emergency(
        user_id: impl Into<String>,
        query: impl Into<String>,
        intent: Intent,
        guidance: impl Into<String>,
        warning: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            query: query.into(),
            intent,
            agent_responses: Vec::new(),
            synthesized_guidance: guidance.into(),
            primary_recommendations: Vec::new(),
            disclaimer: DISCLAIMER.to_string(),
            warning: Some(warning.into()),
            requires_emergency: true,
        }
    }
}

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => f.write_str("user"),
            MessageRole::Assistant => f.write_str("assistant"),
        }
    }
}

/// A single message in a user's conversation memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }

    /// Creates a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.content)
    }
}

/// Text-generation capability behind each wellness domain.
///
/// Implementations receive the user's query and the formatted prior
/// conversation (possibly empty) and return free-form guidance text.
#[async_trait]
pub trait GuidanceGenerator: Send + Sync {
    async fn generate(&self, query: &str, context: &str) -> Result<String, GenerationError>;
}
