//! Request pipeline: screen, classify, gate, dispatch, synthesize, remember.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{info, warn};
use wellness_core::{Intent, SynthesizedResponse, WellnessError, WellnessQuery};

use crate::agents::AgentSet;
use crate::classifier::IntentClassifier;
use crate::dispatcher::Dispatcher;
use crate::memory::{MemoryStats, MemoryStore};
use crate::safety::{SafetyGate, SafetyVerdict, EMERGENCY_GUIDANCE, EMERGENCY_WARNING};
use crate::synthesizer::ResponseSynthesizer;

const LOG_QUERY_CHARS: usize = 50;

fn preview(text: &str) -> String {
    text.chars().take(LOG_QUERY_CHARS).collect()
}

/// Coordinates the components that answer one wellness query.
#[derive(Debug)]
pub struct WellnessOrchestrator {
    classifier: IntentClassifier,
    gate: SafetyGate,
    dispatcher: Dispatcher,
    synthesizer: ResponseSynthesizer,
    memory: Arc<MemoryStore>,
}

impl WellnessOrchestrator {
    pub fn new(agents: AgentSet, memory: Arc<MemoryStore>) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            gate: SafetyGate::new(),
            dispatcher: Dispatcher::new(agents),
            synthesizer: ResponseSynthesizer::new(),
            memory,
        }
    }

    /// Bounds the dispatch phase. `None` disables the deadline.
    pub fn with_dispatch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.dispatcher = self.dispatcher.with_timeout(timeout);
        self
    }

    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.memory
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Answers a query.
    ///
    /// Emergency language yields a successful response flagged
    /// `requires_emergency` without calling any generator. The user's message is
    /// stored only after a normal response has been synthesized.
    pub async fn process(&self, query: &WellnessQuery) -> Result<SynthesizedResponse, WellnessError> {
        query.validate()?;
        let text = query.query.as_str();
        info!("ORCHESTRATOR: received from {}: {}", query.user_id, preview(text));

        let intent_of = |q: &WellnessQuery| q.intent.unwrap_or_else(|| self.classifier.classify(text));

        if let Some(phrase) = self.gate.emergency_precheck(text) {
            warn!("ORCHESTRATOR: emergency pre-check matched '{}'", phrase);
            return Ok(SynthesizedResponse::emergency(
                &query.user_id,
                text,
                intent_of(query),
                EMERGENCY_GUIDANCE,
                EMERGENCY_WARNING,
            ));
        }

        let intent = intent_of(query);
        match query.intent {
            Some(_) => info!("ORCHESTRATOR: caller intent {}", intent),
            None => info!("ORCHESTRATOR: classified as {}", intent),
        }

        if let SafetyVerdict::Unsafe { warning, matched } = self.gate.check(intent, text) {
            warn!("ORCHESTRATOR: safety gate matched '{}'", matched);
            return Ok(SynthesizedResponse::emergency(&query.user_id, text, intent, warning, warning));
        }

        let context = self.memory.conversation_context(&query.user_id).await;
        let report = self.dispatcher.dispatch(text, intent, &context).await;
        if report.all_failed() {
            warn!("ORCHESTRATOR: all {} agent(s) failed for {}", report.attempted, intent);
            return Err(WellnessError::AllGeneratorsFailed { intent, attempted: report.attempted });
        }

        let response = self.synthesizer.synthesize(&query.user_id, text, intent, report.results);
        self.memory.add_user_message(&query.user_id, text).await;

        info!(
            "ORCHESTRATOR: synthesized {} response from {} agent(s), {} recommendation(s)",
            intent,
            response.agent_responses.len(),
            response.primary_recommendations.len()
        );
        Ok(response)
    }

    /// Classifies text without running the pipeline.
    pub fn classify(&self, text: &str) -> Intent {
        self.classifier.classify(text)
    }

    pub async fn memory_stats(&self, user_id: &str) -> MemoryStats {
        self.memory.stats(user_id).await
    }

    pub async fn clear_memory(&self, user_id: &str) -> bool {
        let cleared = self.memory.clear(user_id).await;
        info!("ORCHESTRATOR: cleared memory for {} ({})", user_id, cleared);
        cleared
    }

    pub async fn record_assistant_message(&self, user_id: &str, text: &str) {
        self.memory.add_assistant_message(user_id, text).await;
    }

    pub async fn update_user_context(&self, user_id: &str, update: Map<String, Value>) {
        self.memory.update_user_context(user_id, update).await;
    }
}
