//! Query routing and response synthesis for the wellness router.
//!
//! A query flows through these stages:
//!
//! 1. **Pre-check** ([`SafetyGate::emergency_precheck`]) — Emergency phrases short-circuit every intent
//! 2. **Classification** ([`IntentClassifier`]) — Keyword scoring, unless the caller supplied an intent
//! 3. **Safety gate** ([`SafetyGate::check`]) — Critical symptom language short-circuits symptom queries
//! 4. **Dispatch** ([`Dispatcher`]) — One agent, or all four for general queries, polled concurrently
//! 5. **Synthesis** ([`ResponseSynthesizer`]) — Per-intent document plus deduplicated recommendations
//!
//! [`WellnessOrchestrator`] runs the stages and records the user's message in
//! the shared [`MemoryStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wellness_config::DomainRegistry;
//! use wellness_core::WellnessQuery;
//! use wellness_engine::{AgentSet, MemoryStore, WellnessOrchestrator};
//!
//! let agents = AgentSet::from_registry(&DomainRegistry::with_defaults(), |d| make_generator(d));
//! let orchestrator = WellnessOrchestrator::new(agents, Arc::new(MemoryStore::new(100, 20, 5)));
//! let response = orchestrator.process(&WellnessQuery::new("u1", "How do I sleep better?")).await?;
//! println!("{}", response.synthesized_guidance);
//! ```

pub mod agents;
pub mod classifier;
pub mod dispatcher;
pub mod memory;
pub mod orchestrator;
pub mod safety;
pub mod synthesizer;

pub use agents::{extract_recommendations, AgentSet, DomainAgent};
pub use classifier::IntentClassifier;
pub use dispatcher::{DispatchReport, Dispatcher};
pub use memory::{ConversationMemory, MemoryStats, MemoryStore};
pub use orchestrator::WellnessOrchestrator;
pub use safety::{SafetyGate, SafetyVerdict};
pub use synthesizer::{fallback_guidance, unify_recommendations, ResponseSynthesizer};
