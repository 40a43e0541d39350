mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{FakeGenerator, Fakes};
use pretty_assertions::assert_eq;
use wellness_core::{Domain, GenerationError, Intent, MessageRole, WellnessError, WellnessQuery};
use wellness_engine::safety::{CRITICAL_WARNING, EMERGENCY_GUIDANCE, EMERGENCY_WARNING};
use wellness_engine::{fallback_guidance, Dispatcher, MemoryStore, ResponseSynthesizer, WellnessOrchestrator};

fn orchestrator(fakes: &Fakes) -> WellnessOrchestrator {
    WellnessOrchestrator::new(fakes.agents(), Arc::new(MemoryStore::new(100, 20, 5)))
}

#[tokio::test]
async fn tired_with_headache_routes_to_symptom_only() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    let response = orchestrator
        .process(&WellnessQuery::new("u1", "I feel tired and have a headache"))
        .await
        .unwrap();

    assert_eq!(response.intent, Intent::Symptom);
    assert_eq!(fakes.symptom.calls(), 1);
    assert_eq!(fakes.total_calls(), 1);
    assert_eq!(response.agent_responses.len(), 1);
    assert_eq!(response.agent_responses[0].agent_name, "Symptom Assessment");
    assert!(response.synthesized_guidance.starts_with("## Symptom Assessment"));
    assert!(response.primary_recommendations.len() <= 7);
    assert_eq!(
        response.primary_recommendations,
        vec!["Drink a full glass of water now", "Rest in a quiet, dark room"]
    );
    assert!(!response.requires_emergency);

    let stats = orchestrator.memory_stats("u1").await;
    assert_eq!(stats.message_count, 1);
    let last = stats.last_message.unwrap();
    assert_eq!(last.role, MessageRole::User);
    assert_eq!(last.content, "I feel tired and have a headache");
}

#[tokio::test]
async fn chest_pain_short_circuits_without_dispatch() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    let response = orchestrator
        .process(&WellnessQuery::new("u1", "I have chest pain"))
        .await
        .unwrap();

    assert!(response.requires_emergency);
    assert_eq!(response.warning.as_deref(), Some(EMERGENCY_WARNING));
    assert_eq!(response.synthesized_guidance, EMERGENCY_GUIDANCE);
    assert!(response.agent_responses.is_empty());
    assert!(response.primary_recommendations.is_empty());
    assert_eq!(fakes.total_calls(), 0);
    assert_eq!(orchestrator.memory_stats("u1").await.message_count, 0);
}

#[tokio::test]
async fn precheck_applies_even_with_caller_intent() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    let query = WellnessQuery::new("u1", "I feel suicidal lately").with_intent(Intent::Fitness);
    let response = orchestrator.process(&query).await.unwrap();

    assert!(response.requires_emergency);
    assert_eq!(response.intent, Intent::Fitness);
    assert_eq!(fakes.total_calls(), 0);
}

#[tokio::test]
async fn safety_gate_blocks_critical_symptoms() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    let response = orchestrator
        .process(&WellnessQuery::new("u1", "I feel dizzy and had a seizure"))
        .await
        .unwrap();

    assert_eq!(response.intent, Intent::Symptom);
    assert!(response.requires_emergency);
    assert_eq!(response.warning.as_deref(), Some(CRITICAL_WARNING));
    assert_eq!(fakes.total_calls(), 0);
    assert_eq!(orchestrator.memory_stats("u1").await.message_count, 0);
}

#[tokio::test]
async fn safety_gate_blocks_self_harm_language() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    for text in ["I feel like I might self-harm", "I feel sick and want to harm myself"] {
        let response = orchestrator.process(&WellnessQuery::new("u2", text)).await.unwrap();
        assert_eq!(response.intent, Intent::Symptom);
        assert!(response.requires_emergency);
        assert_eq!(response.warning.as_deref(), Some(CRITICAL_WARNING));
        assert!(response.agent_responses.is_empty());
    }

    assert_eq!(fakes.total_calls(), 0);
    assert_eq!(orchestrator.memory_stats("u2").await.message_count, 0);
    assert!(!orchestrator.memory().contains("u2").await);
}

#[tokio::test]
async fn caller_intent_bypasses_classification() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    // "seizure" would trip the gate for symptom queries, but the caller says diet
    let query = WellnessQuery::new("u1", "seizure medication and my workout").with_intent(Intent::Diet);
    let response = orchestrator.process(&query).await.unwrap();

    assert_eq!(response.intent, Intent::Diet);
    assert!(!response.requires_emergency);
    assert_eq!(fakes.diet.calls(), 1);
    assert_eq!(fakes.total_calls(), 1);
}

#[tokio::test]
async fn unmatched_query_fans_out_to_all_agents() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    let response = orchestrator
        .process(&WellnessQuery::new("u1", "tell me about vacations"))
        .await
        .unwrap();

    assert_eq!(response.intent, Intent::General);
    for fake in [&fakes.symptom, &fakes.lifestyle, &fakes.diet, &fakes.fitness] {
        assert_eq!(fake.calls(), 1);
    }
    let names: Vec<_> = response.agent_responses.iter().map(|r| r.agent_name.as_str()).collect();
    assert_eq!(names, vec!["Symptom Assessment", "Lifestyle Coach", "Nutrition Guide", "Fitness Coach"]);
    assert!(response.synthesized_guidance.starts_with("## Comprehensive Wellness Perspective"));

    // the shared water recommendation appears once
    let water = response
        .primary_recommendations
        .iter()
        .filter(|r| r.as_str() == "Drink a full glass of water now")
        .count();
    assert_eq!(water, 1);
    assert_eq!(response.primary_recommendations.len(), 7);
}

#[tokio::test]
async fn partial_failure_still_synthesizes() {
    let fakes = Fakes {
        lifestyle: FakeGenerator::failing(),
        fitness: FakeGenerator::failing(),
        ..Fakes::healthy()
    };
    let orchestrator = orchestrator(&fakes);

    let response = orchestrator
        .process(&WellnessQuery::new("u1", "tell me about vacations"))
        .await
        .unwrap();

    let names: Vec<_> = response.agent_responses.iter().map(|r| r.agent_name.as_str()).collect();
    assert_eq!(names, vec!["Symptom Assessment", "Nutrition Guide"]);
    assert_eq!(fakes.total_calls(), 4);
}

#[tokio::test]
async fn all_failures_surface_an_error_and_skip_memory() {
    let fakes = Fakes { diet: FakeGenerator::failing(), ..Fakes::healthy() };
    let orchestrator = orchestrator(&fakes);

    let result = orchestrator
        .process(&WellnessQuery::new("u1", "What should I eat for dinner?"))
        .await;

    assert_eq!(
        result,
        Err(WellnessError::AllGeneratorsFailed { intent: Intent::Diet, attempted: 1 })
    );
    assert_eq!(orchestrator.memory_stats("u1").await.message_count, 0);
}

#[tokio::test]
async fn empty_dispatch_results_use_fallback() {
    let response = ResponseSynthesizer::new().synthesize("u1", "q", Intent::Lifestyle, Vec::new());
    assert_eq!(response.synthesized_guidance, fallback_guidance(Intent::Lifestyle));
    assert_eq!(
        response.synthesized_guidance,
        "Unable to provide lifestyle guidance. Consider consulting a wellness coach."
    );
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let fakes = Fakes::healthy();
    let result = orchestrator(&fakes).process(&WellnessQuery::new("u1", "   ")).await;
    assert!(matches!(result, Err(WellnessError::Validation(_))));
    assert_eq!(fakes.total_calls(), 0);
}

#[tokio::test]
async fn context_carries_recent_turns() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    orchestrator.process(&WellnessQuery::new("u1", "I have a sore throat")).await.unwrap();
    orchestrator.record_assistant_message("u1", "Gargle with warm salt water").await;
    orchestrator.process(&WellnessQuery::new("u1", "Still sore today")).await.unwrap();

    assert_eq!(
        fakes.symptom.contexts(),
        vec![
            String::new(),
            "user: I have a sore throat\nassistant: Gargle with warm salt water".to_string(),
        ]
    );
    assert_eq!(orchestrator.memory_stats("u1").await.message_count, 3);
}

#[tokio::test]
async fn clear_memory_forgets_user() {
    let fakes = Fakes::healthy();
    let orchestrator = orchestrator(&fakes);

    orchestrator.process(&WellnessQuery::new("u1", "gym plan")).await.unwrap();
    assert!(orchestrator.clear_memory("u1").await);
    assert_eq!(orchestrator.memory_stats("u1").await.message_count, 0);
    assert!(!orchestrator.clear_memory("u1").await);
}

#[tokio::test]
async fn dispatch_runs_calls_concurrently() {
    let delay = Duration::from_millis(200);
    let fakes = Fakes {
        symptom: FakeGenerator::slow("- Rest for a while today", delay),
        lifestyle: FakeGenerator::slow("- Keep a steady routine", delay),
        diet: FakeGenerator::slow("- Eat more vegetables", delay),
        fitness: FakeGenerator::slow("- Walk every morning", delay),
    };
    let dispatcher = Dispatcher::new(fakes.agents());

    let start = Instant::now();
    let report = dispatcher.dispatch("anything", Intent::General, "").await;

    assert_eq!(report.results.len(), 4);
    assert!(start.elapsed() < delay * 3);
}

#[tokio::test]
async fn dispatch_deadline_turns_stragglers_into_timeouts() {
    let fakes = Fakes { fitness: FakeGenerator::slow("- too late", Duration::from_secs(5)), ..Fakes::healthy() };
    let dispatcher = Dispatcher::new(fakes.agents()).with_timeout(Some(Duration::from_millis(100)));

    let report = dispatcher.dispatch("anything", Intent::General, "").await;

    assert_eq!(report.attempted, 4);
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.failed, vec![(Domain::Fitness, GenerationError::Timeout)]);
    assert!(!report.all_failed());
}

#[tokio::test]
async fn orchestrator_timeout_on_single_agent_is_all_failed() {
    let fakes = Fakes { fitness: FakeGenerator::slow("- too late", Duration::from_secs(5)), ..Fakes::healthy() };
    let orchestrator = orchestrator(&fakes).with_dispatch_timeout(Some(Duration::from_millis(50)));

    let result = orchestrator.process(&WellnessQuery::new("u1", "gym workout")).await;
    assert_eq!(
        result,
        Err(WellnessError::AllGeneratorsFailed { intent: Intent::Fitness, attempted: 1 })
    );
}
