#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wellness_config::DomainDescriptor;
use wellness_core::{Domain, GenerationError, GuidanceGenerator};
use wellness_engine::{AgentSet, DomainAgent};

/// Scripted generator: fixed reply, optional delay, call counting.
pub struct FakeGenerator {
    reply: Result<String, GenerationError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    contexts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(GenerationError::Upstream("connection refused".into())),
            delay: None,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GuidanceGenerator for FakeGenerator {
    async fn generate(&self, _query: &str, context: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push(context.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

/// One fake per domain, in `Domain::ALL` order.
pub struct Fakes {
    pub symptom: Arc<FakeGenerator>,
    pub lifestyle: Arc<FakeGenerator>,
    pub diet: Arc<FakeGenerator>,
    pub fitness: Arc<FakeGenerator>,
}

impl Fakes {
    /// Every domain replies with two bulleted recommendations named after it.
    pub fn healthy() -> Self {
        Self {
            symptom: FakeGenerator::replying(
                "Fatigue with headache is often linked to dehydration or poor sleep.\n\
                 - Drink a full glass of water now\n\
                 - Rest in a quiet, dark room",
            ),
            lifestyle: FakeGenerator::replying(
                "Small routine changes help.\n\
                 - Keep a consistent bedtime every night\n\
                 - Take a ten minute walk after lunch",
            ),
            diet: FakeGenerator::replying(
                "Balanced meals keep energy steady.\n\
                 - Add leafy greens to one meal a day\n\
                 - Drink a full glass of water now",
            ),
            fitness: FakeGenerator::replying(
                "Gentle movement is a good start.\n\
                 - Walk for twenty minutes most days\n\
                 - Stretch major muscle groups daily",
            ),
        }
    }

    pub fn agents(&self) -> AgentSet {
        let agent = |domain: Domain, generator: &Arc<FakeGenerator>| {
            DomainAgent::new(DomainDescriptor::builtin(domain), generator.clone())
        };
        AgentSet::new(
            agent(Domain::Symptom, &self.symptom),
            agent(Domain::Lifestyle, &self.lifestyle),
            agent(Domain::Diet, &self.diet),
            agent(Domain::Fitness, &self.fitness),
        )
    }

    pub fn total_calls(&self) -> usize {
        self.symptom.calls() + self.lifestyle.calls() + self.diet.calls() + self.fitness.calls()
    }
}
